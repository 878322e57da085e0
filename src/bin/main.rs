use actix_web::{middleware::Logger, web, App, HttpServer};
use chess_ladder_server::{config, db::snapshot, http, matchmaking, metrics, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration
    let settings = config::settings().clone();
    let server_addr = settings.server_addr.clone();
    let data_dir = settings.data_dir.clone();

    let state = web::Data::new(AppState::new(settings));

    // Restore durable tables, if persistence is on
    if let Some(dir) = &data_dir {
        match snapshot::load(dir).await {
            Ok(Some(snap)) => state.restore(snap).await,
            Ok(None) => log::info!("no snapshot in {}, starting empty", dir.display()),
            Err(e) => {
                log::error!("cannot load snapshot: {e:?}");
                return Err(std::io::Error::other(e.to_string()));
            }
        }
    }

    // Start the background housekeeping loop
    matchmaking::start(state.clone().into_inner());

    log::info!("listening on {server_addr}");
    let app_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(app_state.clone())
            .configure(http::routes::init_routes)
    })
    .bind(&server_addr)?
    .run()
    .await?;

    // Final flush on shutdown
    if let Some(dir) = &data_dir {
        if let Err(e) = snapshot::save(&state.snapshot().await, dir).await {
            log::error!("final snapshot failed: {e:?}");
        }
    }
    Ok(())
}
