//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder,
};

/// HTTP request metrics, served at `/metrics`.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .build()
        .expect("metrics builder")
});

pub static PAIRINGS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("ladder_pairings_total", "Players paired by the queue")
        .expect("register ladder_pairings_total")
});

pub static RESULTS_RECORDED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("ladder_results_recorded_total", "Match results applied")
        .expect("register ladder_results_recorded_total")
});

pub static SESSIONS_ISSUED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("ladder_sessions_issued_total", "Successful logins")
        .expect("register ladder_sessions_issued_total")
});

pub static QUEUE_DEPTH: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("ladder_queue_depth", "Players currently waiting")
        .expect("register ladder_queue_depth")
});

/// Domain metrics in Prometheus text format.
pub fn render_core() -> anyhow::Result<String> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
