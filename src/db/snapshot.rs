//! Durable copy of the long-lived tables as one JSON document.
//!
//! Sessions, queue entries and open pairings are deliberately absent: they
//! do not survive a restart.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::db::models::{FriendEdge, MatchId, MatchRecord, User, UserId};

pub const FILE_NAME: &str = "state.json";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub next_user_id: UserId,
    pub next_match_id: MatchId,
    pub users: Vec<User>,
    pub matches: Vec<MatchRecord>,
    pub friendships: Vec<FriendEdge>,
}

impl Snapshot {
    pub fn new(
        next_user_id: UserId,
        next_match_id: MatchId,
        users: Vec<User>,
        matches: Vec<MatchRecord>,
        friendships: Vec<FriendEdge>,
    ) -> Self {
        Snapshot {
            version: FORMAT_VERSION,
            next_user_id,
            next_match_id,
            users,
            matches,
            friendships,
        }
    }
}

pub fn path_in(dir: &Path) -> PathBuf {
    dir.join(FILE_NAME)
}

/// `Ok(None)` when no snapshot has been written yet.
pub async fn load(dir: &Path) -> anyhow::Result<Option<Snapshot>> {
    let path = path_in(dir);
    let raw = match tokio::fs::read(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    let snap: Snapshot =
        serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))?;
    anyhow::ensure!(
        snap.version == FORMAT_VERSION,
        "unsupported snapshot version {}",
        snap.version
    );
    Ok(Some(snap))
}

/// Write via a temp file and rename so readers never see a torn file.
pub async fn save(snap: &Snapshot, dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;
    let path = path_in(dir);
    let tmp = dir.join(format!("{FILE_NAME}.tmp"));
    let body = serde_json::to_vec_pretty(snap)?;
    tokio::fs::write(&tmp, body)
        .await
        .with_context(|| format!("writing {}", tmp.display()))?;
    tokio::fs::rename(&tmp, &path)
        .await
        .with_context(|| format!("renaming into {}", path.display()))?;
    Ok(())
}
