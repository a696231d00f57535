//! Filesystem locations for the local data directory.

use std::path::PathBuf;

const DATA_DIR_ENV: &str = "KAIZEN_DATA_DIR";

/// Directory holding the JSON snapshots. `KAIZEN_DATA_DIR` wins,
/// otherwise `~/.kaizen`, falling back to the working directory when no
/// home can be resolved.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    match dirs::home_dir() {
        Some(home) => home.join(".kaizen"),
        None => PathBuf::from(".kaizen"),
    }
}

pub fn knowledge_snapshot_path() -> PathBuf {
    data_dir().join("knowledge.json")
}

pub fn reviews_snapshot_path() -> PathBuf {
    data_dir().join("reviews.json")
}
