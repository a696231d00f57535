//! Atomic JSON snapshot files shared by both stores.

use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use application::{ApplicationError, ApplicationResult};

/// Load a snapshot. A missing file is an empty store, a corrupt file is
/// a storage error.
pub fn load<T: DeserializeOwned>(path: &Path) -> ApplicationResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path).map_err(|err| {
        ApplicationError::storage(format!("failed to read snapshot {}: {err}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|err| {
        ApplicationError::storage(format!("snapshot {} is corrupt: {err}", path.display()))
    })
}

/// Write the snapshot through a temp file in the target directory and
/// rename it into place, so a crash never leaves a partial file.
pub fn write<T: Serialize>(path: &Path, records: &[T]) -> ApplicationResult<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|err| ApplicationError::storage(format!("failed to serialize snapshot: {err}")))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|err| {
        ApplicationError::storage(format!("failed to create {}: {err}", dir.display()))
    })?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|err| {
        ApplicationError::storage(format!("failed to create temp file in {}: {err}", dir.display()))
    })?;
    file.write_all(json.as_bytes()).map_err(|err| {
        ApplicationError::storage(format!("failed to write snapshot: {err}"))
    })?;
    file.persist(path).map_err(|err| {
        ApplicationError::storage(format!("failed to replace snapshot {}: {err}", path.display()))
    })?;

    debug!(path = %path.display(), records = records.len(), "snapshot written");
    Ok(())
}
