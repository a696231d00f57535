//! Shared plumbing: logging setup and data directory resolution.

pub mod logging;
pub mod paths;

pub use logging::init_logging;
pub use paths::{data_dir, knowledge_snapshot_path, reviews_snapshot_path};
