//! Library scanning, indexing and snapshot caching.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod cache;
mod display;
mod loader;
mod model;
mod scan;

pub use cache::{CacheError, Snapshot, SnapshotCache};
pub use display::{duration_label, UNKNOWN_DURATION};
pub use loader::LibraryLoader;
pub use model::{Album, TrackIndex, TrackRecord};
pub use scan::{LoftyReader, MetadataError, MetadataReader, TrackMetadata};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("no audio files in {}", .0.display())]
    FolderEmpty(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
