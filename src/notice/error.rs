use std::path::PathBuf;

use thiserror::Error;

use crate::bulletin::{BulletinError, LevelError};

#[derive(Debug, Error)]
pub enum NoticeError {
    #[error(transparent)]
    Bulletin(#[from] BulletinError),

    #[error("Failed to transform zone record {index}: {source}")]
    Level {
        index: usize,
        #[source]
        source: LevelError,
    },

    #[error("Run date {0} has no following day")]
    DateOutOfRange(chrono::NaiveDate),

    #[error("Failed to serialize notice: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
