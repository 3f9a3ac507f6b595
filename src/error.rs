use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a whole dataset operation.
///
/// Per-image failures never show up here: unreadable sidecars degrade to
/// empty tag lists during a load, and failing writes are collected in the
/// [`SaveReport`](crate::dataset::SaveReport) of the batch they belong to.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset root does not exist or is not a directory: {0}")]
    RootNotFound(PathBuf),

    #[error("a save is still in progress")]
    SaveInProgress,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
