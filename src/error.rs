use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for a split run.
///
/// `SourceUnavailable`, `NoRecordsFound`, `InvalidBatchSize` and `Persistence`
/// abort the run; `Transmission` is confined to one batch and the run moves on
/// to the next.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The source identifier resolved to neither a readable file nor a
    /// fetchable URL with a non-empty text body.
    #[error("source unavailable: '{location}': {reason}")]
    SourceUnavailable { location: String, reason: String },

    /// The document contained zero record blocks. A preview of the document
    /// is logged before this is returned.
    #[error("no record blocks found in document")]
    NoRecordsFound,

    /// Batch size must be a positive integer.
    #[error("invalid batch size: must be positive")]
    InvalidBatchSize,

    /// Writing a batch file failed (disk full, permission denied).
    #[error("failed to write batch {index} to '{path}': {source}")]
    Persistence {
        index: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single submission attempt failed (transport error or non-success
    /// status). Subsequent batches are unaffected.
    #[error("transmission of batch {index} failed: {detail}")]
    Transmission { index: usize, detail: String },
}
