use drive_ox::DriveRequestError;
use thiserror::Error;

/// Errors surfaced by the query layer.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The underlying request failed
    #[error(transparent)]
    Request(#[from] DriveRequestError),

    /// Cached data did not match the requested shape
    #[error("cache data error: {0}")]
    Data(#[from] serde_json::Error),

    /// The fetch was cancelled before completing
    #[error("query cancelled")]
    Cancelled,
}
