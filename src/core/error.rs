use thiserror::Error;

use crate::download::error::DownloadError;

/// Centralized error type for the crate
///
/// All failures surface as this enum. Uses `thiserror` for automatic
/// conversions and display formatting.
#[derive(Error, Debug)]
pub enum AppError {
    /// Structured download failures (token, stream, fallback exhaustion)
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Whether this failure is caller-initiated cancellation.
    ///
    /// The orchestrator must never mask cancellation behind provider
    /// fallback, so it checks every candidate failure with this.
    pub fn is_canceled(&self) -> bool {
        matches!(self, AppError::Download(DownloadError::Canceled))
    }

    /// Borrow the structured download error, if this is one.
    pub fn as_download(&self) -> Option<&DownloadError> {
        match self {
            AppError::Download(err) => Some(err),
            _ => None,
        }
    }
}
