use std::path::PathBuf;
use thiserror::Error;

/// Structured error type for download operations.
///
/// Categorized so the orchestrator can tell caller cancellation apart
/// from provider defects, and "nothing can serve this" apart from
/// "everything that could serve this failed".
#[derive(Error, Debug)]
pub enum DownloadError {
    /// No registered provider supports the track's source platform
    #[error("no registered provider can download from '{source}'")]
    NoProvider { source: String },

    /// A provider was invoked outside its declared capability
    #[error("{provider} does not support {operation}")]
    NotSupported {
        provider: String,
        operation: &'static str,
    },

    /// Control-plane failure: request error, bad status, malformed or
    /// empty token response
    #[error("token request failed: {0}")]
    Token(String),

    /// Data-plane failure: request error, bad status, read/write error
    #[error("stream request failed: {0}")]
    Stream(String),

    /// The data-plane redirect chain exceeded the configured cap
    #[error("redirect limit exceeded after {max} hops")]
    RedirectLimit { max: usize },

    /// The transfer completed but produced no usable file
    #[error("downloaded file is empty or missing: {}", path.display())]
    EmptyFile { path: PathBuf },

    /// The caller's cancellation signal fired
    #[error("download canceled")]
    Canceled,

    /// Every candidate provider was tried and failed
    #[error("all {} provider(s) failed for '{id}': {}", attempts.len(), attempts.join("; "))]
    AllProvidersFailed { id: String, attempts: Vec<String> },
}
