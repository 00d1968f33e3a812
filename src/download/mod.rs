//! Download orchestration, provider registry, cache, and streaming engine

pub mod cache;
pub mod downloader;
pub mod error;
pub mod progress;
pub mod provider;
pub mod stream;

// Re-exports for convenience
pub use cache::DownloadCache;
pub use downloader::Downloader;
pub use error::DownloadError;
pub use progress::{progress_channel, ProgressSink, ProgressUpdate};
pub use provider::{MediaProvider, ProviderRegistry};
