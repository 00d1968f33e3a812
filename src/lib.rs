//! Trackfetch - provider-based media download engine
//!
//! This library resolves a track already identified on some source platform
//! into a locally stored media file. Registered download providers are tried
//! in priority order; the first provider that succeeds wins, ordinary
//! failures fall through to the next candidate, and caller cancellation
//! aborts the whole chain. Successful downloads land in a deterministic
//! file cache, so repeated requests for the same track cost no network.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, and the shared data types
//! - `download`: cache, provider registry, orchestrator, and the streaming
//!   transfer engine

pub mod core;
pub mod download;

// Re-export commonly used types for convenience
pub use crate::core::error::{AppError, AppResult};
pub use crate::core::types::{MediaKind, SearchOptions, Track};
pub use crate::download::cache::DownloadCache;
pub use crate::download::downloader::Downloader;
pub use crate::download::error::DownloadError;
pub use crate::download::progress::{progress_channel, ProgressSink, ProgressUpdate};
pub use crate::download::provider::{MediaProvider, ProviderRegistry};
