//! Download orchestration across registered providers.
//!
//! One `download` call is one independent unit of work: candidates for
//! the track's source platform are tried strictly in registry order,
//! the first success wins, ordinary failures fall through to the next
//! candidate, and caller cancellation aborts the chain immediately.
//! There is no per-provider retry; resilience comes from the fallback
//! chain alone.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::error::AppResult;
use crate::core::types::Track;
use crate::download::error::DownloadError;
use crate::download::progress::ProgressSink;
use crate::download::provider::ProviderRegistry;

/// Orchestrates downloads over a read-only provider registry.
pub struct Downloader {
    registry: Arc<ProviderRegistry>,
}

impl Downloader {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Resolve the track into a local file via the first capable
    /// provider that succeeds.
    ///
    /// # Errors
    ///
    /// - `NoProvider` when nothing supports the track's source platform
    /// - `Canceled` when `ctx` fires, even mid-chain; cancellation is
    ///   caller intent and is never masked by trying further candidates
    /// - `AllProvidersFailed` when every candidate failed, carrying one
    ///   line per attempt
    pub async fn download(
        &self,
        ctx: &CancellationToken,
        track: &Track,
        progress: &ProgressSink,
    ) -> AppResult<PathBuf> {
        let candidates = self.registry.candidates_for(&track.source);
        if candidates.is_empty() {
            return Err(DownloadError::NoProvider {
                source: track.source.clone(),
            }
            .into());
        }

        let mut attempts = Vec::with_capacity(candidates.len());
        for provider in candidates {
            if ctx.is_cancelled() {
                return Err(DownloadError::Canceled.into());
            }

            match provider.download(ctx, track, progress).await {
                Ok(path) => {
                    log::info!(
                        "download of {} served by {} -> {}",
                        track.id,
                        provider.name(),
                        path.display()
                    );
                    return Ok(path);
                }
                Err(err) if err.is_canceled() => return Err(err),
                Err(err) => {
                    log::warn!(
                        "{}: download of {} failed, trying next provider: {}",
                        provider.name(),
                        track.id,
                        err
                    );
                    attempts.push(format!("{}: {}", provider.name(), err));
                }
            }
        }

        Err(DownloadError::AllProvidersFailed {
            id: track.id.clone(),
            attempts,
        }
        .into())
    }
}
