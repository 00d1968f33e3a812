//! Streaming transfer engine shared by the provider implementations.
//!
//! Pulls a response body in fixed-size chunks into a staging file,
//! checking the caller's cancellation token before every chunk, then
//! verifies the result and renames it onto the final cache path. On any
//! failure the staging file is removed before the error is surfaced, so
//! the cache never holds a truncated or zero-byte artifact.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::TryStreamExt;
use reqwest::{redirect, Client};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::download::error::DownloadError;
use crate::download::progress::{ProgressSink, ProgressUpdate};

/// Shared HTTP client for a provider: connect timeout and data-plane
/// redirect cap baked in, phase timeouts applied per request.
pub(crate) fn build_client() -> AppResult<Client> {
    Client::builder()
        .user_agent(concat!("trackfetch/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(config::stream::connect_timeout())
        .redirect(redirect::Policy::limited(config::stream::MAX_REDIRECTS))
        .build()
        .map_err(AppError::from)
}

/// Stream `url` into `staging`, honoring `ctx` between chunks.
///
/// Returns the number of bytes written. The staging file is removed
/// before returning on every error path, including cancellation.
pub(crate) async fn stream_to_file(
    client: &Client,
    ctx: &CancellationToken,
    url: &str,
    timeout: Duration,
    staging: &Path,
    progress: &ProgressSink,
) -> AppResult<u64> {
    let result = copy_body(client, ctx, url, timeout, staging, progress).await;
    if result.is_err() {
        discard(staging).await;
    }
    result
}

async fn copy_body(
    client: &Client,
    ctx: &CancellationToken,
    url: &str,
    timeout: Duration,
    staging: &Path,
    progress: &ProgressSink,
) -> AppResult<u64> {
    let request = client.get(url).timeout(timeout);
    let response = tokio::select! {
        _ = ctx.cancelled() => return Err(DownloadError::Canceled.into()),
        response = request.send() => response.map_err(|e| {
            if e.is_redirect() {
                DownloadError::RedirectLimit {
                    max: config::stream::MAX_REDIRECTS,
                }
            } else {
                DownloadError::Stream(format!("request failed: {e}"))
            }
        })?,
    };

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Stream(format!("unexpected status {status}")).into());
    }
    let total_bytes = response.content_length();

    let mut file = tokio::fs::File::create(staging).await?;
    let body = response.bytes_stream().map_err(std::io::Error::other);
    let mut reader = StreamReader::new(body);
    let mut buf = vec![0u8; config::stream::CHUNK_SIZE];
    let mut written: u64 = 0;
    let mut last_percent: u8 = 0;

    loop {
        // Cancellation wins over a ready chunk; an aborted transfer runs
        // on for at most one chunk's worth of I/O.
        let read = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(DownloadError::Canceled.into()),
            read = reader.read(&mut buf) => {
                read.map_err(|e| DownloadError::Stream(format!("read error: {e}")))?
            }
        };
        if read == 0 {
            break;
        }

        file.write_all(&buf[..read])
            .await
            .map_err(|e| DownloadError::Stream(format!("write error: {e}")))?;
        written += read as u64;

        if let Some(total) = total_bytes {
            let percent = if total > 0 {
                ((written as f64 / total as f64) * 100.0) as u8
            } else {
                0
            };
            if percent >= last_percent + 5 || percent == 100 {
                last_percent = percent;
                let _ = progress.send(ProgressUpdate {
                    percent,
                    downloaded_bytes: written,
                    total_bytes: Some(total),
                });
            }
        }
    }

    file.flush().await?;
    Ok(written)
}

/// Verify the staging file and move it onto the final cache path.
///
/// A missing or zero-byte staging file is discarded and reported as
/// `EmptyFile`; the rename is atomic, so `dest` either keeps its old
/// state or appears complete.
pub(crate) async fn finalize(staging: &Path, dest: &Path) -> AppResult<PathBuf> {
    let size = match tokio::fs::metadata(staging).await {
        Ok(meta) => meta.len(),
        Err(_) => 0,
    };
    if size == 0 {
        discard(staging).await;
        return Err(DownloadError::EmptyFile {
            path: dest.to_path_buf(),
        }
        .into());
    }

    tokio::fs::rename(staging, dest).await?;
    Ok(dest.to_path_buf())
}

/// Best-effort removal of a staging file.
pub(crate) async fn discard(staging: &Path) {
    if let Err(err) = tokio::fs::remove_file(staging).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            log::debug!("failed to remove staging file {}: {}", staging.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_finalize_moves_staging_to_dest() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("abc123.mp3.part");
        let dest = dir.path().join("abc123.mp3");
        tokio::fs::write(&staging, b"payload").await.unwrap();

        let path = finalize(&staging, &dest).await.unwrap();
        assert_eq!(path, dest);
        assert!(dest.is_file());
        assert!(!staging.exists());
    }

    #[tokio::test]
    async fn test_finalize_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("abc123.mp3.part");
        let dest = dir.path().join("abc123.mp3");
        tokio::fs::write(&staging, b"").await.unwrap();

        let err = finalize(&staging, &dest).await.unwrap_err();
        assert!(matches!(
            err.as_download(),
            Some(DownloadError::EmptyFile { .. })
        ));
        assert!(!staging.exists());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_finalize_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("abc123.mp3.part");
        let dest = dir.path().join("abc123.mp3");

        let err = finalize(&staging, &dest).await.unwrap_err();
        assert!(matches!(
            err.as_download(),
            Some(DownloadError::EmptyFile { .. })
        ));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_discard_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        discard(&dir.path().join("nope.part")).await;
    }
}
