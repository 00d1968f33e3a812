//! DirectApiProvider - single-phase download backend.
//!
//! The backing service streams the payload from one authenticated GET,
//! no token handshake:
//! `GET {base}/download/{audio|video}?video_id={id}&mode=download&no_redirect=1&api_key={key}`
//!
//! Download-only: it cannot resolve free-text queries.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::core::error::AppResult;
use crate::core::types::{SearchOptions, Track};
use crate::download::cache::DownloadCache;
use crate::download::error::DownloadError;
use crate::download::progress::ProgressSink;
use crate::download::provider::MediaProvider;
use crate::download::stream;

/// Download provider backed by a direct streaming API with a static key.
pub struct DirectApiProvider {
    name: String,
    base_url: String,
    api_key: String,
    sources: Vec<String>,
    cache: Arc<DownloadCache>,
    client: Client,
}

impl DirectApiProvider {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        sources: Vec<String>,
        cache: Arc<DownloadCache>,
    ) -> AppResult<Self> {
        let base_url: String = base_url.into();
        Ok(Self {
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            sources,
            cache,
            client: stream::build_client()?,
        })
    }
}

#[async_trait]
impl MediaProvider for DirectApiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    // Download-only, does not validate queries
    fn is_valid(&self, _query: &str) -> bool {
        false
    }

    async fn get_tracks(&self, _query: &str, _options: &SearchOptions) -> AppResult<Vec<Track>> {
        Err(DownloadError::NotSupported {
            provider: self.name.clone(),
            operation: "track search",
        }
        .into())
    }

    fn is_download_supported(&self, source: &str) -> bool {
        self.sources.iter().any(|s| s == source)
    }

    async fn download(
        &self,
        ctx: &CancellationToken,
        track: &Track,
        progress: &ProgressSink,
    ) -> AppResult<PathBuf> {
        if let Some(path) = self.cache.lookup(&track.id, track.kind).await {
            log::info!("{}: using cached file for {}", self.name, track.id);
            return Ok(path);
        }

        self.cache.ensure_root().await?;
        let dest = self.cache.path_for(&track.id, track.kind);

        let _guard = self.cache.lock_path(&dest).await;
        if let Some(path) = self.cache.lookup(&track.id, track.kind).await {
            log::info!("{}: using cached file for {}", self.name, track.id);
            return Ok(path);
        }

        log::info!("📥 {}: downloading {}", self.name, track.title);

        let url = format!(
            "{}/download/{}?video_id={}&mode=download&no_redirect=1&api_key={}",
            self.base_url,
            track.kind.as_str(),
            track.id,
            self.api_key,
        );
        let staging = self.cache.staging_for(&dest);
        let written = stream::stream_to_file(
            &self.client,
            ctx,
            &url,
            track.kind.stream_timeout(),
            &staging,
            progress,
        )
        .await?;

        let path = stream::finalize(&staging, &dest).await?;
        log::info!(
            "✅ {}: downloaded {} ({} bytes)",
            self.name,
            track.title,
            written
        );
        Ok(path)
    }
}
