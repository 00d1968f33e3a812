//! TokenApiProvider - two-phase download backend.
//!
//! The backing service hands out a short-lived download token on its
//! control plane, then streams the media bytes on its data plane:
//! - control: `GET {base}/download?url={id}&type={audio|video}`
//!   returning `{"download_token": "..."}`
//! - data: `GET {base}/stream/{id}?type={audio|video}&token={token}`
//!   returning the raw payload
//!
//! Download-only: it cannot resolve free-text queries.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::core::config;
use crate::core::error::AppResult;
use crate::core::types::{MediaKind, SearchOptions, Track};
use crate::download::cache::DownloadCache;
use crate::download::error::DownloadError;
use crate::download::progress::ProgressSink;
use crate::download::provider::MediaProvider;
use crate::download::stream;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    download_token: String,
}

/// Download provider backed by a token-issuing streaming API.
pub struct TokenApiProvider {
    name: String,
    base_url: String,
    sources: Vec<String>,
    cache: Arc<DownloadCache>,
    client: Client,
}

impl TokenApiProvider {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        sources: Vec<String>,
        cache: Arc<DownloadCache>,
    ) -> AppResult<Self> {
        let base_url: String = base_url.into();
        Ok(Self {
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            sources,
            cache,
            client: stream::build_client()?,
        })
    }

    /// Control-plane handshake: exchange (id, kind) for a download token.
    async fn request_token(
        &self,
        ctx: &CancellationToken,
        id: &str,
        kind: MediaKind,
    ) -> AppResult<String> {
        let request = self
            .client
            .get(format!("{}/download", self.base_url))
            .query(&[("url", id), ("type", kind.as_str())])
            .timeout(config::stream::token_timeout());

        let response = tokio::select! {
            _ = ctx.cancelled() => return Err(DownloadError::Canceled.into()),
            response = request.send() => response
                .map_err(|e| DownloadError::Token(format!("control request failed: {e}")))?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Token(format!("unexpected status {status}")).into());
        }

        let body = tokio::select! {
            _ = ctx.cancelled() => return Err(DownloadError::Canceled.into()),
            body = response.text() => body
                .map_err(|e| DownloadError::Token(format!("control response unreadable: {e}")))?,
        };
        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| DownloadError::Token(format!("malformed control response: {e}")))?;

        if parsed.download_token.is_empty() {
            return Err(DownloadError::Token("empty download token received".into()).into());
        }
        Ok(parsed.download_token)
    }
}

#[async_trait]
impl MediaProvider for TokenApiProvider {
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
        // Another request may have finished this track while we waited.
        if let Some(path) = self.cache.lookup(&track.id, track.kind).await {
            log::info!("{}: using cached file for {}", self.name, track.id);
            return Ok(path);
        }

        log::info!("📥 {}: downloading {}", self.name, track.title);

        let token = self.request_token(ctx, &track.id, track.kind).await?;

        let url = format!(
            "{}/stream/{}?type={}&token={}",
            self.base_url,
            track.id,
            track.kind.as_str(),
            token,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;

    fn provider() -> TokenApiProvider {
        TokenApiProvider::new(
            "token-api",
            "https://api.example.com/",
            vec!["youtube".to_string()],
            Arc::new(DownloadCache::new("downloads")),
        )
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(provider().base_url, "https://api.example.com");
    }

    #[test]
    fn test_is_download_supported() {
        let p = provider();
        assert!(p.is_download_supported("youtube"));
        assert!(!p.is_download_supported("soundcloud"));
    }

    #[test]
    fn test_is_valid_always_false() {
        assert!(!provider().is_valid("never gonna give you up"));
    }

    #[tokio::test]
    async fn test_get_tracks_reports_capability_mismatch() {
        let err = provider()
            .get_tracks("query", &SearchOptions::default())
            .await
            .unwrap_err();
        match err {
            AppError::Download(DownloadError::NotSupported { provider, .. }) => {
                assert_eq!(provider, "token-api");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
