//! Download provider abstraction layer.
//!
//! Provides the `MediaProvider` trait for implementing pluggable backing
//! services and a `ProviderRegistry` for priority-based routing. New
//! providers are added by implementing `MediaProvider` and registering
//! them with a priority; the registry answers "which providers, in
//! order, can download from source X".
//!
//! Built-in providers (both download-only, both serving tracks resolved
//! from YouTube):
//! - `DirectApiProvider` - one authenticated GET, streamed to disk
//! - `TokenApiProvider` - token handshake, then a streamed data plane

pub mod direct;
pub mod token_api;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::config;
use crate::core::error::AppResult;
use crate::core::types::{SearchOptions, Track, SOURCE_YOUTUBE};
use crate::download::cache::DownloadCache;
use crate::download::progress::ProgressSink;

pub use direct::DirectApiProvider;
pub use token_api::TokenApiProvider;

/// Capability set implemented once per backing service.
///
/// A provider value is created at process start, never mutated, and
/// shared read-only across all requests.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Stable identifier of this provider (e.g. "token-api")
    fn name(&self) -> &str;

    /// Whether this provider can resolve a free-text query into tracks.
    /// Download-only providers always return false.
    fn is_valid(&self, query: &str) -> bool;

    /// Resolve a free-text query into tracks.
    /// Download-only providers fail with a capability error.
    async fn get_tracks(&self, query: &str, options: &SearchOptions) -> AppResult<Vec<Track>>;

    /// Whether this provider can download tracks that were resolved on
    /// the given source platform.
    fn is_download_supported(&self, source: &str) -> bool;

    /// Download the track, returning the local file path.
    ///
    /// `progress` is fire-and-forget; an ignored sink must not block or
    /// fail the download.
    async fn download(
        &self,
        ctx: &CancellationToken,
        track: &Track,
        progress: &ProgressSink,
    ) -> AppResult<PathBuf>;
}

struct Registered {
    priority: i32,
    provider: Arc<dyn MediaProvider>,
}

/// Ordered collection of providers, sorted by priority descending.
///
/// Built once by the composition root before any request is served and
/// read-only afterwards, so lookups take no locks.
pub struct ProviderRegistry {
    entries: Vec<Registered>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a provider. Higher priority is tried earlier; equal
    /// priorities keep registration order.
    pub fn register(&mut self, priority: i32, provider: Arc<dyn MediaProvider>) {
        self.entries.push(Registered { priority, provider });
        // Stable sort: ties stay in registration order.
        self.entries
            .sort_by_key(|entry| std::cmp::Reverse(entry.priority));
    }

    /// Providers able to download from the given source platform, in
    /// registry order. Empty when none match; that is not an error.
    pub fn candidates_for(&self, source: &str) -> Vec<Arc<dyn MediaProvider>> {
        self.entries
            .iter()
            .filter(|entry| entry.provider.is_download_supported(source))
            .map(|entry| Arc::clone(&entry.provider))
            .collect()
    }

    /// All registered providers in registry order.
    pub fn providers(&self) -> impl Iterator<Item = &Arc<dyn MediaProvider>> {
        self.entries.iter().map(|entry| &entry.provider)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assemble the registry from configuration.
    ///
    /// Only providers whose endpoints are configured get registered;
    /// priorities come from `config::priority`. Tests build their own
    /// registries directly instead.
    pub fn from_config(cache: &Arc<DownloadCache>) -> AppResult<Self> {
        let mut registry = Self::new();

        if let Some(base_url) = config::DIRECT_API_URL.as_deref() {
            registry.register(
                config::priority::DIRECT_API,
                Arc::new(DirectApiProvider::new(
                    "direct-api",
                    base_url,
                    config::DIRECT_API_KEY.as_str(),
                    vec![SOURCE_YOUTUBE.to_string()],
                    Arc::clone(cache),
                )?),
            );
        }

        if let Some(base_url) = config::TOKEN_API_URL.as_deref() {
            registry.register(
                config::priority::TOKEN_API,
                Arc::new(TokenApiProvider::new(
                    "token-api",
                    base_url,
                    vec![SOURCE_YOUTUBE.to_string()],
                    Arc::clone(cache),
                )?),
            );
        }

        Ok(registry)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct StubProvider {
        name: String,
        sources: Vec<String>,
    }

    impl StubProvider {
        fn new(name: &str, sources: &[&str]) -> Arc<dyn MediaProvider> {
            Arc::new(Self {
                name: name.to_string(),
                sources: sources.iter().map(|s| s.to_string()).collect(),
            })
        }
    }

    #[async_trait]
    impl MediaProvider for StubProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn is_valid(&self, _query: &str) -> bool {
            false
        }

        async fn get_tracks(
            &self,
            _query: &str,
            _options: &SearchOptions,
        ) -> AppResult<Vec<Track>> {
            Ok(Vec::new())
        }

        fn is_download_supported(&self, source: &str) -> bool {
            self.sources.iter().any(|s| s == source)
        }

        async fn download(
            &self,
            _ctx: &CancellationToken,
            _track: &Track,
            _progress: &ProgressSink,
        ) -> AppResult<PathBuf> {
            Ok(PathBuf::new())
        }
    }

    fn names(providers: &[Arc<dyn MediaProvider>]) -> Vec<&str> {
        providers.iter().map(|p| p.name()).collect()
    }

    #[test]
    fn test_candidates_sorted_by_priority_descending() {
        let mut registry = ProviderRegistry::new();
        registry.register(65, StubProvider::new("low", &["youtube"]));
        registry.register(100, StubProvider::new("high", &["youtube"]));
        registry.register(75, StubProvider::new("mid", &["youtube"]));

        let candidates = registry.candidates_for("youtube");
        assert_eq!(names(&candidates), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_equal_priorities_keep_registration_order() {
        let mut registry = ProviderRegistry::new();
        registry.register(50, StubProvider::new("first", &["youtube"]));
        registry.register(50, StubProvider::new("second", &["youtube"]));
        registry.register(50, StubProvider::new("third", &["youtube"]));

        let candidates = registry.candidates_for("youtube");
        assert_eq!(names(&candidates), vec!["first", "second", "third"]);

        let all: Vec<&str> = registry.providers().map(|p| p.name()).collect();
        assert_eq!(all, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_candidates_filtered_by_source() {
        let mut registry = ProviderRegistry::new();
        registry.register(100, StubProvider::new("yt-only", &["youtube"]));
        registry.register(80, StubProvider::new("sc-only", &["soundcloud"]));
        registry.register(60, StubProvider::new("both", &["youtube", "soundcloud"]));

        assert_eq!(
            names(&registry.candidates_for("youtube")),
            vec!["yt-only", "both"]
        );
        assert_eq!(
            names(&registry.candidates_for("soundcloud")),
            vec!["sc-only", "both"]
        );
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let mut registry = ProviderRegistry::new();
        registry.register(100, StubProvider::new("yt-only", &["youtube"]));

        assert!(registry.candidates_for("bandcamp").is_empty());
    }

    #[test]
    fn test_empty_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.candidates_for("youtube").is_empty());
    }
}
