use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the download engine

/// Download folder path
/// Read from DOWNLOAD_FOLDER environment variable
/// Defaults to "downloads" relative to the working directory
pub static DOWNLOAD_FOLDER: Lazy<String> =
    Lazy::new(|| env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "downloads".to_string()));

/// Base URL of the token-based download API
/// Read from TOKEN_API_URL environment variable
/// When unset, the token provider is not registered by `default_registry`
pub static TOKEN_API_URL: Lazy<Option<String>> =
    Lazy::new(|| env::var("TOKEN_API_URL").ok().filter(|v| !v.is_empty()));

/// Base URL of the direct download API
/// Read from DIRECT_API_URL environment variable
/// When unset, the direct provider is not registered by `default_registry`
pub static DIRECT_API_URL: Lazy<Option<String>> =
    Lazy::new(|| env::var("DIRECT_API_URL").ok().filter(|v| !v.is_empty()));

/// Static API key for the direct download API
/// Read from DIRECT_API_KEY environment variable
pub static DIRECT_API_KEY: Lazy<String> =
    Lazy::new(|| env::var("DIRECT_API_KEY").unwrap_or_default());

/// Provider priorities for the default registry.
/// Higher values are tried earlier when several providers can serve
/// the same source platform.
pub mod priority {
    /// Direct API: cheapest path, single round-trip
    pub const DIRECT_API: i32 = 100;

    /// Token API: two round-trips, tried after the direct API
    pub const TOKEN_API: i32 = 75;
}

/// Streaming transfer configuration
pub mod stream {
    use super::Duration;

    /// Timeout for the control-plane token request (in seconds)
    pub const TOKEN_TIMEOUT_SECS: u64 = 7;

    /// Timeout for streaming an audio payload (in seconds)
    pub const AUDIO_TIMEOUT_SECS: u64 = 300; // 5 minutes

    /// Timeout for streaming a video payload (in seconds)
    pub const VIDEO_TIMEOUT_SECS: u64 = 600; // 10 minutes

    /// TCP connect timeout shared by all phases (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;

    /// Maximum number of redirects followed on the data plane
    pub const MAX_REDIRECTS: usize = 10;

    /// Chunk size for streaming reads (16 KiB)
    pub const CHUNK_SIZE: usize = 16 * 1024;

    /// Token request timeout duration
    pub fn token_timeout() -> Duration {
        Duration::from_secs(TOKEN_TIMEOUT_SECS)
    }

    /// Audio stream timeout duration
    pub fn audio_timeout() -> Duration {
        Duration::from_secs(AUDIO_TIMEOUT_SECS)
    }

    /// Video stream timeout duration
    pub fn video_timeout() -> Duration {
        Duration::from_secs(VIDEO_TIMEOUT_SECS)
    }

    /// Connect timeout duration
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}
