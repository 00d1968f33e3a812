use std::fmt;
use std::time::Duration;

use crate::core::config;

/// Source platform name for tracks resolved from YouTube.
pub const SOURCE_YOUTUBE: &str = "youtube";

/// Media kind of a track: audio-only or full video.
///
/// Drives the wire value sent to provider APIs, the cache file extension,
/// and the data-plane timeout (video payloads are larger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaKind {
    #[default]
    Audio,
    Video,
}

impl MediaKind {
    /// Value used in provider API query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    /// Cache file extension for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Audio => "mp3",
            MediaKind::Video => "mp4",
        }
    }

    /// Data-plane timeout for streaming a payload of this kind.
    pub fn stream_timeout(&self) -> Duration {
        match self {
            MediaKind::Audio => config::stream::audio_timeout(),
            MediaKind::Video => config::stream::video_timeout(),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved media track to be downloaded.
///
/// Produced by whichever component resolved the user's request (search,
/// URL parsing, playlist expansion); read-only to the download engine.
/// The `id` is an opaque identifier already normalized by the resolver
/// and is assumed unique within the cache namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Opaque track identifier (e.g. a video id)
    pub id: String,
    /// Display title
    pub title: String,
    /// Audio or video
    pub kind: MediaKind,
    /// Name of the source platform the track was resolved from
    pub source: String,
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: MediaKind,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            source: source.into(),
        }
    }
}

/// Options for provider track search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Prefer video results over audio
    pub video: bool,
    /// Cap on the number of returned tracks
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_as_str() {
        assert_eq!(MediaKind::Audio.as_str(), "audio");
        assert_eq!(MediaKind::Video.as_str(), "video");
    }

    #[test]
    fn test_media_kind_extension() {
        assert_eq!(MediaKind::Audio.extension(), "mp3");
        assert_eq!(MediaKind::Video.extension(), "mp4");
    }

    #[test]
    fn test_media_kind_display() {
        assert_eq!(MediaKind::Audio.to_string(), "audio");
        assert_eq!(MediaKind::Video.to_string(), "video");
    }

    #[test]
    fn test_media_kind_default() {
        assert_eq!(MediaKind::default(), MediaKind::Audio);
    }

    #[test]
    fn test_video_timeout_longer_than_audio() {
        assert!(MediaKind::Video.stream_timeout() > MediaKind::Audio.stream_timeout());
    }

    #[test]
    fn test_track_new() {
        let track = Track::new("abc123", "Some Song", MediaKind::Audio, SOURCE_YOUTUBE);
        assert_eq!(track.id, "abc123");
        assert_eq!(track.title, "Some Song");
        assert_eq!(track.kind, MediaKind::Audio);
        assert_eq!(track.source, "youtube");
    }
}
