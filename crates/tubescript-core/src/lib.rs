use serde::{Deserialize, Serialize};

pub mod lookup;
pub mod timefmt;
pub mod video_id;

pub use lookup::LookupOrchestrator;
pub use timefmt::format_timestamp;
pub use video_id::{extract_video_id, VideoId};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("No valid YouTube video ID found in URL")]
    InvalidUrl,
    #[error("transcript unavailable: {0}")]
    TranscriptUnavailable(String),
    #[error("Video not found or unavailable")]
    VideoNotFound,
    #[error("{0}")]
    Backend(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// One timed caption unit as the transcript backend returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Offset from the start of the video, in seconds.
    pub start: f64,
    pub duration: f64,
    /// Any other fields the backend attached; carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
            extra: serde_json::Map::new(),
        }
    }

    pub fn formatted(self) -> FormattedSegment {
        FormattedSegment {
            text: self.text,
            start: format_timestamp(self.start),
            duration: self.duration,
            extra: self.extra,
        }
    }
}

/// A [`TranscriptSegment`] whose `start` has been rendered as `MM:SS` / `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedSegment {
    pub text: String,
    pub start: String,
    pub duration: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: String,
    /// ISO-8601 duration code as reported by the API (e.g. `PT3M33S`).
    pub duration: String,
    pub view_count: String,
    pub like_count: String,
    pub comment_count: String,
}

impl Default for VideoMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            channel_title: String::new(),
            published_at: String::new(),
            duration: String::new(),
            view_count: "0".to_string(),
            like_count: "0".to_string(),
            comment_count: "0".to_string(),
        }
    }
}

/// Outcome of a single lookup. The JSON shape is the discriminant, so this
/// serializes untagged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LookupResult {
    Transcript {
        video_id: VideoId,
        transcript: Vec<FormattedSegment>,
    },
    Details {
        video_id: VideoId,
        video_details: VideoMetadata,
    },
    Failed {
        error: String,
    },
}

impl LookupResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Failed {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Pretty JSON with 2-space indentation (the tool's text payload).
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[async_trait::async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch the transcript in the first available language of `languages`.
    async fn fetch(&self, id: &VideoId, languages: &[String]) -> Result<Vec<TranscriptSegment>>;
}

#[async_trait::async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch_metadata(&self, id: &VideoId) -> Result<VideoMetadata>;
}
