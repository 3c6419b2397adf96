use serde::Deserialize;
use std::time::Instant;
use tubescript_core::{Error, MetadataFetcher, Result, VideoId, VideoMetadata};

use crate::config::Settings;

const VIDEO_PARTS: &str = "snippet,statistics,contentDetails";

/// YouTube Data API v3 `videos.list` client.
#[derive(Clone)]
pub struct YouTubeDataClient {
    client: reqwest::Client,
    api_key: String,
    api_base: url::Url,
}

impl std::fmt::Debug for YouTubeDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeDataClient")
            .field("api_base", &self.api_base.as_str())
            .finish_non_exhaustive()
    }
}

impl YouTubeDataClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, api_base: url::Url) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            api_base,
        }
    }

    pub fn from_settings(client: reqwest::Client, settings: &Settings) -> Self {
        Self::new(client, settings.api_key.clone(), settings.api_base.clone())
    }

    fn videos_endpoint(&self) -> String {
        format!("{}/videos", self.api_base.as_str().trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl MetadataFetcher for YouTubeDataClient {
    async fn fetch_metadata(&self, id: &VideoId) -> Result<VideoMetadata> {
        let t0 = Instant::now();
        let resp = self
            .client
            .get(self.videos_endpoint())
            .query(&[
                ("part", VIDEO_PARTS),
                ("id", id.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            // The request URL carries the API key; keep it out of error text.
            .map_err(|e| Error::Backend(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Backend(format!(
                "YouTube API request failed with status {}",
                status.as_u16()
            )));
        }

        let parsed: VideoListResponse = resp
            .json()
            .await
            .map_err(|e| Error::Backend(e.without_url().to_string()))?;
        let item = parsed
            .items
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(Error::VideoNotFound)?;
        tracing::debug!(
            video_id = %id,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "video details fetched"
        );
        Ok(item.into_metadata())
    }
}

#[derive(Debug, Default, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Option<Vec<VideoResource>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    #[serde(default)]
    snippet: Option<Snippet>,
    #[serde(default)]
    statistics: Option<Statistics>,
    #[serde(default)]
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: Option<String>,
    description: Option<String>,
    channel_title: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

impl VideoResource {
    fn into_metadata(self) -> VideoMetadata {
        let snippet = self.snippet.unwrap_or_default();
        let stats = self.statistics.unwrap_or_default();
        let details = self.content_details.unwrap_or_default();
        let d = VideoMetadata::default();
        VideoMetadata {
            title: snippet.title.unwrap_or(d.title),
            description: snippet.description.unwrap_or(d.description),
            channel_title: snippet.channel_title.unwrap_or(d.channel_title),
            published_at: snippet.published_at.unwrap_or(d.published_at),
            duration: details.duration.unwrap_or(d.duration),
            view_count: stats.view_count.unwrap_or(d.view_count),
            like_count: stats.like_count.unwrap_or(d.like_count),
            comment_count: stats.comment_count.unwrap_or(d.comment_count),
        }
    }
}
