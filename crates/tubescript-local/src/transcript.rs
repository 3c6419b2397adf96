//! Transcript backend over `yt-transcript-rs`.
//!
//! The backend owns its own retry/proxy behavior (Webshare retries when blocked).
//! We add nothing on top: any failure becomes one `TranscriptUnavailable`.

use tubescript_core::{Error, Result, TranscriptFetcher, TranscriptSegment, VideoId};
use yt_transcript_rs::proxies::{ProxyConfig, WebshareProxyConfig};
use yt_transcript_rs::YouTubeTranscriptApi;

use crate::config::ProxyCredentials;

pub struct YtTranscriptBackend {
    api: YouTubeTranscriptApi,
    proxied: bool,
}

impl YtTranscriptBackend {
    pub fn new(proxy: Option<&ProxyCredentials>) -> Result<Self> {
        let proxy_config: Option<Box<dyn ProxyConfig + Send + Sync>> = proxy.map(|p| {
            tracing::info!(
                retries_when_blocked = p.retries_when_blocked,
                "transcript backend using webshare proxy"
            );
            Box::new(WebshareProxyConfig::new(
                p.username.clone(),
                p.password.clone(),
                i32::try_from(p.retries_when_blocked).unwrap_or(i32::MAX),
                None,
                None,
            )) as Box<dyn ProxyConfig + Send + Sync>
        });
        if proxy_config.is_none() {
            tracing::info!("transcript backend without proxy");
        }
        let proxied = proxy_config.is_some();
        let api = YouTubeTranscriptApi::new(None, proxy_config, None)
            .map_err(|e| Error::NotConfigured(format!("transcript backend: {e}")))?;
        Ok(Self { api, proxied })
    }

    pub fn is_proxied(&self) -> bool {
        self.proxied
    }
}

#[async_trait::async_trait]
impl TranscriptFetcher for YtTranscriptBackend {
    async fn fetch(&self, id: &VideoId, languages: &[String]) -> Result<Vec<TranscriptSegment>> {
        let langs: Vec<&str> = languages.iter().map(String::as_str).collect();
        let fetched = self
            .api
            .fetch_transcript(id.as_str(), &langs, false)
            .await
            .map_err(|e| Error::TranscriptUnavailable(e.to_string()))?;
        let segments: Vec<TranscriptSegment> = fetched
            .parts()
            .iter()
            .map(|p| TranscriptSegment::new(p.text.clone(), p.start, p.duration))
            .collect();
        tracing::debug!(video_id = %id, segments = segments.len(), "transcript fetched");
        Ok(segments)
    }
}
