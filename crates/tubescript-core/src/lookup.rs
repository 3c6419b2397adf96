//! Lookup pipeline: extract id -> transcript -> (fallback) metadata.
//!
//! Every path ends in a [`LookupResult`]; component errors never leave this module.

use std::sync::Arc;

use crate::{
    extract_video_id, Error, LookupResult, MetadataFetcher, TranscriptFetcher, TranscriptSegment,
};

#[derive(Clone)]
pub struct LookupOrchestrator {
    transcripts: Arc<dyn TranscriptFetcher>,
    metadata: Arc<dyn MetadataFetcher>,
    languages: Vec<String>,
}

impl LookupOrchestrator {
    pub fn new(
        transcripts: Arc<dyn TranscriptFetcher>,
        metadata: Arc<dyn MetadataFetcher>,
        languages: Vec<String>,
    ) -> Self {
        Self {
            transcripts,
            metadata,
            languages,
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub async fn lookup(&self, url: &str) -> LookupResult {
        let video_id = match extract_video_id(url) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(url, error = %e, "invalid youtube url");
                return LookupResult::error(format!("Invalid YouTube URL: {e}"));
            }
        };
        tracing::info!(video_id = %video_id, "looking up transcript");

        match self.transcripts.fetch(&video_id, &self.languages).await {
            Ok(segments) => LookupResult::Transcript {
                video_id,
                transcript: segments
                    .into_iter()
                    .map(TranscriptSegment::formatted)
                    .collect(),
            },
            Err(transcript_err) => {
                tracing::warn!(
                    video_id = %video_id,
                    error = %transcript_err,
                    "transcript fetch failed; falling back to video details"
                );
                match self.metadata.fetch_metadata(&video_id).await {
                    Ok(video_details) => LookupResult::Details {
                        video_id,
                        video_details,
                    },
                    Err(e) => {
                        tracing::error!(url, error = %e, "lookup failed");
                        failed(&e)
                    }
                }
            }
        }
    }
}

fn failed(e: &Error) -> LookupResult {
    LookupResult::error(format!("Failed to process request: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Result, VideoId, VideoMetadata};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeTranscripts {
        result: Result<Vec<TranscriptSegment>>,
        calls: AtomicUsize,
        seen_languages: Mutex<Vec<String>>,
    }

    impl FakeTranscripts {
        fn new(result: Result<Vec<TranscriptSegment>>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
                seen_languages: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl TranscriptFetcher for FakeTranscripts {
        async fn fetch(&self, _id: &VideoId, languages: &[String]) -> Result<Vec<TranscriptSegment>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_languages.lock().unwrap() = languages.to_vec();
            self.result.clone()
        }
    }

    struct FakeMetadata {
        result: Result<VideoMetadata>,
        calls: AtomicUsize,
    }

    impl FakeMetadata {
        fn new(result: Result<VideoMetadata>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl MetadataFetcher for FakeMetadata {
        async fn fetch_metadata(&self, _id: &VideoId) -> Result<VideoMetadata> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    fn rick() -> VideoMetadata {
        VideoMetadata {
            title: "Never Gonna Give You Up".to_string(),
            ..Default::default()
        }
    }

    fn orchestrator(
        t: &Arc<FakeTranscripts>,
        m: &Arc<FakeMetadata>,
    ) -> LookupOrchestrator {
        LookupOrchestrator::new(
            t.clone(),
            m.clone(),
            vec!["de".to_string(), "en".to_string()],
        )
    }

    #[tokio::test]
    async fn transcript_success_formats_start_and_skips_metadata() {
        let t = FakeTranscripts::new(Ok(vec![
            TranscriptSegment::new("Hi", 5.0, 2.0),
            TranscriptSegment::new("there", 3725.4, 1.25),
        ]));
        let m = FakeMetadata::new(Ok(rick()));
        let r = orchestrator(&t, &m).lookup(URL).await;

        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["video_id"], "dQw4w9WgXcQ");
        assert_eq!(v["transcript"][0]["text"], "Hi");
        assert_eq!(v["transcript"][0]["start"], "00:05");
        assert_eq!(v["transcript"][0]["duration"], 2.0);
        assert_eq!(v["transcript"][1]["text"], "there");
        assert_eq!(v["transcript"][1]["start"], "01:02:05");
        assert_eq!(v["transcript"][1]["duration"], 1.25);
        assert!(v.get("video_details").is_none());

        assert_eq!(t.calls.load(Ordering::SeqCst), 1);
        assert_eq!(m.calls.load(Ordering::SeqCst), 0);
        assert_eq!(*t.seen_languages.lock().unwrap(), vec!["de", "en"]);
    }

    #[tokio::test]
    async fn empty_transcript_is_still_a_transcript() {
        let t = FakeTranscripts::new(Ok(Vec::new()));
        let m = FakeMetadata::new(Ok(rick()));
        let r = orchestrator(&t, &m).lookup(URL).await;
        assert!(matches!(r, LookupResult::Transcript { ref transcript, .. } if transcript.is_empty()));
        assert_eq!(m.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transcript_failure_falls_back_to_details_once() {
        let t = FakeTranscripts::new(Err(Error::TranscriptUnavailable(
            "no captions".to_string(),
        )));
        let m = FakeMetadata::new(Ok(rick()));
        let r = orchestrator(&t, &m).lookup(URL).await;

        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["video_id"], "dQw4w9WgXcQ");
        assert_eq!(v["video_details"]["title"], "Never Gonna Give You Up");
        assert_eq!(v["video_details"]["view_count"], "0");
        assert!(v.get("transcript").is_none());
        assert_eq!(m.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn both_failing_yields_error_variant() {
        let t = FakeTranscripts::new(Err(Error::TranscriptUnavailable("blocked".to_string())));
        let m = FakeMetadata::new(Err(Error::VideoNotFound));
        let r = orchestrator(&t, &m).lookup(URL).await;
        assert_eq!(
            r,
            LookupResult::error("Failed to process request: Video not found or unavailable")
        );
        assert_eq!(m.calls.load(Ordering::SeqCst), 1);

        let m = FakeMetadata::new(Err(Error::Backend(
            "YouTube API request failed with status 403".to_string(),
        )));
        let r = orchestrator(&t, &m).lookup(URL).await;
        assert_eq!(
            r,
            LookupResult::error(
                "Failed to process request: YouTube API request failed with status 403"
            )
        );
    }

    #[tokio::test]
    async fn invalid_url_short_circuits() {
        let t = FakeTranscripts::new(Ok(Vec::new()));
        let m = FakeMetadata::new(Ok(rick()));
        let r = orchestrator(&t, &m).lookup("not a url").await;
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            serde_json::json!({ "error": "Invalid YouTube URL: No valid YouTube video ID found in URL" })
        );
        assert_eq!(t.calls.load(Ordering::SeqCst), 0);
        assert_eq!(m.calls.load(Ordering::SeqCst), 0);
    }
}
