//! YouTube video id extraction.
//!
//! Matchers run in a fixed order and the first hit wins. The URL is not trimmed or
//! normalized; anything that doesn't contain a recognizable shape is rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::{Error, Result};

pub const VIDEO_ID_LEN: usize = 11;

/// An 11-character YouTube video identifier (`[A-Za-z0-9_-]{11}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Accept a bare id. Anything other than exactly 11 id characters is rejected.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() == VIDEO_ID_LEN && s.bytes().all(is_id_byte) {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::InvalidUrl)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_id_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

struct Matcher {
    name: &'static str,
    re: Regex,
}

static MATCHERS: Lazy<Vec<Matcher>> = Lazy::new(|| {
    [
        (
            // watch?v=, youtu.be/, embed/, v/, shorts/
            "direct",
            r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)([a-zA-Z0-9_-]{11})",
        ),
        ("query", r"youtube\.com/.*[?&]v=([a-zA-Z0-9_-]{11})"),
    ]
    .into_iter()
    .filter_map(|(name, pat)| Regex::new(pat).ok().map(|re| Matcher { name, re }))
    .collect()
});

/// Pull the video id out of a YouTube URL.
pub fn extract_video_id(url: &str) -> Result<VideoId> {
    for m in MATCHERS.iter() {
        if let Some(id) = m.re.captures(url).and_then(|c| c.get(1)) {
            tracing::debug!(matcher = m.name, video_id = id.as_str(), "video id matched");
            return Ok(VideoId(id.as_str().to_string()));
        }
    }
    Err(Error::InvalidUrl)
}
