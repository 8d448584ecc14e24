pub mod transcript;

use std::{future::Future, ops::Deref, sync::LazyLock};

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TranscriptError;

static BARE_VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

pub trait TranscriptProvider {
    /// Returns the timed caption fragments of a video, in playback order.
    fn fetch_transcript(
        &self,
        video_id: &VideoId,
    ) -> impl Future<Output = Result<Vec<TranscriptFragment>, TranscriptError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    pub text: String,
    /// Offset from the start of the video, in seconds
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub duration: f64,
}

impl TranscriptFragment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Joins fragment texts with single spaces, preserving order.
pub fn join_fragments(fragments: &[TranscriptFragment]) -> String {
    fragments.iter().map(|f| f.text.as_str()).join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl Deref for VideoId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl VideoId {
    const WATCH_MARKER: &str = "v=";
    const SHORT_LINK_MARKER: &str = "youtu.be/";

    /// Derives the video id from a watch url (`...watch?v=<id>`), a short
    /// link (`youtu.be/<id>`) or a bare 11 character id.
    ///
    /// For watch urls the id is whatever follows the first `v=`, cut at the
    /// next query or fragment separator.
    pub fn extract(reference: &str) -> Result<Self, TranscriptError> {
        let reference = reference.trim();

        let candidate = if let Some((_, rest)) = reference.split_once(Self::WATCH_MARKER) {
            rest
        } else if let Some((_, rest)) = reference.split_once(Self::SHORT_LINK_MARKER) {
            rest
        } else if BARE_VIDEO_ID_RE.is_match(reference) {
            reference
        } else {
            return Err(TranscriptError::MissingVideoId(reference.to_string()));
        };

        let id = candidate
            .split(['&', '#', '?', '/'])
            .next()
            .unwrap_or_default();

        if id.is_empty() {
            return Err(TranscriptError::MissingVideoId(reference.to_string()));
        }

        Ok(VideoId(id.to_string()))
    }
}
