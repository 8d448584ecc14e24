//! # Yt Parser
//!
//! Extracts caption track metadata from a YouTube watch page and turns the
//! `json3` timed-text payload into transcript fragments.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::{
    error::TranscriptError,
    types::{CaptionTrack, PlayerResponse, TimedText},
    yt::TranscriptFragment,
};

static YT_PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)ytInitialPlayerResponse\s*=\s*(\{.*?\})\s*;\s*(?:var\s+meta\b|</script>)")
        .unwrap()
});

/// Picks the caption track to fetch.
///
/// Preference order: a manual track in `language`, a generated track in
/// `language`, then the first listed track.
pub fn select_caption_track<'a>(
    tracks: &'a [CaptionTrack],
    language: &str,
) -> Option<&'a CaptionTrack> {
    let in_language = |t: &&CaptionTrack| t.language_code.eq_ignore_ascii_case(language);

    tracks
        .iter()
        .filter(in_language)
        .find(|t| !t.is_generated())
        .or_else(|| tracks.iter().find(in_language))
        .or_else(|| tracks.first())
}

/// Checks playability and returns the caption tracks of a player response.
pub fn caption_tracks(
    video_id: &str,
    player: PlayerResponse,
) -> Result<Vec<CaptionTrack>, TranscriptError> {
    if let Some(status) = &player.playability_status {
        if status.status != "OK" {
            let reason = status.reason.clone().unwrap_or_else(|| status.status.clone());
            return Err(TranscriptError::Unavailable(reason));
        }
    }

    let tracks = player
        .captions
        .map(|c| c.tracklist.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TranscriptError::NoCaptions(video_id.to_string()));
    }

    Ok(tracks)
}

/// Converts a `json3` timed-text payload into fragments.
///
/// Events without segments (window and style events) are skipped, as are
/// events whose text is only whitespace.
pub fn parse_timed_text(timed_text: TimedText) -> Vec<TranscriptFragment> {
    timed_text
        .events
        .into_iter()
        .filter_map(|event| {
            let raw: String = event.segs?.into_iter().map(|s| s.utf8).collect();
            let text = clean_fragment_text(&raw);
            if text.is_empty() {
                return None;
            }
            Some(TranscriptFragment::new(
                text,
                event.t_start_ms as f64 / 1000.0,
                event.d_duration_ms as f64 / 1000.0,
            ))
        })
        .collect()
}

fn clean_fragment_text(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace('\n', " ")
        .trim()
        .to_string()
}

pub struct YtWatchPage(String);

impl Deref for YtWatchPage {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl YtWatchPage {
    pub fn to_json<T>(&self) -> Result<T, TranscriptError>
    where
        T: DeserializeOwned,
    {
        YT_PLAYER_RESPONSE_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
            .ok_or(TranscriptError::Parse(
                "Failed to extract ytInitialPlayerResponse from the watch page",
            ))
    }
}

impl From<String> for YtWatchPage {
    fn from(value: String) -> Self {
        YtWatchPage(value)
    }
}
