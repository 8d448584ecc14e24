use std::ops::Deref;

use crate::{
    error::TranscriptError,
    parser::{caption_tracks, parse_timed_text, select_caption_track, YtWatchPage},
    types::{PlayerResponse, TimedText},
    yt::{TranscriptFragment, TranscriptProvider, VideoId},
};

/// Fetches captions straight from the public YouTube watch page.
#[derive(Debug, Clone)]
pub struct YouTubeTranscripts {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl Deref for YouTubeTranscripts {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl YouTubeTranscripts {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: "https://www.youtube.com".into(),
            language: "en".into(),
        }
    }

    /// Origin the watch page is fetched from. Caption urls come from the
    /// page itself.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Preferred caption language; other languages are used when missing.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_watch_page(&self, video_id: &VideoId) -> Result<YtWatchPage, TranscriptError> {
        let page = self
            .get(format!("{}/watch", self.base_url.trim_end_matches('/')))
            .query(&[("v", &**video_id)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(page.into())
    }
}

impl TranscriptProvider for YouTubeTranscripts {
    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<TranscriptFragment>, TranscriptError> {
        let page = self.fetch_watch_page(video_id).await?;
        let player = page.to_json::<PlayerResponse>()?;
        let tracks = caption_tracks(video_id, player)?;

        let track = select_caption_track(&tracks, &self.language)
            .ok_or_else(|| TranscriptError::NoCaptions(video_id.to_string()))?;
        tracing::debug!(
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        let timed_text = self
            .get(&track.base_url)
            .query(&[("fmt", "json3")])
            .send()
            .await?
            .error_for_status()?
            .json::<TimedText>()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to decode timed text"))?;

        let fragments = parse_timed_text(timed_text);
        if fragments.is_empty() {
            return Err(TranscriptError::NoCaptions(video_id.to_string()));
        }

        Ok(fragments)
    }
}
