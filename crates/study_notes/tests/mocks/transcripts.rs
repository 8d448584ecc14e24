use std::sync::{Arc, Mutex};
use study_notes::{
    yt::{TranscriptFragment, TranscriptProvider, VideoId},
    TranscriptError,
};

#[derive(Clone)]
pub struct MockTranscripts {
    pub fragments: Vec<TranscriptFragment>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockTranscripts {
    pub fn new(texts: &[&str]) -> Self {
        let fragments = texts
            .iter()
            .enumerate()
            .map(|(i, text)| TranscriptFragment::new(*text, i as f64 * 2.0, 2.0))
            .collect();
        Self {
            fragments,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fragments: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl TranscriptProvider for MockTranscripts {
    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<TranscriptFragment>, TranscriptError> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(TranscriptError::Provider(msg.clone()));
        }
        Ok(self.fragments.clone())
    }
}
