use crate::llm::generator::GenerationFailure;

/// Why a transcript could not be produced for a video reference.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("could not find a video id in '{0}'")]
    MissingVideoId(String),
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("video is unavailable: {0}")]
    Unavailable(String),
    #[error("no transcript found for video {0}")]
    NoCaptions(String),
    #[error("{0}")]
    Parse(&'static str),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Provider(String),
}

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Decoding the request body, before any pipeline work
    Request,
    Transcript,
    NotesGeneration,
    QuestionsGeneration,
    Rendering,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Request => "request",
            Stage::Transcript => "transcript",
            Stage::NotesGeneration => "notes-generation",
            Stage::QuestionsGeneration => "questions-generation",
            Stage::Rendering => "rendering",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure that aborts the notes pipeline.
///
/// Rendering failures are deliberately absent: a document is an optional
/// by-product and is reported alongside a successful result instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Error fetching transcript: {0}")]
    Transcript(#[from] TranscriptError),
    #[error("{stage} failed: {failure}")]
    Generation {
        stage: Stage,
        failure: GenerationFailure,
    },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Transcript(_) => Stage::Transcript,
            PipelineError::Generation { stage, .. } => *stage,
        }
    }

    /// Whether repeating the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            PipelineError::Transcript(TranscriptError::Request(e)) => e.is_timeout() || e.is_connect(),
            PipelineError::Transcript(_) => false,
            PipelineError::Generation { failure, .. } => failure.is_transient(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
