pub mod builder;

use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    error::{PipelineError, RenderError, Stage},
    llm::{
        generator::{GenerationFailure, TextGenerator},
        prompts::{notes_prompt, questions_prompt},
    },
    normalize::clean_text,
    render::{DocumentRenderer, NotesDocument},
    yt::{join_fragments, TranscriptProvider, VideoId},
};

#[derive(Debug, Clone, Deserialize)]
pub struct NotesRequest {
    pub youtube_url: String,
    pub subject: String,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct StudyNotes {
    pub subject: String,
    pub transcript: String,
    pub notes: String,
    pub questions: String,
    /// `None` when document rendering is disabled
    pub document: Option<DocumentOutcome>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum DocumentOutcome {
    Rendered { path: PathBuf },
    Failed { stage: Stage, error: String },
}

/// Turns a video reference and a subject into study notes and questions.
#[derive(Debug)]
pub struct NotesProcessor<T, G, R>
where
    T: TranscriptProvider + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    R: DocumentRenderer + Send + Sync + 'static,
{
    transcripts: T,
    generator: G,
    renderer: Arc<R>,
    render_documents: bool,
    parallel_generation: bool,
}

impl<T, G, R> NotesProcessor<T, G, R>
where
    T: TranscriptProvider + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    R: DocumentRenderer + Send + Sync + 'static,
{
    /// Fetches the transcript and joins it into a single text blob
    #[tracing::instrument(skip(self))]
    async fn fetch_transcript(&self, reference: &str) -> Result<String, PipelineError> {
        let video_id = VideoId::extract(reference)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected video reference"))?;

        let fragments = self
            .transcripts
            .fetch_transcript(&video_id)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, %video_id, "Failed to fetch transcript"))?;

        tracing::info!(%video_id, fragments = fragments.len(), "Fetched transcript");
        Ok(join_fragments(&fragments))
    }

    #[tracing::instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, stage: Stage, prompt: String) -> Result<String, PipelineError> {
        let raw = self.generator.generate(&prompt).await.map_err(|e| {
            let failure: GenerationFailure = e.into();
            tracing::error!(error = %failure, transient = failure.is_transient(), "Generation failed");
            PipelineError::Generation { stage, failure }
        })?;

        Ok(clean_text(&raw))
    }

    async fn generate_notes(&self, subject: &str, transcript: &str) -> Result<String, PipelineError> {
        self.generate(Stage::NotesGeneration, notes_prompt(subject, transcript))
            .await
    }

    async fn generate_questions(&self, subject: &str) -> Result<String, PipelineError> {
        self.generate(Stage::QuestionsGeneration, questions_prompt(subject))
            .await
    }

    /// Runs the renderer on the blocking pool; layout and file IO are
    /// synchronous.
    async fn render(&self, document: NotesDocument) -> DocumentOutcome {
        let renderer = Arc::clone(&self.renderer);
        let rendered = tokio::task::spawn_blocking(move || renderer.render(&document))
            .await
            .map_err(RenderError::from)
            .and_then(|result| result);

        match rendered {
            Ok(path) => DocumentOutcome::Rendered { path },
            Err(e) => {
                tracing::error!(error = %e, "Failed to render notes document");
                DocumentOutcome::Failed {
                    stage: Stage::Rendering,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Runs transcript retrieval, notes generation and question generation.
    ///
    /// A transcript failure short-circuits before the generator is called.
    /// Rendering never fails the run; its outcome is attached to the result.
    #[tracing::instrument(skip_all, fields(subject = %request.subject))]
    pub async fn process(&self, request: &NotesRequest) -> Result<StudyNotes, PipelineError> {
        let subject = request.subject.as_str();
        let transcript = self.fetch_transcript(&request.youtube_url).await?;

        let (notes, questions) = if self.parallel_generation {
            let (notes, questions) = tokio::join!(
                self.generate_notes(subject, &transcript),
                self.generate_questions(subject)
            );
            (notes?, questions?)
        } else {
            let notes = self.generate_notes(subject, &transcript).await?;
            let questions = self.generate_questions(subject).await?;
            (notes, questions)
        };

        let document = if self.render_documents {
            let document = NotesDocument {
                subject: subject.to_string(),
                notes: notes.clone(),
                questions: questions.clone(),
            };
            Some(self.render(document).await)
        } else {
            None
        };

        Ok(StudyNotes {
            subject: subject.to_string(),
            transcript,
            notes,
            questions,
            document,
        })
    }
}
