use std::sync::Arc;

use axum::{
    extract::{FromRequest, Request, State},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{PipelineError, Stage},
    llm::generator::TextGenerator,
    processor::{DocumentOutcome, NotesRequest, StudyNotes},
    render::DocumentRenderer,
    yt::TranscriptProvider,
    NotesProcessor,
};

type SharedProcessor<T, G, R> = State<Arc<NotesProcessor<T, G, R>>>;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub stage: Stage,
}

/// JSON body extractor whose rejections use the [`ErrorResponse`] shape.
pub struct RequestJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for RequestJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error = rejection.body_text();
                tracing::warn!(%error, "Rejected request body");
                (
                    rejection.status(),
                    Json(ErrorResponse {
                        error,
                        stage: Stage::Request,
                    }),
                )
            })?;

        Ok(Self(value))
    }
}

/// Body of `POST /generate_notes`.
#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub title: String,
    pub content: String,
    pub questions: String,
    pub topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentOutcome>,
}

impl From<StudyNotes> for NotesResponse {
    fn from(notes: StudyNotes) -> Self {
        Self {
            title: format!("Notes for {}", notes.subject),
            content: notes.notes,
            questions: notes.questions,
            topics: vec![notes.subject],
            document: notes.document,
        }
    }
}

/// Body of `POST /generate`.
#[derive(Debug, Serialize)]
pub struct TranscriptNotesResponse {
    pub transcript: String,
    pub notes: String,
    pub questions: String,
}

impl From<StudyNotes> for TranscriptNotesResponse {
    fn from(notes: StudyNotes) -> Self {
        Self {
            transcript: notes.transcript,
            notes: notes.notes,
            questions: notes.questions,
        }
    }
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "Server is running!".into(),
    })
}

pub async fn generate_notes<T, G, R>(
    State(processor): SharedProcessor<T, G, R>,
    RequestJson(request): RequestJson<NotesRequest>,
) -> Result<Json<NotesResponse>, PipelineError>
where
    T: TranscriptProvider + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    R: DocumentRenderer + Send + Sync + 'static,
{
    let notes = processor.process(&request).await?;
    Ok(Json(notes.into()))
}

pub async fn generate<T, G, R>(
    State(processor): SharedProcessor<T, G, R>,
    RequestJson(request): RequestJson<NotesRequest>,
) -> Result<Json<TranscriptNotesResponse>, PipelineError>
where
    T: TranscriptProvider + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    R: DocumentRenderer + Send + Sync + 'static,
{
    let notes = processor.process(&request).await?;
    Ok(Json(notes.into()))
}
