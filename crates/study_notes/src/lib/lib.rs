mod error;
mod llm;
pub mod normalize;
pub mod parser;
mod processor;
pub mod render;
pub mod server;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::{PipelineError, RenderError, Stage, TranscriptError};
pub use llm::{
    gemini,
    generator::{FailureKind, GenerationFailure, TextGenerator},
    prompts,
};
pub use processor::{
    builder::NotesProcessorBuilder, DocumentOutcome, NotesProcessor, NotesRequest, StudyNotes,
};
