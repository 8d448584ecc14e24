use std::{fmt::Debug, future::Future};

pub trait TextGenerator {
    const GENERATION_MODEL: &'static str;

    type Error: Into<GenerationFailure> + Debug + Send;

    /// Sends `prompt` in a single round trip and returns the raw model text.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Timeouts, connection failures, rate limits and provider 5xx
    Transient,
    Permanent,
}

/// Provider-agnostic classification of a failed generation call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct GenerationFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl GenerationFailure {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transient,
            message: message.into(),
        }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Permanent,
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == FailureKind::Transient
    }
}
