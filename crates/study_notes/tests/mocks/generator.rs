use std::sync::{Arc, Mutex};
use study_notes::{GenerationFailure, TextGenerator};

/// Echoes the prompt length, optionally failing from the `fail_from`-th call on.
#[derive(Clone)]
pub struct MockGenerator {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_from: Option<(usize, GenerationFailure)>,
    pub decorate: bool,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_from: None,
            decorate: false,
        }
    }
}

impl MockGenerator {
    pub fn failing(failure: GenerationFailure) -> Self {
        Self::failing_from(0, failure)
    }

    pub fn failing_from(call_idx: usize, failure: GenerationFailure) -> Self {
        Self {
            fail_from: Some((call_idx, failure)),
            ..Default::default()
        }
    }

    /// Wraps replies in markdown bold, emoji and blank lines
    pub fn decorated() -> Self {
        Self {
            decorate: true,
            ..Default::default()
        }
    }
}

impl TextGenerator for MockGenerator {
    const GENERATION_MODEL: &'static str = "mock-gemini";
    type Error = GenerationFailure;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let call_idx = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(prompt.to_string());
            calls.len() - 1
        };

        if let Some((from, failure)) = &self.fail_from {
            if call_idx >= *from {
                return Err(failure.clone());
            }
        }

        let reply = format!("prompt length {}", prompt.len());
        if self.decorate {
            return Ok(format!("**Heading** 🚀\n\n\n{reply}\n"));
        }
        Ok(reply)
    }
}
