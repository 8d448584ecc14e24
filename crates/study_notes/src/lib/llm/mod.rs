pub mod gemini;
pub mod generator;
pub mod prompts;
