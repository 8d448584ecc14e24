const NOTES_TEMPLATE: &str = include_str!("./prompts/notes.txt");
const QUESTIONS_TEMPLATE: &str = include_str!("./prompts/questions.txt");

/// Prompt asking for structured study notes over the full transcript.
pub fn notes_prompt(subject: &str, transcript: &str) -> String {
    // subject first so transcript text is never rewritten
    NOTES_TEMPLATE
        .replace("{subject}", subject)
        .replace("{transcript}", transcript)
}

/// Prompt asking for 5-7 numbered aptitude questions on `subject`.
pub fn questions_prompt(subject: &str) -> String {
    QUESTIONS_TEMPLATE.replace("{subject}", subject)
}
