use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    thread::ThreadId,
};
use study_notes::{
    render::{document_file_name, DocumentRenderer, NotesDocument},
    RenderError,
};

#[derive(Clone, Default)]
pub struct MockRenderer {
    pub calls: Arc<Mutex<Vec<NotesDocument>>>,
    pub threads: Arc<Mutex<Vec<ThreadId>>>,
    pub fail_with: Option<String>,
}

impl MockRenderer {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl DocumentRenderer for MockRenderer {
    fn render(&self, document: &NotesDocument) -> Result<PathBuf, RenderError> {
        self.calls.lock().unwrap().push(document.clone());
        self.threads
            .lock()
            .unwrap()
            .push(std::thread::current().id());
        if let Some(ref msg) = self.fail_with {
            return Err(RenderError::Pdf(msg.clone()));
        }
        Ok(PathBuf::from("/tmp/mock").join(document_file_name(&document.subject)))
    }
}
