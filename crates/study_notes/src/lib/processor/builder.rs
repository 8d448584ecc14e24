use std::sync::Arc;

use crate::{
    llm::generator::TextGenerator, render::DocumentRenderer, yt::TranscriptProvider,
    NotesProcessor,
};

pub struct NotesProcessorBuilder<T = (), G = (), R = ()> {
    transcripts: T,
    generator: G,
    renderer: R,
    render_documents: bool,
    parallel_generation: bool,
}

impl Default for NotesProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesProcessorBuilder {
    pub fn new() -> Self {
        Self {
            transcripts: (),
            generator: (),
            renderer: (),
            render_documents: false,
            parallel_generation: false,
        }
    }
}

impl<T, G, R> NotesProcessorBuilder<T, G, R> {
    pub fn transcripts<T2: TranscriptProvider + Send + Sync + 'static>(
        self,
        transcripts: T2,
    ) -> NotesProcessorBuilder<T2, G, R> {
        NotesProcessorBuilder {
            transcripts,
            generator: self.generator,
            renderer: self.renderer,
            render_documents: self.render_documents,
            parallel_generation: self.parallel_generation,
        }
    }

    pub fn generator<G2: TextGenerator + Send + Sync + 'static>(
        self,
        generator: G2,
    ) -> NotesProcessorBuilder<T, G2, R> {
        NotesProcessorBuilder {
            transcripts: self.transcripts,
            generator,
            renderer: self.renderer,
            render_documents: self.render_documents,
            parallel_generation: self.parallel_generation,
        }
    }

    pub fn renderer<R2: DocumentRenderer + Send + Sync + 'static>(
        self,
        renderer: R2,
    ) -> NotesProcessorBuilder<T, G, R2> {
        NotesProcessorBuilder {
            transcripts: self.transcripts,
            generator: self.generator,
            renderer,
            render_documents: self.render_documents,
            parallel_generation: self.parallel_generation,
        }
    }

    /// Render a document for every successful run
    pub fn render_documents(mut self, enabled: bool) -> Self {
        self.render_documents = enabled;
        self
    }

    /// Issue the notes and questions requests concurrently
    pub fn parallel_generation(mut self, enabled: bool) -> Self {
        self.parallel_generation = enabled;
        self
    }
}

impl<T, G, R> NotesProcessorBuilder<T, G, R>
where
    T: TranscriptProvider + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    R: DocumentRenderer + Send + Sync + 'static,
{
    pub fn build(self) -> NotesProcessor<T, G, R> {
        NotesProcessor {
            transcripts: self.transcripts,
            generator: self.generator,
            renderer: Arc::new(self.renderer),
            render_documents: self.render_documents,
            parallel_generation: self.parallel_generation,
        }
    }
}
