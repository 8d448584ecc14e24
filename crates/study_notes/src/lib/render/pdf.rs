use std::{
    fs::{create_dir_all, File},
    io::BufWriter,
    path::PathBuf,
};

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::{
    error::RenderError,
    render::{
        document_file_name, layout, DocumentRenderer, FontStyle, NotesDocument, PAGE_HEIGHT_MM,
        PAGE_WIDTH_MM,
    },
};

/// Writes `<subject>_notes.pdf` files into `output_dir` using the built-in
/// Helvetica faces.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    output_dir: PathBuf,
}

impl PdfRenderer {
    const LAYER_NAME: &str = "Layer 1";

    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

/// Built-in PDF fonts only cover a single-byte encoding.
fn encodable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}

impl DocumentRenderer for PdfRenderer {
    #[tracing::instrument(skip_all, fields(subject = %document.subject))]
    fn render(&self, document: &NotesDocument) -> Result<PathBuf, RenderError> {
        let pages = layout(document);

        let (doc, first_page, first_layer) = PdfDocument::new(
            format!("Study Notes on {}", encodable(&document.subject)),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            Self::LAYER_NAME,
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        for (idx, page) in pages.iter().enumerate() {
            let (page_idx, layer_idx) = if idx == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), Self::LAYER_NAME)
            };
            let layer = doc.get_page(page_idx).get_layer(layer_idx);

            for line in &page.lines {
                let font = match line.style {
                    FontStyle::Regular => &regular,
                    FontStyle::Bold => &bold,
                };
                layer.use_text(
                    encodable(&line.text),
                    line.size_pt,
                    Mm(line.x_mm),
                    Mm(line.y_mm),
                    font,
                );
            }
        }

        create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(document_file_name(&document.subject));
        let file = File::create(&path)
            .inspect_err(|e| tracing::error!(error = ?e, path = ?path, "Failed to create document"))?;

        doc.save(&mut BufWriter::new(file))
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        tracing::info!(path = ?path, pages = pages.len(), "Rendered notes document");
        Ok(path)
    }
}
