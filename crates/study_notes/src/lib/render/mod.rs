//! # Document rendering
//!
//! Lays out notes and questions on A4 pages and writes them as PDF.
//! Layout is computed up front ([`layout`]) so pagination can be checked
//! without touching the file system.

pub mod pdf;

use std::{path::PathBuf, sync::LazyLock};

use regex::Regex;

use crate::error::RenderError;

static NUMBERED_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 15.0;
const BULLET_INDENT_MM: f32 = 10.0;
const BODY_LINE_HEIGHT_MM: f32 = 7.0;
const HEADING_HEIGHT_MM: f32 = 10.0;
const BULLET_MARKERS: [char; 3] = ['-', '*', '•'];
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;

pub trait DocumentRenderer {
    /// Writes the document and returns the path of the created file.
    fn render(&self, document: &NotesDocument) -> Result<PathBuf, RenderError>;
}

#[derive(Debug, Clone)]
pub struct NotesDocument {
    pub subject: String,
    pub notes: String,
    pub questions: String,
}

/// `<subject with spaces as underscores>_notes.pdf`
///
/// Path separators are replaced too so the file stays in the output dir.
pub fn document_file_name(subject: &str) -> String {
    let stem: String = subject
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    format!("{stem}_notes.pdf")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub style: FontStyle,
    pub size_pt: f32,
    /// Left edge, from the left of the page
    pub x_mm: f32,
    /// Baseline, from the bottom of the page
    pub y_mm: f32,
}

#[derive(Debug, Default)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

struct Cursor {
    pages: Vec<Page>,
    /// Distance of the next line's top edge from the top of the page
    top_mm: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            top_mm: MARGIN_MM,
        }
    }

    fn skip(&mut self, mm: f32) {
        self.top_mm += mm;
    }

    fn place(&mut self, text: String, style: FontStyle, size_pt: f32, x_mm: f32, height_mm: f32) {
        if self.top_mm + height_mm > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
            self.pages.push(Page::default());
            self.top_mm = MARGIN_MM;
        }

        let baseline = self.top_mm + height_mm * 0.75;
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PlacedLine {
                text,
                style,
                size_pt,
                x_mm,
                y_mm: PAGE_HEIGHT_MM - baseline,
            });
        }
        self.top_mm += height_mm;
    }

    /// Bold heading, wrapped to the printable width.
    fn heading(&mut self, text: &str, size_pt: f32, centered: bool) {
        let glyph_mm = glyph_width_mm(size_pt);
        let max_chars = ((PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / glyph_mm) as usize;

        for line in wrap(text, max_chars.max(1)) {
            let x_mm = if centered {
                let width = line.chars().count() as f32 * glyph_mm;
                ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM)
            } else {
                MARGIN_MM
            };
            self.place(line, FontStyle::Bold, size_pt, x_mm, HEADING_HEIGHT_MM);
        }
    }

    fn paragraph(&mut self, text: &str, indent_mm: f32) {
        const SIZE_PT: f32 = 12.0;
        let x_mm = MARGIN_MM + indent_mm;
        let max_chars = ((PAGE_WIDTH_MM - MARGIN_MM - x_mm) / glyph_width_mm(SIZE_PT)) as usize;

        for line in wrap(text, max_chars.max(1)) {
            self.place(line, FontStyle::Regular, SIZE_PT, x_mm, BODY_LINE_HEIGHT_MM);
        }
    }
}

fn glyph_width_mm(size_pt: f32) -> f32 {
    size_pt * AVG_GLYPH_WIDTH * PT_TO_MM
}

/// Greedy word wrap; words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..max_chars).collect());
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            current.chars().count() + 1 + word.len()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Places every line of the document on pages.
///
/// Notes lines starting with a bullet marker are indented; question lines
/// starting with `<number>.` get extra space above them. Blank lines are
/// dropped.
pub fn layout(document: &NotesDocument) -> Vec<Page> {
    let mut cursor = Cursor::new();

    cursor.heading(&format!("Study Notes on {}", document.subject), 16.0, true);
    cursor.skip(10.0);

    cursor.heading("Detailed Notes", 14.0, false);
    cursor.skip(5.0);
    for line in document.notes.lines().filter(|l| !l.trim().is_empty()) {
        let indent = if line.starts_with(BULLET_MARKERS) {
            BULLET_INDENT_MM
        } else {
            0.0
        };
        cursor.paragraph(line, indent);
    }

    cursor.skip(10.0);
    cursor.heading("Placement Aptitude Questions", 14.0, false);
    cursor.skip(5.0);
    for line in document.questions.lines().filter(|l| !l.trim().is_empty()) {
        if NUMBERED_LINE_RE.is_match(line) {
            cursor.skip(3.0);
        }
        cursor.paragraph(line, 0.0);
    }

    cursor.pages
}
