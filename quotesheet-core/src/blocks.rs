//! Shared rendering blocks used by every section

use crate::docx::{Alignment, BreakKind, Color, Document, Paragraph};
use crate::markup::{FootnoteEntry, segment};
use crate::reader::Sheet;
use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;
use std::sync::OnceLock;

/// Size of superscript footnote references, in points
pub const SUPERSCRIPT_SIZE: f64 = 9.0;
/// Size of section titles, in points
pub const TITLE_SIZE: f64 = 12.0;
/// Thickness of the separator rule, in points
pub const RULE_THICKNESS: u32 = 3;

/// Formatting applied to every segment of a formatted run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStyle {
    pub bold: Option<bool>,
    pub color: Option<Color>,
    pub size: Option<f64>,
    /// Size override for superscript segments
    pub superscript_size: Option<f64>,
}

impl RunStyle {
    /// Unformatted text with 9pt superscripts
    pub fn body() -> Self {
        Self {
            superscript_size: Some(SUPERSCRIPT_SIZE),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn size(mut self, points: f64) -> Self {
        self.size = Some(points);
        self
    }
}

/// Append `text` to `paragraph`, one run per segment, with bracketed
/// references turned into superscripts. Returns the number of runs added.
pub fn add_formatted_run(paragraph: &mut Paragraph, text: &str, style: RunStyle) -> usize {
    let segments = segment(text);
    for seg in &segments {
        let run = paragraph.add_run(seg.text);
        if let Some(bold) = style.bold {
            run.bold(bold);
        }
        if let Some(color) = style.color {
            run.color(color);
        }
        if let Some(size) = style.size {
            run.size(size);
        }
        if seg.is_superscript() {
            run.superscript(true);
            if let Some(size) = style.superscript_size {
                run.size(size);
            }
        }
    }
    segments.len()
}

fn bullet() -> &'static Regex {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    BULLET.get_or_init(|| Regex::new(r"•\s*").unwrap())
}

/// Remove bullet glyphs (and the whitespace after them)
pub fn clean_text(text: &str) -> Cow<'_, str> {
    bullet().replace_all(text, "")
}

/// Footnote display lines after bullet cleanup, minus entries containing a
/// skip phrase
pub fn footnote_lines(entries: &[FootnoteEntry], skip_phrases: &[String]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| clean_text(&entry.to_string()).into_owned())
        .filter(|line| {
            let skipped = skip_phrases.iter().any(|phrase| line.contains(phrase.as_str()));
            if skipped {
                tracing::debug!(footnote = %line, "footnote skipped by phrase");
            }
            !skipped
        })
        .collect()
}

/// Render footnotes as one highlight-coloured paragraph, one entry per line.
/// Nothing is written when no entry survives filtering.
pub fn render_footnotes(doc: &mut Document, entries: &[FootnoteEntry], skip_phrases: &[String]) -> bool {
    let lines = footnote_lines(entries, skip_phrases);
    render_note_lines(doc, &lines)
}

/// Highlight-coloured lines separated by line breaks, no trailing break
pub fn render_note_lines(doc: &mut Document, lines: &[String]) -> bool {
    if lines.is_empty() {
        return false;
    }

    let paragraph = doc.add_paragraph();
    let style = RunStyle::body().color(Color::HIGHLIGHT);
    for (index, line) in lines.iter().enumerate() {
        add_formatted_run(paragraph, line, style);
        if index < lines.len() - 1 {
            paragraph.add_run("").add_break(BreakKind::Line);
        }
    }
    true
}

/// Visible red bold error block
pub fn insert_error(doc: &mut Document, message: &str) {
    doc.add_paragraph()
        .add_run(format!("Error: {}", message))
        .bold(true)
        .color(Color::ERROR)
        .add_break(BreakKind::Line);
}

/// Section title
pub fn insert_title(doc: &mut Document, title: &str) {
    let paragraph = doc.add_paragraph();
    add_formatted_run(paragraph, title, RunStyle::body().bold().size(TITLE_SIZE));
}

/// Bold subtitle of the given size and alignment
pub fn insert_subtitle(doc: &mut Document, text: &str, size: f64, alignment: Alignment) {
    let paragraph = doc.add_paragraph();
    paragraph.add_run(text).bold(true).size(size);
    paragraph.align(alignment);
}

/// Empty paragraph carrying a bottom rule `thickness` points wide
pub fn insert_horizontal_line(doc: &mut Document, thickness: u32) {
    doc.add_paragraph().bottom_border = Some(thickness * 8);
}

/// Rule followed by a page break: the standard end of a section
pub fn insert_section_end(doc: &mut Document) {
    insert_horizontal_line(doc, RULE_THICKNESS);
    doc.add_page_break();
}

/// One body cell's text as a paragraph
pub fn insert_paragraph(doc: &mut Document, sheet: &Sheet, row: usize, col: usize) {
    let text = sheet.body_cell(row, col).to_string();
    add_formatted_run(doc.add_paragraph(), &text, RunStyle::body());
}

/// A body column range rendered as a footnote block, one value per line
pub fn insert_footnote_range(doc: &mut Document, sheet: &Sheet, rows: Range<usize>, col: usize) -> bool {
    let lines: Vec<String> = sheet
        .body_window(rows, col..col + 1)
        .iter()
        .map(|row| row.text(0))
        .collect();
    render_note_lines(doc, &lines)
}
