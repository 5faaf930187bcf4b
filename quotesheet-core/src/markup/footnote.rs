//! Footnote classification and entries

use super::scan::Marker;
use super::segment::number_brackets;
use crate::reader::Row;
use std::fmt;

/// A parsed footnote, ready for the footnote block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FootnoteEntry {
    /// From a `Footnote N` label row
    Numbered { number: u64, text: String },
    /// From a `[N] text` row
    Bracketed(String),
    /// Free text found in a footnote area
    Plain(String),
}

impl FootnoteEntry {
    /// Body text of the entry, without numbering
    pub fn text(&self) -> &str {
        match self {
            FootnoteEntry::Numbered { text, .. } => text,
            FootnoteEntry::Bracketed(text) | FootnoteEntry::Plain(text) => text,
        }
    }
}

impl fmt::Display for FootnoteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FootnoteEntry::Numbered { number, text } => write!(f, "{}. {}", number, text),
            FootnoteEntry::Bracketed(text) => f.write_str(&number_brackets(text)),
            FootnoteEntry::Plain(text) => f.write_str(text),
        }
    }
}

/// How a row inside a scanned range is treated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowClass {
    /// A bare `Footnote`/`Footnotes` heading
    Skip,
    /// Labelled as a footnote but carrying no usable number
    Dropped,
    Footnote(FootnoteEntry),
    Body,
}

/// Classify a row by its first two cells
pub fn classify_row(row: &Row) -> RowClass {
    classify_cells(&row.text(0), &row.text(1))
}

/// Classify a (label, text) cell pair
pub fn classify_cells(col_a: &str, col_b: &str) -> RowClass {
    let col_a = col_a.trim();
    let col_b = col_b.trim();

    if col_a.to_lowercase().contains("footnote") {
        return match footnote_number(col_a) {
            Some(number) => RowClass::Footnote(FootnoteEntry::Numbered {
                number,
                text: col_b.to_string(),
            }),
            None if Marker::Footnote.matches(col_a) => RowClass::Skip,
            None => RowClass::Dropped,
        };
    }

    if Marker::Footnote.matches(col_b) {
        return RowClass::Skip;
    }

    if col_a.starts_with('[') && !col_b.is_empty() {
        return RowClass::Footnote(FootnoteEntry::Bracketed(format!("{} {}", col_a, col_b)));
    }

    if col_a.is_empty() && col_b.starts_with('[') {
        return RowClass::Footnote(FootnoteEntry::Bracketed(col_b.to_string()));
    }

    RowClass::Body
}

/// Footnote number from a label: every digit in the label, concatenated.
///
/// `"Footnote2a3"` yields 23. Labels without digits (or with more digits than
/// fit) yield `None`.
pub fn footnote_number(label: &str) -> Option<u64> {
    let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Footnotes and body rows of a scanned range, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified<'a> {
    pub footnotes: Vec<FootnoteEntry>,
    pub body: Vec<&'a Row>,
}

/// Split a range into footnote entries and body rows
pub fn partition_rows(rows: &[Row]) -> Classified<'_> {
    let mut classified = Classified::default();
    for row in rows {
        match classify_row(row) {
            RowClass::Footnote(entry) => classified.footnotes.push(entry),
            RowClass::Body => classified.body.push(row),
            RowClass::Dropped => {
                tracing::warn!(label = %row.text(0), "footnote label without a number, dropped");
            }
            RowClass::Skip => {}
        }
    }
    classified
}
