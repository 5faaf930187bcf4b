//! Superscript segmentation of bracketed footnote references

use regex::Regex;
use std::sync::OnceLock;

/// Matches an inline footnote reference such as `[12]`
pub(crate) fn bracket_ref() -> &'static Regex {
    static BRACKET_REF: OnceLock<Regex> = OnceLock::new();
    BRACKET_REF.get_or_init(|| Regex::new(r"\[(\d+)\]").unwrap())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Plain,
    /// Digits of a `[n]` reference, brackets removed
    Superscript,
}

/// A plain or superscript fragment of a cell's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str,
}

impl<'a> Segment<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self {
            kind: SegmentKind::Plain,
            text,
        }
    }

    pub fn superscript(text: &'a str) -> Self {
        Self {
            kind: SegmentKind::Superscript,
            text,
        }
    }

    pub fn is_superscript(&self) -> bool {
        self.kind == SegmentKind::Superscript
    }

    /// The source text this segment was cut from
    pub fn source_text(&self) -> String {
        match self.kind {
            SegmentKind::Plain => self.text.to_string(),
            SegmentKind::Superscript => format!("[{}]", self.text),
        }
    }
}

/// Split `text` into alternating plain and superscript segments.
///
/// Empty plain segments are dropped. The referenced numbers are not checked
/// against any footnote list.
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in bracket_ref().find_iter(text) {
        if m.start() > last {
            segments.push(Segment::plain(&text[last..m.start()]));
        }
        // The match is `[` digits `]`, all single-byte characters
        segments.push(Segment::superscript(&text[m.start() + 1..m.end() - 1]));
        last = m.end();
    }

    if last < text.len() {
        segments.push(Segment::plain(&text[last..]));
    }

    segments
}

/// Inverse of [`segment`]
pub fn reconstruct(segments: &[Segment<'_>]) -> String {
    segments.iter().map(Segment::source_text).collect()
}

/// Replace every `[n]` with `n.` (footnote list numbering)
pub fn number_brackets(text: &str) -> String {
    bracket_ref().replace_all(text, "$1.").into_owned()
}
