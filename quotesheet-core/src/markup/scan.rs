//! Locating marker-delimited ranges in a flat row sequence

use crate::reader::Row;

/// Reserved literals that delimit sections within a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Value,
    Table,
    /// `Footnote` or `Footnotes`
    Footnote,
}

impl Marker {
    /// Match a cell's text against this marker (case-insensitive, trimmed)
    pub fn matches(self, text: &str) -> bool {
        let text = text.trim();
        match self {
            Marker::Value => text.eq_ignore_ascii_case("value"),
            Marker::Table => text.eq_ignore_ascii_case("table"),
            Marker::Footnote => {
                text.eq_ignore_ascii_case("footnote") || text.eq_ignore_ascii_case("footnotes")
            }
        }
    }

    /// True when the first or second cell of `row` is this marker
    pub fn is_marker_row(self, row: &Row) -> bool {
        self.matches(&row.text(0)) || self.matches(&row.text(1))
    }

    /// True when the cell at `col` is this marker
    pub fn in_column(self, row: &Row, col: usize) -> bool {
        self.matches(&row.text(col))
    }
}

/// Return the rows from the first row satisfying `start` up to, but not
/// including, the next row satisfying `boundary`.
///
/// The boundary search begins after the start row. Returns `None` when no row
/// satisfies `start`.
pub fn scan_range<'a, S, B>(rows: &'a [Row], start: S, boundary: B) -> Option<&'a [Row]>
where
    S: Fn(&Row) -> bool,
    B: Fn(&Row) -> bool,
{
    let first = rows.iter().position(start)?;
    let end = rows[first + 1..]
        .iter()
        .position(boundary)
        .map(|offset| first + 1 + offset)
        .unwrap_or(rows.len());
    Some(&rows[first..end])
}
