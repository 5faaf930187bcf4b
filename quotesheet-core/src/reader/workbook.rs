//! Workbook data structures

use std::fmt;
use std::path::PathBuf;

/// Represents a complete workbook
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// Source path, when the workbook was read from disk
    pub path: Option<PathBuf>,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get the first sheet matching one of the candidate names, in candidate order
    pub fn find_sheet(&self, candidates: &[&str]) -> Option<&Sheet> {
        candidates.iter().find_map(|name| self.get_sheet(name))
    }
}

/// Represents a worksheet as a dense grid anchored at A1.
///
/// The first row is the header row. Section layouts are expressed against the
/// body (the rows after the header), so body row `i` is spreadsheet row `i + 2`.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// The header row (spreadsheet row 1), empty when the sheet has no rows
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// All rows after the header row
    pub fn body(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Get a body cell; out-of-range positions read as empty
    pub fn body_cell(&self, row: usize, col: usize) -> &CellValue {
        self.body().get(row).map(|r| r.get(col)).unwrap_or(&EMPTY)
    }

    /// Number of columns in the widest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Body rows in `rows` (clamped to the sheet), restricted to the columns in `cols`
    pub fn body_window(
        &self,
        rows: std::ops::Range<usize>,
        cols: std::ops::Range<usize>,
    ) -> Vec<Row> {
        let body = self.body();
        let end = rows.end.min(body.len());
        let start = rows.start.min(end);
        body[start..end]
            .iter()
            .map(|row| row.project(cols.clone()))
            .collect()
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// One spreadsheet line. Absent cells read as [`CellValue::Empty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<CellValue>,
}

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Build a row of text cells; empty strings become empty cells
    pub fn from_texts(texts: &[&str]) -> Self {
        Self {
            cells: texts
                .iter()
                .map(|t| {
                    if t.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(t.to_string())
                    }
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a cell, treating positions past the end as empty
    pub fn get(&self, col: usize) -> &CellValue {
        self.cells.get(col).unwrap_or(&EMPTY)
    }

    /// Display text of a cell (`""` for absent or empty cells)
    pub fn text(&self, col: usize) -> String {
        self.get(col).to_string()
    }

    /// True when every cell is blank
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }

    /// True when any cell, trimmed, equals `needle` ignoring ASCII case
    pub fn contains_text(&self, needle: &str) -> bool {
        self.cells
            .iter()
            .any(|c| !c.is_blank() && c.to_string().trim().eq_ignore_ascii_case(needle))
    }

    /// Copy of the cells in `cols`, padded with empty cells
    pub fn project(&self, cols: std::ops::Range<usize>) -> Row {
        Row {
            cells: cols.map(|c| self.get(c).clone()).collect(),
        }
    }

    /// Keep only the listed columns, in the given order
    pub fn select(&self, cols: &[usize]) -> Row {
        Row {
            cells: cols.iter().map(|&c| self.get(c).clone()).collect(),
        }
    }
}

/// Cell value types
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(String),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Empty cells and zero-length text both count as "no value"
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Text(s) => f.write_str(s),
            CellValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Error(e) => f.write_str(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(-12.0).to_string(), "-12");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Boolean(true).to_string(), "TRUE");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_absent_cells_read_empty() {
        let row = Row::from_texts(&["Footnote 1"]);
        assert_eq!(row.text(0), "Footnote 1");
        assert_eq!(row.text(1), "");
        assert_eq!(row.text(42), "");
        assert!(row.get(7).is_empty());
    }

    #[test]
    fn test_body_window_clamps() {
        let sheet = Sheet::new(
            "Options",
            vec![
                Row::from_texts(&["header"]),
                Row::from_texts(&["a", "b", "c", "d"]),
                Row::from_texts(&["e"]),
            ],
        );
        let window = sheet.body_window(0..300, 1..3);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0], Row::from_texts(&["b", "c"]));
        assert_eq!(window[1].len(), 2);
        assert!(window[1].is_blank());
        assert!(sheet.body_window(5..9, 0..2).is_empty());
    }

    #[test]
    fn test_contains_text_trims_and_ignores_case() {
        let row = Row::from_texts(&["", " Footnotes  "]);
        assert!(row.contains_text("footnotes"));
        assert!(row.contains_text("FOOTNOTES"));
        assert!(!row.contains_text("Footnote"));
    }

    #[test]
    fn test_find_sheet_order() {
        let workbook = Workbook {
            path: None,
            sheets: vec![Sheet::new("Processor", vec![]), Sheet::new("Processors", vec![])],
        };
        let sheet = workbook.find_sheet(&["Processors", "Processor"]).unwrap();
        assert_eq!(sheet.name, "Processors");
        assert!(workbook.find_sheet(&["Callouts"]).is_none());
    }
}
