//! Excel/ODS file reader using calamine

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

pub mod workbook;

pub use workbook::{CellValue, Row, Sheet, Workbook};

/// Read a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let mut excel = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheets = read_sheets(&mut excel)?;
    Ok(Workbook {
        path: Some(path.to_path_buf()),
        sheets,
    })
}

/// Read a workbook from an in-memory buffer (e.g. an uploaded file)
pub fn read_workbook_from_bytes(bytes: Vec<u8>) -> Result<Workbook> {
    let mut excel = open_workbook_auto_from_rs(Cursor::new(bytes))
        .context("Failed to open workbook from memory")?;

    let sheets = read_sheets(&mut excel)?;
    Ok(Workbook { path: None, sheets })
}

fn read_sheets<RS: Read + Seek>(excel: &mut Sheets<RS>) -> Result<Vec<Sheet>> {
    let sheet_names = excel.sheet_names();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in &sheet_names {
        let range = excel
            .worksheet_range(sheet_name)
            .with_context(|| format!("Failed to read sheet '{}'", sheet_name))?;
        let sheet = parse_sheet(sheet_name, &range);
        tracing::debug!(
            sheet = %sheet.name,
            rows = sheet.rows.len(),
            cols = sheet.width(),
            "loaded sheet"
        );
        sheets.push(sheet);
    }

    Ok(sheets)
}

/// Lay a calamine range out as a dense grid anchored at A1
fn parse_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let Some((start_row, start_col)) = range.start() else {
        return Sheet::new(name, Vec::new());
    };
    let (height, width) = range.get_size();

    let mut rows = vec![Row::default(); start_row as usize];
    for data_row in range.rows().take(height) {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(data_row.iter().take(width).map(parse_cell_value));
        // Trailing empties carry no information and absent cells read as empty
        while cells.last().is_some_and(CellValue::is_empty) {
            cells.pop();
        }
        rows.push(Row::new(cells));
    }

    Sheet::new(name, rows)
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_parse_sheet_anchors_at_a1() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("Table".to_string()));
        range.set_value((3, 2), Data::Float(4.0));

        let sheet = parse_sheet("Tech Specs", &range);
        assert_eq!(sheet.rows.len(), 4);
        assert!(sheet.rows[0].is_blank());
        assert_eq!(sheet.rows[2].text(1), "Table");
        assert_eq!(sheet.rows[2].len(), 2);
        assert_eq!(sheet.rows[3].text(2), "4");
        assert_eq!(sheet.body_cell(1, 1), &CellValue::Text("Table".to_string()));
    }

    #[test]
    fn test_parse_empty_range() {
        let range: Range<Data> = Range::empty();
        let sheet = parse_sheet("Blank", &range);
        assert!(sheet.rows.is_empty());
        assert!(sheet.body().is_empty());
    }

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            parse_cell_value(&Data::String("x".into())),
            CellValue::Text("x".into())
        );
        assert_eq!(parse_cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(
            parse_cell_value(&Data::Error(CellErrorType::Div0)),
            CellValue::Error("#DIV/0!".into())
        );
        assert_eq!(
            parse_cell_value(&Data::Error(CellErrorType::NA)).to_string(),
            "#N/A"
        );
    }
}
