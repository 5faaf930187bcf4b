//! System unit sheet: two-column spec table up to the footnote marker

use super::{SectionContext, fill_cell, require_sheet};
use crate::blocks::{RunStyle, insert_section_end, insert_title, render_footnotes};
use crate::docx::{Document, inches};
use crate::error::SectionError;
use crate::markup::{FootnoteEntry, Marker, RowClass, classify_cells};
use crate::reader::Row;

pub const SYSTEM_UNIT_SHEET: &str = "QS-Only System Unit";

const FIRST_ROW: usize = 4;
/// Last table row when the sheet has no footnote marker
const DEFAULT_LAST_ROW: usize = 42;

pub fn system_unit_section(
    doc: &mut Document,
    ctx: &mut SectionContext<'_>,
) -> Result<(), SectionError> {
    let sheet = require_sheet(ctx.workbook, &[SYSTEM_UNIT_SHEET])?;
    let body = sheet.body();

    let marker = body.iter().position(|row| Marker::Footnote.in_column(row, 0));
    let end = marker.unwrap_or(DEFAULT_LAST_ROW + 1);
    let rows: Vec<Row> = sheet
        .body_window(FIRST_ROW..end, 0..2)
        .into_iter()
        .filter(|row| !row.is_blank())
        .collect();
    if rows.is_empty() {
        return Err(SectionError::empty_range(&sheet.name, "system unit table"));
    }
    tracing::debug!(sheet = %sheet.name, rows = rows.len(), footnote_marker = ?marker, "system unit table");

    insert_title(doc, "SYSTEM UNIT");

    let table = doc.add_table(rows.len(), 2);
    table.set_column_widths(&[inches(3.0), inches(5.0)]);
    for (r, row) in rows.iter().enumerate() {
        for col in 0..2 {
            let style = if r == 0 || col == 0 {
                RunStyle::body().bold()
            } else {
                RunStyle::body()
            };
            fill_cell(table, r, col, &row.text(col), style);
        }
    }
    doc.add_paragraph();

    if let Some(marker) = marker {
        let entries = footnote_entries(&body[marker + 1..]);
        render_footnotes(doc, &entries, &ctx.config.footnote_skip_phrases);
    }

    insert_section_end(doc);
    Ok(())
}

/// Footnote definitions after the marker; rows missing either cell are ignored
fn footnote_entries(rows: &[Row]) -> Vec<FootnoteEntry> {
    rows.iter()
        .filter(|row| !row.get(0).is_blank() && !row.get(1).is_blank())
        .filter_map(|row| match classify_cells(&row.text(0), &row.text(1)) {
            RowClass::Footnote(entry) => Some(entry),
            RowClass::Dropped => {
                tracing::warn!(label = %row.text(0), "system unit footnote without a number, dropped");
                None
            }
            RowClass::Skip | RowClass::Body => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::ReportConfig;

    fn system_unit_rows(with_marker: bool) -> crate::reader::Sheet {
        let table: [&[&str]; 8] = [
            &["intro"],
            &[],
            &[],
            &[],
            &["Feature", "Details"],
            &["Display [2]", "14 in WUXGA"],
            &[],
            &["Weight", "1.4 kg [3]"],
        ];
        let footnotes: [&[&str]; 6] = [
            &["footnotes"],
            &["Footnote 2", "Touch required"],
            &["[3]", "Starting at"],
            &["Footnote", "Text"],
            &["Container Name", "x"],
            &["", "orphan"],
        ];
        let mut body = table.to_vec();
        if with_marker {
            body.extend_from_slice(&footnotes);
        }
        body.push(&["after", "marker"]);
        sheet(SYSTEM_UNIT_SHEET, &body)
    }

    #[test]
    fn test_table_stops_at_marker() {
        let workbook = workbook(vec![system_unit_rows(true)]);
        let config = ReportConfig::default();
        let mut ctx = context(&workbook, &config);
        let mut doc = Document::new();
        system_unit_section(&mut doc, &mut ctx).unwrap();

        let table = doc.tables().next().unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.column_widths, vec![4320, 7200]);
        assert_eq!(table.cell(1, 0).unwrap().text(), "Display 2");
        let cell = table.cell(2, 1).unwrap();
        let sup = &cell.paragraphs[0].runs[1];
        assert!(sup.properties.superscript);
        assert_eq!(sup.properties.size, Some(9.0));
        assert_eq!(cell.paragraphs[0].runs[0].properties.bold, None);
        assert_eq!(
            table.cell(2, 0).unwrap().paragraphs[0].runs[0].properties.bold,
            Some(true)
        );

        let notes: Vec<String> = doc.paragraphs().map(|p| p.text()).collect();
        assert!(notes.contains(&"2. Touch required\n3. Starting at".to_string()));
    }

    #[test]
    fn test_without_marker_uses_default_range() {
        let workbook = workbook(vec![system_unit_rows(false)]);
        let config = ReportConfig::default();
        let mut ctx = context(&workbook, &config);
        let mut doc = Document::new();
        system_unit_section(&mut doc, &mut ctx).unwrap();

        let table = doc.tables().next().unwrap();
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.cell(3, 0).unwrap().text(), "after");
    }
}
