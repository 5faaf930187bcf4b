//! Options sheet: grouped three-column table with a privacy note

use super::{SectionContext, fill_cell, require_sheet};
use crate::blocks::{RunStyle, insert_section_end, insert_title, render_note_lines};
use crate::docx::{Document, inches};
use crate::error::SectionError;
use crate::reader::Row;

pub const OPTIONS_SHEET: &str = "QS-Only Options";
pub const PRIVACY_NOTE: &str = "Privacy panel is only available on select models.";

const FIRST_ROW: usize = 3;
const LAST_ROW: usize = 299;
const COLUMNS: usize = 3;

pub fn options_section(doc: &mut Document, ctx: &mut SectionContext<'_>) -> Result<(), SectionError> {
    let sheet = require_sheet(ctx.workbook, &[OPTIONS_SHEET])?;

    let rows: Vec<Row> = sheet
        .body_window(FIRST_ROW..LAST_ROW + 1, 0..COLUMNS)
        .into_iter()
        .filter(|row| !row.is_blank())
        .collect();
    if rows.is_empty() {
        return Err(SectionError::empty_range(&sheet.name, "options table"));
    }
    tracing::debug!(sheet = %sheet.name, rows = rows.len(), "options table");

    insert_title(doc, "OPTIONS");
    render_note_lines(doc, &[PRIVACY_NOTE.to_string()]);

    let table = doc.add_table(0, COLUMNS);
    for (index, row) in rows.iter().enumerate() {
        if index > 0 && is_group_header(row) {
            table.add_row();
        }
        table.add_row();
        let target = table.rows.len() - 1;
        for col in 0..COLUMNS {
            let style = if index == 0 || col == 0 {
                RunStyle::body().bold()
            } else {
                RunStyle::body()
            };
            fill_cell(table, target, col, &row.text(col), style);
        }
    }
    table.set_column_widths(&[inches(2.0), inches(4.0), inches(2.0)]);

    insert_section_end(doc);
    Ok(())
}

/// Only the first column is filled
fn is_group_header(row: &Row) -> bool {
    !row.get(0).is_blank() && row.get(1).is_blank() && row.get(2).is_blank()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::ReportConfig;
    use crate::docx::Color;

    #[test]
    fn test_options_table_with_spacers() {
        let workbook = workbook(vec![sheet(
            OPTIONS_SHEET,
            &[
                &["ignored"],
                &[],
                &[],
                &["Option", "Description", "Part"],
                &["Displays"],
                &["Privacy", "Sure View", "1A2B3"],
                &[],
                &["Pens"],
                &["Pen", "Rechargeable", "4C5D6"],
            ],
        )]);
        let config = ReportConfig::default();
        let mut ctx = context(&workbook, &config);
        let mut doc = Document::new();
        options_section(&mut doc, &mut ctx).unwrap();

        let paragraphs: Vec<_> = doc.paragraphs().collect();
        assert_eq!(paragraphs[0].text(), "OPTIONS");
        assert_eq!(paragraphs[1].text(), PRIVACY_NOTE);
        assert_eq!(paragraphs[1].runs[0].properties.color, Some(Color::HIGHLIGHT));

        let table = doc.tables().next().unwrap();
        let first_column: Vec<String> = table
            .rows
            .iter()
            .map(|r| r.cells[0].text())
            .collect();
        assert_eq!(
            first_column,
            vec!["Option", "", "Displays", "Privacy", "", "Pens", "Pen"]
        );
        assert_eq!(table.column_widths, vec![2880, 5760, 2880]);

        let description = &table.cell(3, 1).unwrap().paragraphs[0].runs[0];
        assert_eq!(description.properties.bold, None);
        let label = &table.cell(3, 0).unwrap().paragraphs[0].runs[0];
        assert_eq!(label.properties.bold, Some(true));
        let heading = &table.cell(0, 2).unwrap().paragraphs[0].runs[0];
        assert_eq!(heading.properties.bold, Some(true));
    }

    #[test]
    fn test_empty_options_sheet() {
        let workbook = workbook(vec![sheet(OPTIONS_SHEET, &[&["only a header"]])]);
        let config = ReportConfig::default();
        let mut ctx = context(&workbook, &config);
        let mut doc = Document::new();
        let err = options_section(&mut doc, &mut ctx).unwrap_err();
        assert!(matches!(err, SectionError::EmptyRange { .. }));
    }
}
