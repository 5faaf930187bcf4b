//! Processors sheet: key-column table followed by its footnotes

use super::{SectionContext, fill_cell, require_sheet};
use crate::blocks::{RunStyle, insert_section_end, insert_title, render_footnotes};
use crate::docx::Document;
use crate::error::SectionError;
use crate::markup::{FootnoteEntry, RowClass, classify_row};
use crate::reader::{Row, Sheet};

pub const PROCESSOR_SHEETS: [&str; 2] = ["Processors", "Processor"];

/// Body row whose filled cells decide which columns are kept
const KEY_ROW: usize = 3;
const FOOTNOTES: &str = "Footnotes";
const FAMILY_LABEL: &str = "Processor Family";

pub fn processors_section(
    doc: &mut Document,
    ctx: &mut SectionContext<'_>,
) -> Result<(), SectionError> {
    let sheet = require_sheet(ctx.workbook, &PROCESSOR_SHEETS)?;

    let columns = key_columns(sheet);
    let body = sheet.body();
    let marker = body.iter().position(|row| row.contains_text(FOOTNOTES));
    let table_end = marker.unwrap_or(body.len());
    let rows: Vec<Row> = body
        .get(KEY_ROW..table_end)
        .unwrap_or(&[])
        .iter()
        .map(|row| row.select(&columns))
        .collect();
    if columns.is_empty() || rows.is_empty() {
        return Err(SectionError::empty_range(&sheet.name, "processor table"));
    }
    tracing::debug!(sheet = %sheet.name, rows = rows.len(), cols = columns.len(), "processor table");

    insert_title(doc, "Processors");

    let table = doc.add_table(rows.len(), columns.len());
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.cells.iter().enumerate() {
            let text = value.to_string();
            let style = if r == 0 || text == FAMILY_LABEL {
                RunStyle::body().bold()
            } else {
                RunStyle::body()
            };
            fill_cell(table, r, c, &text, style);
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

/// Columns with a value in the key row
fn key_columns(sheet: &Sheet) -> Vec<usize> {
    let Some(key_row) = sheet.body().get(KEY_ROW) else {
        return Vec::new();
    };
    (0..key_row.len())
        .filter(|&c| !key_row.get(c).is_blank())
        .collect()
}

/// Footnotes listed after the marker. Rows that are not footnote definitions
/// keep their filled cells joined with ` - `.
fn footnote_entries(rows: &[Row]) -> Vec<FootnoteEntry> {
    let mut entries = Vec::new();
    for row in rows.iter().filter(|row| !row.is_blank()) {
        match classify_row(row) {
            RowClass::Footnote(entry) => entries.push(entry),
            RowClass::Body => {
                let joined = row
                    .cells
                    .iter()
                    .filter(|c| !c.is_blank())
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" - ");
                entries.push(FootnoteEntry::Plain(joined));
            }
            RowClass::Dropped => {
                tracing::warn!(label = %row.text(0), "processor footnote without a number, dropped")
            }
            RowClass::Skip => {}
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::ReportConfig;
    use crate::docx::Block;

    fn processors_sheet(name: &str) -> crate::reader::Sheet {
        sheet(
            name,
            &[
                &["Intel"],
                &[],
                &[],
                &["Processor Family", "", "Base", "Boost"],
                &["Intel Core i5 [1]", "x", "1.6 GHz", "4.4 GHz"],
                &["Intel Core i7", "", "1.8 GHz", "5.0 GHz"],
                &[],
                &["Footnotes"],
                &["[1]", "Turbo Boost depends on workload"],
                &["", "Multicore is designed", "performance varies"],
                &["Footnote3", "Container Name x"],
            ],
        )
    }

    #[test]
    fn test_processor_table() {
        let workbook = workbook(vec![processors_sheet("Processor")]);
        let config = ReportConfig::default();
        let mut ctx = context(&workbook, &config);
        let mut doc = Document::new();
        processors_section(&mut doc, &mut ctx).unwrap();

        assert_eq!(doc.paragraphs().next().unwrap().text(), "Processors");
        let table = doc.tables().next().unwrap();
        // column B is empty in the key row, so it is dropped
        assert_eq!(table.cols, 3);
        // key row, two processors, blank row before the marker
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.cell(1, 0).unwrap().text(), "Intel Core i5 1");
        assert_eq!(table.cell(1, 2).unwrap().text(), "4.4 GHz");

        let header = &table.cell(0, 1).unwrap().paragraphs[0].runs[0];
        assert_eq!(header.properties.bold, Some(true));
        let plain = &table.cell(2, 1).unwrap().paragraphs[0].runs[0];
        assert_eq!(plain.properties.bold, None);

        let notes: Vec<String> = doc.paragraphs().map(|p| p.text()).collect();
        assert!(notes.contains(
            &"1. Turbo Boost depends on workload\nMulticore is designed - performance varies"
                .to_string()
        ));
        assert!(!notes.iter().any(|n| n.contains("Container Name")));
        assert!(matches!(doc.body.last(), Some(Block::Paragraph(_))));
    }

    #[test]
    fn test_footnotes_marker_ignores_case_and_padding() {
        let workbook = workbook(vec![sheet(
            "Processors",
            &[
                &["Intel"],
                &[],
                &[],
                &["Processor Family", "Base"],
                &["Intel Core i5 [1]", "1.6 GHz"],
                &["  FOOTNOTES "],
                &["[1]", "Turbo Boost depends on workload"],
            ],
        )]);
        let config = ReportConfig::default();
        let mut ctx = context(&workbook, &config);
        let mut doc = Document::new();
        processors_section(&mut doc, &mut ctx).unwrap();

        let table = doc.tables().next().unwrap();
        assert_eq!(table.rows.len(), 2);
        assert!(doc.text().contains("1. Turbo Boost depends on workload"));
    }

    #[test]
    fn test_footnote_entries() {
        let rows = vec![
            Row::from_texts(&["Footnote 2", "Touch required"]),
            Row::from_texts(&[]),
            Row::from_texts(&["Note", "", "Extra"]),
        ];
        assert_eq!(
            footnote_entries(&rows),
            vec![
                FootnoteEntry::Numbered {
                    number: 2,
                    text: "Touch required".into()
                },
                FootnoteEntry::Plain("Note - Extra".into()),
            ]
        );
    }

    #[test]
    fn test_missing_processor_sheet() {
        let workbook = workbook(vec![processors_sheet("CPU")]);
        let config = ReportConfig::default();
        let mut ctx = context(&workbook, &config);
        let mut doc = Document::new();
        let err = processors_section(&mut doc, &mut ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sheet 'Processors' or 'Processor' not found in the workbook."
        );
    }
}
