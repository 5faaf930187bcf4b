//! Callouts: product views with their numbered callout tables

use super::{SectionContext, require_sheet};
use crate::blocks::{insert_section_end, insert_subtitle};
use crate::docx::{Alignment, Document, inches};
use crate::error::SectionError;
use crate::reader::{CellValue, Sheet};
use std::ops::Range;

pub const CALLOUTS_SHEET: &str = "Callouts";

const PRODUCT_NAME_SIZE: f64 = 14.0;
const SUBTITLE_SIZE: f64 = 12.0;
const IMAGE_WIDTH_INCHES: f64 = 5.0;
const CALLOUT_COLUMNS: Range<usize> = 1..5;

/// One product view: picture, subtitle and numbered callout table
struct View {
    subtitle: &'static str,
    image_row: usize,
    rows: Range<usize>,
}

const VIEWS: [View; 2] = [
    View {
        subtitle: "Front",
        image_row: 4,
        rows: 4..10,
    },
    View {
        subtitle: "Sides",
        image_row: 11,
        rows: 11..23,
    },
];

pub fn callouts_section(doc: &mut Document, ctx: &mut SectionContext<'_>) -> Result<(), SectionError> {
    let name = doc.add_paragraph();
    name.add_run(ctx.product_name).bold(true).size(PRODUCT_NAME_SIZE);
    name.align(Alignment::Left);

    let sheet = require_sheet(ctx.workbook, &[CALLOUTS_SHEET])?;

    for view in &VIEWS {
        let url = sheet.body_cell(view.image_row, 0).to_string();
        ctx.images.embed_url(doc, &url, IMAGE_WIDTH_INCHES);

        insert_subtitle(doc, view.subtitle, SUBTITLE_SIZE, Alignment::Center);
        insert_callout_table(doc, sheet, view.rows.clone());
        insert_section_end(doc);
    }
    Ok(())
}

fn insert_callout_table(doc: &mut Document, sheet: &Sheet, rows: Range<usize>) {
    let rows: Vec<_> = sheet
        .body_window(rows, CALLOUT_COLUMNS)
        .into_iter()
        .filter(|row| !row.is_blank())
        .collect();
    tracing::debug!(sheet = %sheet.name, rows = rows.len(), "callout table");
    if rows.is_empty() {
        return;
    }

    let table = doc.add_table(rows.len(), CALLOUT_COLUMNS.len());
    table.alignment = Some(Alignment::Center);
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.cells.iter().enumerate() {
            let text = callout_text(value);
            if text.is_empty() {
                continue;
            }
            if let Some(cell) = table.cell_mut(r, c) {
                cell.paragraph_mut().add_run(text);
            }
        }
    }
    table.set_column_widths(&[inches(0.5), inches(3.5), inches(0.5), inches(3.5)]);
}

/// Callout numbers are shown as integers
fn callout_text(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => format!("{}", n.trunc() as i64),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::ReportConfig;
    use crate::docx::{Block, BreakKind, RunContent};
    use crate::images::ImageEmbedder;
    use crate::images::tests::{StubFetcher, TINY_PNG};
    use crate::reader::Row;
    use std::collections::HashMap;

    fn callouts_sheet() -> Sheet {
        let mut sheet = sheet(CALLOUTS_SHEET, &[]);
        for _ in 0..4 {
            sheet.rows.push(Row::from_texts(&[]));
        }
        let mut front = Row::from_texts(&["https://img.example/front.png"]);
        front.cells.extend([
            CellValue::Number(1.0),
            CellValue::Text("Webcam".into()),
            CellValue::Number(2.5),
            CellValue::Text("Microphones".into()),
        ]);
        sheet.rows.push(front);
        sheet.rows.push(Row::from_texts(&[]));
        sheet.rows.push(Row::from_texts(&["", "3", "Display"]));
        sheet
    }

    #[test]
    fn test_callout_layout() {
        let workbook = workbook(vec![callouts_sheet()]);
        let config = ReportConfig::default();
        let fetcher = StubFetcher(HashMap::from([(
            "https://img.example/front.png".to_string(),
            TINY_PNG.to_vec(),
        )]));
        let mut ctx = context(&workbook, &config);
        ctx.images = ImageEmbedder::new(&fetcher, None);
        let mut doc = Document::new();

        callouts_section(&mut doc, &mut ctx).unwrap();

        let Block::Paragraph(name) = &doc.body[0] else {
            panic!("expected the product name");
        };
        assert_eq!(name.text(), "Test Product");
        assert_eq!(name.runs[0].properties.size, Some(14.0));

        // front picture, then subtitle
        let Block::Paragraph(picture) = &doc.body[1] else {
            panic!("expected the picture paragraph");
        };
        assert!(matches!(picture.runs[0].content[0], RunContent::Picture(_)));
        assert_eq!(doc.media.len(), 1);

        let subtitles: Vec<String> = doc
            .paragraphs()
            .filter(|p| p.alignment == Some(Alignment::Center) && !p.text().is_empty())
            .map(|p| p.text())
            .collect();
        assert_eq!(subtitles, vec!["Front", "Sides"]);

        let tables: Vec<_> = doc.tables().collect();
        // the sides view has no callouts
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].cell(0, 0).unwrap().text(), "1");
        assert_eq!(tables[0].cell(0, 2).unwrap().text(), "2");
        assert_eq!(tables[0].cell(1, 1).unwrap().text(), "Display");
        assert_eq!(tables[0].alignment, Some(Alignment::Center));

        let page_breaks = doc
            .paragraphs()
            .flat_map(|p| &p.runs)
            .flat_map(|r| &r.content)
            .filter(|c| matches!(c, RunContent::Break(BreakKind::Page)))
            .count();
        assert_eq!(page_breaks, 2);
    }

    #[test]
    fn test_missing_sheet_keeps_product_name() {
        let workbook = workbook(vec![]);
        let config = ReportConfig::default();
        let mut ctx = context(&workbook, &config);
        let mut doc = Document::new();

        let err = callouts_section(&mut doc, &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "Sheet 'Callouts' not found in the workbook.");
        assert_eq!(doc.text(), "Test Product");
    }
}
