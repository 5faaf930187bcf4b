//! `Table` blocks of a sheet, each with its own footnote area

use super::fill_cell;
use crate::blocks::{RunStyle, clean_text, render_footnotes};
use crate::docx::{Document, inches};
use crate::error::SectionError;
use crate::markup::{FootnoteEntry, Marker, RowClass, classify_row};
use crate::reader::{Row, Sheet};

/// One `Table` block: title, label/value rows and trailing footnotes
#[derive(Debug, Default)]
struct TableBlock<'a> {
    title: String,
    rows: Vec<&'a Row>,
    footnotes: Vec<FootnoteEntry>,
}

/// Render every block of `sheet` introduced by a `Table` row in column A.
///
/// Rows after the marker become label/value pairs until the next `Table` row
/// or a footnote marker. Footnote definitions follow the footnote marker up
/// to the next marker of either kind.
pub fn insert_table(doc: &mut Document, sheet: &Sheet, skip_phrases: &[String]) -> Result<(), SectionError> {
    let blocks = collect_blocks(sheet.body());
    if blocks.is_empty() {
        return Err(SectionError::marker_not_found(&sheet.name, "Table"));
    }
    tracing::debug!(sheet = %sheet.name, tables = blocks.len(), "table blocks");

    for block in &blocks {
        render_block(doc, block);
        render_footnotes(doc, &block.footnotes, skip_phrases);
        doc.add_paragraph();
    }
    Ok(())
}

fn collect_blocks(body: &[Row]) -> Vec<TableBlock<'_>> {
    let mut blocks = Vec::new();
    for (index, row) in body.iter().enumerate() {
        if !Marker::Table.in_column(row, 0) {
            continue;
        }

        let mut block = TableBlock {
            title: row.text(1),
            ..TableBlock::default()
        };
        let mut rest = body[index + 1..].iter().enumerate();
        while let Some((offset, next)) = rest.next() {
            if Marker::Table.in_column(next, 0) {
                break;
            }
            if Marker::Footnote.is_marker_row(next) {
                let area = &body[index + 2 + offset..];
                block.footnotes = area_footnotes(area);
                break;
            }
            if !next.is_blank() {
                block.rows.push(next);
            }
        }
        blocks.push(block);
    }
    blocks
}

/// Footnote definitions up to the next `Table` or footnote marker row
fn area_footnotes(rows: &[Row]) -> Vec<FootnoteEntry> {
    rows.iter()
        .take_while(|row| !Marker::Table.in_column(row, 0) && !Marker::Footnote.is_marker_row(row))
        .filter_map(|row| match classify_row(row) {
            RowClass::Footnote(entry) if !entry.text().is_empty() => Some(entry),
            _ => None,
        })
        .collect()
}

fn render_block(doc: &mut Document, block: &TableBlock<'_>) {
    let row_count = block.rows.len().max(1);
    let table = doc.add_table(row_count, 3);

    fill_cell(table, 0, 0, &clean_text(&block.title), RunStyle::body().bold());
    for (r, row) in block.rows.iter().enumerate() {
        fill_cell(table, r, 1, &clean_text(&row.text(0)), RunStyle::body().bold());
        fill_cell(table, r, 2, &clean_text(&row.text(1)), RunStyle::body());
    }
    table.set_column_widths(&[inches(2.0), inches(2.0), inches(4.0)]);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::sheet;
    use super::*;
    use crate::docx::Color;

    fn ports_sheet() -> Sheet {
        sheet(
            "Ports",
            &[
                &["Table", "Ports and Connectors"],
                &["• USB-C [4]", "2 x Thunderbolt 4"],
                &["HDMI", "• 1 x HDMI 2.1"],
                &["Footnotes"],
                &["Footnote 4", "Requires a compatible device"],
                &["[5]", "Sold separately"],
                &["", "[6] Wireless WAN module optional"],
                &["Footnote", "ignored heading"],
                &["", "Footnote"],
                &["After", "the marker"],
                &["table", "Audio"],
                &[],
                &["Speakers", "Stereo"],
                &["Table", "Empty"],
            ],
        )
    }

    #[test]
    fn test_blocks_and_footnote_areas() {
        let sheet = ports_sheet();
        let blocks = collect_blocks(sheet.body());
        assert_eq!(blocks.len(), 3);

        assert_eq!(blocks[0].title, "Ports and Connectors");
        assert_eq!(blocks[0].rows.len(), 2);
        let notes: Vec<String> = blocks[0].footnotes.iter().map(|f| f.to_string()).collect();
        assert_eq!(
            notes,
            vec![
                "4. Requires a compatible device",
                "5. Sold separately",
                "6. Wireless WAN module optional",
            ]
        );

        assert_eq!(blocks[1].title, "Audio");
        assert_eq!(blocks[1].rows.len(), 1);
        assert!(blocks[2].rows.is_empty());
    }

    #[test]
    fn test_rendered_tables() {
        let sheet = ports_sheet();
        let mut doc = Document::new();
        insert_table(&mut doc, &sheet, &["Wireless WAN".to_string()]).unwrap();

        let tables: Vec<_> = doc.tables().collect();
        assert_eq!(tables.len(), 3);

        let ports = tables[0];
        assert_eq!(ports.rows.len(), 2);
        assert_eq!(ports.column_widths, vec![2880, 2880, 5760]);
        assert_eq!(ports.cell(0, 0).unwrap().text(), "Ports and Connectors");
        assert_eq!(ports.cell(0, 1).unwrap().text(), "USB-C 4");
        assert_eq!(ports.cell(1, 2).unwrap().text(), "1 x HDMI 2.1");
        assert!(ports.cell(1, 0).unwrap().text().is_empty());
        let label = &ports.cell(0, 1).unwrap().paragraphs[0].runs;
        assert_eq!(label[0].properties.bold, Some(true));
        assert!(label[1].properties.superscript);

        // a block without rows still shows its title
        assert_eq!(tables[2].rows.len(), 1);
        assert_eq!(tables[2].cell(0, 0).unwrap().text(), "Empty");

        let notes = doc
            .paragraphs()
            .find(|p| p.runs.iter().any(|r| r.properties.color == Some(Color::HIGHLIGHT)))
            .unwrap();
        assert_eq!(
            notes.text(),
            "4. Requires a compatible device\n5. Sold separately"
        );
    }

    #[test]
    fn test_sheet_without_tables() {
        let sheet = sheet("Ports", &[&["Ports", "USB"]]);
        let mut doc = Document::new();
        let err = insert_table(&mut doc, &sheet, &[]).unwrap_err();
        assert_eq!(err.to_string(), "'Table' not found in sheet 'Ports'.");
    }
}
