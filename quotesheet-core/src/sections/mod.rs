//! Per-sheet section handlers
//!
//! Every handler locates its sheet, renders into the document and, unless it
//! is one of the bare content blocks, closes with a rule and a page break.
//! Failures come back as [`SectionError`] so the report builder can render
//! them in place and carry on.

mod callouts;
mod list;
mod options;
mod processors;
mod system_unit;
mod tables;

pub use callouts::callouts_section;
pub use list::{
    DOCKING_KEY, SERVICE_KEY, SERVICE_KEY_ANNOTATED, docking_section, insert_list, service_section,
};
pub use options::options_section;
pub use processors::processors_section;
pub use system_unit::system_unit_section;
pub use tables::insert_table;

use crate::blocks::{RunStyle, add_formatted_run, insert_footnote_range, insert_paragraph};
use crate::config::{ReportConfig, SectionSpec};
use crate::docx::{Document, Table};
use crate::error::SectionError;
use crate::images::ImageEmbedder;
use crate::reader::{Sheet, Workbook};

/// Everything a handler may read besides the document it writes into
pub struct SectionContext<'a> {
    pub workbook: &'a Workbook,
    pub config: &'a ReportConfig,
    pub product_name: &'a str,
    pub images: ImageEmbedder<'a>,
}

/// Render one configured section
pub fn render_section(
    spec: &SectionSpec,
    doc: &mut Document,
    ctx: &mut SectionContext<'_>,
) -> Result<(), SectionError> {
    match spec {
        SectionSpec::Callouts => callouts_section(doc, ctx),
        SectionSpec::Options => options_section(doc, ctx),
        SectionSpec::SystemUnit => system_unit_section(doc, ctx),
        SectionSpec::Processors => processors_section(doc, ctx),
        SectionSpec::Docking => docking_section(doc, ctx),
        SectionSpec::Service => service_section(doc, ctx),
        SectionSpec::List { sheet, start } => {
            let name = sheet.as_deref().unwrap_or(&ctx.config.tech_specs_sheet);
            let sheet = require_sheet(ctx.workbook, &[name])?;
            insert_list(doc, sheet, start, &ctx.config.footnote_skip_phrases)
        }
        SectionSpec::Tables { sheet } => {
            let sheet = require_sheet(ctx.workbook, &[sheet.as_str()])?;
            insert_table(doc, sheet, &ctx.config.footnote_skip_phrases)
        }
        SectionSpec::Paragraph { sheet, row, col } => {
            let sheet = require_sheet(ctx.workbook, &[sheet.as_str()])?;
            insert_paragraph(doc, sheet, *row, *col);
            Ok(())
        }
        SectionSpec::Footnotes {
            sheet,
            start_row,
            end_row,
            col,
        } => {
            let sheet = require_sheet(ctx.workbook, &[sheet.as_str()])?;
            if insert_footnote_range(doc, sheet, *start_row..*end_row + 1, *col) {
                Ok(())
            } else {
                Err(SectionError::empty_range(&sheet.name, "footnote range"))
            }
        }
    }
}

/// First sheet found among `candidates`
pub(crate) fn require_sheet<'w>(
    workbook: &'w Workbook,
    candidates: &[&str],
) -> Result<&'w Sheet, SectionError> {
    workbook
        .find_sheet(candidates)
        .ok_or_else(|| SectionError::sheet_not_found(candidates))
}

/// Write segmented text into the first paragraph of a table cell
pub(crate) fn fill_cell(table: &mut Table, row: usize, col: usize, text: &str, style: RunStyle) {
    if text.is_empty() {
        return;
    }
    if let Some(cell) = table.cell_mut(row, col) {
        add_formatted_run(cell.paragraph_mut(), text, style);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::ReportConfig;
    use crate::images::{ImageEmbedder, NoFetch};
    use crate::reader::{Row, Sheet, Workbook};

    use super::SectionContext;

    /// A sheet with a placeholder header row followed by `body`
    pub(crate) fn sheet(name: &str, body: &[&[&str]]) -> Sheet {
        let mut rows = vec![Row::from_texts(&["Header"])];
        rows.extend(body.iter().map(|cells| Row::from_texts(cells)));
        Sheet::new(name, rows)
    }

    pub(crate) fn workbook(sheets: Vec<Sheet>) -> Workbook {
        Workbook { path: None, sheets }
    }

    pub(crate) fn context<'a>(workbook: &'a Workbook, config: &'a ReportConfig) -> SectionContext<'a> {
        SectionContext {
            workbook,
            config,
            product_name: "Test Product",
            images: ImageEmbedder::new(&NoFetch, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_missing_sheet() {
        let workbook = workbook(vec![]);
        let config = ReportConfig::default();
        let mut ctx = context(&workbook, &config);
        let mut doc = Document::new();

        let err = render_section(
            &SectionSpec::Tables {
                sheet: "Ports".into(),
            },
            &mut doc,
            &mut ctx,
        )
        .unwrap_err();
        assert!(matches!(err, SectionError::SheetNotFound(_)));
        assert!(doc.body.is_empty());
    }

    #[test]
    fn test_paragraph_and_footnote_range() {
        let workbook = workbook(vec![sheet(
            "Notes",
            &[&["", "Intro [1]"], &["", "note one"], &["", "note two"]],
        )]);
        let config = ReportConfig::default();
        let mut ctx = context(&workbook, &config);
        let mut doc = Document::new();

        render_section(
            &SectionSpec::Paragraph {
                sheet: "Notes".into(),
                row: 0,
                col: 1,
            },
            &mut doc,
            &mut ctx,
        )
        .unwrap();
        render_section(
            &SectionSpec::Footnotes {
                sheet: "Notes".into(),
                start_row: 1,
                end_row: 2,
                col: 1,
            },
            &mut doc,
            &mut ctx,
        )
        .unwrap();

        assert_eq!(doc.text(), "Intro 1\nnote one\nnote two");

        let err = render_section(
            &SectionSpec::Footnotes {
                sheet: "Notes".into(),
                start_row: 10,
                end_row: 12,
                col: 1,
            },
            &mut doc,
            &mut ctx,
        )
        .unwrap_err();
        assert!(matches!(err, SectionError::EmptyRange { .. }));
    }
}
