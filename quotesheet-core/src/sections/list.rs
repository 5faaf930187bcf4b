//! Named lists on the tech specs sheet: docking, service and friends

use super::{SectionContext, require_sheet};
use crate::blocks::{RunStyle, add_formatted_run, insert_section_end, insert_title, render_footnotes};
use crate::docx::{BreakKind, Document};
use crate::error::SectionError;
use crate::markup::{Marker, partition_rows, scan_range};
use crate::reader::Sheet;

pub const DOCKING_KEY: &str = "Docking (sold separately)";
pub const SERVICE_KEY: &str = "Service and Support";
/// Service heading as it appears when it carries a footnote reference
pub const SERVICE_KEY_ANNOTATED: &str = "Service and Support[45]";

pub fn docking_section(doc: &mut Document, ctx: &mut SectionContext<'_>) -> Result<(), SectionError> {
    let sheet = require_sheet(ctx.workbook, &[ctx.config.tech_specs_sheet.as_str()])?;
    insert_list(doc, sheet, DOCKING_KEY, &ctx.config.footnote_skip_phrases)
}

pub fn service_section(doc: &mut Document, ctx: &mut SectionContext<'_>) -> Result<(), SectionError> {
    let sheet = require_sheet(ctx.workbook, &[ctx.config.tech_specs_sheet.as_str()])?;
    insert_list(doc, sheet, service_key(sheet), &ctx.config.footnote_skip_phrases)
}

/// The annotated service heading when the sheet uses it, else the plain one
fn service_key(sheet: &Sheet) -> &'static str {
    let annotated = sheet
        .header()
        .is_some_and(|h| h.contains_text(SERVICE_KEY_ANNOTATED))
        || sheet
            .body()
            .iter()
            .any(|r| r.text(1).trim() == SERVICE_KEY_ANNOTATED);
    if annotated {
        SERVICE_KEY_ANNOTATED
    } else {
        SERVICE_KEY
    }
}

/// Render the list that starts at the column-B cell equal to `start` and runs
/// to the next `Value` marker in column B.
///
/// The start row itself only provides the title. Every other body row becomes
/// one line of a single paragraph; footnote rows go to the footnote block.
pub fn insert_list(
    doc: &mut Document,
    sheet: &Sheet,
    start: &str,
    skip_phrases: &[String],
) -> Result<(), SectionError> {
    let range = scan_range(
        sheet.body(),
        |row| row.text(1).trim() == start,
        |row| Marker::Value.in_column(row, 1),
    )
    .ok_or_else(|| SectionError::marker_not_found(&sheet.name, start))?;

    let classified = partition_rows(range);
    tracing::debug!(
        sheet = %sheet.name,
        start,
        rows = range.len(),
        items = classified.body.len(),
        footnotes = classified.footnotes.len(),
        "located list"
    );

    insert_title(doc, &start.to_uppercase());

    let paragraph = doc.add_paragraph();
    for row in classified.body.iter().skip(1) {
        let item = row.text(1);
        if item.trim().is_empty() {
            continue;
        }
        add_formatted_run(paragraph, &item, RunStyle::body());
        paragraph.add_run("").add_break(BreakKind::Line);
    }

    render_footnotes(doc, &classified.footnotes, skip_phrases);
    insert_section_end(doc);
    Ok(())
}
