//! Document-wide formatting applied after every section has been rendered

use crate::config::{ReportConfig, StyleWords};
use crate::docx::{Alignment, Color, Document, Paragraph, points};
use crate::images::picture_from_bytes;
use std::fs;

/// Width of the footer logo, in inches
const FOOTER_LOGO_WIDTH: f64 = 1.5;

/// Apply page geometry, default font, style words, header and footer
pub fn format_document(doc: &mut Document, config: &ReportConfig, product_name: &str) {
    doc.page.set_margins(points(config.margin_pt));
    doc.style.font_name = Some(config.font_name.clone());
    doc.style.font_size = Some(config.font_size);
    doc.style.compact_spacing = doc.has_tables();

    let restyled = apply_style_words(doc, &config.style);
    tracing::debug!(runs = restyled, "applied style words");

    set_header(doc, product_name);
    if let Some(logo) = &config.footer_logo {
        match fs::read(logo) {
            Ok(bytes) => set_footer_logo(doc, bytes),
            Err(e) => {
                tracing::warn!(path = %logo.display(), error = %e, "footer logo not readable, skipped")
            }
        }
    }
}

/// Restyle top-level runs whose trimmed text is a listed word. Bold words are
/// also set on their own line. Returns the number of runs changed.
pub fn apply_style_words(doc: &mut Document, words: &StyleWords) -> usize {
    if words.bold_words.is_empty() && words.blue_words.is_empty() {
        return 0;
    }

    let mut changed = 0;
    for paragraph in doc.paragraphs_mut() {
        for run in &mut paragraph.runs {
            let text = run.text();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }
            if words.is_bold(trimmed) {
                let wrapped = format!("\n{}\n", trimmed);
                run.set_text(&wrapped);
                run.bold(true);
                changed += 1;
            } else if words.is_blue(trimmed) {
                run.color(Color::HIGHLIGHT);
                changed += 1;
            }
        }
    }
    changed
}

fn set_header(doc: &mut Document, product_name: &str) {
    let mut paragraph = Paragraph::new();
    paragraph.add_run(product_name).bold(true);
    paragraph.align(Alignment::Right);
    doc.header = vec![paragraph];
}

fn set_footer_logo(doc: &mut Document, bytes: Vec<u8>) {
    let Some(picture) = picture_from_bytes(doc, bytes, FOOTER_LOGO_WIDTH, "footer-logo") else {
        tracing::warn!("footer logo is not a supported image, skipped");
        return;
    };
    let mut paragraph = Paragraph::new();
    paragraph.add_run("").add_picture(picture);
    paragraph.align(Alignment::Left);
    doc.footer = vec![paragraph];
}
