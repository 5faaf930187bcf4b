//! Report assembly: runs the configured sections in order

use crate::blocks::insert_error;
use crate::config::{ReportConfig, SectionSpec};
use crate::docx::{Document, docx_bytes, save_docx};
use crate::format::format_document;
use crate::images::{ImageEmbedder, ImageFetcher, default_fetcher};
use crate::reader::{self, Workbook};
use crate::sections::{SectionContext, render_section};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Fallback product name when neither the config nor the input path has one
const DEFAULT_PRODUCT_NAME: &str = "Quote Sheet";

/// What happened to one configured section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOutcome {
    pub section: String,
    /// Error message shown in the document, if the section failed
    pub error: Option<String>,
}

impl SectionOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// A rendered report and the per-section results
#[derive(Debug)]
pub struct Report {
    pub product_name: String,
    pub document: Document,
    pub outcomes: Vec<SectionOutcome>,
}

impl Report {
    pub fn failures(&self) -> impl Iterator<Item = &SectionOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// Write the report as a `.docx` file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_docx(&self.document, path)
    }

    /// The report as `.docx` bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        docx_bytes(&self.document)
    }
}

/// Builds quote-sheet reports from loaded workbooks
pub struct ReportBuilder {
    config: ReportConfig,
    fetcher: Box<dyn ImageFetcher>,
}

impl ReportBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::with_config(ReportConfig::default())
    }

    /// Create a builder with a custom configuration
    pub fn with_config(config: ReportConfig) -> Self {
        let fetcher = default_fetcher(config.image_timeout_secs);
        Self { config, fetcher }
    }

    /// Replace the image source (tests, offline runs)
    pub fn with_fetcher(mut self, fetcher: Box<dyn ImageFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Read a spreadsheet and render its report
    pub fn build_file<P: AsRef<Path>>(&self, path: P) -> Result<Report> {
        let path = path.as_ref();
        let workbook = reader::read_workbook(path)?;
        self.build(&workbook)
    }

    /// Read a spreadsheet held in memory and render its report
    pub fn build_bytes(&self, bytes: Vec<u8>) -> Result<Report> {
        let workbook = reader::read_workbook_from_bytes(bytes)?;
        self.build(&workbook)
    }

    /// Render every configured section, in order.
    ///
    /// A failing section leaves an error block in the document and is recorded
    /// in the outcomes; later sections still run.
    pub fn build(&self, workbook: &Workbook) -> Result<Report> {
        self.config.validate().context("Invalid configuration")?;

        let product_name = self.product_name(workbook);
        let mut doc = Document::new();
        let mut ctx = SectionContext {
            workbook,
            config: &self.config,
            product_name: &product_name,
            images: ImageEmbedder::new(self.fetcher.as_ref(), self.config.image_dir.clone()),
        };

        let mut outcomes = Vec::with_capacity(self.config.sections.len());
        for spec in &self.config.sections {
            outcomes.push(run_section(spec, &mut doc, &mut ctx));
        }

        format_document(&mut doc, &self.config, &product_name);

        Ok(Report {
            product_name,
            document: doc,
            outcomes,
        })
    }

    fn product_name(&self, workbook: &Workbook) -> String {
        let stem = workbook
            .path
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_PRODUCT_NAME);
        self.config.product_name_or(stem).to_string()
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn run_section(spec: &SectionSpec, doc: &mut Document, ctx: &mut SectionContext<'_>) -> SectionOutcome {
    tracing::info!(section = %spec, "rendering section");
    let error = match render_section(spec, doc, ctx) {
        Ok(()) => None,
        Err(e) => {
            tracing::error!(section = %spec, error = %e, "section failed");
            let message = e.to_string();
            insert_error(doc, &message);
            Some(message)
        }
    };
    SectionOutcome {
        section: spec.to_string(),
        error,
    }
}

/// Read `input`, render the report with `config` and write it to `output`
pub fn generate_report<P, Q>(input: P, output: Q, config: ReportConfig) -> Result<Report>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let report = ReportBuilder::with_config(config).build_file(input)?;
    report.save(output)?;
    Ok(report)
}
