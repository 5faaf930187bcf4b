//! quotesheet-core: quote-sheet reports from product specification workbooks
//!
//! Reads a spreadsheet whose sheets follow loose layout conventions (marker
//! rows, `Footnote N` definitions, `[n]` references) and renders the
//! configured sections into a `.docx` document.

pub mod blocks;
pub mod config;
pub mod docx;
pub mod error;
pub mod format;
pub mod images;
pub mod markup;
pub mod reader;
pub mod report;
pub mod sections;

pub use config::{ReportConfig, SectionSpec, StyleWords};
pub use error::SectionError;
pub use images::{ImageFetcher, NoFetch};
pub use report::{Report, ReportBuilder, SectionOutcome, generate_report};
