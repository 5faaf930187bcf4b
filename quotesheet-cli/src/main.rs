use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use quotesheet_core::{ReportBuilder, ReportConfig, SectionSpec, StyleWords};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod formatter;

const DEFAULT_CONFIG: &str = "quotesheet.toml";

#[derive(Parser)]
#[command(name = "quotesheet")]
#[command(about = "Generate quote-sheet DOCX reports from product specification workbooks", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Excel/ODS file (`-` reads from stdin)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output DOCX file (defaults to the input name with a .docx extension)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// JSON file with `bold_words` / `blue_words` lists
    #[arg(long, value_name = "JSON")]
    style_words: Option<PathBuf>,

    /// Product name shown in the callouts and page header
    #[arg(long)]
    product_name: Option<String>,

    /// Directory where downloaded images are saved
    #[arg(long, value_name = "DIR")]
    image_dir: Option<PathBuf>,

    /// Sections to render, in order (overrides the configuration)
    #[arg(long, num_args = 1.., value_name = "SECTION")]
    sections: Vec<SectionSpec>,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored summary
    Human,
    /// JSON summary for scripting
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let builder = ReportBuilder::with_config(config);

    let from_stdin = cli.file.as_os_str() == "-";
    let report = if from_stdin {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read workbook from stdin")?;
        builder.build_bytes(bytes)?
    } else {
        builder
            .build_file(&cli.file)
            .with_context(|| format!("Failed to build report for {}", cli.file.display()))?
    };

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.file, from_stdin));
    report
        .save(&output)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    match cli.format {
        OutputFormat::Human => formatter::print_human(&output, &report),
        OutputFormat::Json => formatter::print_json(&output, &report)?,
    }

    // Failed sections are already visible in the document
    let exit_code = if report.failures().next().is_some() { 1 } else { 0 };
    std::process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit config, else `quotesheet.toml` in the working directory, else
/// defaults; command-line flags are applied on top
fn load_config(cli: &Cli) -> Result<ReportConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        ReportConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        let default_config_path = PathBuf::from(DEFAULT_CONFIG);
        if default_config_path.exists() {
            ReportConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            ReportConfig::default()
        }
    };

    if let Some(path) = &cli.style_words {
        config.style.extend(StyleWords::from_json_file(path)?);
    }
    if let Some(name) = &cli.product_name {
        config.product_name = Some(name.clone());
    }
    if let Some(dir) = &cli.image_dir {
        config.image_dir = Some(dir.clone());
    }
    if !cli.sections.is_empty() {
        config.sections = cli.sections.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn default_output(input: &Path, from_stdin: bool) -> PathBuf {
    if from_stdin {
        PathBuf::from("quote_sheet.docx")
    } else {
        input.with_extension("docx")
    }
}
