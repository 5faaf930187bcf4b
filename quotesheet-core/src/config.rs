//! Configuration for report generation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Product name shown above the callouts and in the page header
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default = "default_font_name")]
    pub font_name: String,
    /// Default font size in points
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Page margin on every side, in points
    #[serde(default = "default_margin_pt")]
    pub margin_pt: f64,
    /// Directory downloaded images are saved into before embedding
    #[serde(default)]
    pub image_dir: Option<PathBuf>,
    #[serde(default = "default_image_timeout_secs")]
    pub image_timeout_secs: u64,
    /// Logo placed in the page footer
    #[serde(default)]
    pub footer_logo: Option<PathBuf>,
    /// Footnotes containing any of these phrases are left out
    #[serde(default = "default_footnote_skip_phrases")]
    pub footnote_skip_phrases: Vec<String>,
    /// Sheet holding the docking and service lists
    #[serde(default = "default_tech_specs_sheet")]
    pub tech_specs_sheet: String,
    #[serde(default)]
    pub style: StyleWords,
    /// Sections in output order
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionSpec>,
}

impl ReportConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ReportConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Reject settings that cannot produce a document
    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            anyhow::bail!("Configuration error: 'sections' must list at least one section");
        }
        if !(self.font_size > 0.0) {
            anyhow::bail!(
                "Configuration error: font_size must be positive, got {}",
                self.font_size
            );
        }
        if !(self.margin_pt >= 0.0) {
            anyhow::bail!(
                "Configuration error: margin_pt must not be negative, got {}",
                self.margin_pt
            );
        }
        for section in &self.sections {
            if let SectionSpec::Footnotes {
                start_row, end_row, ..
            } = section
            {
                if start_row > end_row {
                    anyhow::bail!(
                        "Configuration error: footnotes range {}..={} is reversed",
                        start_row,
                        end_row
                    );
                }
            }
        }
        Ok(())
    }

    /// Product name, falling back to `fallback` (usually the input file stem)
    pub fn product_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.product_name.as_deref().unwrap_or(fallback)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            product_name: None,
            font_name: default_font_name(),
            font_size: default_font_size(),
            margin_pt: default_margin_pt(),
            image_dir: None,
            image_timeout_secs: default_image_timeout_secs(),
            footer_logo: None,
            footnote_skip_phrases: default_footnote_skip_phrases(),
            tech_specs_sheet: default_tech_specs_sheet(),
            style: StyleWords::default(),
            sections: default_sections(),
        }
    }
}

fn default_font_name() -> String {
    "HP Forma DJR Office".to_string()
}

fn default_font_size() -> f64 {
    10.0
}

fn default_margin_pt() -> f64 {
    20.0
}

fn default_image_timeout_secs() -> u64 {
    10
}

fn default_footnote_skip_phrases() -> Vec<String> {
    vec!["Container Name".to_string(), "Wireless WAN".to_string()]
}

fn default_tech_specs_sheet() -> String {
    "Tech Specs".to_string()
}

fn default_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec::Callouts,
        SectionSpec::Options,
        SectionSpec::SystemUnit,
        SectionSpec::Processors,
        SectionSpec::Docking,
        SectionSpec::Service,
    ]
}

/// Literal run texts that get whole-run styling
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleWords {
    #[serde(default)]
    pub bold_words: Vec<String>,
    #[serde(default)]
    pub blue_words: Vec<String>,
}

impl StyleWords {
    /// Load word lists from a JSON file (`{"bold_words": [...], "blue_words": [...]}`)
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read style words: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid style words file: {}", path.display()))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let words: StyleWords = serde_json::from_str(content)?;
        Ok(words)
    }

    pub fn is_bold(&self, text: &str) -> bool {
        self.bold_words.iter().any(|w| w == text)
    }

    pub fn is_blue(&self, text: &str) -> bool {
        self.blue_words.iter().any(|w| w == text)
    }

    /// Add words from `other` that are not already listed
    pub fn extend(&mut self, other: StyleWords) {
        for word in other.bold_words {
            if !self.bold_words.contains(&word) {
                self.bold_words.push(word);
            }
        }
        for word in other.blue_words {
            if !self.blue_words.contains(&word) {
                self.blue_words.push(word);
            }
        }
    }
}

/// One output section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionSpec {
    Callouts,
    Options,
    SystemUnit,
    Processors,
    Docking,
    Service,
    /// Named list from a sheet (defaults to the tech specs sheet)
    List {
        #[serde(default)]
        sheet: Option<String>,
        start: String,
    },
    /// Every `Table` block of a sheet
    Tables { sheet: String },
    /// A single body cell as a paragraph
    Paragraph { sheet: String, row: usize, col: usize },
    /// Body rows `start_row..=end_row` of one column as a footnote block
    Footnotes {
        sheet: String,
        start_row: usize,
        end_row: usize,
        col: usize,
    },
}

impl SectionSpec {
    pub fn name(&self) -> &'static str {
        match self {
            SectionSpec::Callouts => "callouts",
            SectionSpec::Options => "options",
            SectionSpec::SystemUnit => "system_unit",
            SectionSpec::Processors => "processors",
            SectionSpec::Docking => "docking",
            SectionSpec::Service => "service",
            SectionSpec::List { .. } => "list",
            SectionSpec::Tables { .. } => "tables",
            SectionSpec::Paragraph { .. } => "paragraph",
            SectionSpec::Footnotes { .. } => "footnotes",
        }
    }
}

impl fmt::Display for SectionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionSpec::List { start, .. } => write!(f, "list '{}'", start),
            SectionSpec::Tables { sheet } => write!(f, "tables of '{}'", sheet),
            SectionSpec::Paragraph { sheet, row, col } => {
                write!(f, "paragraph '{}'!({}, {})", sheet, row, col)
            }
            SectionSpec::Footnotes { sheet, .. } => write!(f, "footnotes of '{}'", sheet),
            other => f.write_str(other.name()),
        }
    }
}

/// Parses the fixed section names accepted on the command line
impl FromStr for SectionSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "callouts" => Ok(SectionSpec::Callouts),
            "options" => Ok(SectionSpec::Options),
            "system_unit" => Ok(SectionSpec::SystemUnit),
            "processors" => Ok(SectionSpec::Processors),
            "docking" => Ok(SectionSpec::Docking),
            "service" => Ok(SectionSpec::Service),
            other => anyhow::bail!(
                "Unknown section '{}' (expected callouts, options, system_unit, processors, docking or service)",
                other
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.font_name, "HP Forma DJR Office");
        assert_eq!(config.font_size, 10.0);
        assert_eq!(config.sections.len(), 6);
        assert_eq!(config.sections[0], SectionSpec::Callouts);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_sections() {
        let config = ReportConfig::from_toml_str(
            r#"
product_name = "HP EliteBook 840 G11"
image_dir = "/tmp/qs-images"

[style]
bold_words = ["Wireless"]

[[sections]]
kind = "processors"

[[sections]]
kind = "list"
start = "Docking (sold separately)"

[[sections]]
kind = "footnotes"
sheet = "Notes"
start_row = 2
end_row = 5
col = 1
"#,
        )
        .unwrap();

        assert_eq!(config.product_name.as_deref(), Some("HP EliteBook 840 G11"));
        assert_eq!(config.image_dir, Some(PathBuf::from("/tmp/qs-images")));
        assert_eq!(config.style.bold_words, vec!["Wireless"]);
        assert_eq!(config.sections.len(), 3);
        assert_eq!(config.sections[0], SectionSpec::Processors);
        assert_eq!(
            config.sections[1],
            SectionSpec::List {
                sheet: None,
                start: "Docking (sold separately)".into()
            }
        );
        // Untouched keys keep their defaults
        assert_eq!(config.tech_specs_sheet, "Tech Specs");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = ReportConfig::default();
        config.sections.clear();
        assert!(config.validate().is_err());

        let mut config = ReportConfig::default();
        config.font_size = 0.0;
        assert!(config.validate().is_err());

        let mut config = ReportConfig::default();
        config.sections = vec![SectionSpec::Footnotes {
            sheet: "Notes".into(),
            start_row: 5,
            end_row: 2,
            col: 0,
        }];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_style_words_json() {
        let words = StyleWords::from_json_str(
            r#"{"bold_words": ["Wireless", "Audio"], "blue_words": ["Sold separately"]}"#,
        )
        .unwrap();
        assert!(words.is_bold("Audio"));
        assert!(!words.is_bold("audio"));
        assert!(words.is_blue("Sold separately"));

        let only_bold = StyleWords::from_json_str(r#"{"bold_words": ["Ports"]}"#).unwrap();
        assert!(only_bold.blue_words.is_empty());

        let mut merged = words.clone();
        merged.extend(only_bold);
        merged.extend(words.clone());
        assert_eq!(merged.bold_words, vec!["Wireless", "Audio", "Ports"]);
    }

    #[test]
    fn test_section_from_str() {
        assert_eq!("system-unit".parse::<SectionSpec>().unwrap(), SectionSpec::SystemUnit);
        assert_eq!(" Docking ".parse::<SectionSpec>().unwrap(), SectionSpec::Docking);
        assert!("memory".parse::<SectionSpec>().is_err());
    }
}
