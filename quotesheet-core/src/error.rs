//! Section-level failures

use thiserror::Error;

/// Why a section could not be rendered. The report builder turns these into a
/// visible error block and carries on with the next section.
#[derive(Debug, Error)]
pub enum SectionError {
    #[error("Sheet {} not found in the workbook.", quote_names(.0))]
    SheetNotFound(Vec<String>),

    #[error("'{marker}' not found in sheet '{sheet}'.")]
    MarkerNotFound { sheet: String, marker: String },

    #[error("No rows to render in sheet '{sheet}' ({what}).")]
    EmptyRange { sheet: String, what: String },
}

impl SectionError {
    pub fn sheet_not_found(candidates: &[&str]) -> Self {
        SectionError::SheetNotFound(candidates.iter().map(|s| s.to_string()).collect())
    }

    pub fn marker_not_found(sheet: &str, marker: &str) -> Self {
        SectionError::MarkerNotFound {
            sheet: sheet.to_string(),
            marker: marker.to_string(),
        }
    }

    pub fn empty_range(sheet: &str, what: &str) -> Self {
        SectionError::EmptyRange {
            sheet: sheet.to_string(),
            what: what.to_string(),
        }
    }
}

fn quote_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SectionError::sheet_not_found(&["Processors", "Processor"]).to_string(),
            "Sheet 'Processors' or 'Processor' not found in the workbook."
        );
        assert_eq!(
            SectionError::marker_not_found("Tech Specs", "Docking (sold separately)").to_string(),
            "'Docking (sold separately)' not found in sheet 'Tech Specs'."
        );
    }
}
