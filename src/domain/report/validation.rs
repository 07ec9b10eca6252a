//! Report validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum length for report IDs
pub const MAX_REPORT_ID_LENGTH: usize = 64;

/// Maximum length for report titles
pub const MAX_REPORT_TITLE_LENGTH: usize = 300;

static REPORT_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid report id pattern"));

/// Errors that can occur during report validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReportValidationError {
    #[error("Report ID cannot be empty")]
    EmptyId,

    #[error("Report ID cannot exceed {0} characters")]
    IdTooLong(usize),

    #[error("Report ID can only contain alphanumeric characters, hyphens and underscores")]
    InvalidIdCharacters,

    #[error("Report title cannot be empty")]
    EmptyTitle,

    #[error("Report title cannot exceed {0} characters")]
    TitleTooLong(usize),

    #[error("Unknown report status: {0}")]
    UnknownStatus(String),
}

/// Validate a report ID
pub fn validate_report_id(id: &str) -> Result<(), ReportValidationError> {
    if id.is_empty() {
        return Err(ReportValidationError::EmptyId);
    }

    if id.len() > MAX_REPORT_ID_LENGTH {
        return Err(ReportValidationError::IdTooLong(MAX_REPORT_ID_LENGTH));
    }

    if !REPORT_ID_PATTERN.is_match(id) {
        return Err(ReportValidationError::InvalidIdCharacters);
    }

    Ok(())
}

/// Validate a report title
pub fn validate_report_title(title: &str) -> Result<(), ReportValidationError> {
    if title.trim().is_empty() {
        return Err(ReportValidationError::EmptyTitle);
    }

    if title.chars().count() > MAX_REPORT_TITLE_LENGTH {
        return Err(ReportValidationError::TitleTooLong(MAX_REPORT_TITLE_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_report_ids() {
        assert!(validate_report_id("r-1").is_ok());
        assert!(validate_report_id("65f0c1a2b3d4e5f6a7b8c9d0").is_ok());
        assert!(validate_report_id("report_2024").is_ok());
    }

    #[test]
    fn test_invalid_report_ids() {
        assert_eq!(validate_report_id(""), Err(ReportValidationError::EmptyId));
        assert_eq!(
            validate_report_id("has space"),
            Err(ReportValidationError::InvalidIdCharacters)
        );
        assert_eq!(
            validate_report_id(&"a".repeat(65)),
            Err(ReportValidationError::IdTooLong(64))
        );
    }

    #[test]
    fn test_report_title() {
        assert!(validate_report_title("Eco-Friendly Bottle").is_ok());
        assert_eq!(
            validate_report_title("   "),
            Err(ReportValidationError::EmptyTitle)
        );
        assert_eq!(
            validate_report_title(&"t".repeat(301)),
            Err(ReportValidationError::TitleTooLong(300))
        );
    }
}
