//! Report domain - uploaded reports and their review state

mod entity;
mod repository;
mod validation;

pub use entity::{FileAttachment, Report, ReportId, ReportStatus, TestResult};
pub use repository::ReportRepository;
pub use validation::{
    validate_report_id, validate_report_title, ReportValidationError, MAX_REPORT_ID_LENGTH,
    MAX_REPORT_TITLE_LENGTH,
};

#[cfg(test)]
pub use repository::mock::MockReportRepository;
