//! Report entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_report_id, ReportValidationError};

/// Report identifier - alphanumeric, hyphens and underscores, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportId(String);

impl ReportId {
    /// Create a new ReportId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ReportValidationError> {
        let id = id.into();
        validate_report_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ReportId {
    type Error = ReportValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReportId> for String {
    fn from(id: ReportId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review status of a report
///
/// Wire names match the values already present in stored report data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReportStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "reviewed")]
    Reviewed,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "RejectedByLab")]
    RejectedByLab,
    #[serde(rename = "RejectedByAdmin")]
    RejectedByAdmin,
}

impl ReportStatus {
    /// Returns the wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Approved => "approved",
            Self::RejectedByLab => "RejectedByLab",
            Self::RejectedByAdmin => "RejectedByAdmin",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Approved or rejected by either reviewer
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::Approved | Self::RejectedByLab | Self::RejectedByAdmin
        )
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = ReportValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "reviewed" => Ok(Self::Reviewed),
            "approved" => Ok(Self::Approved),
            "RejectedByLab" => Ok(Self::RejectedByLab),
            "RejectedByAdmin" => Ok(Self::RejectedByAdmin),
            other => Err(ReportValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// A file held by the external file storage provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    /// Direct URL to the stored file
    pub file_url: String,
    /// File extension or kind, e.g. "pdf"
    pub file_type: String,
    pub file_size: u64,
    /// Provider-side identifier, needed to delete the file later
    pub storage_file_id: String,
}

impl FileAttachment {
    pub fn new(
        file_url: impl Into<String>,
        file_type: impl Into<String>,
        file_size: u64,
        storage_file_id: impl Into<String>,
    ) -> Self {
        Self {
            file_url: file_url.into(),
            file_type: file_type.into(),
            file_size,
            storage_file_id: storage_file_id.into(),
        }
    }
}

/// A verdict file attached by a lab tester or admin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    #[serde(flatten)]
    pub file: FileAttachment,
    pub uploaded_by: String,
}

/// An uploaded report under review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    pub uploaded_by: String,
    #[serde(default)]
    pub shared_with: Vec<String>,
    #[serde(flatten)]
    pub file: FileAttachment,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default)]
    pub test_results: Vec<TestResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        id: ReportId,
        title: impl Into<String>,
        uploaded_by: impl Into<String>,
        file: FileAttachment,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            title: title.into(),
            uploaded_by: uploaded_by.into(),
            shared_with: Vec::new(),
            file,
            tags: Vec::new(),
            is_private: false,
            description: None,
            status: ReportStatus::default(),
            test_results: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_shared_with<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shared_with = users.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Attach a verdict file and bump `updated_at`
    pub fn add_test_result(&mut self, result: TestResult) {
        self.test_results.push(result);
        self.updated_at = Utc::now();
    }

    pub fn is_shared_with(&self, user_id: &str) -> bool {
        self.shared_with.iter().any(|u| u == user_id)
    }
}
