//! Domain layer - Core business logic and entities

pub mod access;
pub mod error;
pub mod report;
pub mod similarity;

pub use access::{AccessError, Role};
pub use error::DomainError;
pub use report::{FileAttachment, Report, ReportId, ReportRepository, ReportStatus, TestResult};
pub use similarity::{
    normalize, FuzzyOptions, QueryKey, SearchIndex, SearchQuery, SimilarityCache,
    SimilarityCacheEntry,
};
