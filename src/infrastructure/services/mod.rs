//! Infrastructure services

mod similarity_service;

pub use similarity_service::{
    CheckOutcome, SimilarityCheck, SimilarityService, SimilarityServiceConfig,
    SimilarityServiceTrait,
};

#[cfg(test)]
pub use similarity_service::mock::MockSimilarityService;
