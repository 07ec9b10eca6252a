//! Access domain - roles and the static permission tables of the review workflow

mod policy;
mod role;

use thiserror::Error;

use crate::domain::report::ReportStatus;
use crate::domain::DomainError;

pub use policy::{
    allowed_route_prefixes, can_access_route, can_attach_test_results, is_public_path,
    patchable_fields, validate_patch_fields, visible_roles,
};
pub use role::Role;

/// Permission check failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccessError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unauthorized fields: {}", .0.join(", "))]
    UnauthorizedFields(Vec<String>),

    #[error("Sales cannot update report after status is no longer pending (status: {0})")]
    NotPending(ReportStatus),

    #[error("Access denied for role {0}")]
    RoleDenied(Role),
}

impl From<AccessError> for DomainError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::UnknownRole(_) => DomainError::validation(err.to_string()),
            _ => DomainError::forbidden(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_into_domain_error() {
        let err: DomainError = AccessError::RoleDenied(Role::SuperAdmin).into();
        assert!(matches!(err, DomainError::Forbidden { .. }));

        let err: DomainError = AccessError::UnknownRole("x".to_string()).into();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
