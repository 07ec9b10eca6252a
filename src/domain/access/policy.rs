//! Static role permission tables
//!
//! `can_access_route` and `is_public_path` back the route access middleware.
//! The field, directory and test-result rules are the workflow contract for
//! the report and user CRUD handlers, which live outside this service; they
//! are kept here so every surface applies the same tables.

use super::{AccessError, Role};
use crate::domain::report::ReportStatus;

/// Paths reachable without a session
const PUBLIC_PATH_PREFIXES: &[&str] = &[
    "/api/auth",
    "/login",
    "/register",
    "/dashboard",
    "/api/users",
    "/api/report",
    "/api/check-similar-report",
];

/// Route prefixes each role may open
pub fn allowed_route_prefixes(role: Role) -> &'static [&'static str] {
    match role {
        Role::SuperAdmin => &["/superadmindashboard", "/upload"],
        Role::Admin => &["/upload", "/admin"],
        Role::LabTester => &["/labtester", "/sales"],
        Role::Sales => &["/sales", "/upload"],
    }
}

/// Report fields each role may change
pub fn patchable_fields(role: Role) -> &'static [&'static str] {
    match role {
        Role::Sales => &[
            "fileUrl",
            "fileSize",
            "fileType",
            "storageFileId",
            "sharedWith",
            "title",
            "description",
            "isPrivate",
            "tags",
        ],
        Role::LabTester | Role::Admin => &["status", "sharedWith", "testResults", "tags"],
        Role::SuperAdmin => &["status", "tags"],
    }
}

/// Equal to the prefix, or below it on a segment boundary
fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn is_public_path(path: &str) -> bool {
    path == "/"
        || PUBLIC_PATH_PREFIXES
            .iter()
            .any(|prefix| matches_prefix(path, prefix))
}

/// Decide whether a user with `role` (None when anonymous) may open `path`
pub fn can_access_route(role: Option<Role>, path: &str) -> bool {
    if is_public_path(path) {
        return true;
    }

    match role {
        None => false,
        Some(Role::Sales) => true,
        Some(role) => allowed_route_prefixes(role)
            .iter()
            .any(|prefix| matches_prefix(path, prefix)),
    }
}

/// Check a report patch against the role's field table
///
/// Sales users may only patch while the report is still pending.
pub fn validate_patch_fields<'a, I>(
    role: Role,
    fields: I,
    current_status: ReportStatus,
) -> Result<(), AccessError>
where
    I: IntoIterator<Item = &'a str>,
{
    let allowed = patchable_fields(role);
    let rejected: Vec<String> = fields
        .into_iter()
        .filter(|field| !allowed.contains(field))
        .map(str::to_string)
        .collect();

    if !rejected.is_empty() {
        return Err(AccessError::UnauthorizedFields(rejected));
    }

    if role == Role::Sales && !current_status.is_pending() {
        return Err(AccessError::NotPending(current_status));
    }

    Ok(())
}

/// Roles a user may see in the user directory
pub fn visible_roles(role: Role) -> Result<&'static [Role], AccessError> {
    match role {
        Role::Sales => Ok(&[Role::LabTester, Role::Sales]),
        Role::LabTester => Ok(&[Role::Sales, Role::LabTester]),
        Role::Admin => Ok(&[Role::LabTester, Role::Sales, Role::Admin]),
        Role::SuperAdmin => Err(AccessError::RoleDenied(role)),
    }
}

pub fn can_attach_test_results(role: Role) -> bool {
    role.is_reviewer()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths_need_no_role() {
        assert!(can_access_route(None, "/"));
        assert!(can_access_route(None, "/login"));
        assert!(can_access_route(None, "/api/auth/register"));
        assert!(can_access_route(None, "/api/check-similar-report"));
        assert!(!can_access_route(None, "/admin"));
    }

    #[test]
    fn test_public_prefix_respects_segments() {
        assert!(!is_public_path("/loginx"));
        assert!(!is_public_path("/api/reports-export"));
        assert!(is_public_path("/api/report/r-1"));
    }

    #[test]
    fn test_role_route_table() {
        assert!(can_access_route(Some(Role::Admin), "/admin/dashboard"));
        assert!(can_access_route(Some(Role::Admin), "/upload"));
        assert!(!can_access_route(Some(Role::Admin), "/superadmindashboard"));

        assert!(can_access_route(Some(Role::SuperAdmin), "/superadmindashboard"));
        assert!(!can_access_route(Some(Role::SuperAdmin), "/admin"));

        assert!(can_access_route(Some(Role::LabTester), "/sales/dashboard"));
        assert!(!can_access_route(Some(Role::LabTester), "/upload"));
        assert!(!can_access_route(Some(Role::LabTester), "/salesforce"));
    }

    #[test]
    fn test_sales_may_open_any_route() {
        assert!(can_access_route(Some(Role::Sales), "/admin"));
        assert!(can_access_route(Some(Role::Sales), "/superadmindashboard"));
    }

    #[test]
    fn test_patch_fields_allowed() {
        assert!(
            validate_patch_fields(Role::Sales, ["title", "tags"], ReportStatus::Pending).is_ok()
        );
        assert!(
            validate_patch_fields(Role::Admin, ["status"], ReportStatus::Reviewed).is_ok()
        );
        assert!(
            validate_patch_fields(Role::SuperAdmin, ["status", "tags"], ReportStatus::Approved)
                .is_ok()
        );
    }

    #[test]
    fn test_patch_fields_rejected_are_named() {
        let err = validate_patch_fields(
            Role::LabTester,
            ["status", "title", "fileUrl"],
            ReportStatus::Pending,
        )
        .unwrap_err();

        assert_eq!(
            err,
            AccessError::UnauthorizedFields(vec!["title".to_string(), "fileUrl".to_string()])
        );
        assert_eq!(err.to_string(), "Unauthorized fields: title, fileUrl");
    }

    #[test]
    fn test_sales_cannot_patch_after_review_started() {
        let err =
            validate_patch_fields(Role::Sales, ["title"], ReportStatus::Reviewed).unwrap_err();
        assert_eq!(err, AccessError::NotPending(ReportStatus::Reviewed));
    }

    #[test]
    fn test_field_check_runs_before_status_check() {
        let err =
            validate_patch_fields(Role::Sales, ["status"], ReportStatus::Approved).unwrap_err();
        assert!(matches!(err, AccessError::UnauthorizedFields(_)));
    }

    #[test]
    fn test_visible_roles() {
        assert_eq!(
            visible_roles(Role::Sales).unwrap(),
            &[Role::LabTester, Role::Sales]
        );
        assert_eq!(visible_roles(Role::Admin).unwrap().len(), 3);
        assert_eq!(
            visible_roles(Role::SuperAdmin),
            Err(AccessError::RoleDenied(Role::SuperAdmin))
        );
    }

    #[test]
    fn test_test_result_uploaders() {
        assert!(can_attach_test_results(Role::LabTester));
        assert!(can_attach_test_results(Role::Admin));
        assert!(!can_attach_test_results(Role::Sales));
        assert!(!can_attach_test_results(Role::SuperAdmin));
    }
}
