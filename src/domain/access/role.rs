//! User roles

use serde::{Deserialize, Serialize};

use super::AccessError;

/// Role of an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages users across all domains
    SuperAdmin,
    /// Domain administrator, reviews and approves reports
    Admin,
    /// Reviews reports shared with them and uploads verdicts
    LabTester,
    /// Uploads reports
    Sales,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::SuperAdmin, Role::Admin, Role::LabTester, Role::Sales];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "superadmin",
            Self::Admin => "admin",
            Self::LabTester => "labtester",
            Self::Sales => "sales",
        }
    }

    /// Whether this role reviews reports (scores, approves, attaches verdicts)
    pub fn is_reviewer(&self) -> bool {
        matches!(self, Self::Admin | Self::LabTester)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AccessError::UnknownRole(s.to_string()))
    }
}
