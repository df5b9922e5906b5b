//! User role enumeration.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role assigned to a user at registration time.
///
/// The role is decided once, when the account is created, and never
/// promoted afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// A regular shopper.
    #[default]
    Standard,
    /// The administrator account.
    Administrator,
}

/// Error returned when a stored role string is not recognized.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown user role: {0}")]
pub struct RoleParseError(pub String);

impl UserRole {
    /// The canonical string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Administrator => "administrator",
        }
    }

    /// Whether this role grants administrative access.
    #[must_use]
    pub const fn is_administrator(self) -> bool {
        matches!(self, Self::Administrator)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "administrator" => Ok(Self::Administrator),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_storage_string() {
        for role in [UserRole::Standard, UserRole::Administrator] {
            let parsed: UserRole = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&UserRole::Administrator).unwrap();
        assert_eq!(json, "\"administrator\"");
    }

    #[test]
    fn test_default_is_standard() {
        assert_eq!(UserRole::default(), UserRole::Standard);
        assert!(!UserRole::Standard.is_administrator());
    }
}
