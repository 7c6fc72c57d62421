//! Account roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role attached to a signed-in account.
///
/// `User` is the least-privileged role and the fallback for anything the
/// client does not recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full back-office access.
    Admin,
    /// Shopper; can browse and buy.
    #[default]
    User,
    /// Catalogue maintainer; manages categories.
    User2,
}

impl Role {
    /// All roles, in menu order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::User, Self::User2];

    /// Wire/storage name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::User2 => "user2",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::User => "User",
            Self::User2 => "User2",
        }
    }

    /// Parse a role, falling back to [`Role::User`] for unknown or missing values.
    ///
    /// Never fails: an unexpected value read from storage or returned by the
    /// server degrades to the least-privileged role.
    #[must_use]
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "user2" => Ok(Self::User2),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default_known() {
        for role in Role::ALL {
            assert_eq!(Role::parse_or_default(Some(role.as_str())), role);
        }
    }

    #[test]
    fn test_parse_or_default_fails_open() {
        assert_eq!(Role::parse_or_default(Some("superuser")), Role::User);
        assert_eq!(Role::parse_or_default(Some("ADMIN")), Role::User);
        assert_eq!(Role::parse_or_default(Some("")), Role::User);
        assert_eq!(Role::parse_or_default(None), Role::User);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Role::User2).unwrap(), "\"user2\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_label() {
        assert_eq!(Role::User2.label(), "User2");
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
