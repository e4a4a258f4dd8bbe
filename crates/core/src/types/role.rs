//! Admin role enumeration.

use serde::{Deserialize, Serialize};

/// Admin role with different permission levels.
///
/// Serialized as `"admin"` / `"superadmin"`, matching the values stored in
/// the admin profile records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    /// Full access to content management.
    Admin,
    /// Everything `Admin` can do, plus managing other admins.
    SuperAdmin,
}

impl AdminRole {
    /// Returns the canonical string form (`"admin"` / `"superadmin"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::SuperAdmin),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_from_str_roundtrip() {
        for role in [AdminRole::Admin, AdminRole::SuperAdmin] {
            let parsed: AdminRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_serde_strings() {
        assert_eq!(
            serde_json::to_string(&AdminRole::SuperAdmin).unwrap(),
            "\"superadmin\""
        );
        assert_eq!(
            serde_json::from_str::<AdminRole>("\"admin\"").unwrap(),
            AdminRole::Admin
        );
    }

    #[test]
    fn test_invalid_role_rejected() {
        assert!("viewer".parse::<AdminRole>().is_err());
    }
}
