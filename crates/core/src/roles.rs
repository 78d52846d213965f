//! Session roles and their wire names.
//!
//! Only two roles exist on the client. Any name other than
//! [`ROLE_RESPONDENT`] resolves to [`Role::Admin`], which is also the
//! default when the caller supplies no role at all.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_RESPONDENT: &str = "respondent";

/// The actor kind attached to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    #[default]
    Admin,
    Respondent,
}

impl Role {
    /// Resolve a role from its name. Unknown names fall back to `Admin`.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case(ROLE_RESPONDENT) {
            Self::Respondent
        } else {
            Self::Admin
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Respondent => ROLE_RESPONDENT,
        }
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respondent_name_resolves_to_respondent() {
        assert_eq!(Role::from_name("respondent"), Role::Respondent);
        assert_eq!(Role::from_name(" Respondent "), Role::Respondent);
    }

    #[test]
    fn any_other_name_resolves_to_admin() {
        assert_eq!(Role::from_name("admin"), Role::Admin);
        assert_eq!(Role::from_name("Client"), Role::Admin);
        assert_eq!(Role::from_name(""), Role::Admin);
    }

    #[test]
    fn default_is_admin() {
        assert_eq!(Role::default(), Role::Admin);
    }

    #[test]
    fn serializes_lowercase_and_deserializes_leniently() {
        assert_eq!(serde_json::to_string(&Role::Respondent).unwrap(), "\"respondent\"");
        let parsed: Role = serde_json::from_str("\"reviewer\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }
}
