//! JWT claims and user roles.

use serde::{Deserialize, Serialize};

/// Role code stored in the database and carried in tokens.
pub const ROLE_CODE_STANDARD: i64 = 1;
/// Role code for administrators.
pub const ROLE_CODE_ADMIN: i64 = 2;

/// User role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user.
    #[default]
    Standard,
    /// Administrator, bypasses ownership checks on delete.
    Admin,
}

impl Role {
    /// Map a raw role code to a role. Total: unknown codes map to the
    /// least-privileged role, never elevate.
    pub fn from_code(code: i64) -> Self {
        match code {
            ROLE_CODE_ADMIN => Role::Admin,
            _ => Role::Standard,
        }
    }

    /// The wire/storage code for this role.
    pub fn code(self) -> i64 {
        match self {
            Role::Standard => ROLE_CODE_STANDARD,
            Role::Admin => ROLE_CODE_ADMIN,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Standard => write!(f, "standard"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// JWT claims structure.
///
/// The role travels as its raw integer code; callers map it through
/// [`Role::from_code`] when building a `CurrentUser`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub id: i64,

    /// Username.
    pub username: String,

    /// User's email.
    #[serde(default)]
    pub email: Option<String>,

    /// Raw role code.
    pub role: i64,

    /// Expiration time (as Unix timestamp).
    pub exp: i64,

    /// Issued at (as Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,
}

impl Claims {
    /// Map the raw role code to the closed role enumeration.
    pub fn mapped_role(&self) -> Role {
        Role::from_code(self.role)
    }

    /// Check if the claims carry the admin role.
    pub fn is_admin(&self) -> bool {
        self.mapped_role() == Role::Admin
    }
}
