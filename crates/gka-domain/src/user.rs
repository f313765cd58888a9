//! User domain types.

use serde::{Deserialize, Serialize};

/// User permission level.
///
/// Wire format in JWT claims and the `users.role` column: `u8` (0 = User, 1 = Admin).
/// JSON bodies use the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User = 0,
    Admin = 1,
}

impl UserRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::User),
            1 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Single authorization predicate: does this role grant access to a scope
    /// that requires `required`?
    pub fn satisfies(self, required: UserRole) -> bool {
        self >= required
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl PartialOrd for UserRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_u8().cmp(&other.as_u8())
    }
}
