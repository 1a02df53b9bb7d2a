//! Requester identity and roles.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Role of a requester, driving discount applicability and access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Regular customer (default role).
    #[default]
    Customer,

    /// Preferential tier customer, eligible for the tier discount.
    Premium,

    /// Administrator; may read any order and manage the catalog.
    Admin,
}

impl Role {
    /// Returns true for the admin role.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Premium => "premium",
            Role::Admin => "admin",
        }
    }

    /// Parses a role from its string name (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_ascii_lowercase().as_str() {
            "customer" => Some(Role::Customer),
            "premium" => Some(Role::Premium),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated requester for a single call.
///
/// Passed explicitly into every core operation; the engine never reads
/// identity from ambient or thread-local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    /// Creates an identity with the given role.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Creates a customer identity with a fresh user ID. Test convenience.
    pub fn customer() -> Self {
        Self::new(UserId::new(), Role::Customer)
    }

    /// Creates a premium identity with a fresh user ID. Test convenience.
    pub fn premium() -> Self {
        Self::new(UserId::new(), Role::Premium)
    }

    /// Creates an admin identity with a fresh user ID. Test convenience.
    pub fn admin() -> Self {
        Self::new(UserId::new(), Role::Admin)
    }

    /// Returns true if this identity carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
