use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// The authenticated identity attached to a request for its lifetime.
/// The role set is always present, possibly empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(id: i64, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Verified bearer-token payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    #[serde(default)]
    pub roles: Vec<Role>,
    pub exp: usize,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Principal::new(claims.sub, claims.roles)
    }
}
