use serde::{Deserialize, Serialize};

/// A user account row
///
/// `password` holds whatever the table stores: an Argon2 PHC string, or a
/// legacy value that bootstrap has not rehashed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
    pub suspended: bool,
    pub admin: bool,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password_hash.into(),
            suspended: false,
            admin: false,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            username: self.username.clone(),
            suspended: self.suspended,
            admin: self.admin,
        }
    }
}

/// What the API is allowed to show about a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub suspended: bool,
    pub admin: bool,
}

/// Admin edits to an account; `password_hash` is already hashed
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub password_hash: Option<String>,
    pub suspended: Option<bool>,
    pub admin: Option<bool>,
}

impl UserChanges {
    pub fn apply(&self, user: &mut User) {
        if let Some(hash) = &self.password_hash {
            user.password = hash.clone();
        }
        if let Some(suspended) = self.suspended {
            user.suspended = suspended;
        }
        if let Some(admin) = self.admin {
            user.admin = admin;
        }
    }
}
