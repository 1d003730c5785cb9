//! User accounts.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// A stored user account row.
///
/// `password` holds the PHC-formatted hash, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Values for a single INSERT into `users`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl From<NewUser> for User {
    fn from(value: NewUser) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            password: value.password_hash,
        }
    }
}
