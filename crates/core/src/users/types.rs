//! User types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered user.
///
/// The password hash never leaves the process: it is skipped on
/// serialization so it cannot leak through an API response.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a user. The password is expected to already be
/// hashed by [`crate::users::password::hash_password`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
