//! User accounts.
//!
//! Registration and credential verification; users own wishlist and library
//! entries. Accounts are immutable after creation apart from credential
//! rotation, which no caller currently exercises.

pub mod password;

mod sqlite;
mod types;

pub use sqlite::SqliteUserStore;
pub use types::*;

use thiserror::Error;

/// Errors for user storage operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),
}

/// Trait for user storage.
pub trait UserStore: Send + Sync {
    /// Create a new user. Username and email must be unique.
    fn create(&self, new_user: NewUser) -> Result<User, UserError>;

    /// Get a user by internal id.
    fn get(&self, id: i64) -> Result<Option<User>, UserError>;

    /// Look up a user by email (login path).
    fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Look up a user by username.
    fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;
}
