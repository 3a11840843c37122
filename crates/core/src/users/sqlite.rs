//! SQLite-backed user store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{NewUser, User, UserError, UserStore};

/// SQLite-backed user store.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

impl SqliteUserStore {
    /// Create a new SQLite user store, creating the database file and tables
    /// if needed.
    pub fn new(path: &Path) -> Result<Self, UserError> {
        let conn = Connection::open(path).map_err(|e| UserError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite user store (useful for testing).
    pub fn in_memory() -> Result<Self, UserError> {
        let conn =
            Connection::open_in_memory().map_err(|e| UserError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), UserError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| UserError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let created_at_str: String = row.get(4)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at,
        })
    }

    fn find_by_column(&self, column: &str, value: &str) -> Result<Option<User>, UserError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            &format!(
                "SELECT id, username, email, password_hash, created_at FROM users WHERE {} = ?",
                column
            ),
            params![value],
            Self::row_to_user,
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(UserError::Database(e.to_string())),
        }
    }
}

impl UserStore for SqliteUserStore {
    fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();

        let result = conn.execute(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
            params![
                &new_user.username,
                &new_user.email,
                &new_user.password_hash,
                &now.to_rfc3339(),
            ],
        );

        if let Err(e) = result {
            let message = e.to_string();
            if message.contains("users.username") {
                return Err(UserError::DuplicateUsername(new_user.username));
            }
            if message.contains("users.email") {
                return Err(UserError::DuplicateEmail(new_user.email));
            }
            return Err(UserError::Database(message));
        }

        let id = conn.last_insert_rowid();

        Ok(User {
            id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
        })
    }

    fn get(&self, id: i64) -> Result<Option<User>, UserError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?",
            params![id],
            Self::row_to_user,
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(UserError::Database(e.to_string())),
        }
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.find_by_column("email", email)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        self.find_by_column("username", username)
    }
}
