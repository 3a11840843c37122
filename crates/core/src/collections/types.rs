//! Types for collection operations.

use serde::{Deserialize, Serialize};

/// Result of a wishlist toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// True if the entry was created, false if it was removed.
    pub added: bool,
}

/// Result of a library add.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryAddOutcome {
    /// True if the entry was created.
    pub added: bool,
    /// Why nothing was added (currently only "already in library").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl LibraryAddOutcome {
    pub fn added() -> Self {
        Self {
            added: true,
            reason: None,
        }
    }

    pub fn already_present() -> Self {
        Self {
            added: false,
            reason: Some("already in library".to_string()),
        }
    }
}

/// Wishlist/library membership flags for one (user, game) pair.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Membership {
    pub in_wishlist: bool,
    pub in_library: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_outcome_serialization() {
        let added = LibraryAddOutcome::added();
        let json = serde_json::to_string(&added).unwrap();
        assert!(!json.contains("reason")); // None should be skipped

        let dup = LibraryAddOutcome::already_present();
        let json = serde_json::to_string(&dup).unwrap();
        assert!(json.contains("already in library"));
    }
}
