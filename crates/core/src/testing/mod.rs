//! Testing utilities and mock implementations.
//!
//! Provides a mock remote catalog so the service and the server can be
//! exercised end-to-end without network access.

mod mock_remote;

pub use mock_remote::MockGameSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::json;

    use crate::remote::{GameRecord, GameSummary};

    /// Create a test game record with reasonable defaults.
    pub fn game_record(rawg_id: i64, name: &str) -> GameRecord {
        let slug = name.to_lowercase().replace(' ', "-");
        GameRecord::from_payload(
            rawg_id,
            json!({
                "id": rawg_id,
                "name": name,
                "slug": slug,
                "background_image": format!("https://media.rawg.io/{}.jpg", slug),
                "metacritic": 85,
                "released": "2013-09-17",
                "description_raw": format!("{} is a video game.", name)
            }),
        )
    }

    /// Create a test game summary.
    pub fn game_summary(id: i64, name: &str) -> GameSummary {
        GameSummary {
            id,
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            released: Some("2013-09-17".to_string()),
            background_image: None,
            metacritic: Some(85),
            rating: Some(4.2),
        }
    }
}
