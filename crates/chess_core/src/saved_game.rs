use serde::{Deserialize, Serialize};

use crate::types::Color;

/// On-disk form of a game: settings plus the moves played, as move text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub search_depth: u8,
    pub human_side: Color,
    /// Starting position when the game did not begin from the standard setup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_fen: Option<String>,
    pub moves: Vec<String>,
}

impl SavedGame {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
