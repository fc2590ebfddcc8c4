use std::path::Path;

use anyhow::Context;
use chess_core::{DEFAULT_SEARCH_DEPTH, Weights};
use serde::{Deserialize, Serialize};

/// Settings read from a TOML file. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub search_depth: u8,
    pub human_white: bool,
    /// Root moves scoring within this much of the best are picked at random.
    pub variety: i32,
    pub weights: Weights,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            human_white: true,
            variety: 0,
            weights: Weights::default(),
        }
    }
}

impl CliConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
