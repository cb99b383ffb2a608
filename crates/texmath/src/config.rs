//! Configuration file for the command-line front end

use anyhow::{Context, Result};
use layout_engine::LineBreakConfig;
use math::TypesetterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Both layout configurations, each section optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub typesetter: TypesetterConfig,
    pub line_breaking: LineBreakConfig,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid configuration JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("In config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_sections_override_independently() {
        let settings = Settings::from_json(
            r#"{"typesetter": {"delimiter_factor": 850.0}, "line_breaking": {"window": 6}}"#,
        )
        .unwrap();
        assert_eq!(settings.typesetter.delimiter_factor, 850.0);
        assert_eq!(settings.typesetter.delimiter_shortfall, 5.0);
        assert_eq!(settings.line_breaking.window, 6);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{\"typesetter\": 3}").is_err());
    }
}
