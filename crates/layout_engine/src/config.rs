//! Line breaking configuration

use serde::{Deserialize, Serialize};

/// Cost of breaking at each kind of boundary; lower is preferred
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakPenalties {
    /// After a binary operator
    pub binary: f32,
    /// After a relation
    pub relation: f32,
    /// After punctuation
    pub punctuation: f32,
    /// After a closing bracket or before an opening one
    pub bracket: f32,
    /// Between words of upright text
    pub text: f32,
    /// Any other boundary between atoms
    pub default: f32,
}

impl Default for BreakPenalties {
    fn default() -> Self {
        Self {
            binary: 0.0,
            relation: 0.0,
            punctuation: 10.0,
            bracket: 200.0,
            text: 15.0,
            default: 50.0,
        }
    }
}

/// Configuration for line breaking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineBreakConfig {
    pub penalties: BreakPenalties,
    /// Number of boundaries scanned back from an overflow
    pub window: usize,
    /// Penalty points per percent of the width left unused
    pub slack_weight: f32,
    /// Space between one line's descent and the next line's ascent, in em
    pub min_line_gap: f32,
    /// Smallest line height as a fraction of the font size
    pub min_line_height: f32,
}

impl Default for LineBreakConfig {
    fn default() -> Self {
        Self {
            penalties: BreakPenalties::default(),
            window: 12,
            slack_weight: 0.5,
            min_line_gap: 0.2,
            min_line_height: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_prefer_operators() {
        let p = BreakPenalties::default();
        assert!(p.relation <= p.punctuation);
        assert!(p.punctuation < p.default);
        assert!(p.default < p.bracket);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: LineBreakConfig =
            serde_json::from_str(r#"{"window": 4, "penalties": {"bracket": 90.0}}"#).unwrap();
        assert_eq!(config.window, 4);
        assert_eq!(config.penalties.bracket, 90.0);
        assert_eq!(config.penalties.default, 50.0);
        assert_eq!(config.min_line_height, 0.2);
    }
}
