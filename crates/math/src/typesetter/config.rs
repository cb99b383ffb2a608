//! Typesetter tunables

use serde::{Deserialize, Serialize};

/// Layout constants that are not part of the font's MATH table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypesetterConfig {
    /// Share of the delimited formula a delimiter must cover, per mille
    pub delimiter_factor: f32,
    /// How far a delimiter may fall short of the formula, in points
    pub delimiter_shortfall: f32,
    /// Space between a `\left`/`\right` delimiter and the content, in mu
    pub delimiter_padding_mu: f32,
    /// Extra space above and below stacked limits, in points
    pub limits_extra_padding: f32,
    /// One jot of table row spacing, in em
    pub jot_multiplier: f32,
    /// Table baseline distance, in em
    pub baseline_skip_multiplier: f32,
    /// Table row gap used when rows would collide, in em
    pub line_skip_multiplier: f32,
    /// Smallest gap between table rows before line skip applies, in em
    pub line_skip_limit_multiplier: f32,
    /// Height of `\binom`-style delimiters in display style, in em
    pub display_fraction_delimiter: f32,
    /// Height of `\binom`-style delimiters otherwise, in em
    pub text_fraction_delimiter: f32,
    /// Widest a stretched accent may be relative to its accentee
    pub max_accent_coverage: f32,
}

impl Default for TypesetterConfig {
    fn default() -> Self {
        Self {
            delimiter_factor: 901.0,
            delimiter_shortfall: 5.0,
            delimiter_padding_mu: 1.0,
            limits_extra_padding: 0.0,
            jot_multiplier: 0.3,
            baseline_skip_multiplier: 1.2,
            line_skip_multiplier: 0.1,
            line_skip_limit_multiplier: 0.0,
            display_fraction_delimiter: 2.39,
            text_fraction_delimiter: 1.01,
            max_accent_coverage: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: TypesetterConfig =
            serde_json::from_str(r#"{ "delimiter_padding_mu": 2.0 }"#).unwrap();
        assert_eq!(config.delimiter_padding_mu, 2.0);
        assert_eq!(config.delimiter_factor, 901.0);
        assert_eq!(config.max_accent_coverage, 1.5);
    }
}
