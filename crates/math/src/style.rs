//! Layout style - TeX's eight styles
//!
//! A [`LayoutStyle`] pairs a [`LineStyle`] with the cramped flag. Each
//! structural context derives its children's style from the current one.

use crate::model::LineStyle;
use math_font::FontMathMetrics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutStyle {
    pub style: LineStyle,
    pub cramped: bool,
}

impl LayoutStyle {
    pub fn new(style: LineStyle, cramped: bool) -> Self {
        Self { style, cramped }
    }

    pub fn display() -> Self {
        Self::new(LineStyle::Display, false)
    }

    pub fn text() -> Self {
        Self::new(LineStyle::Text, false)
    }

    pub fn is_display(&self) -> bool {
        self.style == LineStyle::Display
    }

    /// Script and script-script styles
    pub fn is_script(&self) -> bool {
        self.style >= LineStyle::Script
    }

    /// Same style with the cramped flag set
    pub fn cramped(self) -> Self {
        Self::new(self.style, true)
    }

    /// Replace the line style, keeping the cramped flag
    pub fn with_style(self, style: LineStyle) -> Self {
        Self::new(style, self.cramped)
    }

    fn script_level(&self) -> LineStyle {
        match self.style {
            LineStyle::Display | LineStyle::Text => LineStyle::Script,
            LineStyle::Script | LineStyle::ScriptScript => LineStyle::ScriptScript,
        }
    }

    fn fraction_level(&self) -> LineStyle {
        match self.style {
            LineStyle::Display => LineStyle::Text,
            LineStyle::Text => LineStyle::Script,
            LineStyle::Script | LineStyle::ScriptScript => LineStyle::ScriptScript,
        }
    }

    pub fn superscript(self) -> Self {
        Self::new(self.script_level(), self.cramped)
    }

    pub fn subscript(self) -> Self {
        Self::new(self.script_level(), true)
    }

    pub fn numerator(self) -> Self {
        Self::new(self.fraction_level(), self.cramped)
    }

    pub fn denominator(self) -> Self {
        Self::new(self.fraction_level(), true)
    }

    /// Point size of this style for a font at `base_size`
    pub fn font_size(&self, metrics: &FontMathMetrics<'_>, base_size: f32) -> f32 {
        match self.style {
            LineStyle::Display | LineStyle::Text => base_size,
            LineStyle::Script => base_size * metrics.script_scale_down(),
            LineStyle::ScriptScript => base_size * metrics.script_script_scale_down(),
        }
    }
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self::display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_transitions() {
        let display = LayoutStyle::display();
        assert_eq!(display.numerator(), LayoutStyle::new(LineStyle::Text, false));
        assert_eq!(display.denominator(), LayoutStyle::new(LineStyle::Text, true));
        assert_eq!(
            LayoutStyle::new(LineStyle::Text, true).numerator(),
            LayoutStyle::new(LineStyle::Script, true)
        );
    }

    #[test]
    fn test_script_transitions() {
        let text = LayoutStyle::text();
        assert_eq!(text.superscript(), LayoutStyle::new(LineStyle::Script, false));
        assert_eq!(text.subscript(), LayoutStyle::new(LineStyle::Script, true));
        let script = text.superscript();
        assert_eq!(script.superscript().style, LineStyle::ScriptScript);
        assert_eq!(script.superscript().superscript().style, LineStyle::ScriptScript);
    }

    #[test]
    fn test_script_flag() {
        assert!(!LayoutStyle::display().is_script());
        assert!(LayoutStyle::new(LineStyle::Script, false).is_script());
        assert!(LayoutStyle::new(LineStyle::ScriptScript, true).is_script());
    }

    #[test]
    fn test_font_sizes_cascade() {
        let font = math_font::SyntheticFont::default();
        let metrics = FontMathMetrics::new(&font, 10.0).unwrap();
        let size = |style| LayoutStyle::new(style, false).font_size(&metrics, 10.0);
        assert_eq!(size(LineStyle::Display), 10.0);
        assert_eq!(size(LineStyle::Text), 10.0);
        assert!((size(LineStyle::Script) - 7.0).abs() < 1e-4);
        assert!((size(LineStyle::ScriptScript) - 5.0).abs() < 1e-4);
    }
}
