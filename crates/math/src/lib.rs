//! Math Crate - TeX-style math markup layout
//!
//! This crate turns LaTeX-like math markup into positioned boxes:
//! - An atom model for parsed expressions
//! - A markup parser with finalization and a round-trip serializer
//! - A typesetter implementing TeX's box-and-glue rules over OpenType MATH metrics
//! - A box tree with a pure positioning pass
//! - A renderer issuing calls on a drawing surface

pub mod display;
pub mod error;
pub mod finalize;
pub mod model;
pub mod parser;
pub mod render;
pub mod serializer;
pub mod style;
pub mod symbols;
pub mod typesetter;

pub use display::{
    BoxKind, Child, Color, Ink, MathBox, Point, PositionedBox, Rule, ScriptRole, TextRun,
};
pub use error::*;
pub use model::*;
pub use parser::{parse, parse_with_mode, MathMode};
pub use render::{DrawCommand, DrawingSurface, Rect, RecordingSurface, RenderConfig, Renderer};
pub use serializer::to_markup;
pub use style::LayoutStyle;
pub use typesetter::{Typesetter, TypesetterConfig};

use math_font::{FontMathMetrics, MathFont};

/// Parse `markup` and lay it out with `font` at `font_size` points.
///
/// Outer `$$...$$` or `\[...\]` delimiters select display style, `$...$`
/// or `\(...\)` text style; undelimited markup uses `style`.
pub fn typeset_markup(
    markup: &str,
    font: &dyn MathFont,
    font_size: f32,
    style: LineStyle,
    config: TypesetterConfig,
) -> MathResult<MathBox> {
    let metrics = FontMathMetrics::new(font, font_size)?;
    let (list, mode) = parse_with_mode(markup)?;
    let style = match mode {
        Some(MathMode::Display) => LineStyle::Display,
        Some(MathMode::Inline) => LineStyle::Text,
        None => style,
    };
    Ok(Typesetter::with_config(metrics, config).typeset(&list, style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_font::SyntheticFont;

    #[test]
    fn test_parse_typeset_render_pipeline() {
        let font = SyntheticFont::default();
        let node = typeset_markup(
            "\\frac{-b \\pm \\sqrt{b^2-4ac}}{2a}",
            &font,
            12.0,
            LineStyle::Display,
            TypesetterConfig::default(),
        )
        .unwrap();
        assert!(node.width() > 0.0);
        assert!(node.height() > 0.0);

        let mut surface = RecordingSurface::new();
        Renderer::new().render(&node.positioned(Point::origin()), &mut surface);
        assert!(!surface.commands().is_empty());
    }

    #[test]
    fn test_parse_error_surfaces() {
        let font = SyntheticFont::default();
        let err = typeset_markup("{x", &font, 12.0, LineStyle::Text, TypesetterConfig::default())
            .unwrap_err();
        assert!(matches!(err, MathError::Parse(ParseError::MismatchedBraces { .. })));
    }

    #[test]
    fn test_invalid_size_is_metrics_error() {
        let font = SyntheticFont::default();
        let err = typeset_markup("x", &font, 0.0, LineStyle::Text, TypesetterConfig::default())
            .unwrap_err();
        assert!(matches!(err, MathError::Metrics(_)));
    }

    #[test]
    fn test_outer_delimiters_pick_style() {
        let font = SyntheticFont::default();
        let typeset = |markup: &str| {
            typeset_markup(markup, &font, 10.0, LineStyle::Text, TypesetterConfig::default()).unwrap()
        };
        let display = typeset("$$\\sum_{i=0}^n i$$");
        let inline = typeset("$\\sum_{i=0}^n i$");
        assert!(display.height() > inline.height());
    }
}
