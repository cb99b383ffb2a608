//! Stretchy glyphs and delimited groups
//!
//! A glyph is stretched by walking its variant ladder for the smallest
//! variant that reaches the target, then falling back to the font's
//! assembly recipe.

use super::ListLayout;
use crate::display::{AssemblyBox, Child, GlyphBox, MathBox};
use crate::model::{AtomType, Inner};
use math_font::{AssembledGlyph, FontMathMetrics, GlyphId, Orientation, SizedGlyph};
use tracing::warn;

/// A glyph variant or an assembled glyph
#[derive(Debug, Clone)]
pub(crate) enum Stretched {
    Glyph(SizedGlyph),
    Assembly(AssembledGlyph),
}

impl Stretched {
    pub(crate) fn ascent(&self) -> f32 {
        match self {
            Stretched::Glyph(g) => g.ascent,
            Stretched::Assembly(a) => a.ascent,
        }
    }

    pub(crate) fn descent(&self) -> f32 {
        match self {
            Stretched::Glyph(g) => g.descent,
            Stretched::Assembly(a) => a.descent,
        }
    }

    pub(crate) fn width(&self) -> f32 {
        match self {
            Stretched::Glyph(g) => g.width,
            Stretched::Assembly(a) => a.width,
        }
    }

    pub(crate) fn height(&self) -> f32 {
        self.ascent() + self.descent()
    }

    /// Box for the glyph moved down by `shift_down`
    pub(crate) fn into_box(self, font_size: f32, shift_down: f32) -> MathBox {
        match self {
            Stretched::Glyph(g) => MathBox::glyph(
                GlyphBox {
                    glyph: g.glyph,
                    font_size,
                    shift_down,
                },
                g.ascent,
                g.descent,
                g.width,
            ),
            Stretched::Assembly(a) => {
                let (ascent, descent, width) = (a.ascent, a.descent, a.width);
                MathBox::assembly(
                    AssemblyBox {
                        orientation: a.orientation,
                        parts: a.parts,
                        font_size,
                        shift_down,
                    },
                    ascent,
                    descent,
                    width,
                )
            }
        }
    }
}

/// `glyph` at least `target` tall, or as tall as the font allows
pub(crate) fn stretch_vertical(metrics: &FontMathMetrics<'_>, glyph: GlyphId, target: f32) -> Stretched {
    let sized = metrics.variant_for_size(glyph, Orientation::Vertical, target);
    if sized.height() < target {
        if let Some(assembled) = metrics.assemble(glyph, Orientation::Vertical, target) {
            return Stretched::Assembly(assembled);
        }
    }
    Stretched::Glyph(sized)
}

/// `glyph` covering `target` width without exceeding `max_ratio` times it
/// when the font allows
pub(crate) fn stretch_horizontal(
    metrics: &FontMathMetrics<'_>,
    glyph: GlyphId,
    target: f32,
    max_ratio: f32,
) -> Stretched {
    let ladder = metrics.size_ladder(glyph, Orientation::Horizontal);
    let covering = ladder
        .iter()
        .map(|&g| metrics.glyph(g))
        .find(|g| g.width >= target);
    if let Some(variant) = covering.filter(|g| g.width <= target * max_ratio) {
        return Stretched::Glyph(variant);
    }
    if let Some(assembled) = metrics.assemble(glyph, Orientation::Horizontal, target) {
        return Stretched::Assembly(assembled);
    }
    match covering {
        Some(variant) => Stretched::Glyph(variant),
        None => Stretched::Glyph(metrics.horizontal_variant_within(glyph, f32::INFINITY)),
    }
}

/// Delimiter glyph at least `height` tall, centered on the math axis.
///
/// Returns `None` for the empty delimiter and for characters the font
/// cannot map.
pub(crate) fn boundary_box(metrics: &FontMathMetrics<'_>, delimiter: &str, height: f32) -> Option<MathBox> {
    let ch = delimiter.chars().next()?;
    let Some(glyph) = metrics.glyph_for_char(ch) else {
        warn!(%delimiter, "delimiter has no glyph in the font");
        return None;
    };
    let stretched = stretch_vertical(metrics, glyph, height);
    let shift_down = 0.5 * (stretched.ascent() - stretched.descent()) - metrics.axis_height();
    Some(
        stretched
            .into_box(metrics.font_size(), shift_down)
            .with_atom_type(AtomType::Boundary),
    )
}

impl ListLayout<'_, '_> {
    /// Height a delimiter needs to cover `content` (TeXbook rule 19)
    fn delimiter_height(&self, content: &MathBox) -> f32 {
        let config = self.ts.config();
        let axis = self.metrics.axis_height();
        let delta = (content.ascent() - axis).max(content.descent() + axis);
        let covered = delta / 500.0 * config.delimiter_factor;
        let short = 2.0 * delta - config.delimiter_shortfall;
        covered.max(short)
    }

    pub(super) fn make_inner(&self, inner: &Inner) -> MathBox {
        let mut content = ListLayout::new(self.ts, self.style, true, None).layout(&inner.list);
        let height = self.delimiter_height(&content);
        if inner
            .list
            .iter()
            .any(|a| a.atom_type() == AtomType::Boundary)
        {
            content = ListLayout::new(self.ts, self.style, true, Some(height)).layout(&inner.list);
        }

        let padding = self.ts.config().delimiter_padding_mu * self.metrics.mu();
        let boundary = |atom: &Option<Box<crate::model::Atom>>| {
            atom.as_ref()
                .and_then(|a| boundary_box(&self.metrics, &a.nucleus, height))
        };

        let mut children = Vec::new();
        let mut x = 0.0;
        if let Some(left) = boundary(&inner.left) {
            x += left.width() + padding;
            children.push(Child::at(0.0, 0.0, left));
        }
        x += content.width();
        children.push(Child::at(x - content.width(), 0.0, content));
        if let Some(right) = boundary(&inner.right) {
            x += padding;
            let width = right.width();
            children.push(Child::at(x, 0.0, right));
            x += width;
        }
        MathBox::container(children, x)
    }

    /// A `\middle` delimiter inside a delimited group
    pub(super) fn make_middle(&self, delimiter: &str) -> MathBox {
        boundary_box(&self.metrics, delimiter, self.middle_height.unwrap_or(0.0))
            .unwrap_or_else(MathBox::empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::BoxKind;
    use crate::model::LineStyle;
    use crate::parser::parse;
    use crate::typesetter::Typesetter;
    use math_font::SyntheticFont;

    fn metrics(font: &SyntheticFont) -> FontMathMetrics<'_> {
        FontMathMetrics::new(font, 10.0).unwrap()
    }

    #[test]
    fn test_small_target_uses_base_glyph() {
        let font = SyntheticFont::default();
        let m = metrics(&font);
        let paren = m.glyph_for_char('(').unwrap();
        let stretched = stretch_vertical(&m, paren, 5.0);
        assert!(matches!(stretched, Stretched::Glyph(g) if g.glyph == paren));
    }

    #[test]
    fn test_tall_target_assembles() {
        let font = SyntheticFont::default();
        let m = metrics(&font);
        let paren = m.glyph_for_char('(').unwrap();
        let stretched = stretch_vertical(&m, paren, 60.0);
        assert!(matches!(stretched, Stretched::Assembly(_)));
        assert!(stretched.height() >= 60.0);
    }

    #[test]
    fn test_ladder_covers_target() {
        let font = SyntheticFont::default();
        let m = metrics(&font);
        let paren = m.glyph_for_char('(').unwrap();
        for target in [11.0, 14.0, 19.0, 25.0] {
            assert!(stretch_vertical(&m, paren, target).height() >= target);
        }
    }

    #[test]
    fn test_horizontal_stays_within_ratio() {
        let font = SyntheticFont::default();
        let m = metrics(&font);
        let hat = m.glyph_for_char('\u{0302}').unwrap();
        for target in [6.0, 9.0, 13.0, 18.0] {
            let width = stretch_horizontal(&m, hat, target, 1.5).width();
            assert!(width >= target && width <= target * 1.5, "{target} -> {width}");
        }
    }

    #[test]
    fn test_boundary_is_centered_on_axis() {
        let font = SyntheticFont::default();
        let m = metrics(&font);
        let node = boundary_box(&m, "(", 30.0).unwrap();
        let center = (node.ascent() - node.descent()) / 2.0;
        assert!((center - m.axis_height()).abs() < 1e-3);
        assert!(boundary_box(&m, "", 30.0).is_none());
    }

    #[test]
    fn test_inner_delimiters_cover_content() {
        let font = SyntheticFont::default();
        let ts = Typesetter::new(metrics(&font));
        let node = ts.typeset(&parse("\\left(\\frac{\\frac{1}{2}}{3}\\right)").unwrap(), LineStyle::Display);
        let inner = &node.children()[0].node;
        let BoxKind::Container(parts) = inner.kind() else {
            panic!("expected container");
        };
        assert_eq!(parts.len(), 3);
        let content = &parts[1].node;
        let left = &parts[0].node;
        assert!(left.height() >= 0.9 * content.height());
        assert!(parts[1].origin.x > left.width());
    }

    #[test]
    fn test_middle_matches_outer_delimiters() {
        let font = SyntheticFont::default();
        let ts = Typesetter::new(metrics(&font));
        let node = ts.typeset(&parse("\\left(\\frac{1}{2}\\middle|x\\right)").unwrap(), LineStyle::Display);
        let BoxKind::Container(parts) = node.children()[0].node.kind() else {
            panic!("expected container");
        };
        let left_height = parts[0].node.height();
        let content = &parts[1].node;
        let middle = content
            .children()
            .into_iter()
            .find(|c| c.node.atom_type() == Some(AtomType::Boundary))
            .unwrap();
        assert!((middle.node.height() - left_height).abs() < 1e-3);
    }
}
