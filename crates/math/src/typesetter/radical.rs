//! Radical signs (TeXbook appendix G, rule 11)

use super::delimiters::stretch_vertical;
use super::ListLayout;
use crate::display::{BoxKind, Child, MathBox, Point, RadicalBox, Rule};
use crate::model::{LineStyle, Radical};
use crate::style::LayoutStyle;
use tracing::warn;

const RADICAL_SIGN: char = '\u{221A}';

impl ListLayout<'_, '_> {
    pub(super) fn make_radical(&self, radical: &Radical) -> MathBox {
        let m = self.metrics;
        let radicand = self.ts.layout_list(&radical.radicand, self.style.cramped(), false);
        if radical.radicand.is_empty() {
            warn!("radical without radicand");
        }
        let Some(sign_glyph) = m.glyph_for_char(RADICAL_SIGN) else {
            warn!("font has no radical sign");
            return radicand;
        };

        let mut clearance = m.radical_vertical_gap(self.style.is_display());
        let thickness = m.radical_rule_thickness();
        let target = radicand.height() + clearance + thickness;
        let sign = stretch_vertical(&m, sign_glyph, target);

        // Center the radicand inside a sign taller than required
        let excess = sign.height() - target;
        if excess > 0.0 {
            clearance += excess / 2.0;
        }
        let radical_ascent = thickness + clearance + radicand.ascent();
        let shift_down = sign.ascent() - radical_ascent;
        let sign_width = sign.width();
        let mut descent = (sign.height() - radical_ascent).max(radicand.descent());
        let mut ascent = radical_ascent + m.radical_extra_ascender();
        let sign = sign.into_box(m.font_size(), shift_down);

        let mut radical_shift = 0.0;
        let mut degree_child = None;
        if let Some(degree) = &radical.degree {
            let degree = self
                .ts
                .layout_list(degree, LayoutStyle::new(LineStyle::ScriptScript, false), false);
            let mut kern_before = m.radical_kern_before_degree();
            let raise = m.radical_degree_bottom_raise() * (ascent - descent);
            radical_shift = kern_before + degree.width() + m.radical_kern_after_degree();
            if radical_shift < 0.0 {
                kern_before -= radical_shift;
                radical_shift = 0.0;
            }
            ascent = ascent.max(raise + degree.ascent());
            descent = descent.max(degree.descent() - raise);
            degree_child = Some(Box::new(Child::at(kern_before, raise, degree)));
        }

        let radicand_x = radical_shift + sign_width;
        let width = radicand_x + radicand.width();
        let rule = Rule::new(
            Point::new(radicand_x, radical_ascent - thickness / 2.0),
            radicand.width(),
            thickness,
        );
        MathBox::new(
            BoxKind::Radical(RadicalBox {
                sign: Box::new(Child::at(radical_shift, 0.0, sign)),
                radicand: Box::new(Child::at(radicand_x, 0.0, radicand)),
                degree: degree_child,
                rule,
                radical_shift,
            }),
            ascent,
            descent,
            width,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::display::{BoxKind, MathBox};
    use crate::model::LineStyle;
    use crate::parser::parse;
    use crate::typesetter::Typesetter;
    use math_font::{FontMathMetrics, SyntheticFont};

    fn typeset(markup: &str) -> MathBox {
        let font = SyntheticFont::default();
        let metrics = FontMathMetrics::new(&font, 10.0).unwrap();
        Typesetter::new(metrics).typeset(&parse(markup).unwrap(), LineStyle::Text)
    }

    #[test]
    fn test_radicand_follows_sign() {
        let node = typeset("\\sqrt{x}");
        let BoxKind::Radical(r) = node.children()[0].node.kind() else {
            panic!("expected radical");
        };
        assert_eq!(r.radical_shift, 0.0);
        assert_eq!(r.radicand.origin.x, r.sign.node.width());
        assert!(r.degree.is_none());
    }

    #[test]
    fn test_rule_sits_above_radicand() {
        let node = typeset("\\sqrt{x}");
        let BoxKind::Radical(r) = node.children()[0].node.kind() else {
            panic!("expected radical");
        };
        let radicand_top = r.radicand.top();
        let rule_bottom = r.rule.from.y - r.rule.thickness / 2.0;
        assert!(rule_bottom >= radicand_top + 0.5 - 1e-4);
        assert_eq!(r.rule.length, r.radicand.node.width());
    }

    #[test]
    fn test_sign_covers_tall_radicand() {
        let node = typeset("\\sqrt{\\frac{\\frac{1}{2}}{\\frac{3}{4}}}");
        let BoxKind::Radical(r) = node.children()[0].node.kind() else {
            panic!("expected radical");
        };
        assert!(r.sign.node.height() >= r.radicand.node.height());
    }
}
