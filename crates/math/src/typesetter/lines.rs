//! Overlines and underlines (TeXbook appendix G, rules 9 and 10)

use super::ListLayout;
use crate::display::{BoxKind, Child, LineBox, MathBox, Point, Rule};
use crate::model::MathList;

impl ListLayout<'_, '_> {
    pub(super) fn make_overline(&self, list: &MathList) -> MathBox {
        let m = self.metrics;
        let inner = self.ts.layout_list(list, self.style.cramped(), false);
        let gap = m.overbar_vertical_gap();
        let thickness = m.overbar_rule_thickness();
        let rule = Rule::new(
            Point::new(0.0, inner.ascent() + gap + thickness / 2.0),
            inner.width(),
            thickness,
        );
        let ascent = inner.ascent() + gap + thickness + m.overbar_extra_ascender();
        let (descent, width) = (inner.descent(), inner.width());
        MathBox::new(
            BoxKind::Line(LineBox {
                inner: Box::new(Child::at(0.0, 0.0, inner)),
                rule,
                over: true,
            }),
            ascent,
            descent,
            width,
        )
    }

    pub(super) fn make_underline(&self, list: &MathList) -> MathBox {
        let m = self.metrics;
        let inner = self.ts.layout_list(list, self.style, false);
        let gap = m.underbar_vertical_gap();
        let thickness = m.underbar_rule_thickness();
        let rule = Rule::new(
            Point::new(0.0, -(inner.descent() + gap + thickness / 2.0)),
            inner.width(),
            thickness,
        );
        let descent = inner.descent() + gap + thickness + m.underbar_extra_descender();
        let (ascent, width) = (inner.ascent(), inner.width());
        MathBox::new(
            BoxKind::Line(LineBox {
                inner: Box::new(Child::at(0.0, 0.0, inner)),
                rule,
                over: false,
            }),
            ascent,
            descent,
            width,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::display::{BoxKind, LineBox, MathBox};
    use crate::model::LineStyle;
    use crate::parser::parse;
    use crate::typesetter::Typesetter;
    use math_font::{FontMathMetrics, SyntheticFont};

    fn line_of(markup: &str) -> (MathBox, LineBox) {
        let font = SyntheticFont::default();
        let metrics = FontMathMetrics::new(&font, 10.0).unwrap();
        let node = Typesetter::new(metrics).typeset(&parse(markup).unwrap(), LineStyle::Text);
        let line = node.children()[0].node.clone();
        match line.kind() {
            BoxKind::Line(l) => {
                let l = l.clone();
                (line, l)
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_overline_clears_content() {
        let (node, line) = line_of("\\overline{x}");
        assert!(line.over);
        let rule_bottom = line.rule.from.y - line.rule.thickness / 2.0;
        assert!(rule_bottom > line.inner.node.ascent());
        assert!(node.ascent() >= rule_bottom + line.rule.thickness);
        assert_eq!(line.rule.length, line.inner.node.width());
    }

    #[test]
    fn test_underline_sits_below_descent() {
        let (node, line) = line_of("\\underline{y}");
        assert!(!line.over);
        let rule_top = line.rule.from.y + line.rule.thickness / 2.0;
        assert!(-rule_top > line.inner.node.descent());
        assert!(node.descent() > line.inner.node.descent());
        assert_eq!(node.ascent(), line.inner.node.ascent());
    }
}
