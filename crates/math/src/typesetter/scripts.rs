//! Superscript and subscript placement (TeXbook appendix G, rules 18a-f)

use super::ListLayout;
use crate::display::{Child, ScriptRole};
use crate::model::Atom;

impl ListLayout<'_, '_> {
    /// Attach the scripts of `atom` to the last pushed box.
    ///
    /// `delta` is the nucleus' italic correction, added before the
    /// superscript. Bases laid out as text runs start from zero shifts;
    /// other bases hang their scripts from their own extent.
    pub(super) fn make_scripts(&mut self, atom: &Atom, delta: f32, base_is_run: bool) {
        let Some(base) = self.children.last_mut() else {
            return;
        };
        base.node.mark_trailing_script();
        let (base_ascent, base_descent) = (base.node.ascent(), base.node.descent());

        let sup_style = self.style.superscript();
        let sub_style = self.style.subscript();
        let script_metrics = self.ts.metrics_for(sup_style);
        let m = self.metrics;

        let (mut sup_up, mut sub_down) = if base_is_run {
            (0.0, 0.0)
        } else {
            (
                base_ascent - script_metrics.superscript_baseline_drop_max(),
                base_descent + script_metrics.subscript_baseline_drop_min(),
            )
        };
        let min_sup_up = if self.style.cramped {
            m.superscript_shift_up_cramped()
        } else {
            m.superscript_shift_up()
        };

        let sup = atom
            .superscript
            .as_ref()
            .map(|list| self.ts.layout_list(list, sup_style, false));
        let sub = atom
            .subscript
            .as_ref()
            .map(|list| self.ts.layout_list(list, sub_style, false));

        let x = self.x;
        let advance = match (sup, sub) {
            (None, None) => return,
            (None, Some(sub)) => {
                sub_down = sub_down
                    .max(m.subscript_shift_down())
                    .max(sub.ascent() - m.subscript_top_max());
                let width = sub.width();
                self.children.push(Child::at(
                    x,
                    -sub_down,
                    sub.with_script_role(ScriptRole::Subscript),
                ));
                width
            }
            (Some(sup), None) => {
                sup_up = sup_up
                    .max(min_sup_up)
                    .max(sup.descent() + m.superscript_bottom_min());
                let width = sup.width() + delta;
                self.children.push(Child::at(
                    x + delta,
                    sup_up,
                    sup.with_script_role(ScriptRole::Superscript),
                ));
                width
            }
            (Some(sup), Some(sub)) => {
                sup_up = sup_up
                    .max(min_sup_up)
                    .max(sup.descent() + m.superscript_bottom_min());
                sub_down = sub_down.max(m.subscript_shift_down());

                // Gap between the bottom of the superscript and the top of the subscript
                let gap = (sup_up - sup.descent()) + (sub_down - sub.ascent());
                let gap_min = m.sub_superscript_gap_min();
                if gap < gap_min {
                    let half = (gap_min - gap) / 2.0;
                    sup_up += half;
                    sub_down += half;
                }
                let width = (sup.width() + delta).max(sub.width());
                self.children.push(Child::at(
                    x + delta,
                    sup_up,
                    sup.with_script_role(ScriptRole::Superscript),
                ));
                self.children.push(Child::at(
                    x,
                    -sub_down,
                    sub.with_script_role(ScriptRole::Subscript),
                ));
                width
            }
        };
        self.x = x + advance + m.space_after_script();
    }
}

#[cfg(test)]
mod tests {
    use crate::display::{BoxKind, Child, MathBox, ScriptRole};
    use crate::model::LineStyle;
    use crate::parser::parse;
    use crate::typesetter::Typesetter;
    use math_font::{FontMathMetrics, SyntheticFont};

    fn typeset(markup: &str) -> MathBox {
        let font = SyntheticFont::default();
        let metrics = FontMathMetrics::new(&font, 10.0).unwrap();
        Typesetter::new(metrics).typeset(&parse(markup).unwrap(), LineStyle::Text)
    }

    fn script(node: &MathBox, role: ScriptRole) -> Child {
        node.children()
            .into_iter()
            .find(|c| c.node.script_role() == Some(role))
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_superscript_uses_shift_up() {
        let node = typeset("x^2");
        let sup = script(&node, ScriptRole::Superscript);
        assert!(sup.origin.y >= 3.63 - 1e-4);
        assert!(node.children()[0].node.has_trailing_script());
    }

    #[test]
    fn test_superscript_after_italic_correction() {
        let node = typeset("f^2");
        let base = node.children()[0];
        let sup = script(&node, ScriptRole::Superscript);
        let BoxKind::Run(run) = base.node.kind() else {
            panic!("expected run base");
        };
        let advance = run.glyphs[0].advance;
        assert!((sup.origin.x - (advance + 1.1)).abs() < 1e-3);
    }

    #[test]
    fn test_subscript_uses_shift_down() {
        let node = typeset("x_2");
        let sub = script(&node, ScriptRole::Subscript);
        assert!(-sub.origin.y >= 2.47 - 1e-4);
    }

    #[test]
    fn test_both_scripts_keep_clearance() {
        let node = typeset("x^{\\frac{1}{2}}_{\\frac{1}{2}}");
        let sup = script(&node, ScriptRole::Superscript);
        let sub = script(&node, ScriptRole::Subscript);
        let gap = (sup.origin.y - sup.node.descent()) - (sub.origin.y + sub.node.ascent());
        assert!(gap >= 1.6 - 1e-3, "gap {gap}");
    }

    #[test]
    fn test_scripts_are_smaller() {
        let node = typeset("x^x");
        let base = node.children()[0].node.width();
        let sup = script(&node, ScriptRole::Superscript);
        assert!(sup.node.width() < base);
    }

    #[test]
    fn test_space_after_script() {
        let node = typeset("x^2y");
        let sup = script(&node, ScriptRole::Superscript);
        let next = node.children()[2];
        assert!((next.origin.x - (sup.right() + 0.56)).abs() < 1e-3);
    }
}
