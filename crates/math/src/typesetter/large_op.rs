//! Large operators and limits (TeXbook appendix G, rule 13)

use super::text::RunBuilder;
use super::ListLayout;
use crate::display::{BoxKind, Child, GlyphBox, LimitsBox, MathBox};
use crate::model::{Atom, FontStyle};
use math_font::Orientation;

/// A laid out operator
pub(super) struct LargeOp {
    pub(super) node: MathBox,
    /// Italic correction, added to the superscript's offset
    pub(super) delta: f32,
    /// The scripts were placed as limits
    pub(super) limits: bool,
}

impl ListLayout<'_, '_> {
    pub(super) fn make_large_op(&self, atom: &Atom, limits: bool) -> LargeOp {
        let limits = limits && self.style.is_display();
        let (nucleus, delta) = self.operator_nucleus(atom, limits);
        if limits && atom.has_scripts() {
            let node = self.make_limits(atom, nucleus, delta);
            return LargeOp {
                node,
                delta,
                limits: true,
            };
        }
        LargeOp {
            node: nucleus,
            delta,
            limits: false,
        }
    }

    /// The operator symbol centered on the axis, or its name as upright text
    fn operator_nucleus(&self, atom: &Atom, limits: bool) -> (MathBox, f32) {
        let m = self.metrics;
        let mut chars = atom.nucleus.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(ch), None) => m.glyph_for_char(ch),
            _ => None,
        };
        let Some(glyph) = single else {
            let mut run = RunBuilder::new(0.0, m.font_size(), FontStyle::Roman);
            run.push_text(&m, atom, &atom.nucleus, 0.0);
            return (run.finish(), 0.0);
        };

        let sized = if self.style.is_display() {
            m.variant_for_size(glyph, Orientation::Vertical, m.display_operator_min_height())
        } else {
            m.glyph(glyph)
        };
        let delta = sized.italic_correction;
        let shift_down = 0.5 * (sized.ascent - sized.descent) - m.axis_height();
        let mut width = sized.width;
        if atom.subscript.is_some() && !limits {
            width -= delta;
        }
        let node = MathBox::glyph(
            GlyphBox {
                glyph: sized.glyph,
                font_size: m.font_size(),
                shift_down,
            },
            sized.ascent,
            sized.descent,
            width,
        );
        (node, delta)
    }

    fn make_limits(&self, atom: &Atom, nucleus: MathBox, delta: f32) -> MathBox {
        let m = self.metrics;
        let upper = atom
            .superscript
            .as_ref()
            .map(|list| self.ts.layout_list(list, self.style.superscript(), false));
        let lower = atom
            .subscript
            .as_ref()
            .map(|list| self.ts.layout_list(list, self.style.subscript(), false));

        let width = [
            Some(nucleus.width()),
            upper.as_ref().map(MathBox::width),
            lower.as_ref().map(MathBox::width),
        ]
        .into_iter()
        .flatten()
        .fold(0.0, f32::max);
        let extra = self.ts.config().limits_extra_padding;
        let mut ascent = nucleus.ascent();
        let mut descent = nucleus.descent();

        let upper = upper.map(|sup| {
            let gap = m
                .upper_limit_gap_min()
                .max(m.upper_limit_baseline_rise_min() - sup.descent());
            let y = nucleus.ascent() + gap + sup.descent();
            ascent = y + sup.ascent() + extra;
            Box::new(Child::at((width - sup.width()) / 2.0 + delta / 2.0, y, sup))
        });
        let lower = lower.map(|sub| {
            let gap = m
                .lower_limit_gap_min()
                .max(m.lower_limit_baseline_drop_min() - sub.ascent());
            let drop = nucleus.descent() + gap + sub.ascent();
            descent = drop + sub.descent() + extra;
            Box::new(Child::at((width - sub.width()) / 2.0 - delta / 2.0, -drop, sub))
        });

        let nucleus_x = (width - nucleus.width()) / 2.0;
        MathBox::new(
            BoxKind::Limits(LimitsBox {
                nucleus: Box::new(Child::at(nucleus_x, 0.0, nucleus)),
                upper,
                lower,
            }),
            ascent,
            descent,
            width,
        )
    }
}
