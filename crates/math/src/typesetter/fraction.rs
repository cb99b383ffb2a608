//! Fractions and rule-less stacks (TeXbook appendix G, rule 15)

use super::delimiters::boundary_box;
use super::ListLayout;
use crate::display::{BoxKind, Child, FractionBox, MathBox, Point, Rule};
use crate::model::{Fraction, LineStyle};
use tracing::warn;

impl ListLayout<'_, '_> {
    pub(super) fn make_fraction(&self, fraction: &Fraction) -> MathBox {
        if fraction.numerator.is_empty() && fraction.denominator.is_empty() {
            warn!("fraction without numerator or denominator");
            return MathBox::empty();
        }
        let style = match (fraction.forced_style, fraction.continued) {
            (Some(forced), _) => self.style.with_style(forced),
            (None, true) => self.style.with_style(LineStyle::Display),
            (None, false) => self.style,
        };
        let m = self.ts.metrics_for(style);
        let display = style.is_display();

        let numerator = self.ts.layout_list(&fraction.numerator, style.numerator(), false);
        let denominator = self
            .ts
            .layout_list(&fraction.denominator, style.denominator(), false);

        let mut shift_up = m.numerator_shift_up(display, fraction.has_rule);
        let mut shift_down = m.denominator_shift_down(display, fraction.has_rule);
        let axis = m.axis_height();
        let thickness = if fraction.has_rule {
            m.fraction_rule_thickness()
        } else {
            0.0
        };

        if fraction.has_rule {
            let above_bar = (shift_up - numerator.descent()) - (axis + thickness / 2.0);
            let min_above = m.fraction_numerator_gap_min(display);
            if above_bar < min_above {
                shift_up += min_above - above_bar;
            }
            let below_bar = (axis - thickness / 2.0) - (denominator.ascent() - shift_down);
            let min_below = m.fraction_denominator_gap_min(display);
            if below_bar < min_below {
                shift_down += min_below - below_bar;
            }
        } else {
            let clearance = (shift_up - numerator.descent()) - (denominator.ascent() - shift_down);
            let min_gap = m.stack_gap_min(display);
            if clearance < min_gap {
                shift_up += (min_gap - clearance) / 2.0;
                shift_down += (min_gap - clearance) / 2.0;
            }
        }

        let width = numerator.width().max(denominator.width());
        let ascent = numerator.ascent() + shift_up;
        let descent = denominator.descent() + shift_down;
        let rule = fraction
            .has_rule
            .then(|| Rule::new(Point::new(0.0, axis), width, thickness));
        let body = MathBox::new(
            BoxKind::Fraction(FractionBox {
                numerator: Box::new(Child::at(
                    (width - numerator.width()) / 2.0,
                    shift_up,
                    numerator,
                )),
                denominator: Box::new(Child::at(
                    (width - denominator.width()) / 2.0,
                    -shift_down,
                    denominator,
                )),
                rule,
            }),
            ascent,
            descent,
            width,
        );

        if fraction.left_delimiter.is_none() && fraction.right_delimiter.is_none() {
            return body;
        }

        let config = self.ts.config();
        let height = m.font_size()
            * if display {
                config.display_fraction_delimiter
            } else {
                config.text_fraction_delimiter
            };
        let delimiter = |d: &Option<String>| d.as_deref().and_then(|d| boundary_box(&m, d, height));
        let mut children = Vec::new();
        let mut x = 0.0;
        if let Some(left) = delimiter(&fraction.left_delimiter) {
            x += left.width();
            children.push(Child::at(0.0, 0.0, left));
        }
        let body_width = body.width();
        children.push(Child::at(x, 0.0, body));
        x += body_width;
        if let Some(right) = delimiter(&fraction.right_delimiter) {
            let width = right.width();
            children.push(Child::at(x, 0.0, right));
            x += width;
        }
        MathBox::container(children, x)
    }
}
