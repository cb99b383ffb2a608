//! MATH table constants
//!
//! A plain copy of the OpenType `MathConstants` record, in design units.

use serde::{Deserialize, Serialize};

/// Global math layout constants of a font, in design units.
///
/// Percentages are stored as whole percents, exactly as the font
/// declares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConstants {
    pub script_percent_scale_down: i16,
    pub script_script_percent_scale_down: i16,
    pub delimited_sub_formula_min_height: u16,
    pub display_operator_min_height: u16,
    pub axis_height: i16,
    pub accent_base_height: i16,

    pub subscript_shift_down: i16,
    pub subscript_top_max: i16,
    pub subscript_baseline_drop_min: i16,
    pub superscript_shift_up: i16,
    pub superscript_shift_up_cramped: i16,
    pub superscript_bottom_min: i16,
    pub superscript_baseline_drop_max: i16,
    pub sub_superscript_gap_min: i16,
    pub superscript_bottom_max_with_subscript: i16,
    pub space_after_script: i16,

    pub upper_limit_gap_min: i16,
    pub upper_limit_baseline_rise_min: i16,
    pub lower_limit_gap_min: i16,
    pub lower_limit_baseline_drop_min: i16,

    pub stack_top_shift_up: i16,
    pub stack_top_display_style_shift_up: i16,
    pub stack_bottom_shift_down: i16,
    pub stack_bottom_display_style_shift_down: i16,
    pub stack_gap_min: i16,
    pub stack_display_style_gap_min: i16,

    pub fraction_numerator_shift_up: i16,
    pub fraction_numerator_display_style_shift_up: i16,
    pub fraction_denominator_shift_down: i16,
    pub fraction_denominator_display_style_shift_down: i16,
    pub fraction_numerator_gap_min: i16,
    pub fraction_num_display_style_gap_min: i16,
    pub fraction_rule_thickness: i16,
    pub fraction_denominator_gap_min: i16,
    pub fraction_denom_display_style_gap_min: i16,

    pub overbar_vertical_gap: i16,
    pub overbar_rule_thickness: i16,
    pub overbar_extra_ascender: i16,
    pub underbar_vertical_gap: i16,
    pub underbar_rule_thickness: i16,
    pub underbar_extra_descender: i16,

    pub radical_vertical_gap: i16,
    pub radical_display_style_vertical_gap: i16,
    pub radical_rule_thickness: i16,
    pub radical_extra_ascender: i16,
    pub radical_kern_before_degree: i16,
    pub radical_kern_after_degree: i16,
    pub radical_degree_bottom_raise_percent: i16,
}

impl MathConstants {
    /// Whether the record can drive layout at all.
    ///
    /// Scale-down and raise percentages outside `1..=100` would collapse or
    /// invert script sizes, so such a table is treated as malformed.
    pub fn is_usable(&self) -> bool {
        let percent = 1..=100;
        percent.contains(&self.script_percent_scale_down)
            && percent.contains(&self.script_script_percent_scale_down)
            && (0..=100).contains(&self.radical_degree_bottom_raise_percent)
    }
}

/// Values of a Latin-Modern-like font with 1000 units per em.
impl Default for MathConstants {
    fn default() -> Self {
        Self {
            script_percent_scale_down: 70,
            script_script_percent_scale_down: 50,
            delimited_sub_formula_min_height: 1300,
            display_operator_min_height: 1300,
            axis_height: 250,
            accent_base_height: 450,

            subscript_shift_down: 247,
            subscript_top_max: 344,
            subscript_baseline_drop_min: 200,
            superscript_shift_up: 363,
            superscript_shift_up_cramped: 289,
            superscript_bottom_min: 108,
            superscript_baseline_drop_max: 250,
            sub_superscript_gap_min: 160,
            superscript_bottom_max_with_subscript: 344,
            space_after_script: 56,

            upper_limit_gap_min: 200,
            upper_limit_baseline_rise_min: 111,
            lower_limit_gap_min: 167,
            lower_limit_baseline_drop_min: 600,

            stack_top_shift_up: 444,
            stack_top_display_style_shift_up: 677,
            stack_bottom_shift_down: 345,
            stack_bottom_display_style_shift_down: 686,
            stack_gap_min: 120,
            stack_display_style_gap_min: 280,

            fraction_numerator_shift_up: 394,
            fraction_numerator_display_style_shift_up: 677,
            fraction_denominator_shift_down: 345,
            fraction_denominator_display_style_shift_down: 686,
            fraction_numerator_gap_min: 40,
            fraction_num_display_style_gap_min: 120,
            fraction_rule_thickness: 40,
            fraction_denominator_gap_min: 40,
            fraction_denom_display_style_gap_min: 120,

            overbar_vertical_gap: 120,
            overbar_rule_thickness: 40,
            overbar_extra_ascender: 40,
            underbar_vertical_gap: 120,
            underbar_rule_thickness: 40,
            underbar_extra_descender: 40,

            radical_vertical_gap: 50,
            radical_display_style_vertical_gap: 148,
            radical_rule_thickness: 40,
            radical_extra_ascender: 40,
            radical_kern_before_degree: 278,
            radical_kern_after_degree: -556,
            radical_degree_bottom_raise_percent: 60,
        }
    }
}
