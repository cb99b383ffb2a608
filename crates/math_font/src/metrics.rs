//! Font math metrics at a point size
//!
//! [`FontMathMetrics`] pairs a [`MathFont`] handle with a point size and
//! exposes the MATH constants and glyph queries in points. It is cheap to
//! copy; script sizes are derived with [`FontMathMetrics::with_size`].

use crate::{
    tile_parts, AssembledGlyph, AssembledPart, GlyphId, MathConstants, MathFont, MetricsError,
    Orientation, Result, ScaledPart, ShapedRun, SizedGlyph,
};
use std::fmt;

/// Math constants and glyph measurements of one font at one size
#[derive(Clone, Copy)]
pub struct FontMathMetrics<'f> {
    font: &'f dyn MathFont,
    font_size: f32,
    units_per_em: u16,
    constants: MathConstants,
}

impl fmt::Debug for FontMathMetrics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontMathMetrics")
            .field("font_size", &self.font_size)
            .field("units_per_em", &self.units_per_em)
            .finish_non_exhaustive()
    }
}

impl<'f> FontMathMetrics<'f> {
    /// Read the MATH table of `font` for use at `font_size` points.
    ///
    /// Fails with [`MetricsError::MissingMathTable`] when the table is
    /// absent or unusable.
    pub fn new(font: &'f dyn MathFont, font_size: f32) -> Result<Self> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(MetricsError::InvalidSize(font_size));
        }
        let units_per_em = font.units_per_em();
        if units_per_em == 0 {
            return Err(MetricsError::InvalidFontData("units per em is zero".into()));
        }
        let constants = font
            .math_constants()
            .filter(MathConstants::is_usable)
            .ok_or(MetricsError::MissingMathTable)?;

        Ok(Self {
            font,
            font_size,
            units_per_em,
            constants,
        })
    }

    /// The same font at another size. Non-positive sizes are clamped to a
    /// tiny positive size.
    pub fn with_size(&self, font_size: f32) -> Self {
        Self {
            font_size: if font_size.is_finite() && font_size > 0.0 {
                font_size
            } else {
                f32::EPSILON
            },
            ..*self
        }
    }

    pub fn font(&self) -> &'f dyn MathFont {
        self.font
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Raw constants in design units
    pub fn constants(&self) -> &MathConstants {
        &self.constants
    }

    /// One math unit, 1/18 em
    pub fn mu(&self) -> f32 {
        self.font_size / 18.0
    }

    /// Convert design units to points
    pub fn to_points(&self, design_units: f32) -> f32 {
        design_units * self.font_size / self.units_per_em as f32
    }

    fn pt(&self, value: i16) -> f32 {
        self.to_points(value as f32)
    }

    // =========================================================================
    // Constants
    // =========================================================================

    pub fn script_scale_down(&self) -> f32 {
        self.constants.script_percent_scale_down as f32 / 100.0
    }

    pub fn script_script_scale_down(&self) -> f32 {
        self.constants.script_script_percent_scale_down as f32 / 100.0
    }

    pub fn axis_height(&self) -> f32 {
        self.pt(self.constants.axis_height)
    }

    pub fn accent_base_height(&self) -> f32 {
        self.pt(self.constants.accent_base_height)
    }

    pub fn delimited_sub_formula_min_height(&self) -> f32 {
        self.to_points(self.constants.delimited_sub_formula_min_height as f32)
    }

    pub fn display_operator_min_height(&self) -> f32 {
        self.to_points(self.constants.display_operator_min_height as f32)
    }

    pub fn subscript_shift_down(&self) -> f32 {
        self.pt(self.constants.subscript_shift_down)
    }

    pub fn subscript_top_max(&self) -> f32 {
        self.pt(self.constants.subscript_top_max)
    }

    pub fn subscript_baseline_drop_min(&self) -> f32 {
        self.pt(self.constants.subscript_baseline_drop_min)
    }

    pub fn superscript_shift_up(&self) -> f32 {
        self.pt(self.constants.superscript_shift_up)
    }

    pub fn superscript_shift_up_cramped(&self) -> f32 {
        self.pt(self.constants.superscript_shift_up_cramped)
    }

    pub fn superscript_bottom_min(&self) -> f32 {
        self.pt(self.constants.superscript_bottom_min)
    }

    pub fn superscript_baseline_drop_max(&self) -> f32 {
        self.pt(self.constants.superscript_baseline_drop_max)
    }

    pub fn sub_superscript_gap_min(&self) -> f32 {
        self.pt(self.constants.sub_superscript_gap_min)
    }

    pub fn superscript_bottom_max_with_subscript(&self) -> f32 {
        self.pt(self.constants.superscript_bottom_max_with_subscript)
    }

    pub fn space_after_script(&self) -> f32 {
        self.pt(self.constants.space_after_script)
    }

    pub fn upper_limit_gap_min(&self) -> f32 {
        self.pt(self.constants.upper_limit_gap_min)
    }

    pub fn upper_limit_baseline_rise_min(&self) -> f32 {
        self.pt(self.constants.upper_limit_baseline_rise_min)
    }

    pub fn lower_limit_gap_min(&self) -> f32 {
        self.pt(self.constants.lower_limit_gap_min)
    }

    pub fn lower_limit_baseline_drop_min(&self) -> f32 {
        self.pt(self.constants.lower_limit_baseline_drop_min)
    }

    /// Numerator shift for fractions (`rule`) or stacks, display or not
    pub fn numerator_shift_up(&self, display: bool, rule: bool) -> f32 {
        let c = &self.constants;
        self.pt(match (rule, display) {
            (true, true) => c.fraction_numerator_display_style_shift_up,
            (true, false) => c.fraction_numerator_shift_up,
            (false, true) => c.stack_top_display_style_shift_up,
            (false, false) => c.stack_top_shift_up,
        })
    }

    /// Denominator shift for fractions (`rule`) or stacks, display or not
    pub fn denominator_shift_down(&self, display: bool, rule: bool) -> f32 {
        let c = &self.constants;
        self.pt(match (rule, display) {
            (true, true) => c.fraction_denominator_display_style_shift_down,
            (true, false) => c.fraction_denominator_shift_down,
            (false, true) => c.stack_bottom_display_style_shift_down,
            (false, false) => c.stack_bottom_shift_down,
        })
    }

    pub fn fraction_numerator_gap_min(&self, display: bool) -> f32 {
        self.pt(if display {
            self.constants.fraction_num_display_style_gap_min
        } else {
            self.constants.fraction_numerator_gap_min
        })
    }

    pub fn fraction_denominator_gap_min(&self, display: bool) -> f32 {
        self.pt(if display {
            self.constants.fraction_denom_display_style_gap_min
        } else {
            self.constants.fraction_denominator_gap_min
        })
    }

    pub fn stack_gap_min(&self, display: bool) -> f32 {
        self.pt(if display {
            self.constants.stack_display_style_gap_min
        } else {
            self.constants.stack_gap_min
        })
    }

    pub fn fraction_rule_thickness(&self) -> f32 {
        self.pt(self.constants.fraction_rule_thickness)
    }

    pub fn overbar_vertical_gap(&self) -> f32 {
        self.pt(self.constants.overbar_vertical_gap)
    }

    pub fn overbar_rule_thickness(&self) -> f32 {
        self.pt(self.constants.overbar_rule_thickness)
    }

    pub fn overbar_extra_ascender(&self) -> f32 {
        self.pt(self.constants.overbar_extra_ascender)
    }

    pub fn underbar_vertical_gap(&self) -> f32 {
        self.pt(self.constants.underbar_vertical_gap)
    }

    pub fn underbar_rule_thickness(&self) -> f32 {
        self.pt(self.constants.underbar_rule_thickness)
    }

    pub fn underbar_extra_descender(&self) -> f32 {
        self.pt(self.constants.underbar_extra_descender)
    }

    pub fn radical_vertical_gap(&self, display: bool) -> f32 {
        self.pt(if display {
            self.constants.radical_display_style_vertical_gap
        } else {
            self.constants.radical_vertical_gap
        })
    }

    pub fn radical_rule_thickness(&self) -> f32 {
        self.pt(self.constants.radical_rule_thickness)
    }

    pub fn radical_extra_ascender(&self) -> f32 {
        self.pt(self.constants.radical_extra_ascender)
    }

    pub fn radical_kern_before_degree(&self) -> f32 {
        self.pt(self.constants.radical_kern_before_degree)
    }

    pub fn radical_kern_after_degree(&self) -> f32 {
        self.pt(self.constants.radical_kern_after_degree)
    }

    /// Fraction of the radical's height used to raise the degree, `0.0..=1.0`
    pub fn radical_degree_bottom_raise(&self) -> f32 {
        self.constants.radical_degree_bottom_raise_percent as f32 / 100.0
    }

    pub fn min_connector_overlap(&self) -> f32 {
        self.to_points(self.font.min_connector_overlap() as f32)
    }

    // =========================================================================
    // Glyphs
    // =========================================================================

    pub fn glyph_for_char(&self, ch: char) -> Option<GlyphId> {
        self.font.glyph_index(ch)
    }

    /// Measure a single glyph
    pub fn glyph(&self, glyph: GlyphId) -> SizedGlyph {
        let (ascent, descent) = match self.font.glyph_bounds(glyph) {
            Some(b) => (self.pt(b.y_max), -self.pt(b.y_min)),
            None => (0.0, 0.0),
        };
        let advance = self.font.glyph_advance(glyph).unwrap_or(0) as f32;
        SizedGlyph {
            glyph,
            ascent,
            descent,
            width: self.to_points(advance),
            italic_correction: self.italic_correction(glyph),
        }
    }

    pub fn italic_correction(&self, glyph: GlyphId) -> f32 {
        self.font
            .italic_correction(glyph)
            .map(|v| self.pt(v))
            .unwrap_or(0.0)
    }

    /// Horizontal attachment point for accents, half the advance by default
    pub fn top_accent_attachment(&self, glyph: GlyphId) -> f32 {
        match self.font.top_accent_attachment(glyph) {
            Some(v) => self.pt(v),
            None => self.to_points(self.font.glyph_advance(glyph).unwrap_or(0) as f32) / 2.0,
        }
    }

    /// Size ladder of `glyph`, smallest first, never empty
    pub fn size_ladder(&self, glyph: GlyphId, orientation: Orientation) -> Vec<GlyphId> {
        let ladder: Vec<GlyphId> = self
            .font
            .construction(glyph, orientation)
            .map(|c| c.variants.iter().map(|v| v.glyph).collect())
            .unwrap_or_default();
        if ladder.is_empty() {
            vec![glyph]
        } else {
            ladder
        }
    }

    /// The first variant that differs from `glyph`, or `glyph` itself
    pub fn larger_glyph(&self, glyph: GlyphId) -> GlyphId {
        self.size_ladder(glyph, Orientation::Vertical)
            .into_iter()
            .find(|&g| g != glyph)
            .unwrap_or(glyph)
    }

    /// Smallest variant whose extent reaches `target`, else the largest one
    pub fn variant_for_size(
        &self,
        glyph: GlyphId,
        orientation: Orientation,
        target: f32,
    ) -> SizedGlyph {
        let mut chosen = self.glyph(glyph);
        for candidate in self.size_ladder(glyph, orientation) {
            chosen = self.glyph(candidate);
            if chosen.extent(orientation) >= target {
                break;
            }
        }
        chosen
    }

    /// Largest variant whose width does not exceed `max_width`, else the smallest
    pub fn horizontal_variant_within(&self, glyph: GlyphId, max_width: f32) -> SizedGlyph {
        let ladder = self.size_ladder(glyph, Orientation::Horizontal);
        let mut chosen = self.glyph(ladder[0]);
        for candidate in ladder.into_iter().skip(1) {
            let sized = self.glyph(candidate);
            if sized.width > max_width {
                break;
            }
            chosen = sized;
        }
        chosen
    }

    /// Build `glyph` from its assembly recipe, at least `target` long.
    ///
    /// Returns `None` when the font has no recipe for the glyph.
    pub fn assemble(
        &self,
        glyph: GlyphId,
        orientation: Orientation,
        target: f32,
    ) -> Option<AssembledGlyph> {
        let assembly = self.font.construction(glyph, orientation)?.assembly?;
        let parts: Vec<ScaledPart> = assembly
            .parts
            .iter()
            .map(|p| ScaledPart {
                glyph: p.glyph,
                start_connector: self.to_points(p.start_connector as f32),
                end_connector: self.to_points(p.end_connector as f32),
                full_advance: self.to_points(p.full_advance as f32),
                extender: p.extender,
            })
            .collect();
        let tiling = tile_parts(&parts, self.min_connector_overlap(), target)?;

        let italic_correction = self.pt(assembly.italics_correction);
        let measured: Vec<SizedGlyph> = tiling.parts.iter().map(|p| self.glyph(p.glyph)).collect();
        let parts: Vec<AssembledPart> = tiling.parts;

        let assembled = match orientation {
            Orientation::Vertical => AssembledGlyph {
                orientation,
                parts,
                ascent: tiling.length,
                descent: 0.0,
                width: measured.iter().map(|g| g.width).fold(0.0, f32::max),
                italic_correction,
            },
            Orientation::Horizontal => AssembledGlyph {
                orientation,
                parts,
                ascent: measured.iter().map(|g| g.ascent).fold(0.0, f32::max),
                descent: measured.iter().map(|g| g.descent).fold(0.0, f32::max),
                width: tiling.length,
                italic_correction,
            },
        };
        Some(assembled)
    }

    /// Shape `text` and measure it in points
    pub fn shape(&self, text: &str) -> ShapedRun {
        let glyphs = self.font.shape(text);
        ShapedRun::from_font_glyphs(&glyphs, self.font_size, self.units_per_em)
    }
}
