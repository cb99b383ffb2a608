//! OpenType fonts via rustybuzz
//!
//! Shaping goes through rustybuzz; MATH table queries go through the
//! `ttf_parser::math` module it re-exports.

use crate::{
    FontGlyph, GlyphAssembly, GlyphBounds, GlyphConstruction, GlyphId, GlyphPart, GlyphVariant,
    MathConstants, MathFont, MetricsError, Orientation, Result,
};
use rustybuzz::ttf_parser;
use std::sync::OnceLock;

/// A font parsed from bytes owned by the caller
pub struct OpenTypeFont<'a> {
    face: rustybuzz::Face<'a>,
    /// Parsed once on first use, then read-only
    constants: OnceLock<Option<MathConstants>>,
}

impl<'a> OpenTypeFont<'a> {
    /// Parse face `index` of a font file or collection
    pub fn from_slice(data: &'a [u8], index: u32) -> Result<Self> {
        let face = rustybuzz::Face::from_slice(data, index)
            .ok_or_else(|| MetricsError::InvalidFontData("Failed to parse font".into()))?;

        Ok(Self {
            face,
            constants: OnceLock::new(),
        })
    }

    /// Whether the face carries a MATH table at all
    pub fn has_math_table(&self) -> bool {
        self.face.tables().math.is_some()
    }

    fn math_table(&self) -> Option<&ttf_parser::math::Table<'a>> {
        self.face.tables().math.as_ref()
    }

    fn read_constants(&self) -> Option<MathConstants> {
        let c = self.math_table()?.constants?;
        Some(MathConstants {
            script_percent_scale_down: c.script_percent_scale_down(),
            script_script_percent_scale_down: c.script_script_percent_scale_down(),
            delimited_sub_formula_min_height: c.delimited_sub_formula_min_height(),
            display_operator_min_height: c.display_operator_min_height(),
            axis_height: c.axis_height().value,
            accent_base_height: c.accent_base_height().value,

            subscript_shift_down: c.subscript_shift_down().value,
            subscript_top_max: c.subscript_top_max().value,
            subscript_baseline_drop_min: c.subscript_baseline_drop_min().value,
            superscript_shift_up: c.superscript_shift_up().value,
            superscript_shift_up_cramped: c.superscript_shift_up_cramped().value,
            superscript_bottom_min: c.superscript_bottom_min().value,
            superscript_baseline_drop_max: c.superscript_baseline_drop_max().value,
            sub_superscript_gap_min: c.sub_superscript_gap_min().value,
            superscript_bottom_max_with_subscript: c.superscript_bottom_max_with_subscript().value,
            space_after_script: c.space_after_script().value,

            upper_limit_gap_min: c.upper_limit_gap_min().value,
            upper_limit_baseline_rise_min: c.upper_limit_baseline_rise_min().value,
            lower_limit_gap_min: c.lower_limit_gap_min().value,
            lower_limit_baseline_drop_min: c.lower_limit_baseline_drop_min().value,

            stack_top_shift_up: c.stack_top_shift_up().value,
            stack_top_display_style_shift_up: c.stack_top_display_style_shift_up().value,
            stack_bottom_shift_down: c.stack_bottom_shift_down().value,
            stack_bottom_display_style_shift_down: c.stack_bottom_display_style_shift_down().value,
            stack_gap_min: c.stack_gap_min().value,
            stack_display_style_gap_min: c.stack_display_style_gap_min().value,

            fraction_numerator_shift_up: c.fraction_numerator_shift_up().value,
            fraction_numerator_display_style_shift_up: c
                .fraction_numerator_display_style_shift_up()
                .value,
            fraction_denominator_shift_down: c.fraction_denominator_shift_down().value,
            fraction_denominator_display_style_shift_down: c
                .fraction_denominator_display_style_shift_down()
                .value,
            fraction_numerator_gap_min: c.fraction_numerator_gap_min().value,
            fraction_num_display_style_gap_min: c.fraction_num_display_style_gap_min().value,
            fraction_rule_thickness: c.fraction_rule_thickness().value,
            fraction_denominator_gap_min: c.fraction_denominator_gap_min().value,
            fraction_denom_display_style_gap_min: c.fraction_denom_display_style_gap_min().value,

            overbar_vertical_gap: c.overbar_vertical_gap().value,
            overbar_rule_thickness: c.overbar_rule_thickness().value,
            overbar_extra_ascender: c.overbar_extra_ascender().value,
            underbar_vertical_gap: c.underbar_vertical_gap().value,
            underbar_rule_thickness: c.underbar_rule_thickness().value,
            underbar_extra_descender: c.underbar_extra_descender().value,

            radical_vertical_gap: c.radical_vertical_gap().value,
            radical_display_style_vertical_gap: c.radical_display_style_vertical_gap().value,
            radical_rule_thickness: c.radical_rule_thickness().value,
            radical_extra_ascender: c.radical_extra_ascender().value,
            radical_kern_before_degree: c.radical_kern_before_degree().value,
            radical_kern_after_degree: c.radical_kern_after_degree().value,
            radical_degree_bottom_raise_percent: c.radical_degree_bottom_raise_percent(),
        })
    }
}

fn to_glyph_id(glyph: GlyphId) -> ttf_parser::GlyphId {
    ttf_parser::GlyphId(glyph.0)
}

/// The head table's value, or 1000 when it is outside `1..=u16::MAX`
fn units_per_em_or_default(raw: i32) -> u16 {
    u16::try_from(raw).ok().filter(|&u| u > 0).unwrap_or(1000)
}

impl MathFont for OpenTypeFont<'_> {
    fn units_per_em(&self) -> u16 {
        units_per_em_or_default(self.face.units_per_em())
    }

    fn glyph_index(&self, ch: char) -> Option<GlyphId> {
        self.face.glyph_index(ch).map(|g| GlyphId(g.0))
    }

    fn glyph_advance(&self, glyph: GlyphId) -> Option<u16> {
        self.face.glyph_hor_advance(to_glyph_id(glyph))
    }

    fn glyph_bounds(&self, glyph: GlyphId) -> Option<GlyphBounds> {
        self.face
            .glyph_bounding_box(to_glyph_id(glyph))
            .map(|r| GlyphBounds::new(r.x_min, r.y_min, r.x_max, r.y_max))
    }

    fn math_constants(&self) -> Option<MathConstants> {
        *self.constants.get_or_init(|| self.read_constants())
    }

    fn italic_correction(&self, glyph: GlyphId) -> Option<i16> {
        let info = self.math_table()?.glyph_info?;
        info.italic_corrections?
            .get(to_glyph_id(glyph))
            .map(|v| v.value)
    }

    fn top_accent_attachment(&self, glyph: GlyphId) -> Option<i16> {
        let info = self.math_table()?.glyph_info?;
        info.top_accent_attachments?
            .get(to_glyph_id(glyph))
            .map(|v| v.value)
    }

    fn min_connector_overlap(&self) -> u16 {
        self.math_table()
            .and_then(|m| m.variants)
            .map(|v| v.min_connector_overlap)
            .unwrap_or(0)
    }

    fn construction(&self, glyph: GlyphId, orientation: Orientation) -> Option<GlyphConstruction> {
        let variants = self.math_table()?.variants?;
        let constructions = match orientation {
            Orientation::Vertical => variants.vertical_constructions,
            Orientation::Horizontal => variants.horizontal_constructions,
        };
        let construction = constructions.get(to_glyph_id(glyph))?;

        let mut ladder = Vec::with_capacity(construction.variants.len() as usize);
        for idx in 0..construction.variants.len() {
            if let Some(variant) = construction.variants.get(idx) {
                ladder.push(GlyphVariant {
                    glyph: GlyphId(variant.variant_glyph.0),
                    advance: variant.advance_measurement,
                });
            }
        }

        let assembly = construction.assembly.map(|assembly| {
            let mut parts = Vec::with_capacity(assembly.parts.len() as usize);
            for idx in 0..assembly.parts.len() {
                if let Some(part) = assembly.parts.get(idx) {
                    parts.push(GlyphPart {
                        glyph: GlyphId(part.glyph_id.0),
                        start_connector: part.start_connector_length,
                        end_connector: part.end_connector_length,
                        full_advance: part.full_advance,
                        extender: part.part_flags.extender(),
                    });
                }
            }
            GlyphAssembly {
                italics_correction: assembly.italics_correction.value,
                parts,
            }
        });

        Some(GlyphConstruction {
            variants: ladder,
            assembly,
        })
    }

    fn shape(&self, text: &str) -> Vec<FontGlyph> {
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);

        let output = rustybuzz::shape(&self.face, &[], buffer);

        output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions().iter())
            .map(|(info, pos)| {
                let glyph = GlyphId(info.glyph_id as u16);
                FontGlyph {
                    glyph,
                    x_advance: pos.x_advance,
                    x_offset: pos.x_offset,
                    y_offset: pos.y_offset,
                    cluster: info.cluster,
                    bounds: self.glyph_bounds(glyph),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let result = OpenTypeFont::from_slice(&[0u8; 16], 0);
        assert!(matches!(result, Err(MetricsError::InvalidFontData(_))));
    }

    #[test]
    fn test_units_per_em_out_of_range() {
        assert_eq!(units_per_em_or_default(2048), 2048);
        assert_eq!(units_per_em_or_default(0), 1000);
        assert_eq!(units_per_em_or_default(-1), 1000);
        assert_eq!(units_per_em_or_default(70_000), 1000);
    }
}
