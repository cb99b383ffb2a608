//! Shaped runs measured in points
//!
//! [`crate::FontMathMetrics::shape`] turns a [`MathFont`] shaping result
//! into a [`ShapedRun`]: glyph positions, advance and the tight ink box.

use crate::{FontGlyph, GlyphId};
use serde::{Deserialize, Serialize};

/// A shaped glyph positioned relative to the run origin, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionedGlyph {
    pub glyph: GlyphId,
    /// Pen position including the glyph's own x offset
    pub x: f32,
    /// Vertical offset, y up
    pub y: f32,
    pub advance: f32,
    /// Byte offset of the source cluster
    pub cluster: usize,
}

/// A run of shaped glyphs with its measurements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapedRun {
    pub glyphs: Vec<PositionedGlyph>,
    pub font_size: f32,
    /// Sum of advances
    pub advance: f32,
    /// Height of the ink above the baseline, never negative
    pub ascent: f32,
    /// Depth of the ink below the baseline, never negative
    pub descent: f32,
    /// Left edge of the ink box
    pub ink_left: f32,
    /// Right edge of the ink box
    pub ink_right: f32,
}

impl ShapedRun {
    /// Measure shaped design-unit glyphs at `font_size`
    pub fn from_font_glyphs(glyphs: &[FontGlyph], font_size: f32, units_per_em: u16) -> Self {
        let scale = font_size / units_per_em.max(1) as f32;
        let mut positioned = Vec::with_capacity(glyphs.len());
        let mut pen = 0.0f32;
        let mut ascent = 0.0f32;
        let mut descent = 0.0f32;
        let mut ink: Option<(f32, f32)> = None;

        for glyph in glyphs {
            let x = pen + glyph.x_offset as f32 * scale;
            let y = glyph.y_offset as f32 * scale;
            if let Some(bounds) = glyph.bounds {
                ascent = ascent.max(bounds.y_max as f32 * scale + y);
                descent = descent.max(-(bounds.y_min as f32 * scale + y));
                let left = x + bounds.x_min as f32 * scale;
                let right = x + bounds.x_max as f32 * scale;
                ink = Some(match ink {
                    Some((l, r)) => (l.min(left), r.max(right)),
                    None => (left, right),
                });
            }
            let advance = glyph.x_advance as f32 * scale;
            positioned.push(PositionedGlyph {
                glyph: glyph.glyph,
                x,
                y,
                advance,
                cluster: glyph.cluster as usize,
            });
            pen += advance;
        }

        let (ink_left, ink_right) = ink.unwrap_or((0.0, 0.0));
        Self {
            glyphs: positioned,
            font_size,
            advance: pen,
            ascent,
            descent,
            ink_left,
            ink_right,
        }
    }

    /// Authoritative width: the advance, widened when ink overhangs it
    pub fn width(&self) -> f32 {
        self.advance.max(self.ink_right)
    }

    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Get the x position at a specific byte offset
    pub fn x_at_offset(&self, byte_offset: usize) -> f32 {
        self.glyphs
            .iter()
            .find(|g| g.cluster >= byte_offset)
            .map(|g| g.x)
            .unwrap_or(self.advance)
    }
}

/// Estimate an advance for a character the font cannot map
pub fn estimate_char_width(ch: char, units_per_em: u16) -> i32 {
    let em = units_per_em as i32;

    match ch {
        // Narrow characters
        ' ' | 'i' | 'l' | 'j' | 't' | 'f' | 'r' | '!' | '|' | '\'' | '`' | '.' | ',' | ':' | ';' => {
            em * 30 / 100
        }
        'I' | '1' => em * 35 / 100,
        // Wide characters
        'm' | 'w' | 'M' | 'W' | '@' | '%' => em * 90 / 100,
        'A'..='Z' => em * 70 / 100,
        'a'..='z' => em * 55 / 100,
        '0'..='9' => em * 60 / 100,
        // CJK is full-width
        '\u{4E00}'..='\u{9FFF}' | '\u{3000}'..='\u{30FF}' | '\u{FF00}'..='\u{FFEF}' => em,
        // Zero-width characters
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' | '\u{FE0F}' => 0,
        '\u{00AD}' => 0,
        '\u{00A0}' => em * 30 / 100,
        _ => em * 60 / 100,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GlyphBounds;

    fn glyph(advance: i32, bounds: Option<GlyphBounds>, cluster: u32) -> FontGlyph {
        FontGlyph {
            glyph: GlyphId(1),
            x_advance: advance,
            x_offset: 0,
            y_offset: 0,
            cluster,
            bounds,
        }
    }

    #[test]
    fn test_measure_scales_to_points() {
        let glyphs = vec![
            glyph(500, Some(GlyphBounds::new(0, -200, 500, 700)), 0),
            glyph(500, Some(GlyphBounds::new(0, 0, 500, 400)), 1),
        ];
        let run = ShapedRun::from_font_glyphs(&glyphs, 10.0, 1000);
        assert!((run.advance - 10.0).abs() < 1e-5);
        assert!((run.ascent - 7.0).abs() < 1e-5);
        assert!((run.descent - 2.0).abs() < 1e-5);
        assert!((run.glyphs[1].x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_overhang_widens_run() {
        // Italic glyph whose ink pokes past its advance
        let glyphs = vec![glyph(500, Some(GlyphBounds::new(50, 0, 620, 700)), 0)];
        let run = ShapedRun::from_font_glyphs(&glyphs, 10.0, 1000);
        assert!((run.advance - 5.0).abs() < 1e-5);
        assert!((run.width() - 6.2).abs() < 1e-5);
    }

    #[test]
    fn test_blank_glyphs_have_no_ink() {
        let glyphs = vec![glyph(300, None, 0)];
        let run = ShapedRun::from_font_glyphs(&glyphs, 10.0, 1000);
        assert_eq!(run.ascent, 0.0);
        assert_eq!(run.descent, 0.0);
        assert!((run.width() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_x_at_offset() {
        let glyphs = vec![glyph(500, None, 0), glyph(500, None, 1), glyph(500, None, 2)];
        let run = ShapedRun::from_font_glyphs(&glyphs, 10.0, 1000);
        assert!((run.x_at_offset(2) - 10.0).abs() < 1e-5);
        assert!((run.x_at_offset(3) - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_estimate_widths() {
        assert_eq!(estimate_char_width('m', 1000), 900);
        assert_eq!(estimate_char_width('\u{4E2D}', 1000), 1000);
        assert_eq!(estimate_char_width('\u{200B}', 1000), 0);
    }
}
