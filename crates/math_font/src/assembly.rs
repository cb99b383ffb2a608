//! Glyph variant selection and assembly tiling
//!
//! A stretchy glyph first walks its size ladder. When no discrete variant
//! is large enough, its assembly recipe is tiled: end caps stay fixed and
//! extenders are repeated, overlapping at the connectors, until the target
//! length is reached.

use crate::{GlyphId, Orientation};
use serde::{Deserialize, Serialize};

/// Upper bound on extender repetitions tried before giving up
const MAX_EXTENDER_REPEATS: usize = 256;

/// A glyph picked from a size ladder, measured in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizedGlyph {
    pub glyph: GlyphId,
    pub ascent: f32,
    pub descent: f32,
    pub width: f32,
    pub italic_correction: f32,
}

impl SizedGlyph {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Extent along the given stretch direction
    pub fn extent(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Vertical => self.height(),
            Orientation::Horizontal => self.width,
        }
    }
}

/// One placed piece of an assembled glyph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssembledPart {
    pub glyph: GlyphId,
    /// Offset along the stretch direction from the assembly's start edge
    pub offset: f32,
}

/// A glyph built from parts, measured in points.
///
/// Vertical assemblies sit on their baseline (`descent == 0`); the caller
/// shifts them into place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledGlyph {
    pub orientation: Orientation,
    pub parts: Vec<AssembledPart>,
    pub ascent: f32,
    pub descent: f32,
    pub width: f32,
    pub italic_correction: f32,
}

impl AssembledGlyph {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    pub fn extent(&self) -> f32 {
        match self.orientation {
            Orientation::Vertical => self.height(),
            Orientation::Horizontal => self.width,
        }
    }
}

/// An assembly part already scaled to points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledPart {
    pub glyph: GlyphId,
    pub start_connector: f32,
    pub end_connector: f32,
    pub full_advance: f32,
    pub extender: bool,
}

/// Result of [`tile_parts`]: part offsets plus the total length
#[derive(Debug, Clone, PartialEq)]
pub struct Tiling {
    pub parts: Vec<AssembledPart>,
    pub length: f32,
}

/// Lay out `parts` so the assembly is at least `target` long.
///
/// The number of extender copies grows from zero. For each count the
/// parts are packed with maximal connector overlap; if that is already
/// long enough it is used, otherwise the slack between maximal and minimal
/// overlap (`min_overlap`) is spread evenly over the joints. Without any
/// extender the longest possible packing is returned.
pub fn tile_parts(parts: &[ScaledPart], min_overlap: f32, target: f32) -> Option<Tiling> {
    if parts.is_empty() {
        return None;
    }
    let has_extender = parts.iter().any(|p| p.extender);

    let mut last_tiling = None;
    for repeats in 0..=MAX_EXTENDER_REPEATS {
        let mut placed: Vec<AssembledPart> = Vec::new();
        let mut prev: Option<&ScaledPart> = None;
        let mut offset = 0.0f32;
        let mut max_delta = f32::MAX;

        for part in parts {
            let count = if part.extender { repeats } else { 1 };
            for _ in 0..count {
                if let Some(prev) = prev {
                    let max_overlap = prev.end_connector.min(part.start_connector);
                    let min_step = prev.full_advance - max_overlap;
                    let max_step = prev.full_advance - min_overlap;
                    max_delta = max_delta.min((max_step - min_step).max(0.0));
                    offset += min_step;
                }
                placed.push(AssembledPart {
                    glyph: part.glyph,
                    offset,
                });
                prev = Some(part);
            }
        }

        let Some(last) = prev else {
            continue;
        };
        let min_length = offset + last.full_advance;
        let joints = placed.len().saturating_sub(1);

        if min_length >= target {
            return Some(Tiling {
                parts: placed,
                length: min_length,
            });
        }

        if joints > 0 {
            let max_length = min_length + max_delta * joints as f32;
            if target <= max_length {
                let step = (target - min_length) / joints as f32;
                for (i, part) in placed.iter_mut().enumerate() {
                    part.offset += step * i as f32;
                }
                return Some(Tiling {
                    parts: placed,
                    length: target,
                });
            }
            if !has_extender {
                for (i, part) in placed.iter_mut().enumerate() {
                    part.offset += max_delta * i as f32;
                }
                return Some(Tiling {
                    parts: placed,
                    length: max_length,
                });
            }
        }

        last_tiling = Some(Tiling {
            parts: placed,
            length: min_length,
        });
        if !has_extender {
            break;
        }
    }

    tracing::warn!(target, "glyph assembly could not reach target length");
    last_tiling
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(glyph: u16, connector: f32, advance: f32, extender: bool) -> ScaledPart {
        ScaledPart {
            glyph: GlyphId(glyph),
            start_connector: connector,
            end_connector: connector,
            full_advance: advance,
            extender,
        }
    }

    fn paren_parts() -> Vec<ScaledPart> {
        vec![
            part(1, 3.0, 10.0, false),
            part(2, 5.0, 5.0, true),
            part(3, 3.0, 10.0, false),
        ]
    }

    #[test]
    fn test_caps_alone_when_short() {
        let tiling = tile_parts(&paren_parts(), 1.0, 15.0).unwrap();
        // Two caps overlapping by 3 give 17
        assert_eq!(tiling.parts.len(), 2);
        assert!((tiling.length - 17.0).abs() < 1e-4);
    }

    #[test]
    fn test_spreads_slack_to_hit_target() {
        let tiling = tile_parts(&paren_parts(), 1.0, 18.0).unwrap();
        assert_eq!(tiling.parts.len(), 2);
        assert!((tiling.length - 18.0).abs() < 1e-4);
        assert!((tiling.parts[1].offset - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_adds_extenders_for_tall_targets() {
        let tiling = tile_parts(&paren_parts(), 1.0, 40.0).unwrap();
        assert!(tiling.length >= 40.0 - 1e-4);
        let extenders = tiling.parts.iter().filter(|p| p.glyph == GlyphId(2)).count();
        assert!(extenders >= 2);
        // Offsets never decrease
        for pair in tiling.parts.windows(2) {
            assert!(pair[1].offset >= pair[0].offset);
        }
    }

    #[test]
    fn test_overlap_never_below_minimum() {
        let parts = paren_parts();
        let min_overlap = 1.0;
        let tiling = tile_parts(&parts, min_overlap, 63.0).unwrap();
        for pair in tiling.parts.windows(2) {
            let advance = if pair[0].glyph == GlyphId(2) { 5.0 } else { 10.0 };
            let overlap = pair[0].offset + advance - pair[1].offset;
            assert!(overlap >= min_overlap - 1e-4);
        }
    }

    #[test]
    fn test_empty_recipe() {
        assert!(tile_parts(&[], 0.0, 10.0).is_none());
    }

    #[test]
    fn test_no_extender_returns_longest_packing() {
        let parts = vec![part(1, 3.0, 10.0, false), part(3, 3.0, 10.0, false)];
        let tiling = tile_parts(&parts, 1.0, 100.0).unwrap();
        assert!((tiling.length - 19.0).abs() < 1e-4);
    }
}
