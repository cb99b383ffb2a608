//! Font handle abstraction
//!
//! A [`MathFont`] answers glyph and MATH table queries in design units.
//! [`crate::FontMathMetrics`] scales the answers to a point size.

use crate::MathConstants;
use serde::{Deserialize, Serialize};

/// Glyph index inside a font
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GlyphId(pub u16);

impl GlyphId {
    /// The `.notdef` glyph
    pub const NOTDEF: GlyphId = GlyphId(0);
}

/// Tight ink bounds of a glyph, in design units, y up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlyphBounds {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl GlyphBounds {
    pub const fn new(x_min: i16, y_min: i16, x_max: i16, y_max: i16) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> i32 {
        self.x_max as i32 - self.x_min as i32
    }

    pub fn height(&self) -> i32 {
        self.y_max as i32 - self.y_min as i32
    }

    /// Smallest bounds containing both
    pub fn union(&self, other: &GlyphBounds) -> GlyphBounds {
        GlyphBounds {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// Direction in which a glyph grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// One rung of a glyph's size ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphVariant {
    pub glyph: GlyphId,
    /// Advance along the stretch direction, in design units
    pub advance: u16,
}

/// A piece of an assembled glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphPart {
    pub glyph: GlyphId,
    pub start_connector: u16,
    pub end_connector: u16,
    pub full_advance: u16,
    /// Extenders may be repeated any number of times, including zero
    pub extender: bool,
}

/// Recipe for building a glyph larger than any discrete variant.
///
/// Parts are listed bottom-to-top for vertical assemblies and
/// left-to-right for horizontal ones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlyphAssembly {
    pub italics_correction: i16,
    pub parts: Vec<GlyphPart>,
}

/// Size variants plus an optional assembly for one base glyph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlyphConstruction {
    /// Ordered from smallest to largest
    pub variants: Vec<GlyphVariant>,
    pub assembly: Option<GlyphAssembly>,
}

/// A glyph produced by [`MathFont::shape`], in design units
#[derive(Debug, Clone, PartialEq)]
pub struct FontGlyph {
    pub glyph: GlyphId,
    pub x_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    /// Byte offset of the source cluster
    pub cluster: u32,
    /// Ink bounds, `None` for blank glyphs such as spaces
    pub bounds: Option<GlyphBounds>,
}

/// An already-loaded font that can answer math layout queries.
///
/// All quantities are in font design units. Implementations must be
/// immutable after construction so a single handle can serve concurrent
/// typesetting calls.
pub trait MathFont: Send + Sync {
    fn units_per_em(&self) -> u16;

    /// Nominal glyph for a character, from the character map
    fn glyph_index(&self, ch: char) -> Option<GlyphId>;

    fn glyph_advance(&self, glyph: GlyphId) -> Option<u16>;

    fn glyph_bounds(&self, glyph: GlyphId) -> Option<GlyphBounds>;

    /// MATH table constants, `None` when the table is absent
    fn math_constants(&self) -> Option<MathConstants>;

    fn italic_correction(&self, glyph: GlyphId) -> Option<i16>;

    fn top_accent_attachment(&self, glyph: GlyphId) -> Option<i16>;

    fn min_connector_overlap(&self) -> u16;

    fn construction(&self, glyph: GlyphId, orientation: Orientation) -> Option<GlyphConstruction>;

    /// Shape a string into positioned glyphs
    fn shape(&self, text: &str) -> Vec<FontGlyph>;
}
