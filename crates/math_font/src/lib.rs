//! Math Font - OpenType MATH metrics for math layout
//!
//! This crate interprets already-loaded font data for the math typesetter.
//! It never loads or discovers fonts itself.
//!
//! # Modules
//!
//! - `font`: The [`MathFont`] handle trait and glyph-level data types
//! - `constants`: The MATH table constants record
//! - `opentype`: [`MathFont`] over real OpenType data via rustybuzz
//! - `synthetic`: A deterministic in-memory metric bundle
//! - `metrics`: [`FontMathMetrics`], constants and glyph queries scaled to a point size
//! - `assembly`: Glyph variant selection and extender tiling
//! - `shaper`: Shaped runs measured in points

mod assembly;
mod constants;
mod error;
mod font;
mod metrics;
mod opentype;
mod shaper;
mod synthetic;

pub use assembly::*;
pub use constants::*;
pub use error::*;
pub use font::*;
pub use metrics::*;
pub use opentype::*;
pub use shaper::*;
pub use synthetic::*;
