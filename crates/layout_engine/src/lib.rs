//! Layout Engine - Width-constrained line breaking for typeset math
//!
//! This crate takes the box tree produced by the math typesetter and
//! splits its top level into stacked lines that fit a maximum width.

mod config;
mod error;
mod line_breaker;
mod units;

pub use config::*;
pub use error::*;
pub use line_breaker::*;
pub use units::{is_protected, text_breaks};
