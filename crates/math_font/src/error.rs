//! Error types for math font metrics

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    /// The font has no MATH table, or the table is unusable
    #[error("Font has no usable MATH table")]
    MissingMathTable,

    #[error("Invalid font data: {0}")]
    InvalidFontData(String),

    #[error("Invalid font size: {0}")]
    InvalidSize(f32),
}

pub type Result<T> = std::result::Result<T, MetricsError>;
