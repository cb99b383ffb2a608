//! Error types for layout engine

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid line width: {0}")]
    InvalidWidth(f32),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
