//! Error types for the math crate

use math_font::MetricsError;
use thiserror::Error;

/// Errors raised while building an atom list from markup.
///
/// Every variant carries the byte offset into the markup where the problem
/// was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Mismatched braces at offset {offset}")]
    MismatchedBraces { offset: usize },

    #[error("Invalid command \\{name} at offset {offset}")]
    InvalidCommand { offset: usize, name: String },

    #[error("Invalid environment at offset {offset}: {message}")]
    InvalidEnvironment { offset: usize, message: String },

    #[error("Invalid delimiter '{delimiter}' at offset {offset}")]
    InvalidDelimiter { offset: usize, delimiter: String },

    #[error("Unexpected script at offset {offset}: {message}")]
    UnexpectedScript { offset: usize, message: String },
}

impl ParseError {
    /// Byte offset into the markup
    pub fn offset(&self) -> usize {
        match self {
            ParseError::MismatchedBraces { offset }
            | ParseError::InvalidCommand { offset, .. }
            | ParseError::InvalidEnvironment { offset, .. }
            | ParseError::InvalidDelimiter { offset, .. }
            | ParseError::UnexpectedScript { offset, .. } => *offset,
        }
    }
}

/// Errors surfaced by the markup-to-box pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Result type for parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for the whole pipeline
pub type MathResult<T> = Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::InvalidCommand {
            offset: 3,
            name: "fracc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid command \\fracc at offset 3");
        assert_eq!(err.offset(), 3);
    }

    #[test]
    fn test_error_from_metrics() {
        let math_err: MathError = MetricsError::MissingMathTable.into();
        assert!(matches!(math_err, MathError::Metrics(_)));
    }
}
