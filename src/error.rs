use thiserror::Error;

/// Main error type for squill operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SquillError {
    #[error("Lex error: {0}")]
    LexError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias for squill operations
pub type Result<T> = std::result::Result<T, SquillError>;

impl SquillError {
    /// The render-time rejection for operators with no SQL representation
    pub(crate) fn unrenderable(operator: &str) -> SquillError {
        SquillError::RenderError(format!("unable to render operator [{}]", operator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SquillError::ParseError("unexpected token".to_string());
        assert_eq!(err.to_string(), "Parse error: unexpected token");
    }

    #[test]
    fn test_unrenderable_message() {
        let err = SquillError::unrenderable("FUZZY");
        assert!(err
            .to_string()
            .contains("unable to render operator [FUZZY]"));
    }
}
