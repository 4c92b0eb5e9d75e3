//! Error types for qgrid

use thiserror::Error;

/// Main error type for qgrid
#[derive(Error, Debug)]
pub enum QGridError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Invalid action index: {0}")]
    InvalidAction(usize),

    #[error("Shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QGridError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type alias for qgrid operations
pub type Result<T> = std::result::Result<T, QGridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = QGridError::invalid_parameter("epsilon", "must be within [0, 1], got 1.5");
        assert_eq!(
            err.to_string(),
            "Invalid parameter epsilon: must be within [0, 1], got 1.5"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: QGridError = io.into();
        assert!(matches!(err, QGridError::Io(_)));
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = QGridError::ShapeMismatch {
            expected: 100,
            actual: 3,
        };
        assert!(err.to_string().contains("expected 100"));
    }
}
