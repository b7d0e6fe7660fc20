//! Error types for names, values and interning

use thiserror::Error;

use crate::template::{CompileError, EvaluationError};

/// Errors that can occur while building values or computing names
#[derive(Debug, Error)]
pub enum NameError {
    /// A required argument was missing or empty
    #[error("invalid argument '{argument}': {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// Attempt to change a field that is already frozen
    #[error("{field} is already set to {current:?}, cannot change it to {requested:?}")]
    IllegalState {
        field: &'static str,
        current: String,
        requested: String,
    },

    /// The template text of a value failed to compile
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The compiled template failed against its owner
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl NameError {
    /// Create an invalid argument error
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Create an illegal state error for a frozen field
    pub fn illegal_state(
        field: &'static str,
        current: impl Into<String>,
        requested: impl Into<String>,
    ) -> Self {
        Self::IllegalState {
            field,
            current: current.into(),
            requested: requested.into(),
        }
    }

    /// Whether this error came from compiling template text
    pub fn is_compile_error(&self) -> bool {
        matches!(self, Self::Compile(_))
    }

    /// Whether this error came from executing a compiled template
    pub fn is_evaluation_error(&self) -> bool {
        matches!(self, Self::Evaluation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = NameError::invalid_argument("key", "must not be empty");
        assert_eq!(err.to_string(), "invalid argument 'key': must not be empty");
    }

    #[test]
    fn test_illegal_state_display() {
        let err = NameError::illegal_state("text", "Laird", "Jarrett");
        assert!(err.to_string().contains("\"Laird\""));
        assert!(err.to_string().contains("\"Jarrett\""));
    }

    #[test]
    fn test_evaluation_error_converts() {
        let err: NameError = EvaluationError::unresolved("middleName").into();
        assert!(err.is_evaluation_error());
        assert!(!err.is_compile_error());
        assert!(err.to_string().contains("middleName"));
    }
}
