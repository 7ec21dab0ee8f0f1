//! Error types for revmat.

use thiserror::Error;

/// Errors that can occur in differentiable math operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    /// Operand lengths differ (the invalid-argument condition).
    #[error("{function}: size mismatch, left operand has {left} elements, right operand has {right}")]
    SizeMismatch {
        function: &'static str,
        left: usize,
        right: usize,
    },

    /// Operands are recorded on different tapes.
    #[error("operands are recorded on different tapes")]
    ForeignTape,

    /// Element index out of bounds.
    #[error("index out of bounds: index {index} is out of range for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Variable whose node was released by a tape reset or rewind.
    #[error("variable at node {node} was released by a tape reset")]
    StaleVar { node: usize },

    /// Node reachable from a result is not allocated on the checked tape.
    #[error("node {node} is not allocated on this tape")]
    NotOnTape { node: usize },

    /// Any other invalid use of the API.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl MathError {
    /// Whether this error is an invalid-argument condition raised by an
    /// operation's shape validation.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, MathError::SizeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_message() {
        let err = MathError::SizeMismatch {
            function: "squared_distance",
            left: 3,
            right: 2,
        };
        assert_eq!(
            err.to_string(),
            "squared_distance: size mismatch, left operand has 3 elements, right operand has 2"
        );
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_tape_errors_are_not_invalid_argument() {
        assert!(!MathError::ForeignTape.is_invalid_argument());
        assert!(!MathError::StaleVar { node: 0 }.is_invalid_argument());
        assert!(!MathError::NotOnTape { node: 4 }.is_invalid_argument());
    }
}
