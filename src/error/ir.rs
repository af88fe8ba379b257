use std::path::PathBuf;
use thiserror::Error;

use crate::ir::Position;

/// Problems with the IR itself, as opposed to findings about the program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    #[error("failed to parse IR document '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("unsupported IR format: {format} (expected json or yaml)")]
    UnsupportedFormat { format: String },

    #[error("call to {callee} at {position} is missing argument {index}")]
    MissingArgument {
        callee: String,
        index: usize,
        position: Position,
    },

    #[error("call to {callee} has an invalid source position '{position}'")]
    InvalidPosition { callee: String, position: Position },
}

impl IrError {
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn missing_argument(callee: impl Into<String>, index: usize, position: Position) -> Self {
        Self::MissingArgument {
            callee: callee.into(),
            index,
            position,
        }
    }

    pub fn invalid_position(callee: impl Into<String>, position: Position) -> Self {
        Self::InvalidPosition {
            callee: callee.into(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_display() {
        let err = IrError::missing_argument(
            "crypto/rsa.GenerateKey",
            1,
            Position::new("main.go", 7, 3),
        );
        assert_eq!(
            err.to_string(),
            "call to crypto/rsa.GenerateKey at main.go:7:3 is missing argument 1"
        );
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = IrError::unsupported_format("xml");
        assert_eq!(
            err.to_string(),
            "unsupported IR format: xml (expected json or yaml)"
        );
    }
}
