//! Error handling for the rxc compiler
//!
//! `CompilerError` is the error surfaced to the driver. Each phase keeps
//! its own richer error enum and converts into this one at the boundary.

use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Code generation error at {location}: {message}")]
    CodegenError {
        location: SourceLocation,
        message: String,
    },

    #[error("Invalid input: {message}")]
    InputError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create a codegen error
    pub fn codegen_error(message: String, location: SourceLocation) -> Self {
        CompilerError::CodegenError { location, message }
    }

    /// Create an input error (unreadable or malformed AST input)
    pub fn input_error(message: String) -> Self {
        CompilerError::InputError { message }
    }

    /// Whether this error reports a compiler bug rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(self, CompilerError::InternalError { .. })
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Convert from String (for simple error cases)
impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codegen_error_display() {
        let err = CompilerError::codegen_error(
            "unknown struct 'Point'".to_string(),
            SourceLocation::new("main.rx", 3, 7),
        );
        assert_eq!(
            err.to_string(),
            "Code generation error at main.rx:3:7: unknown struct 'Point'"
        );
        assert!(!err.is_internal());
    }

    #[test]
    fn test_from_string_is_internal() {
        let err: CompilerError = "no current block".to_string().into();
        assert!(err.is_internal());
        assert_eq!(err.to_string(), "Internal compiler error: no current block");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: CompilerError = io.into();
        assert!(matches!(err, CompilerError::IoError { .. }));
    }
}
