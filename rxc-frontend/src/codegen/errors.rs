//! Code generation error types

use rxc_common::{CompilerError, SourceLocation};
use thiserror::Error;

use crate::ast::{SymbolKind, Type};

/// Broad classification of a lowering failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input tree is inconsistent (unknown names, bad casts, ...)
    MalformedInput,
    /// An earlier stage let through something it must reject
    InternalContract,
    /// A construct this stage does not lower
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodegenError {
    #[error("Unresolved symbol '{name}' at {location}")]
    UnresolvedSymbol {
        name: String,
        location: SourceLocation,
    },

    #[error("Symbol '{name}' ({kind:?}) cannot be used as a value at {location}")]
    InvalidPathKind {
        name: String,
        kind: SymbolKind,
        location: SourceLocation,
    },

    #[error("Unknown struct '{name}' at {location}")]
    UnknownStruct {
        name: String,
        location: SourceLocation,
    },

    #[error("Unknown enum '{name}' at {location}")]
    UnknownEnum {
        name: String,
        location: SourceLocation,
    },

    #[error("Enum '{enum_name}' has no variant '{variant}' at {location}")]
    UnknownVariant {
        enum_name: String,
        variant: String,
        location: SourceLocation,
    },

    #[error("Struct '{struct_name}' has no field '{field}' at {location}")]
    UnknownField {
        struct_name: String,
        field: String,
        location: SourceLocation,
    },

    #[error("Impl target '{name}' is neither a struct nor an enum at {location}")]
    UnknownImplTarget {
        name: String,
        location: SourceLocation,
    },

    #[error("Undefined function '{name}' at {location}")]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    #[error("Constant '{name}' has no folded value at {location}")]
    ConstantNotFound {
        name: String,
        location: SourceLocation,
    },

    #[error("Cannot convert {from} to {to} at {location}")]
    InvalidCast {
        from: String,
        to: String,
        location: SourceLocation,
    },

    #[error("No common type for {lhs} and {rhs} at {location}")]
    NoCommonType {
        lhs: String,
        rhs: String,
        location: SourceLocation,
    },

    #[error("Invalid assignment target at {location}")]
    InvalidLvalue { location: SourceLocation },

    #[error("Type {ty} cannot be indexed at {location}")]
    NotIndexable { ty: Type, location: SourceLocation },

    #[error("Type {ty} has no fields at {location}")]
    NotAStruct { ty: Type, location: SourceLocation },

    #[error("Expression of type {ty} produces no value at {location}")]
    MissingValue { ty: Type, location: SourceLocation },

    #[error("`break` outside of a loop at {location}")]
    BreakOutsideLoop { location: SourceLocation },

    #[error("`continue` outside of a loop at {location}")]
    ContinueOutsideLoop { location: SourceLocation },

    #[error("`self` outside of an impl block at {location}")]
    SelfOutsideImpl { location: SourceLocation },

    #[error("Internal error at {location}: {message}")]
    InternalError {
        message: String,
        location: SourceLocation,
    },

    #[error("Unsupported cast from {from} to {to} at {location}")]
    UnsupportedCast {
        from: String,
        to: String,
        location: SourceLocation,
    },

    #[error("Unsupported construct '{construct}' at {location}")]
    UnsupportedConstruct {
        construct: String,
        location: SourceLocation,
    },
}

impl CodegenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodegenError::BreakOutsideLoop { .. }
            | CodegenError::ContinueOutsideLoop { .. }
            | CodegenError::SelfOutsideImpl { .. }
            | CodegenError::InternalError { .. } => ErrorKind::InternalContract,
            CodegenError::UnsupportedCast { .. } | CodegenError::UnsupportedConstruct { .. } => {
                ErrorKind::Unsupported
            }
            _ => ErrorKind::MalformedInput,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            CodegenError::UnresolvedSymbol { location, .. }
            | CodegenError::InvalidPathKind { location, .. }
            | CodegenError::UnknownStruct { location, .. }
            | CodegenError::UnknownEnum { location, .. }
            | CodegenError::UnknownVariant { location, .. }
            | CodegenError::UnknownField { location, .. }
            | CodegenError::UnknownImplTarget { location, .. }
            | CodegenError::UndefinedFunction { location, .. }
            | CodegenError::ConstantNotFound { location, .. }
            | CodegenError::InvalidCast { location, .. }
            | CodegenError::NoCommonType { location, .. }
            | CodegenError::InvalidLvalue { location }
            | CodegenError::NotIndexable { location, .. }
            | CodegenError::NotAStruct { location, .. }
            | CodegenError::MissingValue { location, .. }
            | CodegenError::BreakOutsideLoop { location }
            | CodegenError::ContinueOutsideLoop { location }
            | CodegenError::SelfOutsideImpl { location }
            | CodegenError::InternalError { location, .. }
            | CodegenError::UnsupportedCast { location, .. }
            | CodegenError::UnsupportedConstruct { location, .. } => location,
        }
    }
}

/// IR builder failures are broken invariants of this stage
impl From<String> for CodegenError {
    fn from(message: String) -> Self {
        CodegenError::InternalError {
            message,
            location: SourceLocation::dummy(),
        }
    }
}

impl From<CodegenError> for CompilerError {
    fn from(err: CodegenError) -> Self {
        match err.kind() {
            ErrorKind::InternalContract => CompilerError::InternalError {
                message: err.to_string(),
            },
            ErrorKind::MalformedInput | ErrorKind::Unsupported => {
                let location = err.location().clone();
                CompilerError::codegen_error(err.to_string(), location)
            }
        }
    }
}
