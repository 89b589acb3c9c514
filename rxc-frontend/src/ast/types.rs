//! Semantic types as assigned by the type checker

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved static type of an expression or declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    I32,
    U32,
    Isize,
    Usize,
    Bool,
    Char,
    /// String slice contents; only meaningful behind a reference
    Str,
    Unit,
    Never,
    Ref {
        inner: Box<Type>,
        mutable: bool,
    },
    Array {
        element: Box<Type>,
        len: u64,
    },
    Struct(String),
    Enum(String),
    Function {
        params: Vec<Type>,
        ret: Box<Type>,
    },
    /// `Self` inside an impl block
    SelfType,
}

impl Type {
    pub fn reference(inner: Type) -> Self {
        Type::Ref {
            inner: Box::new(inner),
            mutable: false,
        }
    }

    pub fn mut_reference(inner: Type) -> Self {
        Type::Ref {
            inner: Box::new(inner),
            mutable: true,
        }
    }

    pub fn array(element: Type, len: u64) -> Self {
        Type::Array {
            element: Box::new(element),
            len,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::I32 | Type::U32 | Type::Isize | Type::Usize)
    }

    /// Signedness used to pick signed/unsigned opcodes and extensions.
    /// Anything that is not an unsigned primitive counts as signed.
    pub fn is_signed(&self) -> bool {
        !matches!(self, Type::U32 | Type::Usize | Type::Bool | Type::Char)
    }

    pub fn is_unit_like(&self) -> bool {
        matches!(self, Type::Unit | Type::Never)
    }

    /// Strip any number of references
    pub fn peel_refs(&self) -> &Type {
        let mut ty = self;
        while let Type::Ref { inner, .. } = ty {
            ty = inner;
        }
        ty
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::I32 => write!(f, "i32"),
            Type::U32 => write!(f, "u32"),
            Type::Isize => write!(f, "isize"),
            Type::Usize => write!(f, "usize"),
            Type::Bool => write!(f, "bool"),
            Type::Char => write!(f, "char"),
            Type::Str => write!(f, "str"),
            Type::Unit => write!(f, "()"),
            Type::Never => write!(f, "!"),
            Type::Ref { inner, mutable: true } => write!(f, "&mut {inner}"),
            Type::Ref { inner, mutable: false } => write!(f, "&{inner}"),
            Type::Array { element, len } => write!(f, "[{element}; {len}]"),
            Type::Struct(name) | Type::Enum(name) => write!(f, "{name}"),
            Type::Function { params, ret } => {
                write!(f, "fn(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")
            }
            Type::SelfType => write!(f, "Self"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signedness() {
        assert!(Type::I32.is_signed());
        assert!(Type::Isize.is_signed());
        assert!(!Type::U32.is_signed());
        assert!(!Type::Usize.is_signed());
        assert!(!Type::Bool.is_signed());
        assert!(!Type::Char.is_signed());
    }

    #[test]
    fn test_display() {
        let ty = Type::mut_reference(Type::array(Type::U32, 4));
        assert_eq!(ty.to_string(), "&mut [u32; 4]");
        let f = Type::Function {
            params: vec![Type::I32, Type::Bool],
            ret: Box::new(Type::Unit),
        };
        assert_eq!(f.to_string(), "fn(i32, bool) -> ()");
    }

    #[test]
    fn test_peel_refs() {
        let ty = Type::reference(Type::reference(Type::Struct("Point".to_string())));
        assert_eq!(ty.peel_refs(), &Type::Struct("Point".to_string()));
    }
}
