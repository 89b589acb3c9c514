//! IR Type System
//!
//! Integers carry only a width. Signedness lives in the source type and is
//! chosen per operation (sdiv/udiv, sext/zext, signed/unsigned compares).

use rxc_common::target::POINTER_BITS;
use serde::Serialize;
use std::fmt;

/// Named struct with ordered fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<(String, IrType)>,
}

impl StructType {
    pub fn new(name: &str, fields: Vec<(String, IrType)>) -> Self {
        Self {
            name: name.to_string(),
            fields,
        }
    }

    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|(name, _)| name == field)
    }

    pub fn field_type(&self, index: usize) -> Option<&IrType> {
        self.fields.get(index).map(|(_, ty)| ty)
    }

    /// `%Name = type { ... }`
    pub fn definition(&self) -> String {
        let fields: Vec<String> = self.fields.iter().map(|(_, ty)| ty.to_string()).collect();
        format!("%{} = type {{ {} }}", self.name, fields.join(", "))
    }
}

/// IR Type system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum IrType {
    Void,

    /// Integer of the given bit width (i1 for booleans)
    Int(u32),

    Ptr(Box<IrType>),

    /// Array type [size x element_type]
    Array { size: u64, element_type: Box<IrType> },

    Struct(StructType),

    Function {
        return_type: Box<IrType>,
        param_types: Vec<IrType>,
    },
}

impl IrType {
    pub const I1: IrType = IrType::Int(1);
    pub const I8: IrType = IrType::Int(8);
    pub const I32: IrType = IrType::Int(32);

    /// Integer as wide as a pointer
    pub fn ptr_sized() -> IrType {
        IrType::Int(POINTER_BITS)
    }

    pub fn ptr_to(self) -> IrType {
        IrType::Ptr(Box::new(self))
    }

    pub fn array_of(element_type: IrType, size: u64) -> IrType {
        IrType::Array {
            size,
            element_type: Box::new(element_type),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, IrType::Void)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, IrType::Int(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, IrType::Ptr(_))
    }

    pub fn int_width(&self) -> Option<u32> {
        match self {
            IrType::Int(width) => Some(*width),
            _ => None,
        }
    }

    /// Target of a pointer type
    pub fn pointee(&self) -> Option<&IrType> {
        match self {
            IrType::Ptr(target) => Some(target),
            _ => None,
        }
    }

    /// Element type of an array
    pub fn element_type(&self) -> Option<&IrType> {
        match self {
            IrType::Array { element_type, .. } => Some(element_type),
            _ => None,
        }
    }

    /// Type both operands of a binary operation are coerced to: the same
    /// type when they agree, the wider integer when both are integers.
    pub fn common_type(a: &IrType, b: &IrType) -> Option<IrType> {
        if a == b {
            return Some(a.clone());
        }
        match (a, b) {
            (IrType::Int(wa), IrType::Int(wb)) => Some(IrType::Int(*wa.max(wb))),
            _ => None,
        }
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => write!(f, "void"),
            IrType::Int(width) => write!(f, "i{width}"),
            IrType::Ptr(target) => write!(f, "{target}*"),
            IrType::Array { size, element_type } => write!(f, "[{size} x {element_type}]"),
            IrType::Struct(st) => write!(f, "%{}", st.name),
            IrType::Function { return_type, param_types } => {
                write!(f, "{return_type} (")?;
                for (i, param) in param_types.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{param}")?;
                }
                write!(f, ")")
            }
        }
    }
}
