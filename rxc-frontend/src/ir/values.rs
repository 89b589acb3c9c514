//! IR Value Representations
//!
//! Registers, typed constants and named globals. Every value knows its
//! own type.

use rxc_common::RegId;
use serde::Serialize;
use std::fmt;

use crate::ir::IrType;

/// SSA register, unique per function by `id`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Register {
    pub id: RegId,
    pub ty: IrType,
    /// Debug name, printed as `%hint.id`
    pub hint: Option<String>,
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "%{hint}.{}", self.id),
            None => write!(f, "%t{}", self.id),
        }
    }
}

/// IR Value - operands of IR instructions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Value {
    Register(Register),

    /// Integer constant; booleans are `i1` 0/1
    Constant { ty: IrType, value: i64 },

    /// Address of a global (string data or function); `ty` is a pointer
    Global { ty: IrType, name: String },
}

impl Value {
    pub fn constant(ty: IrType, value: i64) -> Self {
        Value::Constant { ty, value }
    }

    pub fn bool(value: bool) -> Self {
        Value::constant(IrType::I1, i64::from(value))
    }

    pub fn i32(value: i64) -> Self {
        Value::constant(IrType::I32, value)
    }

    pub fn global(ty: IrType, name: &str) -> Self {
        Value::Global {
            ty,
            name: name.to_string(),
        }
    }

    pub fn ty(&self) -> &IrType {
        match self {
            Value::Register(reg) => &reg.ty,
            Value::Constant { ty, .. } | Value::Global { ty, .. } => ty,
        }
    }

    /// `<type> <value>` as used in operand lists
    pub fn typed(&self) -> String {
        format!("{} {self}", self.ty())
    }
}

impl From<Register> for Value {
    fn from(reg: Register) -> Self {
        Value::Register(reg)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Register(reg) => write!(f, "{reg}"),
            Value::Constant { ty: IrType::Int(1), value } => {
                write!(f, "{}", if *value != 0 { "true" } else { "false" })
            }
            Value::Constant { value, .. } => write!(f, "{value}"),
            Value::Global { name, .. } => write!(f, "@{name}"),
        }
    }
}
