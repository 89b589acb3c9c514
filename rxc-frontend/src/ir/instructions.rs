//! IR Instructions
//!
//! Defines all instruction types available in the IR.

use serde::Serialize;
use std::fmt;

use crate::ir::{BlockLabel, CastOp, CmpPredicate, IrBinaryOp, IrType, Register, Value};

/// Call target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Callee {
    /// Call a function by its (mangled) name
    Direct(String),
    /// Call through a computed function pointer
    Indirect(Value),
}

impl fmt::Display for Callee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callee::Direct(name) => write!(f, "@{name}"),
            Callee::Indirect(value) => write!(f, "{value}"),
        }
    }
}

/// IR Instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Instruction {
    /// Stack slot: result = alloca type (result is a pointer to `alloc_type`)
    Alloca {
        result: Register,
        alloc_type: IrType,
    },

    /// Load from memory: result = load ptr
    Load {
        result: Register,
        ptr: Value,
    },

    /// Store to memory: store value, ptr
    Store {
        value: Value,
        ptr: Value,
    },

    /// Binary operation: result = op lhs, rhs
    Binary {
        result: Register,
        op: IrBinaryOp,
        lhs: Value,
        rhs: Value,
    },

    /// Integer compare: result (i1) = icmp pred lhs, rhs
    Cmp {
        result: Register,
        pred: CmpPredicate,
        lhs: Value,
        rhs: Value,
    },

    /// Conversion to the result register's type
    Cast {
        result: Register,
        op: CastOp,
        value: Value,
    },

    /// Address arithmetic: leading index selects the object, the rest
    /// select fields/elements
    GetElementPtr {
        result: Register,
        ptr: Value,
        indices: Vec<Value>,
    },

    /// Function call: result = call callee(args...)
    Call {
        result: Option<Register>,
        callee: Callee,
        args: Vec<Value>,
        return_type: IrType,
    },

    /// Phi node: result = phi [val1, label1], [val2, label2], ...
    Phi {
        result: Register,
        incoming: Vec<(Value, BlockLabel)>,
    },

    /// Return: ret value or ret void
    Return(Option<Value>),

    /// Unconditional branch: br label
    Branch(BlockLabel),

    /// Conditional branch: br condition, true_label, false_label
    BranchCond {
        condition: Value,
        true_label: BlockLabel,
        false_label: BlockLabel,
    },
}

impl Instruction {
    /// Register defined by this instruction, if any
    pub fn result(&self) -> Option<&Register> {
        match self {
            Instruction::Alloca { result, .. }
            | Instruction::Load { result, .. }
            | Instruction::Binary { result, .. }
            | Instruction::Cmp { result, .. }
            | Instruction::Cast { result, .. }
            | Instruction::GetElementPtr { result, .. }
            | Instruction::Phi { result, .. } => Some(result),
            Instruction::Call { result, .. } => result.as_ref(),
            Instruction::Store { .. }
            | Instruction::Return(_)
            | Instruction::Branch(_)
            | Instruction::BranchCond { .. } => None,
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Instruction::Return(_) | Instruction::Branch(_) | Instruction::BranchCond { .. }
        )
    }

    /// Blocks control may transfer to after this instruction
    pub fn successors(&self) -> Vec<BlockLabel> {
        match self {
            Instruction::Branch(target) => vec![*target],
            Instruction::BranchCond { true_label, false_label, .. } => vec![*true_label, *false_label],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Alloca { result, alloc_type } => {
                write!(f, "{result} = alloca {alloc_type}")
            }
            Instruction::Load { result, ptr } => {
                write!(f, "{result} = load {}, {}", result.ty, ptr.typed())
            }
            Instruction::Store { value, ptr } => {
                write!(f, "store {}, {}", value.typed(), ptr.typed())
            }
            Instruction::Binary { result, op, lhs, rhs } => {
                write!(f, "{result} = {op} {} {lhs}, {rhs}", result.ty)
            }
            Instruction::Cmp { result, pred, lhs, rhs } => {
                write!(f, "{result} = icmp {pred} {} {lhs}, {rhs}", lhs.ty())
            }
            Instruction::Cast { result, op, value } => {
                write!(f, "{result} = {op} {} to {}", value.typed(), result.ty)
            }
            Instruction::GetElementPtr { result, ptr, indices } => {
                let pointee = ptr.ty().pointee().unwrap_or(ptr.ty());
                write!(f, "{result} = getelementptr {pointee}, {}", ptr.typed())?;
                for index in indices {
                    write!(f, ", {}", index.typed())?;
                }
                Ok(())
            }
            Instruction::Call { result, callee, args, return_type } => {
                if let Some(result) = result {
                    write!(f, "{result} = ")?;
                }
                write!(f, "call {return_type} {callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", arg.typed())?;
                }
                write!(f, ")")
            }
            Instruction::Phi { result, incoming } => {
                write!(f, "{result} = phi {} ", result.ty)?;
                for (i, (value, label)) in incoming.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "[{value}, %{label}]")?;
                }
                Ok(())
            }
            Instruction::Return(Some(value)) => write!(f, "ret {}", value.typed()),
            Instruction::Return(None) => write!(f, "ret void"),
            Instruction::Branch(label) => write!(f, "br label %{label}"),
            Instruction::BranchCond { condition, true_label, false_label } => {
                write!(f, "br {}, label %{true_label}, label %{false_label}", condition.typed())
            }
        }
    }
}
