//! Intermediate Representation
//!
//! A typed, basic-block IR in the spirit of LLVM: SSA registers with
//! explicit stack slots for every binding, GEP address arithmetic and phi
//! nodes at control-flow merges.
//!
//! ## Architecture
//!
//! - `types` - Type system (IrType, StructType)
//! - `values` - Registers, constants and globals
//! - `ops` - Binary opcodes, compare predicates and cast kinds
//! - `instructions` - IR instructions
//! - `blocks` - Basic blocks and their labels
//! - `function` - Function definitions
//! - `module` - Module, enums and global variables
//! - `builder` - IR construction utilities

pub use self::types::{IrType, StructType};
pub use self::values::{Register, Value};
pub use self::ops::{CastOp, CmpPredicate, IrBinaryOp};
pub use self::instructions::{Callee, Instruction};
pub use self::blocks::{BasicBlock, BlockLabel};
pub use self::function::Function;
pub use self::module::{EnumDef, GlobalVariable, Module};
pub use self::builder::IrBuilder;

mod types;
mod values;
mod ops;
mod instructions;
mod blocks;
mod function;
mod module;
mod builder;
