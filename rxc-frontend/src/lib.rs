//! rxc compiler - Frontend
//!
//! This crate lowers a resolved, type-checked program to IR:
//! - AST: the typed tree handed over by semantic analysis
//! - Const eval: folding of `const` initializers
//! - IR: module, functions, basic blocks and the builder
//! - Codegen: the AST to IR lowering pass

pub mod ast;
pub mod const_eval;
pub mod ir;
pub mod codegen;
#[cfg(test)]
mod codegen_tests;

pub use ast::{Expr, ExprKind, Item, Program, Stmt, Symbol, SymbolKind, Type};
pub use codegen::{CodegenError, ErrorKind, IrGenerator};
pub use const_eval::{ConstEvaluator, ConstScope, ConstValue, LiteralEvaluator};

use log::info;
use rxc_common::CompilerError;

use crate::ir::Module;

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Lower a typed program with the built-in constant folder
    pub fn lower_program(program: &Program, module_name: &str) -> Result<Module, CompilerError> {
        Self::lower_with(program, module_name, &LiteralEvaluator)
    }

    /// Lower a typed program, folding constants with `evaluator`
    pub fn lower_with(
        program: &Program,
        module_name: &str,
        evaluator: &dyn ConstEvaluator,
    ) -> Result<Module, CompilerError> {
        info!("Lowering {} top-level items into module '{module_name}'", program.items.len());
        let generator = IrGenerator::new(module_name, evaluator);
        Ok(generator.generate(&program.items)?)
    }

    /// Parse a JSON-serialized typed program
    pub fn parse_program(json: &str) -> Result<Program, CompilerError> {
        serde_json::from_str(json).map_err(|e| CompilerError::input_error(format!("invalid typed AST: {e}")))
    }

    /// Parse and lower a JSON-serialized typed program
    pub fn lower_json(json: &str, module_name: &str) -> Result<Module, CompilerError> {
        let program = Self::parse_program(json)?;
        Self::lower_program(&program, module_name)
    }
}
