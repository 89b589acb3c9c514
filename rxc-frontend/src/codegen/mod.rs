//! IR generation from the typed AST
//!
//! Lowering runs in two passes over the top-level items. The first
//! registers struct and enum layouts, function signatures and folded
//! constants; the second lowers function and method bodies. All mutable
//! state lives in one [`IrGenerator`] that is consumed by `generate`.

mod errors;
mod types;
mod context;
mod items;
mod expressions;
mod statements;

pub use errors::{CodegenError, ErrorKind};

use std::collections::HashMap;

use rxc_common::{SourceLocation, SymbolId};

use crate::ast::{Item, Symbol};
use crate::const_eval::{ConstEvaluator, ConstValue};
use crate::ir::{BlockLabel, IrBuilder, IrType, Module, Value};
use context::{ImplTarget, ItemShadows, LoopFrame};

/// Lowers one program to an IR [`Module`]
pub struct IrGenerator<'a> {
    module: Module,
    builder: IrBuilder,
    evaluator: &'a dyn ConstEvaluator,
    /// Stack slot of every variable in scope
    locals: HashMap<SymbolId, Value>,
    constants: HashMap<SymbolId, ConstValue>,
    /// Function type of every function visible by IR name
    signatures: HashMap<String, IrType>,
    loops: Vec<LoopFrame>,
    impl_target: Option<ImplTarget>,
    next_string_id: u32,
}

impl<'a> IrGenerator<'a> {
    pub fn new(module_name: &str, evaluator: &'a dyn ConstEvaluator) -> Self {
        Self {
            module: Module::new(module_name.to_string()),
            builder: IrBuilder::new(),
            evaluator,
            locals: HashMap::new(),
            constants: HashMap::new(),
            signatures: HashMap::new(),
            loops: Vec::new(),
            impl_target: None,
            next_string_id: 0,
        }
    }

    /// Generate the IR module for an ordered list of top-level items
    pub fn generate(mut self, items: &[Item]) -> Result<Module, CodegenError> {
        let top_level: Vec<&Item> = items.iter().collect();

        // Top-level declarations are never restored
        let mut declared = ItemShadows::default();
        self.declare_items(&top_level, &mut declared)?;

        for item in top_level {
            items::lower_item(&mut self, item)?;
        }

        Ok(self.module)
    }

    fn current_label(&self, location: &SourceLocation) -> Result<BlockLabel, CodegenError> {
        self.builder.current_block().ok_or_else(|| CodegenError::InternalError {
            message: "no current block".to_string(),
            location: location.clone(),
        })
    }

    /// Stack slot bound to a variable symbol
    fn local_slot(&self, symbol: &Symbol, location: &SourceLocation) -> Result<Value, CodegenError> {
        self.locals
            .get(&symbol.id)
            .cloned()
            .ok_or_else(|| CodegenError::UnresolvedSymbol {
                name: symbol.name.clone(),
                location: location.clone(),
            })
    }

    /// Emitted name of a function declared in the current impl context
    fn function_name(&self, name: &str) -> String {
        match &self.impl_target {
            Some(target) => format!("{}::{name}", target.name),
            None => name.to_string(),
        }
    }
}
