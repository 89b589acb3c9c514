//! Transient lowering state and its scope guards
//!
//! Every push of loop, function, impl or block-item state goes through a
//! `with_*` helper that restores the previous state after the closure
//! returns, on the error path as well.

use std::collections::HashMap;
use std::mem;

use log::trace;
use rxc_common::{SourceLocation, SymbolId};

use super::{CodegenError, IrGenerator};
use crate::ast::Item;
use crate::ir::{BlockLabel, EnumDef, IrBuilder, IrType, StructType, Value};

/// Targets and break values of the innermost loop being lowered
#[derive(Debug)]
pub(super) struct LoopFrame {
    /// `continue` target
    pub header: BlockLabel,
    /// `break` target
    pub exit: BlockLabel,
    /// Set when the loop expression has a non-unit type
    pub result_type: Option<IrType>,
    pub breaks: Vec<(Value, BlockLabel)>,
}

impl LoopFrame {
    pub fn new(header: BlockLabel, exit: BlockLabel, result_type: Option<IrType>) -> Self {
        Self {
            header,
            exit,
            result_type,
            breaks: Vec::new(),
        }
    }
}

/// Type an impl block attaches its items to
#[derive(Debug, Clone)]
pub(super) struct ImplTarget {
    pub name: String,
    pub ir_type: IrType,
}

/// Module-level bindings replaced by block-local items, in declaration order
#[derive(Debug, Default)]
pub(super) struct ItemShadows {
    pub structs: Vec<(String, Option<StructType>)>,
    pub enums: Vec<(String, Option<EnumDef>)>,
    pub signatures: Vec<(String, Option<IrType>)>,
}

/// Per-function state saved around a nested function
struct FunctionState {
    builder: IrBuilder,
    locals: HashMap<SymbolId, Value>,
    loops: Vec<LoopFrame>,
}

impl<'a> IrGenerator<'a> {
    /// Lower `f` with `frame` as the innermost loop. Returns the frame
    /// with the break values it collected.
    pub(super) fn with_loop<T>(
        &mut self,
        frame: LoopFrame,
        f: impl FnOnce(&mut Self) -> Result<T, CodegenError>,
    ) -> Result<(T, LoopFrame), CodegenError> {
        self.loops.push(frame);
        let result = f(self);
        let frame = self.loops.pop().ok_or_else(|| CodegenError::InternalError {
            message: "loop stack underflow".to_string(),
            location: SourceLocation::dummy(),
        })?;
        result.map(|value| (value, frame))
    }

    /// Lower `f` as a fresh function: empty builder, no enclosing loops.
    /// Locals are snapshotted and restored afterwards.
    pub(super) fn with_function_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CodegenError>,
    ) -> Result<T, CodegenError> {
        let saved = FunctionState {
            builder: mem::take(&mut self.builder),
            locals: self.locals.clone(),
            loops: mem::take(&mut self.loops),
        };
        let result = f(self);
        self.builder = saved.builder;
        self.locals = saved.locals;
        self.loops = saved.loops;
        result
    }

    pub(super) fn with_impl_target<T>(
        &mut self,
        target: Option<ImplTarget>,
        f: impl FnOnce(&mut Self) -> Result<T, CodegenError>,
    ) -> Result<T, CodegenError> {
        let saved = mem::replace(&mut self.impl_target, target);
        let result = f(self);
        self.impl_target = saved;
        result
    }

    /// Make block-local items visible while lowering `f`, then restore
    /// whatever they shadowed
    pub(super) fn with_block_items<T>(
        &mut self,
        items: &[&Item],
        f: impl FnOnce(&mut Self) -> Result<T, CodegenError>,
    ) -> Result<T, CodegenError> {
        if items.is_empty() {
            return f(self);
        }
        let mut shadows = ItemShadows::default();
        let result = self
            .declare_items(items, &mut shadows)
            .and_then(|()| f(self));
        self.restore_shadows(shadows);
        result
    }

    fn restore_shadows(&mut self, shadows: ItemShadows) {
        for (name, previous) in shadows.signatures.into_iter().rev() {
            match previous {
                Some(ty) => {
                    self.signatures.insert(name, ty);
                }
                None => {
                    self.signatures.remove(&name);
                }
            }
        }
        for (name, previous) in shadows.enums.into_iter().rev() {
            trace!("Restoring enum binding '{name}'");
            match previous {
                Some(def) => {
                    self.module.set_enum(def);
                }
                None => {
                    self.module.remove_enum(&name);
                }
            }
        }
        for (name, previous) in shadows.structs.into_iter().rev() {
            trace!("Restoring struct binding '{name}'");
            match previous {
                Some(def) => {
                    self.module.bind_struct(&name, def);
                }
                None => {
                    self.module.remove_struct(&name);
                }
            }
        }
    }
}
