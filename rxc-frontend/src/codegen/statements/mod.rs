//! Statement lowering

mod control_flow;

pub(super) use control_flow::{
    lower_block, lower_break, lower_continue, lower_if, lower_loop, lower_return, lower_while,
};

use rxc_common::SourceLocation;

use super::items::lower_nested_item;
use super::{CodegenError, IrGenerator};
use crate::ast::{Expr, LetPattern, Stmt, Type};
use crate::ir::Value;

/// Lower one statement. Expression statements yield their value when it
/// is not unit so a block can use it as its result.
pub(super) fn lower_statement(gen: &mut IrGenerator, stmt: &Stmt) -> Result<Option<Value>, CodegenError> {
    match stmt {
        Stmt::Let { pattern, ty, init, location } => {
            lower_let(gen, pattern, ty, init.as_ref(), location)?;
            Ok(None)
        }
        Stmt::Expr(expr) => {
            let value = gen.lower_expr(expr)?;
            Ok(value.filter(|_| !expr.ty.is_unit_like()))
        }
        Stmt::Item(item) => {
            lower_nested_item(gen, item)?;
            Ok(None)
        }
    }
}

fn lower_let(
    gen: &mut IrGenerator,
    pattern: &LetPattern,
    ty: &Type,
    init: Option<&Expr>,
    location: &SourceLocation,
) -> Result<(), CodegenError> {
    let symbol = match pattern {
        LetPattern::Binding(symbol) => symbol,
        LetPattern::Wildcard => {
            if let Some(init) = init {
                gen.lower_expr(init)?;
            }
            return Ok(());
        }
    };

    let slot_type = gen.convert_type(ty, location)?;
    // A unit binding has no storage; reads of it yield no value
    if slot_type.is_void() {
        if let Some(init) = init {
            gen.lower_expr(init)?;
        }
        return Ok(());
    }
    let slot = gen
        .builder
        .build_alloca(slot_type.clone(), Some(&format!("{}.addr", symbol.name)))?;

    if let Some(init) = init {
        let value = gen.lower_expr(init)?;
        // `let x = return;` leaves nothing to store
        if let Some(value) = value.filter(|_| !gen.builder.current_block_has_terminator()) {
            let value = gen.coerce_int(value, &slot_type, init.ty.is_signed(), location)?;
            gen.builder.build_store(value, slot.clone())?;
        }
    }

    gen.locals.insert(symbol.id, slot);
    Ok(())
}
