//! Address resolution
//!
//! Assignment targets, field and index reads, borrows and method
//! receivers all go through `lower_place`/`lower_address`, so reads and
//! writes of the same place compute the same address.

use crate::ast::{ArithOp, Expr, ExprKind};
use crate::codegen::{CodegenError, IrGenerator};
use crate::ir::{IrType, Value};

use super::operators::arith_opcode;

fn is_place(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Path(symbol) => symbol.is_variable(),
        ExprKind::Field { .. } | ExprKind::Index { .. } | ExprKind::Deref(_) => true,
        _ => false,
    }
}

impl<'a> IrGenerator<'a> {
    /// Address of an assignable place: a variable, field, index or deref
    pub(super) fn lower_place(&mut self, expr: &Expr) -> Result<Value, CodegenError> {
        match &expr.kind {
            ExprKind::Path(symbol) if symbol.is_variable() => self.local_slot(symbol, &expr.location),
            ExprKind::Deref(inner) => {
                let pointer = self.lower_value(inner)?;
                if !pointer.ty().is_pointer() {
                    return Err(CodegenError::InvalidLvalue {
                        location: expr.location.clone(),
                    });
                }
                Ok(pointer)
            }
            ExprKind::Field { base, field } => field_address(self, base, field, expr),
            ExprKind::Index { base, index } => index_address(self, base, index, expr),
            _ => Err(CodegenError::InvalidLvalue {
                location: expr.location.clone(),
            }),
        }
    }

    /// Address of any expression; values that are not places are spilled
    /// to a fresh stack slot
    pub(super) fn lower_address(&mut self, expr: &Expr) -> Result<Value, CodegenError> {
        if is_place(expr) {
            return self.lower_place(expr);
        }
        let value = self.lower_value(expr)?;
        let slot = self.builder.build_alloca(value.ty().clone(), Some("tmp"))?;
        self.builder.build_store(value, slot.clone())?;
        Ok(slot)
    }

    /// Load through pointer-to-pointer addresses until the address points
    /// at the object itself
    pub(super) fn auto_deref(&mut self, mut address: Value) -> Result<Value, CodegenError> {
        while matches!(address.ty().pointee(), Some(IrType::Ptr(_))) {
            address = self.builder.build_load(address)?;
        }
        Ok(address)
    }
}

fn field_address(gen: &mut IrGenerator, base: &Expr, field: &str, expr: &Expr) -> Result<Value, CodegenError> {
    let address = gen.lower_address(base)?;
    let address = gen.auto_deref(address)?;
    let def = match address.ty().pointee() {
        Some(IrType::Struct(def)) => def.clone(),
        _ => {
            return Err(CodegenError::NotAStruct {
                ty: base.ty.clone(),
                location: expr.location.clone(),
            })
        }
    };
    let (index, field_type) = def
        .field_index(field)
        .and_then(|index| Some((index, def.field_type(index)?.clone())))
        .ok_or_else(|| CodegenError::UnknownField {
            struct_name: def.name.clone(),
            field: field.to_string(),
            location: expr.location.clone(),
        })?;
    Ok(gen
        .builder
        .build_gep(address, vec![Value::i32(0), Value::i32(index as i64)], field_type)?)
}

fn index_address(gen: &mut IrGenerator, base: &Expr, index: &Expr, expr: &Expr) -> Result<Value, CodegenError> {
    let address = gen.lower_address(base)?;
    let address = gen.auto_deref(address)?;
    let element_type = match address.ty().pointee().and_then(IrType::element_type) {
        Some(element_type) => element_type.clone(),
        None => {
            return Err(CodegenError::NotIndexable {
                ty: base.ty.clone(),
                location: expr.location.clone(),
            })
        }
    };
    let index = gen.lower_value(index)?;
    Ok(gen
        .builder
        .build_gep(address, vec![Value::i32(0), index], element_type)?)
}

pub fn lower_assign(gen: &mut IrGenerator, target: &Expr, value: &Expr, expr: &Expr) -> Result<Option<Value>, CodegenError> {
    let address = gen.lower_place(target)?;
    let new_value = gen.lower_value(value)?;
    if gen.builder.current_block_has_terminator() {
        return Ok(None);
    }
    let slot_type = address.ty().pointee().cloned().unwrap_or(IrType::Void);
    let new_value = gen.coerce_int(new_value, &slot_type, value.ty.is_signed(), &expr.location)?;
    gen.builder.build_store(new_value, address)?;
    Ok(None)
}

/// `target op= value`: load, apply, store back. The right side is
/// coerced to the target's type.
pub fn lower_compound_assign(
    gen: &mut IrGenerator,
    op: ArithOp,
    target: &Expr,
    value: &Expr,
    expr: &Expr,
) -> Result<Option<Value>, CodegenError> {
    let address = gen.lower_place(target)?;
    let current = gen.builder.build_load(address.clone())?;
    let rhs = match gen.lower_expr(value)? {
        Some(rhs) if !gen.builder.current_block_has_terminator() => rhs,
        _ => return Ok(None),
    };
    let rhs = gen.coerce(rhs, &current.ty().clone(), value.ty.is_signed(), &expr.location)?;
    let opcode = arith_opcode(op, target.ty.is_signed());
    let result = gen.builder.build_binary(opcode, current, rhs)?;
    gen.builder.build_store(result, address)?;
    Ok(None)
}

/// `&e` is the address of `e`; `&&e` additionally spills that address
pub fn lower_borrow(gen: &mut IrGenerator, inner: &Expr, double: bool) -> Result<Value, CodegenError> {
    let address = gen.lower_address(inner)?;
    if !double {
        return Ok(address);
    }
    let slot = gen.builder.build_alloca(address.ty().clone(), Some("ref"))?;
    gen.builder.build_store(address, slot.clone())?;
    Ok(slot)
}

pub fn lower_deref(gen: &mut IrGenerator, inner: &Expr, expr: &Expr) -> Result<Value, CodegenError> {
    let pointer = gen.lower_value(inner)?;
    if !pointer.ty().is_pointer() {
        return Err(CodegenError::UnsupportedConstruct {
            construct: format!("dereference of non-pointer {}", pointer.ty()),
            location: expr.location.clone(),
        });
    }
    Ok(gen.builder.build_load(pointer)?)
}
