//! Struct and array literals
//!
//! Aggregates are built in a stack slot element by element and then
//! loaded as a whole.

use crate::ast::Expr;
use crate::codegen::{CodegenError, IrGenerator};
use crate::ir::{IrType, Value};

fn array_slot(gen: &mut IrGenerator, expr: &Expr) -> Result<(Value, IrType), CodegenError> {
    let ty = gen.convert_type(&expr.ty, &expr.location)?;
    let element_type = match ty.element_type() {
        Some(element_type) => element_type.clone(),
        None => {
            return Err(CodegenError::NotIndexable {
                ty: expr.ty.clone(),
                location: expr.location.clone(),
            })
        }
    };
    let slot = gen.builder.build_alloca(ty, Some("array"))?;
    Ok((slot, element_type))
}

fn store_element(
    gen: &mut IrGenerator,
    slot: &Value,
    index: usize,
    value: Value,
    element_type: &IrType,
    signed: bool,
    expr: &Expr,
) -> Result<(), CodegenError> {
    let value = gen.coerce_int(value, element_type, signed, &expr.location)?;
    let address = gen.builder.build_gep(
        slot.clone(),
        vec![Value::i32(0), Value::i32(index as i64)],
        element_type.clone(),
    )?;
    gen.builder.build_store(value, address)?;
    Ok(())
}

pub fn lower_array_list(gen: &mut IrGenerator, elements: &[Expr], expr: &Expr) -> Result<Value, CodegenError> {
    let (slot, element_type) = array_slot(gen, expr)?;
    for (i, element) in elements.iter().enumerate() {
        let value = gen.lower_value(element)?;
        store_element(gen, &slot, i, value, &element_type, element.ty.is_signed(), expr)?;
    }
    Ok(gen.builder.build_load(slot)?)
}

/// `[e; n]` evaluates `e` once and stores it `n` times
pub fn lower_array_repeat(gen: &mut IrGenerator, element: &Expr, count: u64, expr: &Expr) -> Result<Value, CodegenError> {
    let (slot, element_type) = array_slot(gen, expr)?;
    let value = gen.lower_value(element)?;
    for i in 0..count as usize {
        store_element(gen, &slot, i, value.clone(), &element_type, element.ty.is_signed(), expr)?;
    }
    Ok(gen.builder.build_load(slot)?)
}

/// Fields are stored in the order they are written
pub fn lower_struct_literal(
    gen: &mut IrGenerator,
    name: &str,
    fields: &[(String, Expr)],
    expr: &Expr,
) -> Result<Value, CodegenError> {
    let def = gen.module.get_struct(name).cloned().ok_or_else(|| CodegenError::UnknownStruct {
        name: name.to_string(),
        location: expr.location.clone(),
    })?;
    let slot = gen.builder.build_alloca(IrType::Struct(def.clone()), Some(name))?;
    for (field, value) in fields {
        let (index, field_type) = def
            .field_index(field)
            .and_then(|index| Some((index, def.field_type(index)?.clone())))
            .ok_or_else(|| CodegenError::UnknownField {
                struct_name: def.name.clone(),
                field: field.clone(),
                location: expr.location.clone(),
            })?;
        let address = gen.builder.build_gep(
            slot.clone(),
            vec![Value::i32(0), Value::i32(index as i64)],
            field_type.clone(),
        )?;
        let lowered = gen.lower_value(value)?;
        let lowered = gen.coerce_int(lowered, &field_type, value.ty.is_signed(), &value.location)?;
        gen.builder.build_store(lowered, address)?;
    }
    Ok(gen.builder.build_load(slot)?)
}
