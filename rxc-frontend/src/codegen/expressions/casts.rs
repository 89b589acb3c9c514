//! `as` casts

use crate::ast::{Expr, Type};
use crate::codegen::types::int_cast_op;
use crate::codegen::{CodegenError, IrGenerator};
use crate::ir::{CastOp, IrType, Value};

/// Integer casts extend according to the source type's signedness
pub fn lower_cast(gen: &mut IrGenerator, operand: &Expr, target: &Type, expr: &Expr) -> Result<Value, CodegenError> {
    let value = gen.lower_value(operand)?;
    let target_type = gen.convert_type(target, &expr.location)?;
    if value.ty() == &target_type {
        return Ok(value);
    }
    let op = match (value.ty(), &target_type) {
        (IrType::Int(from), IrType::Int(to)) => int_cast_op(*from, *to, operand.ty.is_signed()),
        (IrType::Ptr(_), IrType::Ptr(_)) => CastOp::Bitcast,
        (IrType::Ptr(_), IrType::Int(_)) => CastOp::PtrToInt,
        (IrType::Int(_), IrType::Ptr(_)) => CastOp::IntToPtr,
        (from, to) => {
            return Err(CodegenError::UnsupportedCast {
                from: from.to_string(),
                to: to.to_string(),
                location: expr.location.clone(),
            })
        }
    };
    Ok(gen.builder.build_cast(op, value, target_type)?)
}
