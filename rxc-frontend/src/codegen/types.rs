//! Type conversion and implicit integer coercion

use std::cmp::Ordering;

use log::trace;
use rxc_common::SourceLocation;

use super::{CodegenError, IrGenerator};
use crate::ast::{SelfParam, Type};
use crate::ir::{CastOp, IrType, Value};

/// Cast that converts an integer of width `from` to width `to`
pub(super) fn int_cast_op(from: u32, to: u32, signed: bool) -> CastOp {
    match from.cmp(&to) {
        Ordering::Less if signed => CastOp::SExt,
        Ordering::Less => CastOp::ZExt,
        Ordering::Greater => CastOp::Trunc,
        Ordering::Equal => CastOp::Bitcast,
    }
}

impl<'a> IrGenerator<'a> {
    /// Convert a semantic type to its IR representation
    pub(super) fn convert_type(&self, ty: &Type, location: &SourceLocation) -> Result<IrType, CodegenError> {
        match ty {
            Type::I32 | Type::U32 | Type::Char => Ok(IrType::I32),
            Type::Isize | Type::Usize => Ok(IrType::ptr_sized()),
            Type::Bool => Ok(IrType::I1),
            Type::Str => Ok(IrType::I8),
            Type::Unit | Type::Never => Ok(IrType::Void),
            Type::Ref { inner, .. } => Ok(self.convert_type(inner, location)?.ptr_to()),
            Type::Array { element, len } => {
                Ok(IrType::array_of(self.convert_type(element, location)?, *len))
            }
            Type::Struct(name) => self
                .module
                .get_struct(name)
                .map(|def| IrType::Struct(def.clone()))
                .ok_or_else(|| CodegenError::UnknownStruct {
                    name: name.clone(),
                    location: location.clone(),
                }),
            // Discriminant only
            Type::Enum(_) => Ok(IrType::I32),
            Type::Function { params, ret } => {
                let param_types = params
                    .iter()
                    .map(|param| self.convert_type(param, location))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(IrType::Function {
                    return_type: Box::new(self.convert_type(ret, location)?),
                    param_types,
                }
                .ptr_to())
            }
            Type::SelfType => self
                .impl_target
                .as_ref()
                .map(|target| target.ir_type.clone())
                .ok_or_else(|| CodegenError::SelfOutsideImpl {
                    location: location.clone(),
                }),
        }
    }

    /// `self` is passed by address unless annotated with an explicit type
    pub(super) fn self_param_type(&self, param: &SelfParam, location: &SourceLocation) -> Result<IrType, CodegenError> {
        if let Some(explicit) = &param.explicit_type {
            return self.convert_type(explicit, location);
        }
        self.impl_target
            .as_ref()
            .map(|target| target.ir_type.clone().ptr_to())
            .ok_or_else(|| CodegenError::SelfOutsideImpl {
                location: location.clone(),
            })
    }

    /// Widen or narrow an integer to `target`. `signed` is the signedness
    /// of the value's source type and picks sign or zero extension.
    pub(super) fn coerce(
        &mut self,
        value: Value,
        target: &IrType,
        signed: bool,
        location: &SourceLocation,
    ) -> Result<Value, CodegenError> {
        if value.ty() == target {
            return Ok(value);
        }
        match (value.ty().int_width(), target.int_width()) {
            (Some(from), Some(to)) => {
                let op = int_cast_op(from, to, signed);
                trace!("Coercing i{from} to i{to} with {op}");
                Ok(self.builder.build_cast(op, value, target.clone())?)
            }
            _ => Err(CodegenError::InvalidCast {
                from: value.ty().to_string(),
                to: target.to_string(),
                location: location.clone(),
            }),
        }
    }

    /// Coerce only integer mismatches; any other value passes through
    pub(super) fn coerce_int(
        &mut self,
        value: Value,
        target: &IrType,
        signed: bool,
        location: &SourceLocation,
    ) -> Result<Value, CodegenError> {
        if value.ty().is_integer() && target.is_integer() {
            self.coerce(value, target, signed, location)
        } else {
            Ok(value)
        }
    }

    /// Bring both operands of a binary operation to their common type
    pub(super) fn coerce_to_common(
        &mut self,
        (lhs, lhs_signed): (Value, bool),
        (rhs, rhs_signed): (Value, bool),
        location: &SourceLocation,
    ) -> Result<(Value, Value), CodegenError> {
        let common = IrType::common_type(lhs.ty(), rhs.ty()).ok_or_else(|| CodegenError::NoCommonType {
            lhs: lhs.ty().to_string(),
            rhs: rhs.ty().to_string(),
            location: location.clone(),
        })?;
        let lhs = self.coerce(lhs, &common, lhs_signed, location)?;
        let rhs = self.coerce(rhs, &common, rhs_signed, location)?;
        Ok((lhs, rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_cast_op() {
        assert_eq!(int_cast_op(1, 32, false), CastOp::ZExt);
        assert_eq!(int_cast_op(32, 64, true), CastOp::SExt);
        assert_eq!(int_cast_op(32, 64, false), CastOp::ZExt);
        assert_eq!(int_cast_op(32, 8, true), CastOp::Trunc);
        assert_eq!(int_cast_op(32, 32, true), CastOp::Bitcast);
    }
}
