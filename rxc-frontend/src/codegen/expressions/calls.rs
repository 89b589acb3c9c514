//! Function and method calls

use log::trace;

use crate::ast::{Expr, ExprKind, SymbolKind, Type};
use crate::codegen::{CodegenError, IrGenerator};
use crate::ir::{Callee, IrType, Value};

/// Evaluate arguments left to right, coercing integers to the declared
/// parameter types when the signature is known
fn lower_args(
    gen: &mut IrGenerator,
    args: &[Expr],
    param_types: Option<&[IrType]>,
) -> Result<Vec<Value>, CodegenError> {
    let mut values = Vec::with_capacity(args.len());
    for (i, arg) in args.iter().enumerate() {
        let value = gen.lower_value(arg)?;
        let value = match param_types.and_then(|types| types.get(i)) {
            Some(param_type) => gen.coerce_int(value, param_type, arg.ty.is_signed(), &arg.location)?,
            None => value,
        };
        values.push(value);
    }
    Ok(values)
}

fn split_signature(ty: &IrType) -> Option<(&IrType, &[IrType])> {
    match ty {
        IrType::Function { return_type, param_types } => Some((return_type, param_types)),
        _ => None,
    }
}

pub fn lower_call(gen: &mut IrGenerator, callee: &Expr, args: &[Expr], expr: &Expr) -> Result<Option<Value>, CodegenError> {
    if let ExprKind::Path(symbol) = &callee.kind {
        if symbol.kind == SymbolKind::Function {
            let name = symbol.ir_name();
            let signature = gen.signatures.get(&name).cloned();
            let (return_type, args) = match signature.as_ref().and_then(split_signature) {
                Some((return_type, param_types)) => (return_type.clone(), lower_args(gen, args, Some(param_types))?),
                None => (gen.convert_type(&expr.ty, &expr.location)?, lower_args(gen, args, None)?),
            };
            trace!("Direct call to @{name} with {} arguments", args.len());
            return Ok(gen.builder.build_call(Callee::Direct(name), args, return_type)?);
        }
    }

    let target = gen.lower_value(callee)?;
    let signature = target.ty().pointee().and_then(split_signature).map(|(ret, params)| (ret.clone(), params.to_vec()));
    let (return_type, args) = match signature {
        Some((return_type, param_types)) => (return_type, lower_args(gen, args, Some(&param_types))?),
        None => (gen.convert_type(&expr.ty, &expr.location)?, lower_args(gen, args, None)?),
    };
    Ok(gen.builder.build_call(Callee::Indirect(target), args, return_type)?)
}

/// `receiver.method(args)` calls `Type::method` with the receiver's
/// address as the first argument, or its value when the method takes
/// `self` by value
pub fn lower_method_call(
    gen: &mut IrGenerator,
    receiver: &Expr,
    method: &str,
    args: &[Expr],
    expr: &Expr,
) -> Result<Option<Value>, CodegenError> {
    let type_name = match receiver.ty.peel_refs() {
        Type::Struct(name) | Type::Enum(name) => name.clone(),
        Type::SelfType => match &gen.impl_target {
            Some(target) => target.name.clone(),
            None => {
                return Err(CodegenError::SelfOutsideImpl {
                    location: expr.location.clone(),
                })
            }
        },
        other => {
            return Err(CodegenError::UnsupportedConstruct {
                construct: format!("method call on {other}"),
                location: expr.location.clone(),
            })
        }
    };
    let name = format!("{type_name}::{method}");
    let (return_type, param_types) = match gen.signatures.get(&name).and_then(split_signature) {
        Some((ret, params)) => (ret.clone(), params.to_vec()),
        None => {
            return Err(CodegenError::UndefinedFunction {
                name,
                location: expr.location.clone(),
            })
        }
    };

    let address = gen.lower_address(receiver)?;
    let address = gen.auto_deref(address)?;
    let receiver_value = match param_types.first() {
        Some(self_type) if !self_type.is_pointer() && address.ty().pointee() == Some(self_type) => {
            gen.builder.build_load(address)?
        }
        _ => address,
    };

    let mut values = vec![receiver_value];
    values.extend(lower_args(gen, args, param_types.get(1..))?);
    trace!("Method call to @{name} with {} arguments", values.len());
    Ok(gen.builder.build_call(Callee::Direct(name), values, return_type)?)
}
