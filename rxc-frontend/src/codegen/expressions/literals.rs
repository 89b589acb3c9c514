//! Literal lowering

use log::debug;

use crate::ast::{Expr, IntSuffix, Literal};
use crate::codegen::{CodegenError, IrGenerator};
use crate::ir::{GlobalVariable, IrType, Value};

pub fn lower_literal(gen: &mut IrGenerator, literal: &Literal, expr: &Expr) -> Result<Value, CodegenError> {
    match literal {
        Literal::Int { value, suffix } => {
            let ty = match suffix {
                IntSuffix::I32 | IntSuffix::U32 => IrType::I32,
                IntSuffix::Isize | IntSuffix::Usize => IrType::ptr_sized(),
                // Unsuffixed literals take the integer type inferred for them
                IntSuffix::None if expr.ty.is_integer() => gen.convert_type(&expr.ty, &expr.location)?,
                IntSuffix::None => IrType::I32,
            };
            Ok(Value::constant(ty, *value))
        }
        Literal::Bool(value) => Ok(Value::bool(*value)),
        Literal::Char(c) => Ok(Value::i32(i64::from(u32::from(*c)))),
        Literal::Str(s) | Literal::CStr(s) => Ok(intern_string(gen, s)),
    }
}

/// Emit a NUL-terminated global for `s` and return its address
pub fn intern_string(gen: &mut IrGenerator, s: &str) -> Value {
    let name = format!(".str.{}", gen.next_string_id);
    gen.next_string_id += 1;
    let var_type = IrType::array_of(IrType::I8, s.len() as u64 + 1);
    debug!("Interning string literal as @{name}");
    gen.module.add_global(GlobalVariable {
        name: name.clone(),
        var_type: var_type.clone(),
        is_constant: true,
        initializer: Some(s.to_string()),
    });
    Value::global(var_type.ptr_to(), &name)
}
