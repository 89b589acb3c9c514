//! Path expressions: variables, constants, enum variants and functions

use crate::ast::{Expr, Symbol, SymbolKind};
use crate::codegen::{CodegenError, IrGenerator};
use crate::ir::Value;

pub fn lower_path(gen: &mut IrGenerator, symbol: &Symbol, expr: &Expr) -> Result<Value, CodegenError> {
    let location = &expr.location;
    match symbol.kind {
        SymbolKind::LocalVariable | SymbolKind::Parameter => {
            let slot = gen.local_slot(symbol, location)?;
            Ok(gen.builder.build_load(slot)?)
        }

        SymbolKind::Constant => {
            let folded = gen.constants.get(&symbol.id).copied().ok_or_else(|| {
                CodegenError::ConstantNotFound {
                    name: symbol.ir_name(),
                    location: location.clone(),
                }
            })?;
            let ty = gen.convert_type(&symbol.ty, location)?;
            Ok(Value::constant(ty, folded.as_i64()))
        }

        SymbolKind::EnumVariantConstructor => {
            let enum_name = symbol.owner.as_deref().ok_or_else(|| CodegenError::UnresolvedSymbol {
                name: symbol.name.clone(),
                location: location.clone(),
            })?;
            let def = gen.module.get_enum(enum_name).ok_or_else(|| CodegenError::UnknownEnum {
                name: enum_name.to_string(),
                location: location.clone(),
            })?;
            let discriminant = def.discriminant(&symbol.name).ok_or_else(|| CodegenError::UnknownVariant {
                enum_name: enum_name.to_string(),
                variant: symbol.name.clone(),
                location: location.clone(),
            })?;
            Ok(Value::i32(discriminant))
        }

        SymbolKind::Function => {
            let name = symbol.ir_name();
            let ty = gen.signatures.get(&name).cloned().ok_or_else(|| CodegenError::UndefinedFunction {
                name: name.clone(),
                location: location.clone(),
            })?;
            Ok(Value::global(ty.ptr_to(), &name))
        }

        SymbolKind::Struct | SymbolKind::Enum => Err(CodegenError::InvalidPathKind {
            name: symbol.name.clone(),
            kind: symbol.kind,
            location: location.clone(),
        }),
    }
}
