//! Item lowering: type collection, signatures, constants, functions and
//! impl blocks

use log::{debug, warn};
use rxc_common::SourceLocation;

use super::context::{ImplTarget, ItemShadows};
use super::statements::lower_block;
use super::{CodegenError, IrGenerator};
use crate::ast::{ConstDecl, EnumDecl, FunctionDecl, ImplDecl, ImplItem, Item, StructDecl, Symbol};
use crate::ir::{BlockLabel, EnumDef, Function, IrType, StructType, Value};

impl<'a> IrGenerator<'a> {
    /// Register the items of one scope: struct and enum layouts first (in
    /// order, so a struct may only use structs declared before it), then
    /// function signatures, then constants. Replaced bindings are recorded
    /// in `shadows`.
    pub(super) fn declare_items(&mut self, items: &[&Item], shadows: &mut ItemShadows) -> Result<(), CodegenError> {
        for item in items {
            match item {
                Item::Struct(decl) => {
                    let previous = self.declare_struct(decl)?;
                    shadows.structs.push((decl.name.clone(), previous));
                }
                Item::Enum(decl) => {
                    let previous = self.declare_enum(decl);
                    shadows.enums.push((decl.name.clone(), previous));
                }
                _ => {}
            }
        }

        for item in items {
            match item {
                Item::Function(decl) => {
                    let entry = self.with_impl_target(None, |gen| gen.declare_signature(decl))?;
                    shadows.signatures.push(entry);
                }
                Item::Impl(decl) => {
                    let target = self.impl_target(&decl.target, &decl.location)?;
                    self.with_impl_target(Some(target), |gen| {
                        for item in &decl.items {
                            if let ImplItem::Function(method) = item {
                                shadows.signatures.push(gen.declare_signature(method)?);
                            }
                        }
                        Ok(())
                    })?;
                }
                _ => {}
            }
        }

        for item in items {
            match item {
                Item::Const(decl) => self.declare_const(decl),
                Item::Impl(decl) => {
                    for item in &decl.items {
                        if let ImplItem::Const(decl) = item {
                            self.declare_const(decl);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn declare_struct(&mut self, decl: &StructDecl) -> Result<Option<StructType>, CodegenError> {
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            fields.push((field.name.clone(), self.convert_type(&field.ty, &decl.location)?));
        }
        debug!("Registering struct '{}' with {} fields", decl.name, fields.len());
        Ok(self.module.set_struct(StructType::new(&decl.name, fields)))
    }

    fn declare_enum(&mut self, decl: &EnumDecl) -> Option<EnumDef> {
        debug!("Registering enum '{}' with {} variants", decl.name, decl.variants.len());
        self.module.set_enum(EnumDef::new(&decl.name, &decl.variants))
    }

    fn declare_signature(&mut self, decl: &FunctionDecl) -> Result<(String, Option<IrType>), CodegenError> {
        let name = self.function_name(&decl.name);
        let param_types = self
            .parameter_types(decl)?
            .into_iter()
            .map(|(_, ty)| ty)
            .collect();
        let ty = IrType::Function {
            return_type: Box::new(self.convert_type(&decl.return_type, &decl.location)?),
            param_types,
        };
        let previous = self.signatures.insert(name.clone(), ty);
        Ok((name, previous))
    }

    /// Fold a constant once; uses inline the folded value
    fn declare_const(&mut self, decl: &ConstDecl) {
        match self.evaluator.evaluate(&decl.value, &self.constants) {
            Some(value) => {
                debug!("Constant '{}' folded to {:?}", decl.symbol.name, value);
                self.constants.insert(decl.symbol.id, value);
            }
            None => warn!("Constant '{}' could not be folded", decl.symbol.name),
        }
    }

    pub(super) fn impl_target(&self, name: &str, location: &SourceLocation) -> Result<ImplTarget, CodegenError> {
        let ir_type = if let Some(def) = self.module.get_struct(name) {
            IrType::Struct(def.clone())
        } else if self.module.get_enum(name).is_some() {
            IrType::I32
        } else {
            return Err(CodegenError::UnknownImplTarget {
                name: name.to_string(),
                location: location.clone(),
            });
        };
        Ok(ImplTarget {
            name: name.to_string(),
            ir_type,
        })
    }

    /// `self` (if any) followed by the declared parameters
    fn parameter_types<'d>(&self, decl: &'d FunctionDecl) -> Result<Vec<(&'d Symbol, IrType)>, CodegenError> {
        let mut params = Vec::with_capacity(decl.params.len() + 1);
        if let Some(self_param) = &decl.self_param {
            params.push((&self_param.symbol, self.self_param_type(self_param, &decl.location)?));
        }
        for param in &decl.params {
            params.push((&param.symbol, self.convert_type(&param.ty, &decl.location)?));
        }
        Ok(params)
    }
}

/// Second-pass lowering of a top-level item
pub(super) fn lower_item(gen: &mut IrGenerator, item: &Item) -> Result<(), CodegenError> {
    match item {
        Item::Function(decl) => lower_function(gen, decl),
        Item::Impl(decl) => lower_impl(gen, decl),
        // Registered while declaring the enclosing scope
        Item::Struct(_) | Item::Enum(_) | Item::Const(_) => Ok(()),
    }
}

/// Lower an item declared inside a block. A nested `fn` is a free
/// function even when the enclosing function is a method.
pub(super) fn lower_nested_item(gen: &mut IrGenerator, item: &Item) -> Result<(), CodegenError> {
    match item {
        Item::Function(decl) => gen.with_impl_target(None, |gen| lower_function(gen, decl)),
        other => lower_item(gen, other),
    }
}

pub(super) fn lower_impl(gen: &mut IrGenerator, decl: &ImplDecl) -> Result<(), CodegenError> {
    let target = gen.impl_target(&decl.target, &decl.location)?;
    debug!("Lowering impl block for '{}'", target.name);
    gen.with_impl_target(Some(target), |gen| {
        for item in &decl.items {
            if let ImplItem::Function(method) = item {
                lower_function(gen, method)?;
            }
        }
        Ok(())
    })
}

/// Lower one function. Parameters are spilled to stack slots on entry and
/// a return is synthesized when the body falls off the end.
pub(super) fn lower_function(gen: &mut IrGenerator, decl: &FunctionDecl) -> Result<(), CodegenError> {
    let name = gen.function_name(&decl.name);
    let return_type = gen.convert_type(&decl.return_type, &decl.location)?;
    let params = gen.parameter_types(decl)?;
    debug!("Lowering function '{name}' -> {return_type}");

    // Reserve the position now so an enclosing function precedes the
    // functions nested in it
    let position = gen.module.functions.len();

    let function = gen.with_function_scope(|gen| {
        gen.builder.create_function(name.clone(), return_type.clone());

        let Some(body) = &decl.body else {
            for (symbol, ty) in params {
                gen.builder.add_parameter(ty, &symbol.name)?;
            }
            return finish_function(gen, &decl.location);
        };

        let entry = gen.builder.create_block(BlockLabel::ENTRY_HINT)?;
        gen.builder.switch_to(entry);

        for (symbol, ty) in params {
            let reg = gen.builder.add_parameter(ty.clone(), &symbol.name)?;
            let slot = gen.builder.build_alloca(ty, Some(&format!("{}.addr", symbol.name)))?;
            gen.builder.build_store(reg.into(), slot.clone())?;
            gen.locals.insert(symbol.id, slot);
        }

        let value = lower_block(gen, body)?;
        if !gen.builder.current_block_has_terminator() {
            let signed = decl.return_type.is_signed();
            emit_implicit_return(gen, value, &return_type, signed, &decl.location)?;
        }
        finish_function(gen, &decl.location)
    })?;

    gen.module.functions.insert(position, function);
    Ok(())
}

fn finish_function(gen: &mut IrGenerator, location: &SourceLocation) -> Result<Function, CodegenError> {
    gen.builder.finish_function().ok_or_else(|| CodegenError::InternalError {
        message: "no function under construction".to_string(),
        location: location.clone(),
    })
}

/// Return the body's value; a non-void function whose end is reached
/// without one returns zero (integers) or nothing
fn emit_implicit_return(
    gen: &mut IrGenerator,
    value: Option<Value>,
    return_type: &IrType,
    signed: bool,
    location: &SourceLocation,
) -> Result<(), CodegenError> {
    let value = match value {
        _ if return_type.is_void() => None,
        Some(value) => Some(gen.coerce_int(value, return_type, signed, location)?),
        None if return_type.is_integer() => Some(Value::constant(return_type.clone(), 0)),
        None => None,
    };
    Ok(gen.builder.build_return(value)?)
}
