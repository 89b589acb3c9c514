//! Module and Global Variables
//!
//! Defines the top-level module structure: struct and enum definitions,
//! global variables and functions, all kept in insertion order.

use serde::Serialize;
use std::fmt;

use crate::ir::{Function, IrType, StructType};

/// Field-less enum: ordered variant names with their discriminants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<(String, i64)>,
}

impl EnumDef {
    /// Number variants from zero in declaration order
    pub fn new(name: &str, variants: &[String]) -> Self {
        Self {
            name: name.to_string(),
            variants: variants.iter().cloned().zip(0..).collect(),
        }
    }

    pub fn discriminant(&self, variant: &str) -> Option<i64> {
        self.variants
            .iter()
            .find(|(name, _)| name == variant)
            .map(|(_, value)| *value)
    }
}

/// Global variable definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalVariable {
    pub name: String,
    pub var_type: IrType,
    pub is_constant: bool,
    /// Raw string payload (without the trailing NUL)
    pub initializer: Option<String>,
}

impl fmt::Display for GlobalVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_constant { "constant" } else { "global" };
        write!(f, "@{} = {kind} {}", self.name, self.var_type)?;
        match &self.initializer {
            Some(data) => write!(f, " c\"{}\\00\"", escape_bytes(data)),
            None => write!(f, " zeroinitializer"),
        }
    }
}

fn escape_bytes(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for byte in data.bytes() {
        match byte {
            b'"' | b'\\' => out.push_str(&format!("\\{byte:02X}")),
            0x20..=0x7e => out.push(char::from(byte)),
            _ => out.push_str(&format!("\\{byte:02X}")),
        }
    }
    out
}

/// IR Module - represents a complete compilation unit
///
/// `structs` and `enums` list every definition the module emits. Name
/// lookup goes through a separate scope so a block-local item can shadow
/// a module-level one and be unbound again without losing its emitted
/// definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub name: String,
    pub structs: Vec<StructType>,
    pub enums: Vec<EnumDef>,
    pub globals: Vec<GlobalVariable>,
    pub functions: Vec<Function>,
    /// Visible struct bindings by source name
    #[serde(skip)]
    struct_scope: Vec<(String, StructType)>,
    #[serde(skip)]
    enum_scope: Vec<EnumDef>,
}

impl Module {
    pub fn new(name: String) -> Self {
        Self {
            name,
            structs: Vec::new(),
            enums: Vec::new(),
            globals: Vec::new(),
            functions: Vec::new(),
            struct_scope: Vec::new(),
            enum_scope: Vec::new(),
        }
    }

    pub fn add_global(&mut self, global: GlobalVariable) {
        self.globals.push(global);
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn get_global(&self, name: &str) -> Option<&GlobalVariable> {
        self.globals.iter().find(|g| g.name == name)
    }

    /// Struct currently bound to a source name
    pub fn get_struct(&self, name: &str) -> Option<&StructType> {
        self.struct_scope
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, def)| def)
    }

    pub fn get_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enum_scope.iter().find(|e| e.name == name)
    }

    /// Emit `def` and bind it to its name. The definition is emitted once;
    /// a different layout under a name that is already emitted is renamed
    /// `Name.N`. Returns the replaced binding.
    pub fn set_struct(&mut self, def: StructType) -> Option<StructType> {
        let source_name = def.name.clone();
        let emitted = self.emit_struct(def);
        self.bind_struct(&source_name, emitted)
    }

    /// Rebind a source name to an already emitted definition
    pub fn bind_struct(&mut self, name: &str, def: StructType) -> Option<StructType> {
        match self.struct_scope.iter_mut().find(|(bound, _)| bound == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, def)),
            None => {
                self.struct_scope.push((name.to_string(), def));
                None
            }
        }
    }

    /// Unbind a struct name. Its emitted definition stays.
    pub fn remove_struct(&mut self, name: &str) -> Option<StructType> {
        let index = self.struct_scope.iter().position(|(bound, _)| bound == name)?;
        Some(self.struct_scope.remove(index).1)
    }

    fn emit_struct(&mut self, def: StructType) -> StructType {
        let mut suffix = 0;
        loop {
            let name = match suffix {
                0 => def.name.clone(),
                n => format!("{}.{n}", def.name),
            };
            match self.structs.iter().position(|s| s.name == name) {
                Some(i) if self.structs[i].fields == def.fields => return self.structs[i].clone(),
                Some(_) => suffix += 1,
                None => {
                    let emitted = StructType::new(&name, def.fields);
                    self.structs.push(emitted.clone());
                    return emitted;
                }
            }
        }
    }

    /// Bind an enum to its name, replacing the current binding. Returns
    /// the replaced binding.
    pub fn set_enum(&mut self, def: EnumDef) -> Option<EnumDef> {
        if !self.enums.contains(&def) {
            self.enums.push(def.clone());
        }
        match self.enum_scope.iter_mut().find(|e| e.name == def.name) {
            Some(slot) => Some(std::mem::replace(slot, def)),
            None => {
                self.enum_scope.push(def);
                None
            }
        }
    }

    /// Unbind an enum name. Its emitted definition stays.
    pub fn remove_enum(&mut self, name: &str) -> Option<EnumDef> {
        let index = self.enum_scope.iter().position(|e| e.name == name)?;
        Some(self.enum_scope.remove(index))
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        if !self.structs.is_empty() {
            writeln!(f)?;
            for def in &self.structs {
                writeln!(f, "{}", def.definition())?;
            }
        }
        if !self.enums.is_empty() {
            writeln!(f)?;
            for def in &self.enums {
                let variants: Vec<String> = def
                    .variants
                    .iter()
                    .map(|(name, value)| format!("{name} = {value}"))
                    .collect();
                writeln!(f, "; enum {} {{ {} }}", def.name, variants.join(", "))?;
            }
        }
        if !self.globals.is_empty() {
            writeln!(f)?;
            for global in &self.globals {
                writeln!(f, "{global}")?;
            }
        }
        for function in &self.functions {
            writeln!(f)?;
            write!(f, "{function}")?;
        }
        Ok(())
    }
}
