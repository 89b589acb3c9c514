//! Resolved symbols attached to name references

use rxc_common::SymbolId;
use serde::{Deserialize, Serialize};

use super::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    LocalVariable,
    Parameter,
    Constant,
    EnumVariantConstructor,
    Function,
    Struct,
    Enum,
}

/// A resolved name. `owner` names the enclosing type for enum variants
/// (the enum) and for methods and associated consts (the impl target).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub ty: Type,
    #[serde(default)]
    pub owner: Option<String>,
}

impl Symbol {
    pub fn new(id: SymbolId, name: &str, kind: SymbolKind, ty: Type) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            ty,
            owner: None,
        }
    }

    pub fn local(id: SymbolId, name: &str, ty: Type) -> Self {
        Self::new(id, name, SymbolKind::LocalVariable, ty)
    }

    pub fn param(id: SymbolId, name: &str, ty: Type) -> Self {
        Self::new(id, name, SymbolKind::Parameter, ty)
    }

    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, SymbolKind::LocalVariable | SymbolKind::Parameter)
    }

    /// Name the symbol is emitted under: `Owner::name` for owned symbols
    pub fn ir_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}::{}", self.name),
            None => self.name.clone(),
        }
    }
}
