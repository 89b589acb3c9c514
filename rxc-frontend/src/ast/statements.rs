//! Statements, blocks and items

use rxc_common::SourceLocation;
use serde::{Deserialize, Serialize};

use super::{Expr, Symbol, Type};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LetPattern {
    Binding(Symbol),
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Let {
        pattern: LetPattern,
        ty: Type,
        init: Option<Expr>,
        #[serde(default)]
        location: SourceLocation,
    },
    Expr(Expr),
    Item(Item),
}

impl Stmt {
    /// `let <symbol>: <ty> = <init>;`
    pub fn let_binding(symbol: &Symbol, init: Option<Expr>) -> Self {
        Stmt::Let {
            pattern: LetPattern::Binding(symbol.clone()),
            ty: symbol.ty.clone(),
            init,
            location: SourceLocation::dummy(),
        }
    }
}

/// `{ stmts; tail }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub tail: Option<Box<Expr>>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, tail: Option<Expr>) -> Self {
        Self {
            stmts,
            tail: tail.map(Box::new),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Block whose value is `tail`
    pub fn of(tail: Expr) -> Self {
        Self::new(Vec::new(), Some(tail))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub symbol: Symbol,
    pub ty: Type,
}

/// `self`, `&self`, `&mut self` or `self: T`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfParam {
    pub symbol: Symbol,
    /// Explicit `self: T` annotation
    #[serde(default)]
    pub explicit_type: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub self_param: Option<SelfParam>,
    pub params: Vec<Param>,
    pub return_type: Type,
    /// `None` for a bodyless declaration
    pub body: Option<Block>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub location: SourceLocation,
}

/// Field-less enum; variants are numbered from zero in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub variants: Vec<String>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstDecl {
    pub symbol: Symbol,
    pub ty: Type,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImplItem {
    Function(FunctionDecl),
    Const(ConstDecl),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplDecl {
    /// Name of the struct or enum the block is attached to
    pub target: String,
    pub items: Vec<ImplItem>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Function(FunctionDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Const(ConstDecl),
    Impl(ImplDecl),
}

/// A whole crate root: the ordered top-level items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub items: Vec<Item>,
}
