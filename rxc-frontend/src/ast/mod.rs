//! Typed AST consumed by IR generation
//!
//! The tree arrives fully resolved: every expression carries its static
//! type and every name reference carries the symbol it resolved to.
//! Lexing, parsing, resolution and type checking happen upstream.

pub mod types;
pub mod symbols;
pub mod expressions;
pub mod statements;

pub use types::Type;
pub use symbols::{Symbol, SymbolKind};
pub use expressions::{ArithOp, CompareOp, Expr, ExprKind, IntSuffix, LazyOp, Literal};
pub use statements::{
    Block, ConstDecl, EnumDecl, FieldDecl, FunctionDecl, ImplDecl, ImplItem, Item, LetPattern,
    Param, Program, SelfParam, Stmt, StructDecl,
};
