//! Expression nodes

use rxc_common::SourceLocation;
use serde::{Deserialize, Serialize};

use super::{Block, Symbol, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Short-circuit boolean operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LazyOp {
    And,
    Or,
}

/// Explicit type suffix on an integer literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IntSuffix {
    #[default]
    None,
    I32,
    U32,
    Isize,
    Usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int {
        value: i64,
        #[serde(default)]
        suffix: IntSuffix,
    },
    Bool(bool),
    Char(char),
    Str(String),
    CStr(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    Path(Symbol),
    Arith {
        op: ArithOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Lazy {
        op: LazyOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    CompoundAssign {
        op: ArithOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    Field {
        base: Box<Expr>,
        field: String,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    ArrayList(Vec<Expr>),
    ArrayRepeat {
        element: Box<Expr>,
        count: u64,
    },
    StructLit {
        name: String,
        fields: Vec<(String, Expr)>,
    },
    /// `&e`, `&mut e`, and `&&e` when `double` is set
    Borrow {
        inner: Box<Expr>,
        #[serde(default)]
        mutable: bool,
        #[serde(default)]
        double: bool,
    },
    Deref(Box<Expr>),
    /// `!e` when `logical`, `-e` otherwise
    Negate {
        operand: Box<Expr>,
        logical: bool,
    },
    Cast {
        operand: Box<Expr>,
        target: Type,
    },
    Block(Block),
    If {
        cond: Box<Expr>,
        then_branch: Block,
        else_branch: Option<Box<Expr>>,
    },
    Loop(Block),
    While {
        cond: Box<Expr>,
        body: Block,
    },
    Break(Option<Box<Expr>>),
    Continue,
    Return(Option<Box<Expr>>),
    /// `_` in expression position
    Underscore,
}

/// An expression with its resolved static type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    #[serde(default)]
    pub location: SourceLocation,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type) -> Self {
        Self {
            kind,
            ty,
            location: SourceLocation::dummy(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Unsuffixed integer literal of type `i32`
    pub fn int(value: i64) -> Self {
        Self::typed_int(value, Type::I32)
    }

    /// Unsuffixed integer literal the type checker resolved to `ty`
    pub fn typed_int(value: i64, ty: Type) -> Self {
        Self::new(
            ExprKind::Literal(Literal::Int {
                value,
                suffix: IntSuffix::None,
            }),
            ty,
        )
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ExprKind::Literal(Literal::Bool(value)), Type::Bool)
    }

    pub fn path(symbol: &Symbol) -> Self {
        Self::new(ExprKind::Path(symbol.clone()), symbol.ty.clone())
    }

    pub fn block(block: Block, ty: Type) -> Self {
        Self::new(ExprKind::Block(block), ty)
    }

    pub fn unit(kind: ExprKind) -> Self {
        Self::new(kind, Type::Unit)
    }
}
