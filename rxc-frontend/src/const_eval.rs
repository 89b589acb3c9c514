//! Constant evaluation
//!
//! IR generation treats constant folding as a collaborator: `const` items
//! are folded once through a [`ConstEvaluator`] and every use inlines the
//! folded value. [`LiteralEvaluator`] is the stock implementation.

use std::collections::HashMap;

use rxc_common::target::POINTER_BITS;
use rxc_common::SymbolId;
use serde::{Deserialize, Serialize};

use crate::ast::{ArithOp, CompareOp, Expr, ExprKind, LazyOp, Literal, SymbolKind, Type};

/// A folded compile-time value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstValue {
    Int(i64),
    Bool(bool),
    Char(char),
}

impl ConstValue {
    /// Integer payload as the IR sees it
    pub fn as_i64(&self) -> i64 {
        match *self {
            ConstValue::Int(v) => v,
            ConstValue::Bool(b) => i64::from(b),
            ConstValue::Char(c) => i64::from(u32::from(c)),
        }
    }
}

/// Already-folded constants visible to the evaluator
pub trait ConstScope {
    fn lookup(&self, symbol: SymbolId) -> Option<ConstValue>;
}

impl ConstScope for HashMap<SymbolId, ConstValue> {
    fn lookup(&self, symbol: SymbolId) -> Option<ConstValue> {
        self.get(&symbol).copied()
    }
}

/// Folds a const-eligible expression to a value, or `None` when it cannot
pub trait ConstEvaluator {
    fn evaluate(&self, expr: &Expr, scope: &dyn ConstScope) -> Option<ConstValue>;
}

/// Folds literals, operators, casts and references to earlier constants.
/// Arithmetic is checked and the result wrapped to the expression type.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralEvaluator;

impl ConstEvaluator for LiteralEvaluator {
    fn evaluate(&self, expr: &Expr, scope: &dyn ConstScope) -> Option<ConstValue> {
        match &expr.kind {
            ExprKind::Literal(Literal::Int { value, .. }) => {
                Some(ConstValue::Int(wrap_to(*value, &expr.ty)))
            }
            ExprKind::Literal(Literal::Bool(b)) => Some(ConstValue::Bool(*b)),
            ExprKind::Literal(Literal::Char(c)) => Some(ConstValue::Char(*c)),
            ExprKind::Literal(_) => None,

            ExprKind::Path(symbol) if symbol.kind == SymbolKind::Constant => scope.lookup(symbol.id),

            ExprKind::Negate { operand, logical } => {
                match (self.evaluate(operand, scope)?, logical) {
                    (ConstValue::Bool(b), true) => Some(ConstValue::Bool(!b)),
                    (ConstValue::Int(v), true) => Some(ConstValue::Int(wrap_to(!v, &expr.ty))),
                    (ConstValue::Int(v), false) => {
                        Some(ConstValue::Int(wrap_to(v.checked_neg()?, &expr.ty)))
                    }
                    _ => None,
                }
            }

            ExprKind::Arith { op, lhs, rhs } => {
                let l = self.evaluate(lhs, scope)?;
                let r = self.evaluate(rhs, scope)?;
                fold_arith(*op, l, r, &expr.ty)
            }

            ExprKind::Compare { op, lhs, rhs } => {
                let l = self.evaluate(lhs, scope)?.as_i64();
                let r = self.evaluate(rhs, scope)?.as_i64();
                let result = match op {
                    CompareOp::Eq => l == r,
                    CompareOp::Ne => l != r,
                    CompareOp::Lt => l < r,
                    CompareOp::Le => l <= r,
                    CompareOp::Gt => l > r,
                    CompareOp::Ge => l >= r,
                };
                Some(ConstValue::Bool(result))
            }

            ExprKind::Lazy { op, lhs, rhs } => {
                let ConstValue::Bool(l) = self.evaluate(lhs, scope)? else {
                    return None;
                };
                match (op, l) {
                    (LazyOp::And, false) => Some(ConstValue::Bool(false)),
                    (LazyOp::Or, true) => Some(ConstValue::Bool(true)),
                    _ => match self.evaluate(rhs, scope)? {
                        ConstValue::Bool(r) => Some(ConstValue::Bool(r)),
                        _ => None,
                    },
                }
            }

            ExprKind::Cast { operand, target } => {
                let value = self.evaluate(operand, scope)?;
                match (value, target) {
                    (_, t) if t.is_integer() => Some(ConstValue::Int(wrap_to(value.as_i64(), t))),
                    (ConstValue::Bool(b), Type::Bool) => Some(ConstValue::Bool(b)),
                    (ConstValue::Char(c), Type::Char) => Some(ConstValue::Char(c)),
                    _ => None,
                }
            }

            ExprKind::Block(block) if block.stmts.is_empty() => {
                self.evaluate(block.tail.as_deref()?, scope)
            }

            _ => None,
        }
    }
}

fn fold_arith(op: ArithOp, l: ConstValue, r: ConstValue, ty: &Type) -> Option<ConstValue> {
    if let (ConstValue::Bool(a), ConstValue::Bool(b)) = (l, r) {
        return match op {
            ArithOp::BitAnd => Some(ConstValue::Bool(a & b)),
            ArithOp::BitOr => Some(ConstValue::Bool(a | b)),
            ArithOp::BitXor => Some(ConstValue::Bool(a ^ b)),
            _ => None,
        };
    }
    let (a, b) = (l.as_i64(), r.as_i64());
    let bits = int_width(ty);
    let value = match op {
        ArithOp::Add => a.checked_add(b)?,
        ArithOp::Sub => a.checked_sub(b)?,
        ArithOp::Mul => a.checked_mul(b)?,
        ArithOp::Div => a.checked_div(b)?,
        ArithOp::Rem => a.checked_rem(b)?,
        ArithOp::BitAnd => a & b,
        ArithOp::BitOr => a | b,
        ArithOp::BitXor => a ^ b,
        ArithOp::Shl | ArithOp::Shr if !(0..i64::from(bits)).contains(&b) => return None,
        ArithOp::Shl => a << b,
        ArithOp::Shr if ty.is_signed() => a >> b,
        ArithOp::Shr => ((a as u64) >> b) as i64,
    };
    Some(ConstValue::Int(wrap_to(value, ty)))
}

fn int_width(ty: &Type) -> u32 {
    match ty {
        Type::Bool => 1,
        Type::Isize | Type::Usize => POINTER_BITS,
        _ => 32,
    }
}

/// Truncate `value` to the width of `ty`, sign- or zero-extending back
fn wrap_to(value: i64, ty: &Type) -> i64 {
    let bits = int_width(ty);
    if bits >= 64 {
        return value;
    }
    let shift = 64 - bits;
    if ty.is_signed() {
        (value << shift) >> shift
    } else {
        ((value as u64) << shift >> shift) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, Symbol};

    fn arith(op: ArithOp, lhs: Expr, rhs: Expr, ty: Type) -> Expr {
        Expr::new(
            ExprKind::Arith {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
        )
    }

    fn eval(expr: &Expr) -> Option<ConstValue> {
        LiteralEvaluator.evaluate(expr, &HashMap::new())
    }

    #[test]
    fn test_folds_arithmetic() {
        let expr = arith(
            ArithOp::Mul,
            arith(ArithOp::Add, Expr::int(2), Expr::int(3), Type::I32),
            Expr::int(4),
            Type::I32,
        );
        assert_eq!(eval(&expr), Some(ConstValue::Int(20)));
    }

    #[test]
    fn test_division_by_zero_is_not_constant() {
        let expr = arith(ArithOp::Div, Expr::int(1), Expr::int(0), Type::I32);
        assert_eq!(eval(&expr), None);
    }

    #[test]
    fn test_unsigned_wraps() {
        let zero = Expr::typed_int(0, Type::U32);
        let one = Expr::typed_int(1, Type::U32);
        let expr = arith(ArithOp::Sub, zero, one, Type::U32);
        assert_eq!(eval(&expr), Some(ConstValue::Int(0xFFFF_FFFF)));
    }

    #[test]
    fn test_signed_wraps() {
        let expr = arith(ArithOp::Add, Expr::int(i64::from(i32::MAX)), Expr::int(1), Type::I32);
        assert_eq!(eval(&expr), Some(ConstValue::Int(i64::from(i32::MIN))));
    }

    #[test]
    fn test_logical_not_and_compare() {
        let cmp = Expr::new(
            ExprKind::Compare {
                op: CompareOp::Lt,
                lhs: Box::new(Expr::int(1)),
                rhs: Box::new(Expr::int(2)),
            },
            Type::Bool,
        );
        let not = Expr::new(
            ExprKind::Negate {
                operand: Box::new(cmp),
                logical: true,
            },
            Type::Bool,
        );
        assert_eq!(eval(&not), Some(ConstValue::Bool(false)));
    }

    #[test]
    fn test_refers_to_earlier_constant() {
        let limit = Symbol::new(7, "LIMIT", SymbolKind::Constant, Type::I32);
        let mut scope = HashMap::new();
        scope.insert(7, ConstValue::Int(10));
        let expr = arith(ArithOp::Add, Expr::path(&limit), Expr::int(1), Type::I32);
        assert_eq!(
            LiteralEvaluator.evaluate(&expr, &scope),
            Some(ConstValue::Int(11))
        );
    }

    #[test]
    fn test_cast_and_block() {
        let cast = Expr::new(
            ExprKind::Cast {
                operand: Box::new(Expr::new(ExprKind::Literal(Literal::Char('A')), Type::Char)),
                target: Type::U32,
            },
            Type::U32,
        );
        let block = Expr::block(Block::of(cast), Type::U32);
        assert_eq!(eval(&block), Some(ConstValue::Int(65)));
    }

    #[test]
    fn test_strings_are_not_folded() {
        let s = Expr::new(
            ExprKind::Literal(Literal::Str("hi".to_string())),
            Type::reference(Type::Str),
        );
        assert_eq!(eval(&s), None);
    }
}
