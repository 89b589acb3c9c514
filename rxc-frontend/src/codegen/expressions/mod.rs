//! Expression lowering
//!
//! `lower_expr` dispatches on the expression kind. Each lowering returns
//! the produced value, or `None` for unit-valued and control-transferring
//! expressions.

mod literals;
mod paths;
mod operators;
mod casts;
mod places;
mod calls;
mod aggregates;

use super::statements::{
    lower_block, lower_break, lower_continue, lower_if, lower_loop, lower_return, lower_while,
};
use super::{CodegenError, IrGenerator};
use crate::ast::{Expr, ExprKind};
use crate::ir::Value;

impl<'a> IrGenerator<'a> {
    /// Lower an expression to its value, if it has one
    pub(super) fn lower_expr(&mut self, expr: &Expr) -> Result<Option<Value>, CodegenError> {
        match &expr.kind {
            ExprKind::Literal(literal) => literals::lower_literal(self, literal, expr).map(Some),

            ExprKind::Path(symbol) if symbol.is_variable() && expr.ty.is_unit_like() => Ok(None),

            ExprKind::Path(symbol) => paths::lower_path(self, symbol, expr).map(Some),

            ExprKind::Arith { op, lhs, rhs } => operators::lower_arith(self, *op, lhs, rhs, expr).map(Some),

            ExprKind::Compare { op, lhs, rhs } => operators::lower_compare(self, *op, lhs, rhs, expr).map(Some),

            ExprKind::Lazy { op, lhs, rhs } => operators::lower_lazy(self, *op, lhs, rhs, expr).map(Some),

            ExprKind::Negate { operand, logical } => {
                operators::lower_negate(self, operand, *logical, expr).map(Some)
            }

            ExprKind::Cast { operand, target } => casts::lower_cast(self, operand, target, expr).map(Some),

            ExprKind::Assign { target, value } => places::lower_assign(self, target, value, expr),

            ExprKind::CompoundAssign { op, target, value } => {
                places::lower_compound_assign(self, *op, target, value, expr)
            }

            ExprKind::Field { .. } | ExprKind::Index { .. } => {
                let address = self.lower_place(expr)?;
                Ok(Some(self.builder.build_load(address)?))
            }

            ExprKind::Borrow { inner, double, .. } => places::lower_borrow(self, inner, *double).map(Some),

            ExprKind::Deref(inner) => places::lower_deref(self, inner, expr).map(Some),

            ExprKind::Call { callee, args } => calls::lower_call(self, callee, args, expr),

            ExprKind::MethodCall { receiver, method, args } => {
                calls::lower_method_call(self, receiver, method, args, expr)
            }

            ExprKind::ArrayList(elements) => aggregates::lower_array_list(self, elements, expr).map(Some),

            ExprKind::ArrayRepeat { element, count } => {
                aggregates::lower_array_repeat(self, element, *count, expr).map(Some)
            }

            ExprKind::StructLit { name, fields } => {
                aggregates::lower_struct_literal(self, name, fields, expr).map(Some)
            }

            ExprKind::Block(block) => lower_block(self, block),

            ExprKind::If { cond, then_branch, else_branch } => {
                lower_if(self, cond, then_branch, else_branch.as_deref(), expr)
            }

            ExprKind::Loop(body) => lower_loop(self, body, expr),

            ExprKind::While { cond, body } => lower_while(self, cond, body, expr),

            ExprKind::Break(value) => lower_break(self, value.as_deref(), &expr.location),

            ExprKind::Continue => lower_continue(self, &expr.location),

            ExprKind::Return(value) => lower_return(self, value.as_deref(), &expr.location),

            ExprKind::Underscore => Err(CodegenError::UnsupportedConstruct {
                construct: "underscore expression".to_string(),
                location: expr.location.clone(),
            }),
        }
    }

    /// Lower an expression that must produce a value
    pub(super) fn lower_value(&mut self, expr: &Expr) -> Result<Value, CodegenError> {
        self.lower_expr(expr)?.ok_or_else(|| CodegenError::MissingValue {
            ty: expr.ty.clone(),
            location: expr.location.clone(),
        })
    }
}
