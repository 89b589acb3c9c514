//! Arithmetic, comparison, short-circuit and negation lowering

use log::trace;

use crate::ast::{ArithOp, CompareOp, Expr, LazyOp};
use crate::codegen::{CodegenError, IrGenerator};
use crate::ir::{CmpPredicate, IrBinaryOp, IrType, Value};

/// Opcode for `op`; `signed` selects sdiv/udiv, srem/urem, ashr/lshr
pub(crate) fn arith_opcode(op: ArithOp, signed: bool) -> IrBinaryOp {
    match op {
        ArithOp::Add => IrBinaryOp::Add,
        ArithOp::Sub => IrBinaryOp::Sub,
        ArithOp::Mul => IrBinaryOp::Mul,
        ArithOp::Div if signed => IrBinaryOp::SDiv,
        ArithOp::Div => IrBinaryOp::UDiv,
        ArithOp::Rem if signed => IrBinaryOp::SRem,
        ArithOp::Rem => IrBinaryOp::URem,
        ArithOp::BitAnd => IrBinaryOp::And,
        ArithOp::BitOr => IrBinaryOp::Or,
        ArithOp::BitXor => IrBinaryOp::Xor,
        ArithOp::Shl => IrBinaryOp::Shl,
        ArithOp::Shr if signed => IrBinaryOp::AShr,
        ArithOp::Shr => IrBinaryOp::LShr,
    }
}

pub(crate) fn compare_predicate(op: CompareOp, signed: bool) -> CmpPredicate {
    match (op, signed) {
        (CompareOp::Eq, _) => CmpPredicate::Eq,
        (CompareOp::Ne, _) => CmpPredicate::Ne,
        (CompareOp::Lt, true) => CmpPredicate::Slt,
        (CompareOp::Lt, false) => CmpPredicate::Ult,
        (CompareOp::Le, true) => CmpPredicate::Sle,
        (CompareOp::Le, false) => CmpPredicate::Ule,
        (CompareOp::Gt, true) => CmpPredicate::Sgt,
        (CompareOp::Gt, false) => CmpPredicate::Ugt,
        (CompareOp::Ge, true) => CmpPredicate::Sge,
        (CompareOp::Ge, false) => CmpPredicate::Uge,
    }
}

pub fn lower_arith(gen: &mut IrGenerator, op: ArithOp, lhs: &Expr, rhs: &Expr, expr: &Expr) -> Result<Value, CodegenError> {
    let left = gen.lower_value(lhs)?;
    let right = gen.lower_value(rhs)?;
    let (left, right) = match op {
        // The shift amount follows the shifted operand
        ArithOp::Shl | ArithOp::Shr => {
            let target = left.ty().clone();
            let right = gen.coerce(right, &target, rhs.ty.is_signed(), &expr.location)?;
            (left, right)
        }
        _ => gen.coerce_to_common(
            (left, lhs.ty.is_signed()),
            (right, rhs.ty.is_signed()),
            &expr.location,
        )?,
    };
    let opcode = arith_opcode(op, lhs.ty.is_signed());
    Ok(gen.builder.build_binary(opcode, left, right)?)
}

pub fn lower_compare(gen: &mut IrGenerator, op: CompareOp, lhs: &Expr, rhs: &Expr, expr: &Expr) -> Result<Value, CodegenError> {
    let left = gen.lower_value(lhs)?;
    let right = gen.lower_value(rhs)?;
    let (left, right) = gen.coerce_to_common(
        (left, lhs.ty.is_signed()),
        (right, rhs.ty.is_signed()),
        &expr.location,
    )?;
    let pred = compare_predicate(op, lhs.ty.is_signed());
    Ok(gen.builder.build_cmp(pred, left, right)?)
}

/// `a && b` / `a || b` as control flow: `b` is only evaluated in its own
/// block, and the merge phi takes the short-circuit constant from the
/// block that evaluated `a`.
pub fn lower_lazy(gen: &mut IrGenerator, op: LazyOp, lhs: &Expr, rhs: &Expr, expr: &Expr) -> Result<Value, CodegenError> {
    let left = gen.lower_value(lhs)?;
    let left_end = gen.current_label(&expr.location)?;

    let right_bb = gen.builder.create_block("lazy.right")?;
    let merge_bb = gen.builder.create_block("lazy.merge")?;
    let short_circuit = match op {
        LazyOp::And => {
            gen.builder.build_branch_cond(left, right_bb, merge_bb)?;
            false
        }
        LazyOp::Or => {
            gen.builder.build_branch_cond(left, merge_bb, right_bb)?;
            true
        }
    };
    let mut incoming = vec![(Value::bool(short_circuit), left_end)];

    gen.builder.switch_to(right_bb);
    let right = gen.lower_expr(rhs)?;
    let right_end = gen.current_label(&expr.location)?;
    if !gen.builder.current_block_has_terminator() {
        let right = right.ok_or_else(|| CodegenError::MissingValue {
            ty: rhs.ty.clone(),
            location: rhs.location.clone(),
        })?;
        gen.builder.build_branch(merge_bb)?;
        incoming.push((right, right_end));
    }

    gen.builder.switch_to(merge_bb);
    trace!("lazy.merge phi with {} incoming edges", incoming.len());
    Ok(gen.builder.build_phi(IrType::I1, incoming)?)
}

/// `!e` is xor with all ones (`true` for booleans); `-e` is `0 - e`
pub fn lower_negate(gen: &mut IrGenerator, operand: &Expr, logical: bool, expr: &Expr) -> Result<Value, CodegenError> {
    let value = gen.lower_value(operand)?;
    let ty = value.ty().clone();
    if !ty.is_integer() {
        return Err(CodegenError::UnsupportedConstruct {
            construct: format!("negation of {ty}"),
            location: expr.location.clone(),
        });
    }
    let result = if logical {
        let mask = if ty == IrType::I1 { Value::bool(true) } else { Value::constant(ty, -1) };
        gen.builder.build_binary(IrBinaryOp::Xor, value, mask)?
    } else {
        gen.builder.build_binary(IrBinaryOp::Sub, Value::constant(ty, 0), value)?
    };
    Ok(result)
}
