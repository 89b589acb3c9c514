//! Control flow lowering (blocks, if, loop, while, break, continue, return)
//!
//! Expression-valued constructs merge their values with phi nodes. A phi
//! only receives an edge from a predecessor that actually branches to the
//! merge block with a value.

use log::trace;
use rxc_common::SourceLocation;

use super::lower_statement;
use crate::ast::{Block, Expr, Item, Stmt};
use crate::codegen::context::LoopFrame;
use crate::codegen::items::lower_nested_item;
use crate::codegen::{CodegenError, IrGenerator};
use crate::ir::{BlockLabel, IrType, Value};

/// Lower a block. Its value is the tail expression, else the value of the
/// last statement. Lowering stops at the first statement that terminates
/// the current basic block; items declared after it are still emitted.
pub fn lower_block(gen: &mut IrGenerator, block: &Block) -> Result<Option<Value>, CodegenError> {
    let items: Vec<&Item> = block
        .stmts
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Item(item) => Some(item),
            _ => None,
        })
        .collect();

    gen.with_block_items(&items, |gen| {
        let mut last = None;
        for (i, stmt) in block.stmts.iter().enumerate() {
            last = lower_statement(gen, stmt)?;
            if gen.builder.current_block_has_terminator() {
                for stmt in &block.stmts[i + 1..] {
                    if let Stmt::Item(item) = stmt {
                        lower_nested_item(gen, item)?;
                    }
                }
                return Ok(None);
            }
        }
        match &block.tail {
            Some(tail) => gen.lower_expr(tail),
            None => Ok(last),
        }
    })
}

pub fn lower_if(
    gen: &mut IrGenerator,
    cond: &Expr,
    then_branch: &Block,
    else_branch: Option<&Expr>,
    expr: &Expr,
) -> Result<Option<Value>, CodegenError> {
    let condition = gen.lower_value(cond)?;

    let then_bb = gen.builder.create_block("if.then")?;
    let else_bb = gen.builder.create_block("if.else")?;
    let merge_bb = gen.builder.create_block("if.merge")?;
    gen.builder.build_branch_cond(condition, then_bb, else_bb)?;

    gen.builder.switch_to(then_bb);
    let then_value = lower_block(gen, then_branch)?;
    let then_end = close_branch(gen, merge_bb, &expr.location)?;

    gen.builder.switch_to(else_bb);
    let else_value = match else_branch {
        Some(else_expr) => gen.lower_expr(else_expr)?,
        None => None,
    };
    let else_end = close_branch(gen, merge_bb, &expr.location)?;

    gen.builder.switch_to(merge_bb);

    let result_type = gen.convert_type(&expr.ty, &expr.location)?;
    if result_type.is_void() {
        return Ok(None);
    }
    let incoming: Vec<(Value, BlockLabel)> = [(then_value, then_end), (else_value, else_end)]
        .into_iter()
        .filter_map(|(value, end)| value.map(|v| (v, end)))
        .filter(|(_, end)| gen.builder.branches_to(*end, merge_bb))
        .collect();
    if incoming.is_empty() {
        return Ok(None);
    }
    trace!("if.merge phi with {} incoming edges", incoming.len());
    Ok(Some(gen.builder.build_phi(result_type, incoming)?))
}

/// Branch to `merge` unless the branch already terminated; returns the
/// block the branch ended in
fn close_branch(gen: &mut IrGenerator, merge: BlockLabel, location: &SourceLocation) -> Result<BlockLabel, CodegenError> {
    let end = gen.current_label(location)?;
    if !gen.builder.current_block_has_terminator() {
        gen.builder.build_branch(merge)?;
    }
    Ok(end)
}

/// `loop { body }`
pub fn lower_loop(gen: &mut IrGenerator, body: &Block, expr: &Expr) -> Result<Option<Value>, CodegenError> {
    let (header, body_bb, exit) = create_loop_blocks(gen)?;
    gen.builder.build_branch(header)?;

    gen.builder.switch_to(header);
    gen.builder.build_branch(body_bb)?;

    lower_loop_body(gen, header, body_bb, exit, body, expr)
}

/// `while cond { body }`; the condition is evaluated in the header
pub fn lower_while(gen: &mut IrGenerator, cond: &Expr, body: &Block, expr: &Expr) -> Result<Option<Value>, CodegenError> {
    let (header, body_bb, exit) = create_loop_blocks(gen)?;
    gen.builder.build_branch(header)?;

    gen.builder.switch_to(header);
    let condition = gen.lower_value(cond)?;
    gen.builder.build_branch_cond(condition, body_bb, exit)?;

    lower_loop_body(gen, header, body_bb, exit, body, expr)
}

fn create_loop_blocks(gen: &mut IrGenerator) -> Result<(BlockLabel, BlockLabel, BlockLabel), CodegenError> {
    let header = gen.builder.create_block("loop.header")?;
    let body = gen.builder.create_block("loop.body")?;
    let exit = gen.builder.create_block("loop.exit")?;
    Ok((header, body, exit))
}

fn lower_loop_body(
    gen: &mut IrGenerator,
    header: BlockLabel,
    body_bb: BlockLabel,
    exit: BlockLabel,
    body: &Block,
    expr: &Expr,
) -> Result<Option<Value>, CodegenError> {
    let result_type = gen.convert_type(&expr.ty, &expr.location)?;
    let frame = LoopFrame::new(header, exit, Some(result_type).filter(|ty| !ty.is_void()));

    gen.builder.switch_to(body_bb);
    let ((), frame) = gen.with_loop(frame, |gen| {
        lower_block(gen, body)?;
        if !gen.builder.current_block_has_terminator() {
            gen.builder.build_branch(header)?;
        }
        Ok(())
    })?;

    gen.builder.switch_to(exit);
    match frame.result_type {
        Some(ty) if !frame.breaks.is_empty() => {
            trace!("loop.exit phi with {} incoming edges", frame.breaks.len());
            Ok(Some(gen.builder.build_phi(ty, frame.breaks)?))
        }
        _ => Ok(None),
    }
}

pub fn lower_break(gen: &mut IrGenerator, value: Option<&Expr>, location: &SourceLocation) -> Result<Option<Value>, CodegenError> {
    if gen.loops.is_empty() {
        return Err(CodegenError::BreakOutsideLoop {
            location: location.clone(),
        });
    }
    let value = match value {
        Some(expr) => gen.lower_expr(expr)?,
        None => None,
    };
    if gen.builder.current_block_has_terminator() {
        return Ok(None);
    }
    let from = gen.current_label(location)?;
    let frame = gen.loops.last_mut().ok_or_else(|| CodegenError::BreakOutsideLoop {
        location: location.clone(),
    })?;
    if let Some(value) = value {
        frame.breaks.push((value, from));
    }
    let exit = frame.exit;
    gen.builder.build_branch(exit)?;
    Ok(None)
}

pub fn lower_continue(gen: &mut IrGenerator, location: &SourceLocation) -> Result<Option<Value>, CodegenError> {
    let header = gen
        .loops
        .last()
        .map(|frame| frame.header)
        .ok_or_else(|| CodegenError::ContinueOutsideLoop {
            location: location.clone(),
        })?;
    gen.builder.build_branch(header)?;
    Ok(None)
}

pub fn lower_return(gen: &mut IrGenerator, value: Option<&Expr>, location: &SourceLocation) -> Result<Option<Value>, CodegenError> {
    let value = match value {
        Some(expr) => gen.lower_expr(expr)?.map(|v| (v, expr.ty.is_signed())),
        None => None,
    };
    if gen.builder.current_block_has_terminator() {
        return Ok(None);
    }
    let return_type = gen.builder.return_type().cloned().unwrap_or(IrType::Void);
    let value = match value {
        Some((value, signed)) if !return_type.is_void() => {
            Some(gen.coerce_int(value, &return_type, signed, location)?)
        }
        _ => None,
    };
    gen.builder.build_return(value)?;
    Ok(None)
}
