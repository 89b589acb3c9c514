//! Basic Block Management
//!
//! Defines basic blocks - sequences of instructions with single entry/exit points.

use rxc_common::LabelId;
use serde::Serialize;
use std::fmt;

use crate::ir::Instruction;

/// Label of a basic block: a per-function id plus a debug hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BlockLabel {
    pub id: LabelId,
    pub hint: &'static str,
}

impl BlockLabel {
    pub const ENTRY_HINT: &'static str = "entry";
}

impl fmt::Display for BlockLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hint == Self::ENTRY_HINT {
            write!(f, "{}", self.hint)
        } else {
            write!(f, "{}.{}", self.hint, self.id)
        }
    }
}

/// Basic Block - a sequence of instructions ending in at most one terminator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicBlock {
    pub label: BlockLabel,
    pub instructions: Vec<Instruction>,
    pub predecessors: Vec<LabelId>,
    pub successors: Vec<LabelId>,
}

impl BasicBlock {
    pub fn new(label: BlockLabel) -> Self {
        Self {
            label,
            instructions: Vec::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }

    pub fn id(&self) -> LabelId {
        self.label.id
    }

    /// Append an instruction. Nothing may follow a terminator.
    pub fn add_instruction(&mut self, instr: Instruction) -> Result<(), String> {
        if self.has_terminator() {
            return Err(format!(
                "instruction '{instr}' emitted after the terminator of block '{}'",
                self.label
            ));
        }
        self.instructions.push(instr);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn has_terminator(&self) -> bool {
        self.instructions.last().is_some_and(Instruction::is_terminator)
    }

    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last().filter(|instr| instr.is_terminator())
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for instr in &self.instructions {
            writeln!(f, "    {instr}")?;
        }
        Ok(())
    }
}
