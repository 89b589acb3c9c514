//! IR Builder
//!
//! Provides utilities for constructing IR programmatically. The builder
//! owns the function under construction and an insertion point; creating
//! a block never moves the insertion point, `switch_to` does.

use log::trace;
use rxc_common::{LabelId, RegId};

use crate::ir::{
    BasicBlock, BlockLabel, Callee, CastOp, CmpPredicate, Function, Instruction, IrBinaryOp,
    IrType, Register, Value,
};

/// Builder for constructing IR
#[derive(Debug, Default)]
pub struct IrBuilder {
    current_function: Option<Function>,
    current_block: Option<BlockLabel>,
    next_reg_id: RegId,
    next_label_id: LabelId,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_register(&mut self, ty: IrType, hint: Option<&str>) -> Register {
        let id = self.next_reg_id;
        self.next_reg_id += 1;
        Register {
            id,
            ty,
            hint: hint.map(str::to_string),
        }
    }

    pub fn new_label(&mut self, hint: &'static str) -> BlockLabel {
        let id = self.next_label_id;
        self.next_label_id += 1;
        BlockLabel { id, hint }
    }

    /// Start a new function. Register and label numbering restart at zero.
    pub fn create_function(&mut self, name: String, return_type: IrType) {
        self.current_function = Some(Function::new(name, return_type));
        self.current_block = None;
        self.next_reg_id = 0;
        self.next_label_id = 0;
    }

    /// Add a parameter register to the current function
    pub fn add_parameter(&mut self, ty: IrType, name: &str) -> Result<Register, String> {
        let reg = self.new_register(ty, Some(name));
        self.function_mut()?.add_parameter(reg.clone());
        Ok(reg)
    }

    /// Append a fresh, empty block to the current function
    pub fn create_block(&mut self, hint: &'static str) -> Result<BlockLabel, String> {
        let label = self.new_label(hint);
        trace!("Creating block {label}");
        self.function_mut()?.add_block(BasicBlock::new(label));
        Ok(label)
    }

    /// Move the insertion point to `label`
    pub fn switch_to(&mut self, label: BlockLabel) {
        self.current_block = Some(label);
    }

    pub fn current_block(&self) -> Option<BlockLabel> {
        self.current_block
    }

    pub fn return_type(&self) -> Option<&IrType> {
        self.current_function.as_ref().map(|f| &f.return_type)
    }

    pub fn get_block(&self, label: BlockLabel) -> Option<&BasicBlock> {
        self.current_function.as_ref()?.get_block(label.id)
    }

    pub fn current_block_has_terminator(&self) -> bool {
        self.current_block
            .and_then(|label| self.get_block(label))
            .is_some_and(BasicBlock::has_terminator)
    }

    /// Whether `from` currently ends in an unconditional branch to `to`
    pub fn branches_to(&self, from: BlockLabel, to: BlockLabel) -> bool {
        matches!(
            self.get_block(from).and_then(BasicBlock::terminator),
            Some(Instruction::Branch(target)) if *target == to
        )
    }

    pub fn build_alloca(&mut self, alloc_type: IrType, hint: Option<&str>) -> Result<Value, String> {
        let result = self.new_register(alloc_type.clone().ptr_to(), hint);
        self.add_instruction(Instruction::Alloca { result: result.clone(), alloc_type })?;
        Ok(result.into())
    }

    pub fn build_load(&mut self, ptr: Value) -> Result<Value, String> {
        let Some(pointee) = ptr.ty().pointee().cloned() else {
            return Err(format!("load through non-pointer value {}", ptr.typed()));
        };
        let result = self.new_register(pointee, None);
        self.add_instruction(Instruction::Load { result: result.clone(), ptr })?;
        Ok(result.into())
    }

    pub fn build_store(&mut self, value: Value, ptr: Value) -> Result<(), String> {
        if !ptr.ty().is_pointer() {
            return Err(format!("store through non-pointer value {}", ptr.typed()));
        }
        self.add_instruction(Instruction::Store { value, ptr })
    }

    /// Binary operation; the result has the type of `lhs`
    pub fn build_binary(&mut self, op: IrBinaryOp, lhs: Value, rhs: Value) -> Result<Value, String> {
        let result = self.new_register(lhs.ty().clone(), None);
        self.add_instruction(Instruction::Binary { result: result.clone(), op, lhs, rhs })?;
        Ok(result.into())
    }

    pub fn build_cmp(&mut self, pred: CmpPredicate, lhs: Value, rhs: Value) -> Result<Value, String> {
        let result = self.new_register(IrType::I1, None);
        self.add_instruction(Instruction::Cmp { result: result.clone(), pred, lhs, rhs })?;
        Ok(result.into())
    }

    pub fn build_cast(&mut self, op: CastOp, value: Value, target: IrType) -> Result<Value, String> {
        let result = self.new_register(target, None);
        self.add_instruction(Instruction::Cast { result: result.clone(), op, value })?;
        Ok(result.into())
    }

    /// Address of a field or element. `element_type` is the type of the
    /// addressed object; the result is a pointer to it.
    pub fn build_gep(&mut self, ptr: Value, indices: Vec<Value>, element_type: IrType) -> Result<Value, String> {
        if !ptr.ty().is_pointer() {
            return Err(format!("getelementptr on non-pointer value {}", ptr.typed()));
        }
        let result = self.new_register(element_type.ptr_to(), None);
        self.add_instruction(Instruction::GetElementPtr { result: result.clone(), ptr, indices })?;
        Ok(result.into())
    }

    /// Call; returns the result value unless the callee returns void
    pub fn build_call(&mut self, callee: Callee, args: Vec<Value>, return_type: IrType) -> Result<Option<Value>, String> {
        let result = if return_type.is_void() {
            None
        } else {
            Some(self.new_register(return_type.clone(), None))
        };
        self.add_instruction(Instruction::Call { result: result.clone(), callee, args, return_type })?;
        Ok(result.map(Value::from))
    }

    pub fn build_phi(&mut self, ty: IrType, incoming: Vec<(Value, BlockLabel)>) -> Result<Value, String> {
        let result = self.new_register(ty, None);
        self.add_instruction(Instruction::Phi { result: result.clone(), incoming })?;
        Ok(result.into())
    }

    pub fn build_return(&mut self, value: Option<Value>) -> Result<(), String> {
        self.add_instruction(Instruction::Return(value))
    }

    pub fn build_branch(&mut self, label: BlockLabel) -> Result<(), String> {
        self.add_instruction(Instruction::Branch(label))
    }

    pub fn build_branch_cond(&mut self, condition: Value, true_label: BlockLabel, false_label: BlockLabel) -> Result<(), String> {
        self.add_instruction(Instruction::BranchCond { condition, true_label, false_label })
    }

    fn function_mut(&mut self) -> Result<&mut Function, String> {
        self.current_function
            .as_mut()
            .ok_or_else(|| "No current function".to_string())
    }

    fn add_instruction(&mut self, instr: Instruction) -> Result<(), String> {
        let label = self.current_block.ok_or_else(|| "No current block".to_string())?;
        let successors = instr.successors();
        let function = self.function_mut()?;
        let block = function
            .get_block_mut(label.id)
            .ok_or_else(|| format!("Current block '{label}' not found"))?;
        block.add_instruction(instr)?;
        block.successors.extend(successors.iter().map(|s| s.id));
        for succ in successors {
            let target = function
                .get_block_mut(succ.id)
                .ok_or_else(|| format!("Branch to unknown block '{succ}'"))?;
            if !target.predecessors.contains(&label.id) {
                target.predecessors.push(label.id);
            }
        }
        Ok(())
    }

    /// Take the finished function, leaving the builder empty
    pub fn finish_function(&mut self) -> Option<Function> {
        self.current_block = None;
        self.current_function.take()
    }
}
