use cranelift::prelude::EntityRef;
use cranelift_codegen::ir::condcodes::{FloatCC, IntCC};
use cranelift_codegen::ir::{
    self as clif_ir, types, FuncRef, GlobalValue, InstBuilder, StackSlotData, StackSlotKind,
};
use cranelift_frontend::{FunctionBuilder, Variable};
use cranelift_module::{DataId, FuncId, Module as ClifModule};
use std::collections::HashMap;

use crate::{
    block::{BlockId, Terminator},
    codegen::context::CodegenContext,
    function::Function,
    instructions::Instruction,
    module::ExternalFunction,
    types::Type,
    values::{Constant, SlotId, StringId, Value},
    IrError, Result,
};

/// Symbols already declared in the target module.
pub struct Declarations {
    pub functions: HashMap<String, FuncId>,
    pub externals: HashMap<String, ExternalFunction>,
    pub strings: HashMap<StringId, DataId>,
}

/// Per-function translation state: block, slot and value maps plus the
/// callee and data references imported into the function being built.
pub struct FunctionLowering<'m, M: ClifModule> {
    module: &'m mut M,
    decls: &'m Declarations,
    ctx: CodegenContext,
    blocks: HashMap<BlockId, clif_ir::Block>,
    slots: HashMap<SlotId, (Variable, Type)>,
    values: HashMap<Value, clif_ir::Value>,
    callees: HashMap<String, FuncRef>,
    strings: HashMap<StringId, GlobalValue>,
}

impl<'m, M: ClifModule> FunctionLowering<'m, M> {
    pub fn new(module: &'m mut M, decls: &'m Declarations) -> Self {
        let ctx = CodegenContext::for_module(&*module);
        Self {
            module,
            decls,
            ctx,
            blocks: HashMap::new(),
            slots: HashMap::new(),
            values: HashMap::new(),
            callees: HashMap::new(),
            strings: HashMap::new(),
        }
    }

    pub fn lower_function(&mut self, function: &Function, builder: &mut FunctionBuilder) -> Result<()> {
        for block_id in function.body.blocks.keys() {
            self.blocks.insert(*block_id, builder.create_block());
        }

        let entry = self.block(function.entry_block())?;
        builder.append_block_params_for_function_params(entry);

        for (block_id, block) in &function.body.blocks {
            let clif_block = self.block(*block_id)?;
            builder.switch_to_block(clif_block);

            if *block_id == function.entry_block() {
                let params = builder.block_params(clif_block).to_vec();
                for (i, param) in params.into_iter().enumerate() {
                    self.values
                        .insert(Value::Param(crate::values::ParamId(i as u32)), param);
                }
            }

            for inst in &block.instructions {
                self.lower_instruction(inst, builder)?;
            }
            self.lower_terminator(&block.terminator, builder)?;
        }

        builder.seal_all_blocks();
        Ok(())
    }

    fn block(&self, id: BlockId) -> Result<clif_ir::Block> {
        self.blocks
            .get(&id)
            .copied()
            .ok_or_else(|| IrError::InvalidInstruction(format!("unknown block {}", id)))
    }

    fn slot(&self, id: SlotId) -> Result<Variable> {
        self.slots
            .get(&id)
            .map(|(var, _)| *var)
            .ok_or_else(|| IrError::InvalidInstruction(format!("{} used before its alloca", id)))
    }

    fn operand(&mut self, value: &Value, builder: &mut FunctionBuilder) -> Result<clif_ir::Value> {
        match value {
            Value::Temp(_) | Value::Param(_) => self
                .values
                .get(value)
                .copied()
                .ok_or_else(|| IrError::InvalidInstruction(format!("undefined value {}", value))),
            Value::Constant(Constant::I32(v)) => Ok(builder.ins().iconst(types::I32, *v as i64)),
            Value::Constant(Constant::Bool(b)) => Ok(builder.ins().iconst(types::I8, *b as i64)),
            Value::Constant(c @ Constant::F64(_)) => {
                Ok(builder.ins().f64const(c.as_f64().unwrap_or_default()))
            }
            Value::Str(id) => {
                let gv = match self.strings.get(id) {
                    Some(gv) => *gv,
                    None => {
                        let data_id = self.decls.strings.get(id).copied().ok_or_else(|| {
                            IrError::InvalidInstruction(format!("undeclared string {}", id))
                        })?;
                        let gv = self.module.declare_data_in_func(data_id, builder.func);
                        self.strings.insert(*id, gv);
                        gv
                    }
                };
                Ok(builder.ins().global_value(self.ctx.pointer_type(), gv))
            }
        }
    }

    fn define(&mut self, result: &Value, value: clif_ir::Value) {
        self.values.insert(result.clone(), value);
    }

    pub fn lower_instruction(&mut self, inst: &Instruction, builder: &mut FunctionBuilder) -> Result<()> {
        match inst {
            Instruction::Alloca { slot, ty, .. } => {
                let var = Variable::new(slot.0 as usize);
                let clif_ty = self.ctx.get_clif_type(ty)?;
                builder.declare_var(var, clif_ty);
                let zero = zero_value(builder, *ty, clif_ty);
                builder.def_var(var, zero);
                self.slots.insert(*slot, (var, *ty));
            }
            Instruction::Load { result, slot, .. } => {
                let var = self.slot(*slot)?;
                let value = builder.use_var(var);
                self.define(result, value);
            }
            Instruction::Store { slot, value, .. } => {
                let var = self.slot(*slot)?;
                let value = self.operand(value, builder)?;
                builder.def_var(var, value);
            }
            Instruction::Add {
                result,
                left,
                right,
                ty,
            } => {
                let (l, r) = (self.operand(left, builder)?, self.operand(right, builder)?);
                let res = if ty.is_float() {
                    builder.ins().fadd(l, r)
                } else {
                    builder.ins().iadd(l, r)
                };
                self.define(result, res);
            }
            Instruction::Sub {
                result,
                left,
                right,
                ty,
            } => {
                let (l, r) = (self.operand(left, builder)?, self.operand(right, builder)?);
                let res = if ty.is_float() {
                    builder.ins().fsub(l, r)
                } else {
                    builder.ins().isub(l, r)
                };
                self.define(result, res);
            }
            Instruction::Mul {
                result,
                left,
                right,
                ty,
            } => {
                let (l, r) = (self.operand(left, builder)?, self.operand(right, builder)?);
                let res = if ty.is_float() {
                    builder.ins().fmul(l, r)
                } else {
                    builder.ins().imul(l, r)
                };
                self.define(result, res);
            }
            Instruction::Div {
                result,
                left,
                right,
                ty,
            } => {
                let (l, r) = (self.operand(left, builder)?, self.operand(right, builder)?);
                let res = if ty.is_float() {
                    builder.ins().fdiv(l, r)
                } else {
                    builder.ins().sdiv(l, r)
                };
                self.define(result, res);
            }
            Instruction::Neg {
                result,
                operand,
                ty,
            } => {
                let v = self.operand(operand, builder)?;
                let res = if ty.is_float() {
                    builder.ins().fneg(v)
                } else {
                    builder.ins().ineg(v)
                };
                self.define(result, res);
            }
            Instruction::Eq { result, left, right, ty } => {
                self.compare(IntCC::Equal, FloatCC::Equal, result, left, right, *ty, builder)?
            }
            Instruction::Ne { result, left, right, ty } => self.compare(
                IntCC::NotEqual,
                FloatCC::OrderedNotEqual,
                result,
                left,
                right,
                *ty,
                builder,
            )?,
            Instruction::Lt { result, left, right, ty } => self.compare(
                IntCC::SignedLessThan,
                FloatCC::LessThan,
                result,
                left,
                right,
                *ty,
                builder,
            )?,
            Instruction::Gt { result, left, right, ty } => self.compare(
                IntCC::SignedGreaterThan,
                FloatCC::GreaterThan,
                result,
                left,
                right,
                *ty,
                builder,
            )?,
            Instruction::Le { result, left, right, ty } => self.compare(
                IntCC::SignedLessThanOrEqual,
                FloatCC::LessThanOrEqual,
                result,
                left,
                right,
                *ty,
                builder,
            )?,
            Instruction::Ge { result, left, right, ty } => self.compare(
                IntCC::SignedGreaterThanOrEqual,
                FloatCC::GreaterThanOrEqual,
                result,
                left,
                right,
                *ty,
                builder,
            )?,
            Instruction::Cast {
                result,
                value,
                from,
                to,
            } => {
                let v = self.operand(value, builder)?;
                let res = match (from, to) {
                    (Type::I32, Type::F64) => builder.ins().fcvt_from_sint(types::F64, v),
                    (Type::F64, Type::I32) => builder.ins().fcvt_to_sint_sat(types::I32, v),
                    (Type::Bool, Type::I32) => builder.ins().uextend(types::I32, v),
                    (Type::Bool, Type::F64) => {
                        let wide = builder.ins().uextend(types::I32, v);
                        builder.ins().fcvt_from_sint(types::F64, wide)
                    }
                    (from, to) if from == to => v,
                    (from, to) => {
                        return Err(IrError::InvalidInstruction(format!(
                            "unsupported cast from {} to {}",
                            from, to
                        )))
                    }
                };
                self.define(result, res);
            }
            Instruction::Call {
                result,
                callee,
                args,
                ..
            } => {
                let func_ref = self.callee(callee, builder)?;
                let variadic_from = self
                    .decls
                    .externals
                    .get(callee)
                    .filter(|external| external.is_variadic)
                    .map(ExternalFunction::fixed_arity);
                let call_args = match variadic_from {
                    Some(fixed) => self.variadic_args(args, fixed, builder)?,
                    None => args
                        .iter()
                        .map(|arg| self.operand(arg, builder))
                        .collect::<Result<Vec<_>>>()?,
                };

                let call = builder.ins().call(func_ref, &call_args);
                if let Some(result) = result {
                    let value = builder
                        .inst_results(call)
                        .first()
                        .copied()
                        .ok_or_else(|| {
                            IrError::InvalidInstruction(format!("`{}` returns no value", callee))
                        })?;
                    self.define(result, value);
                }
            }
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn compare(
        &mut self,
        int_cc: IntCC,
        float_cc: FloatCC,
        result: &Value,
        left: &Value,
        right: &Value,
        ty: Type,
        builder: &mut FunctionBuilder,
    ) -> Result<()> {
        let (l, r) = (self.operand(left, builder)?, self.operand(right, builder)?);
        let res = match ty {
            Type::F64 => builder.ins().fcmp(float_cc, l, r),
            Type::I32 | Type::Bool => builder.ins().icmp(int_cc, l, r),
            other => {
                return Err(IrError::InvalidInstruction(format!(
                    "cannot compare values of type {}",
                    other
                )))
            }
        };
        self.define(result, res);
        Ok(())
    }

    fn callee(&mut self, name: &str, builder: &mut FunctionBuilder) -> Result<FuncRef> {
        if let Some(func_ref) = self.callees.get(name) {
            return Ok(*func_ref);
        }

        let func_id = self
            .decls
            .functions
            .get(name)
            .copied()
            .ok_or_else(|| IrError::UnknownFunction(name.to_string()))?;
        let func_ref = self.module.declare_func_in_func(func_id, builder.func);
        self.callees.insert(name.to_string(), func_ref);
        Ok(func_ref)
    }

    /// Spills the trailing arguments into 8-byte stack cells.
    fn variadic_args(
        &mut self,
        args: &[Value],
        fixed: usize,
        builder: &mut FunctionBuilder,
    ) -> Result<Vec<clif_ir::Value>> {
        if args.len() < fixed {
            return Err(IrError::InvalidInstruction(format!(
                "variadic call needs at least {} arguments",
                fixed
            )));
        }

        let (head, tail) = args.split_at(fixed);
        let mut call_args = head
            .iter()
            .map(|arg| self.operand(arg, builder))
            .collect::<Result<Vec<_>>>()?;

        let cells = tail.len().max(1) as u32;
        let slot = builder.create_sized_stack_slot(StackSlotData::new(
            StackSlotKind::ExplicitSlot,
            cells * 8,
            3,
        ));

        for (i, arg) in tail.iter().enumerate() {
            let value = self.operand(arg, builder)?;
            let cell = match builder.func.dfg.value_type(value) {
                types::I32 => builder.ins().sextend(types::I64, value),
                types::I8 => builder.ins().uextend(types::I64, value),
                _ => value,
            };
            builder.ins().stack_store(cell, slot, (i * 8) as i32);
        }

        let base = builder.ins().stack_addr(self.ctx.pointer_type(), slot, 0);
        let count = builder.ins().iconst(types::I32, tail.len() as i64);
        call_args.push(base);
        call_args.push(count);
        Ok(call_args)
    }

    pub fn lower_terminator(&mut self, term: &Terminator, builder: &mut FunctionBuilder) -> Result<()> {
        match term {
            Terminator::Jump(target) => {
                let block = self.block(*target)?;
                builder.ins().jump(block, &[]);
            }
            Terminator::Branch {
                condition,
                then_block,
                else_block,
            } => {
                let cond = self.operand(condition, builder)?;
                let then_dest = self.block(*then_block)?;
                let else_dest = self.block(*else_block)?;
                builder.ins().brif(cond, then_dest, &[], else_dest, &[]);
            }
            Terminator::Return(Some(value)) => {
                let val = self.operand(value, builder)?;
                builder.ins().return_(&[val]);
            }
            Terminator::Return(None) => {
                builder.ins().return_(&[]);
            }
            Terminator::Invalid => {
                return Err(IrError::InvalidInstruction(
                    "cannot lower an unterminated block".into(),
                ))
            }
        }

        Ok(())
    }
}

fn zero_value(builder: &mut FunctionBuilder, ty: Type, clif_ty: clif_ir::Type) -> clif_ir::Value {
    match ty {
        Type::F64 => builder.ins().f64const(0.0),
        _ => builder.ins().iconst(clif_ty, 0),
    }
}
