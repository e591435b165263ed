use super::context::EmissionContext;
use super::errors::TransformError;
use crate::ast::{Block, Expr, Type};
use tarn_core::{block::BlockId, Type as IrType, Value};

pub const THEN: &str = "then";
pub const ELSE: &str = "else";
pub const IF_CONT: &str = "ifcont";
pub const LOOP_COND: &str = "loop.cond";
pub const LOOP_BODY: &str = "loop.body";
pub const LOOP_EXIT: &str = "loop.exit";

impl EmissionContext<'_> {
    /// Lowers a condition to an IR boolean: comparisons are used as they
    /// are, numbers are tested against zero.
    pub(crate) fn condition_test(&mut self, cond: &Expr, role: &str) -> Result<Value, TransformError> {
        let typed = self.lower_value(cond, role)?;
        if typed.repr == IrType::Bool {
            return Ok(typed.value);
        }

        match typed.ty {
            Type::Int32 => Ok(self.ins()?.ne(typed.value, Value::int(0), IrType::I32)),
            Type::Float64 => Ok(self.ins()?.ne(typed.value, Value::float(0.0), IrType::F64)),
            ty => Err(TransformError::InvalidOperand {
                op: role.to_string(),
                ty,
            }),
        }
    }

    /// Emits then, else and merge blocks, the else block even when the
    /// statement has no else branch. Emission resumes in the merge block.
    pub fn lower_if(
        &mut self,
        cond: &Expr,
        then_block: &Block,
        else_block: Option<&Block>,
    ) -> Result<(), TransformError> {
        let test = self.condition_test(cond, "if condition")?;

        let builder = self.builder()?;
        let then_id = builder.create_block(THEN);
        let else_id = builder.create_block(ELSE);
        let merge_id = builder.create_block(IF_CONT);
        self.ins()?.branch(test, then_id, else_id)?;

        self.builder()?.switch_to_block(then_id)?;
        self.lower_block(then_block)?;
        self.fall_through(merge_id)?;

        self.builder()?.switch_to_block(else_id)?;
        if let Some(else_block) = else_block {
            self.lower_block(else_block)?;
        }
        self.fall_through(merge_id)?;

        self.builder()?.switch_to_block(merge_id)?;
        Ok(())
    }

    /// Init expressions run in the current block; the condition, body and
    /// exit get blocks of their own. Emission resumes in the exit block.
    pub fn lower_for(
        &mut self,
        init: &[Expr],
        cond: &Expr,
        post: &[Expr],
        body: &Block,
    ) -> Result<(), TransformError> {
        for expr in init {
            self.lower_expr(expr)?;
        }

        let builder = self.builder()?;
        let cond_id = builder.create_block(LOOP_COND);
        let body_id = builder.create_block(LOOP_BODY);
        let exit_id = builder.create_block(LOOP_EXIT);
        self.ins()?.jump(cond_id)?;

        self.builder()?.switch_to_block(cond_id)?;
        let test = self.condition_test(cond, "for condition")?;
        self.ins()?.branch(test, body_id, exit_id)?;

        self.builder()?.switch_to_block(body_id)?;
        self.lower_block(body)?;
        for expr in post {
            self.lower_expr(expr)?;
        }
        self.fall_through(cond_id)?;

        self.builder()?.switch_to_block(exit_id)?;
        Ok(())
    }

    fn fall_through(&mut self, target: BlockId) -> Result<(), TransformError> {
        if !self.builder()?.is_terminated() {
            self.ins()?.jump(target)?;
        }
        Ok(())
    }
}
