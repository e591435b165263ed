use super::context::{EmissionContext, FunctionFrame, Storage, Typed};
use super::errors::{Diagnostic, TransformError, TransformResult};
use super::registry::ENTRY_FUNCTION;
use super::type_resolver::coercible;
use crate::ast::{Block, Expr, FunctionDecl, Stmt, Type, VarDecl};
use tarn_core::values::{Constant, Value};
use tracing::{debug, trace};

const TOP_LEVEL: &str = "<top level>";

/// Label of the block emission continues in after a `return`.
pub const AFTER_RETURN: &str = "after.return";

impl EmissionContext<'_> {
    /// Lowers the top-level block into `main() -> int`. Falling off the end
    /// of the program returns 0.
    pub fn lower_entry(&mut self, program: &Block) -> TransformResult<()> {
        let located = |error: TransformError| Diagnostic::new(ENTRY_FUNCTION, TOP_LEVEL, error);

        let mut guard = self
            .enter_function(ENTRY_FUNCTION, &[], Type::Int32)
            .map_err(located)?;
        guard.lower_block(program)?;
        guard.seal_function(None, true).map_err(located)?;
        let frame = guard.finish().map_err(located)?;

        self.install(frame).map_err(located)
    }

    pub fn lower_function(&mut self, decl: &FunctionDecl) -> TransformResult<()> {
        let located = |error: TransformError| Diagnostic::new(&decl.name, decl.header(), error);
        debug!(function = %decl.name, depth = self.depth(), "lowering function");

        let mut guard = self
            .enter_function(&decl.name, &decl.params, decl.returns)
            .map_err(located)?;
        let body = guard.lower_block(&decl.body)?;
        guard.seal_function(body, false).map_err(located)?;
        let frame = guard.finish().map_err(located)?;

        self.install(frame).map_err(located)
    }

    /// Lowers every statement in order. The block's value is the value of
    /// its last statement.
    pub fn lower_block(&mut self, block: &Block) -> TransformResult<Option<Typed>> {
        let mut last = None;
        for stmt in &block.stmts {
            last = self.lower_stmt(stmt)?;
        }
        Ok(last)
    }

    pub fn lower_stmt(&mut self, stmt: &Stmt) -> TransformResult<Option<Typed>> {
        self.stmt_value(stmt)
            .map_err(|error| Diagnostic::new(self.function_name(), stmt.summary(), error))
    }

    fn stmt_value(&mut self, stmt: &Stmt) -> Result<Option<Typed>, TransformError> {
        match stmt {
            Stmt::Expr { expr } => self.lower_expr(expr),
            Stmt::Var(decl) => {
                self.lower_var(decl)?;
                Ok(None)
            }
            Stmt::Function(decl) => {
                self.lower_function(decl)?;
                Ok(None)
            }
            Stmt::Return { value } => {
                self.lower_return(value.as_ref())?;
                Ok(None)
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                self.lower_if(cond, then_block, else_block.as_ref())?;
                Ok(None)
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => {
                self.lower_for(init, cond, post, body)?;
                Ok(None)
            }
        }
    }

    /// The initializer is evaluated before the new binding exists, so it
    /// sees the binding the name had before the declaration.
    fn lower_var(&mut self, decl: &VarDecl) -> Result<(), TransformError> {
        if decl.ty == Type::Void {
            return Err(TransformError::VoidBinding(decl.name.clone()));
        }

        let init = match &decl.init {
            Some(init) => Some(self.lower_value(init, "initializer")?),
            None => None,
        };

        let ty = decl.ty.to_ir();
        let frame = self.frame_mut()?;
        let slot = frame.builder.alloca(&decl.name, ty)?;
        frame.locals.insert(
            decl.name.clone(),
            Storage {
                slot,
                ty: decl.ty,
            },
        );
        self.scopes.declare(decl.name.clone(), decl.ty);
        trace!(name = %decl.name, %slot, "declared variable");

        if let Some(typed) = init {
            if !coercible(typed.ty, decl.ty) {
                return Err(TransformError::IncompatibleAssignment {
                    name: decl.name.clone(),
                    expected: decl.ty,
                    found: typed.ty,
                });
            }
            let value = self.coerce(typed, decl.ty)?;
            self.ins()?.store(slot, value, ty);
        }
        Ok(())
    }

    /// Emits the return and moves emission into a fresh block with no
    /// predecessors. Unreachable blocks are dropped when the function is
    /// finished.
    fn lower_return(&mut self, value: Option<&Expr>) -> Result<(), TransformError> {
        let returns = self.frame()?.returns;
        let mismatch = |found: Type, function: &str| TransformError::ReturnTypeMismatch {
            function: function.to_string(),
            expected: returns,
            found,
        };

        match value {
            Some(expr) => {
                let typed = self.lower_value(expr, "return value")?;
                if returns == Type::Void || !coercible(typed.ty, returns) {
                    return Err(mismatch(typed.ty, self.function_name()));
                }
                let value = self.coerce(typed, returns)?;
                self.ins()?.return_value(value)?;
            }
            None if returns == Type::Void => self.ins()?.return_void()?,
            None => return Err(mismatch(Type::Void, self.function_name())),
        }

        let builder = self.builder()?;
        let next = builder.create_block(AFTER_RETURN);
        builder.switch_to_block(next)?;
        Ok(())
    }

    /// Terminates the current block with a return if control can reach it.
    /// A body value is returned after conversion to the declared type;
    /// `default_zero` returns zero instead.
    fn seal_function(&mut self, body: Option<Typed>, default_zero: bool) -> Result<(), TransformError> {
        let frame = self.frame()?;
        let returns = frame.returns;
        let Some(current) = frame.builder.current_block() else {
            return Ok(());
        };
        if frame.builder.is_terminated() || !frame.builder.is_reachable(current) {
            return Ok(());
        }

        if returns == Type::Void {
            self.ins()?.return_void()?;
            return Ok(());
        }

        let value = match body {
            Some(typed) if !default_zero => self.coerce(typed, returns)?,
            _ if default_zero => Constant::zero(returns.to_ir())
                .map(Value::Constant)
                .ok_or_else(|| {
                    TransformError::EmissionError(format!("no zero value of type {}", returns))
                })?,
            _ => {
                return Err(TransformError::EmissionError(format!(
                    "`{}` can reach its end without returning a value",
                    self.function_name()
                )))
            }
        };
        self.ins()?.return_value(value)?;
        Ok(())
    }

    fn install(&mut self, frame: FunctionFrame) -> Result<(), TransformError> {
        let mut builder = frame.builder;
        let removed = builder.remove_unreachable_blocks();
        let function = builder.build()?;
        trace!(
            function = %function.name(),
            blocks = function.block_count(),
            removed,
            "function lowered"
        );
        self.module.add_function(function)?;
        Ok(())
    }
}
