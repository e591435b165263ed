use super::context::{EmissionContext, Typed};
use super::errors::TransformError;
use super::type_resolver::{binary_type, coercible, unary_type, Callee};
use crate::ast::{BinaryOp, Expr, Type, UnaryOp};
use tarn_core::{BinOp, Type as IrType, Value};

fn ir_op(op: BinaryOp) -> BinOp {
    match op {
        BinaryOp::Add => BinOp::Add,
        BinaryOp::Sub => BinOp::Sub,
        BinaryOp::Mul => BinOp::Mul,
        BinaryOp::Div => BinOp::Div,
        BinaryOp::Eq => BinOp::Eq,
        BinaryOp::Ne => BinOp::Ne,
        BinaryOp::Gt => BinOp::Gt,
        BinaryOp::Ge => BinOp::Ge,
        BinaryOp::Lt => BinOp::Lt,
        BinaryOp::Le => BinOp::Le,
    }
}

impl EmissionContext<'_> {
    /// Lowers an expression into the current block. `None` means the
    /// expression has no value: an assignment or a call to a void function.
    pub fn lower_expr(&mut self, expr: &Expr) -> Result<Option<Typed>, TransformError> {
        match expr {
            Expr::Int { value } => Ok(Some(Typed::new(Value::int(*value), Type::Int32))),
            Expr::Double { value } => Ok(Some(Typed::new(Value::float(*value), Type::Float64))),
            Expr::Str { value } => {
                let id = self.module.add_string(value.clone());
                Ok(Some(Typed::new(Value::Str(id), Type::Str)))
            }
            Expr::Ident { name } => {
                let storage = self.storage(name)?;
                let value = self.ins()?.load(storage.slot, storage.ty.to_ir());
                Ok(Some(Typed::new(value, storage.ty)))
            }
            Expr::Unary { op, operand } => self.lower_unary(*op, operand).map(Some),
            Expr::Binary { op, lhs, rhs } => self.lower_binary(*op, lhs, rhs).map(Some),
            Expr::Assign { target, value } => {
                self.lower_assign(target, value)?;
                Ok(None)
            }
            Expr::Call { callee, args } => self.lower_call(callee, args),
            Expr::Block(block) => self.lower_block(block).map_err(TransformError::from),
        }
    }

    /// Lowers an expression whose value is needed.
    pub fn lower_value(&mut self, expr: &Expr, role: &str) -> Result<Typed, TransformError> {
        self.lower_expr(expr)?.ok_or_else(|| {
            TransformError::EmissionError(format!("{} `{}` produced no value", role, expr))
        })
    }

    fn lower_unary(&mut self, op: UnaryOp, operand: &Expr) -> Result<Typed, TransformError> {
        let operand = self.lower_value(operand, "operand")?;
        let ty = unary_type(op, operand.ty)?;
        let value = self.materialize(operand)?;
        let result = match op {
            UnaryOp::Neg => self.ins()?.neg(value, ty.to_ir()),
        };
        Ok(Typed::new(result, ty))
    }

    /// Both operands are converted to the common type before the
    /// instruction; the instruction variant follows that type.
    fn lower_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Result<Typed, TransformError> {
        let left = self.lower_value(lhs, "operand")?;
        let right = self.lower_value(rhs, "operand")?;
        let ty = binary_type(op, left.ty, right.ty)?;

        let left = self.coerce(left, ty)?;
        let right = self.coerce(right, ty)?;
        let result = self.ins()?.binary(ir_op(op), left, right, ty.to_ir());

        if op.is_comparison() {
            Ok(Typed::boolean(result, ty))
        } else {
            Ok(Typed::new(result, ty))
        }
    }

    pub(crate) fn lower_assign(&mut self, target: &str, value: &Expr) -> Result<(), TransformError> {
        let storage = self.storage(target)?;
        let typed = self.lower_value(value, "right-hand side")?;
        if !coercible(typed.ty, storage.ty) {
            return Err(TransformError::IncompatibleAssignment {
                name: target.to_string(),
                expected: storage.ty,
                found: typed.ty,
            });
        }

        let value = self.coerce(typed, storage.ty)?;
        self.ins()?.store(storage.slot, value, storage.ty.to_ir());
        Ok(())
    }

    fn lower_call(&mut self, name: &str, args: &[Expr]) -> Result<Option<Typed>, TransformError> {
        let callee = match self.registry.get(name) {
            Some(decl) => Callee::Local(decl),
            None => self
                .module
                .lookup_external_function(name)
                .cloned()
                .map(Callee::External)
                .ok_or_else(|| TransformError::UnknownCallee(name.to_string()))?,
        };
        callee.check_arity(args.len())?;
        let fixed = callee.fixed_params();

        let mut values = Vec::with_capacity(args.len());
        for (index, arg) in args.iter().enumerate() {
            let typed = self.lower_value(arg, "argument")?;
            let value = match fixed.get(index) {
                Some(&expected) => {
                    if !coercible(typed.ty, expected) {
                        return Err(TransformError::ArgumentTypeMismatch {
                            callee: name.to_string(),
                            index,
                            expected,
                            found: typed.ty,
                        });
                    }
                    self.coerce(typed, expected)?
                }
                None => self.materialize(typed)?,
            };
            values.push(value);
        }

        let returns = callee.returns();
        let result = self.ins()?.call(name, values, returns.to_ir());
        Ok(result.map(|value| Typed::new(value, returns)))
    }

    /// Widens an IR boolean to the numeric type it stands for.
    pub(crate) fn materialize(&mut self, typed: Typed) -> Result<Value, TransformError> {
        if typed.repr == IrType::Bool {
            Ok(self.ins()?.cast(typed.value, IrType::Bool, typed.ty.to_ir())?)
        } else {
            Ok(typed.value)
        }
    }

    /// Materializes `typed` and converts it to `to`.
    pub(crate) fn coerce(&mut self, typed: Typed, to: Type) -> Result<Value, TransformError> {
        let from = typed.ty;
        let value = self.materialize(typed)?;
        if from == to {
            return Ok(value);
        }
        if !(from.is_numeric() && to.is_numeric()) {
            return Err(TransformError::EmissionError(format!(
                "no conversion from {} to {}",
                from, to
            )));
        }
        Ok(self.ins()?.cast(value, from.to_ir(), to.to_ir())?)
    }
}
