use super::errors::{Diagnostic, TransformError, TransformResult};
use super::registry::{FunctionRegistry, ENTRY_FUNCTION};
use super::scope::ScopeChain;
use crate::ast::{self, BinaryOp, Block, Expr, FunctionDecl, Stmt, Type, UnaryOp};
use tarn_core::{module::ExternalFunction, runtime};
use tracing::trace;

/// Whether a value of type `from` may be stored where `to` is expected,
/// directly or through an implicit Int32/Float64 conversion.
pub fn coercible(from: Type, to: Type) -> bool {
    from == to || (from.is_numeric() && to.is_numeric())
}

/// Result type of a binary expression. Comparisons type like arithmetic:
/// Float64 if either side is Float64, Int32 otherwise.
pub fn binary_type(op: BinaryOp, left: Type, right: Type) -> Result<Type, TransformError> {
    if left != right && !(left.is_numeric() && right.is_numeric()) {
        return Err(TransformError::TypeMismatch {
            op: op.symbol().to_string(),
            left,
            right,
        });
    }

    if let Some(ty) = [left, right].into_iter().find(|ty| !ty.is_numeric()) {
        return Err(TransformError::InvalidOperand {
            op: format!("`{}`", op),
            ty,
        });
    }

    if left == Type::Float64 || right == Type::Float64 {
        Ok(Type::Float64)
    } else {
        Ok(Type::Int32)
    }
}

pub fn unary_type(op: UnaryOp, operand: Type) -> Result<Type, TransformError> {
    match op {
        UnaryOp::Neg if operand.is_numeric() => Ok(operand),
        UnaryOp::Neg => Err(TransformError::InvalidOperand {
            op: "unary `-`".to_string(),
            ty: operand,
        }),
    }
}

/// A call target: a function declared in the program, or a runtime function
/// known only by its signature.
#[derive(Debug, Clone)]
pub enum Callee<'a> {
    Local(&'a FunctionDecl),
    External(ExternalFunction),
}

impl<'a> Callee<'a> {
    /// Declared functions shadow runtime functions of the same name.
    pub fn resolve(registry: &FunctionRegistry<'a>, name: &str) -> Result<Self, TransformError> {
        if let Some(decl) = registry.get(name) {
            return Ok(Callee::Local(decl));
        }
        runtime::lookup(name)
            .map(Callee::External)
            .ok_or_else(|| TransformError::UnknownCallee(name.to_string()))
    }

    pub fn name(&self) -> &str {
        match self {
            Callee::Local(decl) => &decl.name,
            Callee::External(ext) => &ext.name,
        }
    }

    pub fn returns(&self) -> Type {
        match self {
            Callee::Local(decl) => decl.returns,
            Callee::External(ext) => Type::from_ir(ext.returns),
        }
    }

    /// Types of the parameters every call must supply.
    pub fn fixed_params(&self) -> Vec<Type> {
        match self {
            Callee::Local(decl) => decl.params.iter().map(|p| p.ty).collect(),
            Callee::External(ext) => ext.params.iter().copied().map(Type::from_ir).collect(),
        }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, Callee::External(ext) if ext.is_variadic)
    }

    pub fn check_arity(&self, found: usize) -> Result<(), TransformError> {
        let expected = self.fixed_params().len();
        let accepted = match self {
            Callee::Local(decl) => found == decl.params.len(),
            Callee::External(ext) => ext.accepts_arity(found),
        };

        if accepted {
            Ok(())
        } else {
            Err(TransformError::ArityMismatch {
                callee: self.name().to_string(),
                expected,
                found,
                variadic: self.is_variadic(),
            })
        }
    }
}

/// Computes and validates the types of expressions and statements.
///
/// Expression failures come back as plain errors. Statement failures are
/// pinned to the statement and the function being checked. Failures inside a
/// function body are recorded and checking carries on with the next function,
/// so one pass reports the errors of every function.
pub struct TypeResolver<'r> {
    registry: &'r FunctionRegistry<'r>,
    functions: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'r> TypeResolver<'r> {
    pub fn new(registry: &'r FunctionRegistry<'r>) -> Self {
        Self {
            registry,
            functions: vec![ENTRY_FUNCTION.to_string()],
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn current_function(&self) -> &str {
        self.functions
            .last()
            .map(String::as_str)
            .unwrap_or(ENTRY_FUNCTION)
    }

    /// Checks the top-level block, which behaves like the body of `main`.
    pub fn check_program(&mut self, program: &Block, scopes: &mut ScopeChain) {
        if let Err(diagnostic) = self.block_type(program, scopes) {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Checks one statement, recording its failure. Returns whether it passed.
    pub fn type_check(&mut self, stmt: &Stmt, scopes: &mut ScopeChain) -> bool {
        match self.check_stmt(stmt, scopes) {
            Ok(_) => true,
            Err(diagnostic) => {
                self.diagnostics.push(diagnostic);
                false
            }
        }
    }

    pub fn type_of(&mut self, expr: &Expr, scopes: &mut ScopeChain) -> Result<Type, TransformError> {
        match expr {
            Expr::Int { .. } => Ok(Type::Int32),
            Expr::Double { .. } => Ok(Type::Float64),
            Expr::Str { .. } => Ok(Type::Str),
            Expr::Ident { name } => scopes
                .lookup(name)
                .ok_or_else(|| TransformError::UnboundName(name.clone())),
            Expr::Unary { op, operand } => {
                let operand = self.type_of(operand, scopes)?;
                unary_type(*op, operand)
            }
            Expr::Binary { op, lhs, rhs } => {
                let left = self.type_of(lhs, scopes)?;
                let right = self.type_of(rhs, scopes)?;
                binary_type(*op, left, right)
            }
            Expr::Assign { target, value } => {
                let expected = scopes
                    .lookup(target)
                    .ok_or_else(|| TransformError::UnboundName(target.clone()))?;
                let found = self.type_of(value, scopes)?;
                if !coercible(found, expected) {
                    return Err(TransformError::IncompatibleAssignment {
                        name: target.clone(),
                        expected,
                        found,
                    });
                }
                Ok(Type::Void)
            }
            Expr::Call { callee, args } => self.call_type(callee, args, scopes),
            Expr::Block(block) => self.block_type(block, scopes).map_err(TransformError::from),
        }
    }

    fn call_type(
        &mut self,
        name: &str,
        args: &[Expr],
        scopes: &mut ScopeChain,
    ) -> Result<Type, TransformError> {
        let callee = Callee::resolve(self.registry, name)?;
        callee.check_arity(args.len())?;
        let fixed = callee.fixed_params();

        for (index, arg) in args.iter().enumerate() {
            let found = self.type_of(arg, scopes)?;
            match fixed.get(index) {
                Some(&expected) if !coercible(found, expected) => {
                    return Err(TransformError::ArgumentTypeMismatch {
                        callee: name.to_string(),
                        index,
                        expected,
                        found,
                    });
                }
                None if found == Type::Void => {
                    return Err(TransformError::InvalidOperand {
                        op: format!("variadic argument of `{}`", name),
                        ty: found,
                    });
                }
                _ => {}
            }
        }

        Ok(callee.returns())
    }

    /// Checks `block` statement by statement and yields the type of its last
    /// statement. After the first failure the remaining statements are only
    /// searched for function declarations, which are still checked.
    pub fn block_type(&mut self, block: &Block, scopes: &mut ScopeChain) -> TransformResult<Type> {
        let mut result = Ok(Type::Void);

        for stmt in &block.stmts {
            if result.is_ok() {
                result = self.check_stmt(stmt, scopes);
            } else {
                for decl in ast::outer_functions(stmt) {
                    self.check_function(decl, scopes);
                }
            }
        }

        result
    }

    pub fn check_stmt(&mut self, stmt: &Stmt, scopes: &mut ScopeChain) -> TransformResult<Type> {
        self.stmt_type(stmt, scopes)
            .map_err(|error| Diagnostic::new(self.current_function(), stmt.summary(), error))
    }

    fn stmt_type(&mut self, stmt: &Stmt, scopes: &mut ScopeChain) -> Result<Type, TransformError> {
        match stmt {
            Stmt::Expr { expr } => self.type_of(expr, scopes),
            Stmt::Var(decl) => {
                if decl.ty == Type::Void {
                    return Err(TransformError::VoidBinding(decl.name.clone()));
                }

                let init = decl
                    .init
                    .as_ref()
                    .map(|init| self.type_of(init, scopes))
                    .transpose();
                scopes.declare(decl.name.clone(), decl.ty);

                if let Some(found) = init? {
                    if !coercible(found, decl.ty) {
                        return Err(TransformError::IncompatibleAssignment {
                            name: decl.name.clone(),
                            expected: decl.ty,
                            found,
                        });
                    }
                }
                Ok(Type::Void)
            }
            Stmt::Function(decl) => {
                self.check_function(decl, scopes);
                Ok(Type::Void)
            }
            Stmt::Return { value } => {
                let expected = scopes.returns();
                let found = match value {
                    Some(value) => self.type_of(value, scopes)?,
                    None => Type::Void,
                };
                if !coercible(found, expected) {
                    return Err(TransformError::ReturnTypeMismatch {
                        function: self.current_function().to_string(),
                        expected,
                        found,
                    });
                }
                Ok(Type::Void)
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                let cond = self.condition(cond, "if condition", scopes).map(drop);
                let then = self.branch_after(cond.is_ok(), then_block, scopes);
                let mut outcome = cond.and(then);
                if let Some(else_block) = else_block {
                    let other = self.branch_after(outcome.is_ok(), else_block, scopes);
                    outcome = outcome.and(other);
                }
                outcome.map(|()| Type::Void)
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => {
                let mut outcome = init
                    .iter()
                    .try_for_each(|expr| self.type_of(expr, scopes).map(drop));
                if outcome.is_ok() {
                    outcome = self.condition(cond, "for condition", scopes).map(drop);
                }
                let body = self.branch_after(outcome.is_ok(), body, scopes);
                outcome = outcome.and(body);
                if outcome.is_ok() {
                    outcome = post
                        .iter()
                        .try_for_each(|expr| self.type_of(expr, scopes).map(drop));
                }
                outcome.map(|()| Type::Void)
            }
        }
    }

    /// Checks a branch of a compound statement. Once the statement has
    /// failed, only the functions the branch declares are still checked.
    fn branch_after(
        &mut self,
        ok: bool,
        block: &Block,
        scopes: &mut ScopeChain,
    ) -> Result<(), TransformError> {
        if ok {
            self.block_type(block, scopes)?;
        } else {
            for decl in block.stmts.iter().flat_map(ast::outer_functions) {
                self.check_function(decl, scopes);
            }
        }
        Ok(())
    }

    fn condition(
        &mut self,
        cond: &Expr,
        what: &str,
        scopes: &mut ScopeChain,
    ) -> Result<Type, TransformError> {
        let ty = self.type_of(cond, scopes)?;
        if !ty.is_numeric() {
            return Err(TransformError::InvalidOperand {
                op: what.to_string(),
                ty,
            });
        }
        Ok(ty)
    }

    /// Checks a function declaration in a table of its own. Failures are
    /// recorded, never returned: they do not fail the enclosing block.
    pub fn check_function(&mut self, decl: &FunctionDecl, scopes: &mut ScopeChain) {
        trace!(function = %decl.name, "checking function");
        self.functions.push(decl.name.clone());
        let result = {
            let mut inner = scopes.enter(decl.returns);
            self.function_body(decl, &mut inner)
        };
        self.functions.pop();

        if let Err(diagnostic) = result {
            self.diagnostics.push(diagnostic);
        }
    }

    fn function_body(&mut self, decl: &FunctionDecl, scopes: &mut ScopeChain) -> TransformResult<()> {
        for param in &decl.params {
            if param.ty == Type::Void {
                return Err(Diagnostic::new(
                    &decl.name,
                    decl.header(),
                    TransformError::VoidBinding(param.name.clone()),
                ));
            }
            scopes.declare(param.name.clone(), param.ty);
        }

        let body = self.block_type(&decl.body, scopes)?;
        if decl.returns == Type::Void
            || decl.body.definitely_returns()
            || coercible(body, decl.returns)
        {
            return Ok(());
        }

        Err(Diagnostic::new(
            &decl.name,
            decl.header(),
            TransformError::ReturnTypeMismatch {
                function: decl.name.clone(),
                expected: decl.returns,
                found: body,
            },
        ))
    }
}
