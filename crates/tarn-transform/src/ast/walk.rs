use super::{Block, Expr, FunctionDecl, Stmt};

/// Function declarations reachable from `stmt` without entering another
/// function body.
pub fn outer_functions(stmt: &Stmt) -> Vec<&FunctionDecl> {
    let mut found = Vec::new();
    visit_stmt(stmt, &mut |decl| found.push(decl), false);
    found
}

/// Every function declaration in `program`, at any nesting depth.
pub fn nested_functions(program: &Block) -> Vec<&FunctionDecl> {
    let mut found = Vec::new();
    for stmt in &program.stmts {
        visit_stmt(stmt, &mut |decl| found.push(decl), true);
    }
    found
}

fn visit_block<'a>(block: &'a Block, f: &mut impl FnMut(&'a FunctionDecl), deep: bool) {
    for stmt in &block.stmts {
        visit_stmt(stmt, f, deep);
    }
}

fn visit_stmt<'a>(stmt: &'a Stmt, f: &mut impl FnMut(&'a FunctionDecl), deep: bool) {
    match stmt {
        Stmt::Function(decl) => {
            f(decl);
            if deep {
                visit_block(&decl.body, f, deep);
            }
        }
        Stmt::Expr { expr } => visit_expr(expr, f, deep),
        Stmt::Var(decl) => {
            if let Some(init) = &decl.init {
                visit_expr(init, f, deep);
            }
        }
        Stmt::Return { value } => {
            if let Some(value) = value {
                visit_expr(value, f, deep);
            }
        }
        Stmt::If {
            cond,
            then_block,
            else_block,
        } => {
            visit_expr(cond, f, deep);
            visit_block(then_block, f, deep);
            if let Some(else_block) = else_block {
                visit_block(else_block, f, deep);
            }
        }
        Stmt::For {
            init,
            cond,
            post,
            body,
        } => {
            for expr in init.iter().chain(std::iter::once(cond)).chain(post) {
                visit_expr(expr, f, deep);
            }
            visit_block(body, f, deep);
        }
    }
}

fn visit_expr<'a>(expr: &'a Expr, f: &mut impl FnMut(&'a FunctionDecl), deep: bool) {
    match expr {
        Expr::Block(block) => visit_block(block, f, deep),
        Expr::Unary { operand, .. } => visit_expr(operand, f, deep),
        Expr::Binary { lhs, rhs, .. } => {
            visit_expr(lhs, f, deep);
            visit_expr(rhs, f, deep);
        }
        Expr::Assign { value, .. } => visit_expr(value, f, deep),
        Expr::Call { args, .. } => {
            for arg in args {
                visit_expr(arg, f, deep);
            }
        }
        Expr::Int { .. } | Expr::Double { .. } | Expr::Str { .. } | Expr::Ident { .. } => {}
    }
}
