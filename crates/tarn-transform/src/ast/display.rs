use super::{BinaryOp, Block, Expr, FunctionDecl, Stmt, Type, UnaryOp};
use std::fmt::{self, Write};

const INDENT: &str = "    ";

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Int32 => "int",
            Type::Float64 => "double",
            Type::Str => "string",
            Type::Void => "void",
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => f.write_str("-"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_expr(&mut out, self, 0)?;
        f.write_str(&out)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_stmt(&mut out, self, 0)?;
        f.write_str(&out)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_block(&mut out, self, 0)?;
        f.write_str(&out)
    }
}

impl Stmt {
    /// One-line rendering used to point at a statement. Compound statements
    /// stop at their header.
    pub fn summary(&self) -> String {
        match self {
            Stmt::Function(decl) => decl.header(),
            Stmt::If { cond, .. } => format!("if ({})", cond),
            Stmt::For {
                init, cond, post, ..
            } => format!("for ({}; {}; {})", join(init), cond, join(post)),
            other => other.to_string(),
        }
    }
}

impl FunctionDecl {
    /// `returns name(type param, ...)`
    pub fn header(&self) -> String {
        format!(
            "{} {}({})",
            self.returns,
            self.name,
            self.params
                .iter()
                .map(|p| format!("{} {}", p.ty, p.name))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// Renders a top-level block as a sequence of statements without braces.
pub fn render_program(program: &Block) -> String {
    let mut out = String::new();
    for stmt in &program.stmts {
        // Writing into a String cannot fail.
        let _ = write_stmt(&mut out, stmt, 0);
        out.push('\n');
    }
    out
}

fn join(exprs: &[Expr]) -> String {
    exprs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_block(out: &mut String, block: &Block, depth: usize) -> fmt::Result {
    if block.is_empty() {
        out.push_str("{ }");
        return Ok(());
    }

    out.push_str("{\n");
    for stmt in &block.stmts {
        write_indent(out, depth + 1);
        write_stmt(out, stmt, depth + 1)?;
        out.push('\n');
    }
    write_indent(out, depth);
    out.push('}');
    Ok(())
}

fn write_stmt(out: &mut String, stmt: &Stmt, depth: usize) -> fmt::Result {
    match stmt {
        Stmt::Expr { expr } => {
            write_expr(out, expr, depth)?;
            out.push(';');
        }
        Stmt::Var(decl) => {
            write!(out, "{} {}", decl.ty, decl.name)?;
            if let Some(init) = &decl.init {
                out.push_str(" = ");
                write_expr(out, init, depth)?;
            }
            out.push(';');
        }
        Stmt::Function(decl) => {
            out.push_str(&stmt.summary());
            out.push(' ');
            write_block(out, &decl.body, depth)?;
        }
        Stmt::Return { value } => match value {
            Some(value) => {
                out.push_str("return ");
                write_expr(out, value, depth)?;
                out.push(';');
            }
            None => out.push_str("return;"),
        },
        Stmt::If {
            cond,
            then_block,
            else_block,
        } => {
            out.push_str("if (");
            write_expr(out, cond, depth)?;
            out.push_str(") ");
            write_block(out, then_block, depth)?;
            if let Some(else_block) = else_block {
                out.push_str(" else ");
                write_block(out, else_block, depth)?;
            }
        }
        Stmt::For {
            init,
            cond,
            post,
            body,
        } => {
            write!(out, "for ({}; ", join(init))?;
            write_expr(out, cond, depth)?;
            write!(out, "; {}) ", join(post))?;
            write_block(out, body, depth)?;
        }
    }
    Ok(())
}

fn write_expr(out: &mut String, expr: &Expr, depth: usize) -> fmt::Result {
    match expr {
        Expr::Int { value } => write!(out, "{}", value),
        Expr::Double { value } => write!(out, "{:?}", value),
        Expr::Str { value } => write!(out, "{:?}", value),
        Expr::Ident { name } => write!(out, "{}", name),
        Expr::Unary { op, operand } => {
            write!(out, "{}", op)?;
            write_operand(out, operand, depth)
        }
        Expr::Binary { op, lhs, rhs } => {
            write_operand(out, lhs, depth)?;
            write!(out, " {} ", op)?;
            write_operand(out, rhs, depth)
        }
        Expr::Assign { target, value } => {
            write!(out, "{} = ", target)?;
            write_expr(out, value, depth)
        }
        Expr::Call { callee, args } => write!(out, "{}({})", callee, join(args)),
        Expr::Block(block) => write_block(out, block, depth),
    }
}

fn write_operand(out: &mut String, expr: &Expr, depth: usize) -> fmt::Result {
    if matches!(expr, Expr::Binary { .. } | Expr::Assign { .. }) {
        out.push('(');
        write_expr(out, expr, depth)?;
        out.push(')');
        Ok(())
    } else {
        write_expr(out, expr, depth)
    }
}
