//! Shade AST - Syntax tree and type catalog for the shade shading language
//!
//! Trees are built by a parser elsewhere (or by the convenience
//! constructors here) and handed to the checker, which fills in the
//! resolved type of every expression. Everything is serde-serializable so
//! a tree can travel between phases as JSON.

mod span;
mod types;
mod expr;
mod stmt;
mod decl;
mod printer;

pub use span::*;
pub use types::*;
pub use expr::*;
pub use stmt::*;
pub use decl::*;
pub use printer::*;

use serde::{Deserialize, Serialize};

/// A complete shade program: its top-level declarations in source order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

impl Program {
    pub fn new(declarations: Vec<Declaration>, span: Span) -> Self {
        Self { declarations, span }
    }

    /// Every expression in the program, in traversal order
    pub fn expressions(&self) -> Vec<&Expr> {
        let mut out = Vec::new();
        for decl in &self.declarations {
            match &decl.kind {
                DeclarationKind::Variable(var) => collect_var(var, &mut out),
                DeclarationKind::Function(func) => {
                    for param in &func.params {
                        collect_var(param, &mut out);
                    }
                    if let Some(body) = &func.body {
                        for stmt in &body.statements {
                            collect_stmt(stmt, &mut out);
                        }
                    }
                }
            }
        }
        out
    }
}

fn collect_var<'a>(var: &'a VariableDecl, out: &mut Vec<&'a Expr>) {
    if let Some(init) = &var.init {
        collect_expr(init, out);
    }
}

fn collect_expr<'a>(e: &'a Expr, out: &mut Vec<&'a Expr>) {
    e.walk(&mut |sub| out.push(sub));
}

fn collect_stmt<'a>(stmt: &'a Statement, out: &mut Vec<&'a Expr>) {
    match &stmt.kind {
        StatementKind::Block(block) => {
            for s in &block.statements {
                collect_stmt(s, out);
            }
        }
        StatementKind::Declaration(var) => collect_var(var, out),
        StatementKind::Expr(e) => collect_expr(e, out),
        StatementKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            collect_expr(condition, out);
            collect_stmt(then_branch, out);
            if let Some(else_branch) = else_branch {
                collect_stmt(else_branch, out);
            }
        }
        StatementKind::While { condition, body } => {
            collect_expr(condition, out);
            collect_stmt(body, out);
        }
        StatementKind::DoWhile { body, condition } => {
            collect_stmt(body, out);
            collect_expr(condition, out);
        }
        StatementKind::For {
            init,
            condition,
            step,
            body,
        } => {
            match init {
                Some(ForInit::Expr(e)) => collect_expr(e, out),
                Some(ForInit::Declaration(var)) => collect_var(var, out),
                None => {}
            }
            if let Some(c) = condition {
                collect_expr(c, out);
            }
            if let Some(s) = step {
                collect_expr(s, out);
            }
            collect_stmt(body, out);
        }
        StatementKind::Return(value) => {
            if let Some(v) = value {
                collect_expr(v, out);
            }
        }
        StatementKind::Break | StatementKind::Continue => {}
        StatementKind::Switch {
            scrutinee,
            cases,
            default,
        } => {
            collect_expr(scrutinee, out);
            for case in cases {
                collect_expr(&case.label, out);
                for s in &case.body {
                    collect_stmt(s, out);
                }
            }
            if let Some(default) = default {
                for s in &default.body {
                    collect_stmt(s, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_json_round_trip() {
        let sp = Span::new(0, 12);
        let program = Program::new(
            vec![VariableDecl::new(
                Ident::new("k", sp),
                Type::Float,
                Some(Expr::float(1.5, sp)),
                sp,
            )
            .into()],
            sp,
        );
        let json = serde_json::to_string(&program).unwrap();
        assert!(!json.contains("\"ty\":null"));
        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(back, program);
    }

    #[test]
    fn test_expressions_are_collected_in_traversal_order() {
        let sp = Span::dummy();
        let body = Block::new(
            vec![
                Statement::expr(Expr::arithmetic(
                    ArithmeticOp::Add,
                    Expr::var("a", sp),
                    Expr::int(1, sp),
                )),
                Statement::ret(Some(Expr::var("a", sp)), sp),
            ],
            sp,
        );
        let func = FunctionDecl::new(Ident::new("f", sp), Type::Int, vec![], Some(body), sp);
        let program = Program::new(vec![func.into()], sp);

        let rendered: Vec<String> = program
            .expressions()
            .iter()
            .map(|e| e.to_source(0))
            .collect();
        assert_eq!(rendered, vec!["a + 1", "a", "1", "a"]);
    }
}
