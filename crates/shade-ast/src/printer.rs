//! Source printer for shade ASTs
//!
//! Renders trees back to shading-language text with four-space indentation.
//! Diagnostics use it to quote the expression they are about; `shade print`
//! renders whole trees.

use crate::{
    Block, Declaration, DeclarationKind, Expr, ExprKind, ForInit, FunctionDecl, Program,
    Statement, StatementKind, SwitchCase, SwitchDefault, VariableDecl,
};

/// Trait for converting AST nodes to source text.
pub trait ToSource {
    /// Render with the given indentation level.
    fn to_source(&self, indent: usize) -> String;
}

fn indent_str(level: usize) -> String {
    "    ".repeat(level)
}

// ===== Program =====

impl ToSource for Program {
    fn to_source(&self, indent: usize) -> String {
        self.declarations
            .iter()
            .map(|d| d.to_source(indent))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ToSource for Declaration {
    fn to_source(&self, indent: usize) -> String {
        match &self.kind {
            DeclarationKind::Variable(var) => format!("{};", var.to_source(indent)),
            DeclarationKind::Function(func) => func.to_source(indent),
        }
    }
}

// ===== Declarations =====

/// Renders without the trailing semicolon so formals can reuse it.
impl ToSource for VariableDecl {
    fn to_source(&self, indent: usize) -> String {
        let mut out = indent_str(indent);
        if let Some(q) = self.qualifier {
            out.push_str(&format!("{} ", q));
        }
        if let Some(ty) = &self.ty {
            out.push_str(&format!("{} ", ty));
        }
        out.push_str(&self.name.name);
        if let Some(init) = &self.init {
            out.push_str(" = ");
            out.push_str(&init.to_source(0));
        }
        out
    }
}

impl ToSource for FunctionDecl {
    fn to_source(&self, indent: usize) -> String {
        let ind = indent_str(indent);
        let params = self
            .params
            .iter()
            .map(|p| p.to_source(0))
            .collect::<Vec<_>>()
            .join(", ");
        let qualifier = self
            .return_qualifier
            .map(|q| format!("{} ", q))
            .unwrap_or_default();
        let header = format!(
            "{}{}{} {}({})",
            ind, qualifier, self.return_type, self.name.name, params
        );
        match &self.body {
            Some(body) => format!("{} {}", header, body.to_source(indent)),
            None => format!("{};", header),
        }
    }
}

// ===== Statements =====

/// The opening brace is not indented; it follows whatever header precedes it.
impl ToSource for Block {
    fn to_source(&self, indent: usize) -> String {
        let mut lines = vec!["{".to_string()];
        for stmt in &self.statements {
            lines.push(stmt.to_source(indent + 1));
        }
        lines.push(format!("{}}}", indent_str(indent)));
        lines.join("\n")
    }
}

impl ToSource for Statement {
    fn to_source(&self, indent: usize) -> String {
        let ind = indent_str(indent);
        match &self.kind {
            StatementKind::Block(block) => format!("{}{}", ind, block.to_source(indent)),
            StatementKind::Declaration(var) => format!("{};", var.to_source(indent)),
            StatementKind::Expr(expr) => format!("{}{};", ind, expr.to_source(0)),
            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut out = format!(
                    "{}if ({}) {}",
                    ind,
                    condition.to_source(0),
                    body_source(then_branch, indent)
                );
                if let Some(else_branch) = else_branch {
                    out.push_str(&format!(" else {}", body_source(else_branch, indent)));
                }
                out
            }
            StatementKind::While { condition, body } => format!(
                "{}while ({}) {}",
                ind,
                condition.to_source(0),
                body_source(body, indent)
            ),
            StatementKind::DoWhile { body, condition } => format!(
                "{}do {} while ({});",
                ind,
                body_source(body, indent),
                condition.to_source(0)
            ),
            StatementKind::For {
                init,
                condition,
                step,
                body,
            } => {
                let init = match init {
                    Some(ForInit::Expr(e)) => e.to_source(0),
                    Some(ForInit::Declaration(d)) => d.to_source(0),
                    None => String::new(),
                };
                let condition = condition.as_ref().map(|c| c.to_source(0)).unwrap_or_default();
                let step = step.as_ref().map(|s| s.to_source(0)).unwrap_or_default();
                format!(
                    "{}for ({}; {}; {}) {}",
                    ind,
                    init,
                    condition,
                    step,
                    body_source(body, indent)
                )
            }
            StatementKind::Return(Some(value)) => format!("{}return {};", ind, value.to_source(0)),
            StatementKind::Return(None) => format!("{}return;", ind),
            StatementKind::Break => format!("{}break;", ind),
            StatementKind::Continue => format!("{}continue;", ind),
            StatementKind::Switch {
                scrutinee,
                cases,
                default,
            } => {
                let mut lines = vec![format!("{}switch ({}) {{", ind, scrutinee.to_source(0))];
                for case in cases {
                    lines.push(case.to_source(indent + 1));
                }
                if let Some(default) = default {
                    lines.push(default.to_source(indent + 1));
                }
                lines.push(format!("{}}}", ind));
                lines.join("\n")
            }
        }
    }
}

impl ToSource for SwitchCase {
    fn to_source(&self, indent: usize) -> String {
        let mut lines = vec![format!("{}case {}:", indent_str(indent), self.label.to_source(0))];
        for stmt in &self.body {
            lines.push(stmt.to_source(indent + 1));
        }
        lines.join("\n")
    }
}

impl ToSource for SwitchDefault {
    fn to_source(&self, indent: usize) -> String {
        let mut lines = vec![format!("{}default:", indent_str(indent))];
        for stmt in &self.body {
            lines.push(stmt.to_source(indent + 1));
        }
        lines.join("\n")
    }
}

/// Body of a compound statement, printed after its header on the same line
fn body_source(body: &Statement, indent: usize) -> String {
    match &body.kind {
        StatementKind::Block(block) => block.to_source(indent),
        _ => format!("\n{}", body.to_source(indent + 1)),
    }
}

// ===== Expressions =====

impl ToSource for Expr {
    fn to_source(&self, _indent: usize) -> String {
        match &self.kind {
            ExprKind::Literal(lit) => lit.to_string(),
            ExprKind::Var(ident) => ident.name.clone(),
            ExprKind::Unary { op, operand } => format!("{}{}", op.token(), operand_source(operand)),
            ExprKind::Arithmetic { op, left, right } => binary_source(left, op.token(), right),
            ExprKind::Relational { op, left, right } => binary_source(left, op.token(), right),
            ExprKind::Equality { op, left, right } => binary_source(left, op.token(), right),
            ExprKind::Logical { op, left, right } => binary_source(left, op.token(), right),
            ExprKind::Assign { op, target, value } => format!(
                "{} {} {}",
                target.to_source(0),
                op.token(),
                value.to_source(0)
            ),
            ExprKind::Postfix { op, operand } => format!("{}{}", operand_source(operand), op.token()),
            ExprKind::Conditional {
                condition,
                then_expr,
                else_expr,
            } => format!(
                "{} ? {} : {}",
                operand_source(condition),
                operand_source(then_expr),
                operand_source(else_expr)
            ),
            ExprKind::Index { base, index } => {
                format!("{}[{}]", operand_source(base), index.to_source(0))
            }
            ExprKind::Field { base, field } => format!("{}.{}", operand_source(base), field.name),
            ExprKind::Call { callee, args } => format!(
                "{}({})",
                callee.name,
                args.iter()
                    .map(|a| a.to_source(0))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

fn binary_source(left: &Expr, op: &str, right: &Expr) -> String {
    format!("{} {} {}", operand_source(left), op, operand_source(right))
}

/// Parenthesize anything that is not atomic so nesting stays unambiguous
fn operand_source(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Literal(_)
        | ExprKind::Var(_)
        | ExprKind::Call { .. }
        | ExprKind::Index { .. }
        | ExprKind::Field { .. } => expr.to_source(0),
        _ => format!("({})", expr.to_source(0)),
    }
}
