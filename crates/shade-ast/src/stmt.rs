//! Statement AST nodes

use serde::{Deserialize, Serialize};

use crate::{Expr, Span, VariableDecl};

/// A braced block of statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl Block {
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self { statements, span }
    }
}

/// A statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// Nested block: `{ ... }`
    Block(Block),

    /// Local variable declaration: `vec3 n = normalize(v);`
    Declaration(VariableDecl),

    /// Expression statement: `x += 1;`
    Expr(Expr),

    /// `if (c) then_branch else else_branch`
    If {
        condition: Expr,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },

    /// `while (c) body`
    While {
        condition: Expr,
        body: Box<Statement>,
    },

    /// `do body while (c);`
    DoWhile {
        body: Box<Statement>,
        condition: Expr,
    },

    /// `for (init; condition; step) body`
    For {
        init: Option<ForInit>,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: Box<Statement>,
    },

    /// `return;` or `return x;`
    Return(Option<Expr>),

    Break,

    Continue,

    /// `switch (x) { case 1: ... default: ... }`
    Switch {
        scrutinee: Expr,
        cases: Vec<SwitchCase>,
        default: Option<SwitchDefault>,
    },
}

/// Initializer clause of a `for` statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    Expr(Expr),
    Declaration(VariableDecl),
}

/// `case label: statements`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub label: Expr,
    pub body: Vec<Statement>,
    pub span: Span,
}

/// `default: statements`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchDefault {
    pub body: Vec<Statement>,
    pub span: Span,
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn block(statements: Vec<Statement>, span: Span) -> Self {
        Self::new(StatementKind::Block(Block::new(statements, span)), span)
    }

    pub fn declaration(decl: VariableDecl) -> Self {
        let span = decl.span;
        Self::new(StatementKind::Declaration(decl), span)
    }

    pub fn expr(expr: Expr) -> Self {
        let span = expr.span;
        Self::new(StatementKind::Expr(expr), span)
    }

    pub fn if_else(
        condition: Expr,
        then_branch: Statement,
        else_branch: Option<Statement>,
        span: Span,
    ) -> Self {
        Self::new(
            StatementKind::If {
                condition,
                then_branch: Box::new(then_branch),
                else_branch: else_branch.map(Box::new),
            },
            span,
        )
    }

    pub fn while_loop(condition: Expr, body: Statement, span: Span) -> Self {
        Self::new(
            StatementKind::While {
                condition,
                body: Box::new(body),
            },
            span,
        )
    }

    pub fn do_while(body: Statement, condition: Expr, span: Span) -> Self {
        Self::new(
            StatementKind::DoWhile {
                body: Box::new(body),
                condition,
            },
            span,
        )
    }

    pub fn for_loop(
        init: Option<ForInit>,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: Statement,
        span: Span,
    ) -> Self {
        Self::new(
            StatementKind::For {
                init,
                condition,
                step,
                body: Box::new(body),
            },
            span,
        )
    }

    pub fn ret(value: Option<Expr>, span: Span) -> Self {
        Self::new(StatementKind::Return(value), span)
    }

    pub fn brk(span: Span) -> Self {
        Self::new(StatementKind::Break, span)
    }

    pub fn cont(span: Span) -> Self {
        Self::new(StatementKind::Continue, span)
    }

    pub fn switch(
        scrutinee: Expr,
        cases: Vec<SwitchCase>,
        default: Option<SwitchDefault>,
        span: Span,
    ) -> Self {
        Self::new(
            StatementKind::Switch {
                scrutinee,
                cases,
                default,
            },
            span,
        )
    }
}
