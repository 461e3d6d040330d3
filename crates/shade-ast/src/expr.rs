//! Expression AST nodes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ExprType, Ident, Span};

/// An expression.
///
/// `ty` is empty when the tree comes out of the parser and is filled in by
/// the checker: after a pass every expression node holds either its
/// resolved type or the error sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<ExprType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Literal value: `42`, `7u`, `1.5`, `true`
    Literal(Literal),

    /// Variable reference: `x`
    Var(Ident),

    /// Prefix arithmetic: `-x`, `++i`
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// `a + b`, `a * b`, ...
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `a < b`, `a >= b`, ...
    Relational {
        op: RelationalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `a == b`, `a != b`
    Equality {
        op: EqualityOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `a && b`, `a || b`
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `x = y`, `x += y`, ...
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },

    /// `i++`, `i--`
    Postfix {
        op: PostfixOp,
        operand: Box<Expr>,
    },

    /// `c ? a : b`
    Conditional {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },

    /// `arr[i]`, `m[1]`
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },

    /// Field or swizzle access: `v.xyz`
    Field {
        base: Box<Expr>,
        field: Ident,
    },

    /// Function call: `f(a, b)`
    Call {
        callee: Ident,
        args: Vec<Expr>,
    },
}

/// A literal value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Neg,
    PreInc,
    PreDec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationalOp {
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EqualityOp {
    Eq,
    Ne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostfixOp {
    Inc,
    Dec,
}

impl UnaryOp {
    pub fn token(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::PreInc => "++",
            UnaryOp::PreDec => "--",
        }
    }
}

impl ArithmeticOp {
    pub fn token(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
        }
    }
}

impl RelationalOp {
    pub fn token(self) -> &'static str {
        match self {
            RelationalOp::Lt => "<",
            RelationalOp::Le => "<=",
            RelationalOp::Gt => ">",
            RelationalOp::Ge => ">=",
        }
    }
}

impl EqualityOp {
    pub fn token(self) -> &'static str {
        match self {
            EqualityOp::Eq => "==",
            EqualityOp::Ne => "!=",
        }
    }
}

impl LogicalOp {
    pub fn token(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

impl AssignOp {
    pub fn token(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
        }
    }
}

impl PostfixOp {
    pub fn token(self) -> &'static str {
        match self {
            PostfixOp::Inc => "++",
            PostfixOp::Dec => "--",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::UInt(v) => write!(f, "{}u", v),
            Literal::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{:.1}", v),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: None,
        }
    }

    pub fn int(value: i64, span: Span) -> Self {
        Self::new(ExprKind::Literal(Literal::Int(value)), span)
    }

    pub fn uint(value: u64, span: Span) -> Self {
        Self::new(ExprKind::Literal(Literal::UInt(value)), span)
    }

    pub fn float(value: f64, span: Span) -> Self {
        Self::new(ExprKind::Literal(Literal::Float(value)), span)
    }

    pub fn boolean(value: bool, span: Span) -> Self {
        Self::new(ExprKind::Literal(Literal::Bool(value)), span)
    }

    pub fn var(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Var(Ident::new(name, span)), span)
    }

    pub fn unary(op: UnaryOp, operand: Expr, span: Span) -> Self {
        let span = span.merge(operand.span);
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    pub fn arithmetic(op: ArithmeticOp, left: Expr, right: Expr) -> Self {
        let span = left.span.merge(right.span);
        Self::new(
            ExprKind::Arithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn relational(op: RelationalOp, left: Expr, right: Expr) -> Self {
        let span = left.span.merge(right.span);
        Self::new(
            ExprKind::Relational {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn equality(op: EqualityOp, left: Expr, right: Expr) -> Self {
        let span = left.span.merge(right.span);
        Self::new(
            ExprKind::Equality {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Self {
        let span = left.span.merge(right.span);
        Self::new(
            ExprKind::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn assign(op: AssignOp, target: Expr, value: Expr) -> Self {
        let span = target.span.merge(value.span);
        Self::new(
            ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            span,
        )
    }

    pub fn postfix(op: PostfixOp, operand: Expr, span: Span) -> Self {
        let span = operand.span.merge(span);
        Self::new(
            ExprKind::Postfix {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    pub fn conditional(condition: Expr, then_expr: Expr, else_expr: Expr) -> Self {
        let span = condition.span.merge(else_expr.span);
        Self::new(
            ExprKind::Conditional {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            span,
        )
    }

    pub fn index(base: Expr, index: Expr, span: Span) -> Self {
        let span = base.span.merge(span);
        Self::new(
            ExprKind::Index {
                base: Box::new(base),
                index: Box::new(index),
            },
            span,
        )
    }

    pub fn field(base: Expr, field: Ident) -> Self {
        let span = base.span.merge(field.span);
        Self::new(
            ExprKind::Field {
                base: Box::new(base),
                field,
            },
            span,
        )
    }

    pub fn call(callee: Ident, args: Vec<Expr>, span: Span) -> Self {
        let span = callee.span.merge(span);
        Self::new(ExprKind::Call { callee, args }, span)
    }

    /// Type recorded by the checker, if it has run
    pub fn resolved_type(&self) -> Option<&ExprType> {
        self.ty.as_ref()
    }

    /// Replace the recorded type with the error sentinel
    pub fn mark_error(&mut self) {
        self.ty = Some(ExprType::AlreadyDiagnosed);
    }

    /// Identifier when the expression is a bare variable reference
    pub fn as_var(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Var(ident) => Some(ident),
            _ => None,
        }
    }

    /// Visit this expression and every sub-expression, parents first
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Expr)) {
        visit(self);
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Var(_) => {}
            ExprKind::Unary { operand, .. } | ExprKind::Postfix { operand, .. } => {
                operand.walk(visit)
            }
            ExprKind::Arithmetic { left, right, .. }
            | ExprKind::Relational { left, right, .. }
            | ExprKind::Equality { left, right, .. }
            | ExprKind::Logical { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            ExprKind::Assign { target, value, .. } => {
                target.walk(visit);
                value.walk(visit);
            }
            ExprKind::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                condition.walk(visit);
                then_expr.walk(visit);
                else_expr.walk(visit);
            }
            ExprKind::Index { base, index } => {
                base.walk(visit);
                index.walk(visit);
            }
            ExprKind::Field { base, .. } => base.walk(visit),
            ExprKind::Call { args, .. } => {
                for arg in args {
                    arg.walk(visit);
                }
            }
        }
    }
}
