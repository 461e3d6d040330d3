//! Expression typing rules

use shade_ast::*;

use crate::types::{compatible, index_type, is_arithmetic, swizzle_type, SwizzleError};
use crate::{CheckError, Checker, LookupReason, Reporter, SymbolKind};

impl<R: Reporter> Checker<R> {
    /// Type an expression and record the result on the node
    pub(crate) fn check_expr(&mut self, expr: &mut Expr) -> ExprType {
        let ty = self.infer(expr);
        expr.ty = Some(ty.clone());
        ty
    }

    fn infer(&mut self, expr: &mut Expr) -> ExprType {
        let span = expr.span;
        match &mut expr.kind {
            ExprKind::Literal(lit) => ExprType::Typed(match lit {
                Literal::Int(_) => Type::Int,
                Literal::UInt(_) => Type::UInt,
                Literal::Float(_) => Type::Float,
                Literal::Bool(_) => Type::Bool,
            }),
            ExprKind::Var(ident) => self.check_var(ident),
            ExprKind::Unary { op, operand } => self.check_operand(op.token(), operand, span),
            ExprKind::Postfix { op, operand } => self.check_operand(op.token(), operand, span),
            ExprKind::Arithmetic { op, left, right } => {
                let l = self.check_expr(left);
                let r = self.check_expr(right);
                match (&l, &r) {
                    (ExprType::Typed(a), ExprType::Typed(b)) if a == b && is_arithmetic(a) => {
                        l.clone()
                    }
                    (ExprType::Typed(_), ExprType::Typed(_)) => {
                        self.mismatch(op.token(), left, right, span);
                        ExprType::AlreadyDiagnosed
                    }
                    _ => ExprType::AlreadyDiagnosed,
                }
            }
            ExprKind::Relational { op, left, right } => {
                let l = self.check_expr(left);
                let r = self.check_expr(right);
                if let (ExprType::Typed(a), ExprType::Typed(b)) = (&l, &r) {
                    if a != b || !a.is_numeric() {
                        self.mismatch(op.token(), left, right, span);
                    }
                }
                Type::Bool.into()
            }
            ExprKind::Equality { op, left, right } => {
                let l = self.check_expr(left);
                let r = self.check_expr(right);
                if !compatible(&l, &r) {
                    self.mismatch(op.token(), left, right, span);
                }
                Type::Bool.into()
            }
            ExprKind::Logical { op, left, right } => {
                let l = self.check_expr(left);
                let r = self.check_expr(right);
                let non_bool = |t: &ExprType| t.is_typed_and(|t| !t.is_bool());
                let both_typed = !l.is_error() && !r.is_error();
                if both_typed && (non_bool(&l) || non_bool(&r)) {
                    self.report(CheckError::IncompatibleOperands {
                        op: op.token(),
                        left: l.clone(),
                        right: r.clone(),
                        span,
                    });
                }
                // A non-bool side is poisoned even when its partner already failed
                if non_bool(&l) {
                    left.mark_error();
                }
                if non_bool(&r) {
                    right.mark_error();
                }
                Type::Bool.into()
            }
            ExprKind::Assign { op, target, value } => {
                let t = self.check_expr(target);
                let v = self.check_expr(value);
                // Compound forms also need an arithmetic target
                let compound_ok =
                    *op == AssignOp::Assign || !t.is_typed_and(|t| !is_arithmetic(t));
                if compatible(&t, &v) && compound_ok {
                    t
                } else {
                    self.report(CheckError::IncompatibleOperands {
                        op: op.token(),
                        left: t,
                        right: v,
                        span,
                    });
                    target.mark_error();
                    ExprType::AlreadyDiagnosed
                }
            }
            ExprKind::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                self.check_test(condition);
                let t = self.check_expr(then_expr);
                let e = self.check_expr(else_expr);
                if e.is_error() {
                    e
                } else {
                    t
                }
            }
            ExprKind::Index { base, index } => {
                let b = self.check_expr(base);
                self.check_expr(index);
                let ExprType::Typed(base_ty) = b else {
                    return ExprType::AlreadyDiagnosed;
                };
                match index_type(&base_ty) {
                    Some(ty) => ty.into(),
                    None => {
                        // Blame the array name when there is one
                        let (name, span) = match base.as_var() {
                            Some(ident) => (ident.name.clone(), ident.span),
                            None => (base.to_source(0), span),
                        };
                        self.report(CheckError::NotAnArray { name, span });
                        ExprType::AlreadyDiagnosed
                    }
                }
            }
            ExprKind::Field { base, field } => {
                let ExprType::Typed(base_ty) = self.check_expr(base) else {
                    return ExprType::AlreadyDiagnosed;
                };
                match swizzle_type(&base_ty, &field.name) {
                    Ok(ty) => ty.into(),
                    Err(kind) => {
                        let field_name = field.name.clone();
                        let base = base.to_source(0);
                        let span = field.span;
                        self.report(match kind {
                            SwizzleError::Inaccessible => CheckError::InaccessibleSwizzle {
                                field: field_name,
                                base,
                                span,
                            },
                            SwizzleError::Invalid => CheckError::InvalidSwizzle {
                                field: field_name,
                                base,
                                span,
                            },
                            SwizzleError::OutOfBound => CheckError::SwizzleOutOfBound {
                                field: field_name,
                                base,
                                span,
                            },
                            SwizzleError::Oversized => CheckError::OversizedVector {
                                field: field_name,
                                base,
                                span,
                            },
                        });
                        ExprType::AlreadyDiagnosed
                    }
                }
            }
            ExprKind::Call { callee, args } => self.check_call(callee, args, span),
        }
    }

    fn check_var(&mut self, ident: &Ident) -> ExprType {
        let found = self
            .symbols()
            .lookup(&ident.name)
            .and_then(|symbol| symbol.value_type())
            .cloned();
        found.unwrap_or_else(|| {
            self.report(CheckError::IdentifierNotDeclared {
                name: ident.name.clone(),
                span: ident.span,
                reason: LookupReason::Variable,
            });
            ExprType::AlreadyDiagnosed
        })
    }

    /// Unary and postfix arithmetic share one rule
    fn check_operand(&mut self, op: &'static str, operand: &mut Expr, span: Span) -> ExprType {
        match self.check_expr(operand) {
            ExprType::Typed(ty) if is_arithmetic(&ty) => ty.into(),
            ExprType::Typed(ty) => {
                self.report(CheckError::IncompatibleOperand {
                    op,
                    operand: ty,
                    span,
                });
                ExprType::AlreadyDiagnosed
            }
            ExprType::AlreadyDiagnosed => ExprType::AlreadyDiagnosed,
        }
    }

    /// Report a binary operator applied to mismatched operands and poison both
    fn mismatch(&mut self, op: &'static str, left: &mut Expr, right: &mut Expr, span: Span) {
        self.report(CheckError::IncompatibleOperands {
            op,
            left: left.ty.clone().unwrap_or(ExprType::AlreadyDiagnosed),
            right: right.ty.clone().unwrap_or(ExprType::AlreadyDiagnosed),
            span,
        });
        left.mark_error();
        right.mark_error();
    }

    fn check_call(&mut self, callee: &Ident, args: &mut [Expr], span: Span) -> ExprType {
        let signature = match self.symbols().lookup_global(&callee.name).map(|s| &s.kind) {
            Some(SymbolKind::Function {
                return_type,
                params,
                ..
            }) => Some((return_type.clone(), params.clone())),
            Some(SymbolKind::Variable { .. }) => {
                self.report(CheckError::NotAFunction {
                    name: callee.name.clone(),
                    span: callee.span,
                });
                None
            }
            None => {
                self.report(CheckError::IdentifierNotDeclared {
                    name: callee.name.clone(),
                    span: callee.span,
                    reason: LookupReason::Function,
                });
                None
            }
        };

        // Arguments are typed even when the callee is unusable
        let actuals: Vec<ExprType> = args.iter_mut().map(|arg| self.check_expr(arg)).collect();

        let Some((return_type, formals)) = signature else {
            return ExprType::AlreadyDiagnosed;
        };

        let name = callee.name.clone();
        let (expected, given) = (formals.len(), actuals.len());
        if given > expected {
            self.report(CheckError::ExtraFormals {
                name,
                expected,
                given,
                span,
            });
            return ExprType::AlreadyDiagnosed;
        }
        if given < expected {
            self.report(CheckError::LessFormals {
                name,
                expected,
                given,
                span,
            });
            return ExprType::AlreadyDiagnosed;
        }

        let mismatch = formals
            .iter()
            .zip(&actuals)
            .enumerate()
            .find(|(_, (formal, actual))| !compatible(formal, actual));
        if let Some((i, (ExprType::Typed(expected), ExprType::Typed(found)))) = mismatch {
            self.report(CheckError::FormalsTypeMismatch {
                name,
                position: i + 1,
                expected: expected.clone(),
                found: found.clone(),
                span: args[i].span,
            });
            return ExprType::AlreadyDiagnosed;
        }

        return_type.into()
    }
}
