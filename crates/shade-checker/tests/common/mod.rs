#![allow(dead_code)]

use shade_ast::*;
use shade_checker::{CheckError, Checker};

pub fn sp() -> Span {
    Span::dummy()
}

pub fn ident(name: &str) -> Ident {
    Ident::new(name, sp())
}

pub fn var(name: &str) -> Expr {
    Expr::var(name, sp())
}

pub fn int(v: i64) -> Expr {
    Expr::int(v, sp())
}

pub fn float(v: f64) -> Expr {
    Expr::float(v, sp())
}

pub fn boolean(v: bool) -> Expr {
    Expr::boolean(v, sp())
}

pub fn swizzle(base: Expr, field: &str) -> Expr {
    Expr::field(base, ident(field))
}

pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::call(ident(name), args, sp())
}

/// Local declaration statement `ty name [= init];`
pub fn local(name: &str, ty: Type, init: Option<Expr>) -> Statement {
    Statement::declaration(VariableDecl::new(ident(name), ty, init, sp()))
}

/// Global declaration `ty name [= init];`
pub fn global(name: &str, ty: Type, init: Option<Expr>) -> Declaration {
    VariableDecl::new(ident(name), ty, init, sp()).into()
}

pub fn expr_stmt(expr: Expr) -> Statement {
    Statement::expr(expr)
}

pub fn block(statements: Vec<Statement>) -> Statement {
    Statement::block(statements, sp())
}

pub fn function(name: &str, ret: Type, params: &[(&str, Type)], body: Vec<Statement>) -> Declaration {
    let params = params
        .iter()
        .map(|(n, t)| VariableDecl::new(ident(n), t.clone(), None, sp()))
        .collect();
    FunctionDecl::new(ident(name), ret, params, Some(Block::new(body, sp())), sp()).into()
}

pub fn prototype(name: &str, ret: Type, params: &[(&str, Type)]) -> Declaration {
    let params = params
        .iter()
        .map(|(n, t)| VariableDecl::new(ident(n), t.clone(), None, sp()))
        .collect();
    FunctionDecl::new(ident(name), ret, params, None, sp()).into()
}

pub fn program(declarations: Vec<Declaration>) -> Program {
    Program::new(declarations, sp())
}

/// Check a program and return the diagnostics in order
pub fn check_program(program: &mut Program) -> Vec<CheckError> {
    let mut checker = Checker::new();
    checker.check_program(program);
    checker.into_reporter()
}

pub fn errors_for(declarations: Vec<Declaration>) -> Vec<CheckError> {
    check_program(&mut program(declarations))
}

/// Diagnostics for `void main() { body }` after the given globals
pub fn errors_in_main(globals: Vec<Declaration>, body: Vec<Statement>) -> Vec<CheckError> {
    let mut declarations = globals;
    declarations.push(function("main", Type::Void, &[], body));
    errors_for(declarations)
}

/// Error codes in report order, for compact assertions
pub fn codes(errors: &[CheckError]) -> Vec<&'static str> {
    errors.iter().map(CheckError::code).collect()
}
