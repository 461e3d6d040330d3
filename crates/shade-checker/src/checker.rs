//! Main semantic checker: declarations and statements

use log::{debug, info, trace};
use shade_ast::*;

use crate::types::compatible;
use crate::{CheckError, LookupReason, Reporter, ScopeKind, Symbol, SymbolKind, SymbolTable};

/// Single-pass checker over one program.
///
/// Diagnostics go to the reporter in traversal order; the running count
/// survives across programs checked with the same checker.
pub struct Checker<R: Reporter = Vec<CheckError>> {
    symbols: SymbolTable,
    reporter: R,
    error_count: usize,
    globals: Vec<Symbol>,
}

impl Checker {
    pub fn new() -> Self {
        Self::with_reporter(Vec::new())
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Reporter> Checker<R> {
    pub fn with_reporter(reporter: R) -> Self {
        Self {
            symbols: SymbolTable::new(),
            reporter,
            error_count: 0,
            globals: Vec::new(),
        }
    }

    /// Number of diagnostics reported so far
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Global symbols of the last checked program, in declaration order
    pub fn globals(&self) -> &[Symbol] {
        &self.globals
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Check a whole program, annotating every expression with its type
    pub fn check_program(&mut self, program: &mut Program) {
        let before = self.error_count;
        self.symbols.enter_scope(ScopeKind::Global);
        for decl in &mut program.declarations {
            self.check_declaration(decl);
        }
        self.globals = self
            .symbols
            .exit_scope()
            .map(|scope| scope.into_symbols())
            .unwrap_or_default();
        info!(
            "checked {} declaration(s), {} diagnostic(s)",
            program.declarations.len(),
            self.error_count - before
        );
    }

    pub(crate) fn report(&mut self, error: CheckError) {
        debug!("{} at {:?}: {}", error.code(), error.span().range(), error);
        self.error_count += 1;
        self.reporter.report(error);
    }

    pub(crate) fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Declare in the current scope, reporting a clash with an earlier name
    fn declare(&mut self, symbol: Symbol) {
        let name = symbol.name.clone();
        let span = symbol.span;
        if let Some(prior) = self.symbols.declare(symbol) {
            self.report(CheckError::DeclarationConflict {
                name,
                span,
                prior: prior.span,
            });
        }
    }

    // ===== Declarations =====

    fn check_declaration(&mut self, decl: &mut Declaration) {
        match &mut decl.kind {
            DeclarationKind::Variable(var) => self.check_variable(var),
            DeclarationKind::Function(func) => self.check_function(func),
        }
    }

    fn check_variable(&mut self, var: &mut VariableDecl) {
        let name = var.name.name.clone();
        let span = var.name.span;

        let Some(declared) = var.ty.clone() else {
            // Qualifier-only declaration: the initializer supplies the type
            let ty = match &mut var.init {
                Some(init) => self.check_expr(init),
                None => {
                    self.report(CheckError::IdentifierNotDeclared {
                        name: name.clone(),
                        span,
                        reason: LookupReason::Type,
                    });
                    ExprType::AlreadyDiagnosed
                }
            };
            self.declare(Symbol {
                name,
                span,
                kind: SymbolKind::Variable {
                    ty,
                    qualifier: var.qualifier,
                },
            });
            return;
        };

        self.declare(Symbol {
            name: name.clone(),
            span,
            kind: SymbolKind::Variable {
                ty: declared.clone().into(),
                qualifier: var.qualifier,
            },
        });

        if let Some(init) = &mut var.init {
            let found = self.check_expr(init);
            if !compatible(&declared.clone().into(), &found) {
                if let ExprType::Typed(found) = found {
                    self.report(CheckError::InvalidInitialization {
                        name,
                        span,
                        declared,
                        found,
                    });
                }
                init.mark_error();
            }
        }
    }

    fn check_function(&mut self, func: &mut FunctionDecl) {
        trace!("checking function '{}'", func.name);

        let params = func
            .params
            .iter()
            .map(|p| p.ty.clone().map_or(ExprType::AlreadyDiagnosed, ExprType::Typed))
            .collect();
        self.declare(Symbol {
            name: func.name.name.clone(),
            span: func.name.span,
            kind: SymbolKind::Function {
                return_type: func.return_type.clone(),
                params,
                defined: func.body.is_some(),
            },
        });

        // Formals and body share one scope
        self.symbols.enter_function(&func.name.name);
        for param in &mut func.params {
            self.check_variable(param);
        }
        if let Some(body) = &mut func.body {
            for stmt in &mut body.statements {
                self.check_statement(stmt);
            }
            if !func.return_type.is_void() && !self.symbols.return_seen() {
                self.report(CheckError::ReturnMissing {
                    function: func.name.name.clone(),
                    span: func.name.span,
                });
            }
        }
        self.symbols.exit_scope();
    }

    // ===== Statements =====

    fn check_statement(&mut self, stmt: &mut Statement) {
        let span = stmt.span;
        match &mut stmt.kind {
            StatementKind::Block(block) => {
                self.symbols.enter_scope(ScopeKind::Block);
                self.check_block(block);
                self.symbols.exit_scope();
            }
            StatementKind::Declaration(var) => self.check_variable(var),
            StatementKind::Expr(expr) => {
                self.check_expr(expr);
            }
            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.symbols.enter_scope(ScopeKind::Conditional);
                self.check_test(condition);
                self.check_body(then_branch);
                self.symbols.exit_scope();

                if let Some(else_branch) = else_branch {
                    self.symbols.enter_scope(ScopeKind::Conditional);
                    self.check_body(else_branch);
                    self.symbols.exit_scope();
                }
            }
            StatementKind::While { condition, body } => {
                self.symbols.enter_scope(ScopeKind::Loop);
                self.check_test(condition);
                self.check_body(body);
                self.symbols.exit_scope();
            }
            StatementKind::DoWhile { body, condition } => {
                self.symbols.enter_scope(ScopeKind::Loop);
                self.check_body(body);
                self.check_test(condition);
                self.symbols.exit_scope();
            }
            StatementKind::For {
                init,
                condition,
                step,
                body,
            } => {
                self.symbols.enter_scope(ScopeKind::Loop);
                match init {
                    Some(ForInit::Expr(expr)) => {
                        self.check_expr(expr);
                    }
                    Some(ForInit::Declaration(var)) => self.check_variable(var),
                    None => {}
                }
                if let Some(condition) = condition {
                    self.check_test(condition);
                }
                if let Some(step) = step {
                    self.check_expr(step);
                }
                self.check_body(body);
                self.symbols.exit_scope();
            }
            StatementKind::Return(value) => self.check_return(value.as_mut(), span),
            StatementKind::Break => {
                if !self.symbols.is_inside_loop() && !self.symbols.is_inside_switch() {
                    self.report(CheckError::BreakOutsideLoop { span });
                }
            }
            StatementKind::Continue => {
                if !self.symbols.is_inside_loop() {
                    self.report(CheckError::ContinueOutsideLoop { span });
                }
            }
            StatementKind::Switch {
                scrutinee,
                cases,
                default,
            } => {
                self.symbols.enter_scope(ScopeKind::Switch);
                self.check_expr(scrutinee);
                for case in cases {
                    self.check_expr(&mut case.label);
                    for stmt in &mut case.body {
                        self.check_statement(stmt);
                    }
                }
                if let Some(default) = default {
                    for stmt in &mut default.body {
                        self.check_statement(stmt);
                    }
                }
                self.symbols.exit_scope();
            }
        }
    }

    fn check_block(&mut self, block: &mut Block) {
        for stmt in &mut block.statements {
            self.check_statement(stmt);
        }
    }

    /// Body of a compound statement; a braced body reuses the scope already open
    fn check_body(&mut self, body: &mut Statement) {
        match &mut body.kind {
            StatementKind::Block(block) => self.check_block(block),
            _ => self.check_statement(body),
        }
    }

    /// Controlling expression of `if`, loops and `?:`
    pub(crate) fn check_test(&mut self, test: &mut Expr) {
        let ty = self.check_expr(test);
        if ty.is_typed_and(|t| !t.is_bool()) {
            self.report(CheckError::TestNotBoolean { span: test.span });
            test.mark_error();
        }
    }

    fn check_return(&mut self, value: Option<&mut Expr>, span: Span) {
        self.symbols.mark_return();
        let Some(value) = value else {
            return;
        };
        let given = self.check_expr(value);
        let expected = match self.symbols.current_function().map(|s| &s.kind) {
            Some(SymbolKind::Function { return_type, .. }) => return_type.clone(),
            _ => return,
        };
        if let ExprType::Typed(given) = given {
            if given != expected {
                self.report(CheckError::ReturnMismatch {
                    given,
                    expected,
                    span,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp() -> Span {
        Span::dummy()
    }

    fn ident(name: &str) -> Ident {
        Ident::new(name, sp())
    }

    fn function(name: &str, ret: Type, body: Vec<Statement>) -> Declaration {
        FunctionDecl::new(ident(name), ret, vec![], Some(Block::new(body, sp())), sp()).into()
    }

    fn run(declarations: Vec<Declaration>) -> (Program, Vec<CheckError>) {
        let mut program = Program::new(declarations, sp());
        let mut checker = Checker::new();
        checker.check_program(&mut program);
        (program, checker.into_reporter())
    }

    #[test]
    fn test_block_opens_scope() {
        let (_, errors) = run(vec![function(
            "main",
            Type::Void,
            vec![
                Statement::declaration(VariableDecl::new(ident("x"), Type::Int, None, sp())),
                Statement::block(
                    vec![Statement::declaration(VariableDecl::new(
                        ident("x"),
                        Type::Float,
                        None,
                        sp(),
                    ))],
                    sp(),
                ),
            ],
        )]);
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_formals_share_body_scope() {
        let body = Block::new(
            vec![Statement::declaration(VariableDecl::new(
                ident("n"),
                Type::Int,
                None,
                sp(),
            ))],
            sp(),
        );
        let func = FunctionDecl::new(
            ident("f"),
            Type::Void,
            vec![VariableDecl::new(ident("n"), Type::Int, None, sp())],
            Some(body),
            sp(),
        );
        let (_, errors) = run(vec![func.into()]);
        assert!(matches!(
            errors.as_slice(),
            [CheckError::DeclarationConflict { name, .. }] if name == "n"
        ));
    }

    #[test]
    fn test_inferred_declaration_takes_initializer_type() {
        let k = VariableDecl::inferred(
            ident("k"),
            TypeQualifier::Const,
            Some(Expr::float(2.0, sp())),
            sp(),
        );
        let bad = VariableDecl::inferred(ident("j"), TypeQualifier::Const, None, sp());
        let mut program = Program::new(vec![k.into(), bad.into()], sp());
        let mut checker = Checker::new();
        checker.check_program(&mut program);

        assert_eq!(checker.error_count(), 1);
        assert!(matches!(
            checker.reporter().as_slice(),
            [CheckError::IdentifierNotDeclared {
                reason: LookupReason::Type,
                ..
            }]
        ));
        let k = &checker.globals()[0];
        assert_eq!(k.value_type(), Some(&ExprType::Typed(Type::Float)));
        assert_eq!(checker.globals()[1].value_type(), Some(&ExprType::AlreadyDiagnosed));
    }

    #[test]
    fn test_return_in_void_function_with_value() {
        let (_, errors) = run(vec![function(
            "main",
            Type::Void,
            vec![Statement::ret(Some(Expr::int(1, sp())), sp())],
        )]);
        assert!(matches!(
            errors.as_slice(),
            [CheckError::ReturnMismatch {
                given: Type::Int,
                expected: Type::Void,
                ..
            }]
        ));
    }

    #[test]
    fn test_error_count_accumulates_across_programs() {
        let mut checker = Checker::new();
        for _ in 0..2 {
            let mut program = Program::new(
                vec![function("f", Type::Int, vec![])],
                sp(),
            );
            checker.check_program(&mut program);
        }
        assert_eq!(checker.error_count(), 2);
    }
}
