//! Scope stack for name resolution

use std::fmt;

use indexmap::IndexMap;
use log::{debug, warn};
use shade_ast::{ExprType, Span, Type, TypeQualifier};

/// What opened a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Loop,
    Conditional,
    Switch,
    Block,
}

/// A declared name
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    /// Span of the declaring identifier
    pub span: Span,
    pub kind: SymbolKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable {
        ty: ExprType,
        qualifier: Option<TypeQualifier>,
    },
    Function {
        return_type: Type,
        params: Vec<ExprType>,
        /// False for a prototype
        defined: bool,
    },
}

impl Symbol {
    pub fn variable(name: impl Into<String>, span: Span, ty: ExprType) -> Self {
        Self {
            name: name.into(),
            span,
            kind: SymbolKind::Variable {
                ty,
                qualifier: None,
            },
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function { .. })
    }

    /// Type a reference to this name evaluates to; `None` for functions
    pub fn value_type(&self) -> Option<&ExprType> {
        match &self.kind {
            SymbolKind::Variable { ty, .. } => Some(ty),
            SymbolKind::Function { .. } => None,
        }
    }
}

/// Renders as a declaration header: `uniform vec3 light`, `float f(vec3, int)`
impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SymbolKind::Variable { ty, qualifier } => {
                if let Some(q) = qualifier {
                    write!(f, "{} ", q)?;
                }
                write!(f, "{} {}", ty, self.name)
            }
            SymbolKind::Function {
                return_type,
                params,
                defined,
            } => {
                let params = params
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{} {}({})", return_type, self.name, params)?;
                if !defined {
                    f.write_str(" [prototype]")?;
                }
                Ok(())
            }
        }
    }
}

/// One level of the scope stack, names kept in declaration order
#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    symbols: IndexMap<String, Symbol>,
    /// Name of the function a `Function` scope belongs to
    owner: Option<String>,
    return_seen: bool,
}

impl Scope {
    fn new(kind: ScopeKind, owner: Option<String>) -> Self {
        Self {
            kind,
            symbols: IndexMap::new(),
            owner,
            return_seen: false,
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn into_symbols(self) -> Vec<Symbol> {
        self.symbols.into_values().collect()
    }
}

/// Stack of lexical scopes, innermost last
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new scope
    pub fn enter_scope(&mut self, kind: ScopeKind) {
        debug!("enter {:?} scope at depth {}", kind, self.scopes.len());
        self.scopes.push(Scope::new(kind, None));
    }

    /// Enter the scope of the named function's body, with its return flag cleared
    pub fn enter_function(&mut self, name: &str) {
        debug!("enter function scope of '{}'", name);
        self.scopes
            .push(Scope::new(ScopeKind::Function, Some(name.to_string())));
    }

    /// Exit the current scope, handing back what it held
    pub fn exit_scope(&mut self) -> Option<Scope> {
        let scope = self.scopes.pop();
        if let Some(scope) = &scope {
            debug!(
                "exit {:?} scope with {} symbol(s)",
                scope.kind,
                scope.symbols.len()
            );
        }
        scope
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declare a symbol in the current scope.
    ///
    /// When the name is already taken in this scope the new symbol replaces
    /// the old one, which is returned so the caller can report the conflict.
    pub fn declare(&mut self, symbol: Symbol) -> Option<Symbol> {
        let Some(scope) = self.scopes.last_mut() else {
            warn!("'{}' declared with no open scope; dropped", symbol.name);
            return None;
        };
        debug!("declare '{}' in {:?} scope", symbol.name, scope.kind);
        // The replacement takes the later position
        let prior = scope.symbols.shift_remove(&symbol.name);
        scope.symbols.insert(symbol.name.clone(), symbol);
        prior
    }

    /// Look up a name, innermost scope first
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
    }

    /// Look up a name in the current scope only
    pub fn lookup_current(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last()?.symbols.get(name)
    }

    /// Look up a name in the outermost scope only
    pub fn lookup_global(&self, name: &str) -> Option<&Symbol> {
        self.scopes.first()?.symbols.get(name)
    }

    /// Scopes from innermost out to the nearest function boundary, inclusive
    fn enclosing(&self) -> impl Iterator<Item = &Scope> {
        let mut crossed = false;
        self.scopes.iter().rev().take_while(move |scope| {
            let take = !crossed;
            crossed |= scope.kind == ScopeKind::Function;
            take
        })
    }

    pub fn is_inside_loop(&self) -> bool {
        self.enclosing().any(|s| s.kind == ScopeKind::Loop)
    }

    pub fn is_inside_switch(&self) -> bool {
        self.enclosing().any(|s| s.kind == ScopeKind::Switch)
    }

    fn function_scope_mut(&mut self) -> Option<&mut Scope> {
        self.scopes
            .iter_mut()
            .rev()
            .find(|s| s.kind == ScopeKind::Function)
    }

    /// Symbol of the innermost function being checked
    pub fn current_function(&self) -> Option<&Symbol> {
        let owner = self
            .scopes
            .iter()
            .rev()
            .find(|s| s.kind == ScopeKind::Function)?
            .owner
            .as_deref()?;
        self.lookup_global(owner).filter(|s| s.is_function())
    }

    /// Record that the current function has a `return`
    pub fn mark_return(&mut self) {
        if let Some(scope) = self.function_scope_mut() {
            scope.return_seen = true;
        }
    }

    pub fn return_seen(&self) -> bool {
        self.scopes
            .iter()
            .rev()
            .find(|s| s.kind == ScopeKind::Function)
            .map_or(false, |s| s.return_seen)
    }

    /// Snapshot of the outermost scope in declaration order
    pub fn globals(&self) -> Vec<Symbol> {
        self.scopes
            .first()
            .map(|scope| scope.symbols().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, ty: Type) -> Symbol {
        Symbol::variable(name, Span::dummy(), ty.into())
    }

    #[test]
    fn test_conflict_replaces_and_returns_prior() {
        let mut table = SymbolTable::new();
        table.enter_scope(ScopeKind::Global);
        assert!(table.declare(var("x", Type::Int)).is_none());
        let prior = table.declare(var("x", Type::Float)).unwrap();
        assert_eq!(prior.value_type(), Some(&ExprType::Typed(Type::Int)));
        assert_eq!(
            table.lookup("x").and_then(Symbol::value_type),
            Some(&ExprType::Typed(Type::Float))
        );
    }

    #[test]
    fn test_declare_without_scope_is_dropped() {
        let mut table = SymbolTable::new();
        assert!(table.declare(var("x", Type::Int)).is_none());
        assert_eq!(table.depth(), 0);
        assert!(table.lookup("x").is_none());
        assert!(table.globals().is_empty());
    }

    #[test]
    fn test_shadowing_in_nested_scope() {
        let mut table = SymbolTable::new();
        table.enter_scope(ScopeKind::Global);
        table.declare(var("x", Type::Int));
        table.enter_scope(ScopeKind::Block);
        assert!(table.declare(var("x", Type::Bool)).is_none());
        assert!(table.lookup_current("x").is_some());
        assert_eq!(
            table.lookup("x").and_then(Symbol::value_type),
            Some(&ExprType::Typed(Type::Bool))
        );
        assert_eq!(
            table.lookup_global("x").and_then(Symbol::value_type),
            Some(&ExprType::Typed(Type::Int))
        );
        table.exit_scope();
        assert_eq!(
            table.lookup("x").and_then(Symbol::value_type),
            Some(&ExprType::Typed(Type::Int))
        );
        assert!(table.lookup("y").is_none());
    }

    #[test]
    fn test_loop_and_switch_queries_stop_at_function_boundary() {
        let mut table = SymbolTable::new();
        table.enter_scope(ScopeKind::Global);
        table.enter_scope(ScopeKind::Loop);
        table.enter_function("inner");
        table.enter_scope(ScopeKind::Conditional);
        assert!(!table.is_inside_loop());
        table.enter_scope(ScopeKind::Switch);
        assert!(table.is_inside_switch());
        assert!(!table.is_inside_loop());
        table.exit_scope();
        table.exit_scope();
        table.exit_scope();
        assert!(table.is_inside_loop());
        assert_eq!(table.depth(), 2);
    }

    #[test]
    fn test_return_flag_lives_on_function_scope() {
        let mut table = SymbolTable::new();
        table.enter_scope(ScopeKind::Global);
        table.declare(Symbol {
            name: "f".to_string(),
            span: Span::dummy(),
            kind: SymbolKind::Function {
                return_type: Type::Int,
                params: vec![],
                defined: true,
            },
        });
        table.enter_function("f");
        table.enter_scope(ScopeKind::Conditional);
        assert!(!table.return_seen());
        table.mark_return();
        table.exit_scope();
        assert!(table.return_seen());
        assert_eq!(table.current_function().map(|s| s.name.as_str()), Some("f"));

        table.exit_scope();
        table.enter_function("f");
        assert!(!table.return_seen());
    }

    #[test]
    fn test_symbol_display() {
        let light = Symbol {
            name: "light".to_string(),
            span: Span::dummy(),
            kind: SymbolKind::Variable {
                ty: Type::VEC3.into(),
                qualifier: Some(TypeQualifier::Uniform),
            },
        };
        assert_eq!(light.to_string(), "uniform vec3 light");

        let f = Symbol {
            name: "f".to_string(),
            span: Span::dummy(),
            kind: SymbolKind::Function {
                return_type: Type::Float,
                params: vec![Type::VEC3.into(), ExprType::AlreadyDiagnosed],
                defined: false,
            },
        };
        assert_eq!(f.to_string(), "float f(vec3, error) [prototype]");
    }

    #[test]
    fn test_globals_keep_declaration_order() {
        let mut table = SymbolTable::new();
        table.enter_scope(ScopeKind::Global);
        for name in ["b", "a", "c"] {
            table.declare(var(name, Type::Float));
        }
        table.declare(var("b", Type::Int));
        let names: Vec<_> = table.globals().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }
}
