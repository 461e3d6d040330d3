//! Declaration AST nodes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Block, Expr, Ident, Span, Type};

/// A top-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclarationKind {
    /// Global variable: `uniform mat4 model;`
    Variable(VariableDecl),

    /// Function definition or prototype
    Function(FunctionDecl),
}

impl Declaration {
    pub fn name(&self) -> &Ident {
        match &self.kind {
            DeclarationKind::Variable(var) => &var.name,
            DeclarationKind::Function(func) => &func.name,
        }
    }
}

impl From<VariableDecl> for Declaration {
    fn from(decl: VariableDecl) -> Self {
        let span = decl.span;
        Declaration {
            kind: DeclarationKind::Variable(decl),
            span,
        }
    }
}

impl From<FunctionDecl> for Declaration {
    fn from(decl: FunctionDecl) -> Self {
        let span = decl.span;
        Declaration {
            kind: DeclarationKind::Function(decl),
            span,
        }
    }
}

/// Storage qualifier on a variable or a return type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeQualifier {
    In,
    Out,
    Const,
    Uniform,
}

impl fmt::Display for TypeQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeQualifier::In => "in",
            TypeQualifier::Out => "out",
            TypeQualifier::Const => "const",
            TypeQualifier::Uniform => "uniform",
        })
    }
}

/// Variable declaration, global, local or formal parameter.
///
/// `ty` is absent for qualifier-only declarations such as `const k = 2;`,
/// whose type comes from the initializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: Ident,
    pub qualifier: Option<TypeQualifier>,
    pub ty: Option<Type>,
    pub init: Option<Expr>,
    pub span: Span,
}

impl VariableDecl {
    pub fn new(name: Ident, ty: Type, init: Option<Expr>, span: Span) -> Self {
        Self {
            name,
            qualifier: None,
            ty: Some(ty),
            init,
            span,
        }
    }

    /// Declaration whose type is inferred from its initializer
    pub fn inferred(name: Ident, qualifier: TypeQualifier, init: Option<Expr>, span: Span) -> Self {
        Self {
            name,
            qualifier: Some(qualifier),
            ty: None,
            init,
            span,
        }
    }

    pub fn with_qualifier(mut self, qualifier: TypeQualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }
}

/// Function definition; without a body it is a prototype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Ident,
    pub return_type: Type,
    pub return_qualifier: Option<TypeQualifier>,
    pub params: Vec<VariableDecl>,
    pub body: Option<Block>,
    pub span: Span,
}

impl FunctionDecl {
    pub fn new(
        name: Ident,
        return_type: Type,
        params: Vec<VariableDecl>,
        body: Option<Block>,
        span: Span,
    ) -> Self {
        Self {
            name,
            return_type,
            return_qualifier: None,
            params,
            body,
            span,
        }
    }

    pub fn is_prototype(&self) -> bool {
        self.body.is_none()
    }
}
