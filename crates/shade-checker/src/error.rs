//! Check errors, one variant per diagnostic kind

use std::fmt;

use serde::Serialize;
use shade_ast::{ExprType, Span, Type};
use thiserror::Error;

/// What a failed name lookup was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupReason {
    Type,
    Variable,
    Function,
}

impl fmt::Display for LookupReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LookupReason::Type => "type",
            LookupReason::Variable => "variable",
            LookupReason::Function => "function",
        })
    }
}

/// A semantic violation found while checking a program.
///
/// None of these stop the pass: the checker recovers locally, records the
/// error and keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    /// E-SCOPE-001: Name declared twice in the same scope
    #[error("declaration of '{name}' here conflicts with an earlier declaration")]
    DeclarationConflict {
        name: String,
        span: Span,
        /// Where the earlier declaration lives
        prior: Span,
    },

    /// E-SCOPE-002: Name not found
    #[error("no declaration found for {reason} '{name}'")]
    IdentifierNotDeclared {
        name: String,
        span: Span,
        reason: LookupReason,
    },

    /// E-TYPE-001: Initializer type differs from the declared type
    #[error("wrong initialization of identifier '{name}': declared '{declared}', initializer '{found}'")]
    InvalidInitialization {
        name: String,
        span: Span,
        declared: Type,
        found: Type,
    },

    /// E-TYPE-002
    #[error("'{name}' is not an array")]
    NotAnArray { name: String, span: Span },

    /// E-TYPE-003: Unary or postfix operator applied to the wrong type
    #[error("incompatible operand: {op} {operand}")]
    IncompatibleOperand {
        op: &'static str,
        operand: Type,
        span: Span,
    },

    /// E-TYPE-004
    #[error("incompatible operands: {left} {op} {right}")]
    IncompatibleOperands {
        op: &'static str,
        left: ExprType,
        right: ExprType,
        span: Span,
    },

    /// E-TYPE-005: Controlling expression is not `bool`
    #[error("test expression must have boolean type")]
    TestNotBoolean { span: Span },

    /// E-CALL-001
    #[error("'{name}' is not a function")]
    NotAFunction { name: String, span: Span },

    /// E-CALL-002
    #[error("extra arguments given to function '{name}': expected {expected}, given {given}")]
    ExtraFormals {
        name: String,
        expected: usize,
        given: usize,
        span: Span,
    },

    /// E-CALL-003
    #[error("less arguments given to function '{name}': expected {expected}, given {given}")]
    LessFormals {
        name: String,
        expected: usize,
        given: usize,
        span: Span,
    },

    /// E-CALL-004: Argument type differs from the formal at `position` (1-based)
    #[error("formal type mismatch in function '{name}' at pos {position}: expected '{expected}', given '{found}'")]
    FormalsTypeMismatch {
        name: String,
        position: usize,
        expected: Type,
        found: Type,
        span: Span,
    },

    /// E-SWIZZLE-001
    #[error("{base} non-vector type can't have swizzle '{field}'")]
    InaccessibleSwizzle {
        field: String,
        /// Source text of the base expression
        base: String,
        span: Span,
    },

    /// E-SWIZZLE-002
    #[error("{base} swizzle '{field}' is not proper subset of [xyzw]")]
    InvalidSwizzle {
        field: String,
        base: String,
        span: Span,
    },

    /// E-SWIZZLE-003
    #[error("{base} swizzle '{field}' exceeds its vector component")]
    SwizzleOutOfBound {
        field: String,
        base: String,
        span: Span,
    },

    /// E-SWIZZLE-004
    #[error("{base} swizzle '{field}' generates a vector longer than vec4")]
    OversizedVector {
        field: String,
        base: String,
        span: Span,
    },

    /// E-FLOW-001
    #[error("incompatible return: {given} given, {expected} expected")]
    ReturnMismatch {
        given: Type,
        expected: Type,
        span: Span,
    },

    /// E-FLOW-002: Non-void function body never returns
    #[error("declaration of '{function}' doesn't have a return")]
    ReturnMissing { function: String, span: Span },

    /// E-FLOW-003
    #[error("break is only allowed inside a loop or switch")]
    BreakOutsideLoop { span: Span },

    /// E-FLOW-004
    #[error("continue is only allowed inside a loop")]
    ContinueOutsideLoop { span: Span },
}

impl CheckError {
    /// Get the source span of this error
    pub fn span(&self) -> Span {
        match self {
            CheckError::DeclarationConflict { span, .. }
            | CheckError::IdentifierNotDeclared { span, .. }
            | CheckError::InvalidInitialization { span, .. }
            | CheckError::NotAnArray { span, .. }
            | CheckError::IncompatibleOperand { span, .. }
            | CheckError::IncompatibleOperands { span, .. }
            | CheckError::TestNotBoolean { span }
            | CheckError::NotAFunction { span, .. }
            | CheckError::ExtraFormals { span, .. }
            | CheckError::LessFormals { span, .. }
            | CheckError::FormalsTypeMismatch { span, .. }
            | CheckError::InaccessibleSwizzle { span, .. }
            | CheckError::InvalidSwizzle { span, .. }
            | CheckError::SwizzleOutOfBound { span, .. }
            | CheckError::OversizedVector { span, .. }
            | CheckError::ReturnMismatch { span, .. }
            | CheckError::ReturnMissing { span, .. }
            | CheckError::BreakOutsideLoop { span }
            | CheckError::ContinueOutsideLoop { span } => *span,
        }
    }

    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            CheckError::DeclarationConflict { .. } => "E-SCOPE-001",
            CheckError::IdentifierNotDeclared { .. } => "E-SCOPE-002",
            CheckError::InvalidInitialization { .. } => "E-TYPE-001",
            CheckError::NotAnArray { .. } => "E-TYPE-002",
            CheckError::IncompatibleOperand { .. } => "E-TYPE-003",
            CheckError::IncompatibleOperands { .. } => "E-TYPE-004",
            CheckError::TestNotBoolean { .. } => "E-TYPE-005",
            CheckError::NotAFunction { .. } => "E-CALL-001",
            CheckError::ExtraFormals { .. } => "E-CALL-002",
            CheckError::LessFormals { .. } => "E-CALL-003",
            CheckError::FormalsTypeMismatch { .. } => "E-CALL-004",
            CheckError::InaccessibleSwizzle { .. } => "E-SWIZZLE-001",
            CheckError::InvalidSwizzle { .. } => "E-SWIZZLE-002",
            CheckError::SwizzleOutOfBound { .. } => "E-SWIZZLE-003",
            CheckError::OversizedVector { .. } => "E-SWIZZLE-004",
            CheckError::ReturnMismatch { .. } => "E-FLOW-001",
            CheckError::ReturnMissing { .. } => "E-FLOW-002",
            CheckError::BreakOutsideLoop { .. } => "E-FLOW-003",
            CheckError::ContinueOutsideLoop { .. } => "E-FLOW-004",
        }
    }

    /// Broad family, taken from the code
    pub fn category(&self) -> &'static str {
        match self.code().split('-').nth(1) {
            Some("SCOPE") => "scope",
            Some("TYPE") => "type",
            Some("CALL") => "call",
            Some("SWIZZLE") => "swizzle",
            _ => "flow",
        }
    }
}
