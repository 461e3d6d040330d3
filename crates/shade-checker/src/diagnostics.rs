//! Diagnostic context for rendering check errors
//!
//! A `Diagnostic` is the presentation form of a `CheckError`: stable code,
//! message, primary span, related locations and a short explanation. It
//! serializes to JSON for tooling; the CLI renders it against source text.

use serde::Serialize;
use shade_ast::Span;

use crate::CheckError;

/// A diagnostic with context and explanation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Error code (e.g., "E-SCOPE-001")
    pub code: &'static str,
    /// Broad family: scope, type, call, swizzle or flow
    pub category: &'static str,
    pub message: String,
    /// Primary source span
    pub span: Span,
    /// Related source locations
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<RelatedLocation>,
    /// Human-readable explanation of the rule that was broken
    pub explanation: String,
    /// Suggested way out, when there is an obvious one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// A related source location with context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedLocation {
    /// Label for the location (e.g., "first declared here")
    pub label: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(code: &'static str, category: &'static str, message: String, span: Span) -> Self {
        Self {
            code,
            category,
            message,
            span,
            related: Vec::new(),
            explanation: String::new(),
            help: None,
        }
    }

    /// Add a related location
    pub fn with_related(mut self, label: impl Into<String>, span: Span) -> Self {
        self.related.push(RelatedLocation {
            label: label.into(),
            span,
        });
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Format the diagnostic as a simple string
    pub fn format_simple(&self) -> String {
        let mut output = format!("{}: {}\n", self.code, self.message);

        if !self.explanation.is_empty() {
            output.push_str(&format!("\nExplanation:\n  {}\n", self.explanation));
        }

        if let Some(help) = &self.help {
            output.push_str(&format!("\nHelp:\n  {}\n", help));
        }

        if !self.related.is_empty() {
            output.push_str("\nRelated locations:\n");
            for related in &self.related {
                output.push_str(&format!(
                    "  - {} (at {}..{})\n",
                    related.label, related.span.start, related.span.end
                ));
            }
        }

        output
    }
}

impl From<&CheckError> for Diagnostic {
    fn from(error: &CheckError) -> Self {
        let diag = Diagnostic::new(
            error.code(),
            error.category(),
            error.to_string(),
            error.span(),
        );
        match error {
            CheckError::DeclarationConflict { prior, .. } => diag
                .with_related("first declared here", *prior)
                .with_explanation("a name may be declared only once in a scope; an inner scope may shadow it")
                .with_help("rename one of the declarations or move one into a nested block"),
            CheckError::IdentifierNotDeclared { .. } => diag.with_explanation(
                "names must be declared before use; functions are looked up among globals only",
            ),
            CheckError::InvalidInitialization { .. } => diag
                .with_explanation("an initializer must have exactly the declared type; there are no implicit conversions"),
            CheckError::NotAnArray { .. } => {
                diag.with_explanation("only arrays and matrices can be indexed")
            }
            CheckError::IncompatibleOperand { .. } => diag.with_explanation(
                "negation and increment apply to int, float, vector and matrix operands",
            ),
            CheckError::IncompatibleOperands { op, .. } => {
                let rule = match *op {
                    "&&" | "||" => "logical operators take bool operands",
                    "<" | "<=" | ">" | ">=" => {
                        "comparisons take two int or two float operands of the same type"
                    }
                    "==" | "!=" => "equality compares operands of the same type",
                    _ => "both operands must have the same int, float, vector or matrix type",
                };
                diag.with_explanation(rule)
            }
            CheckError::TestNotBoolean { .. } => diag
                .with_explanation("conditions of if, while, do, for and ?: must be bool"),
            CheckError::NotAFunction { .. } => {
                diag.with_explanation("only functions declared at global scope can be called")
            }
            CheckError::ExtraFormals { .. } | CheckError::LessFormals { .. } => diag
                .with_explanation("a call must pass exactly one argument per formal parameter"),
            CheckError::FormalsTypeMismatch { .. } => diag
                .with_explanation("each argument must have the type of its formal parameter"),
            CheckError::InaccessibleSwizzle { .. } => {
                diag.with_explanation("swizzles apply to vector types only")
            }
            CheckError::InvalidSwizzle { .. } => diag
                .with_explanation("swizzle fields are made of the letters x, y, z and w")
                .with_help("rgba and stpq component names are not supported"),
            CheckError::SwizzleOutOfBound { .. } => diag.with_explanation(
                "a swizzle may only name components the vector has: vec2 has x and y, vec3 adds z",
            ),
            CheckError::OversizedVector { .. } => {
                diag.with_explanation("a swizzle yields at most four components")
            }
            CheckError::ReturnMismatch { .. } => diag
                .with_explanation("a returned value must have the function's declared return type"),
            CheckError::ReturnMissing { .. } => diag
                .with_explanation("a function with a non-void return type must contain a return statement"),
            CheckError::BreakOutsideLoop { .. } => diag.with_explanation(
                "break must appear inside a loop or switch of the same function",
            ),
            CheckError::ContinueOutsideLoop { .. } => diag
                .with_explanation("continue must appear inside a loop of the same function"),
        }
    }
}

impl From<CheckError> for Diagnostic {
    fn from(error: CheckError) -> Self {
        Diagnostic::from(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shade_ast::Type;

    #[test]
    fn test_conflict_points_at_prior_declaration() {
        let diag = Diagnostic::from(CheckError::DeclarationConflict {
            name: "x".to_string(),
            span: Span::new(20, 21),
            prior: Span::new(4, 5),
        });
        assert_eq!(diag.code, "E-SCOPE-001");
        assert_eq!(diag.related.len(), 1);
        assert_eq!(diag.related[0].span, Span::new(4, 5));

        let text = diag.format_simple();
        assert!(text.starts_with("E-SCOPE-001: declaration of 'x' here conflicts"));
        assert!(text.contains("first declared here (at 4..5)"));
    }

    #[test]
    fn test_json_shape() {
        let diag = Diagnostic::from(CheckError::InvalidInitialization {
            name: "f".to_string(),
            span: Span::new(6, 7),
            declared: Type::Float,
            found: Type::Bool,
        });
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["code"], "E-TYPE-001");
        assert_eq!(json["category"], "type");
        assert_eq!(
            json["message"],
            "wrong initialization of identifier 'f': declared 'float', initializer 'bool'"
        );
        assert_eq!(json["span"]["start"], 6);
        assert!(json.get("related").is_none());
        assert!(json.get("help").is_none());
    }

    #[test]
    fn test_operator_specific_explanation() {
        let diag = Diagnostic::from(CheckError::IncompatibleOperands {
            op: "&&",
            left: Type::Int.into(),
            right: Type::Bool.into(),
            span: Span::dummy(),
        });
        assert_eq!(diag.explanation, "logical operators take bool operands");
    }
}
