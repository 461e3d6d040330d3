//! Shade Semantic Checker
//!
//! Performs scope resolution and type checking over a parsed program,
//! annotating every expression with its resolved type.

mod checker;
mod diagnostics;
mod error;
mod expr;
mod reporter;
mod symbols;
pub mod types;

pub use checker::*;
pub use diagnostics::*;
pub use error::*;
pub use reporter::*;
pub use symbols::*;

use shade_ast::Program;

/// Check a program in place.
///
/// Every expression node ends up holding its resolved type or the error
/// sentinel, whether or not the check succeeds.
pub fn check(program: &mut Program) -> Result<CheckResult, Vec<CheckError>> {
    let mut checker = Checker::new();
    checker.check_program(program);
    if checker.error_count() == 0 {
        Ok(CheckResult {
            globals: checker.globals().to_vec(),
        })
    } else {
        Err(checker.into_reporter())
    }
}

/// Result of a successful check
#[derive(Debug, Default)]
pub struct CheckResult {
    /// Global declarations in source order
    pub globals: Vec<Symbol>,
}
