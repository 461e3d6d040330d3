//! Shade - Semantic analysis for a small shading language
//!
//! This is the root workspace crate that provides end-to-end tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use shade_ast as ast;
pub use shade_checker as checker;

pub use shade_checker::{check, CheckError, CheckResult};
