//! Compatibility rules over the type catalog

use shade_ast::{Arity, ExprType, ScalarKind, Type};

/// Two types are compatible when identical or when either is the error sentinel
pub fn compatible(a: &ExprType, b: &ExprType) -> bool {
    match (a, b) {
        (ExprType::Typed(a), ExprType::Typed(b)) => a == b,
        _ => true,
    }
}

/// Operand family accepted by arithmetic, negation and increment.
///
/// Vectors of `bool` are excluded; vectors of the other component kinds
/// count, as do matrices.
pub fn is_arithmetic(ty: &Type) -> bool {
    match ty {
        Type::Vector { component, .. } => *component != ScalarKind::Bool,
        _ => ty.is_numeric() || ty.is_matrix(),
    }
}

/// Why a swizzle was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwizzleError {
    /// Base is not a vector
    Inaccessible,
    /// Field contains a character outside `xyzw`, or is empty
    Invalid,
    /// Field names a component the base does not have
    OutOfBound,
    /// Field is longer than four components
    Oversized,
}

fn component_index(c: char) -> Option<usize> {
    match c {
        'x' => Some(0),
        'y' => Some(1),
        'z' => Some(2),
        'w' => Some(3),
        _ => None,
    }
}

/// Result type of `base.field`.
///
/// Checks run in order and the first failure wins: vector base, valid
/// characters, components within the base's arity, length at most four.
pub fn swizzle_type(base: &Type, field: &str) -> Result<Type, SwizzleError> {
    let (component, arity) = match base {
        Type::Vector { component, arity } => (*component, *arity),
        _ => return Err(SwizzleError::Inaccessible),
    };

    let indices = field
        .chars()
        .map(component_index)
        .collect::<Option<Vec<_>>>()
        .filter(|indices| !indices.is_empty())
        .ok_or(SwizzleError::Invalid)?;

    if indices.iter().any(|&i| i >= arity.count()) {
        return Err(SwizzleError::OutOfBound);
    }

    match indices.len() {
        1 => base.component_type().ok_or(SwizzleError::Inaccessible),
        n => Arity::from_count(n)
            .map(|arity| Type::vector(component, arity))
            .ok_or(SwizzleError::Oversized),
    }
}

/// Result type of `base[i]`: the element of an array, or a matrix column
pub fn index_type(base: &Type) -> Option<Type> {
    base.element_type().cloned().or_else(|| base.column_type())
}
