//! The type catalog
//!
//! Built-in scalar, vector and matrix types are plain constants; arrays and
//! named user types are constructed on demand. Nothing here is mutable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Element kind of a scalar or of a vector component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Bool,
    Int,
    UInt,
    Float,
}

impl ScalarKind {
    /// Keyword prefix used by the vector type of this component kind
    fn vector_prefix(self) -> &'static str {
        match self {
            ScalarKind::Bool => "b",
            ScalarKind::Int => "i",
            ScalarKind::UInt => "u",
            ScalarKind::Float => "",
        }
    }
}

/// Component count of a vector, or row/column count of a square matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Arity {
    Two,
    Three,
    Four,
}

impl Arity {
    pub fn count(self) -> usize {
        match self {
            Arity::Two => 2,
            Arity::Three => 3,
            Arity::Four => 4,
        }
    }

    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            2 => Some(Arity::Two),
            3 => Some(Arity::Three),
            4 => Some(Arity::Four),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Arity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Arity::from_count(value as usize)
            .ok_or_else(|| format!("arity must be 2, 3 or 4, got {}", value))
    }
}

impl From<Arity> for u8 {
    fn from(arity: Arity) -> u8 {
        arity.count() as u8
    }
}

/// A type in the shading language
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Void,
    Bool,
    Int,
    UInt,
    Float,

    /// `vec3`, `ivec2`, `uvec4`, `bvec2`, ...
    Vector { component: ScalarKind, arity: Arity },

    /// `mat2`, `mat3`, `mat4` (float only)
    Matrix(Arity),

    /// `float[4]`
    Array { element: Box<Type>, len: usize },

    /// Reference to a user type by name
    Named(String),
}

impl Type {
    pub const VEC2: Type = Type::vector(ScalarKind::Float, Arity::Two);
    pub const VEC3: Type = Type::vector(ScalarKind::Float, Arity::Three);
    pub const VEC4: Type = Type::vector(ScalarKind::Float, Arity::Four);
    pub const IVEC2: Type = Type::vector(ScalarKind::Int, Arity::Two);
    pub const IVEC3: Type = Type::vector(ScalarKind::Int, Arity::Three);
    pub const IVEC4: Type = Type::vector(ScalarKind::Int, Arity::Four);
    pub const UVEC2: Type = Type::vector(ScalarKind::UInt, Arity::Two);
    pub const UVEC3: Type = Type::vector(ScalarKind::UInt, Arity::Three);
    pub const UVEC4: Type = Type::vector(ScalarKind::UInt, Arity::Four);
    pub const BVEC2: Type = Type::vector(ScalarKind::Bool, Arity::Two);
    pub const BVEC3: Type = Type::vector(ScalarKind::Bool, Arity::Three);
    pub const BVEC4: Type = Type::vector(ScalarKind::Bool, Arity::Four);
    pub const MAT2: Type = Type::Matrix(Arity::Two);
    pub const MAT3: Type = Type::Matrix(Arity::Three);
    pub const MAT4: Type = Type::Matrix(Arity::Four);

    pub const fn vector(component: ScalarKind, arity: Arity) -> Type {
        Type::Vector { component, arity }
    }

    pub fn scalar(kind: ScalarKind) -> Type {
        match kind {
            ScalarKind::Bool => Type::Bool,
            ScalarKind::Int => Type::Int,
            ScalarKind::UInt => Type::UInt,
            ScalarKind::Float => Type::Float,
        }
    }

    pub fn array(element: Type, len: usize) -> Type {
        Type::Array {
            element: Box::new(element),
            len,
        }
    }

    pub fn named(name: impl Into<String>) -> Type {
        Type::Named(name.into())
    }

    /// Keyword spelling of a built-in type; `None` for arrays and named types
    pub fn keyword(&self) -> Option<String> {
        let keyword = match self {
            Type::Void => "void".to_string(),
            Type::Bool => "bool".to_string(),
            Type::Int => "int".to_string(),
            Type::UInt => "uint".to_string(),
            Type::Float => "float".to_string(),
            Type::Vector { component, arity } => {
                format!("{}vec{}", component.vector_prefix(), arity.count())
            }
            Type::Matrix(arity) => format!("mat{}", arity.count()),
            Type::Array { .. } | Type::Named(_) => return None,
        };
        Some(keyword)
    }

    /// Int or Float
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Type::Vector { .. })
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, Type::Matrix(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// Scalar type of a vector's components
    pub fn component_type(&self) -> Option<Type> {
        match self {
            Type::Vector { component, .. } => Some(Type::scalar(*component)),
            _ => None,
        }
    }

    /// Column vector type of a matrix: mat3 -> vec3
    pub fn column_type(&self) -> Option<Type> {
        match self {
            Type::Matrix(arity) => Some(Type::vector(ScalarKind::Float, *arity)),
            _ => None,
        }
    }

    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array { element, .. } => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Array { element, len } => write!(f, "{}[{}]", element, len),
            Type::Named(name) => f.write_str(name),
            builtin => match builtin.keyword() {
                Some(keyword) => f.write_str(&keyword),
                None => Ok(()),
            },
        }
    }
}

/// The type recorded on an expression once it has been checked.
///
/// `AlreadyDiagnosed` is the error sentinel: a diagnostic has been issued
/// for this expression (or something it depends on) and nothing downstream
/// may report another incompatibility because of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprType {
    Typed(Type),
    AlreadyDiagnosed,
}

impl ExprType {
    pub fn is_error(&self) -> bool {
        matches!(self, ExprType::AlreadyDiagnosed)
    }

    pub fn as_type(&self) -> Option<&Type> {
        match self {
            ExprType::Typed(ty) => Some(ty),
            ExprType::AlreadyDiagnosed => None,
        }
    }

    /// True only for a known type satisfying `pred`; the sentinel never does
    pub fn is_typed_and(&self, pred: impl FnOnce(&Type) -> bool) -> bool {
        self.as_type().map_or(false, pred)
    }
}

impl From<Type> for ExprType {
    fn from(ty: Type) -> Self {
        ExprType::Typed(ty)
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprType::Typed(ty) => ty.fmt(f),
            ExprType::AlreadyDiagnosed => f.write_str("error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_of_builtins() {
        assert_eq!(Type::Void.keyword().as_deref(), Some("void"));
        assert_eq!(Type::IVEC3.keyword().as_deref(), Some("ivec3"));
        assert_eq!(Type::BVEC4.keyword().as_deref(), Some("bvec4"));
        assert_eq!(Type::MAT2.keyword().as_deref(), Some("mat2"));
        assert_eq!(Type::array(Type::Int, 2).keyword(), None);
        assert_eq!(Type::named("Light").keyword(), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Type::VEC3.to_string(), "vec3");
        assert_eq!(Type::UVEC2.to_string(), "uvec2");
        assert_eq!(Type::MAT4.to_string(), "mat4");
        assert_eq!(Type::array(Type::Float, 4).to_string(), "float[4]");
        assert_eq!(Type::named("Light").to_string(), "Light");
        assert_eq!(ExprType::AlreadyDiagnosed.to_string(), "error");
    }

    #[test]
    fn test_predicates() {
        assert!(Type::Int.is_numeric());
        assert!(Type::Float.is_numeric());
        assert!(!Type::UInt.is_numeric());
        assert!(!Type::Bool.is_numeric());
        assert!(Type::BVEC2.is_vector());
        assert!(!Type::MAT2.is_vector());
        assert!(Type::MAT3.is_matrix());
        assert!(Type::Bool.is_bool());
        assert!(ExprType::AlreadyDiagnosed.is_error());
        assert!(!ExprType::AlreadyDiagnosed.is_typed_and(|_| true));
    }

    #[test]
    fn test_component_and_column_types() {
        assert_eq!(Type::IVEC3.component_type(), Some(Type::Int));
        assert_eq!(Type::BVEC4.component_type(), Some(Type::Bool));
        assert_eq!(Type::MAT2.component_type(), None);
        assert_eq!(Type::MAT2.column_type(), Some(Type::VEC2));
        assert_eq!(Type::MAT4.column_type(), Some(Type::VEC4));
        assert_eq!(Type::VEC4.column_type(), None);
        assert_eq!(
            Type::array(Type::VEC2, 3).element_type(),
            Some(&Type::VEC2)
        );
    }

    #[test]
    fn test_arity_serializes_as_count() {
        let json = serde_json::to_string(&Type::VEC3).unwrap();
        assert_eq!(json, r#"{"Vector":{"component":"Float","arity":3}}"#);
        let bad = serde_json::from_str::<Type>(r#"{"Matrix":5}"#);
        assert!(bad.is_err());
    }
}
