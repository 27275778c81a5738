//! Type references as declared on fields.

use crate::name::QualifiedName;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// A declared type shape.
///
/// References are structural only to the depth the generator needs for
/// collection classification; anything deeper is rendered into generated
/// source, never inspected.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeRef {
    /// A plain named type.
    Named(QualifiedName),
    /// A constructed generic type.
    Generic {
        name: QualifiedName,
        args: Vec<TypeRef>,
    },
    /// A fixed-size array of the element type.
    Array { element: Box<TypeRef> },
}

impl TypeRef {
    /// Shorthand for a plain named type.
    pub fn named<N: Into<String>, S: Into<String>>(namespace: N, name: S) -> Self {
        TypeRef::Named(QualifiedName::new(namespace, name))
    }

    /// Shorthand for an array of the given element type.
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array {
            element: Box::new(element),
        }
    }
}

impl Display for TypeRef {
    /// Renders the globally-qualified source form of the reference.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "global::{}", name.identity()),
            TypeRef::Generic { name, args } => {
                write!(f, "global::{}<{}>", name.identity(), args.iter().join(", "))
            }
            TypeRef::Array { element } => write!(f, "{}[]", element),
        }
    }
}
