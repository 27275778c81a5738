//! Field type classification: single service vs collection of services.

use tessera_symbols::ty::TypeRef;

const COLLECTIONS_NAMESPACE: &str = "System.Collections.Generic";

/// How a multi-result resolver query is converted into the declared
/// container shape.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Materialization {
    /// Leave the lazy sequence as-is.
    None,
    /// Force into a fixed-size array.
    ToFixedArray,
    /// Force into a growable list.
    ToGrowableList,
}

/// Classification of a declared field type.
#[derive(Clone, PartialEq, Debug)]
pub enum CollectionShape {
    /// A single service of the declared type.
    Scalar,
    /// A collection of services of the element type.
    Collection {
        element: TypeRef,
        materialization: Materialization,
    },
}

/// Classifies a declared type. Total: unrecognized shapes fall back to
/// [CollectionShape::Scalar] and are deferred to runtime resolution without
/// a diagnostic.
pub fn classify(ty: &TypeRef) -> CollectionShape {
    match ty {
        TypeRef::Array { element } => CollectionShape::Collection {
            element: (**element).clone(),
            materialization: Materialization::ToFixedArray,
        },
        TypeRef::Generic { name, args } if args.len() == 1 => {
            if name.namespace.as_deref() != Some(COLLECTIONS_NAMESPACE) {
                return CollectionShape::Scalar;
            }

            let materialization = match name.name.as_str() {
                "IEnumerable" => Materialization::None,
                "IReadOnlyList" | "IReadOnlyCollection" => Materialization::ToFixedArray,
                "List" | "IList" | "ICollection" => Materialization::ToGrowableList,
                _ => return CollectionShape::Scalar,
            };

            CollectionShape::Collection {
                element: args[0].clone(),
                materialization,
            }
        }
        _ => CollectionShape::Scalar,
    }
}
