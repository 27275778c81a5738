use thiserror::Error;

/// Errors reported when building a program snapshot.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum SnapshotError {
    #[error("Inheritance chain of type '{type_name}' is cyclic.")]
    CyclicInheritance { type_name: String },
}
