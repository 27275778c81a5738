//! The immutable whole-program view handed to the generator.

use crate::decl::ClassDeclaration;
use crate::error::SnapshotError;
use crate::name::QualifiedName;
use fxhash::{FxHashMap, FxHashSet};

/// Snapshot of every class declaration in a program, constructed once per
/// generation pass and immutable afterwards.
///
/// Construction enforces the host guarantee that base chains are finite, so
/// downstream chain walks need no cycle guards. Bases the snapshot does not
/// declare are external types and simply terminate a chain.
#[derive(Clone, Debug, Default)]
pub struct ProgramSnapshot {
    classes: Vec<ClassDeclaration>,
}

impl ProgramSnapshot {
    pub fn new(classes: Vec<ClassDeclaration>) -> Result<Self, SnapshotError> {
        validate_chains(&classes)?;
        Ok(Self { classes })
    }

    /// All declaration pieces, in the host's enumeration order. Member order
    /// within a piece is declaration order; piece order across a partial
    /// type determines merged member order.
    pub fn classes(&self) -> &[ClassDeclaration] {
        &self.classes
    }
}

fn validate_chains(classes: &[ClassDeclaration]) -> Result<(), SnapshotError> {
    let mut bases: FxHashMap<String, Option<String>> = FxHashMap::default();
    for class in classes {
        let base = class.base.as_ref().map(QualifiedName::identity);
        let entry = bases.entry(class.name.identity()).or_insert(None);
        if entry.is_none() {
            *entry = base;
        }
    }

    let mut verified: FxHashSet<String> = FxHashSet::default();
    for start in bases.keys() {
        let mut visited = FxHashSet::default();
        let mut current = start.clone();
        loop {
            if verified.contains(&current) {
                break;
            }
            if !visited.insert(current.clone()) {
                return Err(SnapshotError::CyclicInheritance {
                    type_name: start.clone(),
                });
            }
            match bases.get(&current) {
                Some(Some(base)) => current = base.clone(),
                _ => break,
            }
        }
        verified.extend(visited);
    }

    Ok(())
}
