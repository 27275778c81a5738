//! Identity-keyed view of a program's class declarations, with partial
//! pieces merged.

use fxhash::FxHashMap;
use itertools::Itertools;
use tessera_symbols::decl::{Accessibility, ClassDeclaration, FieldDeclaration};
use tessera_symbols::location::SourceLocation;
use tessera_symbols::name::QualifiedName;
use tessera_symbols::snapshot::ProgramSnapshot;

/// All declaration pieces sharing one fully-qualified identity, with merged
/// accessors. A type split across partial pieces is visible here as one
/// logical class.
#[derive(Clone, Debug)]
pub struct ClassEntry<'a> {
    identity: String,
    name: QualifiedName,
    pieces: Vec<&'a ClassDeclaration>,
}

impl<'a> ClassEntry<'a> {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Most visible accessibility declared by any piece.
    pub fn accessibility(&self) -> Accessibility {
        self.pieces
            .iter()
            .map(|piece| piece.accessibility)
            .min()
            .unwrap_or(Accessibility::Public)
    }

    pub fn is_abstract(&self) -> bool {
        self.pieces.iter().any(|piece| piece.is_abstract)
    }

    pub fn generic_arity(&self) -> u32 {
        self.pieces
            .iter()
            .map(|piece| piece.generic_arity)
            .max()
            .unwrap_or(0)
    }

    /// Parent link: the first piece declaring a base.
    pub fn base(&self) -> Option<&QualifiedName> {
        self.pieces.iter().find_map(|piece| piece.base.as_ref())
    }

    /// Fields of all pieces, in snapshot order.
    pub fn fields(&self) -> impl Iterator<Item = &'a FieldDeclaration> + '_ {
        self.pieces.iter().flat_map(|piece| piece.fields.iter())
    }

    /// Whether any piece carries the given type-level marker.
    pub fn has_marker(&self, marker: &QualifiedName) -> bool {
        self.pieces
            .iter()
            .flat_map(|piece| piece.markers.iter())
            .any(|candidate| candidate.name == *marker)
    }

    /// Anchor for diagnostics: the first piece with a location.
    pub fn location(&self) -> Option<&SourceLocation> {
        self.pieces.iter().find_map(|piece| piece.location.as_ref())
    }
}

/// Index from fully-qualified identity to merged class pieces - the symbol
/// graph the collector and the inheritance walker traverse.
#[derive(Debug)]
pub struct TypeIndex<'a> {
    entries: FxHashMap<String, ClassEntry<'a>>,
}

impl<'a> TypeIndex<'a> {
    pub fn build(snapshot: &'a ProgramSnapshot) -> Self {
        let mut entries: FxHashMap<String, ClassEntry<'a>> = FxHashMap::default();
        for class in snapshot.classes() {
            let identity = class.name.identity();
            let entry = entries.entry(identity.clone()).or_insert_with(|| ClassEntry {
                identity,
                name: class.name.clone(),
                pieces: Vec::new(),
            });
            entry.pieces.push(class);
        }

        Self { entries }
    }

    pub fn get(&self, identity: &str) -> Option<&ClassEntry<'a>> {
        self.entries.get(identity)
    }

    /// Entries in ascending ordinal identity order - the stable traversal
    /// order for whole-program scans, independent of snapshot order.
    pub fn sorted_entries(&self) -> Vec<&ClassEntry<'a>> {
        self.entries
            .values()
            .sorted_by(|left, right| left.identity.cmp(&right.identity))
            .collect_vec()
    }
}
