//! Base-chain walking for nominal capability checks.

use crate::index::{ClassEntry, TypeIndex};
use tessera_symbols::name::QualifiedName;

/// Checks whether `class` ultimately derives from `target`, comparing each
/// base by simple name and containing namespace.
///
/// Transitive matches count. The walk ends at a chain root or at an external
/// base the snapshot does not declare; chains are finite by snapshot
/// construction.
pub fn derives_from(index: &TypeIndex<'_>, class: &ClassEntry<'_>, target: &QualifiedName) -> bool {
    let mut current = class.base().cloned();
    while let Some(base) = current {
        if base == *target {
            return true;
        }
        current = index
            .get(&base.identity())
            .and_then(|entry| entry.base().cloned());
    }

    false
}

#[cfg(test)]
mod tests {
    use crate::index::TypeIndex;
    use crate::inheritance::derives_from;
    use tessera_symbols::decl::ClassDeclaration;
    use tessera_symbols::name::QualifiedName;
    use tessera_symbols::snapshot::ProgramSnapshot;

    fn base_name() -> QualifiedName {
        QualifiedName::new("Tessera.Injection", "InjectableObject")
    }

    fn snapshot() -> ProgramSnapshot {
        ProgramSnapshot::new(vec![
            ClassDeclaration {
                base: Some(QualifiedName::new("Game", "Actor")),
                ..ClassDeclaration::new(QualifiedName::new("Game", "Player"))
            },
            ClassDeclaration {
                base: Some(base_name()),
                ..ClassDeclaration::new(QualifiedName::new("Game", "Actor"))
            },
            ClassDeclaration {
                base: Some(QualifiedName::new("Menu", "InjectableObject")),
                ..ClassDeclaration::new(QualifiedName::new("Game", "Widget"))
            },
        ])
        .unwrap()
    }

    #[test]
    fn should_match_direct_bases() {
        let snapshot = snapshot();
        let index = TypeIndex::build(&snapshot);

        assert!(derives_from(
            &index,
            index.get("Game.Actor").unwrap(),
            &base_name()
        ));
    }

    #[test]
    fn should_match_transitive_bases() {
        let snapshot = snapshot();
        let index = TypeIndex::build(&snapshot);

        assert!(derives_from(
            &index,
            index.get("Game.Player").unwrap(),
            &base_name()
        ));
    }

    #[test]
    fn should_require_matching_namespace() {
        let snapshot = snapshot();
        let index = TypeIndex::build(&snapshot);

        assert!(!derives_from(
            &index,
            index.get("Game.Widget").unwrap(),
            &base_name()
        ));
    }

    #[test]
    fn should_not_match_the_class_itself() {
        let snapshot = ProgramSnapshot::new(vec![ClassDeclaration::new(base_name())]).unwrap();
        let index = TypeIndex::build(&snapshot);

        assert!(!derives_from(
            &index,
            index.get("Tessera.Injection.InjectableObject").unwrap(),
            &base_name()
        ));
    }
}
