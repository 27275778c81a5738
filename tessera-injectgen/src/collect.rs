//! Whole-program discovery of injectable types and injector contexts.

use crate::config::WellKnownNames;
use crate::diagnostics::Diagnostic;
use crate::extract::{extract_field_injections, FieldInjection};
use crate::index::TypeIndex;
use crate::inheritance::derives_from;
use tessera_symbols::decl::Accessibility;
use tessera_symbols::location::SourceLocation;
use tessera_symbols::name::QualifiedName;
use tracing::debug;

/// One type eligible for generated injection.
#[derive(Clone, PartialEq, Debug)]
pub struct InjectionCandidate {
    /// Fully-qualified identity - the dispatch-table match value.
    pub identity: String,
    /// Simple name, the starting point for collision-free injector naming.
    pub short_name: String,
    pub fields: Vec<FieldInjection>,
    /// Anchor of the first declaration piece, for diagnostics.
    pub location: Option<SourceLocation>,
}

/// An injector context declaration the generator completes.
#[derive(Clone, PartialEq, Debug)]
pub struct ContextDeclaration {
    pub identity: String,
    pub name: QualifiedName,
    pub accessibility: Accessibility,
    pub location: Option<SourceLocation>,
}

/// Scans the whole snapshot for non-abstract, non-generic classes deriving
/// from the entity base, honoring the exclusion marker.
///
/// The returned table is sorted by identity in ascending ordinal order, so
/// generated output stays stable however the host traverses declarations. A
/// type with no injectable fields is still eligible; the emitter routes it
/// to the shared no-op injector.
pub fn collect_injection_candidates(
    index: &TypeIndex<'_>,
    names: &WellKnownNames,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<InjectionCandidate> {
    let mut candidates = Vec::new();

    for entry in index.sorted_entries() {
        if entry.is_abstract() || entry.generic_arity() > 0 {
            continue;
        }
        if entry.has_marker(&names.exclusion_marker) {
            continue;
        }
        if !derives_from(index, entry, &names.entity_base) {
            continue;
        }

        let fields = extract_field_injections(index, entry, names, diagnostics);
        candidates.push(InjectionCandidate {
            identity: entry.identity().to_string(),
            short_name: entry.name().name.clone(),
            fields,
            location: entry.location().cloned(),
        });
    }

    debug!("Collected {} injectable types.", candidates.len());
    candidates
}

/// Finds injector context declarations, in ascending ordinal identity order.
///
/// Generic contexts are skipped with a diagnostic and do not affect other
/// contexts. When several valid contexts exist, every one still receives a
/// full artifact; each context beyond the first records an informational
/// diagnostic.
pub fn discover_contexts(
    index: &TypeIndex<'_>,
    names: &WellKnownNames,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ContextDeclaration> {
    let mut contexts = Vec::new();

    for entry in index.sorted_entries() {
        if !derives_from(index, entry, &names.context_base) {
            continue;
        }
        if entry.generic_arity() > 0 {
            diagnostics.push(Diagnostic::generic_context(
                entry.identity(),
                entry.location().cloned(),
            ));
            continue;
        }

        contexts.push(ContextDeclaration {
            identity: entry.identity().to_string(),
            name: entry.name().clone(),
            accessibility: entry.accessibility(),
            location: entry.location().cloned(),
        });
    }

    for context in contexts.iter().skip(1) {
        diagnostics.push(Diagnostic::multiple_contexts(
            &context.identity,
            context.location.clone(),
        ));
    }

    debug!("Discovered {} injector contexts.", contexts.len());
    contexts
}

#[cfg(test)]
mod tests {
    use crate::collect::{collect_injection_candidates, discover_contexts};
    use crate::config::WellKnownNames;
    use crate::diagnostics::DiagnosticCode;
    use crate::index::TypeIndex;
    use tessera_symbols::decl::{ClassDeclaration, MarkerUse};
    use tessera_symbols::name::QualifiedName;
    use tessera_symbols::snapshot::ProgramSnapshot;

    fn entity(namespace: &str, name: &str) -> ClassDeclaration {
        ClassDeclaration {
            base: Some(QualifiedName::new("Tessera.Injection", "InjectableObject")),
            ..ClassDeclaration::new(QualifiedName::new(namespace, name))
        }
    }

    fn context(name: &str) -> ClassDeclaration {
        ClassDeclaration {
            base: Some(QualifiedName::new("Tessera.Injection", "InjectorContext")),
            ..ClassDeclaration::new(QualifiedName::new("Game", name))
        }
    }

    #[test]
    fn should_collect_sorted_and_deduplicated_candidates() {
        let snapshot = ProgramSnapshot::new(vec![
            entity("Menu", "Widget"),
            entity("Game", "Player"),
            // second partial piece of the same type
            entity("Game", "Player"),
            ClassDeclaration {
                is_abstract: true,
                ..entity("Game", "Actor")
            },
            ClassDeclaration {
                generic_arity: 1,
                ..entity("Game", "Pool")
            },
            ClassDeclaration::new(QualifiedName::new("Game", "Plain")),
        ])
        .unwrap();
        let index = TypeIndex::build(&snapshot);

        let mut diagnostics = Vec::new();
        let candidates =
            collect_injection_candidates(&index, &WellKnownNames::default(), &mut diagnostics);

        assert_eq!(
            candidates.iter().map(|candidate| candidate.identity.as_str()).collect::<Vec<_>>(),
            vec!["Game.Player", "Menu.Widget"]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn should_honor_the_exclusion_marker() {
        let snapshot = ProgramSnapshot::new(vec![ClassDeclaration {
            markers: vec![MarkerUse::new(QualifiedName::new(
                "Tessera.Injection",
                "NoInject",
            ))],
            ..entity("Game", "Hidden")
        }])
        .unwrap();
        let index = TypeIndex::build(&snapshot);

        let mut diagnostics = Vec::new();
        let candidates =
            collect_injection_candidates(&index, &WellKnownNames::default(), &mut diagnostics);

        assert!(candidates.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn should_skip_generic_contexts_with_a_diagnostic() {
        let snapshot = ProgramSnapshot::new(vec![
            context("GameContext"),
            ClassDeclaration {
                generic_arity: 2,
                ..context("OpenContext")
            },
        ])
        .unwrap();
        let index = TypeIndex::build(&snapshot);

        let mut diagnostics = Vec::new();
        let contexts = discover_contexts(&index, &WellKnownNames::default(), &mut diagnostics);

        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].identity, "Game.GameContext");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::GenericContext);
    }

    #[test]
    fn should_report_each_extra_context() {
        let snapshot = ProgramSnapshot::new(vec![
            context("Alpha"),
            context("Beta"),
            context("Gamma"),
        ])
        .unwrap();
        let index = TypeIndex::build(&snapshot);

        let mut diagnostics = Vec::new();
        let contexts = discover_contexts(&index, &WellKnownNames::default(), &mut diagnostics);

        assert_eq!(contexts.len(), 3);
        let extras = diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.code == DiagnosticCode::MultipleContexts)
            .count();
        assert_eq!(extras, 2);
    }
}
