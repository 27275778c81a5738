//! Per-type field metadata extraction - the validation state machine.

use crate::classify::{classify, CollectionShape};
use crate::config::WellKnownNames;
use crate::diagnostics::Diagnostic;
use crate::index::{ClassEntry, TypeIndex};
use fxhash::FxHashSet;
use itertools::Itertools;
use tessera_symbols::decl::{Accessibility, ConstValue, FieldDeclaration, MarkerUse};
use tessera_symbols::ty::TypeRef;

/// Normalized injection metadata for one field.
#[derive(Clone, PartialEq, Debug)]
pub struct FieldInjection {
    pub name: String,
    pub ty: TypeRef,
    /// `None` for unkeyed injection; `Some(ConstValue::Null)` for an
    /// explicit null key.
    pub key: Option<ConstValue>,
    pub required: bool,
    pub shape: CollectionShape,
    /// The declared type is the service resolver itself; key and required
    /// flag are discarded at emission.
    pub provider_passthrough: bool,
}

/// Enumerates the injectable fields of `class`, walking from the class to
/// each base so derived declarations shadow inherited ones.
///
/// Rule violations exclude the offending field and record a diagnostic; they
/// never abort extraction, and sibling fields are unaffected. The returned
/// list is in declaration-then-inheritance order and is emitted verbatim in
/// that order.
pub fn extract_field_injections(
    index: &TypeIndex<'_>,
    class: &ClassEntry<'_>,
    names: &WellKnownNames,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<FieldInjection> {
    let owner = class.identity().to_string();
    let mut claimed = FxHashSet::default();
    let mut injections = Vec::new();

    let mut current = Some(class);
    while let Some(entry) = current {
        for field in entry.fields() {
            extract_field(
                field,
                &owner,
                names,
                &mut claimed,
                &mut injections,
                diagnostics,
            );
        }
        current = entry
            .base()
            .and_then(|base| index.get(&base.identity()));
    }

    injections
}

fn extract_field(
    field: &FieldDeclaration,
    owner: &str,
    names: &WellKnownNames,
    claimed: &mut FxHashSet<String>,
    injections: &mut Vec<FieldInjection>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if field.is_static {
        return;
    }

    // a derived declaration claims the name whatever its own outcome
    if !claimed.insert(field.name.clone()) {
        return;
    }

    let markers = field
        .markers
        .iter()
        .filter(|marker| {
            marker.name == names.inject_marker || marker.name == names.keyed_marker
        })
        .collect_vec();

    let marker = match markers.as_slice() {
        [] => return,
        [marker] => *marker,
        _ => {
            diagnostics.push(Diagnostic::multiple_inject_markers(
                &field.name,
                owner,
                field.location.clone(),
            ));
            return;
        }
    };

    match field.setter {
        Some(setter) if !setter_reachable(setter.accessibility) => {
            diagnostics.push(Diagnostic::inaccessible_setter(
                &field.name,
                owner,
                field.location.clone(),
            ));
            return;
        }
        Some(setter) if setter.init_only => {
            diagnostics.push(Diagnostic::init_only_setter(
                &field.name,
                owner,
                field.location.clone(),
            ));
            return;
        }
        Some(_) => {}
        None => {
            diagnostics.push(Diagnostic::inaccessible_setter(
                &field.name,
                owner,
                field.location.clone(),
            ));
            return;
        }
    }

    let (key, required) = extract_arguments(marker, names);

    let provider_passthrough =
        matches!(&field.ty, TypeRef::Named(name) if *name == names.resolver);
    if provider_passthrough && key.is_some() {
        diagnostics.push(Diagnostic::provider_key_ignored(
            &field.name,
            owner,
            field.location.clone(),
        ));
    }

    injections.push(FieldInjection {
        name: field.name.clone(),
        ty: field.ty.clone(),
        key,
        required,
        shape: classify(&field.ty),
        provider_passthrough,
    });
}

/// Generated code can only reach public, internal, or protected-internal
/// setters.
fn setter_reachable(accessibility: Accessibility) -> bool {
    matches!(
        accessibility,
        Accessibility::Public | Accessibility::Internal | Accessibility::ProtectedInternal
    )
}

fn extract_arguments(marker: &MarkerUse, names: &WellKnownNames) -> (Option<ConstValue>, bool) {
    if marker.name == names.keyed_marker {
        let key = marker.args.first().cloned().unwrap_or(ConstValue::Null);
        let required = marker.args.get(1).and_then(ConstValue::as_bool).unwrap_or(true);
        (Some(key), required)
    } else {
        let required = marker
            .args
            .first()
            .and_then(ConstValue::as_bool)
            .unwrap_or(true);
        (None, required)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::WellKnownNames;
    use crate::diagnostics::{Diagnostic, DiagnosticCode};
    use crate::extract::{extract_field_injections, FieldInjection};
    use crate::index::TypeIndex;
    use tessera_symbols::decl::{
        Accessibility, ClassDeclaration, ConstValue, FieldDeclaration, MarkerUse, Setter,
    };
    use tessera_symbols::name::QualifiedName;
    use tessera_symbols::snapshot::ProgramSnapshot;
    use tessera_symbols::ty::TypeRef;

    fn names() -> WellKnownNames {
        WellKnownNames::default()
    }

    fn inject() -> MarkerUse {
        MarkerUse::new(QualifiedName::new("Tessera.Injection", "Inject"))
    }

    fn inject_with(args: Vec<ConstValue>) -> MarkerUse {
        MarkerUse::with_args(QualifiedName::new("Tessera.Injection", "Inject"), args)
    }

    fn keyed_with(args: Vec<ConstValue>) -> MarkerUse {
        MarkerUse::with_args(QualifiedName::new("Tessera.Injection", "InjectKeyed"), args)
    }

    fn marked_field(name: &str, markers: Vec<MarkerUse>) -> FieldDeclaration {
        FieldDeclaration {
            markers,
            ..FieldDeclaration::new(name, TypeRef::named("Game", "IAudio"))
        }
    }

    fn extract(classes: Vec<ClassDeclaration>) -> (Vec<FieldInjection>, Vec<Diagnostic>) {
        let snapshot = ProgramSnapshot::new(classes).unwrap();
        let index = TypeIndex::build(&snapshot);
        let class = index.get("Game.Player").unwrap();

        let mut diagnostics = Vec::new();
        let injections = extract_field_injections(&index, class, &names(), &mut diagnostics);
        (injections, diagnostics)
    }

    fn player(fields: Vec<FieldDeclaration>) -> ClassDeclaration {
        ClassDeclaration {
            fields,
            ..ClassDeclaration::new(QualifiedName::new("Game", "Player"))
        }
    }

    #[test]
    fn should_skip_unmarked_and_static_fields() {
        let static_field = FieldDeclaration {
            is_static: true,
            ..marked_field("Shared", vec![inject()])
        };
        let (injections, diagnostics) = extract(vec![player(vec![
            FieldDeclaration::new("Plain", TypeRef::named("Game", "IAudio")),
            static_field,
            marked_field("Audio", vec![inject()]),
        ])]);

        assert_eq!(
            injections.iter().map(|injection| injection.name.as_str()).collect::<Vec<_>>(),
            vec!["Audio"]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn should_report_multiple_markers_once_and_exclude_the_field() {
        let (injections, diagnostics) = extract(vec![player(vec![marked_field(
            "Audio",
            vec![inject(), keyed_with(vec![ConstValue::Str("k".to_string())])],
        )])]);

        assert!(injections.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::MultipleInjectMarkers);
    }

    #[test]
    fn should_warn_on_inaccessible_setters() {
        let private_setter = FieldDeclaration {
            setter: Some(Setter {
                accessibility: Accessibility::Private,
                init_only: false,
            }),
            ..marked_field("Hidden", vec![inject()])
        };
        let absent_setter = FieldDeclaration {
            setter: None,
            ..marked_field("Sealed", vec![inject()])
        };
        let (injections, diagnostics) = extract(vec![player(vec![private_setter, absent_setter])]);

        assert!(injections.is_empty());
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|diagnostic| diagnostic.code == DiagnosticCode::InaccessibleSetter));
    }

    #[test]
    fn should_warn_on_init_only_setters() {
        let init_only = FieldDeclaration {
            setter: Some(Setter {
                accessibility: Accessibility::Public,
                init_only: true,
            }),
            ..marked_field("Frozen", vec![inject()])
        };
        let (injections, diagnostics) = extract(vec![player(vec![init_only])]);

        assert!(injections.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::InitOnlySetter);
    }

    #[test]
    fn should_extract_key_and_required_arguments() {
        let (injections, diagnostics) = extract(vec![player(vec![
            marked_field("Default", vec![inject()]),
            marked_field("Optional", vec![inject_with(vec![ConstValue::Bool(false)])]),
            marked_field(
                "Keyed",
                vec![keyed_with(vec![
                    ConstValue::Str("k".to_string()),
                    ConstValue::Bool(false),
                ])],
            ),
            marked_field("NullKeyed", vec![keyed_with(Vec::new())]),
        ])]);

        assert!(diagnostics.is_empty());
        assert_eq!(injections.len(), 4);
        assert!(injections[0].required && injections[0].key.is_none());
        assert!(!injections[1].required && injections[1].key.is_none());
        assert_eq!(injections[2].key, Some(ConstValue::Str("k".to_string())));
        assert!(!injections[2].required);
        assert_eq!(injections[3].key, Some(ConstValue::Null));
        assert!(injections[3].required);
    }

    #[test]
    fn should_shadow_base_fields_by_derived_declarations() {
        let base = ClassDeclaration {
            base: Some(QualifiedName::new("Tessera.Injection", "InjectableObject")),
            fields: vec![
                marked_field("Audio", vec![inject()]),
                marked_field("Input", vec![inject()]),
            ],
            ..ClassDeclaration::new(QualifiedName::new("Game", "Actor"))
        };
        let derived = ClassDeclaration {
            base: Some(QualifiedName::new("Game", "Actor")),
            fields: vec![FieldDeclaration::new(
                "Audio",
                TypeRef::named("Game", "IAudio"),
            )],
            ..ClassDeclaration::new(QualifiedName::new("Game", "Player"))
        };
        let (injections, diagnostics) = extract(vec![base, derived]);

        // the derived unmarked declaration masks the inherited marker
        assert_eq!(
            injections.iter().map(|injection| injection.name.as_str()).collect::<Vec<_>>(),
            vec!["Input"]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn should_mark_resolver_fields_as_passthrough() {
        let plain = FieldDeclaration {
            ty: TypeRef::named("Tessera.Injection", "IServiceResolver"),
            ..marked_field("Resolver", vec![inject()])
        };
        let keyed = FieldDeclaration {
            ty: TypeRef::named("Tessera.Injection", "IServiceResolver"),
            ..marked_field(
                "KeyedResolver",
                vec![keyed_with(vec![ConstValue::Str("k".to_string())])],
            )
        };
        let (injections, diagnostics) = extract(vec![player(vec![plain, keyed])]);

        assert_eq!(injections.len(), 2);
        assert!(injections.iter().all(|injection| injection.provider_passthrough));
        // only the keyed use is worth a warning
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::ProviderKeyIgnored);
    }
}
