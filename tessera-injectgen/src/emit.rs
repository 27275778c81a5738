//! Emission of the per-context dispatch artifact.
//!
//! Emission is deterministic by construction: the eligible-type table
//! arrives sorted, injector names are resolved with a stable collision rule,
//! and nothing here consults unordered state, timestamps, or random
//! identifiers. Identical input metadata always produces byte-identical
//! text.

use crate::classify::{CollectionShape, Materialization};
use crate::collect::{ContextDeclaration, InjectionCandidate};
use crate::config::GeneratorConfig;
use crate::extract::FieldInjection;
use crate::literal::format_key_literal;
use convert_case::{Case, Casing};
use fxhash::FxHashSet;
use itertools::Itertools;
use tessera_symbols::decl::ConstValue;

const INDENT: &str = "    ";

/// Line-oriented source writer with indentation tracking.
struct SourceWriter {
    out: String,
    depth: usize,
}

impl SourceWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// One level deeper than the current depth, for `case` bodies.
    fn indented(&mut self, text: &str) {
        self.depth += 1;
        self.line(text);
        self.depth -= 1;
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self) {
        self.line("{");
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.line("}");
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Emits the generated source completing one injector context with the full
/// dispatch table.
pub fn emit_dispatch_artifact(
    context: &ContextDeclaration,
    table: &[InjectionCandidate],
    config: &GeneratorConfig,
) -> String {
    let display_names = assign_display_names(table);
    let has_noop = table.iter().any(|candidate| candidate.fields.is_empty());
    let needs_linq = table
        .iter()
        .flat_map(|candidate| candidate.fields.iter())
        .any(|field| {
            matches!(
                field.shape,
                CollectionShape::Collection {
                    materialization: Materialization::ToFixedArray
                        | Materialization::ToGrowableList,
                    ..
                }
            )
        });

    let mut writer = SourceWriter::new();
    writer.line("// <auto-generated/>");
    writer.line("#nullable disable");
    writer.blank();

    let mut usings = vec![config.injection_namespace.as_str()];
    if needs_linq {
        usings.push("System.Linq");
    }
    for using in usings.into_iter().sorted() {
        writer.line(&format!("using {};", using));
    }
    writer.blank();

    if let Some(namespace) = &context.name.namespace {
        writer.line(&format!("namespace {}", namespace));
        writer.open();
    }

    writer.line(&format!(
        "{} partial class {}",
        context.accessibility.keyword(),
        context.name.name
    ));
    writer.open();

    emit_dispatch_method(&mut writer, table, &display_names);

    if has_noop {
        writer.blank();
        emit_noop_injector(&mut writer, config);
    }

    for (candidate, display) in table.iter().zip(&display_names) {
        if let Some(display) = display {
            writer.blank();
            emit_injector(&mut writer, candidate, display, config);
        }
    }

    writer.close();

    if context.name.namespace.is_some() {
        writer.close();
    }

    writer.finish()
}

/// Collision-free display names per injector-bearing candidate, aligned with
/// the table; `None` for types routed to the shared no-op injector. `Noop`
/// is reserved up front so a type named `Noop` can never collide with the
/// shared injector.
fn assign_display_names(table: &[InjectionCandidate]) -> Vec<Option<String>> {
    let mut used: FxHashSet<String> = FxHashSet::default();
    used.insert("Noop".to_string());

    table
        .iter()
        .map(|candidate| {
            if candidate.fields.is_empty() {
                return None;
            }

            let base = candidate.short_name.to_case(Case::Pascal);
            let mut display = base.clone();
            let mut suffix = 1u32;
            while !used.insert(display.clone()) {
                display = format!("{}{}", base, suffix);
                suffix += 1;
            }

            Some(display)
        })
        .collect_vec()
}

fn emit_dispatch_method(
    writer: &mut SourceWriter,
    table: &[InjectionCandidate],
    display_names: &[Option<String>],
) {
    writer.line("public override IInjector GetInjector(string typeIdentity)");
    writer.open();

    if table.is_empty() {
        writer.line("return null;");
        writer.close();
        return;
    }

    writer.line("switch (typeIdentity)");
    writer.open();
    for (candidate, display) in table.iter().zip(display_names) {
        writer.line(&format!(
            "case {}:",
            format_key_literal(&ConstValue::Str(candidate.identity.clone()))
        ));
        match display {
            Some(display) => writer.indented(&format!("return {}Injector.Instance;", display)),
            None => writer.indented("return NoopInjector.Instance;"),
        }
    }
    writer.line("default:");
    writer.indented("return null;");
    writer.close();

    writer.close();
}

fn emit_noop_injector(writer: &mut SourceWriter, config: &GeneratorConfig) {
    writer.line("private sealed class NoopInjector : IInjector");
    writer.open();
    writer.line("public static readonly NoopInjector Instance = new NoopInjector();");
    writer.blank();
    writer.line(&format!(
        "public void Inject({} resolver, object target)",
        config.resolver_name
    ));
    writer.open();
    writer.close();
    writer.close();
}

fn emit_injector(
    writer: &mut SourceWriter,
    candidate: &InjectionCandidate,
    display: &str,
    config: &GeneratorConfig,
) {
    writer.line(&format!(
        "private sealed class {}Injector : IInjector",
        display
    ));
    writer.open();
    writer.line(&format!(
        "public static readonly {name}Injector Instance = new {name}Injector();",
        name = display
    ));
    writer.blank();
    writer.line(&format!(
        "public void Inject({} resolver, object target)",
        config.resolver_name
    ));
    writer.open();
    writer.line(&format!("var instance = (global::{})target;", candidate.identity));
    for (position, field) in candidate.fields.iter().enumerate() {
        emit_field_assignment(writer, field, position);
    }
    writer.close();
    writer.close();
}

fn emit_field_assignment(writer: &mut SourceWriter, field: &FieldInjection, position: usize) {
    if field.provider_passthrough {
        writer.line(&format!("instance.{} = resolver;", field.name));
        return;
    }

    if let CollectionShape::Collection {
        element,
        materialization,
    } = &field.shape
    {
        let query = match &field.key {
            Some(key) => format!(
                "resolver.GetKeyedServices<{}>({})",
                element,
                format_key_literal(key)
            ),
            None => format!("resolver.GetServices<{}>()", element),
        };
        let conversion = match materialization {
            Materialization::None => "",
            Materialization::ToFixedArray => ".ToArray()",
            Materialization::ToGrowableList => ".ToList()",
        };
        writer.line(&format!("instance.{} = {}{};", field.name, query, conversion));
        return;
    }

    let resolution = match &field.key {
        Some(key) if field.required => format!(
            "resolver.GetRequiredKeyedService<{}>({})",
            field.ty,
            format_key_literal(key)
        ),
        Some(key) => format!(
            "resolver.GetKeyedService<{}>({})",
            field.ty,
            format_key_literal(key)
        ),
        None if field.required => format!("resolver.GetRequiredService<{}>()", field.ty),
        None => format!("resolver.GetService<{}>()", field.ty),
    };

    if field.required {
        writer.line(&format!("instance.{} = {};", field.name, resolution));
    } else {
        // an unresolved optional service must leave the prior field value
        writer.line(&format!("var service{} = {};", position, resolution));
        writer.line(&format!("if (service{} != null)", position));
        writer.open();
        writer.line(&format!("instance.{} = service{};", field.name, position));
        writer.close();
    }
}
