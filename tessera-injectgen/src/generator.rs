//! The generation pipeline: one pass over a program snapshot.

use crate::collect::{collect_injection_candidates, discover_contexts};
use crate::config::{GeneratorConfig, WellKnownNames};
use crate::diagnostics::Diagnostic;
use crate::emit::emit_dispatch_artifact;
use crate::index::TypeIndex;
use config::ConfigError;
use derive_more::Constructor;
#[cfg(test)]
use mockall::automock;
use tessera_symbols::snapshot::ProgramSnapshot;
use thiserror::Error;
use tracing::debug;

/// Errors raised when constructing a generator from the environment.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Error loading generator configuration: {0}")]
    Config(#[from] ConfigError),
}

/// One generated source artifact, keyed by a file-like hint name.
#[derive(Clone, Eq, PartialEq, Debug, Constructor)]
pub struct GeneratedArtifact {
    /// File-like name derived from the context identity.
    pub hint_name: String,
    /// Identity of the context the artifact completes.
    pub context: String,
    pub source: String,
}

/// Everything produced by one generation pass. The pass always completes:
/// diagnostics accompany the artifacts instead of replacing them.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Generation {
    pub artifacts: Vec<GeneratedArtifact>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Host channel receiving generated sources.
#[cfg_attr(test, automock)]
pub trait ArtifactSink {
    /// Registers generated source text under a file-like hint name.
    fn add_source(&mut self, hint_name: &str, source: &str);
}

/// Host channel receiving diagnostics.
#[cfg_attr(test, automock)]
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Compile-time injection wiring generator.
///
/// Runs a pure, single-pass transformation over an immutable program
/// snapshot; the host re-invokes it once per relevant edit and owns
/// persisting the results. Identical snapshots always produce identical
/// output.
#[derive(Clone, Debug)]
pub struct InjectionGenerator {
    config: GeneratorConfig,
    names: WellKnownNames,
}

impl InjectionGenerator {
    /// Creates a generator recognizing the default runtime surface names.
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    /// Creates a generator with explicit configuration.
    pub fn with_config(config: GeneratorConfig) -> Self {
        let names = config.well_known();
        Self { config, names }
    }

    /// Creates a generator configured from the config file and environment.
    pub fn from_environment() -> Result<Self, GeneratorError> {
        Ok(Self::with_config(GeneratorConfig::init_from_environment()?))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs one generation pass.
    ///
    /// Never fails: malformed declarations are excluded and reported as
    /// diagnostics, and every context the pass can validate receives the
    /// best achievable artifact.
    pub fn run(&self, snapshot: &ProgramSnapshot) -> Generation {
        let index = TypeIndex::build(snapshot);
        let mut diagnostics = Vec::new();

        let table = collect_injection_candidates(&index, &self.names, &mut diagnostics);
        let contexts = discover_contexts(&index, &self.names, &mut diagnostics);

        let mut artifacts = Vec::new();
        for context in &contexts {
            if table.is_empty() {
                diagnostics.push(Diagnostic::no_eligible_types(
                    &context.identity,
                    context.location.clone(),
                ));
            }

            debug!("Generating injection dispatch for context '{}'.", context.identity);

            let source = emit_dispatch_artifact(context, &table, &self.config);
            artifacts.push(GeneratedArtifact::new(
                format!("{}.g.cs", context.identity),
                context.identity.clone(),
                source,
            ));
        }

        Generation {
            artifacts,
            diagnostics,
        }
    }

    /// Runs one generation pass, forwarding results to the host sinks.
    pub fn run_into(
        &self,
        snapshot: &ProgramSnapshot,
        artifacts: &mut dyn ArtifactSink,
        diagnostics: &mut dyn DiagnosticSink,
    ) {
        let generation = self.run(snapshot);
        for artifact in generation.artifacts {
            artifacts.add_source(&artifact.hint_name, &artifact.source);
        }
        for diagnostic in generation.diagnostics {
            diagnostics.report(diagnostic);
        }
    }
}

impl Default for InjectionGenerator {
    fn default() -> Self {
        Self::new()
    }
}
