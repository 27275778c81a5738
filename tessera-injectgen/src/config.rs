//! Generator configuration.
//!
//! The well-known runtime surface - marker names and designated base types -
//! defaults to the `Tessera.Injection` namespace and can be overridden with a
//! `tessera-injectgen.json` file or environment variables prefixed with
//! `TESSERA_INJECTGEN_`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tessera_symbols::name::QualifiedName;

const CONFIG_ENV_PREFIX: &str = "TESSERA_INJECTGEN";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "tessera-injectgen.json";

/// Names of the runtime surface recognized by the generator. Base types and
/// markers are matched by simple name within [injection_namespace](GeneratorConfig::injection_namespace),
/// never by global identity.
#[non_exhaustive]
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct GeneratorConfig {
    /// Namespace containing the runtime base types and markers.
    pub injection_namespace: String,
    /// Base type designating injectable entities.
    pub entity_base_name: String,
    /// Base type designating injector contexts.
    pub context_base_name: String,
    /// The service resolver type, assigned directly to fields declaring it.
    pub resolver_name: String,
    /// Plain injection marker.
    pub inject_marker_name: String,
    /// Keyed injection marker.
    pub keyed_marker_name: String,
    /// Marker excluding a type from generation.
    pub exclusion_marker_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            injection_namespace: "Tessera.Injection".to_string(),
            entity_base_name: "InjectableObject".to_string(),
            context_base_name: "InjectorContext".to_string(),
            resolver_name: "IServiceResolver".to_string(),
            inject_marker_name: "Inject".to_string(),
            keyed_marker_name: "InjectKeyed".to_string(),
            exclusion_marker_name: "NoInject".to_string(),
        }
    }
}

impl From<OptionalGeneratorConfig> for GeneratorConfig {
    fn from(value: OptionalGeneratorConfig) -> Self {
        let default = Self::default();
        Self {
            injection_namespace: value
                .injection_namespace
                .unwrap_or(default.injection_namespace),
            entity_base_name: value.entity_base_name.unwrap_or(default.entity_base_name),
            context_base_name: value.context_base_name.unwrap_or(default.context_base_name),
            resolver_name: value.resolver_name.unwrap_or(default.resolver_name),
            inject_marker_name: value
                .inject_marker_name
                .unwrap_or(default.inject_marker_name),
            keyed_marker_name: value.keyed_marker_name.unwrap_or(default.keyed_marker_name),
            exclusion_marker_name: value
                .exclusion_marker_name
                .unwrap_or(default.exclusion_marker_name),
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from [CONFIG_FILE] and the environment, falling
    /// back to defaults for anything not overridden.
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()
            .and_then(|config| config.try_deserialize::<OptionalGeneratorConfig>())
            .map(|config| config.into())
    }

    /// Resolves the configured simple names into qualified names.
    pub fn well_known(&self) -> WellKnownNames {
        WellKnownNames {
            entity_base: self.qualify(&self.entity_base_name),
            context_base: self.qualify(&self.context_base_name),
            resolver: self.qualify(&self.resolver_name),
            inject_marker: self.qualify(&self.inject_marker_name),
            keyed_marker: self.qualify(&self.keyed_marker_name),
            exclusion_marker: self.qualify(&self.exclusion_marker_name),
        }
    }

    fn qualify(&self, name: &str) -> QualifiedName {
        QualifiedName::new(self.injection_namespace.clone(), name.to_string())
    }
}

/// Qualified names of the runtime surface, resolved once per generator.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct WellKnownNames {
    pub entity_base: QualifiedName,
    pub context_base: QualifiedName,
    pub resolver: QualifiedName,
    pub inject_marker: QualifiedName,
    pub keyed_marker: QualifiedName,
    pub exclusion_marker: QualifiedName,
}

impl Default for WellKnownNames {
    fn default() -> Self {
        GeneratorConfig::default().well_known()
    }
}

#[derive(Deserialize)]
struct OptionalGeneratorConfig {
    injection_namespace: Option<String>,
    entity_base_name: Option<String>,
    context_base_name: Option<String>,
    resolver_name: Option<String>,
    inject_marker_name: Option<String>,
    keyed_marker_name: Option<String>,
    exclusion_marker_name: Option<String>,
}
