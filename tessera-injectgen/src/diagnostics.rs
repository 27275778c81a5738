//! Typed catalog of conditions reported during generation.
//!
//! Diagnostics are accumulated data returned alongside the generated
//! artifacts - reporting one never aborts a pass. An error-severity
//! diagnostic only means the offending field, type, or context was excluded
//! from the artifact; everything valid is still emitted.

use std::fmt::{Display, Formatter};
use tessera_symbols::location::SourceLocation;

/// Severity surfaced to the host's reporting channel.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// The stable diagnostic catalog. Codes are part of the public contract and
/// are never renumbered.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticCode {
    /// A field carries more than one injection marker.
    MultipleInjectMarkers,
    /// A marked field has no setter the generated code could reach.
    InaccessibleSetter,
    /// A marked field is assignable during construction only.
    InitOnlySetter,
    /// An injector context declares type parameters.
    GenericContext,
    /// More than one injector context exists in the program.
    MultipleContexts,
    /// A context has no injectable types to dispatch to.
    NoEligibleTypes,
    /// A service key was attached to a resolver-typed field.
    ProviderKeyIgnored,
}

impl DiagnosticCode {
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticCode::MultipleInjectMarkers => "TSG0001",
            DiagnosticCode::InaccessibleSetter => "TSG0002",
            DiagnosticCode::InitOnlySetter => "TSG0003",
            DiagnosticCode::GenericContext => "TSG0004",
            DiagnosticCode::MultipleContexts => "TSG0005",
            DiagnosticCode::NoEligibleTypes => "TSG0006",
            DiagnosticCode::ProviderKeyIgnored => "TSG0007",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            DiagnosticCode::MultipleInjectMarkers => Severity::Error,
            DiagnosticCode::InaccessibleSetter => Severity::Warning,
            DiagnosticCode::InitOnlySetter => Severity::Warning,
            DiagnosticCode::GenericContext => Severity::Warning,
            DiagnosticCode::MultipleContexts => Severity::Info,
            DiagnosticCode::NoEligibleTypes => Severity::Info,
            DiagnosticCode::ProviderKeyIgnored => Severity::Warning,
        }
    }

    pub fn message_template(self) -> &'static str {
        match self {
            DiagnosticCode::MultipleInjectMarkers => {
                "Field '{0}' on type '{1}' has multiple injection markers and will not be injected."
            }
            DiagnosticCode::InaccessibleSetter => {
                "Field '{0}' on type '{1}' has no sufficiently accessible setter and will not be injected."
            }
            DiagnosticCode::InitOnlySetter => {
                "Field '{0}' on type '{1}' is assignable only during construction and will not be injected."
            }
            DiagnosticCode::GenericContext => {
                "Injector context '{0}' has type parameters and will not receive a dispatch table."
            }
            DiagnosticCode::MultipleContexts => {
                "Multiple injector contexts exist; '{0}' also receives the full dispatch table."
            }
            DiagnosticCode::NoEligibleTypes => {
                "No injectable types were found for context '{0}'."
            }
            DiagnosticCode::ProviderKeyIgnored => {
                "Field '{0}' on type '{1}' receives the service resolver itself; its service key is ignored."
            }
        }
    }
}

/// A reported condition with enough context to pinpoint the offending
/// declaration without reading the generated output.
#[derive(Clone, PartialEq, Debug)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub location: Option<SourceLocation>,
    pub args: Vec<String>,
}

impl Diagnostic {
    pub fn new(
        code: DiagnosticCode,
        location: Option<SourceLocation>,
        args: Vec<String>,
    ) -> Self {
        Self {
            code,
            location,
            args,
        }
    }

    pub fn multiple_inject_markers(
        field: &str,
        owner: &str,
        location: Option<SourceLocation>,
    ) -> Self {
        Self::new(
            DiagnosticCode::MultipleInjectMarkers,
            location,
            vec![field.to_string(), owner.to_string()],
        )
    }

    pub fn inaccessible_setter(
        field: &str,
        owner: &str,
        location: Option<SourceLocation>,
    ) -> Self {
        Self::new(
            DiagnosticCode::InaccessibleSetter,
            location,
            vec![field.to_string(), owner.to_string()],
        )
    }

    pub fn init_only_setter(field: &str, owner: &str, location: Option<SourceLocation>) -> Self {
        Self::new(
            DiagnosticCode::InitOnlySetter,
            location,
            vec![field.to_string(), owner.to_string()],
        )
    }

    pub fn generic_context(context: &str, location: Option<SourceLocation>) -> Self {
        Self::new(
            DiagnosticCode::GenericContext,
            location,
            vec![context.to_string()],
        )
    }

    pub fn multiple_contexts(context: &str, location: Option<SourceLocation>) -> Self {
        Self::new(
            DiagnosticCode::MultipleContexts,
            location,
            vec![context.to_string()],
        )
    }

    pub fn no_eligible_types(context: &str, location: Option<SourceLocation>) -> Self {
        Self::new(
            DiagnosticCode::NoEligibleTypes,
            location,
            vec![context.to_string()],
        )
    }

    pub fn provider_key_ignored(
        field: &str,
        owner: &str,
        location: Option<SourceLocation>,
    ) -> Self {
        Self::new(
            DiagnosticCode::ProviderKeyIgnored,
            location,
            vec![field.to_string(), owner.to_string()],
        )
    }

    /// Renders the message template with positional substitutions.
    pub fn message(&self) -> String {
        let mut message = self.code.message_template().to_string();
        for (index, arg) in self.args.iter().enumerate() {
            message = message.replace(&format!("{{{}}}", index), arg);
        }
        message
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(
                f,
                "{} ({}) at {}: {}",
                self.code.code(),
                self.code.severity().as_str(),
                location,
                self.message()
            ),
            None => write!(
                f,
                "{} ({}): {}",
                self.code.code(),
                self.code.severity().as_str(),
                self.message()
            ),
        }
    }
}
