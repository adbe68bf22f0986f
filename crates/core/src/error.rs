//! Error types for the modkit domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; every error is fatal —
//! assembly has no retry or rollback path, a failure aborts startup.

use thiserror::Error;

/// The top-level error type for all modkit operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Config model errors ---
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    // --- Selector errors ---
    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),

    // --- Definition space errors ---
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    // --- Assembly errors ---
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Structural violations detected while constructing config values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Component id must not be empty")]
    EmptyId,

    #[error("Implementation '{impl_type}' does not satisfy contract '{contract}'")]
    ContractNotSatisfied { impl_type: String, contract: String },

    #[error("Contract '{contract}' must be an interface")]
    ContractNotInterface { contract: String },

    #[error(
        "Plugin implementation '{impl_type}' must implement exactly one interface directly extending the plugin marker, found none"
    )]
    MissingPluginContract { impl_type: String },

    #[error(
        "Plugin implementation '{impl_type}' implements {count} interfaces directly extending the plugin marker, expected exactly one"
    )]
    AmbiguousPluginContract { impl_type: String, count: usize },

    #[error("Connector implementation '{impl_type}' must implement the connector marker")]
    NotAConnector { impl_type: String },

    #[error("A default zone id requires locales to be set")]
    ZoneWithoutLocales,
}

/// State-machine violations of the scoped type/operation query engine.
#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("Types cannot be added to scope after filtering")]
    ScopeFrozen,

    #[error("Filters cannot be added after the selector has been queried")]
    Queried,
}

/// Errors of the definition space registry.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Definition '{name}' is already registered")]
    Duplicate { name: String },

    #[error(
        "Definition name '{name}' does not match the '{prefix}' prefix required for kind '{kind}'"
    )]
    BadName {
        name: String,
        prefix: &'static str,
        kind: &'static str,
    },

    #[error("Definition '{name}' of kind '{kind}' not found in ({known:?})")]
    NotFound {
        name: String,
        kind: &'static str,
        known: Vec<String>,
    },

    #[error("Definition '{name}' is registered as kind '{actual}', not '{expected}'")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Errors raised while walking a declarative document.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Unknown {kind} type reference '{name}'")]
    UnknownTypeRef { kind: &'static str, name: String },

    #[error("Unable to find an operation for feature '{feature}' on bundle '{bundle}'")]
    MissingFeature { feature: String, bundle: String },

    #[error(
        "Feature operation '{feature}' on bundle '{bundle}' takes {count} parameters, expected 0 or a single parameter block"
    )]
    FeatureArity {
        feature: String,
        bundle: String,
        count: usize,
    },

    #[error("Reserved key '__flags__' must be a list of strings in '{context}'")]
    MalformedFlags { context: String },

    #[error("Parameter '{name}' has an unsupported composite value")]
    UnsupportedParamValue { name: String },

    #[error("Unknown boot parameter '{key}' referenced by a placeholder")]
    UnknownBootParam { key: String },

    #[error("Feature '{feature}' on bundle '{bundle}' failed: {source}")]
    Invocation {
        feature: String,
        bundle: String,
        #[source]
        source: Box<Error>,
    },
}
