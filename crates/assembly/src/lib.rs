//! # modkit Assembly
//!
//! The declarative assembly engine: walks a configuration document
//! (modules, features, plugins, initializers), evaluates flag gates and
//! `${boot.*}` placeholders, and drives the modkit-core config builders
//! into a finished [`AppConfig`](modkit_core::AppConfig).
//!
//! The document model is serde-based and format-agnostic; the engine is
//! single-threaded and fail-fast. Type references resolve through explicit
//! registries, never through runtime reflection.

pub mod bundle;
pub mod document;
pub mod engine;
pub mod flags;
pub mod properties;

// Re-export key types at crate root for ergonomics
pub use bundle::{BundleRegistry, FeatureBundle, TypeRefRegistry};
pub use document::{
    BootSection, DocumentConfig, EntryDecl, ModuleEntry, ModuleSection, NodeSection, ParamMap,
};
pub use engine::AssemblyEngine;
pub use flags::{ACTIVE_FLAGS_PROPERTY, ActiveFlags, FLAGS_KEY};
pub use properties::BootProperties;
