//! # modkit Core
//!
//! Domain types for the modkit application assembly engine: type
//! descriptors, the selector query utility, the config model, id
//! resolution, and the definition space.
//!
//! ## Design Philosophy
//!
//! Everything in this crate is a value or a registry — constructed once,
//! validated eagerly, immutable after. The assembly crate walks a
//! declarative document and drives these builders; the external
//! object-graph runtime consumes the finished [`AppConfig`]. There is no
//! runtime type introspection anywhere: types take part in assembly by
//! registering an explicit [`TypeInfo`] descriptor.

pub mod app;
pub mod boot;
pub mod component;
pub mod definition;
pub mod descriptor;
pub mod error;
pub mod ids;
pub mod module;
pub mod param;
pub mod selector;

// Re-export key types at crate root for ergonomics
pub use app::{AppConfig, AppConfigBuilder};
pub use boot::{BootConfig, BootConfigBuilder, NodeConfig, NodeConfigBuilder};
pub use component::{
    ComponentConfig, ComponentVariant, ConnectorConfig, CoreComponentConfig, PluginConfig,
};
pub use definition::{Definition, DefinitionSpace};
pub use descriptor::{
    FEATURE_MARKER, OperationInfo, TypeInfo, TypeInfoBuilder, connector_marker, plugin_marker,
};
pub use error::{
    AssemblyError, ConfigError, DefinitionError, Error, Result, SelectorError,
};
pub use module::{ModuleConfig, ModuleConfigBuilder};
pub use param::Param;
pub use selector::{ClassConditions, MethodConditions, Selector};
