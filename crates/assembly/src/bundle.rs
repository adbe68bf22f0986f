//! Feature bundles and the registration tables resolving type references.
//!
//! There is no `Class.forName` here: a document's type references resolve
//! through explicit registries populated at startup. Bundles register a
//! factory (the zero-argument constructor); plugin and initializer types
//! register their descriptors.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use modkit_core::{AssemblyError, ModuleConfig, Param, PluginConfig, Result, TypeInfo};

/// One module's feature bundle: the object exposing one builder operation
/// per feature.
///
/// The descriptor declares the operations; the engine resolves feature
/// names against it through the selector and drives `invoke`.
pub trait FeatureBundle {
    /// The descriptor of this bundle type, feature operations included.
    fn descriptor(&self) -> Arc<TypeInfo>;

    /// Apply one builder operation. `params` is empty for a zero-parameter
    /// operation, else the entry's resolved parameter block.
    fn invoke(&mut self, operation: &str, params: Vec<Param>) -> Result<()>;

    /// Register a plugin on this bundle.
    fn add_plugin(&mut self, plugin: PluginConfig);

    /// Finish the bundle into its module config.
    fn build(self: Box<Self>) -> Result<ModuleConfig>;
}

impl std::fmt::Debug for dyn FeatureBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FeatureBundle")
            .field(&self.descriptor().full_name())
            .finish()
    }
}

type BundleFactory = Box<dyn Fn() -> Box<dyn FeatureBundle>>;

/// Registry of feature-bundle factories, keyed by the bundle type's full
/// name.
#[derive(Default)]
pub struct BundleRegistry {
    factories: HashMap<String, BundleFactory>,
}

impl BundleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bundle factory. Replaces any factory registered for the
    /// same bundle type.
    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn FeatureBundle> + 'static,
    {
        let name = factory().descriptor().full_name().to_string();
        info!(bundle = %name, "Registered feature bundle");
        self.factories.insert(name, Box::new(factory));
    }

    /// Instantiate a fresh bundle for a type reference.
    pub fn instantiate(&self, type_ref: &str) -> std::result::Result<Box<dyn FeatureBundle>, AssemblyError> {
        let factory = self
            .factories
            .get(type_ref)
            .ok_or_else(|| AssemblyError::UnknownTypeRef {
                kind: "bundle",
                name: type_ref.to_string(),
            })?;
        Ok(factory())
    }
}

/// Registry of plain type descriptors (plugin implementations,
/// initializers), keyed by full name.
#[derive(Default)]
pub struct TypeRefRegistry {
    types: HashMap<String, Arc<TypeInfo>>,
}

impl TypeRefRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, info: Arc<TypeInfo>) {
        info!(type_ref = %info.full_name(), "Registered type");
        self.types.insert(info.full_name().to_string(), info);
    }

    pub fn lookup(
        &self,
        kind: &'static str,
        type_ref: &str,
    ) -> std::result::Result<Arc<TypeInfo>, AssemblyError> {
        self.types
            .get(type_ref)
            .cloned()
            .ok_or_else(|| AssemblyError::UnknownTypeRef {
                kind,
                name: type_ref.to_string(),
            })
    }
}
