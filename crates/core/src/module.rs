//! Module configs — one named module bundles components, plugins and
//! connectors, and resolves their ids when built.

use std::sync::Arc;

use tracing::debug;

use crate::component::{
    ComponentConfig, ComponentVariant, ConnectorConfig, CoreComponentConfig, PluginConfig,
};
use crate::descriptor::TypeInfo;
use crate::error::ConfigError;
use crate::ids;

/// A finished module: its name and the ordered component configs the
/// external runtime will instantiate.
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    name: String,
    components: Vec<CoreComponentConfig>,
}

impl ModuleConfig {
    /// Start building a module.
    pub fn builder(name: impl Into<String>) -> ModuleConfigBuilder {
        ModuleConfigBuilder {
            name: name.into(),
            components: Vec::new(),
            plugins: Vec::new(),
            connectors: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Components in resolution order: declared components first, then
    /// plugins, then connectors, each in document order.
    pub fn components(&self) -> &[CoreComponentConfig] {
        &self.components
    }
}

/// Accumulates a module's declarations; `build` derives ids and produces
/// the final [`ModuleConfig`].
#[derive(Debug)]
pub struct ModuleConfigBuilder {
    name: String,
    components: Vec<ComponentConfig>,
    plugins: Vec<PluginConfig>,
    connectors: Vec<ConnectorConfig>,
}

impl ModuleConfigBuilder {
    pub fn add_component(&mut self, component: ComponentConfig) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn add_plugin(&mut self, plugin: PluginConfig) -> &mut Self {
        self.plugins.push(plugin);
        self
    }

    pub fn add_connector(&mut self, connector: ConnectorConfig) -> &mut Self {
        self.connectors.push(connector);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build(self) -> Result<ModuleConfig, ConfigError> {
        let mut components = Vec::new();

        for component in self.components {
            let id = ids::component_id(component.variant().key_type());
            let (variant, params) = component.into_parts();
            components.push(CoreComponentConfig::new(id, variant, params)?);
        }
        components.extend(resolve_plugins(self.plugins)?);
        components.extend(resolve_connectors(self.connectors)?);

        debug!(module = %self.name, components = components.len(), "Built module config");
        Ok(ModuleConfig {
            name: self.name,
            components,
        })
    }
}

/// Resolve plugin configs into component configs, disambiguating ids.
pub fn resolve_plugins(
    plugins: Vec<PluginConfig>,
) -> Result<Vec<CoreComponentConfig>, ConfigError> {
    let bases: Vec<String> = plugins
        .iter()
        .map(|p| ids::component_id(p.contract()))
        .collect();
    ids::unique_ids(bases)
        .into_iter()
        .zip(plugins)
        .map(|(id, plugin)| {
            let contract: Arc<TypeInfo> = plugin.contract().clone();
            CoreComponentConfig::new(
                id,
                ComponentVariant::Concrete {
                    impl_type: plugin.impl_type().clone(),
                    contract: Some(contract),
                },
                plugin.params().to_vec(),
            )
        })
        .collect()
}

/// Resolve connector configs into component configs, disambiguating ids.
pub fn resolve_connectors(
    connectors: Vec<ConnectorConfig>,
) -> Result<Vec<CoreComponentConfig>, ConfigError> {
    let bases: Vec<String> = connectors
        .iter()
        .map(|c| ids::component_id(c.key_type()))
        .collect();
    ids::unique_ids(bases)
        .into_iter()
        .zip(connectors)
        .map(|(id, connector)| {
            CoreComponentConfig::new(
                id,
                ComponentVariant::Concrete {
                    impl_type: connector.impl_type().clone(),
                    contract: connector.contract().cloned(),
                },
                connector.params().to_vec(),
            )
        })
        .collect()
}
