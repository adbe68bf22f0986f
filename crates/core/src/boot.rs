//! Node identity and boot config — everything applied before modules.

use uuid::Uuid;

use crate::component::{CoreComponentConfig, PluginConfig};
use crate::error::ConfigError;
use crate::module::resolve_plugins;

/// Identity of the running node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    app_name: String,
    node_id: String,
    end_point: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl NodeConfig {
    pub fn builder() -> NodeConfigBuilder {
        NodeConfigBuilder {
            app_name: None,
            node_id: None,
            end_point: None,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn end_point(&self) -> Option<&str> {
        self.end_point.as_deref()
    }
}

/// Builder for [`NodeConfig`]. Unset fields fall back to the defaults:
/// app name `"app"`, a random node id, no end point.
#[derive(Debug, Default)]
pub struct NodeConfigBuilder {
    app_name: Option<String>,
    node_id: Option<String>,
    end_point: Option<String>,
}

impl NodeConfigBuilder {
    pub fn with_app_name(&mut self, app_name: impl Into<String>) -> &mut Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_node_id(&mut self, node_id: impl Into<String>) -> &mut Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn with_end_point(&mut self, end_point: impl Into<String>) -> &mut Self {
        self.end_point = Some(end_point.into());
        self
    }

    pub fn build(self) -> NodeConfig {
        NodeConfig {
            app_name: self.app_name.unwrap_or_else(|| "app".to_string()),
            node_id: self
                .node_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            end_point: self.end_point,
        }
    }
}

/// The portion of configuration applied before any module: locale and
/// timezone settings plus boot-level plugins, resolved to component
/// configs.
#[derive(Debug, Clone)]
pub struct BootConfig {
    locales: Option<String>,
    default_zone_id: Option<String>,
    components: Vec<CoreComponentConfig>,
}

impl BootConfig {
    pub fn locales(&self) -> Option<&str> {
        self.locales.as_deref()
    }

    pub fn default_zone_id(&self) -> Option<&str> {
        self.default_zone_id.as_deref()
    }

    /// Boot plugin component configs, in declaration order.
    pub fn components(&self) -> &[CoreComponentConfig] {
        &self.components
    }
}

/// Accumulates boot settings; owned by the app config builder.
#[derive(Debug, Default)]
pub struct BootConfigBuilder {
    locales: Option<String>,
    default_zone_id: Option<String>,
    plugins: Vec<PluginConfig>,
}

impl BootConfigBuilder {
    pub fn with_locales(&mut self, locales: impl Into<String>) -> &mut Self {
        self.locales = Some(locales.into());
        self
    }

    pub fn with_locales_and_default_zone_id(
        &mut self,
        locales: impl Into<String>,
        default_zone_id: impl Into<String>,
    ) -> &mut Self {
        self.locales = Some(locales.into());
        self.default_zone_id = Some(default_zone_id.into());
        self
    }

    pub fn add_plugin(&mut self, plugin: PluginConfig) -> &mut Self {
        self.plugins.push(plugin);
        self
    }

    pub fn build(self) -> Result<BootConfig, ConfigError> {
        if self.default_zone_id.is_some() && self.locales.is_none() {
            return Err(ConfigError::ZoneWithoutLocales);
        }
        Ok(BootConfig {
            locales: self.locales,
            default_zone_id: self.default_zone_id,
            components: resolve_plugins(self.plugins)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{TypeInfo, plugin_marker};

    #[test]
    fn node_defaults() {
        let node = NodeConfig::default();
        assert_eq!(node.app_name(), "app");
        assert!(!node.node_id().is_empty());
        assert!(node.end_point().is_none());
    }

    #[test]
    fn node_builder_overrides() {
        let mut builder = NodeConfig::builder();
        builder
            .with_app_name("orders")
            .with_node_id("node-1")
            .with_end_point("http://localhost:8080");
        let node = builder.build();
        assert_eq!(node.app_name(), "orders");
        assert_eq!(node.node_id(), "node-1");
        assert_eq!(node.end_point(), Some("http://localhost:8080"));
    }

    #[test]
    fn zone_without_locales_is_rejected() {
        let mut builder = BootConfigBuilder::default();
        builder.default_zone_id = Some("UTC".into());
        assert!(matches!(
            builder.build().unwrap_err(),
            ConfigError::ZoneWithoutLocales
        ));
    }

    #[test]
    fn boot_plugins_resolve_to_components() {
        let api = TypeInfo::interface("demo::LogPlugin")
            .implements(plugin_marker())
            .build();
        let impl_type = TypeInfo::builder("demo::ConsoleLogPlugin")
            .implements(api)
            .build();

        let mut builder = BootConfigBuilder::default();
        builder.with_locales("fr_FR");
        builder.add_plugin(PluginConfig::new(impl_type, vec![]).unwrap());

        let boot = builder.build().unwrap();
        assert_eq!(boot.locales(), Some("fr_FR"));
        assert_eq!(boot.components().len(), 1);
        assert_eq!(boot.components()[0].id(), "logPlugin");
    }
}
