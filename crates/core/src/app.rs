//! The assembled application configuration.
//!
//! This is the assembly engine's sole output: node identity, boot config,
//! the ordered module list and the initializer list. The external
//! object-graph runtime turns it into live instances.

use std::sync::Arc;

use tracing::info;

use crate::boot::{BootConfig, BootConfigBuilder, NodeConfig};
use crate::descriptor::TypeInfo;
use crate::error::ConfigError;
use crate::module::ModuleConfig;

/// A finished, validated application configuration.
#[derive(Debug)]
pub struct AppConfig {
    node: NodeConfig,
    boot: BootConfig,
    modules: Vec<ModuleConfig>,
    initializers: Vec<Arc<TypeInfo>>,
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder {
            node: None,
            boot: BootConfigBuilder::default(),
            modules: Vec::new(),
            initializers: Vec::new(),
        }
    }

    pub fn node(&self) -> &NodeConfig {
        &self.node
    }

    pub fn boot(&self) -> &BootConfig {
        &self.boot
    }

    /// Modules in document order.
    pub fn modules(&self) -> &[ModuleConfig] {
        &self.modules
    }

    /// Initializer types, in declaration order. Always applied, never
    /// flag-gated.
    pub fn initializers(&self) -> &[Arc<TypeInfo>] {
        &self.initializers
    }
}

/// Accumulates the application configuration during assembly.
#[derive(Debug)]
pub struct AppConfigBuilder {
    node: Option<NodeConfig>,
    boot: BootConfigBuilder,
    modules: Vec<ModuleConfig>,
    initializers: Vec<Arc<TypeInfo>>,
}

impl AppConfigBuilder {
    pub fn with_node_config(&mut self, node: NodeConfig) -> &mut Self {
        self.node = Some(node);
        self
    }

    /// Access the boot config builder.
    pub fn begin_boot(&mut self) -> &mut BootConfigBuilder {
        &mut self.boot
    }

    pub fn add_module(&mut self, module: ModuleConfig) -> &mut Self {
        self.modules.push(module);
        self
    }

    pub fn add_initializer(&mut self, initializer: Arc<TypeInfo>) -> &mut Self {
        self.initializers.push(initializer);
        self
    }

    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let node = self.node.unwrap_or_default();
        let boot = self.boot.build()?;
        info!(
            app = %node.app_name(),
            modules = self.modules.len(),
            initializers = self.initializers.len(),
            "Assembled application configuration"
        );
        Ok(AppConfig {
            node,
            boot,
            modules: self.modules,
            initializers: self.initializers,
        })
    }
}
