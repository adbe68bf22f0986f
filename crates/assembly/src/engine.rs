//! The assembly engine — walks a declarative document and accumulates the
//! application configuration.
//!
//! One engine processes one startup sequence, single-threaded and
//! fail-fast: the first error aborts assembly, nothing is retried and
//! nothing is rolled back.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info};

use modkit_core::{
    AppConfig, AppConfigBuilder, AssemblyError, FEATURE_MARKER, MethodConditions,
    NodeConfig, OperationInfo, Param, PluginConfig, Result, Selector,
};

use crate::bundle::{BundleRegistry, FeatureBundle, TypeRefRegistry};
use crate::document::{DocumentConfig, EntryDecl, ModuleEntry, ParamMap};
use crate::flags::{ActiveFlags, FLAGS_KEY, flags_of};
use crate::properties::BootProperties;

type FeatureOps = Arc<HashMap<String, OperationInfo>>;

/// Walks declarative documents and builds the application configuration.
///
/// The active-flags set is computed once, at construction, from the
/// reserved `boot.activeFlags` property; the remaining properties become
/// the boot-parameter table for `${boot.*}` placeholders.
pub struct AssemblyEngine<'r> {
    active_flags: ActiveFlags,
    properties: BootProperties,
    bundles: &'r BundleRegistry,
    types: &'r TypeRefRegistry,
    feature_ops: HashMap<String, FeatureOps>,
    app: AppConfigBuilder,
}

impl<'r> AssemblyEngine<'r> {
    pub fn new(
        mut properties: BTreeMap<String, String>,
        bundles: &'r BundleRegistry,
        types: &'r TypeRefRegistry,
    ) -> Self {
        let active_flags = ActiveFlags::from_properties(&mut properties);
        Self {
            active_flags,
            properties: BootProperties::new(properties),
            bundles,
            types,
            feature_ops: HashMap::new(),
            app: AppConfig::builder(),
        }
    }

    /// Process one document: node identity, boot section, modules in
    /// document order, then initializers.
    pub fn apply_document(&mut self, doc: &DocumentConfig) -> Result<()> {
        self.handle_node(doc)?;
        self.handle_boot(doc)?;
        for entry in &doc.modules {
            self.handle_module(entry)?;
        }
        for initializer in &doc.initializers {
            // initializers are always added: no parameter block, no flags
            let info = self.types.lookup("initializer", initializer)?;
            self.app.add_initializer(info);
        }
        Ok(())
    }

    /// Finish assembly and hand back the application configuration.
    pub fn build(self) -> Result<AppConfig> {
        Ok(self.app.build()?)
    }

    fn handle_node(&mut self, doc: &DocumentConfig) -> Result<()> {
        let Some(node) = &doc.node else {
            return Ok(());
        };
        let mut builder = NodeConfig::builder();
        if let Some(app_name) = &node.app_name {
            builder.with_app_name(self.properties.eval(app_name)?);
        }
        if let Some(node_id) = &node.node_id {
            builder.with_node_id(self.properties.eval(node_id)?);
        }
        if let Some(end_point) = &node.end_point {
            builder.with_end_point(self.properties.eval(end_point)?);
        }
        self.app.with_node_config(builder.build());
        Ok(())
    }

    fn handle_boot(&mut self, doc: &DocumentConfig) -> Result<()> {
        let Some(boot) = &doc.boot else {
            return Ok(());
        };
        // locale/timezone settings apply directly, no flag gating
        if let Some(locales) = boot.params.get("locales") {
            match boot.params.get("defaultZoneId") {
                Some(zone) => {
                    self.app
                        .begin_boot()
                        .with_locales_and_default_zone_id(locales, zone);
                }
                None => {
                    self.app.begin_boot().with_locales(locales);
                }
            }
        }
        for decl in &boot.plugins {
            if let Some(plugin) = self.plugin_config(decl)? {
                debug!(plugin = %decl.name, "Registered boot plugin");
                self.app.begin_boot().add_plugin(plugin);
            }
        }
        Ok(())
    }

    fn handle_module(&mut self, entry: &ModuleEntry) -> Result<()> {
        let Some(section) = &entry.config else {
            // no parameter block: a simple module, added unconditionally
            let bundle = self.bundles.instantiate(&entry.bundle)?;
            info!(module = %entry.bundle, "Added simple module");
            self.app.add_module(bundle.build()?);
            return Ok(());
        };

        if !self.active_flags.is_enabled(&section.flags) {
            // omission is total: no features, no plugins, no side effects
            debug!(module = %entry.bundle, "Module disabled by flags");
            return Ok(());
        }

        let mut bundle = self.bundles.instantiate(&entry.bundle)?;
        let ops = self.feature_ops_of(&entry.bundle, bundle.as_ref())?;

        for decl in section.features.iter().chain(&section.features_config) {
            self.apply_feature(bundle.as_mut(), &entry.bundle, &ops, decl)?;
        }
        for decl in &section.plugins {
            if let Some(plugin) = self.plugin_config(decl)? {
                debug!(module = %entry.bundle, plugin = %decl.name, "Registered module plugin");
                bundle.add_plugin(plugin);
            }
        }
        info!(module = %entry.bundle, "Added module");
        self.app.add_module(bundle.build()?);
        Ok(())
    }

    /// Build the feature-name to operation mapping, once per bundle type.
    fn feature_ops_of(&mut self, type_ref: &str, bundle: &dyn FeatureBundle) -> Result<FeatureOps> {
        if let Some(ops) = self.feature_ops.get(type_ref) {
            return Ok(ops.clone());
        }
        let mut selector = Selector::new();
        selector.from(bundle.descriptor())?;
        selector.filter_methods(MethodConditions::marked_with(FEATURE_MARKER))?;
        let ops: HashMap<String, OperationInfo> = selector
            .find_methods()
            .into_iter()
            .filter_map(|(_, op)| {
                let feature = op.marker_value(FEATURE_MARKER)?.to_string();
                Some((feature, op))
            })
            .collect();
        let ops = Arc::new(ops);
        self.feature_ops.insert(type_ref.to_string(), ops.clone());
        Ok(ops)
    }

    fn apply_feature(
        &self,
        bundle: &mut dyn FeatureBundle,
        bundle_ref: &str,
        ops: &FeatureOps,
        decl: &EntryDecl,
    ) -> Result<()> {
        let op = ops
            .get(&decl.name)
            .ok_or_else(|| AssemblyError::MissingFeature {
                feature: decl.name.clone(),
                bundle: bundle_ref.to_string(),
            })?;
        // arity is structural: checked once, independent of flags
        if op.param_count() > 1 {
            return Err(AssemblyError::FeatureArity {
                feature: decl.name.clone(),
                bundle: bundle_ref.to_string(),
                count: op.param_count(),
            }
            .into());
        }
        if !self.active_flags.is_enabled(&flags_of(&decl.params, &decl.name)?) {
            debug!(feature = %decl.name, bundle = %bundle_ref, "Feature disabled by flags");
            return Ok(());
        }
        let params = if op.param_count() == 1 {
            self.build_params(&decl.params)?
        } else {
            Vec::new()
        };
        debug!(feature = %decl.name, bundle = %bundle_ref, "Applying feature");
        bundle
            .invoke(op.name(), params)
            .map_err(|source| AssemblyError::Invocation {
                feature: decl.name.clone(),
                bundle: bundle_ref.to_string(),
                source: Box::new(source),
            })?;
        Ok(())
    }

    /// Resolve a declaration into a plugin config, or `None` when its flag
    /// gate disables it.
    fn plugin_config(&self, decl: &EntryDecl) -> Result<Option<PluginConfig>> {
        if !self.active_flags.is_enabled(&flags_of(&decl.params, &decl.name)?) {
            debug!(plugin = %decl.name, "Plugin disabled by flags");
            return Ok(None);
        }
        let impl_type = self.types.lookup("plugin", &decl.name)?;
        let params = self.build_params(&decl.params)?;
        Ok(Some(PluginConfig::new(impl_type, params)?))
    }

    /// Convert a raw parameter block into Params, excluding the reserved
    /// flag key and resolving placeholders.
    fn build_params(&self, params: &ParamMap) -> Result<Vec<Param>> {
        params
            .iter()
            .filter(|(name, _)| name.as_str() != FLAGS_KEY)
            .map(|(name, value)| {
                Ok(Param::of(name, self.properties.eval_raw(name, value)?))
            })
            .collect()
    }
}
