//! Component, plugin and connector config values.
//!
//! All of these are constructed once, validated eagerly, then immutable.
//! The proxy/concrete split is a tagged variant so each shape carries
//! exactly the fields it needs: a proxy has a contract and no
//! implementation, a concrete component has an implementation and an
//! optional contract the implementation must satisfy.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::descriptor::{TypeInfo, connector_marker, plugin_marker};
use crate::error::ConfigError;
use crate::param::Param;

/// The two legal shapes of a component declaration.
#[derive(Debug, Clone)]
pub enum ComponentVariant {
    /// A proxy: a contract with no implementation behind it at config time.
    Proxy { contract: Arc<TypeInfo> },
    /// A concrete component: an implementation, optionally constrained by a
    /// contract it must satisfy.
    Concrete {
        impl_type: Arc<TypeInfo>,
        contract: Option<Arc<TypeInfo>>,
    },
}

impl ComponentVariant {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Proxy { contract } => {
                if !contract.is_interface() {
                    return Err(ConfigError::ContractNotInterface {
                        contract: contract.full_name().to_string(),
                    });
                }
            }
            Self::Concrete {
                impl_type,
                contract,
            } => {
                if let Some(contract) = contract {
                    if !contract.is_interface() {
                        return Err(ConfigError::ContractNotInterface {
                            contract: contract.full_name().to_string(),
                        });
                    }
                    if !impl_type.is_subtype_of(contract) {
                        return Err(ConfigError::ContractNotSatisfied {
                            impl_type: impl_type.full_name().to_string(),
                            contract: contract.full_name().to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// The type the component id derives from: the contract when present,
    /// else the implementation.
    pub fn key_type(&self) -> &Arc<TypeInfo> {
        match self {
            Self::Proxy { contract } => contract,
            Self::Concrete {
                impl_type,
                contract,
            } => contract.as_ref().unwrap_or(impl_type),
        }
    }
}

/// A fully-resolved component config: derived id + variant + parameter map.
///
/// This is the currency the assembly engine hands to the external
/// object-graph runtime.
#[derive(Debug, Clone)]
pub struct CoreComponentConfig {
    id: String,
    variant: ComponentVariant,
    params: BTreeMap<String, String>,
}

impl CoreComponentConfig {
    pub fn new(
        id: impl Into<String>,
        variant: ComponentVariant,
        params: Vec<Param>,
    ) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::EmptyId);
        }
        variant.validate()?;
        Ok(Self {
            id,
            variant,
            params: params
                .into_iter()
                .map(|p| (p.name().to_string(), p.value().to_string()))
                .collect(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn variant(&self) -> &ComponentVariant {
        &self.variant
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self.variant, ComponentVariant::Proxy { .. })
    }

    /// The implementation type; `None` for a proxy.
    pub fn impl_type(&self) -> Option<&Arc<TypeInfo>> {
        match &self.variant {
            ComponentVariant::Proxy { .. } => None,
            ComponentVariant::Concrete { impl_type, .. } => Some(impl_type),
        }
    }

    pub fn contract(&self) -> Option<&Arc<TypeInfo>> {
        match &self.variant {
            ComponentVariant::Proxy { contract } => Some(contract),
            ComponentVariant::Concrete { contract, .. } => contract.as_ref(),
        }
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

/// A component declaration before id derivation.
#[derive(Debug, Clone)]
pub struct ComponentConfig {
    variant: ComponentVariant,
    params: Vec<Param>,
}

impl ComponentConfig {
    /// Declare a proxy over a contract.
    pub fn proxy(contract: Arc<TypeInfo>) -> Result<Self, ConfigError> {
        let variant = ComponentVariant::Proxy { contract };
        variant.validate()?;
        Ok(Self {
            variant,
            params: Vec::new(),
        })
    }

    /// Declare a concrete component.
    pub fn concrete(
        impl_type: Arc<TypeInfo>,
        contract: Option<Arc<TypeInfo>>,
        params: Vec<Param>,
    ) -> Result<Self, ConfigError> {
        let variant = ComponentVariant::Concrete {
            impl_type,
            contract,
        };
        variant.validate()?;
        Ok(Self { variant, params })
    }

    pub fn variant(&self) -> &ComponentVariant {
        &self.variant
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub(crate) fn into_parts(self) -> (ComponentVariant, Vec<Param>) {
        (self.variant, self.params)
    }
}

/// A plugin declaration, scoped to an owning module or boot config.
///
/// The plugin contract is not declared — it is discovered from the
/// implementation's interface hierarchy: exactly one implemented interface
/// must directly extend the plugin marker.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    contract: Arc<TypeInfo>,
    impl_type: Arc<TypeInfo>,
    params: Vec<Param>,
}

impl PluginConfig {
    pub fn new(impl_type: Arc<TypeInfo>, params: Vec<Param>) -> Result<Self, ConfigError> {
        let contract = discover_plugin_contract(&impl_type)?;
        Ok(Self {
            contract,
            impl_type,
            params,
        })
    }

    /// The interface defining the plugin's type, discovered at construction.
    pub fn contract(&self) -> &Arc<TypeInfo> {
        &self.contract
    }

    pub fn impl_type(&self) -> &Arc<TypeInfo> {
        &self.impl_type
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// Find the interface that defines a plugin implementation's type: the one
/// interface in its hierarchy that directly extends the plugin marker.
fn discover_plugin_contract(impl_type: &Arc<TypeInfo>) -> Result<Arc<TypeInfo>, ConfigError> {
    let marker = plugin_marker();
    let candidates: Vec<Arc<TypeInfo>> = impl_type
        .all_interfaces()
        .into_iter()
        .filter(|intf| {
            intf.interfaces()
                .iter()
                .any(|parent| parent.full_name() == marker.full_name())
        })
        .collect();
    match candidates.len() {
        0 => Err(ConfigError::MissingPluginContract {
            impl_type: impl_type.full_name().to_string(),
        }),
        1 => Ok(candidates.into_iter().next().expect("one candidate")),
        count => Err(ConfigError::AmbiguousPluginContract {
            impl_type: impl_type.full_name().to_string(),
            count,
        }),
    }
}

/// A connector declaration: a named bridge to an external resource.
///
/// The human-assigned name (default `"main"`) lets several instances of the
/// same connector type coexist; id disambiguation itself happens later, at
/// id resolution.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    name: String,
    contract: Option<Arc<TypeInfo>>,
    impl_type: Arc<TypeInfo>,
    params: Vec<Param>,
}

impl ConnectorConfig {
    pub fn new(
        impl_type: Arc<TypeInfo>,
        contract: Option<Arc<TypeInfo>>,
        params: Vec<Param>,
    ) -> Result<Self, ConfigError> {
        if !impl_type.is_subtype_of(&connector_marker()) {
            return Err(ConfigError::NotAConnector {
                impl_type: impl_type.full_name().to_string(),
            });
        }
        if let Some(contract) = &contract {
            if !contract.is_interface() {
                return Err(ConfigError::ContractNotInterface {
                    contract: contract.full_name().to_string(),
                });
            }
            if !impl_type.is_subtype_of(contract) {
                return Err(ConfigError::ContractNotSatisfied {
                    impl_type: impl_type.full_name().to_string(),
                    contract: contract.full_name().to_string(),
                });
            }
        }
        Ok(Self {
            name: "main".to_string(),
            contract,
            impl_type,
            params,
        })
    }

    /// Override the default `"main"` connector name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contract(&self) -> Option<&Arc<TypeInfo>> {
        self.contract.as_ref()
    }

    pub fn impl_type(&self) -> &Arc<TypeInfo> {
        &self.impl_type
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The type the connector id derives from.
    pub fn key_type(&self) -> &Arc<TypeInfo> {
        self.contract.as_ref().unwrap_or(&self.impl_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract() -> Arc<TypeInfo> {
        TypeInfo::interface("demo::Store").build()
    }

    fn impl_of(contract: &Arc<TypeInfo>) -> Arc<TypeInfo> {
        TypeInfo::builder("demo::SqlStore")
            .implements(contract.clone())
            .build()
    }

    #[test]
    fn proxy_requires_an_interface_contract() {
        let concrete = TypeInfo::builder("demo::SqlStore").build();
        let err = ComponentConfig::proxy(concrete).unwrap_err();
        assert!(matches!(err, ConfigError::ContractNotInterface { .. }));

        assert!(ComponentConfig::proxy(contract()).is_ok());
    }

    #[test]
    fn concrete_impl_must_satisfy_contract() {
        let contract = contract();
        let unrelated = TypeInfo::builder("demo::Unrelated").build();

        let err =
            ComponentConfig::concrete(unrelated, Some(contract.clone()), vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::ContractNotSatisfied { .. }));

        let ok = ComponentConfig::concrete(impl_of(&contract), Some(contract), vec![]);
        assert!(ok.is_ok());
    }

    #[test]
    fn core_component_rejects_empty_id() {
        let variant = ComponentVariant::Concrete {
            impl_type: TypeInfo::builder("demo::SqlStore").build(),
            contract: None,
        };
        let err = CoreComponentConfig::new("", variant, vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyId));
    }

    #[test]
    fn plugin_contract_is_discovered() {
        let plugin_api = TypeInfo::interface("demo::StorePlugin")
            .implements(plugin_marker())
            .build();
        let impl_type = TypeInfo::builder("demo::SqlStorePlugin")
            .implements(plugin_api.clone())
            .build();

        let plugin = PluginConfig::new(impl_type, vec![]).unwrap();
        assert_eq!(plugin.contract().full_name(), "demo::StorePlugin");
    }

    #[test]
    fn plugin_without_marker_interface_is_fatal() {
        let impl_type = TypeInfo::builder("demo::Bare").build();
        let err = PluginConfig::new(impl_type, vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPluginContract { .. }));
    }

    #[test]
    fn plugin_with_two_marker_interfaces_is_fatal() {
        let first = TypeInfo::interface("demo::FirstPlugin")
            .implements(plugin_marker())
            .build();
        let second = TypeInfo::interface("demo::SecondPlugin")
            .implements(plugin_marker())
            .build();
        let impl_type = TypeInfo::builder("demo::DoublePlugin")
            .implements(first)
            .implements(second)
            .build();

        let err = PluginConfig::new(impl_type, vec![]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::AmbiguousPluginContract { count: 2, .. }
        ));
    }

    #[test]
    fn connector_defaults_to_main() {
        let impl_type = TypeInfo::builder("demo::PgConnector")
            .implements(connector_marker())
            .build();
        let connector = ConnectorConfig::new(impl_type, None, vec![]).unwrap();
        assert_eq!(connector.name(), "main");

        let renamed = connector.with_name("reporting");
        assert_eq!(renamed.name(), "reporting");
    }

    #[test]
    fn connector_must_implement_the_marker() {
        let impl_type = TypeInfo::builder("demo::NotAConnector").build();
        let err = ConnectorConfig::new(impl_type, None, vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::NotAConnector { .. }));
    }
}
