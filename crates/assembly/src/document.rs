//! The in-memory shape of a declarative configuration document.
//!
//! Parsing the document text (YAML, JSON, ...) is not this crate's job:
//! any serde front-end can produce this model. Section order inside the
//! model is explicit — modules, features and plugins are lists, so the
//! document order the engine must honor survives deserialization.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Raw parameter block of one declaration entry. Values stay as JSON
/// values until assembly so the reserved flag list and scalar params can
/// share the map.
pub type ParamMap = BTreeMap<String, Value>;

/// A whole declarative document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentConfig {
    #[serde(default)]
    pub node: Option<NodeSection>,
    #[serde(default)]
    pub boot: Option<BootSection>,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
    /// Bare type references; always applied, never flag-gated.
    #[serde(default)]
    pub initializers: Vec<String>,
}

/// Optional node identity; every value may use `${boot.*}` placeholders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeSection {
    #[serde(default, rename = "appName")]
    pub app_name: Option<String>,
    #[serde(default, rename = "nodeId")]
    pub node_id: Option<String>,
    #[serde(default, rename = "endPoint")]
    pub end_point: Option<String>,
}

/// The boot section: locale/timezone params plus boot-level plugins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootSection {
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub plugins: Vec<EntryDecl>,
}

/// One module of the document: the feature-bundle type reference and its
/// optional configuration block.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleEntry {
    pub bundle: String,
    #[serde(default)]
    pub config: Option<ModuleSection>,
}

/// A module's configuration block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleSection {
    #[serde(default, rename = "__flags__")]
    pub flags: Vec<String>,
    #[serde(default)]
    pub features: Vec<EntryDecl>,
    /// Same shape as `features`, merged after it in document order.
    #[serde(default, rename = "featuresConfig")]
    pub features_config: Vec<EntryDecl>,
    #[serde(default)]
    pub plugins: Vec<EntryDecl>,
}

/// A single declaration entry: one name (feature name or type reference)
/// mapped to its parameter block.
///
/// Deserializes from either a bare string (no parameters) or a map with
/// exactly one pair — a plugin or feature is defined by its one name.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDecl {
    pub name: String,
    pub params: ParamMap,
}

impl EntryDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParamMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

impl<'de> Deserialize<'de> for EntryDecl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntryDeclVisitor;

        impl<'de> Visitor<'de> for EntryDeclVisitor {
            type Value = EntryDecl;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a name string or a single-pair map of name to parameters")
            }

            fn visit_str<E>(self, name: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(EntryDecl::new(name))
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let (name, params): (String, Option<ParamMap>) = access
                    .next_entry()?
                    .ok_or_else(|| de::Error::custom("an entry is defined by its one name"))?;
                if access.next_entry::<String, Value>()?.is_some() {
                    return Err(de::Error::custom(
                        "an entry is defined by its one name, found a second pair",
                    ));
                }
                Ok(EntryDecl {
                    name,
                    params: params.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_any(EntryDeclVisitor)
    }
}
