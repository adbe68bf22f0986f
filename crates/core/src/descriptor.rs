//! Type descriptors — the declared shape of components, plugins,
//! connectors and feature bundles.
//!
//! modkit has no runtime type introspection, so every type that takes part
//! in assembly registers an immutable [`TypeInfo`] describing its name, the
//! interfaces it implements, its markers, and its declared operations. The
//! [`Selector`](crate::selector::Selector) and the config model query these
//! descriptors instead of reflecting on live types.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

/// Marker carried by feature builder operations; its value is the declared
/// feature name.
pub const FEATURE_MARKER: &str = "feature";

/// Descriptor of a declared operation (a builder method on a bundle type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationInfo {
    name: String,
    markers: BTreeMap<String, Option<String>>,
    param_count: usize,
}

impl OperationInfo {
    /// Declare an operation with zero parameters and no markers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markers: BTreeMap::new(),
            param_count: 0,
        }
    }

    /// Set the declared parameter count.
    pub fn with_params(mut self, count: usize) -> Self {
        self.param_count = count;
        self
    }

    /// Attach a value-less marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.insert(marker.into(), None);
        self
    }

    /// Attach a valued marker (e.g. the feature marker with its name).
    pub fn with_marker_value(
        mut self,
        marker: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.markers.insert(marker.into(), Some(value.into()));
        self
    }

    /// Shorthand for an operation marked as a feature activation point.
    pub fn feature(name: impl Into<String>, feature: impl Into<String>) -> Self {
        Self::new(name).with_marker_value(FEATURE_MARKER, feature)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_count(&self) -> usize {
        self.param_count
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains_key(marker)
    }

    /// The value carried by a marker, if the marker is present and valued.
    pub fn marker_value(&self, marker: &str) -> Option<&str> {
        self.markers.get(marker).and_then(|v| v.as_deref())
    }
}

/// Immutable descriptor of a type taking part in assembly.
#[derive(Debug)]
pub struct TypeInfo {
    simple_name: String,
    full_name: String,
    interface: bool,
    markers: BTreeMap<String, Option<String>>,
    interfaces: Vec<Arc<TypeInfo>>,
    operations: Vec<OperationInfo>,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for TypeInfo {}

impl TypeInfo {
    /// Start describing a concrete type. The simple name is the last
    /// `::`-separated segment of the full name.
    pub fn builder(full_name: impl Into<String>) -> TypeInfoBuilder {
        TypeInfoBuilder {
            full_name: full_name.into(),
            interface: false,
            markers: BTreeMap::new(),
            interfaces: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Start describing an interface type.
    pub fn interface(full_name: impl Into<String>) -> TypeInfoBuilder {
        let mut builder = Self::builder(full_name);
        builder.interface = true;
        builder
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn is_interface(&self) -> bool {
        self.interface
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains_key(marker)
    }

    pub fn marker_value(&self, marker: &str) -> Option<&str> {
        self.markers.get(marker).and_then(|v| v.as_deref())
    }

    /// The interfaces this type directly implements or extends.
    pub fn interfaces(&self) -> &[Arc<TypeInfo>] {
        &self.interfaces
    }

    /// The operations declared directly on this type.
    pub fn operations(&self) -> &[OperationInfo] {
        &self.operations
    }

    /// All interfaces reachable through the interface hierarchy, in
    /// discovery order, without duplicates.
    pub fn all_interfaces(&self) -> Vec<Arc<TypeInfo>> {
        let mut seen: Vec<Arc<TypeInfo>> = Vec::new();
        let mut stack: Vec<Arc<TypeInfo>> = self.interfaces.iter().rev().cloned().collect();
        while let Some(intf) = stack.pop() {
            if seen.iter().any(|s| s.full_name == intf.full_name) {
                continue;
            }
            stack.extend(intf.interfaces.iter().rev().cloned());
            seen.push(intf);
        }
        seen
    }

    /// Whether this type is the given type or implements it, directly or
    /// transitively.
    pub fn is_subtype_of(&self, other: &TypeInfo) -> bool {
        self.full_name == other.full_name
            || self
                .all_interfaces()
                .iter()
                .any(|intf| intf.full_name == other.full_name)
    }
}

/// Builder for [`TypeInfo`].
#[derive(Debug)]
pub struct TypeInfoBuilder {
    full_name: String,
    interface: bool,
    markers: BTreeMap<String, Option<String>>,
    interfaces: Vec<Arc<TypeInfo>>,
    operations: Vec<OperationInfo>,
}

impl TypeInfoBuilder {
    /// Declare a directly implemented (or extended) interface.
    pub fn implements(mut self, interface: Arc<TypeInfo>) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Attach a value-less marker.
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.insert(marker.into(), None);
        self
    }

    /// Declare an operation on this type.
    pub fn operation(mut self, operation: OperationInfo) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn build(self) -> Arc<TypeInfo> {
        let simple_name = self
            .full_name
            .rsplit("::")
            .next()
            .unwrap_or(self.full_name.as_str())
            .to_string();
        Arc::new(TypeInfo {
            simple_name,
            full_name: self.full_name,
            interface: self.interface,
            markers: self.markers,
            interfaces: self.interfaces,
            operations: self.operations,
        })
    }
}

/// The process-wide plugin marker interface. A plugin contract is an
/// interface that *directly* extends this marker.
pub fn plugin_marker() -> Arc<TypeInfo> {
    static MARKER: OnceLock<Arc<TypeInfo>> = OnceLock::new();
    MARKER
        .get_or_init(|| TypeInfo::interface("modkit::Plugin").build())
        .clone()
}

/// The process-wide connector marker interface. Connector implementations
/// must implement it, directly or through their contract.
pub fn connector_marker() -> Arc<TypeInfo> {
    static MARKER: OnceLock<Arc<TypeInfo>> = OnceLock::new();
    MARKER
        .get_or_init(|| TypeInfo::interface("modkit::Connector").build())
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_is_last_path_segment() {
        let info = TypeInfo::builder("demo::store::SqlStore").build();
        assert_eq!(info.simple_name(), "SqlStore");
        assert_eq!(info.full_name(), "demo::store::SqlStore");
        assert!(!info.is_interface());
    }

    #[test]
    fn subtype_is_reflexive_and_transitive() {
        let root = TypeInfo::interface("demo::Store").build();
        let mid = TypeInfo::interface("demo::KeyValueStore")
            .implements(root.clone())
            .build();
        let leaf = TypeInfo::builder("demo::SqlStore")
            .implements(mid.clone())
            .build();

        assert!(leaf.is_subtype_of(&leaf));
        assert!(leaf.is_subtype_of(&mid));
        assert!(leaf.is_subtype_of(&root));
        assert!(!root.is_subtype_of(&leaf));
    }

    #[test]
    fn all_interfaces_deduplicates() {
        let root = TypeInfo::interface("demo::Root").build();
        let a = TypeInfo::interface("demo::A").implements(root.clone()).build();
        let b = TypeInfo::interface("demo::B").implements(root.clone()).build();
        let leaf = TypeInfo::builder("demo::Leaf")
            .implements(a)
            .implements(b)
            .build();

        let names: Vec<String> = leaf
            .all_interfaces()
            .iter()
            .map(|i| i.full_name().to_string())
            .collect();
        assert_eq!(names, vec!["demo::A", "demo::Root", "demo::B"]);
    }

    #[test]
    fn operation_markers() {
        let op = OperationInfo::feature("with_commands", "commands").with_params(1);
        assert!(op.has_marker(FEATURE_MARKER));
        assert_eq!(op.marker_value(FEATURE_MARKER), Some("commands"));
        assert_eq!(op.param_count(), 1);
    }

    #[test]
    fn markers_are_shared_singletons() {
        assert!(Arc::ptr_eq(&plugin_marker(), &plugin_marker()));
        assert!(plugin_marker().is_interface());
        assert_eq!(plugin_marker().simple_name(), "Plugin");
    }
}
