//! Flag gating — conditional activation of modules, features and plugins.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::debug;

use modkit_core::AssemblyError;

use crate::document::ParamMap;

/// The process configuration property holding the active flags.
pub const ACTIVE_FLAGS_PROPERTY: &str = "boot.activeFlags";

/// The reserved parameter-map key carrying an entry's flag list.
pub const FLAGS_KEY: &str = "__flags__";

/// The set of flags active for this process, computed once at engine
/// construction from a single semicolon-delimited property.
#[derive(Debug, Default)]
pub struct ActiveFlags {
    flags: HashSet<String>,
}

impl ActiveFlags {
    /// Parse a semicolon-delimited flag string. Blank segments are ignored.
    pub fn parse(raw: &str) -> Self {
        Self {
            flags: raw
                .split(';')
                .map(str::trim)
                .filter(|flag| !flag.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Consume the reserved property from the process property table; the
    /// remaining properties form the boot-parameter table.
    pub fn from_properties(properties: &mut BTreeMap<String, String>) -> Self {
        match properties.remove(ACTIVE_FLAGS_PROPERTY) {
            Some(raw) => {
                let active = Self::parse(&raw);
                debug!(flags = ?active.flags, "Active flags");
                active
            }
            None => Self::default(),
        }
    }

    /// An empty flag list is always enabled; a non-empty list is enabled
    /// iff it intersects the active set (OR semantics).
    pub fn is_enabled(&self, flags: &[String]) -> bool {
        flags.is_empty() || flags.iter().any(|flag| self.flags.contains(flag))
    }
}

/// Extract the reserved `__flags__` list from a parameter block. A missing
/// key means no gating; a present key must be a list of strings.
pub fn flags_of(params: &ParamMap, context: &str) -> Result<Vec<String>, AssemblyError> {
    let Some(value) = params.get(FLAGS_KEY) else {
        return Ok(Vec::new());
    };
    let Value::Array(items) = value else {
        return Err(AssemblyError::MalformedFlags {
            context: context.to_string(),
        });
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(flag) => Ok(flag.clone()),
            _ => Err(AssemblyError::MalformedFlags {
                context: context.to_string(),
            }),
        })
        .collect()
}
