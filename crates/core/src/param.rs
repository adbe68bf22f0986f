//! Named configuration parameters.

use serde::{Deserialize, Serialize};

/// A name/value pair handed to a component, plugin or feature operation.
///
/// Values are plain strings by the time they reach the config model; any
/// `${boot.*}` placeholder has already been resolved during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    name: String,
    value: String,
}

impl Param {
    /// Create a param.
    pub fn of(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
