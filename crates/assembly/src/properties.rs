//! The boot-parameter table and `${boot.*}` placeholder resolution.

use std::collections::BTreeMap;

use serde_json::Value;

use modkit_core::AssemblyError;

const PLACEHOLDER_PREFIX: &str = "${boot.";
const PLACEHOLDER_SUFFIX: &str = "}";

/// Flat boot-parameter table: what remains of the process property table
/// once the active-flags property has been consumed.
#[derive(Debug, Default)]
pub struct BootProperties {
    params: BTreeMap<String, String>,
}

impl BootProperties {
    pub fn new(params: BTreeMap<String, String>) -> Self {
        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Resolve a parameter value. A value that is exactly a
    /// `${boot.<key>}` placeholder is replaced by the table entry for
    /// `<key>`; any other value passes through unchanged — there is no
    /// partial substitution inside longer strings.
    pub fn eval(&self, value: &str) -> Result<String, AssemblyError> {
        if value.starts_with(PLACEHOLDER_PREFIX) && value.ends_with(PLACEHOLDER_SUFFIX) {
            let key = &value[PLACEHOLDER_PREFIX.len()..value.len() - PLACEHOLDER_SUFFIX.len()];
            return self
                .params
                .get(key)
                .cloned()
                .ok_or_else(|| AssemblyError::UnknownBootParam {
                    key: key.to_string(),
                });
        }
        Ok(value.to_string())
    }

    /// Stringify and resolve one raw parameter value. Scalars stringify the
    /// obvious way; composites have no string form and are structural
    /// errors.
    pub fn eval_raw(&self, name: &str, value: &Value) -> Result<String, AssemblyError> {
        match value {
            Value::String(s) => self.eval(s),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => {
                Err(AssemblyError::UnsupportedParamValue {
                    name: name.to_string(),
                })
            }
        }
    }
}
