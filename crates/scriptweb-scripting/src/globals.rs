//! Globals: the declared input shape of a script

use crate::error::{Result, ScriptError};
use serde::Serialize;

/// A type whose fields a script may reference as free variables.
///
/// Field names are the keys of the type's serialized form, so serde
/// renames apply. Any `Serialize + Default` type qualifies.
pub trait ScriptGlobals: Serialize {
    /// Names the script may reference
    fn variable_names() -> Vec<String>;

    /// Field values keyed by name
    fn to_variables(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(self).map_err(ScriptError::conversion)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(ScriptError::conversion(format!(
                "globals must serialize to an object, got {other}"
            ))),
        }
    }
}

impl<T: Serialize + Default> ScriptGlobals for T {
    fn variable_names() -> Vec<String> {
        match serde_json::to_value(T::default()) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().map(|(k, _)| k).collect(),
            _ => Vec::new(),
        }
    }
}
