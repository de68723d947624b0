use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Platform-wide settings. The set of keys is owned by the server, so the
/// record is an open map with typed accessors for the common ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl Settings {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.as_str()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }
}
