use std::collections::HashMap;

use crate::value::Value;

/// The single global namespace. There is no scoping: every declaration and
/// reassignment writes the same map.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declaration and reassignment both overwrite.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}
