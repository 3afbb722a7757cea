//! Wire-keyed attribute storage shared by all models.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::services::{FactoryRef, TeletypeServices};

/// Raw attribute values keyed by wire field name, plus a weak link back to
/// the [`TeletypeServices`] factory that produced them.
///
/// A default-constructed value is detached: derived lookups on it fail.
#[derive(Clone, Default)]
pub struct ModelAttributes {
    values: Map<String, Value>,
    factory: FactoryRef,
}

impl fmt::Debug for ModelAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

// Equality looks at values only.
impl PartialEq for ModelAttributes {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl ModelAttributes {
    pub(crate) fn new(services: &TeletypeServices) -> Self {
        Self {
            values: Map::new(),
            factory: services.downgrade(),
        }
    }

    /// Value stored under a wire field name.
    pub fn value(&self, wire_name: &str) -> Option<&Value> {
        self.values.get(wire_name)
    }

    pub(crate) fn str_value(&self, wire_name: &str) -> Option<&str> {
        self.value(wire_name).and_then(Value::as_str)
    }

    pub(crate) fn insert(&mut self, wire_name: &str, value: Value) {
        self.values.insert(wire_name.to_string(), value);
    }

    /// The factory this record belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TeletypeError::Library`] if the model is detached or
    /// its factory has been dropped.
    pub fn services(&self) -> Result<TeletypeServices> {
        self.factory.upgrade()
    }
}
