//! Attribute-mapped model trait.

use serde_json::{Map, Value};

use crate::error::{Result, TeletypeError};
use crate::models::ModelAttributes;
use crate::services::TeletypeServices;

/// A record returned by the API, stored under its wire field names.
///
/// Implementors declare [`ATTRIBUTES_MAPPING`](ApiModel::ATTRIBUTES_MAPPING), a
/// table from public attribute names to wire names, and get dynamic access,
/// projection and construction for free. Any attribute not in the table is an
/// error rather than a silent no-op.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use teletype_api::{ApiModel, Operator, TeletypeServices};
///
/// # fn example() -> teletype_api::Result<()> {
/// let services = TeletypeServices::new("token");
/// let operator = Operator::instantiate(&services, &json!({"id": "op1", "last_name": "Doe"}));
///
/// assert_eq!(operator.get("lastName")?, json!("Doe"));
/// assert!(operator.get("last_name").is_err());
/// # Ok(())
/// # }
/// ```
pub trait ApiModel: Sized {
    /// `(attribute, wire_name)` pairs in declaration order.
    const ATTRIBUTES_MAPPING: &'static [(&'static str, &'static str)];

    /// Wrap already-populated attributes.
    fn from_attributes(attributes: ModelAttributes) -> Self;

    fn attributes(&self) -> &ModelAttributes;

    fn attributes_mut(&mut self) -> &mut ModelAttributes;

    /// Wire name for a declared attribute.
    fn wire_name(name: &str) -> Option<&'static str> {
        Self::ATTRIBUTES_MAPPING
            .iter()
            .find(|(attribute, _)| *attribute == name)
            .map(|(_, wire)| *wire)
    }

    /// Read a declared attribute. Missing values read as `null`.
    ///
    /// Derived fields that need a request, such as a project's owner, are not
    /// attributes and are only reachable through their typed method
    /// ([`crate::Project::owner`]).
    ///
    /// # Errors
    ///
    /// Returns [`TeletypeError::Library`] if `name` is not declared.
    fn get(&self, name: &str) -> Result<Value> {
        let wire = Self::wire_name(name).ok_or_else(|| undefined_property::<Self>(name))?;
        Ok(self.attributes().value(wire).cloned().unwrap_or(Value::Null))
    }

    /// Write a declared attribute.
    ///
    /// # Errors
    ///
    /// Returns [`TeletypeError::Library`] if `name` is not declared.
    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let wire = Self::wire_name(name).ok_or_else(|| undefined_property::<Self>(name))?;
        self.attributes_mut().insert(wire, value);
        Ok(())
    }

    /// All declared attributes in declaration order, `null` where unset.
    fn as_map(&self) -> Map<String, Value> {
        Self::ATTRIBUTES_MAPPING
            .iter()
            .map(|(attribute, wire)| {
                let value = self.attributes().value(wire).cloned().unwrap_or(Value::Null);
                (attribute.to_string(), value)
            })
            .collect()
    }

    /// JSON encoding of [`as_map`](ApiModel::as_map).
    fn as_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.as_map())?)
    }

    /// Build one model from a decoded response object.
    ///
    /// Keys outside the mapping are dropped; a non-object value yields a model
    /// with every attribute `null`.
    fn instantiate(services: &TeletypeServices, data: &Value) -> Self {
        let mut attributes = ModelAttributes::new(services);
        for (_, wire) in Self::ATTRIBUTES_MAPPING {
            let value = data.get(*wire).cloned().unwrap_or(Value::Null);
            attributes.insert(wire, value);
        }
        Self::from_attributes(attributes)
    }

    /// Build one model per element of a decoded response list, keeping order.
    ///
    /// # Errors
    ///
    /// Returns [`TeletypeError::Library`] if `data` is neither a list nor `null`.
    fn instantiate_many(services: &TeletypeServices, data: &Value) -> Result<Vec<Self>> {
        match data {
            Value::Null => Ok(Vec::new()),
            Value::Array(rows) => Ok(rows
                .iter()
                .map(|row| Self::instantiate(services, row))
                .collect()),
            other => Err(TeletypeError::Library(format!(
                "Expected a list of {} records, got {}",
                short_type_name::<Self>(),
                json_kind(other)
            ))),
        }
    }
}

fn undefined_property<M>(name: &str) -> TeletypeError {
    TeletypeError::Library(format!(
        "Undefined property {}::${name}",
        short_type_name::<M>()
    ))
}

fn short_type_name<M>() -> &'static str {
    let full = std::any::type_name::<M>();
    full.rsplit("::").next().unwrap_or(full)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
