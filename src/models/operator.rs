//! Operator model.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::TeletypeError;
use crate::models::ModelAttributes;
use crate::traits::ApiModel;

/// Operator status as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorStatus {
    /// Invited, email not yet confirmed.
    WaitToConfirm,
    /// Finishing account setup.
    Setup,
    Available,
    Busy,
    Hidden,
    /// Removed from the project.
    Locked,
}

impl OperatorStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            10 => Some(Self::WaitToConfirm),
            15 => Some(Self::Setup),
            20 => Some(Self::Available),
            30 => Some(Self::Busy),
            40 => Some(Self::Hidden),
            50 => Some(Self::Locked),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::WaitToConfirm => 10,
            Self::Setup => 15,
            Self::Available => 20,
            Self::Busy => 30,
            Self::Hidden => 40,
            Self::Locked => 50,
        }
    }
}

impl fmt::Display for OperatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::WaitToConfirm => "awaiting confirmation",
            Self::Setup => "setup",
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Hidden => "hidden",
            Self::Locked => "removed",
        };
        f.write_str(label)
    }
}

/// Role an operator holds in the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatorRole {
    Owner,
    Operator,
    Admin,
    Helper,
}

impl OperatorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Operator => "operator",
            Self::Admin => "admin",
            Self::Helper => "helper",
        }
    }
}

impl fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorRole {
    type Err = TeletypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "operator" => Ok(Self::Operator),
            "admin" => Ok(Self::Admin),
            "helper" => Ok(Self::Helper),
            other => Err(TeletypeError::Validation(format!(
                "Unknown operator role '{other}'"
            ))),
        }
    }
}

/// A project operator (an agent answering chats).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operator {
    attributes: ModelAttributes,
}

impl ApiModel for Operator {
    const ATTRIBUTES_MAPPING: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("email", "email"),
        ("status", "status"),
        ("name", "name"),
        ("lastName", "last_name"),
        ("timezone", "timezone"),
        ("language", "language"),
        ("roles", "roles"),
    ];

    fn from_attributes(attributes: ModelAttributes) -> Self {
        Self { attributes }
    }

    fn attributes(&self) -> &ModelAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ModelAttributes {
        &mut self.attributes
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_map().serialize(serializer)
    }
}

impl Operator {
    pub fn id(&self) -> Option<&str> {
        self.attributes.str_value("id")
    }

    pub fn email(&self) -> Option<&str> {
        self.attributes.str_value("email")
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.str_value("name")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.attributes.str_value("last_name")
    }

    pub fn timezone(&self) -> Option<&str> {
        self.attributes.str_value("timezone")
    }

    pub fn language(&self) -> Option<&str> {
        self.attributes.str_value("language")
    }

    /// Numeric status code, accepting both numbers and numeric strings.
    pub fn status_code(&self) -> Option<i64> {
        match self.attributes.value("status")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Status, if the code is one the API documents.
    pub fn status(&self) -> Option<OperatorStatus> {
        self.status_code().and_then(OperatorStatus::from_code)
    }

    pub fn is_available(&self) -> bool {
        self.status() == Some(OperatorStatus::Available)
    }

    /// Known roles, in the order the API lists them. Unknown role names are skipped.
    pub fn roles(&self) -> Vec<OperatorRole> {
        match self.attributes.value("roles") {
            Some(Value::Array(roles)) => roles
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|role| role.parse().ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn has_role(&self, role: OperatorRole) -> bool {
        self.roles().contains(&role)
    }

    /// First and last name joined by a space, skipping empty parts.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.name(), self.last_name()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}
