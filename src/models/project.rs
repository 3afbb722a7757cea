//! Project model.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::client::is_truthy;
use crate::error::Result;
use crate::models::{ModelAttributes, Operator};
use crate::traits::ApiModel;

/// The Teletype project the API token belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    attributes: ModelAttributes,
}

impl ApiModel for Project {
    const ATTRIBUTES_MAPPING: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("name", "name"),
        ("domain", "domain"),
        ("ownerId", "owner_id"),
        ("url", "url"),
        ("createdAt", "createdAt"),
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

impl Serialize for Project {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        self.as_map().serialize(serializer)
    }
}

impl Project {
    pub fn id(&self) -> Option<&str> {
        self.attributes.str_value("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.str_value("name")
    }

    pub fn domain(&self) -> Option<&str> {
        self.attributes.str_value("domain")
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.attributes.str_value("owner_id")
    }

    pub fn url(&self) -> Option<&str> {
        self.attributes.str_value("url")
    }

    /// Creation time, from an RFC 3339 string, a `YYYY-MM-DD HH:MM:SS` UTC
    /// string or unix seconds.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self.attributes.value("createdAt")? {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                        .ok()
                        .map(|naive| naive.and_utc())
                }),
            Value::Number(n) => Utc.timestamp_opt(n.as_i64()?, 0).single(),
            _ => None,
        }
    }

    /// The operator who owns this project.
    ///
    /// Not part of the project payload: resolved by scanning the operator list
    /// of the owning [`crate::ProjectService`], which is fetched on first use and
    /// cached afterwards. Returns `None` without any request when the project
    /// has no owner id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TeletypeError::Library`] if the project is detached from
    /// its factory, or any error from fetching operators.
    #[tracing::instrument(skip(self), fields(project_id = self.id()))]
    pub async fn owner(&self) -> Result<Option<Operator>> {
        let owner_id = match self.attributes.value("owner_id") {
            Some(id) if is_truthy(id) => id,
            _ => return Ok(None),
        };

        let operators = self
            .attributes
            .services()?
            .project_service()?
            .get_operators(false)
            .await?;

        Ok(operators
            .into_iter()
            .find(|operator| operator.attributes().value("id") == Some(owner_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TeletypeError, TeletypeServices};
    use serde_json::json;

    fn raw_project() -> Value {
        json!({
            "id": "p1",
            "name": "Support",
            "domain": "support.example.com",
            "owner_id": "op2",
            "url": "https://support.example.com",
            "createdAt": "2023-05-01T10:00:00+03:00",
            "unknown": "dropped"
        })
    }

    #[test]
    fn test_instantiate_reads_wire_names() {
        let services = TeletypeServices::new("token");
        let project = Project::instantiate(&services, &raw_project());

        assert_eq!(project.get("ownerId").unwrap(), json!("op2"));
        assert_eq!(project.owner_id(), Some("op2"));
        assert_eq!(project.domain(), Some("support.example.com"));
        assert!(project.attributes().value("unknown").is_none());
    }

    #[test]
    fn test_missing_keys_are_null() {
        let services = TeletypeServices::new("token");
        let project = Project::instantiate(&services, &json!({"id": "p1"}));

        for (attribute, _) in Project::ATTRIBUTES_MAPPING {
            if *attribute != "id" {
                assert_eq!(project.get(attribute).unwrap(), Value::Null);
            }
        }
    }

    #[test]
    fn test_as_map_in_declaration_order() {
        let services = TeletypeServices::new("token");
        let project = Project::instantiate(&services, &json!({"name": "Support"}));

        let map = project.as_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "domain", "ownerId", "url", "createdAt"]);
        assert_eq!(map["name"], "Support");
        assert_eq!(map["id"], Value::Null);
    }

    #[test]
    fn test_as_json() {
        let services = TeletypeServices::new("token");
        let project = Project::instantiate(&services, &json!({"id": "p1", "owner_id": "op2"}));

        assert_eq!(
            project.as_json().unwrap(),
            r#"{"id":"p1","name":null,"domain":null,"ownerId":"op2","url":null,"createdAt":null}"#
        );
    }

    #[test]
    fn test_undefined_property() {
        let mut project = Project::default();

        let err = project.get("owner_id").unwrap_err();
        assert!(matches!(err, TeletypeError::Library(ref m) if m.contains("Project::$owner_id")));
        // The owner is only available through `owner()`.
        assert!(matches!(project.get("owner"), Err(TeletypeError::Library(_))));
        assert!(matches!(
            project.set("title", json!("x")),
            Err(TeletypeError::Library(_))
        ));
    }

    #[test]
    fn test_created_at_formats() {
        let services = TeletypeServices::new("token");

        let project = Project::instantiate(&services, &raw_project());
        assert_eq!(
            project.created_at().unwrap().to_rfc3339(),
            "2023-05-01T07:00:00+00:00"
        );

        let project = Project::instantiate(&services, &json!({"createdAt": "2023-05-01 07:00:00"}));
        assert_eq!(project.created_at().unwrap().timestamp(), 1_682_924_400);

        let project = Project::instantiate(&services, &json!({"createdAt": 1_682_924_400}));
        assert_eq!(project.created_at().unwrap().timestamp(), 1_682_924_400);

        let project = Project::instantiate(&services, &json!({"createdAt": "yesterday"}));
        assert!(project.created_at().is_none());
    }

    #[test]
    fn test_owner_empty_id_needs_no_factory() {
        // Detached, so any attempt to fetch operators would fail.
        let mut project = Project::default();
        project.set("ownerId", json!("")).unwrap();

        let owner = tokio_test::block_on(project.owner());
        assert!(tokio_test::assert_ok!(owner).is_none());
    }

    #[test]
    fn test_owner_on_detached_project_is_library_error() {
        let mut project = Project::default();
        project.set("ownerId", json!("op2")).unwrap();

        let err = tokio_test::assert_err!(tokio_test::block_on(project.owner()));
        assert!(matches!(err, TeletypeError::Library(_)));
    }

    #[tokio::test]
    async fn test_owner_after_factory_dropped() {
        let services = TeletypeServices::new("token");
        let project = Project::instantiate(&services, &raw_project());
        drop(services);

        let err = project.owner().await.unwrap_err();
        assert!(matches!(err, TeletypeError::Library(_)));
    }
}
