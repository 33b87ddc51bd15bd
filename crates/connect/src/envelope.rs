//! JSON:API resource envelope types used by the remote store API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource identifier object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceId {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// Relationship linkage: a single resource, a collection, or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    Many(Vec<ResourceId>),
    One(ResourceId),
}

/// A relationship entry on a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<BTreeMap<String, String>>,
}

/// One resource object: type discriminator, id, and an attributes map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<String, Relationship>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<BTreeMap<String, String>>,
}

impl Resource {
    /// Decode the attributes map into a typed struct.
    pub fn attributes_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(serde_json::Value::Object(self.attributes.clone()))
    }
}

/// Primary response data: a single resource or a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Many(Vec<Resource>),
    One(Box<Resource>),
}

/// Pagination links on an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Standard response envelope: primary `data`, side-channel `included`
/// resources, pagination `links`, and free-form `meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<Resource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<PageLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl ApiEnvelope {
    /// The envelope a bodiless success (HTTP 204) materializes as.
    pub fn empty() -> Self {
        Self {
            data: Some(PrimaryData::Many(Vec::new())),
            included: None,
            links: None,
            meta: None,
        }
    }

    /// Primary resources in encounter order, one-or-many normalized.
    pub fn records(&self) -> &[Resource] {
        match &self.data {
            Some(PrimaryData::Many(items)) => items,
            Some(PrimaryData::One(item)) => std::slice::from_ref(item.as_ref()),
            None => &[],
        }
    }

    /// Consume the envelope into its primary resources, encounter order
    /// preserved.
    pub fn into_records(self) -> Vec<Resource> {
        match self.data {
            Some(PrimaryData::Many(items)) => items,
            Some(PrimaryData::One(item)) => vec![*item],
            None => Vec::new(),
        }
    }

    /// First primary resource, if any.
    pub fn first(&self) -> Option<&Resource> {
        self.records().first()
    }

    /// The next-page link, if the server supplied one.
    pub fn next_link(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| l.next.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_resource_data_parses_and_normalizes() {
        let json = r#"{
            "data": {
                "type": "apps",
                "id": "6448800000",
                "attributes": { "name": "Tracker", "bundleId": "com.example.tracker" }
            }
        }"#;

        let envelope: ApiEnvelope = serde_json::from_str(json).expect("parse envelope");
        assert_eq!(envelope.records().len(), 1);
        assert_eq!(envelope.first().unwrap().kind, "apps");
        assert_eq!(envelope.next_link(), None);
    }

    #[test]
    fn collection_data_preserves_order() {
        let json = r#"{
            "data": [
                { "type": "things", "id": "1", "attributes": {} },
                { "type": "things", "id": "2", "attributes": {} }
            ],
            "links": { "self": "https://api.example.com/v1/things", "next": "https://api.example.com/v1/things?cursor=abc" }
        }"#;

        let envelope: ApiEnvelope = serde_json::from_str(json).expect("parse envelope");
        let ids: Vec<_> = envelope.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(
            envelope.next_link(),
            Some("https://api.example.com/v1/things?cursor=abc")
        );
    }

    #[test]
    fn attributes_decode_into_typed_structs() {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct AppAttributes {
            name: String,
            bundle_id: String,
        }

        let json = r#"{ "type": "apps", "id": "1", "attributes": { "name": "Tracker", "bundleId": "com.example.tracker" } }"#;
        let resource: Resource = serde_json::from_str(json).expect("parse resource");
        let attrs: AppAttributes = resource.attributes_as().expect("decode attributes");
        assert_eq!(attrs.name, "Tracker");
        assert_eq!(attrs.bundle_id, "com.example.tracker");
    }

    #[test]
    fn relationship_data_accepts_one_and_many() {
        let one: Relationship =
            serde_json::from_str(r#"{ "data": { "type": "reviews", "id": "9" } }"#).unwrap();
        assert!(matches!(one.data, Some(RelationshipData::One(_))));

        let many: Relationship =
            serde_json::from_str(r#"{ "data": [{ "type": "reviews", "id": "9" }] }"#).unwrap();
        assert!(matches!(many.data, Some(RelationshipData::Many(_))));
    }

    #[test]
    fn empty_envelope_has_no_records() {
        let envelope = ApiEnvelope::empty();
        assert!(envelope.records().is_empty());
    }
}
