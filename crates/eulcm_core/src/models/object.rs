//! The persisted shape of a repository object.
//!
//! A [`DigitalObject`] is what a store keeps: object properties, the
//! content-model list, outbound relations and every datastream with its
//! version history. Typed models wrap one of these.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::datastream::{ControlGroup, DatastreamSpec};
use super::relation::Predicate;

/// Prefix for object URIs in relation triples and content-model identifiers.
pub const FEDORA_URI_PREFIX: &str = "info:fedora/";

pub fn pid_to_uri(pid: &str) -> String {
    format!("{}{}", FEDORA_URI_PREFIX, pid)
}

pub fn uri_to_pid(uri: &str) -> &str {
    uri.strip_prefix(FEDORA_URI_PREFIX).unwrap_or(uri)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectState {
    #[default]
    #[serde(rename = "A")]
    Active,
    #[serde(rename = "I")]
    Inactive,
    #[serde(rename = "D")]
    Deleted,
}

/// One outbound relation: `predicate` is a full URI, `object` an
/// `info:fedora/` object URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub predicate: String,
    pub object: String,
}

/// A superseded datastream revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastreamVersion {
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDatastream {
    pub id: String,
    pub label: String,
    pub control_group: ControlGroup,
    pub versionable: bool,
    pub mimetype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Hex SHA-256 of `content`, filled in by the store on write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
    /// Older revisions, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<DatastreamVersion>,
}

impl StoredDatastream {
    pub fn new(spec: &DatastreamSpec, content: Vec<u8>, mimetype: &str) -> Self {
        Self {
            id: spec.id.to_string(),
            label: spec.label.to_string(),
            control_group: spec.control_group(),
            versionable: spec.versionable,
            mimetype: mimetype.to_string(),
            format: spec.format().map(str::to_string),
            checksum: None,
            created: None,
            content,
            versions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalObject {
    pub pid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub state: ObjectState,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_modified: Option<OffsetDateTime>,
    /// Content-model URIs, most specific first.
    #[serde(default)]
    pub content_models: Vec<String>,
    #[serde(default)]
    pub relations: Vec<Triple>,
    #[serde(default)]
    pub datastreams: BTreeMap<String, StoredDatastream>,
}

impl DigitalObject {
    /// A new, unsaved object record.
    pub fn new(pid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            label: None,
            owner: None,
            state: ObjectState::Active,
            created: None,
            last_modified: None,
            content_models: Vec::new(),
            relations: Vec::new(),
            datastreams: BTreeMap::new(),
        }
    }

    pub fn uri(&self) -> String {
        pid_to_uri(&self.pid)
    }

    pub fn has_model(&self, content_model: &str) -> bool {
        self.content_models.iter().any(|cm| cm == content_model)
    }

    pub fn datastream(&self, id: &str) -> Option<&StoredDatastream> {
        self.datastreams.get(id)
    }

    /// Writes new content for a declared datastream, creating it if needed.
    /// History is the store's concern; this only replaces the current content.
    pub fn put_datastream(&mut self, spec: &DatastreamSpec, content: Vec<u8>, mimetype: &str) {
        match self.datastreams.get_mut(spec.id) {
            Some(existing) => {
                existing.content = content;
                existing.mimetype = mimetype.to_string();
                existing.checksum = None;
            }
            None => {
                self.datastreams
                    .insert(spec.id.to_string(), StoredDatastream::new(spec, content, mimetype));
            }
        }
    }

    /// Pids this object points at through `predicate`, in insertion order.
    pub fn related(&self, predicate: Predicate) -> Vec<&str> {
        self.relations
            .iter()
            .filter(|t| t.predicate == predicate.uri())
            .map(|t| uri_to_pid(&t.object))
            .collect()
    }

    /// Replaces every `predicate` relation with a single one to `pid`, or
    /// drops them all for `None`.
    pub fn set_relation(&mut self, predicate: Predicate, pid: Option<&str>) {
        self.relations.retain(|t| t.predicate != predicate.uri());
        if let Some(pid) = pid {
            self.relations.push(Triple {
                predicate: predicate.uri().to_string(),
                object: pid_to_uri(pid),
            });
        }
    }

    pub fn points_to(&self, predicate: Predicate, pid: &str) -> bool {
        self.related(predicate).contains(&pid)
    }
}

/// Raw bytes as standard base64 text in serialized records.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text.as_bytes()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_relation_replaces_existing() {
        let mut obj = DigitalObject::new("emory:1");
        obj.set_relation(Predicate::IsPartOf, Some("emory:box"));
        obj.set_relation(Predicate::IsPartOf, Some("emory:other"));
        obj.set_relation(Predicate::IsMemberOfCollection, Some("emory:coll"));
        assert_eq!(obj.related(Predicate::IsPartOf), vec!["emory:other"]);
        assert_eq!(obj.relations[0].object, "info:fedora/emory:other");
        assert!(obj.points_to(Predicate::IsMemberOfCollection, "emory:coll"));

        obj.set_relation(Predicate::IsPartOf, None);
        assert!(obj.related(Predicate::IsPartOf).is_empty());
        assert_eq!(obj.relations.len(), 1);
    }

    #[test]
    fn test_record_serializes_content_as_base64() {
        let mut obj = DigitalObject::new("emory:2");
        obj.datastreams.insert(
            "MIME".to_string(),
            StoredDatastream {
                id: "MIME".to_string(),
                label: "MIME message".to_string(),
                control_group: ControlGroup::M,
                versionable: true,
                mimetype: "message/rfc822".to_string(),
                format: None,
                checksum: None,
                created: None,
                content: b"Subject: hi\r\n\r\nbody".to_vec(),
                versions: Vec::new(),
            },
        );
        let json = serde_json::to_string(&obj).unwrap();
        assert!(json.contains("U3ViamVjdDogaGkNCg0KYm9keQ=="), "{}", json);
        assert!(json.contains(r#""state":"A""#));

        let back: DigitalObject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obj);
    }
}
