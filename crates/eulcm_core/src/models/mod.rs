//! Repository object models.
//!
//! A model is an ordered list of capability bundles, most specific first.
//! Each bundle contributes one content-model URI, the datastreams and
//! relations that come with it, and any inherited datastreams it drops.

use serde::Serialize;

use crate::error::Result;

/// Declares a model struct: the object record plus one public field per
/// datastream slot, wired into [`RepositoryObject`] in slot order.
macro_rules! repository_object {
    (
        $(#[$meta:meta])*
        $name:ident => $model:expr, {
            $($field:ident: $ty:ty = $spec:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            object: $crate::models::object::DigitalObject,
            $(pub $field: $ty,)*
        }

        impl $crate::models::RepositoryObject for $name {
            fn model() -> &'static $crate::models::ContentModel {
                $model
            }

            fn from_object(object: $crate::models::object::DigitalObject) -> Self {
                Self {
                    $($field: <$ty>::load($spec, &object),)*
                    object,
                }
            }

            fn object(&self) -> &$crate::models::object::DigitalObject {
                &self.object
            }

            fn object_mut(&mut self) -> &mut $crate::models::object::DigitalObject {
                &mut self.object
            }

            fn slots_mut(
                &mut self,
            ) -> (
                &mut $crate::models::object::DigitalObject,
                Vec<&mut dyn $crate::models::datastream::DatastreamSlot>,
            ) {
                (
                    &mut self.object,
                    vec![$(&mut self.$field as &mut dyn $crate::models::datastream::DatastreamSlot),*],
                )
            }
        }
    };
}

pub mod boda;
pub mod collection;
pub mod datastream;
pub mod object;
pub mod relation;

use datastream::{DatastreamKind, DatastreamSlot, DatastreamSpec};
use object::DigitalObject;
use relation::RelationSpec;

#[derive(Debug)]
pub struct CapabilityBundle {
    pub content_model: &'static str,
    pub datastreams: &'static [DatastreamSpec],
    pub relations: &'static [RelationSpec],
    /// Datastream ids inherited from less specific bundles that do not apply.
    pub omits: &'static [&'static str],
}

#[derive(Debug)]
pub struct ContentModel {
    pub name: &'static str,
    pub bundles: &'static [&'static CapabilityBundle],
}

impl ContentModel {
    /// Content-model URIs, most specific first.
    pub fn content_models(&self) -> Vec<&'static str> {
        self.bundles.iter().map(|b| b.content_model).collect()
    }

    /// Effective datastreams: inherited ones first, a more specific bundle
    /// overriding a same-id declaration, omitted ids removed.
    pub fn datastreams(&self) -> Vec<&'static DatastreamSpec> {
        let mut specs: Vec<&'static DatastreamSpec> = Vec::new();
        for bundle in self.bundles.iter().rev() {
            for spec in bundle.datastreams {
                match specs.iter_mut().find(|s| s.id == spec.id) {
                    Some(existing) => *existing = spec,
                    None => specs.push(spec),
                }
            }
        }
        specs.retain(|spec| !self.bundles.iter().any(|b| b.omits.contains(&spec.id)));
        specs
    }

    pub fn datastream(&self, id: &str) -> Option<&'static DatastreamSpec> {
        self.datastreams().into_iter().find(|spec| spec.id == id)
    }

    pub fn relations(&self) -> Vec<&'static RelationSpec> {
        let mut relations: Vec<&'static RelationSpec> = Vec::new();
        for bundle in self.bundles.iter().rev() {
            for relation in bundle.relations {
                match relations.iter_mut().find(|r| r.name == relation.name) {
                    Some(existing) => *existing = relation,
                    None => relations.push(relation),
                }
            }
        }
        relations
    }

    /// True when `object` declares every content model this model requires.
    pub fn matches(&self, object: &DigitalObject) -> bool {
        self.bundles.iter().all(|b| object.has_model(b.content_model))
    }

    pub fn describe(&self) -> ModelDescription {
        ModelDescription {
            name: self.name,
            content_models: self.content_models(),
            datastreams: self
                .datastreams()
                .into_iter()
                .map(DatastreamDescription::from)
                .collect(),
            relations: self.relations().into_iter().copied().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelDescription {
    pub name: &'static str,
    pub content_models: Vec<&'static str>,
    pub datastreams: Vec<DatastreamDescription>,
    pub relations: Vec<RelationSpec>,
}

#[derive(Debug, Serialize)]
pub struct DatastreamDescription {
    pub id: &'static str,
    pub label: &'static str,
    pub control_group: &'static str,
    pub versionable: bool,
    pub mimetype: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<&'static str>,
}

impl From<&'static DatastreamSpec> for DatastreamDescription {
    fn from(spec: &'static DatastreamSpec) -> Self {
        let schema = match spec.kind {
            DatastreamKind::Xml {
                schema: Some(schema),
                ..
            } => Some(schema().name),
            DatastreamKind::Xml { root_name, .. } => Some(root_name),
            DatastreamKind::File { .. } => None,
        };
        Self {
            id: spec.id,
            label: spec.label,
            control_group: spec.control_group().code(),
            versionable: spec.versionable,
            mimetype: spec.mimetype(),
            format: spec.format(),
            schema,
        }
    }
}

/// A typed view over a stored object.
pub trait RepositoryObject: Sized {
    fn model() -> &'static ContentModel;
    fn from_object(object: DigitalObject) -> Self;
    fn object(&self) -> &DigitalObject;
    fn object_mut(&mut self) -> &mut DigitalObject;
    /// The object record alongside every datastream slot, for write-back.
    fn slots_mut(&mut self) -> (&mut DigitalObject, Vec<&mut dyn DatastreamSlot>);

    /// A fresh, unsaved instance tagged with this model's content models.
    fn new_object(pid: impl Into<String>) -> Self {
        let mut object = DigitalObject::new(pid);
        object.content_models = Self::model()
            .content_models()
            .into_iter()
            .map(str::to_string)
            .collect();
        Self::from_object(object)
    }

    fn pid(&self) -> &str {
        &self.object().pid
    }

    fn label(&self) -> Option<&str> {
        self.object().label.as_deref()
    }

    fn set_label(&mut self, label: Option<&str>) {
        self.object_mut().label = label.map(str::to_string);
    }

    fn is_modified(&mut self) -> bool {
        let (_, slots) = self.slots_mut();
        slots.iter().any(|slot| slot.is_modified())
    }

    /// Writes modified datastream content onto the object record.
    fn flush(&mut self) -> Result<()> {
        let (object, slots) = self.slots_mut();
        for slot in slots {
            slot.flush(object)?;
        }
        Ok(())
    }
}

/// Every model this crate declares.
pub static ALL_MODELS: [&ContentModel; 6] = [
    &collection::v1_0::COLLECTION_MODEL,
    &collection::v1_1::COLLECTION_MODEL,
    &boda::ARRANGEMENT_MODEL,
    &boda::MAILBOX_MODEL,
    &boda::EMAIL_MESSAGE_MODEL,
    &boda::RUSHDIE_FILE_MODEL,
];

pub fn find_model(name: &str) -> Option<&'static ContentModel> {
    ALL_MODELS.iter().copied().find(|m| m.name.eq_ignore_ascii_case(name))
}
