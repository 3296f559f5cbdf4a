//! Collection 1.1: an implicit collection described with MODS.

use crate::models::datastream::{ControlGroup, DatastreamKind, DatastreamSpec, XmlDatastream};
use crate::models::relation::{Predicate, Relation, RelationSpec};
use crate::models::{CapabilityBundle, ContentModel};
use crate::xmlmap::mods::MODS_NS;
use crate::xmlmap::mods_ext::CollectionMods;
use crate::xmlmap::XmlObject;

pub const COLLECTION_CONTENT_MODEL: &str = "info:fedora/emory-control:Collection-1.1";

const MODS: DatastreamSpec = DatastreamSpec {
    id: "MODS",
    label: "Descriptive Metadata (MODS)",
    declared_control_group: Some(ControlGroup::M),
    versionable: true,
    kind: DatastreamKind::Xml {
        format: Some(MODS_NS),
        root_ns: MODS_NS,
        root_name: "mods",
        schema: Some(<CollectionMods as XmlObject>::schema),
    },
};

const PARENT_RELATION: RelationSpec = RelationSpec {
    name: "collection",
    predicate: Predicate::IsMemberOfCollection,
    target_model: COLLECTION_CONTENT_MODEL,
    related_name: None,
};

pub static COLLECTION_BUNDLE: CapabilityBundle = CapabilityBundle {
    content_model: COLLECTION_CONTENT_MODEL,
    datastreams: &[MODS],
    relations: &[PARENT_RELATION],
    omits: &[],
};

pub static COLLECTION_MODEL: ContentModel = ContentModel {
    name: "Collection-1.1",
    bundles: &[&COLLECTION_BUNDLE],
};

repository_object! {
    Collection => &COLLECTION_MODEL, {
        mods: XmlDatastream<CollectionMods> = &MODS,
    }
}

impl Collection {
    /// Parent collection, for subcollections. Always another 1.1 collection.
    pub const PARENT: Relation<Collection> = Relation::new(&PARENT_RELATION);

    pub fn collection_pid(&self) -> Option<&str> {
        Self::PARENT.pid(&self.object)
    }

    pub fn set_collection(&mut self, parent: Option<&Collection>) {
        Self::PARENT.set(&mut self.object, parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepositoryObject;
    use crate::xmlmap::mods::ModsCommon;

    #[test]
    fn test_mods_datastream_declaration() {
        let mods = COLLECTION_MODEL.datastream("MODS").expect("MODS");
        assert_eq!(mods.control_group(), ControlGroup::M);
        assert_eq!(mods.format(), Some(MODS_NS));
        assert!(mods.versionable);
    }

    #[test]
    fn test_mods_edits_flush_to_record() {
        let mut collection = Collection::new_object("emory:coll");
        collection
            .mods
            .content_mut()
            .unwrap()
            .set_title(Some("Salman Rushdie papers"))
            .unwrap();
        collection.mods.content_mut().unwrap().set_source_id(Some(1000)).unwrap();
        assert!(collection.is_modified());
        collection.flush().unwrap();
        assert!(!collection.is_modified());

        let reloaded = Collection::from_object(collection.object().clone());
        let mut mods = reloaded.mods;
        assert_eq!(mods.content().unwrap().title().as_deref(), Some("Salman Rushdie papers"));
        assert_eq!(mods.content().unwrap().source_id().unwrap(), Some(1000));
    }
}
