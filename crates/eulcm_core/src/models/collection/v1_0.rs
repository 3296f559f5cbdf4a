//! Collection 1.0: an implicit collection with Dublin Core description only.

use crate::models::relation::{Predicate, Relation, RelationSpec};
use crate::models::{CapabilityBundle, ContentModel};

pub const COLLECTION_CONTENT_MODEL: &str = "info:fedora/emory-control:Collection-1.0";

const PARENT_RELATION: RelationSpec = RelationSpec {
    name: "collection",
    predicate: Predicate::IsMemberOfCollection,
    target_model: COLLECTION_CONTENT_MODEL,
    related_name: None,
};

pub static COLLECTION_BUNDLE: CapabilityBundle = CapabilityBundle {
    content_model: COLLECTION_CONTENT_MODEL,
    datastreams: &[],
    relations: &[PARENT_RELATION],
    omits: &[],
};

pub static COLLECTION_MODEL: ContentModel = ContentModel {
    name: "Collection-1.0",
    bundles: &[&COLLECTION_BUNDLE],
};

repository_object! {
    Collection => &COLLECTION_MODEL, {}
}

impl Collection {
    /// Parent collection, for subcollections. Always another 1.0 collection.
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

    #[test]
    fn test_collection_has_no_descriptive_datastream() {
        assert!(COLLECTION_MODEL.datastreams().is_empty());
        assert_eq!(COLLECTION_MODEL.content_models(), vec![COLLECTION_CONTENT_MODEL]);
    }

    #[test]
    fn test_subcollection_points_at_parent() {
        let parent = Collection::new_object("emory:parent");
        let mut child = Collection::new_object("emory:child");
        child.set_collection(Some(&parent));
        assert_eq!(child.collection_pid(), Some("emory:parent"));
        assert!(child
            .object()
            .points_to(Predicate::IsMemberOfCollection, "emory:parent"));
    }
}
