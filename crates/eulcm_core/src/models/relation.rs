//! RELS-EXT relation declarations.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;

use super::object::DigitalObject;
use super::RepositoryObject;

pub const RELS_EXT_NS: &str = "info:fedora/fedora-system:def/relations-external#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Predicate {
    IsMemberOfCollection,
    IsPartOf,
    IsConstituentOf,
}

impl Predicate {
    pub const ALL: [Predicate; 3] = [
        Predicate::IsMemberOfCollection,
        Predicate::IsPartOf,
        Predicate::IsConstituentOf,
    ];

    pub fn local_name(self) -> &'static str {
        match self {
            Predicate::IsMemberOfCollection => "isMemberOfCollection",
            Predicate::IsPartOf => "isPartOf",
            Predicate::IsConstituentOf => "isConstituentOf",
        }
    }

    pub fn uri(self) -> &'static str {
        match self {
            Predicate::IsMemberOfCollection => {
                "info:fedora/fedora-system:def/relations-external#isMemberOfCollection"
            }
            Predicate::IsPartOf => "info:fedora/fedora-system:def/relations-external#isPartOf",
            Predicate::IsConstituentOf => {
                "info:fedora/fedora-system:def/relations-external#isConstituentOf"
            }
        }
    }

    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.uri() == uri)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

/// Static declaration of one outbound relation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RelationSpec {
    pub name: &'static str,
    pub predicate: Predicate,
    /// Content model the related object is expected to carry.
    pub target_model: &'static str,
    /// Name of the inverse, query-only collection on the target.
    pub related_name: Option<&'static str>,
}

/// Typed handle on a relation declared by a model: reads and writes the
/// related pid on an object record. Resolution to a loaded object goes
/// through the repository.
pub struct Relation<T> {
    pub spec: &'static RelationSpec,
    _target: PhantomData<fn() -> T>,
}

impl<T> Clone for Relation<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Relation<T> {}

impl<T> fmt::Debug for Relation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation").field("spec", self.spec).finish()
    }
}

impl<T: RepositoryObject> Relation<T> {
    pub const fn new(spec: &'static RelationSpec) -> Self {
        Self {
            spec,
            _target: PhantomData,
        }
    }

    pub fn pid<'a>(&self, object: &'a DigitalObject) -> Option<&'a str> {
        object.related(self.spec.predicate).first().copied()
    }

    pub fn set(&self, object: &mut DigitalObject, target: Option<&T>) {
        object.set_relation(self.spec.predicate, target.map(|t| t.pid()));
    }

    /// Points at `pid` without loading it.
    pub fn set_pid(&self, object: &mut DigitalObject, pid: Option<&str>) {
        object.set_relation(self.spec.predicate, pid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_uris_share_namespace() {
        for predicate in Predicate::ALL {
            assert!(predicate.uri().starts_with(RELS_EXT_NS));
            assert!(predicate.uri().ends_with(predicate.local_name()));
            assert_eq!(Predicate::from_uri(predicate.uri()), Some(predicate));
        }
        assert_eq!(Predicate::from_uri("info:fedora/fedora-system:def/model#hasModel"), None);
    }
}
