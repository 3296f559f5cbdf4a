use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use eulcm_core::models::object::DigitalObject;
use eulcm_core::models::relation::Predicate;
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::versioning;
use crate::ObjectStore;

/// In-process store; records live in a lock-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, DigitalObject>>,
    counters: RwLock<HashMap<String, u64>>,
}

fn poisoned<T>(_: T) -> Error {
    Error::RequestFailed("store lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matching(&self, keep: impl Fn(&DigitalObject) -> bool) -> Result<Vec<String>> {
        let objects = self.objects.read().map_err(poisoned)?;
        Ok(objects
            .values()
            .filter(|object| keep(object))
            .map(|object| object.pid.clone())
            .collect())
    }
}

impl ObjectStore for MemoryStore {
    fn fetch(&self, pid: &str) -> Result<DigitalObject> {
        let objects = self.objects.read().map_err(poisoned)?;
        objects
            .get(pid)
            .cloned()
            .ok_or_else(|| Error::NotFound(pid.to_string()))
    }

    fn exists(&self, pid: &str) -> Result<bool> {
        Ok(self.objects.read().map_err(poisoned)?.contains_key(pid))
    }

    fn ingest(&self, mut object: DigitalObject) -> Result<DigitalObject> {
        let mut objects = self.objects.write().map_err(poisoned)?;
        if objects.contains_key(&object.pid) {
            return Err(Error::AlreadyExists(object.pid));
        }
        versioning::prepare_ingest(&mut object, OffsetDateTime::now_utc());
        objects.insert(object.pid.clone(), object.clone());
        tracing::info!(pid = %object.pid, "ingested object");
        Ok(object)
    }

    fn modify(&self, mut object: DigitalObject) -> Result<DigitalObject> {
        let mut objects = self.objects.write().map_err(poisoned)?;
        let previous = objects
            .get(&object.pid)
            .ok_or_else(|| Error::NotFound(object.pid.clone()))?;
        versioning::apply_modification(previous, &mut object, OffsetDateTime::now_utc());
        objects.insert(object.pid.clone(), object.clone());
        tracing::info!(pid = %object.pid, "modified object");
        Ok(object)
    }

    fn purge(&self, pid: &str) -> Result<()> {
        let mut objects = self.objects.write().map_err(poisoned)?;
        match objects.remove(pid) {
            Some(_) => {
                tracing::info!(pid, "purged object");
                Ok(())
            }
            None => Err(Error::NotFound(pid.to_string())),
        }
    }

    fn subjects(&self, predicate: Predicate, object_pid: &str) -> Result<Vec<String>> {
        self.matching(|object| object.points_to(predicate, object_pid))
    }

    fn find_by_content_model(&self, content_model: &str) -> Result<Vec<String>> {
        self.matching(|object| object.has_model(content_model))
    }

    fn next_pid(&self, namespace: &str) -> Result<String> {
        let mut counters = self.counters.write().map_err(poisoned)?;
        let counter = counters.entry(namespace.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let pid = format!("{}:{}", namespace, counter);
            if !self.exists(&pid)? {
                return Ok(pid);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_fetch_purge() {
        let store = MemoryStore::new();
        let stored = store.ingest(DigitalObject::new("emory:1")).unwrap();
        assert!(stored.created.is_some());
        assert!(store.exists("emory:1").unwrap());
        assert_eq!(store.fetch("emory:1").unwrap(), stored);

        assert!(matches!(
            store.ingest(DigitalObject::new("emory:1")),
            Err(Error::AlreadyExists(_))
        ));

        store.purge("emory:1").unwrap();
        assert!(store.is_empty());
        assert!(matches!(store.fetch("emory:1"), Err(Error::NotFound(_))));
        assert!(matches!(store.purge("emory:1"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_modify_requires_existing_object() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.modify(DigitalObject::new("emory:404")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_next_pid_skips_taken_pids() {
        let store = MemoryStore::new();
        store.ingest(DigitalObject::new("emory:1")).unwrap();
        assert_eq!(store.next_pid("emory").unwrap(), "emory:2");
        assert_eq!(store.next_pid("emory").unwrap(), "emory:3");
        assert_eq!(store.next_pid("test").unwrap(), "test:1");
    }

    #[test]
    fn test_subjects_by_predicate() {
        let store = MemoryStore::new();
        let mut a = DigitalObject::new("emory:a");
        a.set_relation(Predicate::IsPartOf, Some("emory:box"));
        let mut b = DigitalObject::new("emory:b");
        b.set_relation(Predicate::IsConstituentOf, Some("emory:box"));
        store.ingest(a).unwrap();
        store.ingest(b).unwrap();

        assert_eq!(store.subjects(Predicate::IsPartOf, "emory:box").unwrap(), vec!["emory:a"]);
        assert_eq!(
            store.subjects(Predicate::IsConstituentOf, "emory:box").unwrap(),
            vec!["emory:b"]
        );
        assert!(store.subjects(Predicate::IsPartOf, "emory:other").unwrap().is_empty());
    }
}
