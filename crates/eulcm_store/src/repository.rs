use eulcm_core::models::boda::{EmailMessage, Mailbox, RushdieFile};
use eulcm_core::models::relation::{Relation, RelationSpec};
use eulcm_core::models::RepositoryObject;

use crate::error::{Error, Result};
use crate::ObjectStore;

/// Pidspace used when none is configured.
pub const DEFAULT_PIDSPACE: &str = "emory";

/// Typed access to the objects in a store.
#[derive(Debug)]
pub struct Repository<S> {
    store: S,
    pidspace: String,
    owner: Option<String>,
}

impl<S: ObjectStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            pidspace: DEFAULT_PIDSPACE.to_string(),
            owner: None,
        }
    }

    /// Namespace for pids minted by [`create_object`](Self::create_object).
    pub fn with_pidspace(mut self, pidspace: impl Into<String>) -> Self {
        self.pidspace = pidspace.into();
        self
    }

    /// Owner recorded on newly created objects.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pidspace(&self) -> &str {
        &self.pidspace
    }

    /// Loads `pid` as `T`. The stored object must declare every content
    /// model of `T`.
    pub fn get_object<T: RepositoryObject>(&self, pid: &str) -> Result<T> {
        let object = self.store.fetch(pid)?;
        if let Some(missing) = T::model()
            .content_models()
            .into_iter()
            .find(|cmodel| !object.has_model(cmodel))
        {
            return Err(Error::ModelMismatch {
                pid: pid.to_string(),
                content_model: missing.to_string(),
            });
        }
        tracing::debug!(pid, model = T::model().name, "loaded object");
        Ok(T::from_object(object))
    }

    /// A new unsaved `T`, with a minted pid unless one is given.
    pub fn create_object<T: RepositoryObject>(&self, pid: Option<&str>) -> Result<T> {
        let pid = match pid {
            Some(pid) => pid.to_string(),
            None => self.store.next_pid(&self.pidspace)?,
        };
        let mut item = T::new_object(pid);
        item.object_mut().owner = self.owner.clone();
        Ok(item)
    }

    /// Flushes pending datastream edits, then ingests or modifies. On
    /// success `item` reflects the stored record.
    pub fn save<T: RepositoryObject>(&self, item: &mut T) -> Result<()> {
        item.flush()?;
        let record = item.object().clone();
        let stored = if self.store.exists(&record.pid)? {
            self.store.modify(record)?
        } else {
            self.store.ingest(record)?
        };
        *item = T::from_object(stored);
        Ok(())
    }

    pub fn purge(&self, pid: &str) -> Result<()> {
        self.store.purge(pid)
    }

    /// Loads the target of a forward relation, if set.
    pub fn related<T: RepositoryObject, U: RepositoryObject>(
        &self,
        source: &U,
        relation: Relation<T>,
    ) -> Result<Option<T>> {
        match relation.pid(source.object()) {
            Some(pid) => self.get_object(pid).map(Some),
            None => Ok(None),
        }
    }

    /// Objects of type `T` whose `spec` relation points at `target_pid`.
    /// Subjects that are not `T` are skipped.
    pub fn referencing<T: RepositoryObject>(
        &self,
        spec: &RelationSpec,
        target_pid: &str,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for pid in self.store.subjects(spec.predicate, target_pid)? {
            let object = self.store.fetch(&pid)?;
            if T::model().matches(&object) {
                items.push(T::from_object(object));
            }
        }
        Ok(items)
    }

    /// Messages that are part of `mailbox`.
    pub fn mailbox_messages(&self, mailbox: &Mailbox) -> Result<Vec<EmailMessage>> {
        self.referencing(EmailMessage::MAILBOX.spec, mailbox.pid())
    }

    /// Legacy files that are constituents of `mailbox`.
    pub fn mailbox_constituent_files(&self, mailbox: &Mailbox) -> Result<Vec<RushdieFile>> {
        self.referencing(RushdieFile::MAILBOX.spec, mailbox.pid())
    }

    /// Every stored object that is a `T`.
    pub fn list<T: RepositoryObject>(&self) -> Result<Vec<T>> {
        let model = T::model();
        let Some(primary) = model.content_models().first().copied() else {
            return Ok(Vec::new());
        };
        let mut items = Vec::new();
        for pid in self.store.find_by_content_model(primary)? {
            let object = self.store.fetch(&pid)?;
            if model.matches(&object) {
                items.push(T::from_object(object));
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use eulcm_core::models::boda::Arrangement;
    use eulcm_core::models::collection::{v1_0, v1_1};

    #[test]
    fn test_create_mints_pid_in_pidspace() {
        let repo = Repository::new(MemoryStore::new())
            .with_pidspace("test")
            .with_owner("archivist");
        let collection: v1_1::Collection = repo.create_object(None).unwrap();
        assert_eq!(collection.pid(), "test:1");
        assert_eq!(collection.object().owner.as_deref(), Some("archivist"));
        assert!(!repo.store().exists("test:1").unwrap());
    }

    #[test]
    fn test_get_object_checks_content_models() {
        let repo = Repository::new(MemoryStore::new());
        let mut old: v1_0::Collection = repo.create_object(Some("emory:old")).unwrap();
        repo.save(&mut old).unwrap();

        assert!(repo.get_object::<v1_0::Collection>("emory:old").is_ok());
        let err = repo.get_object::<v1_1::Collection>("emory:old").unwrap_err();
        assert!(matches!(
            err,
            Error::ModelMismatch { ref content_model, .. }
                if content_model == v1_1::COLLECTION_CONTENT_MODEL
        ));
        assert!(matches!(
            repo.get_object::<v1_0::Collection>("emory:missing"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_save_twice_modifies() {
        let repo = Repository::new(MemoryStore::new());
        let mut arrangement: Arrangement = repo.create_object(None).unwrap();
        arrangement
            .rights
            .content_mut()
            .unwrap()
            .set_ip_note(Some("first"))
            .unwrap();
        repo.save(&mut arrangement).unwrap();
        assert!(!arrangement.is_modified());

        arrangement
            .rights
            .content_mut()
            .unwrap()
            .set_ip_note(Some("second"))
            .unwrap();
        repo.save(&mut arrangement).unwrap();

        let stored = repo.store().fetch(arrangement.pid()).unwrap();
        let rights = stored.datastream("Rights").unwrap();
        assert_eq!(rights.versions.len(), 1);
        assert!(String::from_utf8_lossy(&rights.versions[0].content).contains("first"));
    }
}
