//! Object storage for eulcm repository objects.
//!
//! [`ObjectStore`] is the seam between typed models and whatever keeps the
//! records; [`Repository`] sits on top of a store and hands out typed
//! objects.

use eulcm_core::models::object::DigitalObject;
use eulcm_core::models::relation::Predicate;

pub mod dir;
pub mod error;
pub mod memory;
pub mod repository;
pub mod versioning;

pub use dir::DirStore;
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use repository::Repository;

pub trait ObjectStore {
    fn fetch(&self, pid: &str) -> Result<DigitalObject>;

    fn exists(&self, pid: &str) -> Result<bool>;

    /// Stores a new object and returns the record as stored. Fails with
    /// [`Error::AlreadyExists`] when the pid is taken.
    fn ingest(&self, object: DigitalObject) -> Result<DigitalObject>;

    /// Replaces an existing object, keeping datastream history.
    fn modify(&self, object: DigitalObject) -> Result<DigitalObject>;

    fn purge(&self, pid: &str) -> Result<()>;

    /// Pids of objects with a `predicate` relation pointing at `object_pid`.
    fn subjects(&self, predicate: Predicate, object_pid: &str) -> Result<Vec<String>>;

    /// Pids of objects declaring `content_model`.
    fn find_by_content_model(&self, content_model: &str) -> Result<Vec<String>>;

    /// An unused pid in `namespace`.
    fn next_pid(&self, namespace: &str) -> Result<String>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for &S {
    fn fetch(&self, pid: &str) -> Result<DigitalObject> {
        (**self).fetch(pid)
    }

    fn exists(&self, pid: &str) -> Result<bool> {
        (**self).exists(pid)
    }

    fn ingest(&self, object: DigitalObject) -> Result<DigitalObject> {
        (**self).ingest(object)
    }

    fn modify(&self, object: DigitalObject) -> Result<DigitalObject> {
        (**self).modify(object)
    }

    fn purge(&self, pid: &str) -> Result<()> {
        (**self).purge(pid)
    }

    fn subjects(&self, predicate: Predicate, object_pid: &str) -> Result<Vec<String>> {
        (**self).subjects(predicate, object_pid)
    }

    fn find_by_content_model(&self, content_model: &str) -> Result<Vec<String>> {
        (**self).find_by_content_model(content_model)
    }

    fn next_pid(&self, namespace: &str) -> Result<String> {
        (**self).next_pid(namespace)
    }
}
