//! Directory-backed store: one JSON document per object.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use eulcm_core::models::object::DigitalObject;
use eulcm_core::models::relation::Predicate;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::versioning;
use crate::ObjectStore;

const OBJECTS_DIR: &str = "objects";
const COUNTERS_FILE: &str = "pid-counters.json";

#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(OBJECTS_DIR))?;
        tracing::debug!(root = %root.display(), "opened directory store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, pid: &str) -> PathBuf {
        let file_name = format!("{}.json", pid.replace('%', "%25").replace(':', "%3A").replace('/', "%2F"));
        self.root.join(OBJECTS_DIR).join(file_name)
    }

    /// Writes through a temporary file so readers never see a partial record.
    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let tmp = path.with_extension(format!("{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn read(&self, pid: &str) -> Result<Option<DigitalObject>> {
        match fs::read(self.object_path(pid)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn all(&self) -> Result<Vec<DigitalObject>> {
        let mut objects = Vec::new();
        for entry in fs::read_dir(self.root.join(OBJECTS_DIR))? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                objects.push(serde_json::from_slice(&fs::read(&path)?)?);
            }
        }
        objects.sort_by(|a: &DigitalObject, b| a.pid.cmp(&b.pid));
        Ok(objects)
    }

    fn matching(&self, keep: impl Fn(&DigitalObject) -> bool) -> Result<Vec<String>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|object| keep(object))
            .map(|object| object.pid)
            .collect())
    }
}

impl ObjectStore for DirStore {
    fn fetch(&self, pid: &str) -> Result<DigitalObject> {
        self.read(pid)?.ok_or_else(|| Error::NotFound(pid.to_string()))
    }

    fn exists(&self, pid: &str) -> Result<bool> {
        Ok(self.object_path(pid).exists())
    }

    fn ingest(&self, mut object: DigitalObject) -> Result<DigitalObject> {
        if self.exists(&object.pid)? {
            return Err(Error::AlreadyExists(object.pid));
        }
        versioning::prepare_ingest(&mut object, OffsetDateTime::now_utc());
        self.write_json(&self.object_path(&object.pid), &object)?;
        tracing::info!(pid = %object.pid, "ingested object");
        Ok(object)
    }

    fn modify(&self, mut object: DigitalObject) -> Result<DigitalObject> {
        let previous = self.fetch(&object.pid)?;
        versioning::apply_modification(&previous, &mut object, OffsetDateTime::now_utc());
        self.write_json(&self.object_path(&object.pid), &object)?;
        tracing::info!(pid = %object.pid, "modified object");
        Ok(object)
    }

    fn purge(&self, pid: &str) -> Result<()> {
        match fs::remove_file(self.object_path(pid)) {
            Ok(()) => {
                tracing::info!(pid, "purged object");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(Error::NotFound(pid.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    fn subjects(&self, predicate: Predicate, object_pid: &str) -> Result<Vec<String>> {
        self.matching(|object| object.points_to(predicate, object_pid))
    }

    fn find_by_content_model(&self, content_model: &str) -> Result<Vec<String>> {
        self.matching(|object| object.has_model(content_model))
    }

    fn next_pid(&self, namespace: &str) -> Result<String> {
        let path = self.root.join(COUNTERS_FILE);
        let mut counters: BTreeMap<String, u64> = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        let counter = counters.entry(namespace.to_string()).or_insert(0);
        let pid = loop {
            *counter += 1;
            let pid = format!("{}:{}", namespace, counter);
            if !self.exists(&pid)? {
                break pid;
            }
        };
        self.write_json(&path, &counters)?;
        Ok(pid)
    }
}
