//! Technical metadata for files recovered from legacy computers.

use std::iter::FusedIterator;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::{Field, NodeListField, Schema, StringField, XmlObject};
use crate::error::Result;

pub const FILEMASTERTECH_NS: &str = "http://pid.emory.edu/ns/2011/filemastertech";
const NS: super::Namespaces = &[("fs", FILEMASTERTECH_NS)];

/// Computers whose file systems can be browsed by directory.
pub const BROWSABLE_COMPUTERS: [&str; 2] = ["Performa 5400", "Performa 5300c"];

struct FileMap {
    local_id: StringField,
    md5: StringField,
    computer: StringField,
    path: StringField,
    rawpath: StringField,
    attributes: StringField,
    created: StringField,
    modified: StringField,
    file_type: StringField,
    creator: StringField,
    schema: Schema,
}

static FILE: Lazy<FileMap> = Lazy::new(|| {
    let local_id = StringField::new("local_id", "fs:localId", NS);
    let md5 = StringField::new("md5", "fs:md5", NS).verbose_name("MD5 checksum");
    let computer = StringField::new("computer", "fs:computer", NS);
    let path = StringField::new("path", "fs:path", NS);
    let rawpath = StringField::new("rawpath", "fs:rawpath", NS);
    let attributes = StringField::new("attributes", "fs:attributes", NS);
    let created = StringField::new("created", "fs:created", NS);
    let modified = StringField::new("modified", "fs:modified", NS);
    let file_type = StringField::new("type", "fs:type", NS);
    let creator = StringField::new("creator", "fs:creator", NS);

    let schema = Schema::new("FileMasterTech_Base", "file", NS).with_fields([
        local_id.info().clone(),
        md5.info().clone(),
        computer.info().clone(),
        path.info().clone(),
        rawpath.info().clone(),
        attributes.info().clone(),
        created.info().clone(),
        modified.info().clone(),
        file_type.info().clone(),
        creator.info().clone(),
    ]);

    FileMap {
        local_id,
        md5,
        computer,
        path,
        rawpath,
        attributes,
        created,
        modified,
        file_type,
        creator,
        schema,
    }
});

xml_object!(
    /// One `fs:file` entry: where a file lived and what the source system said about it.
    FileMasterTechBase => &FILE.schema
);

impl FileMasterTechBase {
    string_accessors!(pub FILE:
        local_id / set_local_id,
        md5 / set_md5,
        computer / set_computer,
        path / set_path,
        rawpath / set_rawpath,
        attributes / set_attributes,
        created / set_created,
        modified / set_modified,
        file_type / set_file_type,
        creator / set_creator,
    );

    pub fn browsable(&self) -> bool {
        self.computer()
            .is_some_and(|computer| BROWSABLE_COMPUTERS.contains(&computer.as_str()))
    }

    /// Directory components of [`path`](Self::path), one per segment between
    /// the leading slash and the file name.
    pub fn dir_parts(&self) -> DirParts {
        DirParts::new(self.computer(), self.path().as_deref().unwrap_or_default())
    }

    /// File name: the last `/`-delimited segment of the path.
    pub fn name(&self) -> Option<String> {
        self.path()
            .map(|path| path.rsplit('/').next().unwrap_or_default().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirPart {
    pub computer: Option<String>,
    pub base: String,
    pub part: String,
}

/// Single-pass walk over the directory segments of a file path.
#[derive(Debug)]
pub struct DirParts {
    computer: Option<String>,
    segments: std::vec::IntoIter<String>,
    base: String,
}

impl DirParts {
    fn new(computer: Option<String>, path: &str) -> Self {
        let raw: Vec<&str> = path.split('/').collect();
        // the path is absolute: raw[0] is the empty string before the leading
        // slash, and the last entry is the file name
        let segments: Vec<String> = if raw.len() > 2 {
            raw[1..raw.len() - 1].iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };
        Self {
            computer,
            segments: segments.into_iter(),
            base: "/".to_string(),
        }
    }
}

impl Iterator for DirParts {
    type Item = DirPart;

    fn next(&mut self) -> Option<DirPart> {
        let part = self.segments.next()?;
        let item = DirPart {
            computer: self.computer.clone(),
            base: self.base.clone(),
            part: part.clone(),
        };
        self.base.push_str(&part);
        self.base.push('/');
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.segments.size_hint()
    }
}

impl ExactSizeIterator for DirParts {}
impl FusedIterator for DirParts {}

struct DocumentMap {
    file: NodeListField<FileMasterTechBase>,
    schema: Schema,
}

static DOCUMENT: Lazy<DocumentMap> = Lazy::new(|| {
    let file = NodeListField::new("file", "fs:file", NS);
    let schema = Schema::new("FileMasterTech", "document", NS).with_fields([file.info().clone()]);
    DocumentMap { file, schema }
});

xml_object!(
    /// `fs:document`: technical metadata for one or more files.
    FileMasterTech => &DOCUMENT.schema
);

impl FileMasterTech {
    pub fn files(&self) -> Vec<FileMasterTechBase> {
        DOCUMENT.file.get(&self.node)
    }

    pub fn set_files(&mut self, files: Vec<FileMasterTechBase>) -> Result<()> {
        DOCUMENT.file.set(&mut self.node, files)
    }

    pub fn push_file(&mut self, file: FileMasterTechBase) -> Result<()> {
        DOCUMENT.file.push(&mut self.node, file)
    }
}
