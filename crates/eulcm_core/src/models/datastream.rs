//! Datastream declarations and the typed slots models use to read and
//! write them.

use serde::{Deserialize, Serialize};

use super::object::DigitalObject;
use crate::error::Result;
use crate::xmlmap::SchemaRef;

/// Anything that can live in a datastream: mapped XML documents and the
/// CERP message record.
pub trait DatastreamContent: Sized {
    /// Content for a datastream that has never been written.
    fn empty() -> Self;
    fn decode(bytes: &[u8]) -> Result<Self>;
    fn encode(&self) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlGroup {
    /// Inline XML
    X,
    /// Managed content
    M,
    /// Externally referenced
    E,
    /// Redirect
    R,
}

impl ControlGroup {
    pub fn code(self) -> &'static str {
        match self {
            ControlGroup::X => "X",
            ControlGroup::M => "M",
            ControlGroup::E => "E",
            ControlGroup::R => "R",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum DatastreamKind {
    /// XML content bound to a document type.
    Xml {
        /// Format URI recorded on the datastream, when declared.
        format: Option<&'static str>,
        root_ns: &'static str,
        root_name: &'static str,
        /// Field schema for mapped documents; `None` for serde-bound content.
        schema: Option<SchemaRef>,
    },
    /// Opaque bytes with a default MIME type.
    File { mimetype: &'static str },
}

/// Static declaration of one datastream on a content model.
#[derive(Debug, Clone, Copy)]
pub struct DatastreamSpec {
    pub id: &'static str,
    pub label: &'static str,
    /// `None` when the declaration leaves it to the default for the kind.
    pub declared_control_group: Option<ControlGroup>,
    pub versionable: bool,
    pub kind: DatastreamKind,
}

impl DatastreamSpec {
    /// Inline XML for undeclared XML datastreams, managed for everything else.
    pub fn control_group(&self) -> ControlGroup {
        match (self.declared_control_group, &self.kind) {
            (Some(group), _) => group,
            (None, DatastreamKind::Xml { .. }) => ControlGroup::X,
            (None, DatastreamKind::File { .. }) => ControlGroup::M,
        }
    }

    pub fn mimetype(&self) -> &'static str {
        match self.kind {
            DatastreamKind::Xml { .. } => "text/xml",
            DatastreamKind::File { mimetype } => mimetype,
        }
    }

    pub fn format(&self) -> Option<&'static str> {
        match self.kind {
            DatastreamKind::Xml { format, .. } => format,
            DatastreamKind::File { .. } => None,
        }
    }

    pub fn is_xml(&self) -> bool {
        matches!(self.kind, DatastreamKind::Xml { .. })
    }
}

/// Write-back surface shared by every slot kind.
pub trait DatastreamSlot {
    fn spec(&self) -> &'static DatastreamSpec;
    fn is_modified(&self) -> bool;
    /// Stores modified content on `object` and clears the modified flag.
    fn flush(&mut self, object: &mut DigitalObject) -> Result<()>;
}

// ---------------------------------------------------------------------------
// XML datastreams
// ---------------------------------------------------------------------------

/// Typed XML datastream. Stored bytes are decoded on first access; an absent
/// datastream reads as empty content.
#[derive(Debug, Clone)]
pub struct XmlDatastream<T> {
    spec: &'static DatastreamSpec,
    raw: Option<Vec<u8>>,
    content: Option<T>,
    modified: bool,
}

impl<T: DatastreamContent> XmlDatastream<T> {
    pub fn load(spec: &'static DatastreamSpec, object: &DigitalObject) -> Self {
        Self {
            spec,
            raw: object.datastream(spec.id).map(|ds| ds.content.clone()),
            content: None,
            modified: false,
        }
    }

    /// True when the datastream is stored or has been given content.
    pub fn exists(&self) -> bool {
        self.raw.is_some() || self.modified
    }

    pub fn content(&mut self) -> Result<&T> {
        self.loaded().map(|content| &*content)
    }

    /// Mutable access; marks the datastream modified.
    pub fn content_mut(&mut self) -> Result<&mut T> {
        self.loaded()?;
        self.modified = true;
        self.loaded()
    }

    pub fn set_content(&mut self, content: T) {
        self.content = Some(content);
        self.modified = true;
    }

    fn loaded(&mut self) -> Result<&mut T> {
        let content = match self.content.take() {
            Some(content) => content,
            None => match &self.raw {
                Some(bytes) => T::decode(bytes)?,
                None => T::empty(),
            },
        };
        Ok(self.content.insert(content))
    }
}

impl<T: DatastreamContent> DatastreamSlot for XmlDatastream<T> {
    fn spec(&self) -> &'static DatastreamSpec {
        self.spec
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn flush(&mut self, object: &mut DigitalObject) -> Result<()> {
        if !self.modified {
            return Ok(());
        }
        if let Some(content) = &self.content {
            let bytes = content.encode()?;
            object.put_datastream(self.spec, bytes.clone(), self.spec.mimetype());
            self.raw = Some(bytes);
        }
        self.modified = false;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Raw file datastreams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FileDatastream {
    spec: &'static DatastreamSpec,
    content: Option<Vec<u8>>,
    mimetype: String,
    modified: bool,
}

impl FileDatastream {
    pub fn load(spec: &'static DatastreamSpec, object: &DigitalObject) -> Self {
        let stored = object.datastream(spec.id);
        Self {
            spec,
            content: stored.map(|ds| ds.content.clone()),
            mimetype: stored
                .map(|ds| ds.mimetype.clone())
                .unwrap_or_else(|| spec.mimetype().to_string()),
            modified: false,
        }
    }

    pub fn exists(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    pub fn set_content(&mut self, content: Vec<u8>) {
        self.content = Some(content);
        self.modified = true;
    }

    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    pub fn set_mimetype(&mut self, mimetype: impl Into<String>) {
        self.mimetype = mimetype.into();
        self.modified = true;
    }
}

impl DatastreamSlot for FileDatastream {
    fn spec(&self) -> &'static DatastreamSpec {
        self.spec
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn flush(&mut self, object: &mut DigitalObject) -> Result<()> {
        if self.modified {
            if let Some(content) = &self.content {
                object.put_datastream(self.spec, content.clone(), &self.mimetype);
            }
            self.modified = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmlmap::rights::{Rights, RIGHTS_NS};
    use crate::xmlmap::XmlObject;

    static RIGHTS_SPEC: DatastreamSpec = DatastreamSpec {
        id: "Rights",
        label: "Usage rights and access control metadata",
        declared_control_group: Some(ControlGroup::M),
        versionable: true,
        kind: DatastreamKind::Xml {
            format: None,
            root_ns: RIGHTS_NS,
            root_name: "rights",
            schema: Some(<Rights as XmlObject>::schema),
        },
    };

    static ORIGINAL_SPEC: DatastreamSpec = DatastreamSpec {
        id: "ORIGINAL",
        label: "original file",
        declared_control_group: None,
        versionable: true,
        kind: DatastreamKind::File { mimetype: "application/" },
    };

    #[test]
    fn test_absent_xml_datastream_reads_empty() {
        let obj = DigitalObject::new("emory:1");
        let mut slot: XmlDatastream<Rights> = XmlDatastream::load(&RIGHTS_SPEC, &obj);
        assert!(!slot.exists());
        assert_eq!(slot.content().unwrap(), &Rights::new());
        assert!(!slot.is_modified());
    }

    #[test]
    fn test_modified_xml_content_is_flushed() {
        let mut obj = DigitalObject::new("emory:1");
        let mut slot: XmlDatastream<Rights> = XmlDatastream::load(&RIGHTS_SPEC, &obj);
        slot.content_mut().unwrap().set_ip_note(Some("donor retains rights")).unwrap();
        assert!(slot.exists());
        slot.flush(&mut obj).unwrap();
        assert!(!slot.is_modified());

        let stored = obj.datastream("Rights").unwrap();
        assert_eq!(stored.control_group, ControlGroup::M);
        assert_eq!(stored.mimetype, "text/xml");
        let text = String::from_utf8(stored.content.clone()).unwrap();
        assert!(text.contains("donor retains rights"));

        let mut reloaded: XmlDatastream<Rights> = XmlDatastream::load(&RIGHTS_SPEC, &obj);
        assert_eq!(
            reloaded.content().unwrap().ip_note().as_deref(),
            Some("donor retains rights")
        );
    }

    #[test]
    fn test_malformed_xml_surfaces_on_access() {
        let mut obj = DigitalObject::new("emory:1");
        obj.put_datastream(&RIGHTS_SPEC, b"<rt:rights".to_vec(), "text/xml");
        let mut slot: XmlDatastream<Rights> = XmlDatastream::load(&RIGHTS_SPEC, &obj);
        assert!(slot.content().is_err());
    }

    #[test]
    fn test_file_datastream_defaults() {
        assert_eq!(ORIGINAL_SPEC.control_group(), ControlGroup::M);
        let mut obj = DigitalObject::new("emory:1");
        let mut slot = FileDatastream::load(&ORIGINAL_SPEC, &obj);
        assert_eq!(slot.mimetype(), "application/");
        assert_eq!(slot.content(), None);

        slot.set_content(b"%!PS".to_vec());
        slot.set_mimetype("application/postscript");
        slot.flush(&mut obj).unwrap();
        let stored = obj.datastream("ORIGINAL").unwrap();
        assert_eq!(stored.mimetype, "application/postscript");
        assert_eq!(stored.content, b"%!PS");
    }
}
