//! Transitional born-digital content models: arrangement objects and the
//! mailbox, email message and legacy-file models built on them.

use super::collection::v1_1::{Collection, COLLECTION_CONTENT_MODEL};
use super::datastream::{ControlGroup, DatastreamKind, DatastreamSpec, FileDatastream, XmlDatastream};
use super::relation::{Predicate, Relation, RelationSpec};
use super::{CapabilityBundle, ContentModel};
use crate::cerp::{self, CERP_NS};
use crate::error::{Error, Result};
use crate::xmlmap::filetech::{FileMasterTech, FILEMASTERTECH_NS};
use crate::xmlmap::mods::MODS_NS;
use crate::xmlmap::rights::{Rights, RIGHTS_NS};
use crate::xmlmap::series::ArrangementMods;
use crate::xmlmap::XmlObject;

pub const ARRANGEMENT_CONTENT_MODEL: &str = "info:fedora/emory-control:Arrangement-1.0";
pub const MAILBOX_CONTENT_MODEL: &str = "info:fedora/emory-control:Rushdie-CerpMailbox-1.0";
pub const EMAIL_MESSAGE_CMODEL: &str = "info:fedora/emory-control:Rushdie-MailboxEntry-1.0";
pub const RUSHDIE_FILE_CMODEL: &str = "info:fedora/emory-control:Rushdie-MarblMacFile-1.0";

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

const RIGHTS: DatastreamSpec = DatastreamSpec {
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

const FILETECH: DatastreamSpec = DatastreamSpec {
    id: "FileMasterTech",
    label: "File Technical Metadata",
    declared_control_group: Some(ControlGroup::M),
    versionable: true,
    kind: DatastreamKind::Xml {
        format: None,
        root_ns: FILEMASTERTECH_NS,
        root_name: "document",
        schema: Some(<FileMasterTech as XmlObject>::schema),
    },
};

const MODS: DatastreamSpec = DatastreamSpec {
    id: "MODS",
    label: "MODS Metadata",
    declared_control_group: Some(ControlGroup::M),
    versionable: true,
    kind: DatastreamKind::Xml {
        format: Some(MODS_NS),
        root_ns: MODS_NS,
        root_name: "mods",
        schema: Some(<ArrangementMods as XmlObject>::schema),
    },
};

const COLLECTION_RELATION: RelationSpec = RelationSpec {
    name: "collection",
    predicate: Predicate::IsMemberOfCollection,
    target_model: COLLECTION_CONTENT_MODEL,
    related_name: None,
};

pub static ARRANGEMENT_BUNDLE: CapabilityBundle = CapabilityBundle {
    content_model: ARRANGEMENT_CONTENT_MODEL,
    datastreams: &[RIGHTS, FILETECH, MODS],
    relations: &[COLLECTION_RELATION],
    omits: &[],
};

pub static MAILBOX_BUNDLE: CapabilityBundle = CapabilityBundle {
    content_model: MAILBOX_CONTENT_MODEL,
    datastreams: &[],
    relations: &[],
    omits: &[],
};

const MIME: DatastreamSpec = DatastreamSpec {
    id: "MIME",
    label: "MIME message",
    declared_control_group: None,
    versionable: true,
    kind: DatastreamKind::File {
        mimetype: "message/rfc822",
    },
};

const CERP: DatastreamSpec = DatastreamSpec {
    id: "CERP",
    label: "CERP xml",
    declared_control_group: None,
    versionable: true,
    kind: DatastreamKind::Xml {
        format: None,
        root_ns: CERP_NS,
        root_name: "Message",
        schema: None,
    },
};

const MESSAGE_MAILBOX: RelationSpec = RelationSpec {
    name: "mailbox",
    predicate: Predicate::IsPartOf,
    target_model: MAILBOX_CONTENT_MODEL,
    related_name: Some("messages"),
};

pub static EMAIL_MESSAGE_BUNDLE: CapabilityBundle = CapabilityBundle {
    content_model: EMAIL_MESSAGE_CMODEL,
    datastreams: &[MIME, CERP],
    relations: &[MESSAGE_MAILBOX],
    omits: &["FileMasterTech"],
};

const ORIGINAL: DatastreamSpec = DatastreamSpec {
    id: "ORIGINAL",
    label: "original file",
    declared_control_group: None,
    versionable: true,
    kind: DatastreamKind::File {
        mimetype: "application/",
    },
};

const PDF: DatastreamSpec = DatastreamSpec {
    id: "PDF",
    label: "pdf of original file",
    declared_control_group: None,
    versionable: true,
    kind: DatastreamKind::File {
        mimetype: "application/pdf",
    },
};

const FILE_MAILBOX: RelationSpec = RelationSpec {
    name: "mailbox",
    predicate: Predicate::IsConstituentOf,
    target_model: MAILBOX_CONTENT_MODEL,
    related_name: Some("constituent_files"),
};

pub static RUSHDIE_FILE_BUNDLE: CapabilityBundle = CapabilityBundle {
    content_model: RUSHDIE_FILE_CMODEL,
    datastreams: &[ORIGINAL, PDF],
    relations: &[FILE_MAILBOX],
    omits: &[],
};

pub static ARRANGEMENT_MODEL: ContentModel = ContentModel {
    name: "Arrangement",
    bundles: &[&ARRANGEMENT_BUNDLE],
};

pub static MAILBOX_MODEL: ContentModel = ContentModel {
    name: "Mailbox",
    bundles: &[&MAILBOX_BUNDLE, &ARRANGEMENT_BUNDLE],
};

pub static EMAIL_MESSAGE_MODEL: ContentModel = ContentModel {
    name: "EmailMessage",
    bundles: &[&EMAIL_MESSAGE_BUNDLE, &ARRANGEMENT_BUNDLE],
};

pub static RUSHDIE_FILE_MODEL: ContentModel = ContentModel {
    name: "RushdieFile",
    bundles: &[&RUSHDIE_FILE_BUNDLE, &ARRANGEMENT_BUNDLE],
};

// ---------------------------------------------------------------------------
// Arrangement
// ---------------------------------------------------------------------------

repository_object! {
    /// Born-digital material waiting to be processed and arranged into series.
    Arrangement => &ARRANGEMENT_MODEL, {
        rights: XmlDatastream<Rights> = &RIGHTS,
        filetech: XmlDatastream<FileMasterTech> = &FILETECH,
        mods: XmlDatastream<ArrangementMods> = &MODS,
    }
}

impl Arrangement {
    /// Collection (v1.1) this object belongs to.
    pub const COLLECTION: Relation<Collection> = Relation::new(&COLLECTION_RELATION);

    pub fn collection_pid(&self) -> Option<&str> {
        Self::COLLECTION.pid(&self.object)
    }

    pub fn set_collection(&mut self, collection: Option<&Collection>) {
        Self::COLLECTION.set(&mut self.object, collection);
    }
}

// ---------------------------------------------------------------------------
// Mailbox
// ---------------------------------------------------------------------------

repository_object! {
    /// An email account or mailbox. Its messages and constituent files are
    /// found by querying for objects that point at it.
    Mailbox => &MAILBOX_MODEL, {
        rights: XmlDatastream<Rights> = &RIGHTS,
        filetech: XmlDatastream<FileMasterTech> = &FILETECH,
        mods: XmlDatastream<ArrangementMods> = &MODS,
    }
}

impl Mailbox {
    pub const COLLECTION: Relation<Collection> = Relation::new(&COLLECTION_RELATION);

    pub fn collection_pid(&self) -> Option<&str> {
        Self::COLLECTION.pid(&self.object)
    }

    pub fn set_collection(&mut self, collection: Option<&Collection>) {
        Self::COLLECTION.set(&mut self.object, collection);
    }
}

// ---------------------------------------------------------------------------
// EmailMessage
// ---------------------------------------------------------------------------

repository_object! {
    /// One message from a mailbox: the raw MIME source and its CERP rendering.
    EmailMessage => &EMAIL_MESSAGE_MODEL, {
        rights: XmlDatastream<Rights> = &RIGHTS,
        mods: XmlDatastream<ArrangementMods> = &MODS,
        mime: FileDatastream = &MIME,
        cerp: XmlDatastream<cerp::Message> = &CERP,
    }
}

impl EmailMessage {
    pub const MAILBOX: Relation<Mailbox> = Relation::new(&MESSAGE_MAILBOX);

    pub fn mailbox_pid(&self) -> Option<&str> {
        Self::MAILBOX.pid(&self.object)
    }

    pub fn set_mailbox(&mut self, mailbox: Option<&Mailbox>) {
        Self::MAILBOX.set(&mut self.object, mailbox);
    }

    /// Regenerates the CERP datastream from the MIME datastream. The result
    /// is only held in memory until the object is saved.
    pub fn update_cerp(&mut self) -> Result<()> {
        let raw = self
            .mime
            .content()
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| Error::Conversion(format!("{} has no MIME content", self.object.pid)))?;
        let message = cerp::Message::from_email_message(raw)?;
        tracing::debug!(pid = %self.object.pid, "regenerated CERP from MIME");
        self.cerp.set_content(message);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RushdieFile
// ---------------------------------------------------------------------------

repository_object! {
    /// A file recovered from one of the legacy computers.
    RushdieFile => &RUSHDIE_FILE_MODEL, {
        rights: XmlDatastream<Rights> = &RIGHTS,
        filetech: XmlDatastream<FileMasterTech> = &FILETECH,
        mods: XmlDatastream<ArrangementMods> = &MODS,
        original: FileDatastream = &ORIGINAL,
        pdf: FileDatastream = &PDF,
    }
}

impl RushdieFile {
    pub const MAILBOX: Relation<Mailbox> = Relation::new(&FILE_MAILBOX);

    pub fn mailbox_pid(&self) -> Option<&str> {
        Self::MAILBOX.pid(&self.object)
    }

    pub fn set_mailbox(&mut self, mailbox: Option<&Mailbox>) {
        Self::MAILBOX.set(&mut self.object, mailbox);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepositoryObject;
    use crate::models::datastream::DatastreamSlot;
    use crate::xmlmap::mods::ModsCommon;

    #[test]
    fn test_content_models_most_specific_first() {
        let email = EmailMessage::new_object("emory:msg");
        assert_eq!(
            EmailMessage::model().content_models(),
            vec![EMAIL_MESSAGE_CMODEL, ARRANGEMENT_CONTENT_MODEL]
        );
        assert_eq!(
            email.object().content_models,
            vec![EMAIL_MESSAGE_CMODEL.to_string(), ARRANGEMENT_CONTENT_MODEL.to_string()]
        );
        assert_eq!(
            Mailbox::model().content_models(),
            vec![MAILBOX_CONTENT_MODEL, ARRANGEMENT_CONTENT_MODEL]
        );
        assert_eq!(
            RushdieFile::model().content_models(),
            vec![RUSHDIE_FILE_CMODEL, ARRANGEMENT_CONTENT_MODEL]
        );
    }

    #[test]
    fn test_email_message_omits_filetech() {
        let ids: Vec<_> = EMAIL_MESSAGE_MODEL.datastreams().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["Rights", "MODS", "MIME", "CERP"]);

        let ids: Vec<_> = RUSHDIE_FILE_MODEL.datastreams().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["Rights", "FileMasterTech", "MODS", "ORIGINAL", "PDF"]);
    }

    #[test]
    fn test_persisted_layout() {
        let mods = ARRANGEMENT_MODEL.datastream("MODS").unwrap();
        assert_eq!(mods.control_group(), ControlGroup::M);
        assert_eq!(mods.format(), Some("http://www.loc.gov/mods/v3"));
        assert!(mods.versionable);

        let mime = EMAIL_MESSAGE_MODEL.datastream("MIME").unwrap();
        assert_eq!(mime.mimetype(), "message/rfc822");
        let cerp = EMAIL_MESSAGE_MODEL.datastream("CERP").unwrap();
        assert!(cerp.is_xml());
        assert!(cerp.versionable);

        assert_eq!(RUSHDIE_FILE_MODEL.datastream("ORIGINAL").unwrap().mimetype(), "application/");
        assert_eq!(RUSHDIE_FILE_MODEL.datastream("PDF").unwrap().mimetype(), "application/pdf");
    }

    #[test]
    fn test_mailbox_relations_stay_distinct() {
        let email = EMAIL_MESSAGE_MODEL.relations();
        let file = RUSHDIE_FILE_MODEL.relations();
        let email_mailbox = email.iter().find(|r| r.name == "mailbox").unwrap();
        let file_mailbox = file.iter().find(|r| r.name == "mailbox").unwrap();
        assert_eq!(email_mailbox.predicate, Predicate::IsPartOf);
        assert_eq!(email_mailbox.related_name, Some("messages"));
        assert_eq!(file_mailbox.predicate, Predicate::IsConstituentOf);
        assert_eq!(file_mailbox.related_name, Some("constituent_files"));
        // both inherit the collection relation
        assert!(email.iter().any(|r| r.name == "collection"));
    }

    fn slot_ids<T: RepositoryObject>(item: &mut T) -> Vec<&'static str> {
        item.slots_mut().1.iter().map(|slot| slot.spec().id).collect()
    }

    fn declared_ids<T: RepositoryObject>() -> Vec<&'static str> {
        T::model().datastreams().iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_slots_follow_model_datastreams() {
        assert_eq!(slot_ids(&mut Arrangement::new_object("emory:a")), declared_ids::<Arrangement>());
        assert_eq!(slot_ids(&mut Mailbox::new_object("emory:b")), declared_ids::<Mailbox>());
        assert_eq!(slot_ids(&mut EmailMessage::new_object("emory:m")), declared_ids::<EmailMessage>());
        assert_eq!(slot_ids(&mut RushdieFile::new_object("emory:f")), declared_ids::<RushdieFile>());
    }

    #[test]
    fn test_reload_restores_every_slot() {
        let mut file = RushdieFile::new_object("emory:file");
        file.original.set_content(b"draft".to_vec());
        file.pdf.set_content(b"%PDF".to_vec());
        file.mods.content_mut().unwrap().set_title(Some("Chapter 1")).unwrap();
        file.flush().unwrap();

        let mut reloaded = RushdieFile::from_object(file.object().clone());
        assert_eq!(reloaded.original.content(), Some(&b"draft"[..]));
        assert_eq!(reloaded.pdf.content(), Some(&b"%PDF"[..]));
        assert_eq!(
            reloaded.mods.content().unwrap().title().as_deref(),
            Some("Chapter 1")
        );
        assert!(!reloaded.is_modified());
    }

    #[test]
    fn test_update_cerp_without_mime_fails() {
        let mut email = EmailMessage::new_object("emory:msg");
        let err = email.update_cerp().unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
        assert!(!email.cerp.exists());
    }

    #[test]
    fn test_update_cerp_regenerates_in_memory() {
        let mut email = EmailMessage::new_object("emory:msg");
        email.mime.set_content(
            b"From: Salman <sr@example.com>\r\nTo: editor@example.com\r\nSubject: Chapter 3\r\nMessage-ID: <1@example.com>\r\n\r\nDraft attached.\r\n"
                .to_vec(),
        );
        email.update_cerp().unwrap();
        assert!(email.cerp.is_modified());
        assert_eq!(email.cerp.content().unwrap().subject.as_deref(), Some("Chapter 3"));
        // nothing reaches the record until flush
        assert!(email.object().datastream("CERP").is_none());

        email.flush().unwrap();
        let stored = email.object().datastream("CERP").unwrap();
        assert_eq!(stored.control_group, ControlGroup::X);
        assert!(String::from_utf8_lossy(&stored.content).contains("Chapter 3"));
    }

    #[test]
    fn test_relation_handles() {
        let mailbox = Mailbox::new_object("emory:box");
        let mut email = EmailMessage::new_object("emory:msg");
        email.set_mailbox(Some(&mailbox));
        assert_eq!(email.mailbox_pid(), Some("emory:box"));
        assert!(email.object().points_to(Predicate::IsPartOf, "emory:box"));

        let mut file = RushdieFile::new_object("emory:file");
        file.set_mailbox(Some(&mailbox));
        assert!(file.object().points_to(Predicate::IsConstituentOf, "emory:box"));
        assert!(!file.object().points_to(Predicate::IsPartOf, "emory:box"));
    }
}
