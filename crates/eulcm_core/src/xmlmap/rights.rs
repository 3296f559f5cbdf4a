//! Rights metadata: access status, copyright and external-access override.

use once_cell::sync::Lazy;

use super::{Field, NodeField, Schema, SimpleBooleanField, StringField, XmlObject};
use crate::error::Result;

pub const RIGHTS_NS: &str = "http://pid.emory.edu/ns/2010/rights";
const NS: super::Namespaces = &[("rt", RIGHTS_NS)];

struct AccessStatusMap {
    code: StringField,
    text: StringField,
    schema: Schema,
}

static ACCESS_STATUS: Lazy<AccessStatusMap> = Lazy::new(|| {
    let code = StringField::new("code", "@code", NS).required();
    let text = StringField::new("text", "text()", NS)
        .help_text("text description of rights access code");
    let schema = Schema::new("AccessStatus", "accessStatus", NS)
        .with_fields([code.info().clone(), text.info().clone()]);
    AccessStatusMap { code, text, schema }
});

xml_object!(
    /// `rt:accessStatus`: coded access decision plus its description.
    AccessStatus => &ACCESS_STATUS.schema
);

impl AccessStatus {
    pub fn code(&self) -> Option<String> {
        ACCESS_STATUS.code.get(&self.node)
    }

    pub fn set_code(&mut self, code: Option<&str>) -> Result<()> {
        ACCESS_STATUS.code.set(&mut self.node, code)
    }

    pub fn text(&self) -> Option<String> {
        ACCESS_STATUS.text.get(&self.node)
    }

    pub fn set_text(&mut self, text: Option<&str>) -> Result<()> {
        ACCESS_STATUS.text.set(&mut self.node, text)
    }
}

struct RightsMap {
    access_status: NodeField<AccessStatus>,
    copyright_holder_name: StringField,
    copyright_date: StringField,
    access_restriction_expiration: StringField,
    block_external_access: SimpleBooleanField,
    ip_note: StringField,
    schema: Schema,
}

static RIGHTS: Lazy<RightsMap> = Lazy::new(|| {
    let access_status = NodeField::new("access_status", "rt:accessStatus", NS)
        .required()
        .help_text("File access status, as determined by analysis of copyright, donor agreements, permissions, etc.");
    let copyright_holder_name = StringField::new("copyright_holder_name", "rt:copyrightholderName", NS)
        .help_text("Name of a copyright holder in last, first order");
    let copyright_date = StringField::new("copyright_date", r#"rt:copyrightDate[@encoding="w3cdtf"]"#, NS)
        .help_text("Date of copyright");
    // element name is misspelled in the published schema and must stay that way
    let access_restriction_expiration = StringField::new(
        "access_restriction_expiration",
        r#"rt:accessRestrictionExperation[@encoding="w3cdtf"]"#,
        NS,
    )
    .help_text("Date of when restrictions on an item might expire");
    let block_external_access =
        SimpleBooleanField::new("block_external_access", "rt:externalAccess", NS, "deny", None)
            .help_text("Deny external access (override Access Status).");
    let ip_note = StringField::new("ip_note", "rt:ipNotes", NS)
        .verbose_name("IP Note")
        .help_text("Additional information about the intellectual property rights of the associated work.");

    let schema = Schema::new("Rights", "rights", NS).with_fields([
        access_status.info().clone(),
        copyright_holder_name.info().clone(),
        copyright_date.info().clone(),
        access_restriction_expiration.info().clone(),
        block_external_access.info().clone(),
        ip_note.info().clone(),
    ]);

    RightsMap {
        access_status,
        copyright_holder_name,
        copyright_date,
        access_restriction_expiration,
        block_external_access,
        ip_note,
        schema,
    }
});

xml_object!(
    /// Usage rights and access control metadata (`rt:rights`).
    Rights => &RIGHTS.schema
);

impl Rights {
    pub fn access_status(&self) -> Option<AccessStatus> {
        RIGHTS.access_status.get(&self.node)
    }

    pub fn set_access_status(&mut self, status: Option<AccessStatus>) -> Result<()> {
        RIGHTS.access_status.set(&mut self.node, status)
    }

    pub fn copyright_holder_name(&self) -> Option<String> {
        RIGHTS.copyright_holder_name.get(&self.node)
    }

    pub fn set_copyright_holder_name(&mut self, name: Option<&str>) -> Result<()> {
        RIGHTS.copyright_holder_name.set(&mut self.node, name)
    }

    pub fn copyright_date(&self) -> Option<String> {
        RIGHTS.copyright_date.get(&self.node)
    }

    pub fn set_copyright_date(&mut self, date: Option<&str>) -> Result<()> {
        RIGHTS.copyright_date.set(&mut self.node, date)
    }

    pub fn access_restriction_expiration(&self) -> Option<String> {
        RIGHTS.access_restriction_expiration.get(&self.node)
    }

    pub fn set_access_restriction_expiration(&mut self, date: Option<&str>) -> Result<()> {
        RIGHTS.access_restriction_expiration.set(&mut self.node, date)
    }

    /// When true, access is refused irrespective of the access status.
    pub fn block_external_access(&self) -> bool {
        RIGHTS.block_external_access.get(&self.node)
    }

    pub fn set_block_external_access(&mut self, block: bool) -> Result<()> {
        RIGHTS.block_external_access.set(&mut self.node, block)
    }

    pub fn ip_note(&self) -> Option<String> {
        RIGHTS.ip_note.get(&self.node)
    }

    pub fn set_ip_note(&mut self, note: Option<&str>) -> Result<()> {
        RIGHTS.ip_note.set(&mut self.node, note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_rights() -> Rights {
        let mut status = AccessStatus::new();
        status.set_code(Some("2")).unwrap();
        status.set_text(Some("Public Domain")).unwrap();

        let mut rights = Rights::new();
        rights.set_access_status(Some(status)).unwrap();
        rights.set_block_external_access(true).unwrap();
        rights
    }

    #[test]
    fn test_rights_round_trip() {
        let rights = public_rights();
        let xml = rights.to_xml().unwrap();
        assert!(xml.contains("<rt:externalAccess>deny</rt:externalAccess>"), "{}", xml);

        let parsed = Rights::from_xml(&xml).unwrap();
        let status = parsed.access_status().expect("access status");
        assert_eq!(status.code().as_deref(), Some("2"));
        assert_eq!(status.text().as_deref(), Some("Public Domain"));
        assert!(parsed.block_external_access());
        assert_eq!(parsed, Rights::from_xml(&parsed.to_xml().unwrap()).unwrap());
    }

    #[test]
    fn test_block_external_access_is_binary() {
        let allow = Rights::from_xml(
            r#"<rt:rights xmlns:rt="http://pid.emory.edu/ns/2010/rights">
                 <rt:externalAccess>allow</rt:externalAccess>
               </rt:rights>"#,
        )
        .unwrap();
        assert!(!allow.block_external_access());

        let absent = Rights::new();
        assert!(!absent.block_external_access());

        let mut cleared = public_rights();
        cleared.set_block_external_access(false).unwrap();
        assert!(!cleared.to_xml().unwrap().contains("externalAccess"));
    }

    #[test]
    fn test_dated_fields_carry_encoding_attribute() {
        let mut rights = Rights::new();
        rights.set_copyright_date(Some("1999-05-01")).unwrap();
        rights.set_access_restriction_expiration(Some("2030")).unwrap();
        let xml = rights.to_xml().unwrap();
        assert!(xml.contains(r#"<rt:copyrightDate encoding="w3cdtf">1999-05-01</rt:copyrightDate>"#));
        assert!(xml.contains("rt:accessRestrictionExperation"));

        let unencoded = Rights::from_xml(
            r#"<rt:rights xmlns:rt="http://pid.emory.edu/ns/2010/rights">
                 <rt:copyrightDate>1999</rt:copyrightDate>
               </rt:rights>"#,
        )
        .unwrap();
        assert_eq!(unencoded.copyright_date(), None);
    }

    #[test]
    fn test_required_fields_reported() {
        let errors = Rights::new().validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "access_status");

        let mut rights = Rights::new();
        rights.set_access_status(Some(AccessStatus::new())).unwrap();
        let errors = rights.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "access_status.code");

        assert!(public_rights().is_valid());
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        let err = Rights::from_xml(r#"<rights xmlns="urn:other"/>"#).unwrap_err();
        assert!(matches!(err, crate::error::Error::RootMismatch { .. }));
    }
}
