//! MODS with shortcut fields for local identifiers and typed access conditions.

use once_cell::sync::Lazy;

use super::mods::{base_fields, AccessCondition, ModsCommon, NS};
use super::{Field, IntegerField, NodeField, Schema, StringField};
use crate::error::Result;

struct CollectionModsMap {
    ark: StringField,
    ark_uri: StringField,
    source_id: IntegerField,
    short_name: StringField,
    restrictions_on_access: NodeField<AccessCondition>,
    use_and_reproduction: NodeField<AccessCondition>,
    schema: Schema,
}

static COLLECTION_MODS: Lazy<CollectionModsMap> = Lazy::new(|| {
    let ark = StringField::new("ark", r#"mods:identifier[@type="ark"]"#, NS)
        .help_text("ARK (Archival Resource Key) identifier, short form");
    let ark_uri = StringField::new("ark_uri", r#"mods:identifier[@type="uri"][contains(., "ark:")]"#, NS)
        .help_text("ARK identifier as a full, resolvable URL");
    let source_id = IntegerField::new("source_id", "mods:identifier[@type='local_source_id']", NS);
    let short_name = StringField::new("short_name", "mods:identifier[@type='local_short_name']", NS);
    let restrictions_on_access = NodeField::new(
        "restrictions_on_access",
        r#"mods:accessCondition[@type="restrictions on access"]"#,
        NS,
    );
    let use_and_reproduction = NodeField::new(
        "use_and_reproduction",
        r#"mods:accessCondition[@type="use and reproduction"]"#,
        NS,
    );

    let schema = Schema::new("MODS", "mods", NS).with_fields(base_fields()).with_fields([
        ark.info().clone(),
        ark_uri.info().clone(),
        source_id.info().clone(),
        short_name.info().clone(),
        restrictions_on_access.info().clone(),
        use_and_reproduction.info().clone(),
    ]);

    CollectionModsMap {
        ark,
        ark_uri,
        source_id,
        short_name,
        restrictions_on_access,
        use_and_reproduction,
        schema,
    }
});

xml_object!(
    /// Base MODS plus identifier and access-condition shortcuts, as used on
    /// collection objects.
    CollectionMods => &COLLECTION_MODS.schema
);

impl ModsCommon for CollectionMods {}

impl CollectionMods {
    string_accessors!(pub COLLECTION_MODS:
        ark / set_ark,
        short_name / set_short_name,
    );
    node_accessors!(pub COLLECTION_MODS:
        restrictions_on_access / set_restrictions_on_access: AccessCondition,
        use_and_reproduction / set_use_and_reproduction: AccessCondition,
    );

    /// Only a `uri` identifier that contains `ark:` qualifies.
    pub fn ark_uri(&self) -> Option<String> {
        COLLECTION_MODS.ark_uri.get(&self.node)
    }

    /// Fails with a validation error when `uri` does not contain `ark:`.
    pub fn set_ark_uri(&mut self, uri: Option<&str>) -> Result<()> {
        COLLECTION_MODS.ark_uri.set(&mut self.node, uri)
    }

    pub fn source_id(&self) -> Result<Option<i64>> {
        COLLECTION_MODS.source_id.get(&self.node)
    }

    pub fn set_source_id(&mut self, id: Option<i64>) -> Result<()> {
        COLLECTION_MODS.source_id.set(&mut self.node, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::xmlmap::XmlObject;

    const COLLECTION: &str = r#"<mods:mods xmlns:mods="http://www.loc.gov/mods/v3">
        <mods:titleInfo><mods:title>Salman Rushdie papers</mods:title></mods:titleInfo>
        <mods:identifier type="uri">http://example.com/not-an-ark</mods:identifier>
        <mods:identifier type="uri">http://pid.emory.edu/ark:/25593/1fx</mods:identifier>
        <mods:identifier type="ark">ark:/25593/1fx</mods:identifier>
        <mods:identifier type="local_source_id">1000</mods:identifier>
        <mods:identifier type="local_short_name">MSS1000</mods:identifier>
        <mods:accessCondition type="restrictions on access">Closed until 2030.</mods:accessCondition>
        <mods:accessCondition type="use and reproduction">All rights reserved.</mods:accessCondition>
    </mods:mods>"#;

    #[test]
    fn test_shortcut_fields() {
        let mods = CollectionMods::from_xml(COLLECTION).unwrap();
        assert_eq!(mods.title().as_deref(), Some("Salman Rushdie papers"));
        assert_eq!(mods.ark().as_deref(), Some("ark:/25593/1fx"));
        assert_eq!(mods.ark_uri().as_deref(), Some("http://pid.emory.edu/ark:/25593/1fx"));
        assert_eq!(mods.source_id().unwrap(), Some(1000));
        assert_eq!(mods.short_name().as_deref(), Some("MSS1000"));
        assert_eq!(
            mods.restrictions_on_access().and_then(|a| a.text()).as_deref(),
            Some("Closed until 2030.")
        );
        assert_eq!(
            mods.use_and_reproduction().and_then(|a| a.text()).as_deref(),
            Some("All rights reserved.")
        );
        assert_eq!(mods.identifiers().len(), 5);
    }

    #[test]
    fn test_non_numeric_source_id_is_a_validation_error() {
        let mods = CollectionMods::from_xml(
            r#"<mods:mods xmlns:mods="http://www.loc.gov/mods/v3">
                 <mods:identifier type="local_source_id">MSS-1000</mods:identifier>
               </mods:mods>"#,
        )
        .unwrap();
        assert!(matches!(mods.source_id(), Err(Error::Validation { .. })));

        let errors = mods.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "source_id");
    }

    #[test]
    fn test_set_shortcuts_create_typed_nodes() {
        let mut mods = CollectionMods::new();
        mods.set_source_id(Some(42)).unwrap();
        mods.set_ark_uri(Some("http://pid.emory.edu/ark:/25593/zz")).unwrap();
        let mut restriction = AccessCondition::new();
        restriction.set_text(Some("Open")).unwrap();
        mods.set_restrictions_on_access(Some(restriction)).unwrap();

        let xml = mods.to_xml().unwrap();
        assert!(xml.contains(r#"<mods:identifier type="local_source_id">42</mods:identifier>"#), "{}", xml);
        assert!(xml.contains(r#"<mods:accessCondition type="restrictions on access">Open</mods:accessCondition>"#), "{}", xml);

        let reparsed = CollectionMods::from_xml(&xml).unwrap();
        assert_eq!(reparsed.source_id().unwrap(), Some(42));
        assert!(reparsed.ark_uri().is_some());

        mods.set_source_id(None).unwrap();
        assert_eq!(mods.source_id().unwrap(), None);
    }

    #[test]
    fn test_ark_uri_must_contain_ark() {
        let mut mods = CollectionMods::new();
        let err = mods.set_ark_uri(Some("http://example.com/")).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
