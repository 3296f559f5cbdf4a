//! Base MODS (Metadata Object Description Schema) mapping.
//!
//! Every MODS variant in this crate starts from the same field set: the
//! [`ModsCommon`] trait supplies accessors over it, and [`base_fields`] hands
//! its descriptors to schemas that extend it.

use once_cell::sync::Lazy;

use super::{
    Field, FieldInfo, NodeField, NodeListField, Schema, SimpleBooleanField, StringField, XmlObject,
};

pub const MODS_NS: &str = "http://www.loc.gov/mods/v3";
pub(crate) const NS: super::Namespaces = &[("mods", MODS_NS)];

// ---------------------------------------------------------------------------
// Component nodes
// ---------------------------------------------------------------------------

struct TitleInfoMap {
    title: StringField,
    subtitle: StringField,
    part_number: StringField,
    part_name: StringField,
    non_sort: StringField,
    title_type: StringField,
    label: StringField,
    schema: Schema,
}

static TITLE_INFO: Lazy<TitleInfoMap> = Lazy::new(|| {
    let title = StringField::new("title", "mods:title", NS);
    let subtitle = StringField::new("subtitle", "mods:subTitle", NS);
    let part_number = StringField::new("part_number", "mods:partNumber", NS);
    let part_name = StringField::new("part_name", "mods:partName", NS);
    let non_sort = StringField::new("non_sort", "mods:nonSort", NS);
    let title_type = StringField::new("type", "@type", NS);
    let label = StringField::new("label", "@displayLabel", NS);
    let schema = Schema::new("TitleInfo", "titleInfo", NS).with_fields([
        title.info().clone(),
        subtitle.info().clone(),
        part_number.info().clone(),
        part_name.info().clone(),
        non_sort.info().clone(),
        title_type.info().clone(),
        label.info().clone(),
    ]);
    TitleInfoMap {
        title,
        subtitle,
        part_number,
        part_name,
        non_sort,
        title_type,
        label,
        schema,
    }
});

xml_object!(TitleInfo => &TITLE_INFO.schema);

impl TitleInfo {
    string_accessors!(pub TITLE_INFO:
        title / set_title,
        subtitle / set_subtitle,
        part_number / set_part_number,
        part_name / set_part_name,
        non_sort / set_non_sort,
        title_type / set_title_type,
        label / set_label,
    );
}

struct NamePartMap {
    part_type: StringField,
    text: StringField,
    schema: Schema,
}

static NAME_PART: Lazy<NamePartMap> = Lazy::new(|| {
    let part_type = StringField::new("type", "@type", NS);
    let text = StringField::new("text", "text()", NS);
    let schema = Schema::new("NamePart", "namePart", NS)
        .with_fields([part_type.info().clone(), text.info().clone()]);
    NamePartMap {
        part_type,
        text,
        schema,
    }
});

xml_object!(NamePart => &NAME_PART.schema);

impl NamePart {
    string_accessors!(pub NAME_PART: part_type / set_part_type, text / set_text);
}

struct RoleMap {
    text: StringField,
    role_type: StringField,
    authority: StringField,
    schema: Schema,
}

static ROLE: Lazy<RoleMap> = Lazy::new(|| {
    let text = StringField::new("text", "mods:roleTerm", NS);
    let role_type = StringField::new("type", "mods:roleTerm/@type", NS);
    let authority = StringField::new("authority", "mods:roleTerm/@authority", NS);
    let schema = Schema::new("Role", "role", NS).with_fields([
        text.info().clone(),
        role_type.info().clone(),
        authority.info().clone(),
    ]);
    RoleMap {
        text,
        role_type,
        authority,
        schema,
    }
});

xml_object!(Role => &ROLE.schema);

impl Role {
    string_accessors!(pub ROLE:
        text / set_text,
        role_type / set_role_type,
        authority / set_authority,
    );
}

struct NameMap {
    name_type: StringField,
    authority: StringField,
    id: StringField,
    name_parts: NodeListField<NamePart>,
    display_form: StringField,
    affiliation: StringField,
    roles: NodeListField<Role>,
    schema: Schema,
}

static NAME: Lazy<NameMap> = Lazy::new(|| {
    let name_type = StringField::new("type", "@type", NS);
    let authority = StringField::new("authority", "@authority", NS);
    let id = StringField::new("id", "@ID", NS);
    let name_parts = NodeListField::new("name_parts", "mods:namePart", NS);
    let display_form = StringField::new("display_form", "mods:displayForm", NS);
    let affiliation = StringField::new("affiliation", "mods:affiliation", NS);
    let roles = NodeListField::new("roles", "mods:role", NS);
    let schema = Schema::new("Name", "name", NS).with_fields([
        name_type.info().clone(),
        authority.info().clone(),
        id.info().clone(),
        name_parts.info().clone(),
        display_form.info().clone(),
        affiliation.info().clone(),
        roles.info().clone(),
    ]);
    NameMap {
        name_type,
        authority,
        id,
        name_parts,
        display_form,
        affiliation,
        roles,
        schema,
    }
});

xml_object!(
    /// A personal, corporate or conference name with its parts and roles.
    Name => &NAME.schema
);

impl Name {
    string_accessors!(pub NAME:
        name_type / set_name_type,
        authority / set_authority,
        id / set_id,
        display_form / set_display_form,
        affiliation / set_affiliation,
    );
    list_accessors!(pub NAME:
        name_parts / set_name_parts / push_name_part: NamePart,
        roles / set_roles / push_role: Role,
    );
}

struct GenreMap {
    authority: StringField,
    text: StringField,
    schema: Schema,
}

static GENRE: Lazy<GenreMap> = Lazy::new(|| {
    let authority = StringField::new("authority", "@authority", NS);
    let text = StringField::new("text", "text()", NS);
    let schema =
        Schema::new("Genre", "genre", NS).with_fields([authority.info().clone(), text.info().clone()]);
    GenreMap {
        authority,
        text,
        schema,
    }
});

xml_object!(Genre => &GENRE.schema);

impl Genre {
    string_accessors!(pub GENRE: authority / set_authority, text / set_text);
}

struct DateMap {
    date: StringField,
    key_date: SimpleBooleanField,
    encoding: StringField,
    point: StringField,
    qualifier: StringField,
    schema: Schema,
}

static DATE: Lazy<DateMap> = Lazy::new(|| {
    let date = StringField::new("date", "text()", NS);
    let key_date = SimpleBooleanField::new("key_date", "@keyDate", NS, "yes", None);
    let encoding = StringField::new("encoding", "@encoding", NS);
    let point = StringField::new("point", "@point", NS);
    let qualifier = StringField::new("qualifier", "@qualifier", NS);
    let schema = Schema::new("Date", "dateCreated", NS).with_fields([
        date.info().clone(),
        key_date.info().clone(),
        encoding.info().clone(),
        point.info().clone(),
        qualifier.info().clone(),
    ]);
    DateMap {
        date,
        key_date,
        encoding,
        point,
        qualifier,
        schema,
    }
});

xml_object!(
    /// Any MODS date element; the element name comes from the field it sits in.
    ModsDate => &DATE.schema
);

impl ModsDate {
    string_accessors!(pub DATE:
        date / set_date,
        encoding / set_encoding,
        point / set_point,
        qualifier / set_qualifier,
    );

    pub fn key_date(&self) -> bool {
        DATE.key_date.get(&self.node)
    }

    pub fn set_key_date(&mut self, key_date: bool) -> crate::error::Result<()> {
        DATE.key_date.set(&mut self.node, key_date)
    }
}

struct OriginInfoMap {
    created: NodeListField<ModsDate>,
    issued: NodeListField<ModsDate>,
    publisher: StringField,
    schema: Schema,
}

static ORIGIN_INFO: Lazy<OriginInfoMap> = Lazy::new(|| {
    let created = NodeListField::new("created", "mods:dateCreated", NS);
    let issued = NodeListField::new("issued", "mods:dateIssued", NS);
    let publisher = StringField::new("publisher", "mods:publisher", NS);
    let schema = Schema::new("OriginInfo", "originInfo", NS).with_fields([
        created.info().clone(),
        issued.info().clone(),
        publisher.info().clone(),
    ]);
    OriginInfoMap {
        created,
        issued,
        publisher,
        schema,
    }
});

xml_object!(OriginInfo => &ORIGIN_INFO.schema);

impl OriginInfo {
    string_accessors!(pub ORIGIN_INFO: publisher / set_publisher);
    list_accessors!(pub ORIGIN_INFO:
        created / set_created / push_created: ModsDate,
        issued / set_issued / push_issued: ModsDate,
    );
}

struct LanguageTermMap {
    term_type: StringField,
    authority: StringField,
    text: StringField,
    schema: Schema,
}

static LANGUAGE_TERM: Lazy<LanguageTermMap> = Lazy::new(|| {
    let term_type = StringField::new("type", "@type", NS);
    let authority = StringField::new("authority", "@authority", NS);
    let text = StringField::new("text", "text()", NS);
    let schema = Schema::new("LanguageTerm", "languageTerm", NS).with_fields([
        term_type.info().clone(),
        authority.info().clone(),
        text.info().clone(),
    ]);
    LanguageTermMap {
        term_type,
        authority,
        text,
        schema,
    }
});

xml_object!(LanguageTerm => &LANGUAGE_TERM.schema);

impl LanguageTerm {
    string_accessors!(pub LANGUAGE_TERM:
        term_type / set_term_type,
        authority / set_authority,
        text / set_text,
    );
}

struct LanguageMap {
    terms: NodeListField<LanguageTerm>,
    schema: Schema,
}

static LANGUAGE: Lazy<LanguageMap> = Lazy::new(|| {
    let terms = NodeListField::new("terms", "mods:languageTerm", NS);
    let schema = Schema::new("Language", "language", NS).with_fields([terms.info().clone()]);
    LanguageMap { terms, schema }
});

xml_object!(Language => &LANGUAGE.schema);

impl Language {
    list_accessors!(pub LANGUAGE: terms / set_terms / push_term: LanguageTerm);
}

struct PhysicalDescriptionMap {
    media_type: StringField,
    extent: StringField,
    digital_origin: StringField,
    schema: Schema,
}

static PHYSICAL_DESCRIPTION: Lazy<PhysicalDescriptionMap> = Lazy::new(|| {
    let media_type = StringField::new("media_type", "mods:internetMediaType", NS);
    let extent = StringField::new("extent", "mods:extent", NS);
    let digital_origin = StringField::new("digital_origin", "mods:digitalOrigin", NS);
    let schema = Schema::new("PhysicalDescription", "physicalDescription", NS).with_fields([
        media_type.info().clone(),
        extent.info().clone(),
        digital_origin.info().clone(),
    ]);
    PhysicalDescriptionMap {
        media_type,
        extent,
        digital_origin,
        schema,
    }
});

xml_object!(PhysicalDescription => &PHYSICAL_DESCRIPTION.schema);

impl PhysicalDescription {
    string_accessors!(pub PHYSICAL_DESCRIPTION:
        media_type / set_media_type,
        extent / set_extent,
        digital_origin / set_digital_origin,
    );
}

/// Attribute-qualified text elements: abstract, note, identifier and
/// access condition all share the `@type` / `@displayLabel` / text shape.
struct TypedTextMap {
    text_type: StringField,
    label: StringField,
    text: StringField,
}

impl TypedTextMap {
    fn new() -> Self {
        Self {
            text_type: StringField::new("type", "@type", NS),
            label: StringField::new("label", "@displayLabel", NS),
            text: StringField::new("text", "text()", NS),
        }
    }

    fn schema(&self, name: &'static str, root: &'static str) -> Schema {
        Schema::new(name, root, NS).with_fields([
            self.text_type.info().clone(),
            self.label.info().clone(),
            self.text.info().clone(),
        ])
    }
}

macro_rules! typed_text_node {
    ($(#[$meta:meta])* $name:ident, $map:ident, $schema_name:literal, $root:literal) => {
        static $map: Lazy<(TypedTextMap, Schema)> = Lazy::new(|| {
            let map = TypedTextMap::new();
            let schema = map.schema($schema_name, $root);
            (map, schema)
        });

        xml_object!($(#[$meta])* $name => &$map.1);

        impl $name {
            pub fn text_type(&self) -> Option<String> {
                $map.0.text_type.get(&self.node)
            }

            pub fn set_text_type(&mut self, value: Option<&str>) -> crate::error::Result<()> {
                $map.0.text_type.set(&mut self.node, value)
            }

            pub fn label(&self) -> Option<String> {
                $map.0.label.get(&self.node)
            }

            pub fn set_label(&mut self, value: Option<&str>) -> crate::error::Result<()> {
                $map.0.label.set(&mut self.node, value)
            }

            pub fn text(&self) -> Option<String> {
                $map.0.text.get(&self.node)
            }

            pub fn set_text(&mut self, value: Option<&str>) -> crate::error::Result<()> {
                $map.0.text.set(&mut self.node, value)
            }
        }
    };
}

typed_text_node!(Abstract, ABSTRACT, "Abstract", "abstract");
typed_text_node!(Note, NOTE, "Note", "note");
typed_text_node!(Identifier, IDENTIFIER, "Identifier", "identifier");
typed_text_node!(
    /// `mods:accessCondition`; the type distinguishes access restrictions
    /// from use and reproduction terms.
    AccessCondition,
    ACCESS_CONDITION,
    "AccessCondition",
    "accessCondition"
);

struct SubjectMap {
    authority: StringField,
    id: StringField,
    geographic: StringField,
    name: NodeField<Name>,
    topic: StringField,
    title: StringField,
    schema: Schema,
}

static SUBJECT: Lazy<SubjectMap> = Lazy::new(|| {
    let authority = StringField::new("authority", "@authority", NS);
    let id = StringField::new("id", "@ID", NS);
    let geographic = StringField::new("geographic", "mods:geographic", NS);
    let name = NodeField::new("name", "mods:name", NS);
    let topic = StringField::new("topic", "mods:topic", NS);
    let title = StringField::new("title", "mods:titleInfo/mods:title", NS);
    let schema = Schema::new("Subject", "subject", NS).with_fields([
        authority.info().clone(),
        id.info().clone(),
        geographic.info().clone(),
        name.info().clone(),
        topic.info().clone(),
        title.info().clone(),
    ]);
    SubjectMap {
        authority,
        id,
        geographic,
        name,
        topic,
        title,
        schema,
    }
});

xml_object!(Subject => &SUBJECT.schema);

impl Subject {
    string_accessors!(pub SUBJECT:
        authority / set_authority,
        id / set_id,
        geographic / set_geographic,
        topic / set_topic,
        title / set_title,
    );
    node_accessors!(pub SUBJECT: name / set_name: Name);
}

struct LocationMap {
    physical: StringField,
    url: StringField,
    schema: Schema,
}

static LOCATION: Lazy<LocationMap> = Lazy::new(|| {
    let physical = StringField::new("physical", "mods:physicalLocation", NS);
    let url = StringField::new("url", "mods:url", NS);
    let schema = Schema::new("Location", "location", NS)
        .with_fields([physical.info().clone(), url.info().clone()]);
    LocationMap {
        physical,
        url,
        schema,
    }
});

xml_object!(Location => &LOCATION.schema);

impl Location {
    string_accessors!(pub LOCATION: physical / set_physical, url / set_url);
}

// ---------------------------------------------------------------------------
// Base document fields
// ---------------------------------------------------------------------------

pub(crate) struct BaseMap {
    id: StringField,
    title: StringField,
    title_info: NodeField<TitleInfo>,
    title_info_list: NodeListField<TitleInfo>,
    resource_type: StringField,
    names: NodeListField<Name>,
    genres: NodeListField<Genre>,
    origin_info: NodeField<OriginInfo>,
    languages: NodeListField<Language>,
    physical_description: NodeField<PhysicalDescription>,
    mods_abstract: NodeField<Abstract>,
    notes: NodeListField<Note>,
    subjects: NodeListField<Subject>,
    identifiers: NodeListField<Identifier>,
    access_conditions: NodeListField<AccessCondition>,
    locations: NodeListField<Location>,
    related_items: NodeListField<RelatedItem>,
}

impl BaseMap {
    fn infos(&self) -> Vec<FieldInfo> {
        vec![
            self.id.info().clone(),
            self.title.info().clone(),
            self.title_info.info().clone(),
            self.title_info_list.info().clone(),
            self.resource_type.info().clone(),
            self.names.info().clone(),
            self.genres.info().clone(),
            self.origin_info.info().clone(),
            self.languages.info().clone(),
            self.physical_description.info().clone(),
            self.mods_abstract.info().clone(),
            self.notes.info().clone(),
            self.subjects.info().clone(),
            self.identifiers.info().clone(),
            self.access_conditions.info().clone(),
            self.locations.info().clone(),
            self.related_items.info().clone(),
        ]
    }
}

pub(crate) static BASE: Lazy<BaseMap> = Lazy::new(|| BaseMap {
    id: StringField::new("id", "@ID", NS),
    title: StringField::new("title", "mods:titleInfo/mods:title", NS),
    title_info: NodeField::new("title_info", "mods:titleInfo", NS),
    title_info_list: NodeListField::new("title_info_list", "mods:titleInfo", NS),
    resource_type: StringField::new("resource_type", "mods:typeOfResource", NS),
    names: NodeListField::new("names", "mods:name", NS),
    genres: NodeListField::new("genres", "mods:genre", NS),
    origin_info: NodeField::new("origin_info", "mods:originInfo", NS),
    languages: NodeListField::new("languages", "mods:language", NS),
    physical_description: NodeField::new("physical_description", "mods:physicalDescription", NS),
    mods_abstract: NodeField::new("abstract", "mods:abstract", NS),
    notes: NodeListField::new("notes", "mods:note", NS),
    subjects: NodeListField::new("subjects", "mods:subject", NS),
    identifiers: NodeListField::new("identifiers", "mods:identifier", NS),
    access_conditions: NodeListField::new("access_conditions", "mods:accessCondition", NS),
    locations: NodeListField::new("locations", "mods:location", NS),
    related_items: NodeListField::new("related_items", "mods:relatedItem", NS),
});

/// Field descriptors shared by every MODS-shaped schema.
pub fn base_fields() -> Vec<FieldInfo> {
    BASE.infos()
}

/// Accessors for the base MODS field set, available on every MODS variant
/// and on related items.
pub trait ModsCommon: XmlObject {
    string_accessors!(BASE:
        id / set_id,
        title / set_title,
        resource_type / set_resource_type,
    );
    node_accessors!(BASE:
        title_info / set_title_info: TitleInfo,
        origin_info / set_origin_info: OriginInfo,
        physical_description / set_physical_description: PhysicalDescription,
        mods_abstract / set_mods_abstract: Abstract,
    );
    list_accessors!(BASE:
        title_info_list / set_title_info_list / push_title_info: TitleInfo,
        names / set_names / push_name: Name,
        genres / set_genres / push_genre: Genre,
        languages / set_languages / push_language: Language,
        notes / set_notes / push_note: Note,
        subjects / set_subjects / push_subject: Subject,
        identifiers / set_identifiers / push_identifier: Identifier,
        access_conditions / set_access_conditions / push_access_condition: AccessCondition,
        locations / set_locations / push_location: Location,
        related_items / set_related_items / push_related_item: RelatedItem,
    );
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

static MODS: Lazy<Schema> = Lazy::new(|| Schema::new("MODS", "mods", NS).with_fields(base_fields()));

xml_object!(
    /// A plain `mods:mods` record.
    Mods => &MODS
);

impl ModsCommon for Mods {}

pub(crate) struct RelatedItemMap {
    pub(crate) related_type: StringField,
    pub(crate) label: StringField,
}

pub(crate) static RELATED: Lazy<RelatedItemMap> = Lazy::new(|| RelatedItemMap {
    related_type: StringField::new("type", "@type", NS),
    label: StringField::new("label", "@displayLabel", NS),
});

/// Base fields plus the related-item qualifiers.
pub(crate) fn related_item_fields() -> Vec<FieldInfo> {
    let mut fields = base_fields();
    fields.push(RELATED.related_type.info().clone());
    fields.push(RELATED.label.info().clone());
    fields
}

/// `@type` and `@displayLabel` on a `mods:relatedItem`.
pub trait RelatedItemFields: ModsCommon {
    string_accessors!(RELATED: related_type / set_related_type, label / set_label);
}

static RELATED_ITEM: Lazy<Schema> =
    Lazy::new(|| Schema::new("RelatedItem", "relatedItem", NS).with_fields(related_item_fields()));

xml_object!(RelatedItem => &RELATED_ITEM);

impl ModsCommon for RelatedItem {}
impl RelatedItemFields for RelatedItem {}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"<mods:mods xmlns:mods="http://www.loc.gov/mods/v3" ID="rec1">
        <mods:titleInfo><mods:nonSort>The</mods:nonSort><mods:title>Satanic Verses drafts</mods:title></mods:titleInfo>
        <mods:typeOfResource>mixed material</mods:typeOfResource>
        <mods:name type="personal" authority="naf">
            <mods:namePart>Rushdie, Salman</mods:namePart>
            <mods:role><mods:roleTerm type="text" authority="marcrelator">creator</mods:roleTerm></mods:role>
        </mods:name>
        <mods:originInfo>
            <mods:dateCreated encoding="w3cdtf" point="start" keyDate="yes">1984</mods:dateCreated>
            <mods:dateCreated encoding="w3cdtf" point="end">1988</mods:dateCreated>
        </mods:originInfo>
        <mods:note type="general">first</mods:note>
        <mods:note>second</mods:note>
        <mods:relatedItem type="host" displayLabel="Collection"><mods:titleInfo><mods:title>Papers</mods:title></mods:titleInfo></mods:relatedItem>
    </mods:mods>"#;

    #[test]
    fn test_base_fields_read() {
        let mods = Mods::from_xml(RECORD).unwrap();
        assert_eq!(mods.id().as_deref(), Some("rec1"));
        assert_eq!(mods.title().as_deref(), Some("Satanic Verses drafts"));
        assert_eq!(mods.title_info().and_then(|t| t.non_sort()).as_deref(), Some("The"));
        assert_eq!(mods.resource_type().as_deref(), Some("mixed material"));

        let names = mods.names();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].name_type().as_deref(), Some("personal"));
        assert_eq!(names[0].name_parts()[0].text().as_deref(), Some("Rushdie, Salman"));
        assert_eq!(names[0].roles()[0].text().as_deref(), Some("creator"));
        assert_eq!(names[0].roles()[0].authority().as_deref(), Some("marcrelator"));

        let created = mods.origin_info().map(|o| o.created()).unwrap_or_default();
        assert_eq!(created.len(), 2);
        assert!(created[0].key_date());
        assert!(!created[1].key_date());
        assert_eq!(created[1].point().as_deref(), Some("end"));

        let notes: Vec<_> = mods.notes().iter().filter_map(|n| n.text()).collect();
        assert_eq!(notes, vec!["first", "second"]);

        let related = &mods.related_items()[0];
        assert_eq!(related.related_type().as_deref(), Some("host"));
        assert_eq!(related.label().as_deref(), Some("Collection"));
        assert_eq!(related.title().as_deref(), Some("Papers"));
    }

    #[test]
    fn test_build_record_from_scratch() {
        let mut mods = Mods::new();
        mods.set_title(Some("Mailbox 1")).unwrap();
        let mut date = ModsDate::new();
        date.set_date(Some("1995")).unwrap();
        date.set_key_date(true).unwrap();
        let mut origin = OriginInfo::new();
        origin.push_created(date).unwrap();
        mods.set_origin_info(Some(origin)).unwrap();

        let xml = mods.to_xml().unwrap();
        assert!(xml.contains("<mods:title>Mailbox 1</mods:title>"), "{}", xml);
        assert!(xml.contains(r#"<mods:dateCreated keyDate="yes">1995</mods:dateCreated>"#), "{}", xml);

        let reparsed = Mods::from_xml(&xml).unwrap();
        assert_eq!(reparsed.title().as_deref(), Some("Mailbox 1"));
        let created = reparsed.origin_info().map(|o| o.created()).unwrap_or_default();
        assert_eq!(created.len(), 1);
        assert!(created[0].key_date());
    }

    #[test]
    fn test_list_write_back_keeps_order() {
        let mut mods = Mods::from_xml(RECORD).unwrap();
        let mut notes = mods.notes();
        notes.reverse();
        mods.set_notes(notes).unwrap();
        let mut third = Note::new();
        third.set_text(Some("third")).unwrap();
        mods.push_note(third).unwrap();

        let reparsed = Mods::from_xml(&mods.to_xml().unwrap()).unwrap();
        let notes: Vec<_> = reparsed.notes().iter().filter_map(|n| n.text()).collect();
        assert_eq!(notes, vec!["second", "first", "third"]);
        // untouched content survives
        assert_eq!(reparsed.names().len(), 1);
    }

    #[test]
    fn test_related_item_schema_extends_base() {
        let schema = RelatedItem::schema();
        assert!(schema.field("title").is_some());
        assert!(schema.field("type").is_some());
        assert!(Mods::schema().field("type").is_none());
    }
}
