//! Series and subseries descriptions nested inside arrangement MODS.
//!
//! Nesting is fixed at two levels below the record: [`ArrangementMods`]
//! holds a [`Series1`], which holds a [`Series2`], which holds a plain
//! [`SeriesBase`]. `SeriesBase` has no `series` field of its own.

use once_cell::sync::Lazy;

use super::mods::{base_fields, related_item_fields, ModsCommon, RelatedItemFields, NS};
use super::{Field, FieldInfo, NodeField, Schema, StringField};

const SERIES_PATH: &str = "mods:relatedItem[@type='series']";

pub(crate) struct SeriesMap {
    uri: StringField,
    base_ark: StringField,
    full_id: StringField,
    short_id: StringField,
}

pub(crate) static SERIES: Lazy<SeriesMap> = Lazy::new(|| SeriesMap {
    uri: StringField::new("uri", r#"mods:identifier[@type="uri"]"#, NS).verbose_name("URI Identifier"),
    base_ark: StringField::new("base_ark", r#"mods:identifier[@type="base_ark"]"#, NS)
        .verbose_name("base ark target of document"),
    full_id: StringField::new("full_id", r#"mods:identifier[@type="full_id"]"#, NS)
        .verbose_name("full id of this node"),
    short_id: StringField::new("short_id", r#"mods:identifier[@type="short_id"]"#, NS)
        .verbose_name("short id of this node"),
});

fn series_base_fields() -> Vec<FieldInfo> {
    let mut fields = related_item_fields();
    fields.extend([
        SERIES.uri.info().clone(),
        SERIES.base_ark.info().clone(),
        SERIES.full_id.info().clone(),
        SERIES.short_id.info().clone(),
    ]);
    fields
}

/// Identifier shortcuts shared by every series level.
pub trait SeriesFields: RelatedItemFields {
    string_accessors!(SERIES:
        uri / set_uri,
        base_ark / set_base_ark,
        full_id / set_full_id,
        short_id / set_short_id,
    );
}

static SERIES_BASE: Lazy<Schema> =
    Lazy::new(|| Schema::new("Series_Base", "relatedItem", NS).with_fields(series_base_fields()));

xml_object!(
    /// Innermost series level.
    SeriesBase => &SERIES_BASE
);

impl ModsCommon for SeriesBase {}
impl RelatedItemFields for SeriesBase {}
impl SeriesFields for SeriesBase {}

struct Series2Map {
    series: NodeField<SeriesBase>,
    schema: Schema,
}

static SERIES2: Lazy<Series2Map> = Lazy::new(|| {
    let series = NodeField::new("series", SERIES_PATH, NS).help_text("subseries");
    let schema = Schema::new("Series2", "relatedItem", NS)
        .with_fields(series_base_fields())
        .with_fields([series.info().clone()]);
    Series2Map { series, schema }
});

xml_object!(
    /// Subseries.
    Series2 => &SERIES2.schema
);

impl ModsCommon for Series2 {}
impl RelatedItemFields for Series2 {}
impl SeriesFields for Series2 {}

impl Series2 {
    node_accessors!(pub SERIES2: series / set_series: SeriesBase);
}

struct Series1Map {
    series: NodeField<Series2>,
    schema: Schema,
}

static SERIES1: Lazy<Series1Map> = Lazy::new(|| {
    let series = NodeField::new("series", SERIES_PATH, NS).help_text("subseries");
    let schema = Schema::new("Series1", "relatedItem", NS)
        .with_fields(series_base_fields())
        .with_fields([series.info().clone()]);
    Series1Map { series, schema }
});

xml_object!(
    /// Top-level series of an arrangement.
    Series1 => &SERIES1.schema
);

impl ModsCommon for Series1 {}
impl RelatedItemFields for Series1 {}
impl SeriesFields for Series1 {}

impl Series1 {
    node_accessors!(pub SERIES1: series / set_series: Series2);
}

struct ArrangementModsMap {
    series: NodeField<Series1>,
    schema: Schema,
}

static ARRANGEMENT_MODS: Lazy<ArrangementModsMap> = Lazy::new(|| {
    let series = NodeField::new("series", SERIES_PATH, NS).help_text("series");
    let schema = Schema::new("ArrangementMods", "mods", NS)
        .with_fields(base_fields())
        .with_fields([series.info().clone()]);
    ArrangementModsMap { series, schema }
});

xml_object!(
    /// MODS for arrangement objects, with series placement.
    ArrangementMods => &ARRANGEMENT_MODS.schema
);

impl ModsCommon for ArrangementMods {}

impl ArrangementMods {
    node_accessors!(pub ARRANGEMENT_MODS: series / set_series: Series1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmlmap::XmlObject;

    const ARRANGED: &str = r#"<mods:mods xmlns:mods="http://www.loc.gov/mods/v3">
        <mods:titleInfo><mods:title>draft.doc</mods:title></mods:titleInfo>
        <mods:relatedItem type="series">
            <mods:titleInfo><mods:title>Writings by Rushdie</mods:title></mods:titleInfo>
            <mods:identifier type="short_id">Series 2</mods:identifier>
            <mods:identifier type="base_ark">ark:/25593/abc</mods:identifier>
            <mods:relatedItem type="series">
                <mods:titleInfo><mods:title>Fiction</mods:title></mods:titleInfo>
                <mods:identifier type="full_id">Subseries 2.1</mods:identifier>
                <mods:identifier type="uri">http://pid.emory.edu/ark:/25593/abc</mods:identifier>
                <mods:relatedItem type="series">
                    <mods:titleInfo><mods:title>Unpublished</mods:title></mods:titleInfo>
                    <mods:relatedItem type="series">
                        <mods:titleInfo><mods:title>too deep</mods:title></mods:titleInfo>
                    </mods:relatedItem>
                </mods:relatedItem>
            </mods:relatedItem>
        </mods:relatedItem>
    </mods:mods>"#;

    #[test]
    fn test_two_level_series_nesting() {
        let mods = ArrangementMods::from_xml(ARRANGED).unwrap();
        let series = mods.series().expect("series");
        assert_eq!(series.title().as_deref(), Some("Writings by Rushdie"));
        assert_eq!(series.short_id().as_deref(), Some("Series 2"));
        assert_eq!(series.base_ark().as_deref(), Some("ark:/25593/abc"));
        assert_eq!(series.related_type().as_deref(), Some("series"));

        let subseries = series.series().expect("subseries");
        assert_eq!(subseries.title().as_deref(), Some("Fiction"));
        assert_eq!(subseries.full_id().as_deref(), Some("Subseries 2.1"));
        assert_eq!(subseries.uri().as_deref(), Some("http://pid.emory.edu/ark:/25593/abc"));

        let innermost = subseries.series().expect("innermost");
        assert_eq!(innermost.title().as_deref(), Some("Unpublished"));
        // the innermost level only sees a deeper item as a generic related item
        assert_eq!(innermost.related_items().len(), 1);
    }

    #[test]
    fn test_base_level_declares_no_series_field() {
        assert!(SeriesBase::schema().field("series").is_none());
        assert!(SeriesBase::schema().field("short_id").is_some());
        assert!(Series2::schema().field("series").is_some());
        assert!(Series1::schema().field("series").is_some());
        assert!(ArrangementMods::schema().field("series").is_some());
        assert!(ArrangementMods::schema().field("short_id").is_none());
    }

    #[test]
    fn test_set_series_stamps_type() {
        let mut inner = Series2::new();
        inner.set_title(Some("Correspondence")).unwrap();
        let mut series = Series1::new();
        series.set_title(Some("Personal")).unwrap();
        series.set_short_id(Some("Series 1")).unwrap();
        series.set_series(Some(inner)).unwrap();

        let mut mods = ArrangementMods::new();
        mods.set_series(Some(series)).unwrap();
        let xml = mods.to_xml().unwrap();
        assert_eq!(xml.matches(r#"<mods:relatedItem type="series">"#).count(), 2, "{}", xml);

        let reparsed = ArrangementMods::from_xml(&xml).unwrap();
        let series = reparsed.series().unwrap();
        assert_eq!(series.short_id().as_deref(), Some("Series 1"));
        assert_eq!(
            series.series().and_then(|s| s.title()).as_deref(),
            Some("Correspondence")
        );
    }
}
