use crate::models::boda::EMAIL_MESSAGE_CMODEL;
use crate::models::datastream::{DatastreamKind, DatastreamSpec};
use crate::models::object::DigitalObject;
use crate::models::ContentModel;
use crate::validation::{ValidationError, ValidationRule, SEVERITY_ERROR, SEVERITY_WARNING};
use crate::xmlmap::dom::{self, Element};
use crate::xmlmap::filetech::FileMasterTech;
use crate::xmlmap::XmlObject;

/// Stored XML datastreams of `model` that parse, with their root element.
fn parsed_xml(
    object: &DigitalObject,
    model: &ContentModel,
) -> Vec<(&'static DatastreamSpec, Result<Element, String>)> {
    model
        .datastreams()
        .into_iter()
        .filter(|spec| spec.is_xml())
        .filter_map(|spec| {
            let stored = object.datastream(spec.id)?;
            let parsed = std::str::from_utf8(&stored.content)
                .map_err(|err| err.to_string())
                .and_then(|xml| dom::parse(xml).map_err(|err| err.to_string()));
            Some((spec, parsed))
        })
        .collect()
}

// =========================================================================
// RULE: CM-001
// "Object declares every content model of the model it is checked against"
// =========================================================================
pub struct RuleCm001;

impl ValidationRule for RuleCm001 {
    fn rule_id(&self) -> &str { "CM-001" }

    fn check(&self, object: &DigitalObject, model: &ContentModel) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for cmodel in model.content_models() {
            if !object.has_model(cmodel) {
                errors.push(ValidationError {
                    code: self.rule_id().to_string(),
                    severity: SEVERITY_ERROR.to_string(),
                    message: format!("{} does not declare content model {}", object.pid, cmodel),
                    target_id: None,
                });
            }
        }
        errors
    }
}

// =========================================================================
// RULE: DS-001
// "XML datastreams are well-formed and carry the declared root element"
// =========================================================================
pub struct RuleDs001;

impl ValidationRule for RuleDs001 {
    fn rule_id(&self) -> &str { "DS-001" }

    fn check(&self, object: &DigitalObject, model: &ContentModel) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (spec, parsed) in parsed_xml(object, model) {
            let DatastreamKind::Xml { root_ns, root_name, .. } = spec.kind else {
                continue;
            };
            let message = match parsed {
                Err(reason) => format!("{} is not well-formed XML: {}", spec.id, reason),
                Ok(root) if !root.is(Some(root_ns), root_name) => format!(
                    "{} has root {}, expected {{{}}}{}",
                    spec.id,
                    root.qualified_name(),
                    root_ns,
                    root_name
                ),
                Ok(_) => continue,
            };
            errors.push(ValidationError {
                code: self.rule_id().to_string(),
                severity: SEVERITY_ERROR.to_string(),
                message,
                target_id: Some(spec.id.to_string()),
            });
        }
        errors
    }
}

// =========================================================================
// RULE: DS-002
// "Mapped XML datastreams have their required fields and coercible values"
// =========================================================================
pub struct RuleDs002;

impl ValidationRule for RuleDs002 {
    fn rule_id(&self) -> &str { "DS-002" }

    fn check(&self, object: &DigitalObject, model: &ContentModel) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (spec, parsed) in parsed_xml(object, model) {
            // malformed content is DS-001's finding
            let (Ok(root), DatastreamKind::Xml { schema: Some(schema), .. }) = (parsed, spec.kind)
            else {
                continue;
            };
            let schema = schema();
            if schema.check_root(&root).is_err() {
                continue;
            }
            for field_error in schema.validate(&root) {
                errors.push(ValidationError {
                    code: self.rule_id().to_string(),
                    severity: SEVERITY_ERROR.to_string(),
                    message: format!("{}: {}", spec.id, field_error.message),
                    target_id: Some(format!("{}.{}", spec.id, field_error.field)),
                });
            }
        }
        errors
    }
}

// =========================================================================
// RULE: DS-003
// "File datastreams carry a MIME type compatible with their declaration"
// A declared type ending in '/' accepts any subtype of that family.
// =========================================================================
pub struct RuleDs003;

impl ValidationRule for RuleDs003 {
    fn rule_id(&self) -> &str { "DS-003" }

    fn check(&self, object: &DigitalObject, model: &ContentModel) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for spec in model.datastreams() {
            let DatastreamKind::File { mimetype: declared } = spec.kind else {
                continue;
            };
            let Some(stored) = object.datastream(spec.id) else {
                continue;
            };
            let actual = stored.mimetype.to_ascii_lowercase();
            let compatible = if declared.ends_with('/') {
                actual.starts_with(declared)
            } else {
                actual == declared
            };
            if !compatible {
                errors.push(ValidationError {
                    code: self.rule_id().to_string(),
                    severity: SEVERITY_WARNING.to_string(),
                    message: format!(
                        "{} has MIME type '{}', declared '{}'",
                        spec.id, stored.mimetype, declared
                    ),
                    target_id: Some(spec.id.to_string()),
                });
            }
        }
        errors
    }
}

// =========================================================================
// RULE: FMT-001
// "FileMasterTech paths are absolute"
// =========================================================================
pub struct RuleFmt001;

impl ValidationRule for RuleFmt001 {
    fn rule_id(&self) -> &str { "FMT-001" }

    fn check(&self, object: &DigitalObject, model: &ContentModel) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let Some(spec) = model.datastream("FileMasterTech") else {
            return errors;
        };
        let Some(stored) = object.datastream(spec.id) else {
            return errors;
        };
        let Ok(filetech) = FileMasterTech::from_bytes(&stored.content) else {
            return errors;
        };
        for (idx, file) in filetech.files().iter().enumerate() {
            let Some(path) = file.path() else { continue };
            if !path.starts_with('/') {
                errors.push(ValidationError {
                    code: self.rule_id().to_string(),
                    severity: SEVERITY_ERROR.to_string(),
                    message: format!("File path '{}' is not absolute", path),
                    target_id: Some(format!("FileMasterTech.file[{}].path", idx)),
                });
            }
        }
        errors
    }
}

// =========================================================================
// RULE: EM-001
// "An email message with MIME content has a CERP rendition"
// =========================================================================
pub struct RuleEm001;

impl ValidationRule for RuleEm001 {
    fn rule_id(&self) -> &str { "EM-001" }

    fn check(&self, object: &DigitalObject, model: &ContentModel) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !model.content_models().contains(&EMAIL_MESSAGE_CMODEL) {
            return errors;
        }
        let has_mime = object.datastream("MIME").is_some_and(|ds| !ds.content.is_empty());
        if has_mime && object.datastream("CERP").is_none() {
            errors.push(ValidationError {
                code: self.rule_id().to_string(),
                severity: SEVERITY_WARNING.to_string(),
                message: "MIME content present but CERP has not been generated".to_string(),
                target_id: Some("CERP".to_string()),
            });
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::boda::{
        Arrangement, EmailMessage, RushdieFile, ARRANGEMENT_MODEL, EMAIL_MESSAGE_MODEL,
        RUSHDIE_FILE_MODEL,
    };
    use crate::models::collection::v1_1::{self, Collection};
    use crate::models::RepositoryObject;
    use crate::xmlmap::filetech::FileMasterTechBase;

    fn codes(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.code.as_str()).collect()
    }

    #[test]
    fn test_missing_content_model_is_reported() {
        let object = DigitalObject::new("emory:bare");
        let errors = RuleCm001.check(&object, &ARRANGEMENT_MODEL);
        assert_eq!(codes(&errors), vec!["CM-001"]);

        let arrangement = Arrangement::new_object("emory:arr");
        assert!(RuleCm001.check(arrangement.object(), &ARRANGEMENT_MODEL).is_empty());
    }

    #[test]
    fn test_wrong_root_and_malformed_xml() {
        let mut arrangement = Arrangement::new_object("emory:arr");
        let rights = ARRANGEMENT_MODEL.datastream("Rights").unwrap();
        let mods = ARRANGEMENT_MODEL.datastream("MODS").unwrap();
        arrangement
            .object_mut()
            .put_datastream(rights, b"<other/>".to_vec(), "text/xml");
        arrangement
            .object_mut()
            .put_datastream(mods, b"<mods:mods".to_vec(), "text/xml");

        let errors = RuleDs001.check(arrangement.object(), &ARRANGEMENT_MODEL);
        assert_eq!(errors.len(), 2);
        let targets: Vec<_> = errors.iter().filter_map(|e| e.target_id.as_deref()).collect();
        assert!(targets.contains(&"Rights"));
        assert!(targets.contains(&"MODS"));
    }

    #[test]
    fn test_uncoercible_integer_field() {
        let mut collection = Collection::new_object("emory:coll");
        let spec = v1_1::COLLECTION_MODEL.datastream("MODS").unwrap();
        let xml = br#"<mods:mods xmlns:mods="http://www.loc.gov/mods/v3"><mods:identifier type="local_source_id">abc</mods:identifier></mods:mods>"#;
        collection.object_mut().put_datastream(spec, xml.to_vec(), "text/xml");

        let errors = RuleDs002.check(collection.object(), &v1_1::COLLECTION_MODEL);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].target_id.as_deref(), Some("MODS.source_id"));
    }

    #[test]
    fn test_file_mimetype_families() {
        let mut file = RushdieFile::new_object("emory:file");
        file.original.set_content(b"data".to_vec());
        file.original.set_mimetype("application/msword");
        file.pdf.set_content(b"%PDF".to_vec());
        file.pdf.set_mimetype("image/png");
        file.flush().unwrap();

        let errors = RuleDs003.check(file.object(), &RUSHDIE_FILE_MODEL);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].target_id.as_deref(), Some("PDF"));
        assert!(!errors[0].is_error());
    }

    #[test]
    fn test_relative_filetech_path() {
        let mut arrangement = Arrangement::new_object("emory:arr");
        let mut good = FileMasterTechBase::new();
        good.set_path(Some("/Hard Disk/letters/draft")).unwrap();
        let mut bad = FileMasterTechBase::new();
        bad.set_path(Some("letters/draft")).unwrap();
        {
            let filetech = arrangement.filetech.content_mut().unwrap();
            filetech.push_file(good).unwrap();
            filetech.push_file(bad).unwrap();
        }
        arrangement.flush().unwrap();

        let errors = RuleFmt001.check(arrangement.object(), &ARRANGEMENT_MODEL);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].target_id.as_deref(), Some("FileMasterTech.file[1].path"));
    }

    #[test]
    fn test_missing_cerp_rendition() {
        let mut message = EmailMessage::new_object("emory:msg");
        message.mime.set_content(b"Subject: hi\r\n\r\nbody\r\n".to_vec());
        message.flush().unwrap();
        let errors = RuleEm001.check(message.object(), &EMAIL_MESSAGE_MODEL);
        assert_eq!(codes(&errors), vec!["EM-001"]);

        message.update_cerp().unwrap();
        message.flush().unwrap();
        assert!(RuleEm001.check(message.object(), &EMAIL_MESSAGE_MODEL).is_empty());
    }
}
