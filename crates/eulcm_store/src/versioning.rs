//! Datastream checksums and version history.

use eulcm_core::models::object::{DatastreamVersion, DigitalObject};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Hex SHA-256 digest of datastream content.
pub fn checksum(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Stamps a record for first ingest: object dates, datastream checksums and
/// creation dates. Any version history on the incoming record is dropped.
pub fn prepare_ingest(object: &mut DigitalObject, now: OffsetDateTime) {
    object.created = Some(now);
    object.last_modified = Some(now);
    for ds in object.datastreams.values_mut() {
        ds.checksum = Some(checksum(&ds.content));
        ds.created = Some(now);
        ds.versions.clear();
    }
}

/// Reconciles an incoming record with the stored one.
///
/// History always comes from `previous`. A versionable datastream whose
/// checksum changed pushes its stored content onto that history; a
/// non-versionable one is overwritten. Unchanged datastreams keep their
/// stored creation date.
pub fn apply_modification(previous: &DigitalObject, object: &mut DigitalObject, now: OffsetDateTime) {
    object.created = previous.created;
    object.last_modified = Some(now);

    for (id, ds) in object.datastreams.iter_mut() {
        let digest = checksum(&ds.content);
        match previous.datastreams.get(id) {
            Some(old) if old.checksum.as_deref() == Some(digest.as_str()) => {
                ds.created = old.created;
                ds.versions = old.versions.clone();
            }
            Some(old) => {
                ds.versions = old.versions.clone();
                if ds.versionable {
                    ds.versions.push(DatastreamVersion {
                        created: old.created.unwrap_or(now),
                        checksum: old.checksum.clone(),
                        content: old.content.clone(),
                    });
                }
                ds.created = Some(now);
                tracing::debug!(pid = %previous.pid, datastream = %id, "datastream content changed");
            }
            None => {
                ds.created = Some(now);
                ds.versions.clear();
            }
        }
        ds.checksum = Some(digest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eulcm_core::models::boda::RUSHDIE_FILE_MODEL;
    use time::macros::datetime;

    fn record(original: &[u8], pdf: &[u8]) -> DigitalObject {
        let mut object = DigitalObject::new("emory:v");
        let original_spec = RUSHDIE_FILE_MODEL.datastream("ORIGINAL").unwrap();
        let pdf_spec = RUSHDIE_FILE_MODEL.datastream("PDF").unwrap();
        object.put_datastream(original_spec, original.to_vec(), "application/octet-stream");
        object.put_datastream(pdf_spec, pdf.to_vec(), "application/pdf");
        object
    }

    #[test]
    fn test_checksum_is_hex_sha256() {
        assert_eq!(
            checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_changed_content_keeps_previous_version() {
        let t0 = datetime!(2011-03-01 12:00 UTC);
        let t1 = datetime!(2011-03-02 12:00 UTC);
        let mut stored = record(b"first", b"%PDF-1");
        prepare_ingest(&mut stored, t0);

        let mut incoming = record(b"second", b"%PDF-1");
        apply_modification(&stored, &mut incoming, t1);

        let original = incoming.datastream("ORIGINAL").unwrap();
        assert_eq!(original.versions.len(), 1);
        assert_eq!(original.versions[0].content, b"first");
        assert_eq!(original.versions[0].created, t0);
        assert_eq!(original.created, Some(t1));
        assert_eq!(original.checksum.as_deref(), Some(checksum(b"second").as_str()));

        let pdf = incoming.datastream("PDF").unwrap();
        assert!(pdf.versions.is_empty());
        assert_eq!(pdf.created, Some(t0));
        assert_eq!(incoming.created, Some(t0));
        assert_eq!(incoming.last_modified, Some(t1));
    }
}
