use crate::error::Error;
use flate2::read::GzDecoder;
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;
use std::path::Path;

pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read a bundle from disk. Gzip is detected by its magic bytes, plain JSON is accepted too.
pub fn read_bundle(path: &Path) -> Result<Vec<Map<String, Value>>, Error> {
    let data = fs::read(path)?;
    decode_bundle(&data).map_err(|err| match err {
        Error::Json(json_err) => Error::InvalidBundle {
            path: path.to_path_buf(),
            reason: json_err.to_string(),
        },
        other => other,
    })
}

pub fn decode_bundle(data: &[u8]) -> Result<Vec<Map<String, Value>>, Error> {
    if data.starts_with(&GZIP_MAGIC) {
        let mut json = Vec::new();
        GzDecoder::new(data).read_to_end(&mut json)?;
        Ok(serde_json::from_slice(&json)?)
    } else {
        Ok(serde_json::from_slice(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const BUNDLE: &str = r#"[{"id": "a", "_source_file": "a.yaml"}, {"id": "b", "_source_file": "x/b.yml"}]"#;

    #[test]
    fn test_decode_plain_json() {
        let records = decode_bundle(BUNDLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["_source_file"], "x/b.yml");
    }

    #[test]
    fn test_decode_gzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(BUNDLE.as_bytes()).unwrap();
        let data = encoder.finish().unwrap();
        assert!(data.starts_with(&GZIP_MAGIC));

        let records = decode_bundle(&data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], "a");
    }

    #[test]
    fn test_non_object_elements_rejected() {
        assert!(decode_bundle(b"[1, 2, 3]").is_err());
        assert!(decode_bundle(b"{\"id\": 1}").is_err());
    }

    #[test]
    fn test_read_bundle_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "not json").unwrap();

        match read_bundle(&path) {
            Err(Error::InvalidBundle { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected InvalidBundle, got {:?}", other),
        }
    }
}
