use crate::error::Error;
use crate::progress::ProgressReporter;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Compact JSON with a space after every `,` and `:`, no indentation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize `value` with [`SpacedFormatter`]. Non-ASCII text is written as-is.
pub fn to_writer_spaced<W, T>(writer: W, value: &T) -> Result<(), Error>
where
    W: Write,
    T: ?Sized + Serialize,
{
    let mut ser = serde_json::Serializer::with_formatter(writer, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(())
}

/// Uncompressed sibling of a bundle path: `x.json.gz` -> `x.json`.
/// A path without a `.gz` suffix gets `.tmp` appended so the two never collide.
pub fn temp_json_path(output_path: &Path) -> PathBuf {
    let name = output_path.as_os_str().to_string_lossy();
    match name.strip_suffix(".gz") {
        Some(stripped) if !stripped.is_empty() => PathBuf::from(stripped),
        _ => {
            let mut name = OsString::from(output_path.as_os_str());
            name.push(".tmp");
            PathBuf::from(name)
        }
    }
}

/// In-progress sibling of a bundle path: `x.json.gz` -> `x.json.gz.part`.
fn partial_path(output_path: &Path) -> PathBuf {
    let mut name = OsString::from(output_path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// Removes the wrapped file when dropped, whether the bundle was finished or not.
struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed {}", self.path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!("Could not remove {}: {}", self.path.display(), err),
        }
    }
}

/// Write `records` as a JSON array next to `output_path`, gzip it into `output_path`
/// and drop the uncompressed copy. The gzip stream is written to a `.part` sibling and
/// renamed into place, so `output_path` never holds a truncated bundle. Returns the
/// compressed size in bytes.
pub fn write_bundle(
    records: &[Map<String, Value>],
    output_path: &Path,
    compression_level: u32,
    reporter: &dyn ProgressReporter,
) -> Result<u64, Error> {
    let json_path = temp_json_path(output_path);
    let temp = TempFile::new(json_path);

    reporter.on_write_start(&temp.path);
    {
        let mut writer = BufWriter::new(File::create(&temp.path)?);
        to_writer_spaced(&mut writer, records)?;
        writer.flush()?;
    }
    debug!(
        "Wrote {} records to {} ({} bytes)",
        records.len(),
        temp.path.display(),
        fs::metadata(&temp.path)?.len()
    );

    reporter.on_compress_start(output_path);
    let partial = TempFile::new(partial_path(output_path));
    compress_file(&temp.path, &partial.path, compression_level)?;
    fs::rename(&partial.path, output_path)?;
    drop(partial);
    drop(temp);

    Ok(fs::metadata(output_path)?.len())
}

fn compress_file(source: &Path, destination: &Path, level: u32) -> Result<(), Error> {
    let mut reader = BufReader::new(File::open(source)?);
    let output = BufWriter::new(File::create(destination)?);
    let mut encoder = GzEncoder::new(output, Compression::new(level.min(9)));
    io::copy(&mut reader, &mut encoder)?;
    let mut output = encoder.finish()?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;
    use serde_json::json;

    #[test]
    fn test_spaced_formatter_layout() {
        let value = json!([{"id": "nginx", "tags": ["web", "proxy"], "n": 1}, {}]);
        let mut out = Vec::new();
        to_writer_spaced(&mut out, &value).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"[{"id": "nginx", "tags": ["web", "proxy"], "n": 1}, {}]"#
        );
    }

    #[test]
    fn test_non_ascii_is_literal() {
        let value = json!({"name": "致远OA", "desc": "Ünïcødé"});
        let mut out = Vec::new();
        to_writer_spaced(&mut out, &value).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("致远OA"));
        assert!(text.contains("Ünïcødé"));
        assert!(!text.contains("\\u"));
    }

    fn records() -> Vec<Map<String, Value>> {
        vec![json!({"id": "nginx", "_source_file": "nginx.yaml"})
            .as_object()
            .cloned()
            .unwrap()]
    }

    #[test]
    fn test_write_bundle_leaves_only_the_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("web.json.gz");

        let size = write_bundle(&records(), &output, 9, &SilentReporter).unwrap();
        assert_eq!(size, fs::metadata(&output).unwrap().len());

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["web.json.gz"]);
    }

    #[test]
    fn test_failed_write_cleans_up_intermediates() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("web.json.gz");
        // A directory in the way makes the final rename fail
        fs::create_dir(&output).unwrap();

        let result = write_bundle(&records(), &output, 9, &SilentReporter);
        assert!(result.is_err());
        assert!(!tmp.path().join("web.json").exists());
        assert!(!tmp.path().join("web.json.gz.part").exists());
        assert!(output.is_dir());
    }

    #[test]
    fn test_unwritable_destination_cleans_up_temp_json() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("missing-dir/web.json.gz");

        let result = write_bundle(&records(), &output, 9, &SilentReporter);
        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!tmp.path().join("missing-dir").exists());
    }

    #[test]
    fn test_temp_json_path() {
        assert_eq!(
            temp_json_path(Path::new("out/fingerprinthub_web.json.gz")),
            PathBuf::from("out/fingerprinthub_web.json")
        );
        assert_eq!(
            temp_json_path(Path::new("out/bundle.json")),
            PathBuf::from("out/bundle.json.tmp")
        );
    }
}
