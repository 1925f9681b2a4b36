use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// Recursive directory traversal. Collects every regular file under `root` whose
/// extension is one of `extensions`, grouped by extension in the given order and
/// sorted by file name within each directory, so a fixed tree always enumerates the same way.
pub fn scan_fingerprint_files(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for extension in extensions {
        let before = files.len();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    error!("Error walking {}: {}", root.display(), err);
                    continue;
                }
            };

            if entry.file_type().is_file() && has_extension(entry.path(), extension) {
                files.push(entry.into_path());
            }
        }
        debug!(
            "Found {} .{} files under {}",
            files.len() - before,
            extension,
            root.display()
        );
    }

    files
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy() == extension)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn exts() -> Vec<String> {
        vec!["yaml".to_string(), "yml".to_string()]
    }

    #[test]
    fn test_scan_recurses_and_filters() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("a.yaml"), "id: a").unwrap();
        fs::write(root.join("b.yml"), "id: b").unwrap();
        fs::write(root.join("readme.md"), "# nope").unwrap();
        fs::write(root.join("nested/c.yaml"), "id: c").unwrap();
        fs::write(root.join("nested/deeper/d.yml"), "id: d").unwrap();
        fs::write(root.join("nested/e.YAML"), "id: e").unwrap();

        let files = scan_fingerprint_files(root, &exts());
        let rel: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(rel, vec!["a.yaml", "nested/c.yaml", "b.yml", "nested/deeper/d.yml"]);
    }

    #[test]
    fn test_directory_with_extension_is_skipped() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("looks-like.yaml")).unwrap();
        fs::write(tmp.path().join("looks-like.yaml/real.yaml"), "id: real").unwrap();

        let files = scan_fingerprint_files(tmp.path(), &exts());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("real.yaml"));
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let tmp = tempdir().unwrap();
        let files = scan_fingerprint_files(&tmp.path().join("absent"), &exts());
        assert!(files.is_empty());
    }
}
