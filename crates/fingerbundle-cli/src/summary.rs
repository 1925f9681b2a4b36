use fingerbundle_core::RunSummary;
use indicatif::HumanBytes;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Loaded")]
    loaded: usize,
    #[tabled(rename = "Failed")]
    failed: usize,
    #[tabled(rename = "Bundle")]
    bundle: String,
    #[tabled(rename = "Size")]
    size: String,
}

/// Loaded/failed counts per processed category, one row each.
pub fn render_summary(summary: &RunSummary) -> String {
    let rows: Vec<SummaryRow> = summary
        .categories
        .iter()
        .map(|c| SummaryRow {
            category: c.name.clone(),
            loaded: c.loaded,
            failed: c.failed,
            bundle: c
                .output_path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: HumanBytes(c.compressed_bytes).to_string(),
        })
        .collect();

    Table::new(rows).with(Style::psql()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fingerbundle_core::CategoryResult;
    use std::path::PathBuf;
    use std::time::Duration;

    fn result(name: &str, loaded: usize, failed: usize) -> CategoryResult {
        CategoryResult {
            name: name.to_string(),
            source_dir: PathBuf::from(format!("hub/{}-fingerprint", name)),
            output_path: PathBuf::from(format!("out/fingerprinthub_{}.json.gz", name)),
            files_found: loaded + failed,
            loaded,
            failed,
            skipped: 0,
            failures: vec![],
            compressed_bytes: 2048,
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_summary_lists_each_category() {
        let summary = RunSummary {
            categories: vec![result("web", 3120, 4), result("service", 87, 0)],
        };
        let table = render_summary(&summary);
        assert!(table.contains("Category"));
        assert!(table.contains("web"));
        assert!(table.contains("3120"));
        assert!(table.contains("fingerprinthub_service.json.gz"));
    }

    #[test]
    fn test_summary_omits_missing_categories() {
        let summary = RunSummary {
            categories: vec![result("web", 1, 1)],
        };
        let table = render_summary(&summary);
        assert!(!table.contains("service"));
    }
}
