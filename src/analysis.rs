// Analyzer: persists processed summary records next to the raw download.

use crate::model::SummaryRecord;
use crate::output;
use std::path::{Path, PathBuf};

/// Write `records` to `{accession}_analysis.json` in `out_dir`.
///
/// I/O failures are reported and swallowed so the caller can carry on with
/// the download step. Returns the written path on success.
pub fn save_analysis(records: &[SummaryRecord], accession: &str, out_dir: &Path) -> Option<PathBuf> {
    let path = output::analysis_file(out_dir, accession);
    match output::write_pretty_json(&path, records) {
        Ok(()) => {
            println!("Detailed analysis saved to {}", path.display());
            Some(path)
        }
        Err(e) => {
            println!("Error saving analysis: {:#}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StructureFiles;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(id: &str) -> SummaryRecord {
        SummaryRecord {
            entry_id: Some(id.into()),
            gene: None,
            organism: Some("Homo sapiens".into()),
            sequence_length: 12,
            model_created_date: None,
            latest_version: Some(4),
            structure_files: StructureFiles {
                pdb_url: Some(format!("https://x/{id}.pdb")),
                ..Default::default()
            },
        }
    }

    #[test]
    fn writes_records_as_json_array() {
        let tmp = TempDir::new().unwrap();
        let path = save_analysis(&[record("A"), record("B")], "Q5VSL9", tmp.path()).unwrap();

        assert_eq!(path, tmp.path().join("Q5VSL9_analysis.json"));
        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.as_array().unwrap().len(), 2);
        assert_eq!(saved[1]["Entry ID"], "B");
        assert_eq!(saved[0]["Gene"], json!(null));
        assert_eq!(saved[0]["Structure Files"], json!({"pdbUrl": "https://x/A.pdb"}));
    }

    #[test]
    fn io_failure_is_swallowed() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(save_analysis(&[record("A")], "Q5VSL9", &missing).is_none());
    }
}
