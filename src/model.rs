// Typed views of the AlphaFold DB prediction records.
//
// Every field is optional: the API does not promise to populate any of
// them, and a missing value must never stop an entry from being processed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A value of the wrong JSON type counts as absent instead of failing the
/// whole entry.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// One predicted structure as returned by `/prediction/{accession}`.
/// Unknown fields are ignored; the raw response is persisted separately.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub entry_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub gene: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub organism_scientific_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub uniprot_sequence: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub model_created_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub latest_version: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub cif_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub bcif_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub pdb_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub pae_image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub pae_doc_url: Option<String>,
}

/// Entries parsed from one models response. `skipped` counts items that
/// were not JSON objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelBatch {
    pub entries: Vec<ModelEntry>,
    pub skipped: usize,
}

/// The downloadable artifacts a model entry can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Cif,
    Bcif,
    Pdb,
    PaeImage,
    PaeDoc,
}

impl FileKind {
    /// Every kind, in download order.
    pub const ALL: [FileKind; 5] = [
        FileKind::Cif,
        FileKind::Bcif,
        FileKind::Pdb,
        FileKind::PaeImage,
        FileKind::PaeDoc,
    ];

    /// JSON key used by the API for this kind.
    pub fn key(self) -> &'static str {
        match self {
            FileKind::Cif => "cifUrl",
            FileKind::Bcif => "bcifUrl",
            FileKind::Pdb => "pdbUrl",
            FileKind::PaeImage => "paeImageUrl",
            FileKind::PaeDoc => "paeDocUrl",
        }
    }
}

impl ModelEntry {
    /// URL for `kind`, or `None` when it is absent or blank.
    pub fn url(&self, kind: FileKind) -> Option<&str> {
        let url = match kind {
            FileKind::Cif => &self.cif_url,
            FileKind::Bcif => &self.bcif_url,
            FileKind::Pdb => &self.pdb_url,
            FileKind::PaeImage => &self.pae_image_url,
            FileKind::PaeDoc => &self.pae_doc_url,
        };
        url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Residue count; an absent sequence counts as zero.
    pub fn sequence_length(&self) -> usize {
        self.uniprot_sequence
            .as_deref()
            .map(|s| s.chars().count())
            .unwrap_or(0)
    }
}

/// Reduced projection of a `ModelEntry`, written to `{accession}_analysis.json`.
/// Absent values serialise as `null` so every record has the same keys.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    #[serde(rename = "Entry ID")]
    pub entry_id: Option<String>,
    #[serde(rename = "Gene")]
    pub gene: Option<String>,
    #[serde(rename = "Organism")]
    pub organism: Option<String>,
    #[serde(rename = "Sequence Length")]
    pub sequence_length: usize,
    #[serde(rename = "Model Created Date")]
    pub model_created_date: Option<String>,
    #[serde(rename = "Latest Version")]
    pub latest_version: Option<u64>,
    #[serde(rename = "Structure Files")]
    pub structure_files: StructureFiles,
}

/// Structure file URLs that are actually present. Missing ones are left out
/// of the serialised map rather than written as `null`.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct StructureFiles {
    #[serde(rename = "cifUrl", skip_serializing_if = "Option::is_none")]
    pub cif_url: Option<String>,
    #[serde(rename = "bcifUrl", skip_serializing_if = "Option::is_none")]
    pub bcif_url: Option<String>,
    #[serde(rename = "pdbUrl", skip_serializing_if = "Option::is_none")]
    pub pdb_url: Option<String>,
}

impl StructureFiles {
    pub fn from_entry(entry: &ModelEntry) -> Self {
        let pick = |kind| entry.url(kind).map(str::to_string);
        StructureFiles {
            cif_url: pick(FileKind::Cif),
            bcif_url: pick(FileKind::Bcif),
            pdb_url: pick(FileKind::Pdb),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_api_field_names() {
        let entry: ModelEntry = serde_json::from_value(json!({
            "entryId": "AF-P00520-F1",
            "gene": "ABL1",
            "organismScientificName": "Mus musculus",
            "uniprotSequence": "MLEI",
            "modelCreatedDate": "2022-06-01",
            "latestVersion": 4,
            "cifUrl": "https://alphafold.ebi.ac.uk/files/AF-P00520-F1-model_v4.cif",
            "someNewField": {"ignored": true}
        }))
        .unwrap();

        assert_eq!(entry.entry_id.as_deref(), Some("AF-P00520-F1"));
        assert_eq!(entry.organism_scientific_name.as_deref(), Some("Mus musculus"));
        assert_eq!(entry.latest_version, Some(4));
        assert_eq!(entry.sequence_length(), 4);
        assert!(entry.url(FileKind::Cif).is_some());
        assert!(entry.url(FileKind::Pdb).is_none());
    }

    #[test]
    fn empty_object_is_a_valid_entry() {
        let entry: ModelEntry = serde_json::from_value(json!({})).unwrap();
        assert_eq!(entry, ModelEntry::default());
        assert_eq!(entry.sequence_length(), 0);
    }

    #[test]
    fn null_fields_are_absent() {
        let entry: ModelEntry =
            serde_json::from_value(json!({"gene": null, "uniprotSequence": null})).unwrap();
        assert!(entry.gene.is_none());
        assert_eq!(entry.sequence_length(), 0);
    }

    #[test]
    fn wrongly_typed_fields_are_absent_not_fatal() {
        let entry: ModelEntry = serde_json::from_value(json!({
            "entryId": "AF-A",
            "gene": 7,
            "latestVersion": 4.0,
            "uniprotSequence": ["M"],
            "cifUrl": "https://x/AF-A.cif"
        }))
        .unwrap();

        assert_eq!(entry.entry_id.as_deref(), Some("AF-A"));
        assert!(entry.gene.is_none());
        assert!(entry.latest_version.is_none());
        assert_eq!(entry.sequence_length(), 0);
        assert_eq!(entry.url(FileKind::Cif), Some("https://x/AF-A.cif"));
    }

    #[test]
    fn non_object_is_still_rejected() {
        assert!(serde_json::from_value::<ModelEntry>(json!("not an entry")).is_err());
        assert!(serde_json::from_value::<ModelEntry>(json!(42)).is_err());
    }

    #[test]
    fn blank_urls_count_as_missing() {
        let entry = ModelEntry {
            pdb_url: Some("  ".into()),
            pae_doc_url: Some(String::new()),
            ..Default::default()
        };
        assert!(entry.url(FileKind::Pdb).is_none());
        assert!(entry.url(FileKind::PaeDoc).is_none());
    }

    #[test]
    fn structure_files_skip_missing_keys() {
        let entry = ModelEntry {
            cif_url: Some("https://x/a.cif".into()),
            bcif_url: Some(String::new()),
            pae_image_url: Some("https://x/a.png".into()),
            ..Default::default()
        };
        let files = StructureFiles::from_entry(&entry);
        assert_eq!(
            serde_json::to_value(&files).unwrap(),
            json!({"cifUrl": "https://x/a.cif"})
        );
    }

    #[test]
    fn file_kind_keys_match_api() {
        let keys: Vec<_> = FileKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(keys, ["cifUrl", "bcifUrl", "pdbUrl", "paeImageUrl", "paeDocUrl"]);
    }
}
