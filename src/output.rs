// Output naming and JSON persistence. All names are derived from the
// accession (and residue range) so repeated runs overwrite the same files.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const JSON_INDENT: &[u8] = b"    ";

/// Replace path separators so a user-supplied token cannot escape `dir`.
fn path_safe(token: &str) -> String {
    token.replace(['/', '\\'], "_")
}

/// `{accession}_models.json`
pub fn models_file(dir: &Path, accession: &str) -> PathBuf {
    dir.join(format!("{}_models.json", path_safe(accession)))
}

/// `{accession}_summary_{range}.json`, with `-` in the range turned into `_`.
pub fn summary_file(dir: &Path, accession: &str, residue_range: &str) -> PathBuf {
    let range = path_safe(residue_range).replace('-', "_");
    dir.join(format!("{}_summary_{}.json", path_safe(accession), range))
}

/// `{accession}_analysis.json`
pub fn analysis_file(dir: &Path, accession: &str) -> PathBuf {
    dir.join(format!("{}_analysis.json", path_safe(accession)))
}

/// `{accession}_files/`
pub fn files_dir(dir: &Path, accession: &str) -> PathBuf {
    dir.join(format!("{}_files", path_safe(accession)))
}

/// Serialise `value` to `path` as 4-space indented JSON.
pub fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(JSON_INDENT));
    value
        .serialize(&mut ser)
        .with_context(|| format!("Failed to serialise {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Render `value` the same way `write_pretty_json` does, for console output.
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut ser).context("Failed to serialise JSON")?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn names_follow_accession() {
        let dir = Path::new("out");
        assert_eq!(models_file(dir, "P00520"), Path::new("out/P00520_models.json"));
        assert_eq!(analysis_file(dir, "P00520"), Path::new("out/P00520_analysis.json"));
        assert_eq!(files_dir(dir, "P00520"), Path::new("out/P00520_files"));
    }

    #[test]
    fn summary_name_replaces_range_separator() {
        let name = summary_file(Path::new("."), "P00520", "1-100");
        assert_eq!(name.file_name().unwrap(), "P00520_summary_1_100.json");
    }

    #[test]
    fn summary_name_is_filesystem_safe() {
        let name = summary_file(Path::new("."), "P00520", "1/../100");
        assert_eq!(name.file_name().unwrap(), "P00520_summary_1_.._100.json");
        assert_eq!(name.parent().unwrap(), Path::new("."));
    }

    #[test]
    fn writes_four_space_indented_json_preserving_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        let value = json!({"zeta": 1, "alpha": [true]});

        write_pretty_json(&path, &value).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n    \"zeta\": 1,\n    \"alpha\": [\n        true\n    ]\n}");
        let back: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("out.json");
        assert!(write_pretty_json(&path, &json!([])).is_err());
    }
}
