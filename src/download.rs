// Downloader: fetches the structure files, PAE image and PAE document
// referenced by each model entry into `{accession}_files/`.

use crate::api::{ApiClient, Transport};
use crate::model::{FileKind, ModelEntry};
use crate::output;
use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a download batch.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub saved: Vec<PathBuf>,
    /// `(url, reason)` for every file that could not be saved.
    pub failed: Vec<(String, String)>,
    /// Files written more than once in this batch; the last write won.
    pub overwritten: Vec<PathBuf>,
}

/// Final path segment of `url`, used as the local file name.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let segment = match reqwest::Url::parse(url) {
        Ok(parsed) => parsed.path_segments()?.last()?.to_string(),
        Err(_) => url.rsplit('/').next()?.to_string(),
    };
    match segment.as_str() {
        "" | "." | ".." => None,
        _ => Some(segment),
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} files") {
        pb.set_style(style);
    }
    pb
}

impl<T: Transport> ApiClient<T> {
    /// Download every file referenced by `entries`.
    ///
    /// A failing file is reported and skipped; it never stops the rest of
    /// the batch. Files sharing a name overwrite each other (last one wins).
    pub fn download_model_files(
        &self,
        entries: &[ModelEntry],
        accession: &str,
        out_dir: &Path,
    ) -> DownloadReport {
        let mut report = DownloadReport::default();
        let dir = output::files_dir(out_dir, accession);
        if let Err(e) = fs::create_dir_all(&dir) {
            println!("Error creating {}: {}", dir.display(), e);
            return report;
        }

        let queued: Vec<(FileKind, &str)> = entries
            .iter()
            .flat_map(|entry| {
                FileKind::ALL
                    .iter()
                    .filter_map(move |kind| entry.url(*kind).map(|url| (*kind, url)))
            })
            .collect();

        let pb = progress_bar(queued.len() as u64);
        let mut written: HashSet<PathBuf> = HashSet::new();
        for (kind, url) in queued {
            tracing::debug!(file_type = kind.key(), %url, "downloading");
            pb.suspend(|| println!("Downloading {}...", url));
            match self.download_one(url, &dir) {
                Ok(path) => {
                    if !written.insert(path.clone()) {
                        tracing::warn!(path = %path.display(), %url, "file name already used in this batch, overwritten");
                        report.overwritten.push(path.clone());
                    }
                    pb.suspend(|| println!("Saved {}", path.display()));
                    report.saved.push(path);
                }
                Err(e) => {
                    pb.suspend(|| println!("Error downloading {}: {:#}", url, e));
                    report.failed.push((url.to_string(), format!("{:#}", e)));
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
        report
    }

    fn download_one(&self, url: &str, dir: &Path) -> Result<PathBuf> {
        let name = file_name_from_url(url).ok_or_else(|| anyhow!("no file name in URL"))?;
        let path = dir.join(name);
        let body = self.get_bytes(url)?;
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
