// Dispatcher: runs exactly one menu action described by a `RunConfig`.
// Prompting lives in `ui`; everything here is driven by explicit values.

use crate::analysis;
use crate::api::{ApiClient, Transport};
use crate::process;
use anyhow::Result;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid choice.")]
pub struct InvalidChoice;

/// The three top-level menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Models,
    Summary,
    All,
}

impl FromStr for MenuChoice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::Models),
            "2" => Ok(MenuChoice::Summary),
            "3" => Ok(MenuChoice::All),
            _ => Err(InvalidChoice),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fetch, summarise and save models; download only if confirmed.
    Models,
    /// Fetch the summary for a residue range such as `1-100`.
    Summary { residue_range: String },
    /// Fetch, summarise, save and download without asking.
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub accession: String,
    pub action: Action,
    /// Answer to the download question of `Action::Models`. `None` asks
    /// through the confirmation callback passed to `run`.
    pub confirm_download: Option<bool>,
}

/// Turn raw menu input into a run. An invalid choice is reported and
/// nothing is fetched or written; `read_range` is only asked for the
/// summary choice.
pub fn run_choice<T: Transport>(
    api: &ApiClient<T>,
    accession: &str,
    choice: &str,
    out_dir: &Path,
    read_range: impl FnOnce() -> Result<String>,
    confirm: impl FnOnce() -> Result<bool>,
) -> Result<()> {
    let choice = match choice.parse::<MenuChoice>() {
        Ok(choice) => choice,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };
    let action = match choice {
        MenuChoice::Models => Action::Models,
        MenuChoice::Summary => Action::Summary {
            residue_range: read_range()?.trim().to_string(),
        },
        MenuChoice::All => Action::All,
    };
    let config = RunConfig {
        accession: accession.trim().to_string(),
        action,
        confirm_download: None,
    };
    run(api, &config, out_dir, confirm)
}

/// Execute `config` against `api`, writing into `out_dir`.
///
/// Fetch, save and download failures are reported by the steps themselves;
/// the only error returned here comes from `confirm`.
pub fn run<T: Transport>(
    api: &ApiClient<T>,
    config: &RunConfig,
    out_dir: &Path,
    confirm: impl FnOnce() -> Result<bool>,
) -> Result<()> {
    let accession = config.accession.as_str();
    match &config.action {
        Action::Summary { residue_range } => {
            api.fetch_summary(accession, residue_range, out_dir);
        }
        Action::Models => {
            let Some(entries) = fetch_and_analyze(api, accession, out_dir) else {
                return Ok(());
            };
            let download = match config.confirm_download {
                Some(answer) => answer,
                None => confirm()?,
            };
            if download {
                api.download_model_files(&entries, accession, out_dir);
            }
        }
        Action::All => {
            if let Some(entries) = fetch_and_analyze(api, accession, out_dir) {
                api.download_model_files(&entries, accession, out_dir);
            }
        }
    }
    Ok(())
}

/// Shared first half of the models and all-in-one branches. Returns the
/// entries only when there is something left to download.
fn fetch_and_analyze<T: Transport>(
    api: &ApiClient<T>,
    accession: &str,
    out_dir: &Path,
) -> Option<Vec<crate::model::ModelEntry>> {
    let batch = api.fetch_models(accession, out_dir)?;
    if batch.entries.is_empty() {
        println!("{}", empty_batch_message(accession, batch.skipped));
        return None;
    }
    if batch.skipped > 0 {
        println!("Skipped {} malformed model entries for {}", batch.skipped, accession);
    }
    let records = process::process_entries(&batch.entries);
    analysis::save_analysis(&records, accession, out_dir);
    Some(batch.entries)
}

fn empty_batch_message(accession: &str, skipped: usize) -> String {
    if skipped == 0 {
        format!("No models found for {}", accession)
    } else {
        format!("No usable models for {}: all {} entries were malformed", accession, skipped)
    }
}
