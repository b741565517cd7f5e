// UI layer: prompts for an accession and a menu choice using `dialoguer`,
// then hands the raw answers to the dispatcher.

use crate::api::{ApiClient, Transport};
use crate::config::Settings;
use crate::dispatch;
use anyhow::Result;
use dialoguer::Input;

const MENU: &str = "Choose an action:
1. Fetch models by UniProt accession
2. Fetch summary by residue range
3. Fetch and analyze all";

/// Run one interactive session. An invalid menu choice is reported and
/// nothing else happens.
pub fn run_prompt<T: Transport>(api: &ApiClient<T>, settings: &Settings) -> Result<()> {
    println!("AlphaFold Protein Structure Database API Client");
    let accession: String = Input::new()
        .with_prompt("Enter UniProt accession (e.g., P00520)")
        .interact_text()?;

    println!("{}", MENU);
    let choice: String = Input::new()
        .with_prompt("Enter your choice (1/2/3)")
        .allow_empty(true)
        .interact_text()?;

    dispatch::run_choice(
        api,
        &accession,
        &choice,
        &settings.output_dir,
        read_range,
        ask_download,
    )
}

fn read_range() -> Result<String> {
    let residue_range: String = Input::new()
        .with_prompt("Enter residue range (e.g., 1-100)")
        .interact_text()?;
    Ok(residue_range)
}

/// Only an explicit "yes" starts the download.
fn ask_download() -> Result<bool> {
    let answer: String = Input::new()
        .with_prompt("Do you want to download structure files? (yes/no)")
        .allow_empty(true)
        .interact_text()?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
