// Processor: turns model entries into summary records and echoes each one
// to the console.

use crate::model::{ModelEntry, StructureFiles, SummaryRecord};
use crate::output;

/// Project one entry onto the fields shown to the user.
pub fn summarize(entry: &ModelEntry) -> SummaryRecord {
    SummaryRecord {
        entry_id: entry.entry_id.clone(),
        gene: entry.gene.clone(),
        organism: entry.organism_scientific_name.clone(),
        sequence_length: entry.sequence_length(),
        model_created_date: entry.model_created_date.clone(),
        latest_version: entry.latest_version,
        structure_files: StructureFiles::from_entry(entry),
    }
}

/// Summarise every entry in input order, printing each record as it is built.
pub fn process_entries(entries: &[ModelEntry]) -> Vec<SummaryRecord> {
    entries
        .iter()
        .map(|entry| {
            let record = summarize(entry);
            match output::to_pretty_string(&record) {
                Ok(text) => println!("{}", text),
                Err(e) => tracing::warn!(error = %e, "could not render summary record"),
            }
            record
        })
        .collect()
}
