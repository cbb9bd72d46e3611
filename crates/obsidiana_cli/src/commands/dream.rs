use std::sync::Arc;

use chrono::Local;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{ContentArrangement, Table};
use miette::Result;

use obsidiana_core::assistant::Counselor;
use obsidiana_core::config::ObsidianaConfig;
use obsidiana_core::id::DreamId;
use obsidiana_core::journal::{DreamEntry, DreamJournal};
use obsidiana_core::store::Store;

use crate::commands::{ellipsize, parse_date};
use crate::output::Output;

/// Journal handle for operations that never call the model.
fn journal(store: &Store, config: &ObsidianaConfig) -> DreamJournal {
    DreamJournal::new(
        store.clone(),
        Counselor::new(Arc::new(config.model.client())),
    )
}

/// Record a dream and ask the counselor to interpret it
pub async fn add(
    store: &Store,
    config: &ObsidianaConfig,
    content: &str,
    date: Option<&str>,
    tags: Vec<String>,
) -> Result<()> {
    let output = Output::new();
    let date = match date {
        Some(raw) => parse_date("date", raw)?,
        None => Local::now().date_naive(),
    };

    let counselor = super::counselor(config, &output);
    let journal = DreamJournal::new(store.clone(), counselor);

    output.status("Interpreting the dream...");
    let entry = journal.record(date, content, tags).await?;

    output.success(&format!("Dream recorded for {}", entry.date));
    output.kv("id", &entry.id.to_string());
    if let Some(interpretation) = &entry.interpretation {
        output.counselor_message("Osiris", interpretation);
    }
    Ok(())
}

pub async fn list(store: &Store, config: &ObsidianaConfig, full: bool) -> Result<()> {
    let output = Output::new();
    let dreams = journal(store, config).list().await?;

    if dreams.is_empty() {
        output.status("No dreams recorded yet");
        return Ok(());
    }

    output.section(&format!("Dream Journal ({} entries)", dreams.len()));
    if full {
        for entry in &dreams {
            print_entry(&output, entry);
        }
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Date", "Tags", "Dream"]);
    for entry in &dreams {
        table.add_row(vec![
            entry.id.to_string(),
            entry.date.to_string(),
            entry.tags.join(", "),
            ellipsize(&entry.content, 48),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn show(store: &Store, config: &ObsidianaConfig, id: &str) -> Result<()> {
    let output = Output::new();
    let id = DreamId::parse(id)?;
    let entry = journal(store, config).get(&id).await?;
    print_entry(&output, &entry);
    Ok(())
}

pub async fn remove(store: &Store, config: &ObsidianaConfig, id: &str) -> Result<()> {
    let output = Output::new();
    let id = DreamId::parse(id)?;
    let entry = journal(store, config).remove(&id).await?;
    output.success(&format!("Removed the dream recorded for {}", entry.date));
    Ok(())
}

fn print_entry(output: &Output, entry: &DreamEntry) {
    output.section(&format!("Dream of {}", entry.date));
    output.kv("id", &entry.id.to_string());
    if !entry.tags.is_empty() {
        output.kv("tags", &entry.tags.join(", "));
    }
    println!();
    println!("  {}", entry.content);
    if let Some(interpretation) = &entry.interpretation {
        output.counselor_message("Osiris", interpretation);
    }
}
