use chrono::Local;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{ContentArrangement, Table};
use miette::Result;

use obsidiana_core::notes::{DayRecord, NotesManager, PainLevel};
use obsidiana_core::store::Store;

use crate::commands::parse_date;
use crate::output::Output;

fn resolve_date(raw: Option<&str>) -> Result<chrono::NaiveDate> {
    match raw {
        Some(value) => parse_date("date", value),
        None => Ok(Local::now().date_naive()),
    }
}

/// Record what a day felt like
pub async fn add(
    store: &Store,
    date: Option<&str>,
    text: Option<&str>,
    mood: Option<&str>,
    pain: Option<u8>,
) -> Result<()> {
    let output = Output::new();
    let date = resolve_date(date)?;

    let pain = match pain {
        Some(value) => Some(PainLevel::try_from(value).map_err(|e| miette::miette!("{e}"))?),
        None => None,
    };
    let record = DayRecord {
        text: text.unwrap_or_default().to_string(),
        mood: mood.map(String::from),
        pain,
    };

    let cleared = record.is_empty();
    NotesManager::new(store.clone()).record(date, record).await?;

    if cleared {
        output.status(&format!("Nothing to record; cleared {}", date));
    } else {
        output.success(&format!("Noted {}", date));
    }
    Ok(())
}

pub async fn show(store: &Store, date: Option<&str>) -> Result<()> {
    let output = Output::new();
    let date = resolve_date(date)?;

    match NotesManager::new(store.clone()).note(date).await? {
        Some(record) => {
            output.section(&format!("Note for {}", date));
            if let Some(mood) = &record.mood {
                output.kv("mood", mood);
            }
            if let Some(pain) = record.pain {
                output.kv("pain", pain.label());
            }
            if !record.text.trim().is_empty() {
                println!("  {}", record.text);
            }
            println!();
        }
        None => output.status(&format!("No note for {}", date)),
    }
    Ok(())
}

pub async fn list(store: &Store) -> Result<()> {
    let output = Output::new();
    let notes = NotesManager::new(store.clone()).all().await?;

    if notes.is_empty() {
        output.status("No notes recorded yet");
        return Ok(());
    }

    output.section(&format!("Notes ({} days)", notes.len()));
    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Mood", "Pain", "Note"]);
    for (date, record) in notes.iter() {
        table.add_row(vec![
            date.to_string(),
            record.mood.clone().unwrap_or_default(),
            record.pain.map(|p| p.label().to_string()).unwrap_or_default(),
            record.text.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn clear(store: &Store, date: &str) -> Result<()> {
    let output = Output::new();
    let date = parse_date("date", date)?;
    NotesManager::new(store.clone()).clear(date).await?;
    output.success(&format!("Cleared {}", date));
    Ok(())
}
