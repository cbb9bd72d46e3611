use std::path::PathBuf;

use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{ContentArrangement, Table};
use miette::{IntoDiagnostic, Result};

use obsidiana_core::agenda::{self, Agenda, EventKind};
use obsidiana_core::error::CoreError;
use obsidiana_core::id::EventId;
use obsidiana_core::store::Store;

use crate::commands::{parse_date, parse_time};
use crate::output::Output;

/// Schedule a ritual, appointment, or practice
pub async fn add(
    store: &Store,
    title: &str,
    date: &str,
    time: &str,
    kind: &str,
    no_reminder: bool,
) -> Result<()> {
    let output = Output::new();
    let date = parse_date("date", date)?;
    let time = parse_time("time", time)?;
    let kind: EventKind = kind.parse().map_err(|e: String| miette::miette!("{e}"))?;

    let event = Agenda::new(store.clone())
        .add(title, date, time, kind, !no_reminder)
        .await?;

    output.success(&format!(
        "Scheduled '{}' on {} at {}",
        event.title,
        event.date,
        event.time.format("%H:%M")
    ));
    output.kv("id", &event.id.to_string());
    Ok(())
}

pub async fn list(store: &Store) -> Result<()> {
    let output = Output::new();
    let events = Agenda::new(store.clone()).list().await?;

    if events.is_empty() {
        output.status("Nothing scheduled yet");
        return Ok(());
    }

    output.section(&format!("Lunar Agenda ({} events)", events.len()));
    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Time", "Kind", "Title", "Reminder", "ID"]);
    for event in &events {
        table.add_row(vec![
            event.date.to_string(),
            event.time.format("%H:%M").to_string(),
            event.kind.as_str().to_string(),
            event.title.clone(),
            if event.reminder_enabled { "on" } else { "off" }.to_string(),
            event.id.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn remove(store: &Store, id: &str) -> Result<()> {
    let output = Output::new();
    let id = EventId::parse(id)?;
    let event = Agenda::new(store.clone()).remove(&id).await?;
    output.success(&format!("Removed '{}' ({})", event.title, event.date));
    Ok(())
}

/// Write the agenda as an iCalendar document, to stdout or a file
pub async fn export(store: &Store, destination: Option<&PathBuf>) -> Result<()> {
    let output = Output::new();
    let events = Agenda::new(store.clone()).list().await?;
    let ics = agenda::to_ics(&events);

    match destination {
        Some(path) => {
            tokio::fs::write(path, &ics).await.into_diagnostic()?;
            output.success(&format!(
                "Exported {} events to {}",
                events.len(),
                path.display()
            ));
        }
        // Raw output, fit for piping into a .ics file
        None => println!("{}", ics),
    }
    Ok(())
}

/// Print a prefilled Google Calendar link for one event
pub async fn google_url(store: &Store, id: &str) -> Result<()> {
    let output = Output::new();
    let parsed = EventId::parse(id)?;
    let events = Agenda::new(store.clone()).list().await?;
    let event = events
        .iter()
        .find(|event| event.id == parsed)
        .ok_or_else(|| CoreError::EventNotFound { id: id.to_string() })?;

    output.section(&event.title);
    println!("{}", agenda::google_calendar_url(event));
    Ok(())
}
