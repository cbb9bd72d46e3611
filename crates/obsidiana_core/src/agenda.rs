//! Lunar agenda: rituals, check-ups, and practices.
//!
//! Events carry a wall-clock date and time with no zone attached. Exports
//! format that wall time directly. One event spans one hour.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::form_urlencoded;

use crate::error::{CoreError, Result};
use crate::id::EventId;
use crate::store::{Store, StoreKey};

const GOOGLE_CALENDAR_BASE: &str = "https://www.google.com/calendar/render?action=TEMPLATE";
const GOOGLE_STAMP: &str = "%Y%m%dT%H%M%SZ";
const ICS_STAMP: &str = "%Y%m%dT%H%M%S";
const EVENT_LOCATION: &str = "Sacred Space / Home";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Ritual,
    Medical,
    Practice,
    Other,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ritual => "ritual",
            Self::Medical => "medical",
            Self::Practice => "practice",
            Self::Other => "other",
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ritual" => Ok(Self::Ritual),
            "medical" => Ok(Self::Medical),
            "practice" => Ok(Self::Practice),
            "other" => Ok(Self::Other),
            other => Err(format!(
                "unknown event kind '{other}', expected ritual, medical, practice, or other"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaEvent {
    pub id: EventId,
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub kind: EventKind,
    #[serde(default = "reminder_default")]
    pub reminder_enabled: bool,
}

fn reminder_default() -> bool {
    true
}

impl AgendaEvent {
    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Events block one hour. Rolls over midnight where needed.
    pub fn end(&self) -> NaiveDateTime {
        self.start() + Duration::hours(1)
    }
}

/// Store schema: scheduled events in insertion order.
pub struct AgendaKey;

impl StoreKey for AgendaKey {
    const KEY: &'static str = "agenda";
    type Value = Vec<AgendaEvent>;
}

#[derive(Debug, Clone)]
pub struct Agenda {
    store: Store,
}

impl Agenda {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn add(
        &self,
        title: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        kind: EventKind,
        reminder_enabled: bool,
    ) -> Result<AgendaEvent> {
        let event = AgendaEvent {
            id: EventId::generate(),
            title: title.into(),
            date,
            time,
            kind,
            reminder_enabled,
        };

        let stored = event.clone();
        self.store
            .update::<AgendaKey, _, _>(move |events| events.push(stored))
            .await?;

        tracing::info!(id = %event.id, date = %event.date, "event scheduled");
        Ok(event)
    }

    /// Events ordered by date, then time.
    pub async fn list(&self) -> Result<Vec<AgendaEvent>> {
        let mut events = self.store.get::<AgendaKey>().await?;
        events.sort_by_key(|event| (event.date, event.time));
        Ok(events)
    }

    pub async fn remove(&self, id: &EventId) -> Result<AgendaEvent> {
        let target = *id;
        self.store
            .update::<AgendaKey, _, _>(move |events| {
                events
                    .iter()
                    .position(|event| event.id == target)
                    .map(|at| events.remove(at))
            })
            .await?
            .ok_or_else(|| CoreError::EventNotFound { id: id.to_string() })
    }
}

/// Prefilled Google Calendar "add event" link.
pub fn google_calendar_url(event: &AgendaEvent) -> String {
    let dates = format!(
        "{}/{}",
        event.start().format(GOOGLE_STAMP),
        event.end().format(GOOGLE_STAMP)
    );
    let details = format!(
        "Obsidian ritual - Kind: {}\nSynced from your lunar agenda.",
        event.kind.as_str()
    );

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("text", &event.title)
        .append_pair("dates", &dates)
        .append_pair("details", &details)
        .append_pair("location", EVENT_LOCATION)
        .finish();

    format!("{GOOGLE_CALENDAR_BASE}&{query}")
}

/// Render events as an iCalendar document, CRLF line endings per RFC 5545.
pub fn to_ics(events: &[AgendaEvent]) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Obsidiana//Lunar Agenda//EN".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
    ];

    for event in events {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("SUMMARY:{}", event.title));
        lines.push(format!("DTSTART:{}", event.start().format(ICS_STAMP)));
        lines.push(format!("DTEND:{}", event.end().format(ICS_STAMP)));
        lines.push(format!(
            "DESCRIPTION:Obsidian ritual - Kind: {}",
            event.kind.as_str()
        ));
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n")
}
