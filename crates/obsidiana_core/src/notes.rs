//! Per-day calendar records: free text, a mood, a pain level.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::store::{Store, StoreKey};

/// Discomfort scale recorded against a day, 0 through 3 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PainLevel {
    None,
    Mild,
    Moderate,
    Severe,
}

impl PainLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

impl TryFrom<u8> for PainLevel {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Mild),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Severe),
            other => Err(format!("pain level must be 0-3, got {}", other)),
        }
    }
}

impl From<PainLevel> for u8 {
    fn from(level: PainLevel) -> Self {
        match level {
            PainLevel::None => 0,
            PainLevel::Mild => 1,
            PainLevel::Moderate => 2,
            PainLevel::Severe => 3,
        }
    }
}

/// What the user wrote down for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain: Option<PainLevel>,
}

impl DayRecord {
    /// A record with nothing in it is dropped from the document rather
    /// than stored.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.mood.is_none() && self.pain.is_none()
    }
}

/// Early documents stored a bare string per day instead of a record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DayRecordCompat {
    Record(DayRecord),
    Legacy(String),
}

impl From<DayRecordCompat> for DayRecord {
    fn from(compat: DayRecordCompat) -> Self {
        match compat {
            DayRecordCompat::Record(record) => record,
            DayRecordCompat::Legacy(text) => DayRecord {
                text,
                ..Default::default()
            },
        }
    }
}

/// The whole calendar-notes document, keyed by ISO date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CalendarNotes(pub BTreeMap<NaiveDate, DayRecord>);

impl<'de> Deserialize<'de> for CalendarNotes {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<NaiveDate, DayRecordCompat>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter().map(|(date, record)| (date, record.into())).collect(),
        ))
    }
}

impl CalendarNotes {
    pub fn get(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.0.get(&date)
    }

    /// Insert a record, or drop the day entirely when the record is empty.
    pub fn set(&mut self, date: NaiveDate, record: DayRecord) {
        if record.is_empty() {
            self.0.remove(&date);
        } else {
            self.0.insert(date, record);
        }
    }

    pub fn remove(&mut self, date: NaiveDate) {
        self.0.remove(&date);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayRecord)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Storage schema for the calendar notes document.
pub struct CalendarNotesKey;

impl StoreKey for CalendarNotesKey {
    const KEY: &'static str = "calendar_notes";
    type Value = CalendarNotes;
}

/// Store-backed access to the calendar notes.
#[derive(Debug, Clone)]
pub struct NotesManager {
    store: Store,
}

impl NotesManager {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn record(&self, date: NaiveDate, record: DayRecord) -> Result<()> {
        self.store
            .update::<CalendarNotesKey, _, _>(|notes| notes.set(date, record))
            .await
    }

    pub async fn note(&self, date: NaiveDate) -> Result<Option<DayRecord>> {
        Ok(self.store.get::<CalendarNotesKey>().await?.get(date).cloned())
    }

    pub async fn all(&self) -> Result<CalendarNotes> {
        self.store.get::<CalendarNotesKey>().await
    }

    pub async fn clear(&self, date: NaiveDate) -> Result<()> {
        self.store
            .update::<CalendarNotesKey, _, _>(|notes| notes.remove(date))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_pain_level_wire_format() {
        let level: PainLevel = serde_json::from_str("2").unwrap();
        assert_eq!(level, PainLevel::Moderate);
        assert_eq!(serde_json::to_string(&PainLevel::Severe).unwrap(), "3");
        assert!(serde_json::from_str::<PainLevel>("4").is_err());
    }

    #[test]
    fn test_legacy_string_notes_still_deserialize() {
        let json = r#"{"2024-03-01": "slept badly", "2024-03-02": {"text": "better", "pain": 1}}"#;
        let notes: CalendarNotes = serde_json::from_str(json).unwrap();

        assert_eq!(notes.get(date(2024, 3, 1)).unwrap().text, "slept badly");
        assert_eq!(notes.get(date(2024, 3, 1)).unwrap().mood, None);
        assert_eq!(
            notes.get(date(2024, 3, 2)).unwrap().pain,
            Some(PainLevel::Mild)
        );
    }

    #[test]
    fn test_empty_record_is_dropped() {
        let mut notes = CalendarNotes::default();
        notes.set(
            date(2024, 3, 1),
            DayRecord {
                text: "body asked for rest".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(notes.len(), 1);

        notes.set(date(2024, 3, 1), DayRecord::default());
        assert!(notes.is_empty());
    }

    #[test]
    fn test_whitespace_only_text_counts_as_empty() {
        let record = DayRecord {
            text: "   ".to_string(),
            ..Default::default()
        };
        assert!(record.is_empty());

        let with_pain = DayRecord {
            text: String::new(),
            pain: Some(PainLevel::None),
            ..Default::default()
        };
        assert!(!with_pain.is_empty());
    }

    #[tokio::test]
    async fn test_manager_round_trip() {
        let manager = NotesManager::new(Store::new(Arc::new(MemoryStore::new())));
        let day = date(2024, 3, 5);

        manager
            .record(
                day,
                DayRecord {
                    text: "cramps easing".to_string(),
                    mood: Some("🧘‍♀️".to_string()),
                    pain: Some(PainLevel::Mild),
                },
            )
            .await
            .unwrap();

        let stored = manager.note(day).await.unwrap().unwrap();
        assert_eq!(stored.text, "cramps easing");

        manager.clear(day).await.unwrap();
        assert!(manager.note(day).await.unwrap().is_none());
    }
}
