//! Dream journal with interpretation.
//!
//! Each recorded dream is run past the counselor and stored together with
//! the interpretation it produced. Interpretation never blocks the entry:
//! when the provider is unreachable the counselor's local guidance is
//! stored instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assistant::Counselor;
use crate::error::{CoreError, Result};
use crate::id::DreamId;
use crate::store::{Store, StoreKey};

/// One dream and what Osiris made of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreamEntry {
    pub id: DreamId,
    pub date: NaiveDate,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Store schema: dreams, newest first.
pub struct DreamsKey;

impl StoreKey for DreamsKey {
    const KEY: &'static str = "dreams";
    type Value = Vec<DreamEntry>;
}

#[derive(Debug, Clone)]
pub struct DreamJournal {
    store: Store,
    counselor: Counselor,
}

impl DreamJournal {
    pub fn new(store: Store, counselor: Counselor) -> Self {
        Self { store, counselor }
    }

    /// Interpret and save a dream. The new entry goes to the front of the
    /// journal.
    pub async fn record(
        &self,
        date: NaiveDate,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<DreamEntry> {
        let content = content.into().trim().to_string();
        let reply = self.counselor.analyze_dream(&content).await;

        let entry = DreamEntry {
            id: DreamId::generate(),
            date,
            content,
            interpretation: Some(reply.text),
            tags,
        };

        let stored = entry.clone();
        self.store
            .update::<DreamsKey, _, _>(move |dreams| dreams.insert(0, stored))
            .await?;

        tracing::info!(id = %entry.id, "dream recorded");
        Ok(entry)
    }

    /// All entries, newest first.
    pub async fn list(&self) -> Result<Vec<DreamEntry>> {
        self.store.get::<DreamsKey>().await
    }

    pub async fn get(&self, id: &DreamId) -> Result<DreamEntry> {
        self.list()
            .await?
            .into_iter()
            .find(|entry| entry.id == *id)
            .ok_or_else(|| CoreError::DreamNotFound { id: id.to_string() })
    }

    /// Delete an entry, returning it.
    pub async fn remove(&self, id: &DreamId) -> Result<DreamEntry> {
        let target = *id;
        self.store
            .update::<DreamsKey, _, _>(move |dreams| {
                dreams
                    .iter()
                    .position(|entry| entry.id == target)
                    .map(|at| dreams.remove(at))
            })
            .await?
            .ok_or_else(|| CoreError::DreamNotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::ScriptedProvider;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn journal_with_reply(reply: &str) -> DreamJournal {
        let store = Store::new(Arc::new(MemoryStore::new()));
        let counselor = Counselor::new(Arc::new(ScriptedProvider::new(reply)));
        DreamJournal::new(store, counselor)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn recording_stores_the_interpretation() {
        let journal = journal_with_reply("the cave is your womb");

        let entry = journal
            .record(
                date(2024, 5, 2),
                "I walked into a dark cave",
                vec!["cave".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(
            entry.interpretation.as_deref(),
            Some("the cave is your womb")
        );

        let listed = journal.list().await.unwrap();
        assert_eq!(listed, vec![entry]);
    }

    #[tokio::test]
    async fn newest_entries_come_first() {
        let journal = journal_with_reply("noted");

        journal
            .record(date(2024, 5, 1), "first dream", vec![])
            .await
            .unwrap();
        journal
            .record(date(2024, 5, 2), "second dream", vec![])
            .await
            .unwrap();

        let listed = journal.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].content, "second dream");
        assert_eq!(listed[1].content, "first dream");
    }

    #[tokio::test]
    async fn unreachable_provider_still_saves_the_entry() {
        let store = Store::new(Arc::new(MemoryStore::new()));
        let counselor = Counselor::new(Arc::new(crate::completion::HttpCompletionClient::new(
            "test-model",
            None,
        )));
        let journal = DreamJournal::new(store, counselor);

        let entry = journal
            .record(date(2024, 5, 3), "a storm over the sea", vec![])
            .await
            .unwrap();

        assert_eq!(
            entry.interpretation.as_deref(),
            Some(crate::assistant::DREAM_FALLBACK)
        );
        assert_eq!(journal.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn content_is_trimmed() {
        let journal = journal_with_reply("ok");
        let entry = journal
            .record(date(2024, 5, 4), "  moths in the attic \n", vec![])
            .await
            .unwrap();
        assert_eq!(entry.content, "moths in the attic");
    }

    #[tokio::test]
    async fn remove_returns_the_entry_and_missing_ids_error() {
        let journal = journal_with_reply("ok");
        let entry = journal
            .record(date(2024, 5, 5), "red river", vec![])
            .await
            .unwrap();

        let removed = journal.remove(&entry.id).await.unwrap();
        assert_eq!(removed.content, "red river");
        assert!(journal.list().await.unwrap().is_empty());

        let err = journal.remove(&entry.id).await.unwrap_err();
        assert!(matches!(err, CoreError::DreamNotFound { .. }));
    }

    #[tokio::test]
    async fn get_finds_entries_by_id() {
        let journal = journal_with_reply("ok");
        let entry = journal
            .record(date(2024, 5, 6), "white feathers", vec![])
            .await
            .unwrap();

        let found = journal.get(&entry.id).await.unwrap();
        assert_eq!(found, entry);
    }
}
