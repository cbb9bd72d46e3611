//! End-to-end flow over one shared store: profile, daily card numbers,
//! calendar notes, dream journal, circle, and agenda together.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use obsidiana_core::agenda::{self, Agenda, EventKind};
use obsidiana_core::assistant::{self, Counselor};
use obsidiana_core::community::{CommunityFeed, ReactionOutcome};
use obsidiana_core::cycle::{CyclePhase, compute_cycle};
use obsidiana_core::glossary;
use obsidiana_core::journal::DreamJournal;
use obsidiana_core::moon::compute_moon_phase;
use obsidiana_core::notes::{DayRecord, NotesManager, PainLevel};
use obsidiana_core::profile::{ProfileManager, UserProfile};
use obsidiana_core::store::{MemoryStore, Store};
use obsidiana_core::{CoreError, ScriptedProvider};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn a_full_companion_day() {
    let store = Store::new(Arc::new(MemoryStore::new()));
    let today = date(2024, 3, 1);

    // Profile first; everything else hangs off it.
    let profiles = ProfileManager::new(store.clone());
    let profile = UserProfile::new("Itzel", date(1994, 3, 10), date(2024, 2, 19), 28).unwrap();
    profiles.save(&profile).await.unwrap();

    let loaded = profiles.require().await.unwrap();
    assert_eq!(loaded.name, "Itzel");

    // Daily card: cycle day 12, follicular, eleven days after the period.
    let cycle = compute_cycle(&loaded.cycle_parameters().unwrap(), today);
    assert_eq!(cycle.cycle_day, 12);
    assert_eq!(cycle.phase, CyclePhase::Follicular);

    // Third lunation of 2024 on March 1st.
    let moon = compute_moon_phase(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    assert_eq!(moon.year, 2024);
    assert_eq!(moon.moon_number_in_year, 3);

    assert_eq!(loaded.creative_reserve(today), 279);

    // The daily card always has a miracle question from the bank.
    let question = assistant::question_for_date(today);
    assert!(
        assistant::MIRACLE_QUESTIONS
            .iter()
            .any(|candidate| candidate.question == question.question)
    );

    // A calendar note with mood and pain.
    let notes = NotesManager::new(store.clone());
    notes
        .record(
            today,
            DayRecord {
                text: "Slow morning, heavy dreams".to_string(),
                mood: Some("🌑".to_string()),
                pain: Some(PainLevel::Moderate),
            },
        )
        .await
        .unwrap();

    let record = notes.note(today).await.unwrap().unwrap();
    assert_eq!(record.pain, Some(PainLevel::Moderate));

    // Dream journal through a scripted counselor.
    let counselor = Counselor::new(Arc::new(ScriptedProvider::new(
        "**Mirror of the Unconscious**\n\nThe cave is your own depth.",
    )));
    let journal = DreamJournal::new(store.clone(), counselor);
    let dream = journal
        .record(today, "I entered a dark cave", vec!["cave".to_string()])
        .await
        .unwrap();
    assert!(
        dream
            .interpretation
            .as_deref()
            .unwrap()
            .contains("Mirror of the Unconscious")
    );
    assert_eq!(journal.list().await.unwrap().len(), 1);

    // The circle: seeded feed, then a post under the profile name.
    let feed = CommunityFeed::new(store.clone());
    let posts = feed.list().await.unwrap();
    assert_eq!(posts.len(), 3);

    let outcome = feed.react(&posts[0].id, "❤️").await.unwrap();
    assert_eq!(outcome, ReactionOutcome::Added);

    feed.post(&loaded.name, "Day twelve, energy rising.", vec![])
        .await
        .unwrap();
    let posts = feed.list().await.unwrap();
    assert_eq!(posts.len(), 4);
    assert_eq!(posts[0].author, "Itzel");

    // Agenda with a calendar export.
    let book = Agenda::new(store.clone());
    book.add(
        "New moon meditation",
        date(2024, 3, 10),
        NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        EventKind::Ritual,
        true,
    )
    .await
    .unwrap();
    book.add(
        "Gynecologist (checkup)",
        date(2024, 3, 6),
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        EventKind::Medical,
        true,
    )
    .await
    .unwrap();

    let events = book.list().await.unwrap();
    assert_eq!(events[0].title, "Gynecologist (checkup)");

    let ics = agenda::to_ics(&events);
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    assert!(agenda::google_calendar_url(&events[0]).contains("action=TEMPLATE"));

    // Glossary lookup stays local.
    let hits = glossary::search("cramps");
    assert!(hits.iter().any(|term| term.term == "Adenomyosis"));
}

#[tokio::test]
async fn missing_profile_is_reported_not_defaulted() {
    let store = Store::new(Arc::new(MemoryStore::new()));
    let profiles = ProfileManager::new(store);

    assert!(profiles.load().await.unwrap().is_none());
    let err = profiles.require().await.unwrap_err();
    assert!(matches!(err, CoreError::ProfileMissing));
}

#[tokio::test]
async fn services_share_one_document_per_key() {
    let store = Store::new(Arc::new(MemoryStore::new()));
    let today = date(2024, 4, 2);

    // Notes and agenda write under different keys and never clobber each
    // other through the shared backend.
    let notes = NotesManager::new(store.clone());
    notes
        .record(
            today,
            DayRecord {
                text: "quiet".to_string(),
                mood: None,
                pain: None,
            },
        )
        .await
        .unwrap();

    let book = Agenda::new(store.clone());
    book.add(
        "Evening practice",
        today,
        NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
        EventKind::Practice,
        false,
    )
    .await
    .unwrap();

    assert!(notes.note(today).await.unwrap().is_some());
    assert_eq!(book.list().await.unwrap().len(), 1);
}
