use chrono::{Local, NaiveTime, Utc};
use miette::Result;
use owo_colors::OwoColorize;

use obsidiana_core::assistant;
use obsidiana_core::cycle::{compute_cycle, cycle_progress};
use obsidiana_core::moon::compute_moon_phase;
use obsidiana_core::notes::NotesManager;
use obsidiana_core::profile::ProfileManager;
use obsidiana_core::store::Store;

use crate::commands::parse_date;
use crate::output::{Output, format_phase, moon_glyph};

/// Today's cycle and moon card
pub async fn run(store: &Store, date: Option<&str>, detail: bool) -> Result<()> {
    let output = Output::new();
    let profile = ProfileManager::new(store.clone()).require().await?;

    // An explicit date reads the moon at its midnight UTC; "today" reads
    // the moon right now
    let (day, instant) = match date {
        Some(raw) => {
            let parsed = parse_date("date", raw)?;
            (parsed, parsed.and_time(NaiveTime::MIN).and_utc())
        }
        None => (Local::now().date_naive(), Utc::now()),
    };

    let params = profile.cycle_parameters()?;
    let cycle = compute_cycle(&params, day);
    let details = cycle.phase.details();
    let moon = compute_moon_phase(instant);

    println!();
    println!(
        "  Hello, {} · {}",
        profile.name.bright_cyan().bold(),
        day.format("%A %B %d, %Y")
    );

    output.section("Cycle");
    output.kv(
        "day",
        &format!("{} of {}", cycle.cycle_day, params.cycle_length()),
    );
    output.kv(
        "phase",
        &format!("{} ({})", format_phase(cycle.phase), details.archetype),
    );
    output.kv("summary", details.summary);
    output.kv("progress", &format!("{:.0}%", cycle_progress(&params, day)));
    if detail {
        println!();
        println!("  {}", details.description);
        println!();
        output.kv("exercise", details.recommendations.exercise);
        output.kv("energy", details.recommendations.energy);
        output.kv("practice", details.recommendations.practice);
    }

    output.section("Moon");
    output.kv(
        "phase",
        &format!("{} {}", moon_glyph(moon.phase), moon.phase.name()),
    );
    output.kv(
        "lunation",
        &format!("Moon {} of {}", moon.moon_number_in_year, moon.year),
    );
    output.kv("guidance", moon.phase.guidance());
    output.kv(
        "creative reserve",
        &format!("{} fertile moons ahead", profile.creative_reserve(day)),
    );

    let question = assistant::question_for_date(day);
    output.section("Miracle Question");
    println!("  {}", question.question.bright_white().bold());
    output.kv("theme", question.theme);
    output.status("Answer with: obsidiana miracle answer \"<your words>\"");

    if let Some(record) = NotesManager::new(store.clone()).note(day).await? {
        output.section(&format!("Note for {}", day));
        if let Some(mood) = &record.mood {
            output.kv("mood", mood);
        }
        if let Some(pain) = record.pain {
            output.kv("pain", pain.label());
        }
        if !record.text.trim().is_empty() {
            println!("  {}", record.text);
        }
    }

    println!();
    Ok(())
}
