use chrono::{Days, Local};
use miette::Result;
use owo_colors::OwoColorize;

use obsidiana_core::profile::{ProfileManager, UserProfile};
use obsidiana_core::store::Store;

use crate::commands::parse_date;
use crate::output::Output;

/// Show the recorded profile and what the calculators derive from it
pub async fn show(store: &Store) -> Result<()> {
    let output = Output::new();
    let profile = ProfileManager::new(store.clone()).require().await?;
    let today = Local::now().date_naive();

    output.section(&profile.name);
    output.kv("born", &profile.birth_date.to_string());
    output.kv("age", &format!("{} years", profile.age_in_years(today)));
    if let Some(email) = &profile.email {
        output.kv("email", email);
    }
    println!();
    output.kv("last period", &profile.last_period.to_string());
    output.kv("cycle length", &format!("{} days", profile.cycle_length));
    let next = profile
        .last_period
        .checked_add_days(Days::new(profile.cycle_length as u64));
    if let Some(next) = next {
        output.kv("next period around", &next.to_string());
    }
    output.kv(
        "creative reserve",
        &format!("{} fertile moons ahead", profile.creative_reserve(today)),
    );
    println!();
    Ok(())
}

/// Create (or replace) the profile
pub async fn init(
    store: &Store,
    name: &str,
    birth_date: &str,
    last_period: &str,
    cycle_length: u32,
) -> Result<()> {
    let output = Output::new();
    let manager = ProfileManager::new(store.clone());

    let birth_date = parse_date("birth-date", birth_date)?;
    let last_period = parse_date("last-period", last_period)?;
    let profile = UserProfile::new(name, birth_date, last_period, cycle_length)?;

    if let Some(existing) = manager.load().await? {
        output.warning(&format!("Replacing the existing profile for {}", existing.name));
    }
    manager.save(&profile).await?;

    output.success(&format!(
        "Welcome, {}. The companion now follows your cycle.",
        profile.name.bright_cyan()
    ));
    Ok(())
}

/// Update individual profile fields
pub async fn set(
    store: &Store,
    name: Option<&str>,
    last_period: Option<&str>,
    cycle_length: Option<u32>,
    email: Option<&str>,
) -> Result<()> {
    let output = Output::new();
    let manager = ProfileManager::new(store.clone());
    let mut profile = manager.require().await?;

    let mut changed = false;
    if let Some(name) = name {
        profile.name = name.to_string();
        changed = true;
    }
    if let Some(raw) = last_period {
        profile.record_period(parse_date("last-period", raw)?);
        changed = true;
    }
    if let Some(length) = cycle_length {
        profile.set_cycle_length(length)?;
        changed = true;
    }
    if let Some(email) = email {
        profile.email = Some(email.to_string());
        changed = true;
    }

    if !changed {
        output.status("Nothing to change");
        return Ok(());
    }

    manager.save(&profile).await?;
    output.success("Profile updated");
    Ok(())
}
