//! Subcommand implementations, one module per command group.

pub mod agenda;
pub mod calendar;
pub mod config;
pub mod dream;
pub mod feed;
pub mod glossary;
pub mod miracle;
pub mod note;
pub mod profile;
pub mod today;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use miette::Result;

use obsidiana_core::assistant::Counselor;
use obsidiana_core::config::ObsidianaConfig;
use obsidiana_core::error::CoreError;
use obsidiana_core::profile::ProfileManager;
use obsidiana_core::store::Store;

use crate::output::Output;

/// Parse an ISO `YYYY-MM-DD` argument.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|cause| CoreError::invalid_date(field, value, cause))?)
}

/// Parse a 24-hour `HH:MM` (or `HH:MM:SS`) argument.
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime> {
    Ok(NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|cause| CoreError::invalid_time(field, value, cause))?)
}

/// Build the counselor from config, noting when it can only answer from
/// the local guidance texts.
pub fn counselor(config: &ObsidianaConfig, output: &Output) -> Counselor {
    let client = config.model.client();
    if !client.has_api_key() {
        output.warning(&format!(
            "{} is not set; the counselor answers from local guidance",
            config.model.api_key_env
        ));
    }
    Counselor::new(Arc::new(client))
}

/// Author name for feed writes: an explicit flag wins, then the profile
/// name, then "You".
pub async fn author_name(store: &Store, explicit: Option<&str>) -> Result<String> {
    if let Some(name) = explicit {
        return Ok(name.to_string());
    }
    let profile = ProfileManager::new(store.clone()).load().await?;
    Ok(profile.map_or_else(|| "You".to_string(), |p| p.name))
}

/// Cut long text down to one table cell.
pub fn ellipsize(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let cut: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", cut.trim_end())
    } else {
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_date_accepts_iso_only() {
        assert!(parse_date("date", "2024-03-01").is_ok());
        assert!(parse_date("date", "01/03/2024").is_err());
        assert!(parse_date("date", "2024-13-01").is_err());
    }

    #[test]
    fn test_parse_time_allows_seconds() {
        assert_eq!(
            parse_time("time", "20:30").unwrap(),
            NaiveTime::from_hms_opt(20, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time("time", "20:30:15").unwrap(),
            NaiveTime::from_hms_opt(20, 30, 15).unwrap()
        );
        assert!(parse_time("time", "25:00").is_err());
    }

    #[test]
    fn test_ellipsize_only_touches_long_text() {
        assert_eq!(ellipsize("short", 10), "short");
        assert_eq!(ellipsize("exactly ten", 11), "exactly ten");
        assert_eq!(ellipsize("a longer sentence", 8), "a longer…");
    }
}
