//! User profile and the creative-reserve countdown.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cycle::CycleParameters;
use crate::error::{CoreError, Result};
use crate::store::{Store, StoreKey};

/// Age at which the companion stops counting fertile lunations.
const MENOPAUSE_AGE: i32 = 51;

/// Average lunations per calendar year.
const CYCLES_PER_YEAR: f64 = 13.3;

/// The single local user of the companion.
///
/// `cycle_length` is only ever set through the validating paths, so it
/// stays within the accepted range once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub birth_date: NaiveDate,
    pub last_period: NaiveDate,
    pub cycle_length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

impl UserProfile {
    pub fn new(
        name: impl Into<String>,
        birth_date: NaiveDate,
        last_period: NaiveDate,
        cycle_length: u32,
    ) -> Result<Self> {
        CycleParameters::new(last_period, cycle_length)?;
        Ok(Self {
            name: name.into(),
            birth_date,
            last_period,
            cycle_length,
            email: None,
            avatar_url: None,
            cover_url: None,
        })
    }

    /// Cycle configuration derived from the recorded period data.
    pub fn cycle_parameters(&self) -> Result<CycleParameters> {
        CycleParameters::new(self.last_period, self.cycle_length)
    }

    pub fn set_cycle_length(&mut self, cycle_length: u32) -> Result<()> {
        CycleParameters::new(self.last_period, cycle_length)?;
        self.cycle_length = cycle_length;
        Ok(())
    }

    pub fn record_period(&mut self, date: NaiveDate) {
        self.last_period = date;
    }

    /// Age in whole calendar years.
    pub fn age_in_years(&self, as_of: NaiveDate) -> i32 {
        as_of.year() - self.birth_date.year()
    }

    /// Estimated fertile lunations left before menopause.
    pub fn creative_reserve(&self, as_of: NaiveDate) -> u32 {
        let years_remaining = (MENOPAUSE_AGE - self.age_in_years(as_of)).max(0);
        (years_remaining as f64 * CYCLES_PER_YEAR).floor() as u32
    }
}

/// Storage schema: at most one profile, absent until onboarding.
pub struct ProfileKey;

impl StoreKey for ProfileKey {
    const KEY: &'static str = "profile";
    type Value = Option<UserProfile>;
}

/// Store-backed access to the profile document.
#[derive(Debug, Clone)]
pub struct ProfileManager {
    store: Store,
}

impl ProfileManager {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Option<UserProfile>> {
        self.store.get::<ProfileKey>().await
    }

    /// Load the profile, treating its absence as an error. Most commands
    /// need one to exist.
    pub async fn require(&self) -> Result<UserProfile> {
        self.load().await?.ok_or(CoreError::ProfileMissing)
    }

    pub async fn save(&self, profile: &UserProfile) -> Result<()> {
        self.store.put::<ProfileKey>(&Some(profile.clone())).await
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

    fn profile() -> UserProfile {
        UserProfile::new("Ana", date(1994, 6, 12), date(2024, 3, 1), 28).unwrap()
    }

    #[test]
    fn test_cycle_length_validated_on_construction() {
        let err = UserProfile::new("Ana", date(1994, 6, 12), date(2024, 3, 1), 19);
        assert!(err.is_err());
    }

    #[test]
    fn test_set_cycle_length_validates() {
        let mut profile = profile();
        assert!(profile.set_cycle_length(46).is_err());
        assert_eq!(profile.cycle_length, 28);
        assert!(profile.set_cycle_length(30).is_ok());
        assert_eq!(profile.cycle_length, 30);
    }

    #[test]
    fn test_creative_reserve() {
        let profile = profile();
        // 30 years old in 2024: 21 years of lunations left
        assert_eq!(profile.age_in_years(date(2024, 3, 1)), 30);
        assert_eq!(profile.creative_reserve(date(2024, 3, 1)), 279);
    }

    #[test]
    fn test_creative_reserve_floors_at_zero() {
        let profile = UserProfile::new("Rosa", date(1960, 1, 1), date(2024, 3, 1), 28).unwrap();
        assert_eq!(profile.creative_reserve(date(2024, 3, 1)), 0);
    }

    #[tokio::test]
    async fn test_manager_round_trip() {
        let manager = ProfileManager::new(Store::new(Arc::new(MemoryStore::new())));
        assert!(manager.load().await.unwrap().is_none());

        let profile = profile();
        manager.save(&profile).await.unwrap();
        assert_eq!(manager.require().await.unwrap(), profile);
    }

    #[tokio::test]
    async fn test_require_without_profile_errors() {
        let manager = ProfileManager::new(Store::new(Arc::new(MemoryStore::new())));
        let err = manager.require().await.unwrap_err();
        assert!(matches!(err, CoreError::ProfileMissing));
    }
}
