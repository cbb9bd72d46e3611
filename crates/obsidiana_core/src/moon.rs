//! Lunar phase calculator.
//!
//! Derives the moon's phase from a fixed reference new moon and the mean
//! synodic month. All arithmetic is in UTC so results don't drift with
//! the host time zone.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Mean length of a synodic month, in days.
pub const SYNODIC_MONTH: f64 = 29.53058867;

/// Known new moon used as the phase origin: 2023-01-21 20:53 UTC.
pub fn reference_new_moon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 21, 20, 53, 0).unwrap()
}

/// The eight display phases of the moon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Map a phase slot (0-7) to its phase. Slot 0 is the new moon,
    /// slot 4 the full moon.
    pub fn from_index(index: u8) -> Self {
        match index % 8 {
            0 => Self::NewMoon,
            1 => Self::WaxingCrescent,
            2 => Self::FirstQuarter,
            3 => Self::WaxingGibbous,
            4 => Self::FullMoon,
            5 => Self::WaningGibbous,
            6 => Self::LastQuarter,
            _ => Self::WaningCrescent,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Self::NewMoon => 0,
            Self::WaxingCrescent => 1,
            Self::FirstQuarter => 2,
            Self::WaxingGibbous => 3,
            Self::FullMoon => 4,
            Self::WaningGibbous => 5,
            Self::LastQuarter => 6,
            Self::WaningCrescent => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }

    /// One-line guidance shown next to the phase.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::NewMoon => "Plant intentions",
            Self::WaxingCrescent => "Visualize and project",
            Self::FirstQuarter => "Action and growth",
            Self::WaxingGibbous => "Refine your work",
            Self::FullMoon => "Fullness and manifestation",
            Self::WaningGibbous => "Give thanks and share",
            Self::LastQuarter => "Release what weighs on you",
            Self::WaningCrescent => "Rest and cleansing",
        }
    }
}

/// Lunar state at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonResult {
    pub phase: MoonPhase,
    /// Phase slot 0-7; always `phase.index()`.
    pub phase_index: u8,
    /// Position within the synodic month, in `[0, 1)`. 0 is the new
    /// moon, 0.5 the full moon.
    pub synodic_fraction: f64,
    /// Ordinal of the lunation within `year`, starting at 1.
    pub moon_number_in_year: u32,
    pub year: i32,
}

/// Compute the moon phase and lunation ordinal for an instant.
///
/// The fraction wraps with Euclidean remainder, so instants before the
/// reference new moon still produce a fraction in `[0, 1)`. Total for
/// every representable `DateTime<Utc>`.
pub fn compute_moon_phase(as_of: DateTime<Utc>) -> MoonResult {
    let reference = reference_new_moon();
    let diff_days = fractional_days(as_of - reference);

    let phase_cycle = diff_days.rem_euclid(SYNODIC_MONTH);
    let synodic_fraction = phase_cycle / SYNODIC_MONTH;
    let phase_index = ((synodic_fraction * 8.0).floor() as u8) % 8;

    // Lunations since the reference, minus lunations at the start of the
    // year, counts the moons of the current calendar year from 1.
    let year = as_of.year();
    let year_start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap();
    let days_to_year_start = fractional_days(year_start - reference);

    let moons_since_reference = (diff_days / SYNODIC_MONTH).floor() as i64;
    let moons_at_year_start = (days_to_year_start / SYNODIC_MONTH).floor() as i64;
    let moon_number_in_year = (moons_since_reference - moons_at_year_start + 1) as u32;

    MoonResult {
        phase: MoonPhase::from_index(phase_index),
        phase_index,
        synodic_fraction,
        moon_number_in_year,
        year,
    }
}

fn fractional_days(duration: chrono::Duration) -> f64 {
    duration.num_seconds() as f64 / 86_400.0
}
