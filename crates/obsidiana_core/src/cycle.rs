//! Menstrual cycle day and phase calculator.
//!
//! Pure date arithmetic anchored on the first day of the last period.
//! Persistence and display live elsewhere; everything here is total for
//! validated input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Shortest cycle length accepted at the input boundary, in days.
pub const MIN_CYCLE_LENGTH: u32 = 20;

/// Longest cycle length accepted at the input boundary, in days.
pub const MAX_CYCLE_LENGTH: u32 = 45;

/// Validated cycle configuration.
///
/// `cycle_length` is checked once at construction; the calculators assume
/// the invariant `MIN_CYCLE_LENGTH <= cycle_length <= MAX_CYCLE_LENGTH`
/// and never re-validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleParameters {
    reference_date: NaiveDate,
    cycle_length: u32,
}

impl CycleParameters {
    pub fn new(reference_date: NaiveDate, cycle_length: u32) -> Result<Self> {
        if !(MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&cycle_length) {
            return Err(CoreError::invalid_cycle_length(cycle_length));
        }
        Ok(Self {
            reference_date,
            cycle_length,
        })
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn cycle_length(&self) -> u32 {
        self.cycle_length
    }
}

/// One of the four phases of the menstrual cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulatory,
    Luteal,
}

/// Where a date falls within the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleResult {
    /// 1-based day of the cycle, always within `1..=cycle_length`.
    pub cycle_day: u32,
    pub phase: CyclePhase,
}

/// Compute the cycle day and phase for `as_of`.
///
/// Days wrap modulo the cycle length, so dates before the reference still
/// land on a valid day: the cycle is treated as periodic in both
/// directions.
pub fn compute_cycle(params: &CycleParameters, as_of: NaiveDate) -> CycleResult {
    let elapsed = as_of
        .signed_duration_since(params.reference_date())
        .num_days();
    let cycle_day = elapsed.rem_euclid(params.cycle_length() as i64) as u32 + 1;

    CycleResult {
        cycle_day,
        phase: CyclePhase::from_cycle_day(cycle_day),
    }
}

/// Fraction of the cycle completed as a percentage, capped at 100.
pub fn cycle_progress(params: &CycleParameters, as_of: NaiveDate) -> f64 {
    let day = compute_cycle(params, as_of).cycle_day;
    ((day as f64 / params.cycle_length() as f64) * 100.0).min(100.0)
}

impl CyclePhase {
    /// Classify a day of the cycle.
    ///
    /// Boundaries are inclusive: days 1-6 menstrual, 7-13 follicular,
    /// 14-20 ovulatory, 21 through the end of the cycle luteal.
    pub fn from_cycle_day(cycle_day: u32) -> Self {
        match cycle_day {
            1..=6 => Self::Menstrual,
            7..=13 => Self::Follicular,
            14..=20 => Self::Ovulatory,
            _ => Self::Luteal,
        }
    }

    /// Display details for this phase (archetype, guidance, practices).
    pub fn details(&self) -> &'static PhaseDetails {
        match self {
            Self::Menstrual => &MENSTRUAL,
            Self::Follicular => &FOLLICULAR,
            Self::Ovulatory => &OVULATORY,
            Self::Luteal => &LUTEAL,
        }
    }

    pub fn title(&self) -> &'static str {
        self.details().title
    }
}

/// Guidance attached to each phase, drawn from the cycle-archetype
/// chapters of the companion book.
#[derive(Debug, Clone, Copy)]
pub struct PhaseDetails {
    pub title: &'static str,
    pub archetype: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, Copy)]
pub struct Recommendations {
    pub exercise: &'static str,
    pub energy: &'static str,
    pub practice: &'static str,
}

static MENSTRUAL: PhaseDetails = PhaseDetails {
    title: "Menstrual Phase",
    archetype: "The Crone",
    summary: "A time of deep introspection and renewal.",
    description: "Your energy turns inward. This is your personal winter, \
         when the body cleanses itself and the soul empties out whatever no \
         longer serves.",
    recommendations: Recommendations {
        exercise: "Skip high-impact training. Favor gentle stretching, yoga \
             nidra, or plain rest; the body wants to conserve energy.",
        energy: "Low. Prioritize sleep and moments of silence.",
        practice: "Cleanse the obsidian egg and sit with an emptying meditation.",
    },
};

static FOLLICULAR: PhaseDetails = PhaseDetails {
    title: "Follicular Phase",
    archetype: "The Maiden",
    summary: "Rebirth, clarity, and new beginnings.",
    description: "Energy starts to climb. You feel more dynamic, more \
         analytical, ready to plan and start projects. The spring of your \
         cycle.",
    recommendations: Recommendations {
        exercise: "A great window for cardio, strength work, and learning new \
             routines. Endurance is at its best.",
        energy: "High and focused, with good concentration.",
        practice: "Set intentions with the obsidian.",
    },
};

static OVULATORY: PhaseDetails = PhaseDetails {
    title: "Ovulatory Phase",
    archetype: "The Mother",
    summary: "Fullness, communication, and magnetism.",
    description: "Maximum openness toward the outside. You feel more \
         empathetic and drawn to socialize. The radiant summer of your \
         cycle.",
    recommendations: Recommendations {
        exercise: "Group activities, dance, or social sports. You feel \
             flexible and expansive.",
        energy: "At its peak. Personal magnetism is heightened.",
        practice: "Gratitude meditation and connection with fertility, \
             creative or biological.",
    },
};

static LUTEAL: PhaseDetails = PhaseDetails {
    title: "Luteal Phase",
    archetype: "The Enchantress",
    summary: "Intuition, truth, and preparation.",
    description: "Energy turns critical and intuitive. This is the moment to \
         spot what needs adjusting in your life; creativity runs freer and \
         wilder.",
    recommendations: Recommendations {
        exercise: "Lower the intensity. Pilates, long walks, or gentle \
             swimming. You may feel heavier than usual.",
        energy: "Descending and introspective. Irritability can surface when \
             the need for solitude goes unheard.",
        practice: "Shadow work with the obsidian to release tension.",
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn params(len: u32) -> CycleParameters {
        CycleParameters::new(date(2024, 3, 1), len).unwrap()
    }

    #[test]
    fn test_cycle_length_bounds() {
        assert!(CycleParameters::new(date(2024, 3, 1), 19).is_err());
        assert!(CycleParameters::new(date(2024, 3, 1), 46).is_err());
        assert!(CycleParameters::new(date(2024, 3, 1), 20).is_ok());
        assert!(CycleParameters::new(date(2024, 3, 1), 45).is_ok());
        assert!(CycleParameters::new(date(2024, 3, 1), 0).is_err());
    }

    #[test]
    fn test_reference_date_is_day_one() {
        let result = compute_cycle(&params(28), date(2024, 3, 1));
        assert_eq!(result.cycle_day, 1);
        assert_eq!(result.phase, CyclePhase::Menstrual);
    }

    #[test]
    fn test_day_seven_enters_follicular() {
        // Six days after the reference is day 7, the first follicular day
        let result = compute_cycle(&params(28), date(2024, 3, 7));
        assert_eq!(result.cycle_day, 7);
        assert_eq!(result.phase, CyclePhase::Follicular);
    }

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(CyclePhase::from_cycle_day(1), CyclePhase::Menstrual);
        assert_eq!(CyclePhase::from_cycle_day(6), CyclePhase::Menstrual);
        assert_eq!(CyclePhase::from_cycle_day(7), CyclePhase::Follicular);
        assert_eq!(CyclePhase::from_cycle_day(13), CyclePhase::Follicular);
        assert_eq!(CyclePhase::from_cycle_day(14), CyclePhase::Ovulatory);
        assert_eq!(CyclePhase::from_cycle_day(20), CyclePhase::Ovulatory);
        assert_eq!(CyclePhase::from_cycle_day(21), CyclePhase::Luteal);
        assert_eq!(CyclePhase::from_cycle_day(45), CyclePhase::Luteal);
    }

    #[test]
    fn test_cycle_day_always_in_range() {
        for len in [20, 28, 45] {
            let p = params(len);
            // Sweep three cycles either side of the reference
            for offset in -(3 * len as i64)..=(3 * len as i64) {
                let day = date(2024, 3, 1) + chrono::Duration::days(offset);
                let result = compute_cycle(&p, day);
                assert!(
                    result.cycle_day >= 1 && result.cycle_day <= len,
                    "day {} out of range for length {} at offset {}",
                    result.cycle_day,
                    len,
                    offset
                );
            }
        }
    }

    #[test]
    fn test_periodicity() {
        let p = params(28);
        for offset in 0..28i64 {
            let day = date(2024, 3, 1) + chrono::Duration::days(offset);
            let next_cycle = day + chrono::Duration::days(28);
            assert_eq!(compute_cycle(&p, day), compute_cycle(&p, next_cycle));
        }
    }

    #[test]
    fn test_dates_before_reference_wrap() {
        // One day before the reference is the last day of the previous cycle
        let result = compute_cycle(&params(28), date(2024, 2, 29));
        assert_eq!(result.cycle_day, 28);
        assert_eq!(result.phase, CyclePhase::Luteal);
    }

    #[test]
    fn test_short_cycle_ends_luteal() {
        // With a 20-day cycle, day 20 is still ovulatory and the luteal
        // window collapses to nothing on the following wrap
        let result = compute_cycle(&params(20), date(2024, 3, 20));
        assert_eq!(result.cycle_day, 20);
        assert_eq!(result.phase, CyclePhase::Ovulatory);
    }

    #[test]
    fn test_progress_caps_at_hundred() {
        let p = params(20);
        let progress = cycle_progress(&p, date(2024, 3, 20));
        assert_eq!(progress, 100.0);

        let early = cycle_progress(&p, date(2024, 3, 1));
        assert_eq!(early, 5.0);
    }

    #[test]
    fn test_phase_details_expose_archetypes() {
        assert_eq!(CyclePhase::Menstrual.details().archetype, "The Crone");
        assert_eq!(CyclePhase::Follicular.details().archetype, "The Maiden");
        assert_eq!(CyclePhase::Ovulatory.details().archetype, "The Mother");
        assert_eq!(CyclePhase::Luteal.details().archetype, "The Enchantress");
    }
}
