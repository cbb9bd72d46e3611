use chrono::{Datelike, Local, NaiveDate};
use miette::Result;
use owo_colors::OwoColorize;

use obsidiana_core::cycle::{CycleParameters, CyclePhase, compute_cycle};
use obsidiana_core::notes::{CalendarNotes, NotesManager};
use obsidiana_core::profile::ProfileManager;
use obsidiana_core::store::Store;

use crate::output::{Output, format_phase};

/// One month laid out Monday-first. Six week rows cover any layout.
struct MonthGrid {
    first: NaiveDate,
    cells: [[Option<NaiveDate>; 7]; 6],
}

impl MonthGrid {
    fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let offset = first.weekday().num_days_from_monday() as usize;

        let mut cells = [[None; 7]; 6];
        for day in first.iter_days().take_while(|d| d.month() == month) {
            let pos = offset + day.day0() as usize;
            cells[pos / 7][pos % 7] = Some(day);
        }
        Some(Self { first, cells })
    }
}

/// Month calendar with per-day phase coloring and note markers
pub async fn run(store: &Store, month: Option<u32>, year: Option<i32>) -> Result<()> {
    let output = Output::new();
    let today = Local::now().date_naive();
    let month = month.unwrap_or(today.month());
    let year = year.unwrap_or(today.year());

    let Some(grid) = MonthGrid::new(year, month) else {
        miette::bail!("{}-{:02} is not a representable month", year, month);
    };

    let profile = ProfileManager::new(store.clone()).load().await?;
    let params = match &profile {
        Some(profile) => Some(profile.cycle_parameters()?),
        None => None,
    };
    let notes = NotesManager::new(store.clone()).all().await?;

    output.section(&grid.first.format("%B %Y").to_string());
    println!("  {}", "Mo Tu We Th Fr Sa Su".dimmed());

    for row in &grid.cells {
        if row.iter().all(Option::is_none) {
            continue;
        }
        let mut line = String::from("  ");
        for cell in row {
            match cell {
                Some(date) => {
                    line.push_str(&render_day(*date, today, params.as_ref(), &notes));
                    line.push(' ');
                }
                None => line.push_str("    "),
            }
        }
        println!("{}", line.trim_end());
    }

    println!();
    if params.is_some() {
        println!(
            "  {}  {}  {}  {}",
            format_phase(CyclePhase::Menstrual),
            format_phase(CyclePhase::Follicular),
            format_phase(CyclePhase::Ovulatory),
            format_phase(CyclePhase::Luteal),
        );
    } else {
        output.warning("No profile recorded; days are not phase-colored");
    }
    output.status("• marks a day with a note; today is underlined");
    println!();
    Ok(())
}

/// Two-digit day, phase-colored, with a trailing note marker.
fn render_day(
    date: NaiveDate,
    today: NaiveDate,
    params: Option<&CycleParameters>,
    notes: &CalendarNotes,
) -> String {
    let text = format!("{:>2}", date.day());

    let text = match params.map(|p| compute_cycle(p, date).phase) {
        Some(CyclePhase::Menstrual) => text.bright_red().to_string(),
        Some(CyclePhase::Follicular) => text.bright_green().to_string(),
        Some(CyclePhase::Ovulatory) => text.bright_yellow().to_string(),
        Some(CyclePhase::Luteal) => text.bright_magenta().to_string(),
        None => text,
    };
    let text = if date == today {
        text.underline().to_string()
    } else {
        text
    };

    let marker = if notes.get(date).is_some() { '•' } else { ' ' };
    format!("{}{}", text, marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day_numbers(grid: &MonthGrid) -> Vec<(usize, usize, u32)> {
        let mut found = Vec::new();
        for (row, cells) in grid.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Some(date) = cell {
                    found.push((row, col, date.day()));
                }
            }
        }
        found
    }

    #[test]
    fn test_march_2024_layout() {
        // March 2024 starts on a Friday
        let grid = MonthGrid::new(2024, 3).unwrap();
        let days = day_numbers(&grid);
        assert_eq!(days.first(), Some(&(0, 4, 1)));
        assert_eq!(days.last(), Some(&(4, 6, 31)));
        assert_eq!(days.len(), 31);
    }

    #[test]
    fn test_leap_february_has_29_cells() {
        let grid = MonthGrid::new(2024, 2).unwrap();
        assert_eq!(day_numbers(&grid).len(), 29);
        assert_eq!(day_numbers(&MonthGrid::new(2023, 2).unwrap()).len(), 28);
    }

    #[test]
    fn test_month_spilling_into_sixth_row() {
        // December 2024 starts on a Sunday, pushing day 31 to row five
        let grid = MonthGrid::new(2024, 12).unwrap();
        let days = day_numbers(&grid);
        assert_eq!(days.first(), Some(&(0, 6, 1)));
        assert_eq!(days.last(), Some(&(5, 1, 31)));
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        assert!(MonthGrid::new(2024, 13).is_none());
        assert!(MonthGrid::new(2024, 0).is_none());
    }
}
