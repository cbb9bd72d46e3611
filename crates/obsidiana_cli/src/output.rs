use owo_colors::OwoColorize;

use obsidiana_core::cycle::CyclePhase;
use obsidiana_core::markdown::{self, Block, HeadingLevel, Inline};
use obsidiana_core::moon::MoonPhase;

/// Standard output formatting for the CLI
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    /// Print a counselor reply with markdown formatting
    pub fn counselor_message(&self, speaker: &str, content: &str) {
        // Clear visual separation without box drawing chars
        println!();
        println!("{} {}", speaker.bright_cyan().bold(), "says:".dimmed());
        println!();
        self.markdown(content);
        println!();
    }

    /// Print markdown content through the parsed-block renderer
    pub fn markdown(&self, content: &str) {
        println!("{}", render_markdown(content));
    }

    /// Print a system/status message (indented)
    pub fn status(&self, message: &str) {
        println!("  {}", message.dimmed());
    }

    /// Print an info message (indented)
    pub fn info(&self, label: &str, value: &str) {
        println!("  {} {}", label.bright_blue(), value);
    }

    /// Print a success message (indented)
    pub fn success(&self, message: &str) {
        println!("  {} {}", "✓".bright_green(), message);
    }

    /// Print an error message (indented)
    pub fn error(&self, message: &str) {
        println!("  {} {}", "✗".bright_red(), message);
    }

    /// Print a warning message (indented)
    pub fn warning(&self, message: &str) {
        println!("  {} {}", "⚠".yellow(), message);
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        println!();
        println!("{}", title.bright_cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
    }

    /// Print a key-value pair (indented)
    pub fn kv(&self, key: &str, value: &str) {
        println!("  {} {}", format!("{}:", key).dimmed(), value);
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the assistant's markdown subset to a styled string.
///
/// Returned as a string rather than printed so the chat loop can push it
/// through rustyline's shared writer.
pub fn render_markdown(content: &str) -> String {
    markdown::parse(content)
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Heading { level, text } => match level {
            HeadingLevel::H2 => text.bright_cyan().bold().to_string(),
            HeadingLevel::H3 => text.cyan().bold().to_string(),
        },
        Block::NumberedItem { number, content } => {
            format!(
                "  {} {}",
                format!("{}.", number).bright_blue(),
                render_inlines(content)
            )
        }
        Block::Paragraph(spans) => render_inlines(spans),
        Block::Blank => String::new(),
    }
}

fn render_inlines(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(text) => text.clone(),
            Inline::Bold(text) => text.bright_white().bold().to_string(),
        })
        .collect()
}

/// Colored phase name for cards and the calendar legend
pub fn format_phase(phase: CyclePhase) -> String {
    match phase {
        CyclePhase::Menstrual => "Menstrual".bright_red().to_string(),
        CyclePhase::Follicular => "Follicular".bright_green().to_string(),
        CyclePhase::Ovulatory => "Ovulatory".bright_yellow().to_string(),
        CyclePhase::Luteal => "Luteal".bright_magenta().to_string(),
    }
}

/// Emoji for each of the eight display phases
pub fn moon_glyph(phase: MoonPhase) -> &'static str {
    match phase {
        MoonPhase::NewMoon => "🌑",
        MoonPhase::WaxingCrescent => "🌒",
        MoonPhase::FirstQuarter => "🌓",
        MoonPhase::WaxingGibbous => "🌔",
        MoonPhase::FullMoon => "🌕",
        MoonPhase::WaningGibbous => "🌖",
        MoonPhase::LastQuarter => "🌗",
        MoonPhase::WaningCrescent => "🌘",
    }
}

/// Format a timestamp as relative time
pub fn format_relative_time(time: chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let duration = now.signed_duration_since(time);

    if duration.num_seconds() < 60 {
        format!("{} seconds ago", duration.num_seconds())
            .dimmed()
            .to_string()
    } else if duration.num_minutes() < 60 {
        format!("{} minutes ago", duration.num_minutes())
            .dimmed()
            .to_string()
    } else if duration.num_hours() < 24 {
        format!("{} hours ago", duration.num_hours())
            .dimmed()
            .to_string()
    } else if duration.num_days() < 30 {
        format!("{} days ago", duration.num_days())
            .dimmed()
            .to_string()
    } else {
        time.format("%Y-%m-%d").to_string().dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_markdown_blocks_keep_their_text() {
        let rendered = render_markdown("### Goal\nwalk **barefoot** daily\n\n1. breathe");
        assert!(rendered.contains("Goal"));
        assert!(rendered.contains("barefoot"));
        assert!(rendered.contains("1."));
        // Blank lines survive as separators
        assert_eq!(rendered.matches('\n').count(), 3);
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc::now();
        assert!(format_relative_time(now - Duration::seconds(10)).contains("seconds ago"));
        assert!(format_relative_time(now - Duration::minutes(5)).contains("minutes ago"));
        assert!(format_relative_time(now - Duration::hours(3)).contains("hours ago"));
        assert!(format_relative_time(now - Duration::days(2)).contains("days ago"));
        // Older than a month falls back to the date
        let old = format_relative_time(now - Duration::days(90));
        assert!(old.contains('-'));
    }

    #[test]
    fn test_every_moon_phase_has_a_glyph() {
        for index in 0..8u8 {
            assert!(!moon_glyph(obsidiana_core::moon::MoonPhase::from_index(index)).is_empty());
        }
    }
}
