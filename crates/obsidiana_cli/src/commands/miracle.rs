use chrono::Local;
use miette::Result;
use owo_colors::OwoColorize;

use obsidiana_core::assistant::{self, MiracleQuestion};
use obsidiana_core::config::ObsidianaConfig;

use crate::output::Output;

fn question_of_the_day() -> &'static MiracleQuestion {
    assistant::question_for_date(Local::now().date_naive())
}

/// Show the day's miracle question
pub fn show() {
    let output = Output::new();
    let question = question_of_the_day();

    output.section("Miracle Question");
    println!("  {}", question.question.bright_white().bold());
    output.kv("theme", question.theme);
    println!();
    output.status("Answer with: obsidiana miracle answer \"<your words>\"");
}

/// Send an answer or visualization to the counselor for guidance
pub async fn answer(config: &ObsidianaConfig, text: &str) -> Result<()> {
    let output = Output::new();
    let question = question_of_the_day();

    output.section("Miracle Question");
    println!("  {}", question.question.bright_white().bold());

    let counselor = super::counselor(config, &output);
    output.status("Consulting the obsidian...");
    let reply = counselor.miracle_feedback(question.question, text).await;

    output.counselor_message("Osiris", &reply.text);
    if reply.is_fallback() {
        output.status("Saved wisdom shown; set the API key for a live reading");
    }
    Ok(())
}
