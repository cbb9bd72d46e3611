//! Interactive chat loop with the Osiris counselor.

use std::io::Write;
use std::sync::Arc;

use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use rustyline_async::{Readline, ReadlineEvent};

use obsidiana_core::assistant::{ChatSession, Counselor};
use obsidiana_core::config::ObsidianaConfig;

use crate::log_writer;
use crate::output::{Output, render_markdown};

/// Chat with the counselor
pub async fn run(config: &ObsidianaConfig) -> Result<()> {
    let output = Output::new();

    output.section("Osiris Counselor");
    output.status("Type 'quit' or 'exit' to leave the chat");

    let client = config.model.client();
    if !client.has_api_key() {
        output.warning(&format!(
            "{} is not set; replies come from the local guidance texts",
            config.model.api_key_env
        ));
    }
    let counselor = Counselor::new(Arc::new(client));
    let mut session = ChatSession::new();

    let (mut rl, mut writer) = Readline::new(format!("{} ", ">".bright_blue())).into_diagnostic()?;

    // Logs emitted while the prompt is live must go through its writer
    log_writer::attach(writer.clone());

    loop {
        let event = rl.readline().await;
        match event {
            Ok(ReadlineEvent::Line(line)) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                if line == "quit" || line == "exit" {
                    writeln!(writer, "  {}", "Goodbye!".dimmed()).into_diagnostic()?;
                    break;
                }

                rl.add_history_entry(line.clone());
                session.record_user(&line);

                writeln!(writer, "  {}", "Consulting the obsidian...".dimmed())
                    .into_diagnostic()?;
                let reply = counselor.chat(&line).await;
                session.record_counselor(&reply.text);

                writeln!(writer).into_diagnostic()?;
                writeln!(
                    writer,
                    "{} {}",
                    "Osiris".bright_cyan().bold(),
                    "says:".dimmed()
                )
                .into_diagnostic()?;
                writeln!(writer).into_diagnostic()?;
                writeln!(writer, "{}", render_markdown(&reply.text)).into_diagnostic()?;
                writeln!(writer).into_diagnostic()?;
            }
            Ok(ReadlineEvent::Interrupted) => {
                writeln!(writer, "  {}", "CTRL-C".dimmed()).into_diagnostic()?;
                continue;
            }
            Ok(ReadlineEvent::Eof) => {
                writeln!(writer, "  {}", "CTRL-D".dimmed()).into_diagnostic()?;
                break;
            }
            Err(err) => {
                output.error(&format!("Error: {:?}", err));
                break;
            }
        }
    }

    log_writer::detach();
    drop(rl);

    if !session.is_empty() {
        output.status(&format!(
            "{} messages exchanged this session",
            session.messages().len()
        ));
    }
    Ok(())
}
