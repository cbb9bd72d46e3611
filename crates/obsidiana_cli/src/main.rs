mod chat;
mod commands;
mod log_writer;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::Result;
use obsidiana_core::config::{self, ObsidianaConfig};
use obsidiana_core::store::{JsonFileStore, MemoryStore, Store, StoreBackend};
use tracing::info;

#[derive(Parser)]
#[command(name = "obsidiana")]
#[command(about = "Obsidiana menstrual and lunar wellness companion")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Store file path (overrides config)
    #[arg(long)]
    store_path: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Today's cycle day, phase, moon, and miracle question
    Today {
        /// Compute for this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Include the phase recommendations
        #[arg(long)]
        detail: bool,
    },
    /// Month calendar colored by cycle phase
    Calendar {
        /// Month to show (1-12, defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Year to show (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Daily notes: mood, pain, free text
    Note {
        #[command(subcommand)]
        cmd: NoteCommands,
    },
    /// Dream journal with counselor interpretations
    Dream {
        #[command(subcommand)]
        cmd: DreamCommands,
    },
    /// Interactive chat with the Osiris counselor
    Chat,
    /// The daily miracle question
    Miracle {
        #[command(subcommand)]
        cmd: MiracleCommands,
    },
    /// The women's circle feed
    Feed {
        #[command(subcommand)]
        cmd: FeedCommands,
    },
    /// Menstrual health glossary
    Glossary {
        #[command(subcommand)]
        cmd: GlossaryCommands,
    },
    /// Lunar agenda and calendar exports
    Agenda {
        #[command(subcommand)]
        cmd: AgendaCommands,
    },
    /// Profile management
    Profile {
        #[command(subcommand)]
        cmd: ProfileCommands,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum NoteCommands {
    /// Record what a day felt like
    Add {
        /// Day to note (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free text for the day
        #[arg(long)]
        text: Option<String>,

        /// Mood emoji or word
        #[arg(long)]
        mood: Option<String>,

        /// Pain level 0-3 (none, mild, moderate, severe)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
        pain: Option<u8>,
    },
    /// Show the note for a day
    Show {
        /// Day to show (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List every noted day
    List,
    /// Clear the note for a day
    Clear {
        /// Day to clear (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
}

#[derive(Subcommand)]
enum DreamCommands {
    /// Record a dream and receive an interpretation
    Add {
        /// The dream, in your own words
        content: String,

        /// Day the dream happened (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Tag the dream (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List recorded dreams
    List {
        /// Show full content and interpretations
        #[arg(long)]
        full: bool,
    },
    /// Show one dream with its interpretation
    Show { id: String },
    /// Remove a dream from the journal
    Remove { id: String },
}

#[derive(Subcommand)]
enum MiracleCommands {
    /// Show the day's question
    Show,
    /// Answer the day's question and receive guidance
    Answer {
        /// Your answer or visualization
        text: String,
    },
}

#[derive(Subcommand)]
enum FeedCommands {
    /// Browse the circle, newest first
    List,
    /// Share an experience
    Post {
        /// What you want to share
        content: String,

        /// Tag the post (repeatable; suggested: Testimony, Physical, Cramps,
        /// Dreams, Emotional, Ritual, General)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Post under this name instead of the profile name
        #[arg(long)]
        author: Option<String>,
    },
    /// React to a post (same emoji again removes the reaction)
    React {
        id: String,

        /// Reaction emoji, e.g. one of the circle's ❤️ ✨ 🧘‍♀️
        emoji: String,
    },
    /// Comment on a post
    Comment {
        id: String,
        text: String,

        /// Comment under this name instead of the profile name
        #[arg(long)]
        author: Option<String>,
    },
}

#[derive(Subcommand)]
enum GlossaryCommands {
    /// Search terms, definitions, and keywords
    Search { query: String },
    /// List every term
    List,
}

#[derive(Subcommand)]
enum AgendaCommands {
    /// Schedule a ritual, appointment, or practice
    Add {
        title: String,

        /// Event day (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Event time (HH:MM)
        #[arg(long)]
        time: String,

        /// Kind of event: ritual, medical, practice, or other
        #[arg(long, default_value = "ritual")]
        kind: String,

        /// Skip the reminder for this event
        #[arg(long)]
        no_reminder: bool,
    },
    /// List scheduled events
    List,
    /// Remove an event
    Remove { id: String },
    /// Export the agenda as iCalendar
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a prefilled Google Calendar link for an event
    GoogleUrl { id: String },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the profile and derived figures
    Show,
    /// Create (or replace) the profile
    Init {
        #[arg(long)]
        name: String,

        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: String,

        /// First day of the last period (YYYY-MM-DD)
        #[arg(long)]
        last_period: String,

        /// Cycle length in days (20-45)
        #[arg(long, default_value_t = 28)]
        cycle_length: u32,
    },
    /// Update individual fields
    Set {
        #[arg(long)]
        name: Option<String>,

        /// First day of the most recent period (YYYY-MM-DD)
        #[arg(long)]
        last_period: Option<String>,

        /// Cycle length in days (20-45)
        #[arg(long)]
        cycle_length: Option<u32>,

        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Save current configuration to file
    Save {
        /// Path to save configuration
        #[arg(default_value = "obsidiana.toml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .rgb_colors(miette::RgbColors::Preferred)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))?;
    miette::set_panic_hook();
    let cli = Cli::parse();

    // Initialize tracing
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if cli.debug {
        // Only show debug output from the workspace crates
        EnvFilter::new("obsidiana_core=debug,obsidiana_cli=debug")
    } else {
        // Info level for the workspace crates, warn for everything else
        EnvFilter::new("obsidiana_core=info,obsidiana_cli=info,warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(log_writer::stderr_writer())
        .with_file(true)
        .with_line_number(true) // Show target module
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_timer(tracing_subscriber::fmt::time::LocalTime::rfc_3339()) // Local time in RFC 3339 format
        .compact()
        .init();

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        info!("Loading config from: {:?}", config_path);
        config::load_config(config_path).await?
    } else {
        info!("Loading config from standard locations");
        config::load_from_standard_locations().await?
    };

    // Apply CLI overrides
    if let Some(store_path) = &cli.store_path {
        info!("Overriding store path with: {:?}", store_path);
        config.store.path = Some(store_path.clone());
        config.store.ephemeral = false;
    }

    let store = open_store(&config).await?;

    match &cli.command {
        Commands::Today { date, detail } => {
            commands::today::run(&store, date.as_deref(), *detail).await?
        }
        Commands::Calendar { month, year } => {
            commands::calendar::run(&store, *month, *year).await?
        }
        Commands::Note { cmd } => match cmd {
            NoteCommands::Add {
                date,
                text,
                mood,
                pain,
            } => {
                commands::note::add(&store, date.as_deref(), text.as_deref(), mood.as_deref(), *pain)
                    .await?
            }
            NoteCommands::Show { date } => commands::note::show(&store, date.as_deref()).await?,
            NoteCommands::List => commands::note::list(&store).await?,
            NoteCommands::Clear { date } => commands::note::clear(&store, date).await?,
        },
        Commands::Dream { cmd } => match cmd {
            DreamCommands::Add {
                content,
                date,
                tags,
            } => {
                commands::dream::add(&store, &config, content, date.as_deref(), tags.clone())
                    .await?
            }
            DreamCommands::List { full } => commands::dream::list(&store, &config, *full).await?,
            DreamCommands::Show { id } => commands::dream::show(&store, &config, id).await?,
            DreamCommands::Remove { id } => commands::dream::remove(&store, &config, id).await?,
        },
        Commands::Chat => chat::run(&config).await?,
        Commands::Miracle { cmd } => match cmd {
            MiracleCommands::Show => commands::miracle::show(),
            MiracleCommands::Answer { text } => commands::miracle::answer(&config, text).await?,
        },
        Commands::Feed { cmd } => match cmd {
            FeedCommands::List => commands::feed::list(&store).await?,
            FeedCommands::Post {
                content,
                tags,
                author,
            } => commands::feed::post(&store, content, tags.clone(), author.as_deref()).await?,
            FeedCommands::React { id, emoji } => commands::feed::react(&store, id, emoji).await?,
            FeedCommands::Comment { id, text, author } => {
                commands::feed::comment(&store, id, text, author.as_deref()).await?
            }
        },
        Commands::Glossary { cmd } => match cmd {
            GlossaryCommands::Search { query } => commands::glossary::search(query),
            GlossaryCommands::List => commands::glossary::list(),
        },
        Commands::Agenda { cmd } => match cmd {
            AgendaCommands::Add {
                title,
                date,
                time,
                kind,
                no_reminder,
            } => commands::agenda::add(&store, title, date, time, kind, *no_reminder).await?,
            AgendaCommands::List => commands::agenda::list(&store).await?,
            AgendaCommands::Remove { id } => commands::agenda::remove(&store, id).await?,
            AgendaCommands::Export { output } => {
                commands::agenda::export(&store, output.as_ref()).await?
            }
            AgendaCommands::GoogleUrl { id } => commands::agenda::google_url(&store, id).await?,
        },
        Commands::Profile { cmd } => match cmd {
            ProfileCommands::Show => commands::profile::show(&store).await?,
            ProfileCommands::Init {
                name,
                birth_date,
                last_period,
                cycle_length,
            } => {
                commands::profile::init(&store, name, birth_date, last_period, *cycle_length)
                    .await?
            }
            ProfileCommands::Set {
                name,
                last_period,
                cycle_length,
                email,
            } => {
                commands::profile::set(
                    &store,
                    name.as_deref(),
                    last_period.as_deref(),
                    *cycle_length,
                    email.as_deref(),
                )
                .await?
            }
        },
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => commands::config::show(&config).await?,
            ConfigCommands::Save { path } => commands::config::save(&config, path).await?,
        },
    }

    Ok(())
}

/// Open the backend named by the configuration.
async fn open_store(config: &ObsidianaConfig) -> Result<Store> {
    let backend: Arc<dyn StoreBackend> = if config.store.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::open(config.store.resolved_path()).await?)
    };
    Ok(Store::new(backend))
}
