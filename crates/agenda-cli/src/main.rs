//! `agenda` CLI: build an ordered agenda from calendar events and tasks.
//!
//! ## Usage
//!
//! ```sh
//! # Build the agenda as JSON (stdin -> stdout)
//! cat records.json | agenda build
//!
//! # Use a settings file and a fixed "now"
//! agenda build -i records.json -s agenda.toml --now 2026-10-18T09:00:00Z --pretty
//!
//! # Human-readable listing
//! agenda list -i records.json
//!
//! # Show the effective settings after file and AGENDA_* overrides
//! agenda settings -s agenda.toml
//! ```

mod config;
mod render;

use std::io::{self, Read};
use std::path::PathBuf;

use agenda_engine::settings::ClockMode;
use agenda_engine::{build_agenda_from_raw, ProviderStatus, RawRecord, Settings};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agenda", version, about = "Agenda builder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the agenda and print it as JSON
    Build {
        #[command(flatten)]
        run: RunArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Build the agenda and print it as plain text
    List {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Print the effective settings as JSON
    Settings {
        /// Settings file (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Input file with records (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Settings file (TOML, or JSON with a .json extension)
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// Freeze the clock at this RFC 3339 instant
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

/// Records either as a bare array or wrapped with the provider status.
#[derive(Deserialize)]
#[serde(untagged)]
enum InputDocument {
    Rows(Vec<RawRecord>),
    #[serde(rename_all = "camelCase")]
    Wrapped {
        records: Vec<RawRecord>,
        #[serde(default)]
        provider_status: ProviderStatus,
    },
}

impl InputDocument {
    fn into_parts(self) -> (Vec<RawRecord>, ProviderStatus) {
        match self {
            InputDocument::Rows(rows) => (rows, ProviderStatus::Ready),
            InputDocument::Wrapped {
                records,
                provider_status,
            } => (records, provider_status),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Commands::Build {
            run,
            output,
            pretty,
        } => {
            let (entries, _) = run_agenda(&run)?;
            let json = if pretty {
                serde_json::to_string_pretty(&entries)?
            } else {
                serde_json::to_string(&entries)?
            };
            write_output(output.as_ref(), &json)?;
        }
        Commands::List { run } => {
            let (entries, settings) = run_agenda(&run)?;
            print!("{}", render::render(&entries, settings.zone()?));
        }
        Commands::Settings { settings } => {
            let settings = load(settings.as_ref(), None)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn load(path: Option<&PathBuf>, now: Option<DateTime<Utc>>) -> Result<Settings> {
    let mut settings = config::load_settings(path.map(PathBuf::as_path))
        .context("Failed to load settings")?;
    if let Some(now) = now {
        settings.clock_mode = ClockMode::FrozenAt(now);
    }
    tracing::debug!(?settings, "loaded settings");
    Ok(settings)
}

fn run_agenda(run: &RunArgs) -> Result<(Vec<agenda_engine::Entry>, Settings)> {
    let settings = load(run.settings.as_ref(), run.now)?;
    let text = read_input(run.input.as_ref())?;
    let document: InputDocument =
        serde_json::from_str(&text).context("Input must be a JSON array of records or an object with \"records\"")?;
    let (rows, status) = document.into_parts();
    tracing::debug!(rows = rows.len(), ?status, "read input");

    let entries =
        build_agenda_from_raw(&settings, &rows, status).context("Failed to build agenda")?;
    Ok((entries, settings))
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
