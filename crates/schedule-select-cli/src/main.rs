//! `schedsel` CLI: drive the schedule selection engine from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Replay an action log (one JSON action per line) against a config
//! schedsel replay --config picker.json -i actions.jsonl
//!
//! # Same, from stdin, pinning the origin and printing only the final value
//! cat actions.jsonl | schedsel replay --origin 2026-03-02 --timezone Europe/Berlin --last
//!
//! # Canonicalize a week-mask token
//! schedsel mask MO,TU,WE,TH,FR,SA      # -> WEEKDAY,SA
//!
//! # Expand a descriptor into concrete dates (or print its RRULE text)
//! schedsel expand -i value.json
//! schedsel expand -i value.json --rrule
//! ```

mod logging;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use schedule_select::expander::rrule_text;
use schedule_select::timezone::parse_timezone;
use schedule_select::{
    expand_selection, SelectionAction, SelectionConfig, SelectionStore, SelectionValue, WeekMask,
};
use std::io::{self, Read};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "schedsel",
    version,
    about = "Recurring schedule selection engine CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay JSON-lines actions and print the descriptor after each one
    Replay {
        /// Engine config JSON file (defaults apply if omitted)
        #[arg(short, long)]
        config: Option<String>,
        /// Action log, one JSON action per line (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Override the config origin (YYYY-MM-DD)
        #[arg(long)]
        origin: Option<String>,
        /// Override the config timezone (IANA name)
        #[arg(long)]
        timezone: Option<String>,
        /// Print only the final descriptor
        #[arg(long)]
        last: bool,
    },
    /// Canonicalize a week-mask token such as "MO,TU,WE,TH,FR"
    Mask {
        token: String,
        /// Print the allowed weekdays one per line instead of the token
        #[arg(long)]
        days: bool,
    },
    /// Expand a descriptor JSON into the dates it selects
    Expand {
        /// Descriptor JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print the RRULE text instead of the dates
        #[arg(long)]
        rrule: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Replay {
            config,
            input,
            origin,
            timezone,
            last,
        } => {
            let config = load_config(config.as_deref(), origin.as_deref(), timezone.as_deref())?;
            let actions = read_input(input.as_deref())?;
            for line in replay(config, &actions, last)? {
                println!("{}", line);
            }
        }
        Commands::Mask { token, days } => {
            let mask: WeekMask = token
                .parse()
                .with_context(|| format!("Failed to parse week mask: '{}'", token))?;
            if days {
                for day in mask.day_set().iter() {
                    println!("{}", day);
                }
            } else {
                println!("{}", mask);
            }
        }
        Commands::Expand { input, rrule } => {
            let json = read_input(input.as_deref())?;
            let value: SelectionValue =
                serde_json::from_str(&json).context("Failed to parse descriptor JSON")?;
            if rrule {
                match rrule_text(&value) {
                    Some(text) => println!("{}", text),
                    None => anyhow::bail!("Descriptor selects no weekdays"),
                }
            } else {
                let dates = expand_selection(&value).context("Failed to expand descriptor")?;
                for date in dates {
                    println!("{}", date.format("%Y-%m-%d"));
                }
            }
        }
    }

    Ok(())
}

/// Load the config file, then apply `--origin` / `--timezone` on top.
fn load_config(
    path: Option<&str>,
    origin: Option<&str>,
    timezone: Option<&str>,
) -> Result<SelectionConfig> {
    let mut config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            SelectionConfig::from_json(&json)
                .with_context(|| format!("Invalid config: {}", path))?
        }
        None => SelectionConfig::default(),
    };

    if let Some(origin) = origin {
        let date = NaiveDate::parse_from_str(origin, "%Y-%m-%d")
            .with_context(|| format!("Invalid origin date: '{}'", origin))?;
        config.origin = Some(date);
    }
    if let Some(timezone) = timezone {
        config.timezone = parse_timezone(timezone)?;
    }
    Ok(config)
}

/// Feed each non-blank line through a store and collect the emitted
/// descriptors as compact JSON (`null` for an empty selection).
fn replay(config: SelectionConfig, actions: &str, last_only: bool) -> Result<Vec<String>> {
    let mut store = SelectionStore::new(config);
    let mut lines = Vec::new();

    for (number, line) in actions.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let action: SelectionAction = serde_json::from_str(line)
            .with_context(|| format!("Invalid action on line {}", number + 1))?;
        let changed = store.dispatch(&action);
        info!(line = number + 1, action = action.name(), changed, "replayed");
        if !last_only {
            lines.push(serde_json::to_string(&store.value())?);
        }
    }

    if last_only {
        lines.push(serde_json::to_string(&store.value())?);
    }
    Ok(lines)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
