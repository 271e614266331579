//! Rollbook CLI
//!
//! Command-line interface for Rollbook - student roster management.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rollbook_core::{Config, LoadOutcome, Registry, StorageError};

mod commands;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "rollbook")]
#[command(about = "Rollbook - Student roster management")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu
    Shell,
    /// Add a new student
    #[command(alias = "create", allow_negative_numbers = true)]
    Add {
        /// Student name
        name: String,
        /// Unique roll number
        roll: i64,
        /// Marks between 0 and 100
        marks: f64,
    },
    /// List all students
    #[command(alias = "ls")]
    List,
    /// Show one student
    #[command(alias = "search", allow_negative_numbers = true)]
    Show {
        /// Roll number
        roll: i64,
    },
    /// Update a student's name and/or marks
    #[command(allow_negative_numbers = true)]
    Update {
        /// Roll number
        roll: i64,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New marks
        #[arg(short, long)]
        marks: Option<f64>,
    },
    /// Delete a student
    #[command(alias = "rm", allow_negative_numbers = true)]
    Delete {
        /// Roll number
        roll: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show count, average, highest and lowest marks
    Stats,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, data_file, format, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't touch the roster
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config = Config::load_with_cli_override(config_path)?;
    init_logging(&config);

    let mut registry = Registry::initialize_with_config(&config)?;
    let command = cli.command.unwrap_or(Commands::Shell);
    report_load_outcome(&registry, matches!(command, Commands::Shell), &output);

    let result = match command {
        Commands::Shell => {
            let stdin = io::stdin();
            commands::shell::run(&mut registry, &mut stdin.lock(), &mut io::stdout())
        }
        Commands::Add { name, roll, marks } => {
            commands::student::add(&mut registry, name, roll, marks, &output)
        }
        Commands::List => commands::student::list(&registry, &output),
        Commands::Show { roll } => commands::student::show(&registry, roll, &output),
        Commands::Update { roll, name, marks } => {
            commands::student::update(&mut registry, roll, name, marks, &output)
        }
        Commands::Delete { roll, yes } => {
            commands::student::delete(&mut registry, roll, yes, &output)
        }
        Commands::Stats => commands::student::stats(&registry, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    };

    shutdown(registry, &output);

    result
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Tell the user how the roster was loaded
fn report_load_outcome(registry: &Registry, interactive: bool, output: &Output) {
    match registry.load_outcome() {
        LoadOutcome::Fresh if interactive => {
            output.message("No existing data file found. Starting fresh.");
        }
        LoadOutcome::Loaded { count } if interactive => {
            output.message(&format!(
                "Data loaded successfully. {} records found.",
                count
            ));
        }
        LoadOutcome::Recovered {
            details,
            backup_path,
        } => {
            output.warning(&format!("{}. Starting with empty roster.", details));
            if let Some(path) = backup_path {
                output.warning(&format!("Unreadable file kept at {}", path.display()));
            }
        }
        _ => {}
    }
}

/// Save the roster if it changed; failures are reported, not fatal
fn shutdown(registry: Registry, output: &Output) {
    if !registry.is_dirty() {
        return;
    }

    let location = registry.location().to_path_buf();
    match registry.shutdown() {
        Ok(count) => info!("Saved {} record(s) to {:?}", count, location),
        Err(e) => {
            output.warning(&format!("Save failed: {}", e));
            output.warning(save_failure_hint(&e));
        }
    }
}

/// What to tell the user after a failed save
fn save_failure_hint(error: &StorageError) -> &'static str {
    match error.recovery_suggestion() {
        Some(hint) if error.is_recoverable() => hint,
        _ => "Changes from this run were not saved.",
    }
}

/// Initialize logging
///
/// Only initializes if ROLLBOOK_LOG environment variable is set.
/// Logs to config.log_file when set, otherwise stderr.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("ROLLBOOK_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "rollbook_core={},rollbook_cli={}",
        log_level, log_level
    ));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false);

    // Ignore error if already initialized
    match &config.log_file {
        Some(log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };
            let _ = builder.with_writer(log_file).try_init();
            info!("Logging initialized to {:?}", log_path);
        }
        None => {
            let _ = builder.with_writer(io::stderr).try_init();
        }
    }
}
