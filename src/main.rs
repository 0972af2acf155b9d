//! Trion CLI - append to, clear and inspect a rotating log from the shell
//!
//! ## Commands
//!
//! ### `log` - Append one entry
//! `trion log --level WARNING disk usage at 91%`
//!
//! ### `clear` - Truncate the active log file
//! Backups are left untouched.
//!
//! ### `status` - List the active file and its backups
//! Plain text by default, `--json` for machine-readable output.
//!
//! ### `ask` - Read one typed value from stdin and log it
//! `trion ask int --prompt "Port: "` re-prompts until the input parses.
//!
//! ## Configuration
//!
//! Settings are read from `config.yaml` in the current directory (or the file
//! given with `--config`); `--path`, `--max-size`, `--max-backups` and `--echo`
//! override them.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: verbosity of the diagnostic output on stderr (default `warn`)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use trion::{init_diagnostics, Config, Console, Level, RotatingFileLogger};

#[derive(Parser)]
#[command(author, version, about = "Rotating file logger and console prompt helper", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./config.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Active log file path
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Rotate once the active file exceeds this many bytes
    #[arg(long, global = true)]
    max_size: Option<u64>,

    /// Number of numbered backups to keep
    #[arg(long, global = true, allow_negative_numbers = true)]
    max_backups: Option<i64>,

    /// Echo entries to stdout
    #[arg(long, global = true)]
    echo: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append one entry to the log
    Log {
        /// Level tag (INFO, WARNING, ERROR, DEBUG, FATAL or any custom tag)
        #[arg(short, long, default_value = "INFO")]
        level: String,

        /// Message words, joined with spaces
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Truncate the active log file
    Clear,

    /// Show the active file and existing backups
    Status {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Read one value from stdin and log it at INFO
    Ask {
        kind: ValueKind,

        /// Prompt written before reading
        #[arg(short, long)]
        prompt: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ValueKind {
    Int,
    Long,
    Float,
    Double,
    Bool,
    Char,
    Line,
}

fn main() -> Result<()> {
    init_diagnostics(Some("warn"), Some("stderr"));

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let logger = RotatingFileLogger::from_config(config.logger);
    if let Some(path) = &cli.path {
        logger.set_path(path);
    }
    if let Some(bytes) = cli.max_size {
        logger.set_max_size(bytes);
    }
    if let Some(count) = cli.max_backups {
        logger.set_max_backups(count);
    }
    if cli.echo {
        logger.set_console_echo(true);
    }

    match cli.command {
        Commands::Log { level, message } => {
            let message = message.join(" ");
            logger.log(Some(message.as_str()), Level::from(level));
        }

        Commands::Clear => logger.clear_log(),

        Commands::Status { json } => {
            let files = logger.log_files();

            if json {
                println!("{}", serde_json::to_string_pretty(&files)?);
            } else if files.is_empty() {
                println!("No log files at {}", logger.path().display());
            } else {
                for file in &files {
                    let role = if file.index == 0 { "active".to_string() } else { format!("backup {}", file.index) };
                    println!("{:<10} {:>12} bytes  {}", role, file.size, file.path.display());
                }
            }
        }

        Commands::Ask { kind, prompt } => {
            let mut console = Console::stdio().with_messages(config.console);
            let prompt = prompt.unwrap_or_default();

            let value = match kind {
                ValueKind::Int => console.read_int_prompt(&prompt)?.to_string(),
                ValueKind::Long => console.read_long_prompt(&prompt)?.to_string(),
                ValueKind::Float => console.read_float_prompt(&prompt)?.to_string(),
                ValueKind::Double => console.read_double_prompt(&prompt)?.to_string(),
                ValueKind::Bool => console.read_bool_prompt(&prompt)?.to_string(),
                ValueKind::Char => console.read_char_prompt(&prompt)?.to_string(),
                ValueKind::Line => console.read_line_prompt(&prompt)?,
            };
            console.close();

            logger.info(&value);
            console.write_line(&value).context("Failed to print value")?;
        }
    }

    Ok(())
}
