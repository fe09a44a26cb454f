mod commands;
mod config;
mod units;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::Level;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Resolve follow directives in equipment unit source paths.
#[derive(Parser)]
#[command(
    name = "srcpath",
    version,
    about = "Resolve follow directives in equipment unit source paths"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Directive syntax TOML file (tokens, open_marker, close_marker)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every active unit in a JSON unit file
    Resolve {
        /// Path to the JSON array of units
        units: PathBuf,
        /// Rewrite the unit file instead of printing the resolved units
        #[arg(long)]
        in_place: bool,
    },

    /// Parse, cycle-check and print the resolution order without resolving
    Check {
        /// Path to the JSON array of units
        units: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let syntax = match config::load_syntax(cli.config.as_deref()) {
        Ok(s) => s,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Resolve { units, in_place } => {
            commands::resolve::cmd_resolve(&units, in_place, &syntax, cli.output, cli.quiet);
        }
        Commands::Check { units } => {
            commands::check::cmd_check(&units, &syntax, cli.output, cli.quiet);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Report a resolution error: the structured JSON form in json mode, the
/// message in text mode.
pub(crate) fn report_resolve_error(
    err: &srcpath_core::ResolveError,
    output: OutputFormat,
    quiet: bool,
) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&err.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", err));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", err);
            }
        }
    }
}
