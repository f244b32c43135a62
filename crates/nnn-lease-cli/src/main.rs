mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::expenses::ExpensesArgs;
use commands::lease::LeaseArgs;

/// Triple-net commercial lease economics
#[derive(Parser)]
#[command(
    name = "nnn",
    version,
    about = "Triple-net commercial lease economics",
    long_about = "Validate lease parameters and compute the rent schedule, pro-rata \
                  operating expense recoveries, brokerage commissions and lease-level \
                  NOI with decimal precision. Input is a JSON or YAML lease record \
                  given with --input or piped on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a lease record and report every field error
    Validate(LeaseArgs),
    /// Build the month-by-month rent schedule
    Schedule(LeaseArgs),
    /// Allocate building operating expenses to a tenant
    Expenses(ExpensesArgs),
    /// Compute listing and procuring broker commissions
    Commissions(LeaseArgs),
    /// Run the full lease analysis
    Analyze(LeaseArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Validate(args) => commands::lease::run_validate(args),
        Commands::Schedule(args) => commands::lease::run_schedule(args),
        Commands::Expenses(args) => commands::expenses::run_expenses(args),
        Commands::Commissions(args) => commands::lease::run_commissions(args),
        Commands::Analyze(args) => commands::lease::run_analyze(args),
        Commands::Version => {
            println!("nnn {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result.and_then(|value| output::format_output(&cli.output, &value)) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
