mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::analysis::{SensitivityArgs, VarArgs};
use commands::report::ReportArgs;
use commands::stress::{ScenariosArgs, StressArgs};
use commands::BookArgs;

/// Collateral risk analytics
#[derive(Parser)]
#[command(
    name = "rae",
    version,
    about = "Collateral risk analytics for secured credit facilities",
    long_about = "A CLI for analysing a pledged collateral book with decimal precision. \
                  Supports VaR, stress testing, borrowing base, sensitivity, \
                  concentration and liquidity analysis, and sealed risk reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a full risk report with integrity hash
    Report(ReportArgs),
    /// Parametric and Monte Carlo Value-at-Risk
    Var(VarArgs),
    /// Run stress scenarios against the book
    Stress(StressArgs),
    /// Compute the borrowing base and facility capacity
    BorrowingBase(BookArgs),
    /// Borrowing base under a ladder of market-value shocks
    Sensitivity(SensitivityArgs),
    /// Herfindahl index and single-name breaches
    Concentration(BookArgs),
    /// Liquidity coverage ratio
    Liquidity(BookArgs),
    /// List the default stress scenario catalog
    Scenarios(ScenariosArgs),
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
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Report(args) => commands::report::run_report(args),
        Commands::Var(args) => commands::analysis::run_var(args),
        Commands::Stress(args) => commands::stress::run_stress(args),
        Commands::BorrowingBase(args) => commands::analysis::run_borrowing_base(args),
        Commands::Sensitivity(args) => commands::analysis::run_sensitivity(args),
        Commands::Concentration(args) => commands::analysis::run_concentration(args),
        Commands::Liquidity(args) => commands::analysis::run_liquidity(args),
        Commands::Scenarios(args) => commands::stress::run_scenarios(args),
        Commands::Version => {
            println!("rae {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
