mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::grid::GridArgs;
use commands::investment::InvestmentArgs;
use commands::rates::{FundingFeeArgs, MiRateArgs};
use commands::scenario::{PurchaseArgs, RefinanceArgs, VaArgs};

/// Mortgage scenario and qualification calculations
#[derive(Parser)]
#[command(
    name = "lsq",
    version,
    about = "Mortgage scenario and qualification calculations",
    long_about = "A CLI for composing mortgage loan scenarios with decimal precision. \
                  Supports purchase, refinance, VA, and DSCR investment scenarios, \
                  comparison grids across price and down-payment tiers, and raw \
                  funding-fee/MI rate lookups against a pluggable rate sheet."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose and qualify a purchase scenario
    Purchase(PurchaseArgs),
    /// Compose and qualify a refinance scenario from value and payoff
    Refinance(RefinanceArgs),
    /// Compose and qualify a VA purchase scenario
    Va(VaArgs),
    /// Compose and qualify a DSCR investment scenario
    Investment(InvestmentArgs),
    /// Build a price x down-payment comparison grid
    Grid(GridArgs),
    /// Look up the VA funding-fee rate
    FundingFee(FundingFeeArgs),
    /// Look up the annual mortgage-insurance rate
    MiRate(MiRateArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Purchase(args) => commands::scenario::run_purchase(args),
        Commands::Refinance(args) => commands::scenario::run_refinance(args),
        Commands::Va(args) => commands::scenario::run_va(args),
        Commands::Investment(args) => commands::investment::run_investment(args),
        Commands::Grid(args) => commands::grid::run_grid(args),
        Commands::FundingFee(args) => commands::rates::run_funding_fee(args),
        Commands::MiRate(args) => commands::rates::run_mi_rate(args),
        Commands::Version => {
            println!("lsq {}", env!("CARGO_PKG_VERSION"));
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
