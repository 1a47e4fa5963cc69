mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::investment::{AnalyzeArgs, InvestArgs, ProjectArgs};
use commands::regions::TaxRateArgs;

/// Rental property profitability analysis
#[derive(Parser)]
#[command(
    name = "ryield",
    version,
    about = "Rental property profitability analysis",
    long_about = "A CLI for evaluating buy-to-let property deals with decimal precision. \
                  Computes purchase totals, mortgage payments, yields, cash flow and \
                  return KPIs, and projects cash flow over a multi-year horizon."
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
    /// Compute purchase totals, financing, expenses and profitability KPIs
    Invest(InvestArgs),
    /// Project yearly cash flow from a monthly figure
    Project(ProjectArgs),
    /// Full deal analysis: regional tax rate, KPIs and cash-flow projection
    Analyze(AnalyzeArgs),
    /// Look up a regional transfer-tax rate (lists all regions when omitted)
    TaxRate(TaxRateArgs),
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
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Invest(args) => commands::investment::run_invest(args),
        Commands::Project(args) => commands::investment::run_project(args),
        Commands::Analyze(args) => commands::investment::run_analyze(args),
        Commands::TaxRate(args) => commands::regions::run_tax_rate(args),
        Commands::Version => {
            println!("ryield {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
