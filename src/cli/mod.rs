use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{LogFormat, WizardVariant};

pub mod commands;

#[derive(Parser)]
#[command(name = "transfer-wizard")]
#[command(about = "Multi-step member transfer request wizard")]
#[command(long_about = "Walks a transfer request through group links, member count, payment \
                       and confirmation. Payment and transfer are simulated locally; nothing \
                       is sent anywhere. Start with 'transfer-wizard quote --members 1000'.")]
pub struct Cli {
    /// Pricing and limits preset
    #[arg(long, global = true, value_enum, help = "Wizard preset: standard, strict or compact")]
    pub variant: Option<WizardVariant>,
    /// Configuration file overriding the preset
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,
    /// Log output format
    #[arg(long, global = true, value_enum, help = "Log format on stderr: pretty or json")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a complete transfer request from the given inputs
    Run(RunArgs),
    /// Show the cost breakdown for a member count
    Quote {
        /// Number of members to price
        #[arg(long, help = "Number of members to transfer")]
        members: u32,
        /// Print the breakdown as JSON
        #[arg(long, help = "Print the quote as a JSON object")]
        json: bool,
    },
    /// Check whether group links are accepted by the wizard
    CheckLink {
        /// Links to check
        #[arg(required = true, help = "One or more https://t.me/<handle> links")]
        links: Vec<String>,
    },
    /// Print the effective configuration as TOML
    Config {
        /// Write to a file instead of stdout
        #[arg(long, help = "Write the configuration to this path")]
        write: Option<PathBuf>,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Run(_) => "run",
            Commands::Quote { .. } => "quote",
            Commands::CheckLink { .. } => "check-link",
            Commands::Config { .. } => "config",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Public group to take members from
    #[arg(long, help = "Source group link, e.g. https://t.me/cryptotraders")]
    pub source: String,
    /// Group that receives the members
    #[arg(long, help = "Destination group link you administer")]
    pub destination: String,
    /// Requested member count, as typed
    #[arg(long, help = "Number of members to transfer")]
    pub members: String,
    /// Only transfer recently active members
    #[arg(long)]
    pub active_only: bool,
    /// Skip bot accounts
    #[arg(long)]
    pub exclude_bots: bool,
    /// Only members who joined after this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub joined_after: Option<NaiveDate>,
    /// Special requests for the order
    #[arg(long)]
    pub notes: Option<String>,
    /// Payment receipt (JPG, PNG or PDF)
    #[arg(long, value_name = "PATH")]
    pub proof: Option<PathBuf>,
    /// Skip the simulated delays
    #[arg(long, help = "Run the simulated payment and transfer without waiting")]
    pub instant: bool,
}
