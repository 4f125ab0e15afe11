use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::model::AggregateKind;

#[derive(Debug, Clone, Parser)]
#[command(name = "shop-admin")]
#[command(about = "Validate shop schedules and run catalog mutations")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the API base URL from the configuration
    #[arg(long)]
    pub api_url: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit JSON logs")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check the opening hours of a shop draft (JSON) without sending it
    Check { file: String },
    /// Validate a shop draft (JSON) and create or update it
    Submit { file: String },
    /// Delete a shop, product or category by id
    Delete {
        #[arg(value_enum)]
        kind: AggregateArg,
        id: i64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AggregateArg {
    Shop,
    Product,
    Category,
}

impl From<AggregateArg> for AggregateKind {
    fn from(arg: AggregateArg) -> Self {
        match arg {
            AggregateArg::Shop => AggregateKind::Shop,
            AggregateArg::Product => AggregateKind::Product,
            AggregateArg::Category => AggregateKind::Category,
        }
    }
}
