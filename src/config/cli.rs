use crate::core::export::ExportFormat;
use crate::core::SearchMode;
use crate::utils::logger::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "tenant-finder")]
#[command(about = "Search, insert and export tenants of the tenant registry")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base URL of the tenant registry server
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log output format: compact or json
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Look up tenants by name or by address
    Search(SearchArgs),
    /// Add one tenant, bulk import a CSV file, or both
    Insert(InsertArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// What the query is: a tenant name or an address
    #[arg(long = "by", default_value = "tenant")]
    pub mode: SearchMode,

    pub query: String,

    /// Save the results to a file
    #[arg(long)]
    pub export: bool,

    /// Export format: text (grouped by address) or csv
    #[arg(long, default_value = "text")]
    pub format: ExportFormat,

    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(long)]
    pub filename: Option<String>,

    /// Also print the export as a data URI
    #[arg(long)]
    pub data_uri: bool,
}

#[derive(Debug, Clone, Args)]
pub struct InsertArgs {
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub address: String,

    /// CSV file of `name,address` rows to import
    #[arg(long)]
    pub file: Option<PathBuf>,
}
