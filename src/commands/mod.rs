//! Command-line interface.
//!
//! Each subcommand lives in its own module with an `Args` struct and a
//! `cmd` entry point.

pub mod config;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod log;
pub mod migrate;
pub mod reset;
pub mod run;
pub mod stats;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the focus timer in the terminal")]
    Run(run::RunArgs),
    #[command(about = "Show focus statistics")]
    Stats(stats::StatsArgs),
    #[command(about = "List recently logged sessions")]
    Log(log::LogArgs),
    #[command(about = "Change the task of a logged session", arg_required_else_help = true)]
    Edit(edit::EditArgs),
    #[command(about = "Delete a logged session", arg_required_else_help = true)]
    Delete(delete::DeleteArgs),
    #[command(about = "Export the session log to CSV")]
    Export(export::ExportArgs),
    #[command(about = "Import sessions from a CSV file", arg_required_else_help = true)]
    Import(import::ImportArgs),
    #[command(about = "Import the old text log or inspect the database schema")]
    Migrate(migrate::MigrateArgs),
    #[command(about = "Show or edit the timer settings")]
    Config(config::ConfigArgs),
    #[command(about = "Delete every logged session")]
    Reset(reset::ResetArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Run(args) => run::cmd(args).await,
            Commands::Stats(args) => stats::cmd(args),
            Commands::Log(args) => log::cmd(args),
            Commands::Edit(args) => edit::cmd(args),
            Commands::Delete(args) => delete::cmd(args),
            Commands::Export(args) => export::cmd(args),
            Commands::Import(args) => import::cmd(args),
            Commands::Migrate(args) => migrate::cmd(args),
            Commands::Config(args) => config::cmd(args),
            Commands::Reset(args) => reset::cmd(args),
        }
    }
}
