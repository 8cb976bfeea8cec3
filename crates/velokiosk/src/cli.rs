//! Clap derive structures for the `velokiosk` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// velokiosk -- terminal runner for a kiosk rental fleet
#[derive(Debug, Parser)]
#[command(
    name = "velokiosk",
    version,
    about = "Run and inspect a bike-kiosk rental fleet",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file path
    #[arg(long, short = 'c', env = "VELOKIOSK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides the config file)
    #[arg(long, env = "VELOKIOSK_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the kiosk: reconcile loop plus stdin-driven presses
    Run(RunArgs),

    /// Print the current fleet
    Fleet,

    /// Print the 24-hour audit report
    Report,

    /// Manage the configuration file
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Tick interval override, in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a default config file
    Init,
    /// Print the resolved configuration
    Show,
    /// Print the config file path
    Path,
}
