//! Clap derive structures for the `plumly` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// plumly -- discover and dim Plum lightpads
#[derive(Debug, Parser)]
#[command(
    name = "plumly",
    version,
    about = "Discover and control Plum lightpads from the command line",
    long_about = "Finds lightpads on the local network, loads the house layout from the\n\
        Plum cloud, and sends dimmer commands straight to each lightpad.",
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
    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PLUMLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Cloud request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Broadcast a discovery request and list answering lightpads
    Discover(DiscoverArgs),

    /// List lightpads known to the cloud account
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Read or set a lightpad's dimmer level
    #[command(alias = "l")]
    Level(LevelArgs),

    /// Switch a lightpad's load on (full brightness if it was dark)
    On(TargetArgs),

    /// Switch a lightpad's load off
    Off(TargetArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Discovery ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DiscoverArgs {
    /// Seconds to collect answers
    #[arg(long, short = 'w', default_value = "3")]
    pub wait: u64,
}

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// Seconds to wait for discovery answers before listing
    #[arg(long, short = 'w', default_value = "3", conflicts_with = "watch")]
    pub wait: u64,

    /// Keep running and print the list again whenever a device changes
    #[arg(long)]
    pub watch: bool,
}

// ── Level control ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LevelArgs {
    #[command(subcommand)]
    pub command: LevelCommand,
}

#[derive(Debug, Subcommand)]
pub enum LevelCommand {
    /// Read the current level (percent)
    Get(TargetArgs),

    /// Set the level (percent, 0-100)
    Set {
        #[command(flatten)]
        target: TargetArgs,

        /// Brightness percent
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Lightpad id (lpid)
    pub lpid: String,

    /// Seconds to wait for the lightpad to answer discovery
    #[arg(long, short = 'w', default_value = "5")]
    pub wait: u64,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the effective configuration (password masked)
    Show,

    /// Write a starter config file
    Init {
        /// Plum cloud account (email)
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
