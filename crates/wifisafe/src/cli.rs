//! Clap derive structures for the `wifisafe` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap + clap_complete so `build.rs` can include it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wifisafe -- risk analysis for Wi-Fi scan snapshots
#[derive(Debug, Parser)]
#[command(
    name = "wifisafe",
    version,
    about = "Assess the security risk of observed Wi-Fi access points",
    long_about = "Classifies advertised security, detects evil twins, spoofed-looking\n\
        hardware addresses and suspicious names, and produces a fail-safe risk\n\
        verdict per network and per scan batch. Stale scans are never reported safe.",
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
    /// Config file to use instead of the platform default
    #[arg(long, env = "WIFISAFE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "WIFISAFE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Evaluate as of this instant (RFC 3339) instead of the system clock
    #[arg(long, env = "WIFISAFE_NOW", global = true, value_name = "TIMESTAMP")]
    pub now: Option<String>,
}

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.unwrap_or_default()
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze one or more scan batch files
    #[command(alias = "a")]
    Analyze(AnalyzeArgs),

    /// Classify capability strings into security schemes
    #[command(alias = "c")]
    Classify(ClassifyArgs),

    /// Check a batch file for observations that would be rejected
    Validate(ValidateArgs),

    /// Show how a network search query is sanitized
    Sanitize(SanitizeArgs),

    /// Simulate one scan admission decision
    Admission(AdmissionArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ANALYZE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Batch files (JSON or YAML); each is analyzed independently
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Only show networks whose SSID or BSSID matches this query
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Treat every batch as captured this long ago (e.g. "10m", "2h")
    #[arg(long, value_name = "DURATION", conflicts_with = "captured_at")]
    pub age: Option<String>,

    /// Treat every batch as captured at this instant (RFC 3339)
    #[arg(long, value_name = "TIMESTAMP")]
    pub captured_at: Option<String>,

    /// Scan source to record when --age or --captured-at is given
    #[arg(long, value_enum, default_value = "unknown")]
    pub source: SourceArg,

    /// Exit with status 10 when any batch's overall risk reaches this level
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub fail_on: Option<RiskLevelArg>,

    /// List every finding instead of the per-network table
    #[arg(long)]
    pub findings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    ActiveScan,
    SystemCache,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RiskLevelArg {
    Low,
    Medium,
    High,
    Critical,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLASSIFY / VALIDATE / SANITIZE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Capability strings, e.g. "[WPA2-PSK-CCMP][ESS]"
    #[arg(required = true, value_name = "CAPABILITIES")]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Batch file (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Exit with status 3 if any observation is rejected
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct SanitizeArgs {
    /// Raw search query
    pub query: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADMISSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AdmissionArgs {
    /// Execution context of the scan request
    #[arg(long, value_enum, default_value = "foreground")]
    pub context: ContextArg,

    /// Time since the last successful scan (e.g. "45s", "20m")
    #[arg(long, value_name = "DURATION", conflicts_with = "last_success")]
    pub since: Option<String>,

    /// Instant of the last successful scan (RFC 3339)
    #[arg(long, value_name = "TIMESTAMP")]
    pub last_success: Option<String>,

    /// What the platform answers if asked to scan
    #[arg(long, value_enum, default_value = "accepted")]
    pub platform: PlatformArg,

    /// Reason reported with a rejected or failed platform response
    #[arg(long, default_value = "rejected by platform")]
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContextArg {
    Foreground,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Accepted,
    Rejected,
    RadioDisabled,
    Failed,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with every default spelled out
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration (file + environment)
    Show,

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
