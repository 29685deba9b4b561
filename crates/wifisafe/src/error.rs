//! CLI error types with miette diagnostics.
//!
//! Maps config and input failures into user-facing errors with actionable
//! help text and a stable exit code per class.

use miette::Diagnostic;
use thiserror::Error;

use wifisafe_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INPUT: i32 = 3;
    pub const CONFIG: i32 = 4;
    pub const RISK_THRESHOLD: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Usage ────────────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wifisafe::validation))]
    Validation { field: String, reason: String },

    // ── Input ────────────────────────────────────────────────────────

    #[error("Could not read batch file {path}")]
    #[diagnostic(
        code(wifisafe::input),
        help(
            "Expected a JSON or YAML file holding either a list of observations or\n\
             {{ \"metadata\": {{ \"captured_at\": ..., \"source\": ... }}, \"observations\": [...] }}.\n\
             Details: {reason}"
        )
    )]
    Input { path: String, reason: String },

    #[error("{rejected} of {total} observations in {path} would be rejected")]
    #[diagnostic(
        code(wifisafe::rejected_observations),
        help("Run without --strict to see the reasons without failing.")
    )]
    RejectedObservations {
        path: String,
        rejected: usize,
        total: usize,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(wifisafe::config),
        help("Check the config file (wifisafe config path) and WIFISAFE_* environment variables.")
    )]
    Config(#[from] ConfigError),

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(wifisafe::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── Risk ─────────────────────────────────────────────────────────

    #[error("Overall risk {level} in {source_name} reached the --fail-on threshold ({threshold})")]
    #[diagnostic(code(wifisafe::risk_threshold))]
    RiskThreshold {
        level: String,
        threshold: String,
        source_name: String,
    },

    // ── Runtime ──────────────────────────────────────────────────────

    #[error("Analysis task failed: {0}")]
    #[diagnostic(code(wifisafe::task))]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => exit_code::USAGE,
            Self::Input { .. } | Self::RejectedObservations { .. } => exit_code::INPUT,
            Self::Config(_) | Self::ConfigExists { .. } => exit_code::CONFIG,
            Self::RiskThreshold { .. } => exit_code::RISK_THRESHOLD,
            Self::Task(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_class() {
        let usage = CliError::Validation {
            field: "now".into(),
            reason: "bad".into(),
        };
        assert_eq!(usage.exit_code(), exit_code::USAGE);

        let input = CliError::Input {
            path: "scan.json".into(),
            reason: "eof".into(),
        };
        assert_eq!(input.exit_code(), exit_code::INPUT);

        let config = CliError::Config(ConfigError::Validation {
            field: "defaults.output".into(),
            reason: "bad".into(),
        });
        assert_eq!(config.exit_code(), exit_code::CONFIG);

        let risk = CliError::RiskThreshold {
            level: "critical".into(),
            threshold: "high".into(),
            source_name: "scan.json".into(),
        };
        assert_eq!(risk.exit_code(), exit_code::RISK_THRESHOLD);
    }
}
