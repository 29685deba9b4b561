//! CLI configuration: thin wrapper around `wifisafe_config` shared types.
//!
//! Adds `GlobalOpts`-aware resolution: `--config` picks the file, and
//! `--output` / `--color` fall back to the file's `[defaults]`.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use wifisafe_config::{Config, save_config_to};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config file in effect: `--config` / `WIFISAFE_CONFIG`, else the
/// platform default.
pub fn active_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(wifisafe_config::config_path)
}

/// Load and validate the effective configuration.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(wifisafe_config::load_config_from(&active_path(global))?)
}

/// Fill unset presentation flags from the config file's `[defaults]`.
/// Flags given on the command line always win.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) {
    if global.output.is_none() {
        global.output = OutputFormat::from_str(&cfg.defaults.output, true).ok();
    }
    if global.color.is_none() {
        global.color = ColorMode::from_str(&cfg.defaults.color, true).ok();
    }
}
