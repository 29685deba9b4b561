//! Config subcommand handlers.

use wifisafe_config::ConfigError;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// `cfg` is the already-resolved configuration when the caller loaded
/// one. Only `show` needs it; `init` and `path` must work even when the
/// file on disk is unreadable.
pub fn handle(args: ConfigArgs, global: &GlobalOpts, cfg: Option<&Config>) -> Result<(), CliError> {
    match args.command {
        // ── Init: write every default ───────────────────────────────
        ConfigCommand::Init { force } => {
            let path = config::active_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config_to(&Config::default(), &path)?;
            if !global.quiet {
                eprintln!("✓ Configuration written to {}", path.display());
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let resolved;
            let cfg = match cfg {
                Some(cfg) => cfg,
                None => {
                    resolved = config::load(global)?;
                    &resolved
                }
            };
            let out = match global.output_format() {
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(cfg)
                    .map_err(ConfigError::from)?
                    .trim_end()
                    .to_owned(),
                format => output::render_single(format, cfg, |_| String::new(), |_| String::new()),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::active_path(global).display());
            Ok(())
        }
    }
}
