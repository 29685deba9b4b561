//! Command dispatch: bridges CLI args -> core analysis -> output formatting.

pub mod admission;
pub mod analyze;
pub mod classify;
pub mod config_cmd;
pub mod sanitize;
pub mod util;
pub mod validate;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a config-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Analyze(args) => analyze::handle(args, cfg, global).await,
        Command::Classify(args) => {
            classify::handle(&args, global);
            Ok(())
        }
        Command::Validate(args) => validate::handle(&args, global),
        Command::Sanitize(args) => {
            sanitize::handle(&args, global);
            Ok(())
        }
        Command::Admission(args) => admission::handle(&args, cfg, global),
        Command::Config(args) => config_cmd::handle(args, global, Some(cfg)),
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
