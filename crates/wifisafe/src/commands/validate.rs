//! `validate` command handler.
//!
//! Runs the input validator over a batch file without analyzing it, so a
//! producer can see which observations the pipeline would set aside.

use serde::Serialize;
use tabled::Tabled;

use wifisafe_core::NetworkObservation;
use wifisafe_core::validate::{self, ValidationOutcome};

use crate::cli::{GlobalOpts, ValidateArgs};
use crate::error::CliError;
use crate::output;

use super::util::{self, MalformedEntry};

#[derive(Debug, Serialize)]
struct Verdict {
    index: usize,
    ssid: String,
    bssid: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl Verdict {
    fn new(index: usize, entry: &Result<NetworkObservation, MalformedEntry>) -> Self {
        match entry {
            Ok(obs) => {
                let reason = match validate::validate(obs) {
                    ValidationOutcome::Valid => None,
                    ValidationOutcome::Invalid(reason) => Some(reason.to_string()),
                };
                Self {
                    index,
                    ssid: obs.ssid.clone(),
                    bssid: obs.bssid.to_string(),
                    valid: reason.is_none(),
                    reason,
                }
            }
            Err(bad) => Self {
                index,
                ssid: bad.ssid.clone(),
                bssid: bad.bssid.clone(),
                valid: false,
                reason: Some(bad.reason.clone()),
            },
        }
    }
}

#[derive(Tabled)]
struct VerdictRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "BSSID")]
    bssid: String,
    #[tabled(rename = "Verdict")]
    verdict: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

pub fn handle(args: &ValidateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color_mode());
    let batch = util::read_batch(&args.file)?;
    let verdicts: Vec<Verdict> = batch
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| Verdict::new(index, entry))
        .collect();

    let out = output::render_list(
        global.output_format(),
        &verdicts,
        |v| VerdictRow {
            index: v.index,
            ssid: v.ssid.escape_debug().to_string(),
            bssid: v.bssid.clone(),
            verdict: if v.valid {
                output::dim("ok", color)
            } else {
                "rejected".to_owned()
            },
            reason: v.reason.clone().unwrap_or_default(),
        },
        |v| format!("{}\t{}", v.index, if v.valid { "ok" } else { "rejected" }),
    );
    output::print_output(&out, global.quiet);

    let rejected = verdicts.iter().filter(|v| !v.valid).count();
    if args.strict && rejected > 0 {
        return Err(CliError::RejectedObservations {
            path: args.file.display().to_string(),
            rejected,
            total: verdicts.len(),
        });
    }
    Ok(())
}
