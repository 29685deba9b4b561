//! `admission` command handler.
//!
//! Replays one scan request against the admission controller using the
//! configured throttle windows. The platform's answer comes from
//! `--platform`, so every terminal state can be reached from the shell.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use wifisafe_core::{
    PlatformResponse, ScanAdmissionController, ScanAdmissionState, ScanContext,
};

use crate::cli::{AdmissionArgs, ContextArg, GlobalOpts, PlatformArg};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct AdmissionDecision {
    context: ScanContext,
    evaluated_at: DateTime<Utc>,
    last_success: Option<DateTime<Utc>>,
    window_secs: i64,
    decision: ScanAdmissionState,
}

fn scan_context(arg: ContextArg) -> ScanContext {
    match arg {
        ContextArg::Foreground => ScanContext::Foreground,
        ContextArg::Background => ScanContext::Background,
    }
}

fn platform_response(arg: PlatformArg, reason: &str) -> PlatformResponse {
    match arg {
        PlatformArg::Accepted => PlatformResponse::Accepted,
        PlatformArg::Rejected => PlatformResponse::Rejected {
            reason: reason.to_owned(),
        },
        PlatformArg::RadioDisabled => PlatformResponse::RadioDisabled,
        PlatformArg::Failed => PlatformResponse::Failed {
            reason: reason.to_owned(),
        },
    }
}

fn last_success(
    args: &AdmissionArgs,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, CliError> {
    if let Some(raw) = &args.since {
        return Ok(Some(now - util::parse_duration("since", raw)?));
    }
    args.last_success
        .as_deref()
        .map(|raw| util::parse_instant("last-success", raw))
        .transpose()
}

fn detail(d: &AdmissionDecision) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Decision:      {}", d.decision.label());
    let _ = writeln!(out, "Context:       {}", d.context);
    let _ = writeln!(out, "Window:        {}s", d.window_secs);
    let _ = writeln!(
        out,
        "Last success:  {}",
        d.last_success
            .map_or_else(|| "never".to_owned(), |t| t.to_rfc3339())
    );
    match &d.decision {
        ScanAdmissionState::Success => {}
        ScanAdmissionState::Throttled { next_available_at } => {
            let _ = writeln!(out, "Next allowed:  {}", next_available_at.to_rfc3339());
        }
        ScanAdmissionState::Restricted { reason } | ScanAdmissionState::Failed { reason } => {
            let _ = writeln!(out, "Reason:        {reason}");
        }
    }
    out.trim_end().to_owned()
}

pub fn handle(args: &AdmissionArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let now = util::now(global)?;
    let context = scan_context(args.context);
    let last = last_success(args, now)?;

    let controller = ScanAdmissionController::with_last_success(cfg.analysis.admission, last);
    let response = platform_response(args.platform, &args.reason);
    let decision = controller.admit(context, now, &|| response.clone());

    let result = AdmissionDecision {
        context,
        evaluated_at: now,
        last_success: controller.last_success(),
        window_secs: controller.window(context).num_seconds(),
        decision,
    };

    let out = output::render_single(global.output_format(), &result, detail, |d| {
        d.decision.label().to_owned()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
