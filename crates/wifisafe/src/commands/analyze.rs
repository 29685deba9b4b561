//! `analyze` command handler.
//!
//! Each file is one batch. Batches are analyzed concurrently on the
//! blocking pool; every task owns its observations and builds its own
//! detector index, sharing only the (immutable) analyzer.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use wifisafe_core::validate::is_hidden_ssid;
use wifisafe_core::{
    NetworkRiskAssessment, ScanMetadata, ScanSource, SecurityAnalyzer, SecurityReport, Severity,
    ThreatFinding,
};

use crate::cli::{AnalyzeArgs, GlobalOpts, OutputFormat, RiskLevelArg, SourceArg};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "BSSID")]
    bssid: String,
    #[tabled(rename = "Security")]
    scheme: String,
    #[tabled(rename = "Risk")]
    level: String,
    #[tabled(rename = "Score")]
    score: u8,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Findings")]
    findings: String,
}

impl NetworkRow {
    fn new(n: &NetworkRiskAssessment, color: bool) -> Self {
        let mut level = output::paint_severity(n.threat_level, color);
        if n.threat_level != n.assessed_level {
            let _ = write!(
                level,
                " {}",
                output::dim(&format!("(was {})", n.assessed_level), color)
            );
        }
        Self {
            ssid: if is_hidden_ssid(&n.ssid) {
                output::dim("<hidden>", color)
            } else {
                n.ssid.clone()
            },
            bssid: n.bssid.to_string(),
            scheme: n.scheme.label().to_owned(),
            level,
            score: n.security_score,
            signal: format!("{} dBm", n.signal_level),
            band: n
                .band
                .map_or_else(|| output::dim("-", color), |b| b.to_string()),
            findings: n
                .findings
                .iter()
                .map(|f| f.kind.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl FindingRow {
    fn new(f: &ThreatFinding, color: bool) -> Self {
        Self {
            severity: output::paint_severity(f.severity, color),
            kind: f.kind.to_string(),
            subject: f
                .subject
                .bssid()
                .map_or_else(|| "(batch)".to_owned(), ToString::to_string),
            description: f.description.clone(),
        }
    }
}

// ── Batch analysis ──────────────────────────────────────────────────

/// One analyzed file.
#[derive(Debug, Serialize)]
struct AnalyzedBatch {
    file: String,
    /// Entries that could not be read as observations at all.
    malformed: usize,
    report: SecurityReport,
}

/// Where each batch's capture time comes from.
#[derive(Debug, Clone, Copy)]
enum MetadataOverride {
    /// Use the file's own metadata block, if any.
    FromFile,
    /// `--age` / `--captured-at` given on the command line.
    CapturedAt(DateTime<Utc>, ScanSource),
}

fn scan_source(arg: SourceArg) -> ScanSource {
    match arg {
        SourceArg::ActiveScan => ScanSource::ActiveScan,
        SourceArg::SystemCache => ScanSource::SystemCache,
        SourceArg::Unknown => ScanSource::Unknown,
    }
}

fn threshold(arg: RiskLevelArg) -> Severity {
    match arg {
        RiskLevelArg::Low => Severity::Low,
        RiskLevelArg::Medium => Severity::Medium,
        RiskLevelArg::High => Severity::High,
        RiskLevelArg::Critical => Severity::Critical,
    }
}

fn metadata_override(
    args: &AnalyzeArgs,
    now: DateTime<Utc>,
) -> Result<MetadataOverride, CliError> {
    let source = scan_source(args.source);
    if let Some(raw) = &args.age {
        let age = util::parse_duration("age", raw)?;
        return Ok(MetadataOverride::CapturedAt(now - age, source));
    }
    if let Some(raw) = &args.captured_at {
        let at = util::parse_instant("captured-at", raw)?;
        return Ok(MetadataOverride::CapturedAt(at, source));
    }
    Ok(MetadataOverride::FromFile)
}

async fn analyze_all(
    files: Vec<PathBuf>,
    analyzer: Arc<SecurityAnalyzer>,
    overrides: MetadataOverride,
    now: DateTime<Utc>,
) -> Result<Vec<AnalyzedBatch>, CliError> {
    let mut tasks = Vec::with_capacity(files.len());
    for path in files {
        let (observations, malformed, file_meta) = util::read_batch(&path)?.into_parts();
        let analyzer = Arc::clone(&analyzer);
        let file = path.display().to_string();
        debug!(%file, observations = observations.len(), malformed, "queueing batch");

        tasks.push(tokio::task::spawn_blocking(move || {
            let metadata = match overrides {
                MetadataOverride::CapturedAt(at, source) => {
                    Some(analyzer.assess_metadata(at, source, now))
                }
                MetadataOverride::FromFile => file_meta
                    .map(|m| analyzer.assess_metadata(m.captured_at, m.source, now)),
            };
            AnalyzedBatch {
                file,
                malformed,
                report: analyzer.analyze(&observations, metadata, now),
            }
        }));
    }
    Ok(try_join_all(tasks).await?)
}

// ── Rendering ───────────────────────────────────────────────────────

fn metadata_line(meta: Option<&ScanMetadata>, now: DateTime<Utc>) -> String {
    meta.map_or_else(
        || "freshness: not provided (treated as fresh)".to_owned(),
        |m| {
            let age = m.age_at(now).to_std().map_or_else(
                |_| "in the future".to_owned(),
                |age| format!("{} ago", humantime::format_duration(age)),
            );
            format!(
                "freshness: {} (captured {}, {age}, source {})",
                m.freshness,
                m.captured_at.to_rfc3339(),
                m.source
            )
        },
    )
}

fn render_table(
    batch: &AnalyzedBatch,
    networks: &[&NetworkRiskAssessment],
    show_findings: bool,
    color: bool,
) -> String {
    let report = &batch.report;
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::dim(&format!("── {} ──", batch.file), color));

    if show_findings {
        let rows: Vec<FindingRow> = report
            .findings()
            .iter()
            .map(|f| FindingRow::new(f, color))
            .collect();
        let _ = writeln!(out, "{}", output::render_table(&rows));
    } else {
        let rows: Vec<NetworkRow> = networks.iter().map(|n| NetworkRow::new(n, color)).collect();
        let _ = writeln!(out, "{}", output::render_table(&rows));
        for f in report.findings().iter().filter(|f| f.kind.is_batch_level()) {
            let _ = writeln!(
                out,
                "batch: {} {}",
                output::paint_severity(f.severity, color),
                f.description
            );
        }
    }

    let counts = report.counts();
    let _ = writeln!(
        out,
        "Overall risk: {}   networks: {}   rejected: {}   {}",
        output::paint_severity(report.overall_risk_level(), color),
        counts.total(),
        report.rejected() + batch.malformed,
        metadata_line(report.metadata(), report.generated_at()),
    );
    let _ = writeln!(
        out,
        "critical {} · high {} · medium {} · low {} · safe {} · unknown {}",
        counts.critical, counts.high, counts.medium, counts.low, counts.safe, counts.unknown
    );
    if !report.recommendations().is_empty() {
        let _ = writeln!(out, "\nRecommendations:");
        for rec in report.recommendations() {
            let _ = writeln!(out, "  • {rec}");
        }
    }
    out.trim_end().to_owned()
}

/// Table and plain output never reach `render_single` from here.
fn no_detail<T: ?Sized>(_: &T) -> String {
    String::new()
}

fn render(
    batches: &[AnalyzedBatch],
    analyzer: &SecurityAnalyzer,
    args: &AnalyzeArgs,
    global: &GlobalOpts,
) -> String {
    let format = global.output_format();
    let color = output::should_color(global.color_mode());
    let filter = args.filter.as_deref().unwrap_or_default();

    match format {
        OutputFormat::Table => batches
            .iter()
            .map(|b| {
                let networks = analyzer.filter_networks(&b.report, filter);
                render_table(b, &networks, args.findings, color)
            })
            .collect::<Vec<_>>()
            .join("\n\n"),

        OutputFormat::Plain => batches
            .iter()
            .flat_map(|b| analyzer.filter_networks(&b.report, filter))
            .map(|n| format!("{}\t{}", n.bssid, n.threat_level))
            .collect::<Vec<_>>()
            .join("\n"),

        // Structured formats: whole reports, unless a filter narrows them
        // down to network lists.
        _ if args.filter.is_some() => {
            let networks: Vec<&NetworkRiskAssessment> = batches
                .iter()
                .flat_map(|b| analyzer.filter_networks(&b.report, filter))
                .collect();
            output::render_single(format, networks.as_slice(), no_detail, no_detail)
        }
        _ => match batches {
            [single] => output::render_single(format, &single.report, no_detail, no_detail),
            many => output::render_single(format, many, no_detail, no_detail),
        },
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: AnalyzeArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let now = util::now(global)?;
    let overrides = metadata_override(&args, now)?;
    let analyzer = Arc::new(SecurityAnalyzer::new(cfg.analysis.clone()));

    let batches = analyze_all(args.files.clone(), Arc::clone(&analyzer), overrides, now).await?;

    let out = render(&batches, &analyzer, &args, global);
    output::print_output(&out, global.quiet);

    if let Some(fail_on) = args.fail_on.map(threshold) {
        if let Some(hit) = batches
            .iter()
            .find(|b| b.report.overall_risk_level().is_at_least(fail_on))
        {
            return Err(CliError::RiskThreshold {
                level: hit.report.overall_risk_level().to_string(),
                threshold: fail_on.to_string(),
                source_name: hit.file.clone(),
            });
        }
    }
    Ok(())
}
