//! Risk analysis for observed Wi-Fi access points.
//!
//! Given a batch of scan observations (SSID, BSSID, advertised capability
//! string, signal, frequency) this crate decides how dangerous each network
//! is and why, deterministically, and never reports a network as safe on
//! the strength of stale data.
//!
//! - **[`classify`]**: capability string to [`SecurityScheme`] and baseline
//!   tier, by strict priority.
//!
//! - **[`validate`]**: rejects malformed observations as values
//!   ([`ValidationOutcome`]) and sanitizes free-text search queries.
//!
//! - **[`ThreatDetector`]**: builds a per-batch [`BatchIndex`] and runs the
//!   rule set: duplicate SSIDs (evil twins), sequential BSSIDs, suspicious
//!   names, open-network floods, signal anomalies.
//!
//! - **[`RiskAggregator`]**: escalates baselines and folds findings into a
//!   [`NetworkRiskAssessment`]; [`aggregate::overall_risk`] and
//!   [`aggregate::recommendations`] summarize the batch.
//!
//! - **[`FreshnessPolicy`]**: the fail-safe: `Safe` is only ever reported
//!   for fresh data.
//!
//! - **[`SecurityAnalyzer`]**: the whole pipeline in one call, producing an
//!   immutable [`SecurityReport`].
//!
//! - **[`ScanAdmissionController`]**: independent throttle/permission state
//!   machine deciding whether a new device scan may be requested.

pub mod admission;
pub mod aggregate;
pub mod analyzer;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod freshness;
pub mod model;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use admission::{
    PlatformResponse, ScanAdmissionController, ScanAdmissionState, ScanContext, ScanPlatform,
};
pub use aggregate::RiskAggregator;
pub use analyzer::SecurityAnalyzer;
pub use config::{AdmissionConfig, AnalysisConfig, FreshnessThresholds};
pub use detect::{BatchFindings, BatchIndex, ThreatDetector};
pub use error::CoreError;
pub use freshness::FreshnessPolicy;
pub use validate::{InvalidReason, RejectedObservation, ValidatedBatch, ValidationOutcome};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Band, Bssid, FindingSubject, Freshness, NetworkObservation, NetworkRiskAssessment, ScanMetadata,
    ScanSource, SecurityReport, SecurityScheme, Severity, ThreatFinding, ThreatKind, TierCounts,
};
