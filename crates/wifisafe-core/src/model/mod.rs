// ── Domain model ──
//
// Every type the analysis pipeline consumes or produces. Inputs
// (observations, metadata) deserialize from whatever the scan source
// emits; outputs (assessments, reports) serialize for persistence and UI.

pub mod bssid;
pub mod finding;
pub mod metadata;
pub mod observation;
pub mod report;
pub mod scheme;
pub mod severity;

// ── Re-exports ──────────────────────────────────────────────────────

pub use bssid::Bssid;
pub use finding::{FindingSubject, ThreatFinding, ThreatKind};
pub use metadata::{Freshness, ScanMetadata, ScanSource};
pub use observation::{Band, HIDDEN_SSID_PLACEHOLDERS, NetworkObservation, is_hidden_ssid};
pub use report::{NetworkRiskAssessment, SecurityReport, TierCounts};
pub use scheme::SecurityScheme;
pub use severity::Severity;
