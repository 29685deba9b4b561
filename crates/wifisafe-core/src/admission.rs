// ── Scan admission ──
//
// Decides whether a device-level scan may be requested right now. The
// controller owns the only call-to-call state in the crate: the instant of
// the last successful scan. Each decision walks
// `Idle -> Requested -> {Success | Throttled | Restricted | Failed}` while
// holding the lock, so two concurrent callers can never both be admitted
// inside one throttle window.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::{debug, info, warn};

use crate::config::AdmissionConfig;

// ── Inputs ──────────────────────────────────────────────────────────

/// Where the scan request originates.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ScanContext {
    /// The user is looking at the app.
    Foreground,
    /// Periodic or scheduled work.
    Background,
}

/// What the host platform said when asked to start a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum PlatformResponse {
    Accepted,
    /// The platform refused (its own throttling, missing permission, ...).
    Rejected { reason: String },
    RadioDisabled,
    Failed { reason: String },
}

/// The host side of a scan request.
pub trait ScanPlatform {
    fn request_scan(&self) -> PlatformResponse;
}

impl<F> ScanPlatform for F
where
    F: Fn() -> PlatformResponse,
{
    fn request_scan(&self) -> PlatformResponse {
        self()
    }
}

// ── Outcome ─────────────────────────────────────────────────────────

/// Terminal state of one admission decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScanAdmissionState {
    Success,
    Throttled { next_available_at: DateTime<Utc> },
    Restricted { reason: String },
    Failed { reason: String },
}

impl ScanAdmissionState {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Throttled { .. } => "throttled",
            Self::Restricted { .. } => "restricted",
            Self::Failed { .. } => "failed",
        }
    }
}

// ── Controller ──────────────────────────────────────────────────────

/// Scan admission policy with its last-success timestamp.
///
/// Cheaply cloneable; clones share the same timestamp. Create one per
/// logical scanning session and hand it to whoever requests scans.
#[derive(Debug, Clone)]
pub struct ScanAdmissionController {
    inner: Arc<AdmissionInner>,
}

#[derive(Debug)]
struct AdmissionInner {
    config: AdmissionConfig,
    last_success: Mutex<Option<DateTime<Utc>>>,
}

impl ScanAdmissionController {
    pub fn new(config: AdmissionConfig) -> Self {
        Self::with_last_success(config, None)
    }

    /// Resume a session whose last successful scan is already known.
    pub fn with_last_success(config: AdmissionConfig, last_success: Option<DateTime<Utc>>) -> Self {
        Self {
            inner: Arc::new(AdmissionInner {
                config,
                last_success: Mutex::new(last_success),
            }),
        }
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.inner.config
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        *self.lock()
    }

    /// Throttle pre-check without contacting the platform. `None` means a
    /// request made now would reach the platform.
    pub fn check(&self, context: ScanContext, now: DateTime<Utc>) -> Option<ScanAdmissionState> {
        let last = *self.lock();
        self.throttle(context, last, now)
    }

    /// Run one full admission decision.
    ///
    /// The lock is held from the throttle check until the success is
    /// recorded, so the platform call is serialized with other admissions.
    pub fn admit(
        &self,
        context: ScanContext,
        now: DateTime<Utc>,
        platform: &impl ScanPlatform,
    ) -> ScanAdmissionState {
        let mut last = self.lock();
        debug!(%context, last_success = ?*last, "scan requested");

        if let Some(throttled) = self.throttle(context, *last, now) {
            return throttled;
        }

        match platform.request_scan() {
            PlatformResponse::Accepted => {
                *last = Some(now);
                info!(%context, "scan admitted");
                ScanAdmissionState::Success
            }
            PlatformResponse::Rejected { reason } => {
                warn!(%context, %reason, "platform rejected scan");
                ScanAdmissionState::Restricted { reason }
            }
            PlatformResponse::RadioDisabled => {
                warn!(%context, "wireless radio is disabled");
                ScanAdmissionState::Failed {
                    reason: "wireless radio is disabled".into(),
                }
            }
            PlatformResponse::Failed { reason } => {
                warn!(%context, %reason, "scan request failed");
                ScanAdmissionState::Failed { reason }
            }
        }
    }

    /// Throttle window for a context.
    pub fn window(&self, context: ScanContext) -> TimeDelta {
        match context {
            ScanContext::Foreground => self.inner.config.foreground_window(),
            ScanContext::Background => self.inner.config.background_window(),
        }
    }

    fn throttle(
        &self,
        context: ScanContext,
        last: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<ScanAdmissionState> {
        let last = last?;
        let next_available_at = last
            .checked_add_signed(self.window(context))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        if now < next_available_at {
            debug!(%context, %next_available_at, "scan throttled");
            Some(ScanAdmissionState::Throttled { next_available_at })
        } else {
            None
        }
    }

    /// The guarded value is a plain timestamp, so a panic elsewhere cannot
    /// leave it half-written.
    fn lock(&self) -> MutexGuard<'_, Option<DateTime<Utc>>> {
        self.inner
            .last_success
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
