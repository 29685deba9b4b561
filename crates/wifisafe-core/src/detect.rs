//! Threat detection over one batch of observations.
//!
//! [`BatchIndex`] is built once per batch: it classifies every observation
//! exactly once, collapses repeated BSSIDs, and groups access points by SSID
//! and by vendor block so every rule runs in a single pass. The index
//! borrows the batch and is dropped with it; it is never shared between
//! batches.
//!
//! [`ThreatDetector::scan`] runs every rule against an index and returns
//! [`BatchFindings`]. Rules only add findings; nothing is retracted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::classify;
use crate::config::AnalysisConfig;
use crate::model::{Bssid, NetworkObservation, SecurityScheme, ThreatFinding, ThreatKind};
use crate::validate::MAX_SSID_BYTES;

/// Non-hidden SSIDs shorter than this (in characters) are suspicious.
const MIN_SSID_CHARS: usize = 3;

// ── Batch index ─────────────────────────────────────────────────────

/// One observation plus its scheme, classified once.
#[derive(Debug, Clone, Copy)]
pub struct IndexedObservation<'a> {
    pub observation: &'a NetworkObservation,
    pub scheme: SecurityScheme,
}

/// Per-batch lookup structure. Insertion-ordered so output is deterministic.
#[derive(Debug)]
pub struct BatchIndex<'a> {
    entries: Vec<IndexedObservation<'a>>,
    by_ssid: IndexMap<&'a str, IndexSet<&'a Bssid>>,
    by_vendor: IndexMap<[u8; 4], Vec<(u16, usize)>>,
    collapsed: usize,
}

impl<'a> BatchIndex<'a> {
    pub fn build(batch: &'a [NetworkObservation]) -> Self {
        let mut seen: IndexSet<&'a Bssid> = IndexSet::with_capacity(batch.len());
        let mut entries = Vec::with_capacity(batch.len());
        let mut by_ssid: IndexMap<&'a str, IndexSet<&'a Bssid>> = IndexMap::new();
        let mut by_vendor: IndexMap<[u8; 4], Vec<(u16, usize)>> = IndexMap::new();
        let mut collapsed = 0;

        for observation in batch {
            if !seen.insert(&observation.bssid) {
                debug!(bssid = %observation.bssid, "collapsing repeated BSSID in batch");
                collapsed += 1;
                continue;
            }

            let position = entries.len();
            entries.push(IndexedObservation {
                observation,
                scheme: classify::classify(&observation.raw_capabilities),
            });

            if !observation.is_hidden() {
                by_ssid
                    .entry(observation.ssid.as_str())
                    .or_default()
                    .insert(&observation.bssid);
            }

            if let (Some(block), Some(suffix)) = (
                observation.bssid.vendor_block(),
                observation.bssid.device_suffix(),
            ) {
                by_vendor.entry(block).or_default().push((suffix, position));
            }
        }

        Self {
            entries,
            by_ssid,
            by_vendor,
            collapsed,
        }
    }

    /// Unique observations, in first-seen order.
    pub fn entries(&self) -> &[IndexedObservation<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Observations dropped because their BSSID was already indexed.
    pub fn collapsed(&self) -> usize {
        self.collapsed
    }

    /// Distinct BSSIDs advertising `ssid`. Hidden SSIDs are never grouped.
    pub fn bssids_for_ssid(&self, ssid: &str) -> usize {
        self.by_ssid.get(ssid).map_or(0, IndexSet::len)
    }

    pub fn count_scheme(&self, scheme: SecurityScheme) -> usize {
        self.entries.iter().filter(|e| e.scheme == scheme).count()
    }
}

// ── Findings container ──────────────────────────────────────────────

/// Everything the detector found in one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchFindings {
    per_network: IndexMap<Bssid, Vec<ThreatFinding>>,
    batch_level: Vec<ThreatFinding>,
}

impl BatchFindings {
    fn push(&mut self, finding: ThreatFinding) {
        match finding.subject.bssid() {
            Some(bssid) => self
                .per_network
                .entry(bssid.clone())
                .or_default()
                .push(finding),
            None => self.batch_level.push(finding),
        }
    }

    pub fn for_network(&self, bssid: &Bssid) -> &[ThreatFinding] {
        self.per_network.get(bssid).map_or(&[], Vec::as_slice)
    }

    pub fn batch_level(&self) -> &[ThreatFinding] {
        &self.batch_level
    }

    /// Networks carrying a duplicate-identity finding, in network order.
    pub fn duplicate_bssids(&self) -> impl Iterator<Item = &Bssid> {
        self.per_network
            .iter()
            .filter(|(_, findings)| findings.iter().any(|f| f.kind == ThreatKind::DuplicateSsid))
            .map(|(bssid, _)| bssid)
    }

    /// Per-network findings in network order, then batch-level ones.
    pub fn iter(&self) -> impl Iterator<Item = &ThreatFinding> {
        self.per_network
            .values()
            .flatten()
            .chain(self.batch_level.iter())
    }

    pub fn len(&self) -> usize {
        self.per_network.values().map(Vec::len).sum::<usize>() + self.batch_level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Detector ────────────────────────────────────────────────────────

/// Stateless rule set. Cheap to share; all per-batch state lives in
/// [`BatchIndex`].
#[derive(Debug, Clone)]
pub struct ThreatDetector {
    patterns: Vec<String>,
    open_flood_threshold: usize,
    sequential_distance: u16,
    weak_signal_dbm: i32,
    strong_signal_dbm: i32,
}

impl ThreatDetector {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            patterns: config
                .suspicious_ssid_patterns
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            open_flood_threshold: config.open_network_flood_threshold,
            sequential_distance: config.sequential_bssid_distance,
            weak_signal_dbm: config.weak_signal_dbm,
            strong_signal_dbm: config.strong_signal_dbm,
        }
    }

    /// Build the index for `batch` and run every rule against it.
    pub fn scan(&self, batch: &[NetworkObservation], now: DateTime<Utc>) -> BatchFindings {
        self.scan_index(&BatchIndex::build(batch), now)
    }

    /// Run every rule against an already-built index.
    pub fn scan_index(&self, index: &BatchIndex<'_>, now: DateTime<Utc>) -> BatchFindings {
        let mut findings = BatchFindings::default();

        for entry in index.entries() {
            self.scheme_rule(entry, now, &mut findings);
            self.duplicate_rule(index, entry, now, &mut findings);
            self.ssid_rules(entry, now, &mut findings);
            self.signal_rules(entry, now, &mut findings);
        }
        self.sequential_rule(index, now, &mut findings);
        self.multiple_duplicates_rule(index, now, &mut findings);
        self.open_flood_rule(index, now, &mut findings);

        debug!(
            networks = index.len(),
            findings = findings.len(),
            batch_level = findings.batch_level().len(),
            "threat scan complete"
        );
        findings
    }

    /// The first configured pattern contained in `ssid`, case-insensitively.
    pub fn suspicious_pattern(&self, ssid: &str) -> Option<&str> {
        let lowered = ssid.to_lowercase();
        self.patterns
            .iter()
            .find(|p| lowered.contains(p.as_str()))
            .map(String::as_str)
    }

    // ── Per-observation rules ──

    #[allow(clippy::unused_self)]
    fn scheme_rule(&self, entry: &IndexedObservation<'_>, now: DateTime<Utc>, out: &mut BatchFindings) {
        let obs = entry.observation;
        let (kind, description) = match entry.scheme {
            SecurityScheme::Open => (ThreatKind::OpenNetwork, "Network is unencrypted"),
            SecurityScheme::Wep => (ThreatKind::WeakEncryption, "Network uses broken WEP encryption"),
            SecurityScheme::Wpa => (ThreatKind::LegacyEncryption, "Network uses deprecated WPA encryption"),
            SecurityScheme::Unknown => (
                ThreatKind::UnrecognizedSecurity,
                "Advertised security could not be recognized",
            ),
            SecurityScheme::Wpa2
            | SecurityScheme::Wpa2Wpa3Transitional
            | SecurityScheme::Wpa3
            | SecurityScheme::Enterprise => return,
        };
        let mut finding = ThreatFinding::network(kind, &obs.ssid, obs.bssid.clone(), description, now);
        if !obs.raw_capabilities.is_empty() {
            finding = finding.with_extra(obs.raw_capabilities.clone());
        }
        out.push(finding);
    }

    #[allow(clippy::unused_self)]
    fn duplicate_rule(
        &self,
        index: &BatchIndex<'_>,
        entry: &IndexedObservation<'_>,
        now: DateTime<Utc>,
        out: &mut BatchFindings,
    ) {
        let obs = entry.observation;
        if obs.is_hidden() {
            return;
        }
        let group = index.bssids_for_ssid(&obs.ssid);
        if group < 2 {
            return;
        }
        out.push(
            ThreatFinding::network(
                ThreatKind::DuplicateSsid,
                &obs.ssid,
                obs.bssid.clone(),
                format!(
                    "SSID '{}' is advertised by {group} different access points",
                    obs.ssid
                ),
                now,
            )
            .with_extra(format!("group_size={group}")),
        );
    }

    fn ssid_rules(&self, entry: &IndexedObservation<'_>, now: DateTime<Utc>, out: &mut BatchFindings) {
        let obs = entry.observation;
        let finding = |kind, description: String| {
            ThreatFinding::network(kind, &obs.ssid, obs.bssid.clone(), description, now)
        };

        if obs.is_hidden() {
            out.push(finding(
                ThreatKind::HiddenNetwork,
                "Network does not broadcast its name".into(),
            ));
            return;
        }

        if let Some(pattern) = self.suspicious_pattern(&obs.ssid) {
            out.push(
                finding(
                    ThreatKind::SuspiciousSsid,
                    format!("SSID '{}' matches a generic or default name", obs.ssid),
                )
                .with_extra(pattern.to_owned()),
            );
        }

        let bytes = obs.ssid.len();
        if bytes > MAX_SSID_BYTES {
            out.push(finding(
                ThreatKind::SsidTooLong,
                format!("SSID is {bytes} bytes, longer than 802.11 allows"),
            ));
        }
        if obs.ssid.chars().count() < MIN_SSID_CHARS {
            out.push(finding(
                ThreatKind::SsidTooShort,
                format!("SSID '{}' is unusually short", obs.ssid),
            ));
        }
    }

    fn signal_rules(&self, entry: &IndexedObservation<'_>, now: DateTime<Utc>, out: &mut BatchFindings) {
        let obs = entry.observation;
        if obs.signal_level < self.weak_signal_dbm {
            out.push(
                ThreatFinding::network(
                    ThreatKind::WeakSignal,
                    &obs.ssid,
                    obs.bssid.clone(),
                    format!("Weak signal ({} dBm)", obs.signal_level),
                    now,
                )
                .with_extra(format!("{} dBm", obs.signal_level)),
            );
        }
        if obs.signal_level > self.strong_signal_dbm {
            out.push(
                ThreatFinding::network(
                    ThreatKind::SignalAnomaly,
                    &obs.ssid,
                    obs.bssid.clone(),
                    format!("Implausibly strong signal ({} dBm)", obs.signal_level),
                    now,
                )
                .with_extra(format!("{} dBm", obs.signal_level)),
            );
        }
    }

    // ── Batch rules ──

    /// Within each vendor block, sort by the last two octets and flag
    /// neighbours whose suffixes are within the configured distance.
    fn sequential_rule(&self, index: &BatchIndex<'_>, now: DateTime<Utc>, out: &mut BatchFindings) {
        let mut neighbours: BTreeMap<usize, Vec<usize>> = BTreeMap::new();

        for members in index.by_vendor.values() {
            if members.len() < 2 {
                continue;
            }
            let mut sorted = members.clone();
            sorted.sort_unstable();
            for pair in sorted.windows(2) {
                let [(lo, a), (hi, b)] = [pair[0], pair[1]];
                if hi - lo <= self.sequential_distance {
                    neighbours.entry(a).or_default().push(b);
                    neighbours.entry(b).or_default().push(a);
                }
            }
        }

        for (position, partners) in neighbours {
            let Some(entry) = index.entries().get(position) else {
                continue;
            };
            let obs = entry.observation;
            let partners: Vec<String> = partners
                .iter()
                .filter_map(|p| index.entries().get(*p))
                .map(|e| e.observation.bssid.to_string())
                .collect();
            out.push(
                ThreatFinding::network(
                    ThreatKind::SequentialBssid,
                    &obs.ssid,
                    obs.bssid.clone(),
                    format!(
                        "Hardware address is sequential with {} other access point(s)",
                        partners.len()
                    ),
                    now,
                )
                .with_extra(partners.join(",")),
            );
        }
    }

    #[allow(clippy::unused_self)]
    fn multiple_duplicates_rule(&self, index: &BatchIndex<'_>, now: DateTime<Utc>, out: &mut BatchFindings) {
        for (ssid, bssids) in &index.by_ssid {
            if bssids.len() > 2 {
                out.push(
                    ThreatFinding::batch(
                        ThreatKind::MultipleDuplicates,
                        format!(
                            "SSID '{ssid}' is advertised by {} access points",
                            bssids.len()
                        ),
                        now,
                    )
                    .with_extra(format!("ssid={ssid}")),
                );
            }
        }
    }

    fn open_flood_rule(&self, index: &BatchIndex<'_>, now: DateTime<Utc>, out: &mut BatchFindings) {
        let open = index.count_scheme(SecurityScheme::Open);
        if open > self.open_flood_threshold {
            out.push(
                ThreatFinding::batch(
                    ThreatKind::SuspiciousActivity,
                    format!(
                        "{open} open networks in range (threshold {})",
                        self.open_flood_threshold
                    ),
                    now,
                )
                .with_extra(format!("open_networks={open}")),
            );
        }
    }
}
