//! Integration tests for the `wifisafe` CLI binary.
//!
//! Batches are written to temp files and evaluated at a pinned `--now`, so
//! freshness never depends on the wall clock.
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const NOW: &str = "2026-06-01T09:30:00Z";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `wifisafe` binary with env isolation.
///
/// Clears `WIFISAFE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn wifisafe_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wifisafe");
    cmd.env("HOME", "/tmp/wifisafe-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/wifisafe-cli-test-nonexistent")
        .env_remove("WIFISAFE_CONFIG")
        .env_remove("WIFISAFE_OUTPUT")
        .env_remove("WIFISAFE_NOW")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// One open network and one WPA3 network, captured 30s before [`NOW`].
const MIXED_BATCH: &str = r#"{
  "metadata": { "captured_at": "2026-06-01T09:29:30Z", "source": "active_scan" },
  "observations": [
    { "ssid": "Cafe", "bssid": "a4:2b:b0:00:00:01", "capabilities": "[ESS]",
      "signal_level": -55, "frequency_mhz": 2437, "timestamp": "2026-06-01T09:29:30Z" },
    { "ssid": "Home", "bssid": "3c:84:6a:10:20:30", "capabilities": "[WPA3-SAE-CCMP][ESS]",
      "signal_level": -48, "frequency_mhz": 5180, "timestamp": "2026-06-01T09:29:30Z" }
  ]
}"#;

const SECURE_BATCH: &str = r#"[
  { "ssid": "Home", "bssid": "3c:84:6a:10:20:30", "capabilities": "[WPA3-SAE-CCMP][ESS]",
    "signal_level": -48, "frequency_mhz": 5180, "timestamp": "2026-06-01T09:29:30Z" }
]"#;

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = wifisafe_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    wifisafe_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("analyze")
            .and(predicate::str::contains("classify"))
            .and(predicate::str::contains("admission")),
    );
}

#[test]
fn test_version_flag() {
    wifisafe_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wifisafe"));
}

#[test]
fn test_completions_bash() {
    wifisafe_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── classify / sanitize ─────────────────────────────────────────────

#[test]
fn test_classify_plain() {
    wifisafe_cmd()
        .args(["classify", "[WPA2-PSK-CCMP][ESS]", "[WEP]", "-o", "plain"])
        .assert()
        .success()
        .stdout("wpa2\nwep\n");
}

#[test]
fn test_classify_json_carries_baseline() {
    let output = wifisafe_cmd()
        .args(["classify", "[ESS]", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["scheme"], "open");
    assert_eq!(json[0]["baseline"], "critical");
}

#[test]
fn test_sanitize_strips_markup() {
    wifisafe_cmd()
        .args(["sanitize", "<script>Home"])
        .assert()
        .success()
        .stdout("scriptHome\n");
}

#[test]
fn test_sanitize_nothing_left() {
    wifisafe_cmd()
        .args(["sanitize", "<>;&"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no filter)"));
}

// ── analyze ─────────────────────────────────────────────────────────

#[test]
fn test_analyze_table() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", MIXED_BATCH);
    wifisafe_cmd()
        .args(["--now", NOW, "--color", "never", "analyze"])
        .arg(&batch)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Cafe")
                .and(predicate::str::contains("Overall risk: critical"))
                .and(predicate::str::contains("freshness: fresh"))
                .and(predicate::str::contains("30s ago"))
                .and(predicate::str::contains("2.4GHz"))
                .and(predicate::str::contains("5GHz")),
        );
}

#[test]
fn test_analyze_json_report() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", MIXED_BATCH);
    let output = wifisafe_cmd()
        .args(["--now", NOW, "-o", "json", "analyze"])
        .arg(&batch)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["overall_risk_level"], "critical");
    assert_eq!(json["networks"].as_array().unwrap().len(), 2);
    assert_eq!(json["counts"]["critical"], 1);
    assert_eq!(json["counts"]["safe"], 1);
    assert_eq!(json["networks"][0]["band"], "2.4GHz");
    assert_eq!(json["networks"][1]["band"], "5GHz");
}

#[test]
fn test_analyze_plain_with_filter() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", MIXED_BATCH);
    wifisafe_cmd()
        .args(["--now", NOW, "-o", "plain", "analyze", "--filter", "home"])
        .arg(&batch)
        .assert()
        .success()
        .stdout("3c:84:6a:10:20:30\tsafe\n");
}

#[test]
fn test_analyze_stale_age_is_never_safe() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", SECURE_BATCH);
    wifisafe_cmd()
        .args(["--now", NOW, "-o", "plain", "analyze", "--age", "12m"])
        .arg(&batch)
        .assert()
        .success()
        .stdout("3c:84:6a:10:20:30\tunknown\n");
}

#[test]
fn test_analyze_yaml_batch() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(
        &dir,
        "scan.yaml",
        "- ssid: Home\n  bssid: '3c:84:6a:10:20:30'\n  capabilities: '[WPA3-SAE]'\n  \
         signal_level: -48\n  frequency_mhz: 5180\n  timestamp: '2026-06-01T09:29:30Z'\n",
    );
    wifisafe_cmd()
        .args(["--now", NOW, "-o", "plain", "analyze"])
        .arg(&batch)
        .assert()
        .success()
        .stdout("3c:84:6a:10:20:30\tsafe\n");
}

#[test]
fn test_analyze_multiple_files() {
    let dir = TempDir::new().unwrap();
    let first = write_file(&dir, "a.json", MIXED_BATCH);
    let second = write_file(&dir, "b.json", SECURE_BATCH);
    let output = wifisafe_cmd()
        .args(["--now", NOW, "-o", "json", "analyze"])
        .arg(&first)
        .arg(&second)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let batches = json.as_array().unwrap();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0]["report"]["overall_risk_level"], "critical");
    assert_eq!(batches[1]["report"]["overall_risk_level"], "safe");
}

/// The second entry has a non-numeric signal, the third no timestamp.
const BATCH_WITH_UNREADABLE_ENTRIES: &str = r#"[
  { "ssid": "Home", "bssid": "3c:84:6a:10:20:30", "capabilities": "[WPA3-SAE]",
    "signal_level": -48, "timestamp": "2026-06-01T09:29:30Z" },
  { "ssid": "Loud", "bssid": "3c:84:6a:10:20:31", "capabilities": "[WPA2]",
    "signal_level": "very", "timestamp": "2026-06-01T09:29:30Z" },
  { "ssid": "Undated", "bssid": "3c:84:6a:10:20:32", "capabilities": "[WPA2]",
    "signal_level": -60 }
]"#;

#[test]
fn test_analyze_skips_unreadable_entries() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", BATCH_WITH_UNREADABLE_ENTRIES);
    wifisafe_cmd()
        .args(["--now", NOW, "-o", "plain", "analyze"])
        .arg(&batch)
        .assert()
        .success()
        .stdout("3c:84:6a:10:20:30\tsafe\n");

    wifisafe_cmd()
        .args(["--now", NOW, "--color", "never", "analyze"])
        .arg(&batch)
        .assert()
        .success()
        .stdout(predicate::str::contains("rejected: 2"));
}

#[test]
fn test_analyze_fail_on_threshold() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", MIXED_BATCH);
    let output = wifisafe_cmd()
        .args(["--now", NOW, "-q", "analyze", "--fail-on", "high"])
        .arg(&batch)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(10));
    assert!(combined_output(&output).contains("threshold"));
}

#[test]
fn test_analyze_fail_on_not_reached() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", SECURE_BATCH);
    wifisafe_cmd()
        .args(["--now", NOW, "-q", "analyze", "--fail-on", "low"])
        .arg(&batch)
        .assert()
        .success();
}

#[test]
fn test_analyze_unreadable_input() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", "{ not json");
    let output = wifisafe_cmd()
        .args(["--now", NOW, "analyze"])
        .arg(&batch)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_analyze_missing_file() {
    let output = wifisafe_cmd()
        .args(["--now", NOW, "analyze", "/tmp/wifisafe-cli-test-nonexistent/scan.json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_bad_now_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", SECURE_BATCH);
    let output = wifisafe_cmd()
        .args(["--now", "yesterday", "analyze"])
        .arg(&batch)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("now"));
}

// ── validate ────────────────────────────────────────────────────────

const BATCH_WITH_PLACEHOLDER: &str = r#"[
  { "ssid": "Home", "bssid": "3c:84:6a:10:20:30", "capabilities": "[WPA2]",
    "signal_level": -48, "timestamp": "2026-06-01T09:29:30Z" },
  { "ssid": "Ghost", "bssid": "02:00:00:00:00:00", "capabilities": "[WPA2]",
    "signal_level": -48, "timestamp": "2026-06-01T09:29:30Z" }
]"#;

#[test]
fn test_validate_reports_rejects() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", BATCH_WITH_PLACEHOLDER);
    wifisafe_cmd()
        .args(["validate", "-o", "plain"])
        .arg(&batch)
        .assert()
        .success()
        .stdout("0\tok\n1\trejected\n");
}

#[test]
fn test_validate_lists_unreadable_entries() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", BATCH_WITH_UNREADABLE_ENTRIES);
    wifisafe_cmd()
        .args(["validate", "-o", "plain"])
        .arg(&batch)
        .assert()
        .success()
        .stdout("0\tok\n1\trejected\n2\trejected\n");

    let output = wifisafe_cmd()
        .args(["validate", "-o", "json"])
        .arg(&batch)
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[1]["ssid"], "Loud");
    assert!(
        json[1]["reason"]
            .as_str()
            .unwrap()
            .starts_with("unreadable observation")
    );
}

#[test]
fn test_validate_strict_fails() {
    let dir = TempDir::new().unwrap();
    let batch = write_file(&dir, "scan.json", BATCH_WITH_PLACEHOLDER);
    let output = wifisafe_cmd()
        .args(["validate", "--strict", "-q"])
        .arg(&batch)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("1 of 2"));
}

// ── admission ───────────────────────────────────────────────────────

#[test]
fn test_admission_first_scan_succeeds() {
    wifisafe_cmd()
        .args(["--now", NOW, "-o", "plain", "admission"])
        .assert()
        .success()
        .stdout("success\n");
}

#[test]
fn test_admission_throttled_inside_window() {
    let output = wifisafe_cmd()
        .args(["--now", NOW, "-o", "json", "admission", "--since", "10s"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["decision"]["state"], "throttled");
    assert_eq!(json["decision"]["next_available_at"], "2026-06-01T09:30:20Z");
}

#[test]
fn test_admission_background_window() {
    wifisafe_cmd()
        .args(["--now", NOW, "-o", "plain", "admission", "--context", "background"])
        .args(["--since", "10m"])
        .assert()
        .success()
        .stdout("throttled\n");
}

#[test]
fn test_admission_radio_disabled() {
    wifisafe_cmd()
        .args(["--now", NOW, "-o", "plain", "admission", "--platform", "radio-disabled"])
        .assert()
        .success()
        .stdout("failed\n");
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_override() {
    wifisafe_cmd()
        .args(["--config", "/tmp/wifisafe-cli-test-nonexistent/custom.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_init_then_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    wifisafe_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[analysis]"));

    let output = wifisafe_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));

    wifisafe_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_file_thresholds_apply() {
    let dir = TempDir::new().unwrap();
    let cfg = write_file(
        &dir,
        "config.toml",
        "[analysis.admission]\nforeground_window_secs = 5\n",
    );
    wifisafe_cmd()
        .arg("--config")
        .arg(&cfg)
        .args(["--now", NOW, "-o", "plain", "admission", "--since", "10s"])
        .assert()
        .success()
        .stdout("success\n");
}

#[test]
fn test_config_defaults_pick_output() {
    let dir = TempDir::new().unwrap();
    let cfg = write_file(&dir, "config.toml", "[defaults]\noutput = \"plain\"\n");
    wifisafe_cmd()
        .arg("--config")
        .arg(&cfg)
        .args(["classify", "[WEP]"])
        .assert()
        .success()
        .stdout("wep\n");
}

#[test]
fn test_invalid_config_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    let cfg = write_file(&dir, "config.toml", "[defaults]\noutput = \"xml\"\n");
    let output = wifisafe_cmd()
        .arg("--config")
        .arg(&cfg)
        .args(["classify", "[WEP]"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_config_show_json() {
    let output = wifisafe_cmd()
        .args(["config", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["defaults"]["output"], "table");
    assert_eq!(json["analysis"]["admission"]["foreground_window_secs"], 30);
}
