#![allow(clippy::unwrap_used)]
// Concurrency tests for `ScanAdmissionController`.

use std::sync::Barrier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use wifisafe_core::{
    AdmissionConfig, PlatformResponse, ScanAdmissionController, ScanAdmissionState, ScanContext,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 9, 30, 0).unwrap()
}

#[test]
fn test_concurrent_admissions_admit_exactly_one() {
    const CALLERS: usize = 16;

    let controller = ScanAdmissionController::new(AdmissionConfig::default());
    let platform_calls = AtomicUsize::new(0);
    let barrier = Barrier::new(CALLERS);

    let states: Vec<ScanAdmissionState> = thread::scope(|s| {
        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let controller = controller.clone();
                let platform_calls = &platform_calls;
                let barrier = &barrier;
                s.spawn(move || {
                    let platform = || {
                        platform_calls.fetch_add(1, Ordering::SeqCst);
                        PlatformResponse::Accepted
                    };
                    barrier.wait();
                    controller.admit(ScanContext::Foreground, now(), &platform)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let successes = states.iter().filter(|s| s.is_success()).count();
    assert_eq!(successes, 1);
    assert_eq!(platform_calls.load(Ordering::SeqCst), 1);
    for state in states.iter().filter(|s| !s.is_success()) {
        assert_eq!(
            state,
            &ScanAdmissionState::Throttled {
                next_available_at: now() + TimeDelta::seconds(30)
            }
        );
    }
    assert_eq!(controller.last_success(), Some(now()));
}

#[test]
fn test_rejections_do_not_consume_the_window() {
    let controller = ScanAdmissionController::new(AdmissionConfig::default());
    let rejected = || PlatformResponse::Rejected {
        reason: "scan throttled by host".into(),
    };
    let accepted = || PlatformResponse::Accepted;

    assert!(matches!(
        controller.admit(ScanContext::Background, now(), &rejected),
        ScanAdmissionState::Restricted { .. }
    ));
    assert!(controller.admit(ScanContext::Background, now(), &accepted).is_success());
}

#[test]
fn test_windows_follow_config() {
    let config = AdmissionConfig {
        foreground_window_secs: 5,
        background_window_secs: 60,
    };
    let controller = ScanAdmissionController::with_last_success(config, Some(now()));
    let later = now() + TimeDelta::seconds(10);
    assert_eq!(controller.check(ScanContext::Foreground, later), None);
    assert_eq!(
        controller.check(ScanContext::Background, later),
        Some(ScanAdmissionState::Throttled {
            next_available_at: now() + TimeDelta::seconds(60)
        })
    );
}
