//! Property-based tests using proptest.
//!
//! Properties cover identifier shape, expiry arithmetic, the write-once
//! outcome slot, and status label parsing under arbitrary inputs.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use proptest::prelude::*;

use raceapp_tasks::{TaskConfig, TaskFailure, TaskId, TaskRecord, TaskRegistry, TaskStatus};

// ─── Arbitrary Strategies ───────────────────────────────────────────────────

fn arb_outcome() -> impl Strategy<Value = Result<u32, TaskFailure<String>>> {
    prop_oneof![
        any::<u32>().prop_map(Ok),
        "[a-z ]{1,20}".prop_map(|msg| Err(TaskFailure::Work(msg))),
        (1u64..10_000).prop_map(|ms| Err(TaskFailure::TimedOut {
            timeout: Duration::from_millis(ms)
        })),
        "[a-z ]{1,20}".prop_map(|msg| Err(TaskFailure::Aborted(msg))),
    ]
}

// ─── Identifier Properties ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn generated_ids_are_short_lowercase_hex(_seed in any::<u8>()) {
        let id = TaskId::generate();
        prop_assert_eq!(id.as_str().len(), 8);
        prop_assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn id_serializes_as_plain_string(raw in "[a-z0-9]{8}") {
        let id = TaskId::from(raw.as_str());
        let json = serde_json::to_string(&id).unwrap();
        prop_assert_eq!(json, format!("\"{raw}\""));
    }
}

// ─── Expiry Properties ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn expired_iff_age_exceeds_retention(
        age_secs in 0i64..=20_000,
        retention_secs in 1u64..=10_000,
    ) {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        let record: TaskRecord<(), ()> =
            TaskRecord::with_created_at(TaskId::generate(), now - ChronoDuration::seconds(age_secs));

        let expired = record.is_expired(now, Duration::from_secs(retention_secs));
        prop_assert_eq!(expired, age_secs as u64 > retention_secs);
    }

    #[test]
    fn sweep_removes_exactly_the_stale_records(
        ages in prop::collection::vec(0i64..=7_200, 0..40),
    ) {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        let retention = Duration::from_secs(3_600);
        let registry: TaskRegistry<(), ()> = TaskRegistry::new();

        for (index, age) in ages.iter().enumerate() {
            registry.insert(std::sync::Arc::new(TaskRecord::with_created_at(
                TaskId::from(format!("{index:08}")),
                now - ChronoDuration::seconds(*age),
            )));
        }

        let stale = ages.iter().filter(|age| **age > 3_600).count();
        prop_assert_eq!(registry.remove_expired(now, retention), stale);
        prop_assert_eq!(registry.len(), ages.len() - stale);
    }
}

// ─── Outcome Properties ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn first_resolution_wins(first in arb_outcome(), second in arb_outcome()) {
        let record: TaskRecord<u32, String> = TaskRecord::new(TaskId::generate());

        prop_assert!(record.resolve(first.clone()));
        prop_assert!(!record.resolve(second));

        prop_assert_eq!(record.outcome(), Some(&first));
        let expected = if first.is_ok() { TaskStatus::Completed } else { TaskStatus::Failed };
        prop_assert_eq!(record.status(), expected);
        prop_assert!(record.status().is_terminal());
    }
}

// ─── Config Properties ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn positive_durations_validate(
        timeout in 1u64..=1_000_000,
        retention in 1u64..=1_000_000,
        interval in 1u64..=1_000_000,
    ) {
        let config = TaskConfig::default()
            .with_task_timeout(Duration::from_millis(timeout))
            .with_retention(Duration::from_millis(retention))
            .with_sweep_interval(Duration::from_millis(interval));

        prop_assert!(config.validate().is_ok());
        prop_assert_eq!(config.task_timeout(), Duration::from_millis(timeout));
        prop_assert_eq!(config.retention(), Duration::from_millis(retention));
    }

    #[test]
    fn arbitrary_status_labels_never_panic(label in ".{0,24}") {
        let _ = serde_json::from_value::<TaskStatus>(serde_json::Value::String(label));
    }
}
