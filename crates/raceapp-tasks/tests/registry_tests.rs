//! Integration tests for eviction and concurrent access.
//!
//! Tests cover retention-based eviction through the manager, the background
//! sweeper, and concurrent submissions and reads.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use raceapp_tasks::{TaskConfig, TaskError, TaskId, TaskManager, TaskRecord, TaskStatus};

type Manager = TaskManager<u64, String>;

async fn wait_for_terminal(manager: &Manager, id: &TaskId) -> TaskStatus {
    for _ in 0..500 {
        let status = manager.status(id.as_str());
        if status.is_terminal() {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task {id} did not reach a terminal state");
}

// ─── Eviction Tests ─────────────────────────────────────────────────────────

mod eviction_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn terminal_tasks_are_gone_after_retention() {
        let manager: Manager = TaskManager::new(TaskConfig::default()).unwrap();
        let done = manager.submit(|| Ok(1));
        let failed = manager.submit(|| Err("no logs".to_string()));

        assert_eq!(wait_for_terminal(&manager, &done).await, TaskStatus::Completed);
        assert_eq!(wait_for_terminal(&manager, &failed).await, TaskStatus::Failed);

        let removed = manager.sweep_expired_at(Utc::now() + ChronoDuration::minutes(61));
        assert_eq!(removed, 2);

        assert_eq!(manager.status(done.as_str()), TaskStatus::NotFound);
        assert_eq!(manager.status(failed.as_str()), TaskStatus::NotFound);
        assert!(matches!(
            manager.result(done.as_str()),
            Err(TaskError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn in_progress_tasks_are_evicted_too() {
        let manager: Manager = TaskManager::new(TaskConfig::default()).unwrap();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let id = manager.submit(move || {
            let _ = release_rx.recv();
            Ok(5)
        });
        assert_eq!(manager.status(id.as_str()), TaskStatus::InProgress);

        manager.sweep_expired_at(Utc::now() + ChronoDuration::hours(2));
        assert_eq!(manager.status(id.as_str()), TaskStatus::NotFound);

        // The detached work still finishes without disturbing anything.
        release_tx.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(manager.status(id.as_str()), TaskStatus::NotFound);
    }

    #[tokio::test]
    async fn tasks_within_retention_survive_a_sweep() {
        let manager: Manager = TaskManager::new(TaskConfig::default()).unwrap();
        let id = manager.submit(|| Ok(9));
        wait_for_terminal(&manager, &id).await;

        assert_eq!(
            manager.sweep_expired_at(Utc::now() + ChronoDuration::minutes(30)),
            0
        );
        assert_eq!(manager.result(id.as_str()).unwrap(), 9);
    }

    #[tokio::test]
    async fn task_submitted_after_sweep_start_is_unaffected() {
        let manager: Manager = TaskManager::new(TaskConfig::default()).unwrap();
        let old = TaskId::from("0ld0ld00");
        manager.registry().insert(Arc::new(TaskRecord::with_created_at(
            old.clone(),
            Utc::now() - ChronoDuration::hours(2),
        )));

        // The sweep reads its clock before the new submission lands.
        let sweep_started = Utc::now();
        let new = manager.submit(|| Ok(2));
        assert_eq!(manager.sweep_expired_at(sweep_started), 1);

        assert_eq!(manager.status(old.as_str()), TaskStatus::NotFound);
        assert_ne!(manager.status(new.as_str()), TaskStatus::NotFound);
    }

    #[tokio::test]
    async fn no_eviction_before_first_sweep_interval() {
        let config = TaskConfig::default()
            .with_retention(Duration::from_millis(1))
            .with_sweep_interval(Duration::from_secs(3600));
        let manager: Manager = TaskManager::new(config).unwrap();
        let id = manager.submit(|| Ok(4));

        assert_eq!(wait_for_terminal(&manager, &id).await, TaskStatus::Completed);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(manager.status(id.as_str()), TaskStatus::Completed);
        assert_eq!(manager.result(id.as_str()).unwrap(), 4);
    }

    #[tokio::test]
    async fn background_sweeper_evicts_without_callers() {
        let config = TaskConfig::default()
            .with_retention(Duration::from_millis(30))
            .with_sweep_interval(Duration::from_millis(20));
        let manager: Manager = TaskManager::new(config).unwrap();
        let id = manager.submit(|| Ok(3));

        for _ in 0..200 {
            if manager.status(id.as_str()) == TaskStatus::NotFound {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(manager.status(id.as_str()), TaskStatus::NotFound);
        assert!(manager.is_empty());
    }
}

// ─── Concurrency Tests ──────────────────────────────────────────────────────

mod concurrency_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submissions_get_distinct_ids() {
        let manager: Arc<Manager> = Arc::new(TaskManager::new(TaskConfig::default()).unwrap());

        let mut handles = Vec::new();
        for i in 0..100_u64 {
            let manager = Arc::clone(&manager);
            handles.push(tokio::spawn(async move { manager.submit(move || Ok(i)) }));
        }

        let ids: Vec<TaskId> = futures_join(handles).await;
        let unique: HashSet<&TaskId> = ids.iter().collect();

        assert_eq!(ids.len(), 100);
        assert_eq!(unique.len(), 100, "task ids must not collide");
        assert_eq!(manager.len(), 100, "no record may be lost");
        for id in &ids {
            assert_ne!(manager.status(id.as_str()), TaskStatus::NotFound);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn submissions_from_plain_threads() {
        let manager: Arc<Manager> = Arc::new(TaskManager::new(TaskConfig::default()).unwrap());

        let ids: Vec<TaskId> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8_u64)
                .map(|t| {
                    let manager = &manager;
                    scope.spawn(move || {
                        (0..10_u64)
                            .map(|i| manager.submit(move || Ok(t * 10 + i)))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers
                .into_iter()
                .flat_map(|worker| worker.join().unwrap())
                .collect()
        });

        assert_eq!(ids.len(), 80);
        assert_eq!(manager.len(), 80);
        for id in &ids {
            wait_for_terminal(&manager, id).await;
        }
        let total: u64 = ids
            .iter()
            .map(|id| manager.result(id.as_str()).unwrap())
            .sum();
        assert_eq!(total, (0..80).sum::<u64>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reads_and_sweeps_interleave_with_submissions() {
        let manager: Arc<Manager> = Arc::new(TaskManager::new(TaskConfig::default()).unwrap());

        let mut handles = Vec::new();
        for i in 0..20_u64 {
            let manager = Arc::clone(&manager);
            handles.push(tokio::spawn(async move {
                let id = manager.submit(move || Ok(i));
                let _ = manager.status(id.as_str());
                let _ = manager.result(id.as_str());
                manager.sweep_expired();
                id
            }));
        }

        let ids: Vec<TaskId> = futures_join(handles).await;
        assert_eq!(manager.len(), 20);
        for id in &ids {
            assert_eq!(wait_for_terminal(&manager, id).await, TaskStatus::Completed);
        }
    }

    async fn futures_join<T>(handles: Vec<tokio::task::JoinHandle<T>>) -> Vec<T> {
        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            out.push(handle.await.unwrap());
        }
        out
    }
}
