use std::sync::Arc;
use std::time::Duration;

use offsite_core::{Error, SYNC_SERVICE, ServiceState, StatusBoard, SyncOrchestrator};
use offsite_engine::OutputLine;
use offsite_meta::{Endpoint, SyncPair};
use offsite_test_utils::{
    EngineCall, FakeEngine, RecordingAlertSink, object_endpoint, pair, registry, share_endpoint,
};
use pretty_assertions::assert_eq;

const STATS: &str = r#"{"time":"2025-03-01T10:00:00Z","level":"notice","msg":"stats","stats":{"bytes":1024,"checks":2,"deletedDirs":0,"deletes":0,"elapsedTime":3.5,"errors":0,"eta":5,"fatalError":false,"renames":0,"speed":512.0,"totalBytes":2048,"totalChecks":2,"totalTransfers":1}}"#;

struct Harness {
    engine: Arc<FakeEngine>,
    alerts: Arc<RecordingAlertSink>,
    status: Arc<StatusBoard>,
    orchestrator: SyncOrchestrator,
}

fn harness(engine: FakeEngine, pairs: Vec<SyncPair>) -> Harness {
    let engine = Arc::new(engine);
    let alerts = Arc::new(RecordingAlertSink::new());
    let status = Arc::new(StatusBoard::new());
    let registry = registry([
        Endpoint::Share(share_endpoint("nas")),
        Endpoint::Object(object_endpoint("b2")),
    ]);

    let orchestrator = SyncOrchestrator::new(
        engine.clone(),
        Arc::new(registry),
        pairs,
        alerts.clone(),
        status.clone(),
    );
    Harness {
        engine,
        alerts,
        status,
        orchestrator,
    }
}

#[tokio::test]
async fn test_failed_pair_does_not_stop_the_cycle() {
    let engine = FakeEngine::new()
        .with_sync("nas:photos/library", "b2:backup/library", vec![], 0)
        .with_sync(
            "nas:docs/",
            "b2:backup/docs",
            vec![OutputLine::stderr("ERROR : permission denied")],
            1,
        );
    let h = harness(
        engine,
        vec![
            pair("share:nas://photos/library", "object:b2://backup/library"),
            pair("share:nas://docs/", "object:b2://backup/docs"),
        ],
    );

    let report = h.orchestrator.sync_all().await;

    assert_eq!(report.synced, vec!["share:nas://photos/library → object:b2://backup/library"]);
    assert_eq!(report.errors.len(), 1);

    let sent = h.alerts.sent();
    assert_eq!(sent[0], "Synced nas:photos/library → b2:backup/library");
    let failures: Vec<_> = sent.iter().filter(|m| m.contains("failed")).collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].starts_with("Sync share:nas://docs/ → object:b2://backup/docs failed:"));
    assert!(failures[0].contains("exit code 1"));
    assert!(failures[0].contains("permission denied"));
}

#[tokio::test]
async fn test_pairs_run_in_order() {
    let h = harness(
        FakeEngine::new(),
        vec![
            pair("share:nas://a/", "object:b2://backup/a"),
            pair("local:///srv/b", "object:b2://backup/b"),
        ],
    );

    h.orchestrator.sync_all().await;

    assert_eq!(
        h.engine.calls(),
        vec![
            EngineCall::Sync {
                src: "nas:a/".into(),
                dst: "b2:backup/a".into()
            },
            EngineCall::Sync {
                src: "/srv/b".into(),
                dst: "b2:backup/b".into()
            },
        ]
    );
}

#[tokio::test]
async fn test_progress_edits_a_single_status() {
    let engine = FakeEngine::new().with_sync(
        "nas:photos/library",
        "b2:backup/library",
        vec![
            OutputLine::stderr(STATS),
            OutputLine::stdout(""),
            OutputLine::stderr("not json at all"),
            OutputLine::stderr(STATS),
        ],
        0,
    );
    let h = harness(
        engine,
        vec![pair("share:nas://photos/library", "object:b2://backup/library")],
    );

    h.orchestrator.sync_all().await;

    assert_eq!(h.alerts.statuses_created(), 1);
    let progress = "nas:photos/library → b2:backup/library: 1.0 KiB/2.0 KiB (50%), 512 B/s, ETA 5s, 2 checks, 0 errors";
    assert_eq!(
        h.alerts.status_updates(),
        vec![
            progress.to_string(),
            "nas:photos/library → b2:backup/library: not json at all".to_string(),
            progress.to_string(),
        ]
    );
    assert_eq!(
        h.alerts.sent(),
        vec!["Synced nas:photos/library → b2:backup/library (1.0 KiB transferred)"]
    );
}

#[tokio::test]
async fn test_transfer_failure_keeps_last_lines() {
    let lines: Vec<_> = (0..30)
        .map(|i| OutputLine::stderr(format!("line {}", i)))
        .collect();
    let h = harness(
        FakeEngine::new().with_sync("nas:a/", "b2:backup/a", lines, 3),
        vec![],
    );

    let err = h
        .orchestrator
        .sync_pair(&pair("share:nas://a/", "object:b2://backup/a"))
        .await
        .unwrap_err();

    match err {
        Error::TransferFailed { pair, code, output } => {
            assert_eq!(pair, "share:nas://a/ → object:b2://backup/a");
            assert_eq!(code, Some(3));
            let kept: Vec<_> = output.lines().collect();
            assert_eq!(kept.len(), 20);
            assert_eq!(kept[0], "line 10");
            assert_eq!(kept[19], "line 29");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_endpoint_is_isolated_to_its_pair() {
    let h = harness(
        FakeEngine::new(),
        vec![
            pair("share:offline://a/", "object:b2://backup/a"),
            pair("share:nas://b/", "object:b2://backup/b"),
        ],
    );

    let report = h.orchestrator.sync_all().await;

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("offline"));
    assert_eq!(report.synced.len(), 1);
    assert_eq!(h.engine.calls().len(), 1);
}

#[tokio::test]
async fn test_status_published_around_cycle() {
    let h = harness(
        FakeEngine::new().with_sync("nas:a/", "b2:backup/a", vec![], 2),
        vec![pair("share:nas://a/", "object:b2://backup/a")],
    );

    h.orchestrator.sync_all().await;

    let status = h.status.get(SYNC_SERVICE).await.unwrap();
    assert_eq!(status.state, ServiceState::Degraded);
    assert_eq!(status.detail.as_deref(), Some("1 of 1 pairs failed to sync"));
    assert!(status.last_run_at.is_some());
    assert!(status.next_run_at.unwrap() > status.last_run_at.unwrap());
}

#[tokio::test]
async fn test_clean_cycle_is_idle() {
    let h = harness(
        FakeEngine::new(),
        vec![pair("share:nas://a/", "object:b2://backup/a")],
    );

    let report = h.orchestrator.sync_all().await;

    assert!(report.is_success());
    let status = h.status.get(SYNC_SERVICE).await.unwrap();
    assert_eq!(status.state, ServiceState::Idle);
    assert_eq!(status.detail.as_deref(), Some("Synced 1 pairs"));
}

#[tokio::test]
async fn test_out_of_range_interval_leaves_next_run_unset() {
    let mut h = harness(
        FakeEngine::new(),
        vec![pair("share:nas://a/", "object:b2://backup/a")],
    );
    h.orchestrator = h
        .orchestrator
        .with_interval(Duration::from_secs(10_000_000_000_000));

    let report = h.orchestrator.sync_all().await;

    assert!(report.is_success());
    let status = h.status.get(SYNC_SERVICE).await.unwrap();
    assert_eq!(status.state, ServiceState::Idle);
    assert!(status.last_run_at.is_some());
    assert_eq!(status.next_run_at, None);
}
