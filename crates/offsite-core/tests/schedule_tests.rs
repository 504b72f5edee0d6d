use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use offsite_core::{CancellationToken, Cycle, Error, Result, Scheduler};
use offsite_test_utils::RecordingAlertSink;

enum Behaviour {
    Succeed,
    Fail,
    Panic,
    Hang,
    CancelAfter(usize),
}

struct TestCycle {
    behaviour: Behaviour,
    runs: AtomicUsize,
    shutdown: CancellationToken,
}

impl TestCycle {
    fn new(behaviour: Behaviour, shutdown: &CancellationToken) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            runs: AtomicUsize::new(0),
            shutdown: shutdown.clone(),
        })
    }

    fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Cycle for TestCycle {
    fn name(&self) -> &str {
        "test"
    }

    async fn run_cycle(&self) -> Result<()> {
        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        match self.behaviour {
            Behaviour::Succeed => Ok(()),
            Behaviour::Fail => Err(Error::Task {
                message: "disk on fire".into(),
            }),
            Behaviour::Panic => panic!("cycle exploded"),
            Behaviour::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
            Behaviour::CancelAfter(limit) => {
                if run >= limit {
                    self.shutdown.cancel();
                }
                Ok(())
            }
        }
    }
}

fn scheduler(interval: Duration, shutdown: &CancellationToken) -> (Scheduler, Arc<RecordingAlertSink>) {
    let alerts = Arc::new(RecordingAlertSink::new());
    let scheduler = Scheduler::new(interval, shutdown.clone(), alerts.clone());
    (scheduler, alerts)
}

#[tokio::test]
async fn test_run_once_success_sends_nothing() {
    let shutdown = CancellationToken::new();
    let (scheduler, alerts) = scheduler(Duration::from_secs(60), &shutdown);
    let cycle = TestCycle::new(Behaviour::Succeed, &shutdown);

    scheduler.run_once(cycle.clone()).await.unwrap();

    assert_eq!(cycle.runs(), 1);
    assert!(alerts.sent().is_empty());
}

#[tokio::test]
async fn test_run_once_error_is_alerted() {
    let shutdown = CancellationToken::new();
    let (scheduler, alerts) = scheduler(Duration::from_secs(60), &shutdown);

    let result = scheduler
        .run_once(TestCycle::new(Behaviour::Fail, &shutdown))
        .await;

    assert!(result.is_err());
    assert_eq!(alerts.sent(), vec!["test cycle failed: Task failed: disk on fire"]);
}

#[tokio::test]
async fn test_run_once_panic_is_caught() {
    let shutdown = CancellationToken::new();
    let (scheduler, alerts) = scheduler(Duration::from_secs(60), &shutdown);

    let result = scheduler
        .run_once(TestCycle::new(Behaviour::Panic, &shutdown))
        .await;

    assert!(matches!(result, Err(Error::Task { .. })));
    let sent = alerts.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("test cycle failed:"));
}

#[tokio::test]
async fn test_run_repeats_until_cancelled() {
    let shutdown = CancellationToken::new();
    let (scheduler, _alerts) = scheduler(Duration::from_millis(5), &shutdown);
    let cycle = TestCycle::new(Behaviour::CancelAfter(3), &shutdown);

    tokio::time::timeout(Duration::from_secs(5), scheduler.run(cycle.clone()))
        .await
        .unwrap();

    assert_eq!(cycle.runs(), 3);
}

#[tokio::test]
async fn test_failures_do_not_stop_the_loop() {
    let shutdown = CancellationToken::new();
    let (scheduler, alerts) = scheduler(Duration::from_millis(5), &shutdown);
    let cycle = TestCycle::new(Behaviour::Fail, &shutdown);

    let stopper = {
        let shutdown = shutdown.clone();
        let cycle = cycle.clone();
        tokio::spawn(async move {
            while cycle.runs() < 3 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            shutdown.cancel();
        })
    };

    tokio::time::timeout(Duration::from_secs(5), scheduler.run(cycle.clone()))
        .await
        .unwrap();
    stopper.await.unwrap();

    assert!(cycle.runs() >= 3);
    assert!(alerts.sent().len() >= 3);
}

#[tokio::test]
async fn test_cancel_during_sleep_returns_promptly() {
    let shutdown = CancellationToken::new();
    let (scheduler, _alerts) = scheduler(Duration::from_secs(3600), &shutdown);
    let cycle = TestCycle::new(Behaviour::Succeed, &shutdown);

    let canceller = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            shutdown.cancel();
        })
    };

    tokio::time::timeout(Duration::from_secs(5), scheduler.run(cycle.clone()))
        .await
        .unwrap();
    canceller.await.unwrap();

    assert_eq!(cycle.runs(), 1);
}

#[tokio::test]
async fn test_cancel_interrupts_a_hung_cycle() {
    let shutdown = CancellationToken::new();
    let (scheduler, alerts) = scheduler(Duration::from_secs(3600), &shutdown);
    let cycle = TestCycle::new(Behaviour::Hang, &shutdown);

    let canceller = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            shutdown.cancel();
        })
    };

    let result = tokio::time::timeout(Duration::from_secs(5), scheduler.run_once(cycle))
        .await
        .unwrap();
    canceller.await.unwrap();

    assert!(result.is_ok());
    assert!(alerts.sent().is_empty());
}
