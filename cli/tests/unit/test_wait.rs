//! Readiness waiter tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use riser::deploy::wait::{
    is_ready, wait_for_ready, wait_for_ready_with, StatusSource, WaitOptions, WaitTarget,
};
use riser::errors::CliError;
use riser_api_models::{App, AppStatus, DeploymentRevisionStatus, DeploymentStatus, RevisionStatus};
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

#[derive(Clone)]
enum Reply {
    Status(RevisionStatus),
    StatusWithReason(RevisionStatus, &'static str),
    Fail(&'static str),
}

/// Replays scripted replies, repeating the last one once the script runs out
struct FakeStatusSource {
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    calls: AtomicUsize,
}

impl FakeStatusSource {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for FakeStatusSource {
    async fn get_status(&self, app_name: &str, namespace: &str) -> Result<AppStatus, CliError> {
        assert_eq!(app_name, "myapp");
        assert_eq!(namespace, "apps");
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(next) = replies.pop_front() {
                *last = Some(next);
            }
            last.clone().expect("no scripted reply")
        };

        match reply {
            Reply::Status(status) => Ok(app_status(status, "")),
            Reply::StatusWithReason(status, reason) => Ok(app_status(status, reason)),
            Reply::Fail(message) => Err(CliError::Internal(message.to_string())),
        }
    }
}

fn app_status(revision_status: RevisionStatus, reason: &str) -> AppStatus {
    AppStatus {
        deployments: vec![DeploymentStatus {
            deployment_name: "mydep".to_string(),
            environment_name: "myenv".to_string(),
            riser_revision: 2,
            observed_riser_revision: 2,
            revisions: vec![DeploymentRevisionStatus {
                name: "mydep-2".to_string(),
                riser_revision: 2,
                revision_status,
                revision_status_reason: reason.to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn app() -> App {
    App {
        id: "id".to_string(),
        name: "myapp".to_string(),
        namespace: "apps".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_wait_succeeds_once_ready() {
    let source = FakeStatusSource::new(vec![
        Reply::Status(RevisionStatus::Waiting),
        Reply::Status(RevisionStatus::Waiting),
        Reply::Status(RevisionStatus::Ready),
    ]);
    let start = Instant::now();

    wait_for_ready(source.clone(), &app(), "mydep", "myenv", 2, Duration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(source.calls(), 3);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_wait_timeout_reports_last_status() {
    let source = FakeStatusSource::new(vec![Reply::Status(RevisionStatus::Unhealthy)]);

    let err = wait_for_ready(source.clone(), &app(), "mydep", "myenv", 2, Duration::from_secs(1))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Timeout of 1s exceeded waiting for the new revision to become ready: Revision status is \"Unhealthy\""
    );
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wait_timeout_reports_status_and_reason() {
    let source = FakeStatusSource::new(vec![Reply::StatusWithReason(
        RevisionStatus::Unhealthy,
        "Unhealthy",
    )]);

    let err = assert_err!(
        wait_for_ready(source.clone(), &app(), "mydep", "myenv", 2, Duration::from_secs(1)).await
    );

    assert_eq!(
        err.to_string(),
        "Timeout of 1s exceeded waiting for the new revision to become ready: Revision status is \"Unhealthy (Unhealthy)\""
    );
}

#[tokio::test(start_paused = true)]
async fn test_wait_tolerates_source_errors() {
    let source = FakeStatusSource::new(vec![
        Reply::Fail("connection reset"),
        Reply::Status(RevisionStatus::Ready),
    ]);

    assert_ok!(
        wait_for_ready(source.clone(), &app(), "mydep", "myenv", 2, Duration::from_secs(60)).await
    );

    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_wait_timeout_reports_last_source_error() {
    let source = FakeStatusSource::new(vec![
        Reply::Status(RevisionStatus::Waiting),
        Reply::Fail("connection reset"),
    ]);

    let err = assert_err!(
        wait_for_ready(source.clone(), &app(), "mydep", "myenv", 2, Duration::from_secs(3)).await
    );

    assert!(matches!(err, CliError::WaitTimeout { .. }));
    assert!(err.to_string().ends_with("Internal error: connection reset"));
    assert_eq!(source.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_wait_with_custom_poll_interval_and_check() {
    let source = FakeStatusSource::new(vec![Reply::Status(RevisionStatus::Unknown)]);
    let checks = Arc::new(AtomicUsize::new(0));
    let counted = checks.clone();
    let target = WaitTarget {
        app_name: "myapp".to_string(),
        namespace: "apps".to_string(),
        deployment_name: "mydep".to_string(),
        environment_name: "myenv".to_string(),
        riser_revision: 2,
    };
    let options = WaitOptions {
        timeout: Duration::from_secs(10),
        poll_interval: Duration::from_millis(250),
    };

    wait_for_ready_with(source.clone(), target, options, move |statuses, name, env, rev| {
        if counted.fetch_add(1, Ordering::SeqCst) == 3 {
            return (true, String::new());
        }
        is_ready(statuses, name, env, rev)
    })
    .await
    .unwrap();

    assert_eq!(source.calls(), 4);
    assert_eq!(checks.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn test_wait_zero_timeout_never_calls_source() {
    let source = FakeStatusSource::new(vec![Reply::Status(RevisionStatus::Ready)]);

    let err = wait_for_ready(source.clone(), &app(), "mydep", "myenv", 2, Duration::ZERO)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Timeout of 0ns exceeded waiting for the new revision to become ready"
    );
    assert_eq!(source.calls(), 0);
}
