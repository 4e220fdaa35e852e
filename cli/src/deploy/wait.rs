//! Waiting for a deployment revision to become ready

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use riser_api_models::{App, AppStatus, DeploymentStatus, RevisionStatus};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

use crate::errors::CliError;

/// Source of app status, usually the riser API
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn get_status(&self, app_name: &str, namespace: &str) -> Result<AppStatus, CliError>;
}

/// Wait options
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Give up once this much time has passed
    pub timeout: Duration,

    /// Pause between status polls
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// The revision being waited for
#[derive(Debug, Clone)]
pub struct WaitTarget {
    pub app_name: String,
    pub namespace: String,
    pub deployment_name: String,
    pub environment_name: String,
    pub riser_revision: i64,
}

/// Wait for a deployment to become ready at `riser_revision`.
///
/// Status source errors are retried until the timeout elapses. The timeout is
/// checked before each status call, so a slow call can make the wait run
/// longer than `timeout`.
pub async fn wait_for_ready(
    source: Arc<dyn StatusSource>,
    app: &App,
    deployment_name: &str,
    environment_name: &str,
    riser_revision: i64,
    timeout: Duration,
) -> Result<(), CliError> {
    let target = WaitTarget {
        app_name: app.name.clone(),
        namespace: app.namespace.clone(),
        deployment_name: deployment_name.to_string(),
        environment_name: environment_name.to_string(),
        riser_revision,
    };
    let options = WaitOptions {
        timeout,
        ..Default::default()
    };

    wait_for_ready_with(source, target, options, is_ready).await
}

/// [`wait_for_ready`] with explicit options and readiness check.
///
/// Polling runs on its own task; this future resolves when that task reports.
pub async fn wait_for_ready_with<R>(
    source: Arc<dyn StatusSource>,
    target: WaitTarget,
    options: WaitOptions,
    is_ready: R,
) -> Result<(), CliError>
where
    R: Fn(&[DeploymentStatus], &str, &str, i64) -> (bool, String) + Send + 'static,
{
    let (done_tx, done_rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = poll_until_ready(source.as_ref(), &target, &options, is_ready).await;
        let _ = done_tx.send(result);
    });

    done_rx
        .await
        .map_err(|_| CliError::Internal("readiness poll stopped without a result".to_string()))?
}

async fn poll_until_ready<R>(
    source: &dyn StatusSource,
    target: &WaitTarget,
    options: &WaitOptions,
    is_ready: R,
) -> Result<(), CliError>
where
    R: Fn(&[DeploymentStatus], &str, &str, i64) -> (bool, String),
{
    let start = Instant::now();
    let mut last_err: Option<CliError> = None;

    loop {
        if start.elapsed() >= options.timeout {
            return Err(CliError::WaitTimeout {
                timeout: options.timeout,
                last: last_err.map(Box::new),
            });
        }

        match source.get_status(&target.app_name, &target.namespace).await {
            Ok(app_status) => {
                let (ready, reason) = is_ready(
                    &app_status.deployments,
                    &target.deployment_name,
                    &target.environment_name,
                    target.riser_revision,
                );
                if ready {
                    return Ok(());
                }
                debug!("Revision {} not ready: {:?}", target.riser_revision, reason);
                last_err = Some(CliError::RevisionNotReady(reason));
            }
            Err(e) => {
                debug!("Failed to get status for {}: {}", target.app_name, e);
                last_err = Some(e);
            }
        }

        tokio::time::sleep(options.poll_interval).await;
    }
}

/// Whether `riser_revision` of a deployment is ready, with a reason when it is not.
///
/// Assumes all statuses belong to the same app.
pub fn is_ready(
    statuses: &[DeploymentStatus],
    deployment_name: &str,
    environment_name: &str,
    riser_revision: i64,
) -> (bool, String) {
    let mut last_status: Option<RevisionStatus> = None;
    let mut last_reason = "";

    for status in statuses {
        if status.deployment_name != deployment_name || status.environment_name != environment_name {
            continue;
        }

        if riser_revision > status.observed_riser_revision {
            return (false, "The revision has not yet been observed".to_string());
        }

        for revision in &status.revisions {
            if revision.riser_revision == riser_revision
                && revision.revision_status == RevisionStatus::Ready
            {
                return (true, revision.revision_status.to_string());
            }
            last_status = Some(revision.revision_status);
            last_reason = &revision.revision_status_reason;
        }
    }

    let status = last_status.map(|s| s.to_string()).unwrap_or_default();
    if last_reason.is_empty() {
        (false, status)
    } else {
        (false, format!("{} ({})", status, last_reason))
    }
}
