//! Step runner and retry step tests

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use riser::errors::CliError;
use riser::notify::Notifier;
use riser::steps::{always_retry, ExecStep, FuncStep, RetryStep, Step, StepRunner};
use serde_json::Value;

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.info(message);
    }

    fn error(&self, message: &str) {
        self.info(message);
    }

    fn verbose(&self, _message: &str) {}
}

/// Fails with `error` until it has been executed `succeed_on` times in total
struct FlakyStep {
    executions: Arc<AtomicU32>,
    succeed_on: u32,
    error: &'static str,
    output: Option<Value>,
}

impl FlakyStep {
    fn new(executions: Arc<AtomicU32>, succeed_on: u32, error: &'static str) -> Self {
        Self {
            executions,
            succeed_on,
            error,
            output: None,
        }
    }
}

#[async_trait]
impl Step for FlakyStep {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn exec(&mut self) -> Result<(), CliError> {
        let execution = self.executions.fetch_add(1, Ordering::SeqCst) + 1;
        self.output = Some(Value::from(execution));
        if execution >= self.succeed_on {
            Ok(())
        } else {
            Err(CliError::Internal(self.error.to_string()))
        }
    }

    fn state(&self, key: &str) -> Option<&Value> {
        match key {
            "execution" => self.output.as_ref(),
            _ => None,
        }
    }
}

fn counting_step(name: &'static str, executed: Arc<AtomicU32>, fail: bool) -> FuncStep {
    FuncStep::new(name, move || {
        executed.fetch_add(1, Ordering::SeqCst);
        if fail {
            Err(CliError::Internal("boom".to_string()))
        } else {
            Ok(())
        }
    })
}

fn flaky_retry(
    executions: Arc<AtomicU32>,
    factory_calls: Arc<AtomicU32>,
    succeed_on: u32,
    max_attempts: u32,
) -> RetryStep {
    RetryStep::new(
        move || {
            factory_calls.fetch_add(1, Ordering::SeqCst);
            Box::new(FlakyStep::new(executions.clone(), succeed_on, "not yet")) as Box<dyn Step>
        },
        max_attempts,
        always_retry,
    )
    .with_sleep_interval(Duration::from_millis(1))
}

#[tokio::test]
async fn test_runner_executes_in_order() {
    let notifier = Arc::new(RecordingNotifier::default());
    let runner = StepRunner::new(notifier.clone());
    let executed = Arc::new(AtomicU32::new(0));
    let mut first = counting_step("first", executed.clone(), false);
    let mut second = counting_step("second", executed.clone(), false);

    runner.run(&mut [&mut first, &mut second]).await.unwrap();

    assert_eq!(executed.load(Ordering::SeqCst), 2);
    let messages = notifier.messages();
    assert_eq!(messages.len(), 4);
    assert!(messages[0].contains("Executing") && messages[0].contains("first"));
    assert!(messages[1].contains("Complete"));
    assert!(messages[2].contains("second"));
}

#[tokio::test]
async fn test_runner_halts_on_failure() {
    let notifier = Arc::new(RecordingNotifier::default());
    let runner = StepRunner::new(notifier.clone());
    let first_runs = Arc::new(AtomicU32::new(0));
    let second_runs = Arc::new(AtomicU32::new(0));
    let third_runs = Arc::new(AtomicU32::new(0));
    let mut first = counting_step("first", first_runs.clone(), false);
    let mut second = counting_step("second", second_runs.clone(), true);
    let mut third = counting_step("third", third_runs.clone(), false);

    let err = runner
        .run(&mut [&mut first, &mut second, &mut third])
        .await
        .unwrap_err();

    assert_eq!(first_runs.load(Ordering::SeqCst), 1);
    assert_eq!(second_runs.load(Ordering::SeqCst), 1);
    assert_eq!(third_runs.load(Ordering::SeqCst), 0);
    assert_eq!(
        err.to_string(),
        "Error executing step \"second\": Internal error: boom"
    );
    assert!(!notifier.messages().iter().any(|m| m.contains("third")));
}

#[tokio::test]
async fn test_runner_empty_chain() {
    let runner = StepRunner::new(Arc::new(RecordingNotifier::default()));

    runner.run(&mut []).await.unwrap();
}

#[tokio::test]
async fn test_retry_bounded_by_max_attempts() {
    let executions = Arc::new(AtomicU32::new(0));
    let factory_calls = Arc::new(AtomicU32::new(0));
    let mut step = flaky_retry(executions.clone(), factory_calls.clone(), u32::MAX, 3);

    let err = step.exec().await.unwrap_err();

    assert_eq!(executions.load(Ordering::SeqCst), 3);
    assert_eq!(factory_calls.load(Ordering::SeqCst), 3);
    assert_eq!(step.attempts(), 3);
    assert_eq!(err.to_string(), "failed after 3 attempts: Internal error: not yet");
}

#[tokio::test]
async fn test_retry_succeeds_without_wrapping() {
    let executions = Arc::new(AtomicU32::new(0));
    let factory_calls = Arc::new(AtomicU32::new(0));
    let mut step = flaky_retry(executions.clone(), factory_calls.clone(), 2, 5);

    step.exec().await.unwrap();

    assert_eq!(step.attempts(), 2);
    assert_eq!(factory_calls.load(Ordering::SeqCst), 2);
    assert_eq!(step.state("execution"), Some(&Value::from(2)));
    assert_eq!(step.state("unknown"), None);
    assert_eq!(step.name(), "flaky");
}

#[tokio::test]
async fn test_retry_stops_on_non_retryable_error() {
    let executions = Arc::new(AtomicU32::new(0));
    let policy_calls = Arc::new(AtomicU32::new(0));
    let counted = policy_calls.clone();
    let factory_executions = executions.clone();
    let mut step = RetryStep::new(
        move || {
            Box::new(FlakyStep::new(factory_executions.clone(), u32::MAX, "permission denied"))
                as Box<dyn Step>
        },
        10,
        move |err: &CliError| {
            counted.fetch_add(1, Ordering::SeqCst);
            err.to_string().contains("NotFound")
        },
    )
    .with_sleep_interval(Duration::from_millis(1));

    let err = step.exec().await.unwrap_err();

    assert_eq!(executions.load(Ordering::SeqCst), 1);
    assert_eq!(policy_calls.load(Ordering::SeqCst), 1);
    assert!(err.to_string().contains("permission denied"));
}

#[tokio::test]
async fn test_retry_policy_not_consulted_on_success() {
    let policy_calls = Arc::new(AtomicU32::new(0));
    let counted = policy_calls.clone();
    let executions = Arc::new(AtomicU32::new(0));
    let mut step = RetryStep::new(
        move || Box::new(FlakyStep::new(executions.clone(), 1, "unused")) as Box<dyn Step>,
        3,
        move |_err: &CliError| {
            counted.fetch_add(1, Ordering::SeqCst);
            true
        },
    );

    step.exec().await.unwrap();

    assert_eq!(step.attempts(), 1);
    assert_eq!(policy_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_retry_state_before_exec() {
    let step = flaky_retry(
        Arc::new(AtomicU32::new(0)),
        Arc::new(AtomicU32::new(0)),
        1,
        1,
    );

    assert_eq!(step.state("execution"), None);
    assert_eq!(step.max_attempts(), 1);
}

#[tokio::test]
async fn test_retry_inside_runner() {
    let notifier = Arc::new(RecordingNotifier::default());
    let runner = StepRunner::new(notifier.clone());
    let executions = Arc::new(AtomicU32::new(0));
    let mut retry = flaky_retry(executions.clone(), Arc::new(AtomicU32::new(0)), 3, 5);

    runner.run(&mut [&mut retry]).await.unwrap();

    assert_eq!(executions.load(Ordering::SeqCst), 3);
    assert_eq!(notifier.messages().len(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn test_retry_state_is_stdout_of_last_attempt() {
    let attempts = Arc::new(AtomicU32::new(0));
    let counted = attempts.clone();
    let mut step = RetryStep::new(
        move || {
            let attempt = counted.fetch_add(1, Ordering::SeqCst) + 1;
            let exit_code = if attempt < 3 { 1 } else { 0 };
            Box::new(ExecStep::shell(
                "Check ingress",
                &format!("printf 'attempt {}'; exit {}", attempt, exit_code),
            )) as Box<dyn Step>
        },
        5,
        always_retry,
    )
    .with_sleep_interval(Duration::from_millis(1));

    step.exec().await.unwrap();

    assert_eq!(step.attempts(), 3);
    assert_eq!(step.state("stdout"), Some(&Value::from("attempt 3")));
    assert_eq!(step.state("stderr"), Some(&Value::from("")));
}
