//! Post-install health checks for a bootstrapped environment

use std::sync::Arc;

use serde_json::Value;

use crate::errors::CliError;
use crate::notify::Notifier;
use crate::steps::{always_retry, ExecStep, RetryStep, Step, StepRunner};

const SERVER_READY_ATTEMPTS: u32 = 300;
const INGRESS_READY_ATTEMPTS: u32 = 120;

const SERVER_READY_CMD: &str = "kubectl get po riser-server-0 -n riser-system \
     -o jsonpath='{.status.conditions[?(@.type==\"Ready\")].status}' | grep True";
const INGRESS_IP_CMD: &str = "kubectl get service istio-ingressgateway -n istio-system \
     -o jsonpath='{.status.loadBalancer.ingress[0].ip}' | grep ^";

/// Wait until the riser-server pod reports ready
pub async fn wait_for_server(runner: &StepRunner, notifier: Arc<dyn Notifier>) -> Result<(), CliError> {
    let mut check_server = RetryStep::new(
        || {
            Box::new(ExecStep::shell(
                "Check riser-server status (this could take a few minutes after installation)",
                SERVER_READY_CMD,
            )) as Box<dyn Step>
        },
        SERVER_READY_ATTEMPTS,
        always_retry,
    )
    .with_notifier(notifier);

    runner.run(&mut [&mut check_server]).await
}

/// Wait until the istio ingress gateway has a load balancer IP and return it
pub async fn wait_for_ingress_ip(
    runner: &StepRunner,
    notifier: Arc<dyn Notifier>,
) -> Result<String, CliError> {
    let mut check_ingress = RetryStep::new(
        || Box::new(ExecStep::shell("Check Istio ingress gateway", INGRESS_IP_CMD)) as Box<dyn Step>,
        INGRESS_READY_ATTEMPTS,
        always_retry,
    )
    .with_notifier(notifier);

    runner.run(&mut [&mut check_ingress]).await?;
    ingress_ip(&check_ingress)
}

/// The IP printed by the step's last execution
pub fn ingress_ip(step: &dyn Step) -> Result<String, CliError> {
    step.state("stdout")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CliError::Internal("The ingress gateway reported no IP".to_string()))
}
