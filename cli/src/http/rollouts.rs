//! Rollout API client

use riser_api_models::{RolloutRequest, TrafficRule};

use crate::errors::CliError;
use crate::http::client::ApiClient;

impl ApiClient {
    /// Route traffic between revisions of a deployment
    pub async fn save_rollout(
        &self,
        deployment_name: &str,
        namespace: &str,
        environment_name: &str,
        rules: &[String],
    ) -> Result<(), CliError> {
        let request = RolloutRequest {
            traffic: parse_traffic_rules(rules)?,
        };
        let path = rollout_path(deployment_name, namespace, environment_name);
        self.put_no_content(&path, &request).await
    }
}

/// Rollout route of namespace-aware riser-server releases, laid out like
/// `/api/v1/deployments/{env}/{ns}/{name}`. Releases before namespaces took
/// `/api/v1/rollout/{deployment}/{environment}` and are not supported.
fn rollout_path(deployment_name: &str, namespace: &str, environment_name: &str) -> String {
    format!(
        "/api/v1/rollout/{}/{}/{}",
        environment_name, namespace, deployment_name
    )
}

/// Parse rules in the `<rev>:<percent>` format
pub fn parse_traffic_rules(rules: &[String]) -> Result<Vec<TrafficRule>, CliError> {
    rules.iter().map(|rule| parse_traffic_rule(rule)).collect()
}

fn parse_traffic_rule(rule: &str) -> Result<TrafficRule, CliError> {
    let invalid = || {
        CliError::ValidationError(
            "Rules must be in the format of \"(rev):(percentage)\" e.g. \"1:100\" routes 100% of traffic to rev 1"
                .to_string(),
        )
    };

    let (revision, percent) = rule.split_once(':').ok_or_else(invalid)?;
    let riser_revision = revision.trim().parse::<i64>().map_err(|_| invalid())?;
    let percent = percent.trim().parse::<i64>().map_err(|_| invalid())?;
    if riser_revision < 0 || !(0..=100).contains(&percent) {
        return Err(invalid());
    }

    Ok(TrafficRule {
        riser_revision,
        percent,
    })
}
