//! API models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a single revision as reported by the controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevisionStatus {
    Ready,
    Waiting,
    Unhealthy,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RevisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionStatus::Ready => "Ready",
            RevisionStatus::Waiting => "Waiting",
            RevisionStatus::Unhealthy => "Unhealthy",
            RevisionStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RevisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A revision of a deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRevisionStatus {
    pub name: String,
    pub riser_revision: i64,
    #[serde(default)]
    pub docker_image: String,
    #[serde(default)]
    pub available_replicas: i32,
    #[serde(default)]
    pub revision_status: RevisionStatus,
    #[serde(default)]
    pub revision_status_reason: String,
}

/// Traffic routed to a revision. A missing percent means no explicit assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTrafficStatus {
    pub revision_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<i64>,
}

impl DeploymentTrafficStatus {
    /// True when a positive percentage of traffic is routed to the revision
    pub fn has_traffic(&self) -> bool {
        matches!(self.percent, Some(percent) if percent > 0)
    }
}

/// Status of a deployment in a single environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatus {
    pub deployment_name: String,
    pub environment_name: String,
    pub riser_revision: i64,
    #[serde(default)]
    pub observed_riser_revision: i64,
    #[serde(default)]
    pub revisions: Vec<DeploymentRevisionStatus>,
    #[serde(default)]
    pub traffic: Vec<DeploymentTrafficStatus>,
    #[serde(default)]
    pub latest_created_revision_name: String,
    #[serde(default)]
    pub latest_ready_revision_name: String,
}

impl DeploymentStatus {
    /// True once the controller has reconciled the requested revision
    pub fn is_observed(&self) -> bool {
        self.riser_revision <= self.observed_riser_revision
    }
}

/// Health of an environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentStatus {
    pub environment_name: String,
    pub healthy: bool,
    #[serde(default)]
    pub reason: String,
}

/// Status of every deployment of an app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStatus {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub deployments: Vec<DeploymentStatus>,
    #[serde(default)]
    pub environments: Vec<EnvironmentStatus>,
}

/// App info
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub namespace: String,
}

/// Request to create an app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApp {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentMeta {
    pub name: String,
}

/// Identifies a secret of an app in one environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretMeta {
    #[serde(rename = "app")]
    pub app_name: String,
    pub namespace: String,
    pub environment: String,
    pub name: String,
}

/// A secret value sent to the server for sealing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsealedSecret {
    #[serde(flatten)]
    pub meta: SecretMeta,
    pub plain_text: String,
}

/// Secret metadata as listed by the server; the value is never returned
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretMetaStatus {
    pub name: String,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub revision: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentDocker {
    pub tag: String,
}

/// Deployment request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    pub name: String,
    pub environment: String,
    pub docker: DeploymentDocker,
    pub manual_rollout: bool,
    /// App config as loaded from the app file
    pub app: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DryRunFile {
    pub name: String,
    pub contents: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DryRunCommit {
    pub message: String,
    #[serde(default)]
    pub files: Vec<DryRunFile>,
}

/// Deployment response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResponse {
    #[serde(default)]
    pub riser_revision: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run_commits: Option<Vec<DryRunCommit>>,
}

/// A single traffic rule of a rollout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficRule {
    pub riser_revision: i64,
    pub percent: i64,
}

/// Rollout request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolloutRequest {
    pub traffic: Vec<TrafficRule>,
}

/// Error response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub validation_errors: std::collections::BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_status_from_json() {
        let json = r#"{
            "deploymentName": "mydep",
            "environmentName": "prod",
            "riserRevision": 3,
            "observedRiserRevision": 2,
            "revisions": [
                {"name": "mydep-2", "riserRevision": 2, "dockerImage": "img:0.1", "availableReplicas": 1, "revisionStatus": "Ready"},
                {"name": "mydep-3", "riserRevision": 3, "revisionStatus": "Crashing"}
            ],
            "traffic": [{"revisionName": "mydep-2", "percent": 100}],
            "latestCreatedRevisionName": "mydep-3"
        }"#;

        let status: DeploymentStatus = serde_json::from_str(json).unwrap();

        assert!(!status.is_observed());
        assert_eq!(status.revisions[0].revision_status, RevisionStatus::Ready);
        assert_eq!(status.revisions[1].revision_status, RevisionStatus::Unknown);
        assert!(status.traffic[0].has_traffic());
    }

    #[test]
    fn test_zero_percent_has_no_traffic() {
        let traffic = DeploymentTrafficStatus {
            revision_name: "rev1".to_string(),
            percent: Some(0),
        };
        assert!(!traffic.has_traffic());
        assert!(!DeploymentTrafficStatus::default().has_traffic());
    }

    #[test]
    fn test_unsealed_secret_json() {
        let secret = UnsealedSecret {
            meta: SecretMeta {
                app_name: "myapp".to_string(),
                namespace: "apps".to_string(),
                environment: "dev".to_string(),
                name: "db".to_string(),
            },
            plain_text: "hunter2".to_string(),
        };

        let json = serde_json::to_value(&secret).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "app": "myapp",
                "namespace": "apps",
                "environment": "dev",
                "name": "db",
                "plainText": "hunter2"
            })
        );
    }

    #[test]
    fn test_secret_meta_status_from_json() {
        let json = r#"[{"name": "db", "lastUpdated": "2020-01-02T03:04:05Z", "revision": 2}]"#;

        let secrets: Vec<SecretMetaStatus> = serde_json::from_str(json).unwrap();

        assert_eq!(secrets[0].name, "db");
        assert_eq!(secrets[0].last_updated.to_rfc3339(), "2020-01-02T03:04:05+00:00");
    }
}
