//! Deployment API client

use riser_api_models::{DeploymentRequest, DeploymentResponse};

use crate::errors::CliError;
use crate::http::client::ApiClient;

impl ApiClient {
    /// Create a deployment or a new revision of it
    pub async fn save_deployment(
        &self,
        deployment: &DeploymentRequest,
        dry_run: bool,
    ) -> Result<DeploymentResponse, CliError> {
        let query: &[(&str, &str)] = if dry_run { &[("dryRun", "true")] } else { &[] };
        self.put("/api/v1/deployments", deployment, query).await
    }

    /// Delete a deployment and all of its revisions in one environment
    pub async fn delete_deployment(
        &self,
        deployment_name: &str,
        namespace: &str,
        environment_name: &str,
    ) -> Result<DeploymentResponse, CliError> {
        let path = format!(
            "/api/v1/deployments/{}/{}/{}",
            environment_name, namespace, deployment_name
        );
        self.delete(&path).await
    }
}
