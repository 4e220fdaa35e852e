//! Environments API client

use riser_api_models::EnvironmentMeta;

use crate::errors::CliError;
use crate::http::client::ApiClient;

impl ApiClient {
    /// Environments register themselves once their controller is installed
    pub async fn list_environments(&self) -> Result<Vec<EnvironmentMeta>, CliError> {
        self.get("/api/v1/environments").await
    }
}
