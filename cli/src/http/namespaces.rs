//! Namespaces API client

use riser_api_models::Namespace;

use crate::errors::CliError;
use crate::http::client::ApiClient;

impl ApiClient {
    pub async fn list_namespaces(&self) -> Result<Vec<Namespace>, CliError> {
        self.get("/api/v1/namespaces").await
    }

    pub async fn create_namespace(&self, name: &str) -> Result<(), CliError> {
        let namespace = Namespace {
            name: name.to_string(),
        };
        self.post_no_content("/api/v1/namespaces", &namespace).await
    }
}
