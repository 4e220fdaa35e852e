//! Secrets API client

use riser_api_models::{SecretMeta, SecretMetaStatus, UnsealedSecret};

use crate::errors::CliError;
use crate::http::client::ApiClient;

impl ApiClient {
    /// Metadata of the secrets of an app in one environment
    pub async fn list_secrets(
        &self,
        app_name: &str,
        namespace: &str,
        environment_name: &str,
    ) -> Result<Vec<SecretMetaStatus>, CliError> {
        let path = format!(
            "/api/v1/secrets/{}/{}/{}",
            environment_name, namespace, app_name
        );
        self.get(&path).await
    }

    /// Create or update a secret. The plain text is sealed by the server.
    pub async fn save_secret(&self, meta: SecretMeta, plain_text: &str) -> Result<(), CliError> {
        let secret = UnsealedSecret {
            meta,
            plain_text: plain_text.to_string(),
        };
        self.put_no_content("/api/v1/secrets", &secret).await
    }
}
