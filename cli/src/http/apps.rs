//! Apps API client

use async_trait::async_trait;
use riser_api_models::{App, AppStatus, NewApp};

use crate::deploy::wait::StatusSource;
use crate::errors::CliError;
use crate::http::client::ApiClient;

impl ApiClient {
    /// List every app
    pub async fn list_apps(&self) -> Result<Vec<App>, CliError> {
        self.get("/api/v1/apps").await
    }

    /// Create an app
    pub async fn create_app(&self, new_app: &NewApp) -> Result<App, CliError> {
        self.post("/api/v1/apps", new_app).await
    }

    /// Get an app by name
    pub async fn get_app(&self, name: &str, namespace: &str) -> Result<App, CliError> {
        let path = format!("/api/v1/apps/{}/{}", namespace, name);
        self.get(&path).await
    }

    /// Get the status of every deployment of an app
    pub async fn get_app_status(&self, name: &str, namespace: &str) -> Result<AppStatus, CliError> {
        let path = format!("/api/v1/apps/{}/{}/status", namespace, name);
        self.get(&path).await
    }
}

#[async_trait]
impl StatusSource for ApiClient {
    async fn get_status(&self, app_name: &str, namespace: &str) -> Result<AppStatus, CliError> {
        self.get_app_status(app_name, namespace).await
    }
}
