//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response};
use riser_api_models::ErrorResponse;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::errors::CliError;

const USER_AGENT: &str = concat!("riser-cli/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the riser API
pub struct ApiClient {
    client: Client,
    base_url: Url,
    apikey: SecretString,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(server_url: &str, apikey: SecretString) -> Result<Self, CliError> {
        Self::build(server_url, apikey, true)
    }

    /// Create a client that skips TLS certificate verification
    pub fn insecure(server_url: &str, apikey: SecretString) -> Result<Self, CliError> {
        Self::build(server_url, apikey, false)
    }

    fn build(server_url: &str, apikey: SecretString, secure: bool) -> Result<Self, CliError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!secure)
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(server_url)?,
            apikey,
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, CliError> {
        let url = self.base_url.join(path)?;
        debug!("{} {}", method, url);

        Ok(self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .header(
                header::AUTHORIZATION,
                format!("Apikey: {}", self.apikey.expose_secret()),
            ))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CliError> {
        let response = send(self.request(Method::GET, path)?).await?;
        Ok(response.json().await?)
    }

    /// Make a PUT request and decode the response body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        query: &[(&str, &str)],
    ) -> Result<T, CliError> {
        let request = self.request(Method::PUT, path)?.query(query).json(body);
        let response = send(request).await?;
        Ok(response.json().await?)
    }

    /// Make a PUT request, ignoring the response body
    pub async fn put_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<(), CliError> {
        let request = self.request(Method::PUT, path)?.json(body);
        send(request).await?;
        Ok(())
    }

    /// Make a POST request and decode the response body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, CliError> {
        let response = send(self.request(Method::POST, path)?.json(body)).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request, ignoring the response body
    pub async fn post_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<(), CliError> {
        send(self.request(Method::POST, path)?.json(body)).await?;
        Ok(())
    }

    /// Make a DELETE request and decode the response body
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, CliError> {
        let response = send(self.request(Method::DELETE, path)?).await?;
        Ok(response.json().await?)
    }
}

async fn send(request: RequestBuilder) -> Result<Response, CliError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!("HTTP request failed: {} - {}", status, body);

    let parsed = serde_json::from_str::<ErrorResponse>(&body).unwrap_or_else(|_| ErrorResponse {
        message: format!("Unable to parse response: {}", body),
        ..Default::default()
    });

    Err(CliError::Api {
        status: status.as_u16(),
        message: parsed.message,
        validation_errors: parsed.validation_errors,
    })
}
