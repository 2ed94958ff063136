// ABOUTME: HTTP backend talking to the VibeSpecs API server
// ABOUTME: Unwraps the { success, data, error } envelope and maps status codes back to failure kinds

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use vibespecs_core::{Document, Identity, Project};
use vibespecs_security::Credential;

use crate::error::{ClientError, ClientResult, FailureKind};
use crate::services::{IdentityService, PrdSource, ProjectService};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthPayload {
    user: Identity,
    token: Credential,
}

/// HTTP API client for communicating with the VibeSpecs server
#[derive(Clone)]
pub struct RemoteBackend {
    client: Client,
    base_url: String,
}

impl RemoteBackend {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:4001/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build tuned HTTP client ({}), using defaults", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await.map_err(|e| {
            ClientError::service(FailureKind::Upstream, format!("Server unreachable: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ClientError::service(FailureKind::Upstream, format!("Failed to read response: {}", e))
        })?;
        debug!("API responded {} ({} bytes)", status, body.len());

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope<Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_else(|| format!("Server returned {}", status));
            return Err(ClientError::service(kind_for_status(status), message));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            ClientError::service(
                FailureKind::Upstream,
                format!("Unexpected response from server: {}", e),
            )
        })?;

        match (envelope.success, envelope.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(ClientError::service(
                FailureKind::Upstream,
                envelope
                    .error
                    .unwrap_or_else(|| "Server response carried no data".to_string()),
            )),
        }
    }

    async fn authenticate(&self, path: &str, body: Value) -> ClientResult<(Identity, Credential)> {
        let payload: AuthPayload = self
            .send(self.client.post(self.url(path)).json(&body))
            .await?;
        Ok((payload.user, payload.token))
    }
}

fn kind_for_status(status: StatusCode) -> FailureKind {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => FailureKind::InvalidInput,
        StatusCode::UNAUTHORIZED => FailureKind::Unauthorized,
        StatusCode::FORBIDDEN => FailureKind::Forbidden,
        StatusCode::NOT_FOUND => FailureKind::NotFound,
        StatusCode::SERVICE_UNAVAILABLE => FailureKind::Configuration,
        StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => FailureKind::Upstream,
        _ => FailureKind::Storage,
    }
}

#[async_trait]
impl PrdSource for RemoteBackend {
    async fn generate(&self, credential: &Credential, idea: &str) -> ClientResult<Document> {
        let request = self
            .client
            .post(self.url("/generate"))
            .bearer_auth(credential.as_str())
            .json(&json!({ "idea": idea }));
        self.send(request).await
    }
}

#[async_trait]
impl ProjectService for RemoteBackend {
    async fn create(&self, credential: &Credential, document: Document) -> ClientResult<Project> {
        let request = self
            .client
            .post(self.url("/projects"))
            .bearer_auth(credential.as_str())
            .json(&json!({ "data": document }));
        self.send(request).await
    }

    async fn list(&self, credential: &Credential) -> ClientResult<Vec<Project>> {
        let request = self
            .client
            .get(self.url("/projects"))
            .bearer_auth(credential.as_str());
        self.send(request).await
    }

    async fn get(&self, credential: &Credential, id: &str) -> ClientResult<Project> {
        let request = self
            .client
            .get(self.url(&format!("/projects/{}", id)))
            .bearer_auth(credential.as_str());
        self.send(request).await
    }

    async fn update(
        &self,
        credential: &Credential,
        id: &str,
        document: Document,
    ) -> ClientResult<Project> {
        let request = self
            .client
            .put(self.url(&format!("/projects/{}", id)))
            .bearer_auth(credential.as_str())
            .json(&json!({ "data": document }));
        self.send(request).await
    }

    async fn delete(&self, credential: &Credential, id: &str) -> ClientResult<()> {
        let request = self
            .client
            .delete(self.url(&format!("/projects/{}", id)))
            .bearer_auth(credential.as_str());
        let _: Value = self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityService for RemoteBackend {
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ClientResult<(Identity, Credential)> {
        self.authenticate(
            "/auth/register",
            json!({ "email": email, "password": password, "name": name }),
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<(Identity, Credential)> {
        self.authenticate("/auth/login", json!({ "email": email, "password": password }))
            .await
    }

    async fn me(&self, credential: &Credential) -> ClientResult<Identity> {
        let request = self
            .client
            .get(self.url("/auth/me"))
            .bearer_auth(credential.as_str());
        self.send(request).await
    }
}
