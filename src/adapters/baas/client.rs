//! HTTP client for the hosted backend.
//!
//! Speaks the PostgREST dialect for table reads (`/rest/v1/<table>`) and the
//! GoTrue dialect for auth (`/auth/v1/...`). The signed-in user's access
//! token, once known, is used for every request so row-level security
//! applies; before that the anonymous key is used.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::config::BaasConfig;
use crate::domain::foundation::{Identity, StoreError, Timestamp};

/// Where the backend lives and how to authenticate anonymously.
#[derive(Debug, Clone)]
pub struct BaasEndpoint {
    pub base_url: String,
    anon_key: SecretString,
    pub timeout: Duration,
}

impl BaasEndpoint {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: SecretString::new(anon_key.into()),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl From<&BaasConfig> for BaasEndpoint {
    fn from(config: &BaasConfig) -> Self {
        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            timeout: config.request_timeout(),
        }
    }
}

/// Query string builder for PostgREST table reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostgrestQuery {
    params: Vec<(String, String)>,
    order: Vec<String>,
}

impl PostgrestQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns to return, including embedded relations.
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.params.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn gte(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.params.push((column.to_string(), format!("gte.{}", value)));
        self
    }

    /// Adds an ordering column. Ascending orders put nulls last.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc.nullslast" } else { "desc" };
        self.order.push(format!("{}.{}", column, direction));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    /// Key/value pairs ready for URL encoding.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.params.clone();
        if !self.order.is_empty() {
            pairs.push(("order".to_string(), self.order.join(",")));
        }
        pairs
    }
}

/// Tokens and identity of the signed-in user.
#[derive(Debug, Clone)]
pub(crate) struct StoredSession {
    pub access_token: SecretString,
    pub expires_at: Option<Timestamp>,
    pub identity: Identity,
}

impl StoredSession {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.map_or(false, |at| !now.is_before(&at))
    }
}

/// Shared HTTP client for the auth service and the data store adapters.
pub struct BaasClient {
    endpoint: BaasEndpoint,
    http: Client,
    session: RwLock<Option<StoredSession>>,
}

impl BaasClient {
    /// Creates a client. Fails only if the TLS backend cannot initialise.
    pub fn new(endpoint: BaasEndpoint) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(endpoint.timeout)
            .build()
            .map_err(|e| StoreError::unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            http,
            session: RwLock::new(None),
        })
    }

    pub fn endpoint(&self) -> &BaasEndpoint {
        &self.endpoint
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) async fn session(&self) -> Option<StoredSession> {
        self.session.read().await.clone()
    }

    pub(crate) async fn store_session(&self, session: StoredSession) {
        *self.session.write().await = Some(session);
    }

    pub(crate) async fn clear_session(&self) -> Option<StoredSession> {
        self.session.write().await.take()
    }

    /// Adds the `apikey` header and a bearer token: the user's access token
    /// when signed in, the anonymous key otherwise.
    pub(crate) async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.read().await.as_ref() {
            Some(session) => self.authorize_with(request, &session.access_token),
            None => self.authorize_with(request, &self.endpoint.anon_key),
        }
    }

    /// Adds the `apikey` header and the given bearer token.
    pub(crate) fn authorize_with(&self, request: RequestBuilder, token: &SecretString) -> RequestBuilder {
        request
            .header("apikey", self.endpoint.anon_key.expose_secret().clone())
            .bearer_auth(token.expose_secret())
    }

    /// Reads rows of `table` matching `query`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &PostgrestQuery,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.endpoint.rest_url(table);
        tracing::debug!(table, "querying data store");

        let request = self.authorize(self.http.get(&url).query(&query.to_pairs())).await;
        let response = request.send().await.map_err(|e| {
            tracing::warn!(table, error = %e, "data store request failed");
            StoreError::unavailable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_store_failure(table, status, &body));
        }

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| StoreError::decode(table, e.to_string()))?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| StoreError::decode(table, e.to_string())))
            .collect()
    }
}

/// Maps a non-success PostgREST response to a store error.
pub(crate) fn classify_store_failure(table: &str, status: StatusCode, body: &str) -> StoreError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return StoreError::unavailable(format!("{} returned {}", table, status));
    }

    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| status.to_string());

    StoreError::QueryRejected {
        table: table.to_string(),
        message,
    }
}
