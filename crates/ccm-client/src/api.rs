use std::time::Duration;

use ccm_core::config::ClientConfig;
use ccm_core::{
    ConfigRecord, ConflictReport, ConflictStrategy, Kind, Project, ReferenceDescriptor, Scope,
    ScopeKind,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{ClientError, Result};

// ─── Wire types ───────────────────────────────────────────────────────────

/// Records of one kind in one scope, plus any non-fatal warnings the
/// backend raised while reading them (e.g. a file with bad front matter).
#[derive(Debug, Clone)]
pub struct Listing<R> {
    pub records: Vec<R>,
    pub warnings: Vec<String>,
}

/// Outcome of a reference lookup. Lookups fail open: on any backend failure
/// `has_references` is `false` and `error` says why.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceCheck {
    pub has_references: bool,
    pub references: Vec<ReferenceDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyBody {
    pub source_path: String,
    pub target_scope: ScopeKind,
    pub target_project_id: Option<String>,
    pub conflict_strategy: ConflictStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CopyResponse {
    Copied(CopyResult),
    Conflict(ConflictReport),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

// ─── ApiClient ────────────────────────────────────────────────────────────

/// Thin JSON-over-HTTP client for the configuration backend.
///
/// Every request is bounded by the configured timeout. Identities and
/// project ids are percent-encoded because hook ids contain `::` and
/// command paths contain `/`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::BackendUnavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.api_url.clone(), config.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    // ── Paths ──────────────────────────────────────────────────────────────

    pub fn scope_path(scope: &Scope) -> String {
        match scope {
            Scope::Project(id) => format!("/projects/{}", urlencoding::encode(id)),
            Scope::User => "/user".to_string(),
        }
    }

    pub fn collection_path(scope: &Scope, kind: Kind) -> String {
        format!("{}/{}", Self::scope_path(scope), kind.collection_segment())
    }

    pub fn record_path(scope: &Scope, kind: Kind, identity: &str) -> String {
        format!(
            "{}/{}",
            Self::collection_path(scope, kind),
            urlencoding::encode(identity)
        )
    }

    pub fn copy_path(kind: Kind) -> String {
        format!("/copy/{}", kind.as_str())
    }

    // ── Endpoints ──────────────────────────────────────────────────────────

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let body = self.get_ok("/projects").await?;
        take_field(body, "projects", "/projects")
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let body = self.get_ok("/health").await?;
        serde_json::from_value(body).map_err(|e| ClientError::malformed("/health", e.to_string()))
    }

    /// Fetch every record of `R`'s kind in `scope`.
    pub async fn list<R: ConfigRecord>(&self, scope: &Scope) -> Result<Listing<R>> {
        let path = Self::collection_path(scope, R::KIND);
        let mut body = self.get_ok(&path).await?;
        let warnings = body
            .get_mut("warnings")
            .map(Value::take)
            .map(warning_messages)
            .unwrap_or_default();
        let records = take_field(body, R::KIND.collection_field(), &path)?;
        Ok(Listing { records, warnings })
    }

    /// Apply `patch` to one record and return the backend's canonical copy.
    pub async fn update<R: ConfigRecord>(
        &self,
        scope: &Scope,
        identity: &str,
        patch: &Value,
    ) -> Result<R> {
        let path = Self::record_path(scope, R::KIND, identity);
        let (status, body) = self
            .send(self.request(Method::PUT, &path).json(patch), &path)
            .await?;
        if !status.is_success() || !succeeded(&body) {
            return Err(ClientError::UpdateRejected(failure_message(status, &body)));
        }
        take_field(body, R::KIND.record_field(), &path)
    }

    /// Delete one record. Returns the backend's message, if any.
    pub async fn delete(&self, kind: Kind, scope: &Scope, identity: &str) -> Result<Option<String>> {
        let path = Self::record_path(scope, kind, identity);
        let (status, body) = self.send(self.request(Method::DELETE, &path), &path).await?;
        if !status.is_success() || !succeeded(&body) {
            return Err(ClientError::DeleteRejected(failure_message(status, &body)));
        }
        Ok(message_of(&body))
    }

    pub async fn references(
        &self,
        kind: Kind,
        scope: &Scope,
        identity: &str,
    ) -> Result<ReferenceCheck> {
        let path = format!("{}/references", Self::record_path(scope, kind, identity));
        let body = self.get_ok(&path).await?;
        if !succeeded(&body) {
            return Ok(ReferenceCheck {
                error: Some(failure_message(StatusCode::OK, &body)),
                ..ReferenceCheck::default()
            });
        }
        let references: Vec<ReferenceDescriptor> = match body.get("references") {
            Some(v) if !v.is_null() => serde_json::from_value(v.clone())
                .map_err(|e| ClientError::malformed(&path, e.to_string()))?,
            _ => Vec::new(),
        };
        let has_references = body
            .get("hasReferences")
            .and_then(Value::as_bool)
            .unwrap_or(!references.is_empty());
        Ok(ReferenceCheck {
            has_references,
            references,
            error: None,
        })
    }

    /// POST a copy request. A 409 carries a conflict report instead of a
    /// result; any other failure status is a [`ClientError::CopyFailed`].
    pub async fn copy(&self, kind: Kind, body: &CopyBody) -> Result<CopyResponse> {
        let path = Self::copy_path(kind);
        let (status, resp) = self
            .send(self.request(Method::POST, &path).json(body), &path)
            .await?;
        if status == StatusCode::CONFLICT {
            let report = resp.get("conflict").unwrap_or(&resp).clone();
            let report: ConflictReport = serde_json::from_value(report)
                .map_err(|e| ClientError::malformed(&path, format!("conflict body: {e}")))?;
            return Ok(CopyResponse::Conflict(report));
        }
        if !status.is_success() {
            return Err(ClientError::CopyFailed(failure_message(status, &resp)));
        }
        let result: CopyResult = serde_json::from_value(resp)
            .map_err(|e| ClientError::malformed(&path, e.to_string()))?;
        Ok(CopyResponse::Copied(result))
    }

    // ── Transport ──────────────────────────────────────────────────────────

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn get_ok(&self, path: &str) -> Result<Value> {
        let (status, body) = self.send(self.request(Method::GET, path), path).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(failure_message(status, &body)));
        }
        if !status.is_success() {
            return Err(ClientError::BackendUnavailable(failure_message(status, &body)));
        }
        Ok(body)
    }

    /// Send one request and decode its body as JSON (empty body → `null`).
    async fn send(&self, req: RequestBuilder, endpoint: &str) -> Result<(StatusCode, Value)> {
        debug!(endpoint, "sending request");
        let resp = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.transport_error(e))?;
        debug!(endpoint, status = status.as_u16(), "received response");
        if text.trim().is_empty() {
            return Ok((status, Value::Null));
        }
        match serde_json::from_str(&text) {
            Ok(body) => Ok((status, body)),
            // Error pages from proxies are often HTML; keep the status meaningful.
            Err(_) if !status.is_success() => Ok((status, Value::String(text))),
            Err(e) => Err(ClientError::malformed(endpoint, format!("invalid JSON: {e}"))),
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else {
            ClientError::BackendUnavailable(e.to_string())
        }
    }
}

// ─── Body helpers ─────────────────────────────────────────────────────────

/// Bodies without a `success` flag are treated as successful.
fn succeeded(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool).unwrap_or(true)
}

fn message_of(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

fn failure_message(status: StatusCode, body: &Value) -> String {
    match (message_of(body), body.as_str()) {
        (Some(msg), _) => msg,
        (None, Some(text)) if !text.trim().is_empty() => format!("HTTP {}: {}", status.as_u16(), text.trim()),
        _ if status.is_success() => "request was not successful".to_string(),
        _ => format!("HTTP {}", status.as_u16()),
    }
}

fn take_field<T: serde::de::DeserializeOwned>(
    mut body: Value,
    field: &str,
    endpoint: &str,
) -> Result<T> {
    let value = match body.get_mut(field) {
        Some(v) if !v.is_null() => v.take(),
        _ => return Err(ClientError::malformed(endpoint, format!("missing '{field}' field"))),
    };
    serde_json::from_value(value)
        .map_err(|e| ClientError::malformed(endpoint, format!("'{field}': {e}")))
}

fn warning_messages(value: Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .map(|w| match w {
            Value::String(s) => s,
            other => message_of(&other).unwrap_or_else(|| other.to_string()),
        })
        .collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────
