//! Backend API client.
//!
//! The single authenticated gateway to the admin backend: every outbound
//! HTTP call in the bot goes through [`ApiClient`]. Responses are opaque
//! JSON to this layer; failures are normalized into the core error type and
//! never leak a raw transport error to command bodies.

use std::{fmt, time::Duration};

use reqwest::{header, Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use warden_core::{errors::Error, Result};

pub mod types;

pub use types::{DomainStats, FileStats, NewDomain, TotalStats, UserStats};

const DEFAULT_REASON: &str = "No reason provided";

/// One outbound request: endpoint path, verb and optional JSON body.
#[derive(Clone, Debug)]
pub struct RequestSpec {
    pub endpoint: String,
    pub method: Method,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::GET,
            body: None,
        }
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::DELETE,
            body: None,
        }
    }

    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::POST,
            body: Some(body),
        }
    }
}

pub struct ApiClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

// The credential must never end up in logs.
impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("http client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            http,
        })
    }

    /// Send a request whose body (if any) is a single JSON object.
    pub async fn request(&self, spec: RequestSpec) -> Result<Value> {
        self.execute(&spec.endpoint, spec.method, spec.body.as_ref())
            .await
    }

    /// Send a request with the body passed through verbatim. Some endpoints
    /// (`POST /domains/`) take a list-typed payload, which must not be
    /// reshaped into an object.
    pub async fn request_raw(&self, endpoint: &str, method: Method, body: &Value) -> Result<Value> {
        self.execute(endpoint, method, Some(body)).await
    }

    async fn execute(&self, endpoint: &str, method: Method, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{method} {endpoint}");

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(header::AUTHORIZATION, self.api_key.as_str());
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::Transport(format!("{method} {endpoint}: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::Transport(format!("{method} {endpoint}: reading body: {e}")))?;

        if !status.is_success() {
            return Err(normalize_error(status, &text));
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| Error::Transport(format!("{method} {endpoint}: invalid response: {e}")))
    }

    // ---- fixed-shape convenience operations ----

    pub async fn delete_domain(&self, name: &str) -> Result<Value> {
        self.request(RequestSpec::delete(format!("/domains/{name}"))).await
    }

    pub async fn delete_invite(&self, invite: &str) -> Result<Value> {
        self.request(RequestSpec::delete(format!("/invites/{invite}"))).await
    }

    pub async fn delete_image(&self, filename: &str) -> Result<Value> {
        self.request(RequestSpec::delete(format!("/admin/files/{filename}")))
            .await
    }

    pub async fn add_domain(&self, domain: NewDomain) -> Result<Value> {
        self.add_domains(vec![domain]).await
    }

    pub async fn add_domains(&self, domains: Vec<NewDomain>) -> Result<Value> {
        self.request_raw("/domains/", Method::POST, &json!(domains))
            .await
    }

    pub async fn file_stats(&self) -> Result<FileStats> {
        let v = self.request(RequestSpec::get("/files")).await?;
        Ok(serde_json::from_value(v)?)
    }

    pub async fn user_stats(&self) -> Result<UserStats> {
        let v = self.request(RequestSpec::get("/users")).await?;
        Ok(serde_json::from_value(v)?)
    }

    pub async fn domain_stats(&self) -> Result<DomainStats> {
        let v = self.request(RequestSpec::get("/domains")).await?;
        Ok(serde_json::from_value(v)?)
    }

    /// Composed read: three independent calls, no partial result. If any
    /// sub-call fails the whole aggregate fails.
    pub async fn total_stats(&self) -> Result<TotalStats> {
        let (users, files, domains) =
            tokio::try_join!(self.user_stats(), self.file_stats(), self.domain_stats())?;
        Ok(TotalStats::from_parts(users, files, domains))
    }

    pub async fn generate_invite(&self, executor: &str) -> Result<Value> {
        self.request(RequestSpec::post(
            "/admin/invites",
            json!({ "executerId": executor }),
        ))
        .await
    }

    pub async fn generate_bulk_invites(&self, executor: &str, count: u64) -> Result<Value> {
        self.request(RequestSpec::post(
            "/admin/bulkinvites",
            json!({ "executerId": executor, "count": count }),
        ))
        .await
    }

    pub async fn blacklist(&self, id: &str, reason: Option<&str>, executor: &str) -> Result<Value> {
        self.request(RequestSpec::post(
            "/admin/blacklist",
            json!({
                "id": id,
                "reason": reason_or_default(reason),
                "executerId": executor,
            }),
        ))
        .await
    }

    pub async fn unblacklist(
        &self,
        id: &str,
        reason: Option<&str>,
        executor: &str,
    ) -> Result<Value> {
        self.request(RequestSpec::post(
            "/admin/unblacklist",
            json!({
                "id": id,
                "reason": reason_or_default(reason),
                "executerId": executor,
            }),
        ))
        .await
    }

    pub async fn premium(&self, id: &str) -> Result<Value> {
        self.request(RequestSpec::post("/admin/premium", json!({ "id": id })))
            .await
    }

    pub async fn verify_email(&self, id: &str) -> Result<Value> {
        self.request(RequestSpec::post("/admin/verifyemail", json!({ "id": id })))
            .await
    }

    pub async fn wipe_user(&self, id: &str) -> Result<Value> {
        self.request(RequestSpec::post("/admin/wipe", json!({ "id": id })))
            .await
    }

    pub async fn add_invites(&self, id: &str, amount: i64) -> Result<Value> {
        self.request(RequestSpec::post(
            "/admin/inviteadd",
            json!({ "id": id, "amount": amount }),
        ))
        .await
    }

    pub async fn set_uid(&self, id: &str, new_uid: u64) -> Result<Value> {
        self.request(RequestSpec::post(
            "/admin/setuid",
            json!({ "id": id, "newuid": new_uid }),
        ))
        .await
    }

    pub async fn invite_wave(&self, amount: u64) -> Result<Value> {
        self.request(RequestSpec::post(
            "/admin/invitewave",
            json!({ "amount": amount }),
        ))
        .await
    }

    pub async fn get_user(&self, id: &str) -> Result<Value> {
        self.request(RequestSpec::get(format!("/admin/users/{id}"))).await
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Non-2xx responses carry `{error: string}`. A readable envelope becomes a
/// normalized `Backend` message; anything else stays a `Transport` failure.
fn normalize_error(status: StatusCode, body: &str) -> Error {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => Error::Backend(polish_message(&envelope.error)),
        Err(_) => Error::Transport(format!(
            "backend returned {status} without an error envelope"
        )),
    }
}

/// Capitalize the first character and append a period.
fn polish_message(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => ".".to_string(),
    }
}

fn reason_or_default(reason: Option<&str>) -> String {
    match reason {
        Some(r) if !r.trim().is_empty() => r.to_string(),
        _ => DEFAULT_REASON.to_string(),
    }
}
