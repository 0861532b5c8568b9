use crate::codec::Document;
use crate::secrets::SecretKind;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use tracing::debug;

/// Activation status reported by the backend for one integrated service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Active,
    Inactive,
    Pending,
    Error,
    Other(String),
}

impl ServiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ServiceStatus::Active => "ACTIVE",
            ServiceStatus::Inactive => "INACTIVE",
            ServiceStatus::Pending => "PENDING",
            ServiceStatus::Error => "ERROR",
            ServiceStatus::Other(s) => s,
        }
    }
}

impl From<String> for ServiceStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ACTIVE" => ServiceStatus::Active,
            "INACTIVE" => ServiceStatus::Inactive,
            "PENDING" => ServiceStatus::Pending,
            "ERROR" => ServiceStatus::Error,
            _ => ServiceStatus::Other(value),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live state of an integrated service as returned by the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceDetails {
    #[serde(deserialize_with = "deserialize_status")]
    pub status: ServiceStatus,
    #[serde(default)]
    pub spec: Document,
    #[serde(default)]
    pub output: Document,
}

impl ServiceDetails {
    /// Details of a service that has never been activated
    pub fn inactive() -> Self {
        Self {
            status: ServiceStatus::Inactive,
            spec: Document::new(),
            output: Document::new(),
        }
    }
}

fn deserialize_status<'de, D>(deserializer: D) -> std::result::Result<ServiceStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    String::deserialize(deserializer).map(ServiceStatus::from)
}

/// A stored credential as listed by the backend. Never carries secret material.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecretItem {
    pub id: String,
    pub name: String,
}

impl SecretItem {
    #[allow(dead_code)]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Serialize)]
struct SpecRequest<'a> {
    spec: &'a Document,
}

/// Trait for the backend API that stores service specifications and credentials
pub trait BackendClient: Send + Sync {
    /// Activate a service with the given specification
    fn activate(&self, service: &str, spec: &Document) -> Result<()>;

    /// Replace the specification of an active service
    fn update(&self, service: &str, spec: &Document) -> Result<()>;

    /// Fetch status, stored specification and live output of a service
    fn get_details(&self, service: &str) -> Result<ServiceDetails>;

    /// List stored credentials of one kind, in backend order
    fn list_secrets(&self, kind: SecretKind) -> Result<Vec<SecretItem>>;
}

/// Connection settings for [`HttpBackendClient`]
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub endpoint: url::Url,
    pub token: Option<String>,
    pub organization: String,
    pub cluster: String,
}

/// Real backend client using reqwest
pub struct HttpBackendClient {
    client: reqwest::blocking::Client,
    settings: BackendSettings,
}

impl HttpBackendClient {
    pub fn new(settings: BackendSettings) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            settings,
        }
    }

    fn base(&self) -> String {
        format!(
            "{}/api/v1/orgs/{}",
            self.settings.endpoint.as_str().trim_end_matches('/'),
            self.settings.organization
        )
    }

    fn service_url(&self, service: &str) -> String {
        format!(
            "{}/clusters/{}/services/{}",
            self.base(),
            self.settings.cluster,
            service
        )
    }

    fn authorize(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.settings.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send_spec(&self, method: reqwest::Method, service: &str, spec: &Document) -> Result<()> {
        let url = self.service_url(service);
        debug!(url = url.as_str(), method = method.as_str(), "sending service specification");

        let response = self
            .authorize(self.client.request(method, &url))
            .json(&SpecRequest { spec })
            .send()
            .with_context(|| format!("Failed to reach backend: {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            bail!("HTTP request failed with status {}: {} {}", status, url, body);
        }
        Ok(())
    }
}

impl BackendClient for HttpBackendClient {
    fn activate(&self, service: &str, spec: &Document) -> Result<()> {
        self.send_spec(reqwest::Method::POST, service, spec)
    }

    fn update(&self, service: &str, spec: &Document) -> Result<()> {
        self.send_spec(reqwest::Method::PUT, service, spec)
    }

    fn get_details(&self, service: &str) -> Result<ServiceDetails> {
        let url = self.service_url(service);
        debug!(url = url.as_str(), "fetching service details");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .with_context(|| format!("Failed to reach backend: {}", url))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(ServiceDetails::inactive());
        }
        if !response.status().is_success() {
            bail!("HTTP request failed with status {}: {}", response.status(), url);
        }

        response
            .json::<ServiceDetails>()
            .with_context(|| format!("Failed to parse service details from: {}", url))
    }

    fn list_secrets(&self, kind: SecretKind) -> Result<Vec<SecretItem>> {
        let url = format!("{}/secrets", self.base());
        debug!(url = url.as_str(), kind = kind.as_str(), "listing secrets");

        let response = self
            .authorize(self.client.get(&url))
            .query(&[("type", kind.as_str())])
            .send()
            .with_context(|| format!("Failed to reach backend: {}", url))?;

        if !response.status().is_success() {
            bail!("HTTP request failed with status {}: {}", response.status(), url);
        }

        response
            .json::<Vec<SecretItem>>()
            .with_context(|| format!("Failed to parse secret list from: {}", url))
    }
}

/// Request captured by [`MockBackend`]
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum BackendCall {
    Activate(String, Document),
    Update(String, Document),
}

/// In-memory backend for testing
#[allow(dead_code)]
pub struct MockBackend {
    secrets: Mutex<HashMap<SecretKind, Vec<SecretItem>>>,
    details: Mutex<HashMap<String, ServiceDetails>>,
    calls: Mutex<Vec<BackendCall>>,
    failing_kinds: Mutex<Vec<SecretKind>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn new() -> Self {
        Self {
            secrets: Mutex::new(HashMap::new()),
            details: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            failing_kinds: Mutex::new(Vec::new()),
        }
    }

    /// Register stored credentials of one kind
    pub fn with_secrets(self, kind: SecretKind, items: Vec<SecretItem>) -> Self {
        self.secrets.lock().unwrap().insert(kind, items);
        self
    }

    /// Register the details returned for a service
    pub fn with_details(self, service: &str, details: ServiceDetails) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(service.to_string(), details);
        self
    }

    /// Make listing credentials of `kind` fail
    pub fn failing_secrets(self, kind: SecretKind) -> Self {
        self.failing_kinds.lock().unwrap().push(kind);
        self
    }

    /// All activate/update requests received so far
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendClient for MockBackend {
    fn activate(&self, service: &str, spec: &Document) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(BackendCall::Activate(service.to_string(), spec.clone()));
        Ok(())
    }

    fn update(&self, service: &str, spec: &Document) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(BackendCall::Update(service.to_string(), spec.clone()));
        Ok(())
    }

    fn get_details(&self, service: &str) -> Result<ServiceDetails> {
        Ok(self
            .details
            .lock()
            .unwrap()
            .get(service)
            .cloned()
            .unwrap_or_else(ServiceDetails::inactive))
    }

    fn list_secrets(&self, kind: SecretKind) -> Result<Vec<SecretItem>> {
        if self.failing_kinds.lock().unwrap().contains(&kind) {
            bail!("backend unavailable");
        }
        Ok(self
            .secrets
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_details_from_wire() {
        let details: ServiceDetails = serde_json::from_value(json!({
            "status": "ACTIVE",
            "spec": {"grafana": {"enabled": true}},
            "output": {"grafana": {"version": "7.1.0"}}
        }))
        .unwrap();

        assert_eq!(details.status, ServiceStatus::Active);
        assert!(details.spec.contains_key("grafana"));
        assert!(details.output.contains_key("grafana"));
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let details: ServiceDetails =
            serde_json::from_value(json!({"status": "UPGRADING"})).unwrap();

        assert_eq!(details.status, ServiceStatus::Other("UPGRADING".to_string()));
        assert_eq!(details.status.to_string(), "UPGRADING");
        assert!(details.spec.is_empty());
    }

    #[test]
    fn test_secret_item_ignores_extra_fields() {
        let items: Vec<SecretItem> = serde_json::from_value(json!([
            {"id": "abc", "name": "grafana-admin", "type": "password", "tags": []}
        ]))
        .unwrap();

        assert_eq!(items, vec![SecretItem::new("abc", "grafana-admin")]);
    }

    #[test]
    fn test_service_url_layout() {
        let client = HttpBackendClient::new(BackendSettings {
            endpoint: url::Url::parse("https://pipeline.example.com/").unwrap(),
            token: None,
            organization: "7".to_string(),
            cluster: "42".to_string(),
        });

        assert_eq!(
            client.service_url("monitoring"),
            "https://pipeline.example.com/api/v1/orgs/7/clusters/42/services/monitoring"
        );
    }

    #[test]
    fn test_mock_backend_defaults_to_inactive() {
        let backend = MockBackend::new();
        let details = backend.get_details("logging").unwrap();
        assert_eq!(details.status, ServiceStatus::Inactive);
    }
}
