//! HTTP client for the garage backend's whitelisted RPC methods

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{wire_filters, ApiError, GarageApi};
use crate::domain::{DashboardSnapshot, FilterState, Tab, TabSnapshot};

/// Dotted method paths under `/api/method/`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiMethods {
    pub dashboard: String,
    pub sidebar: String,
}

impl Default for ApiMethods {
    fn default() -> Self {
        Self {
            dashboard: "workshop_mgmt.api.get_dashboard_data".to_string(),
            sidebar: "workshop_mgmt.api.get_sidebar_data".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub timeout: Duration,
    pub methods: ApiMethods,
}

pub struct HttpGarageApi {
    http: reqwest::Client,
    base_url: String,
    auth: Option<String>,
    timeout_secs: u64,
    methods: ApiMethods,
}

impl HttpGarageApi {
    pub fn new(settings: HttpSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let auth = match (settings.api_key, settings.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() => Some(format!("token {key}:{secret}")),
            _ => None,
        };
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            auth,
            timeout_secs: settings.timeout.as_secs(),
            methods: settings.methods,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/api/method/{}", self.base_url, method)
    }

    async fn call(&self, method: &str, body: Value) -> Result<Value, ApiError> {
        let url = self.method_url(method);
        debug!(%url, "calling backend");

        let mut request = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body);
        if let Some(auth) = &self.auth {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await.map_err(|err| self.transport_error(err))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|err| self.transport_error(err))?;
        unwrap_envelope(status, &text)
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl GarageApi for HttpGarageApi {
    async fn dashboard_data(&self, company: Option<&str>) -> Result<DashboardSnapshot, ApiError> {
        let filters = wire_filters(&FilterState::default(), company);
        let body = json!({ "filters": filters.to_string() });
        let message = self.call(&self.methods.dashboard, body).await?;
        Ok(DashboardSnapshot::from_value(&message))
    }

    async fn sidebar_data(
        &self,
        tab: Tab,
        filters: &FilterState,
        company: Option<&str>,
    ) -> Result<TabSnapshot, ApiError> {
        let filters = wire_filters(filters, company);
        let body = json!({ "filters": filters.to_string(), "tab": tab.wire_name() });
        let message = self.call(&self.methods.sidebar, body).await?;
        Ok(TabSnapshot::from_value(&message))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Extract `message` from an RPC response body
fn unwrap_envelope(status: u16, body: &str) -> Result<Value, ApiError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if let Some(exc) = parsed.as_ref().and_then(server_exception) {
        return Err(ApiError::Server(exc));
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::Status {
            code: status,
            body: body.chars().take(200).collect(),
        });
    }

    match parsed {
        Some(Value::Object(mut map)) => Ok(map.remove("message").unwrap_or(Value::Null)),
        Some(_) => Err(ApiError::Decode("response is not an object".to_string())),
        None => Err(ApiError::Decode("response is not JSON".to_string())),
    }
}

fn server_exception(value: &Value) -> Option<String> {
    let exc = value.get("exception").or_else(|| value.get("exc"))?;
    match exc {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.lines().last().unwrap_or(s.as_str()).trim().to_string()),
        other => Some(other.to_string()),
    }
}
