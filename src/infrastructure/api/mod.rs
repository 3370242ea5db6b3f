//! Backend API seam
//!
//! `GarageApi` is the boundary between the runtime worker and whatever
//! serves dashboard data: the HTTP backend or the in-process demo.

mod demo;
mod http;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::controller::{FetchQuery, Payload};
use crate::domain::{DashboardSnapshot, FilterState, Tab, TabSnapshot};

pub use demo::DemoGarageApi;
pub use http::{ApiMethods, HttpGarageApi, HttpSettings};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("server returned HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("server error: {0}")]
    Server(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait GarageApi: Send + Sync {
    /// `get_dashboard_data`
    async fn dashboard_data(&self, company: Option<&str>) -> Result<DashboardSnapshot, ApiError>;

    /// `get_sidebar_data` for one scoped tab
    async fn sidebar_data(
        &self,
        tab: Tab,
        filters: &FilterState,
        company: Option<&str>,
    ) -> Result<TabSnapshot, ApiError>;

    fn describe(&self) -> String;
}

/// Run one controller query against `api`
pub async fn execute(api: &dyn GarageApi, query: &FetchQuery) -> Result<Payload, ApiError> {
    match query {
        FetchQuery::Dashboard { company } => api
            .dashboard_data(company.as_deref())
            .await
            .map(Payload::Dashboard),
        FetchQuery::Tab {
            tab,
            filters,
            company,
        } => api
            .sidebar_data(*tab, filters, company.as_deref())
            .await
            .map(Payload::Tab),
    }
}

/// Filter object sent to the backend. Empty values are omitted.
pub fn wire_filters(filters: &FilterState, company: Option<&str>) -> Value {
    let mut map = Map::new();
    let mut put = |key: &str, value: &str| {
        if !value.is_empty() {
            map.insert(key.to_string(), Value::String(value.to_string()));
        }
    };
    put("company", company.unwrap_or_default());
    put("status", &filters.status);
    put("date_from", &filters.date_from);
    put("date_to", &filters.date_to);
    put("has_jobcard", &filters.has_job_card);
    Value::Object(map)
}
