//! Aggregated payloads returned by the backend
//!
//! The backend is an ORM-driven service, so numbers arrive as integers,
//! floats, decimal strings or null depending on the query. Decoding never
//! fails on a bad field: numbers fall back to zero, lists to empty, and a
//! malformed record is dropped without affecting its siblings.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Payload of `get_dashboard_data`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardSnapshot {
    /// `None` when the backend sent `null` or nothing
    #[serde(default, deserialize_with = "lenient_object")]
    pub kpis: Option<Kpis>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub job_status_summary: Vec<StatusCount>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub recently_closed_jobs: Vec<SummaryRecord>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub today_appointments: Vec<SummaryRecord>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub pending_inspections: Vec<SummaryRecord>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub jobs_ready_to_invoice: Vec<SummaryRecord>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub upcoming_appointments: Vec<SummaryRecord>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub daily_jobs_chart: Vec<DailyCount>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub today_completed_tasks: Option<TaskSummary>,
}

impl DashboardSnapshot {
    /// Decode a `message` payload; anything but an object reads as empty
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => DashboardSnapshot::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Kpis {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub jobs_in_progress: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub ready_to_invoice: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub today_revenue: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub vehicles_serviced: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusCount {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DailyCount {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, alias = "job_count", deserialize_with = "lenient_u64")]
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TaskSummary {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub completed: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total: u64,
}

impl TaskSummary {
    pub fn percent(&self) -> u16 {
        if self.total == 0 {
            return 0;
        }
        let done = self.completed.min(self.total) as u128;
        (done * 100 / self.total as u128) as u16
    }
}

/// One row of any list the backend returns
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SummaryRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub customer: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub vehicle: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub posting_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub scheduled_start: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub grand_total: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub doctype: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub job_card: Option<String>,
}

impl SummaryRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Payload of `get_sidebar_data`: named buckets plus a parallel count map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabSnapshot {
    pub buckets: BTreeMap<String, Vec<SummaryRecord>>,
    pub counts: BTreeMap<String, u64>,
}

impl TabSnapshot {
    pub fn from_value(value: &Value) -> Self {
        let mut snapshot = TabSnapshot::default();
        let Some(map) = value.as_object() else {
            return snapshot;
        };
        for (key, entry) in map {
            if key == "counts" {
                if let Some(counts) = entry.as_object() {
                    for (bucket, count) in counts {
                        let count = number_from_value(count).map(clamp_u64).unwrap_or(0);
                        snapshot.counts.insert(bucket.clone(), count);
                    }
                }
                continue;
            }
            if let Some(items) = entry.as_array() {
                snapshot.buckets.insert(key.clone(), records_from_values(items));
            }
        }
        snapshot
    }

    /// Records of a bucket; a missing bucket reads as empty
    pub fn bucket(&self, key: &str) -> &[SummaryRecord] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, key: &str) -> Option<u64> {
        self.counts.get(key).copied()
    }

    pub fn with_bucket(mut self, key: &str, records: Vec<SummaryRecord>) -> Self {
        self.buckets.insert(key.to_string(), records);
        self
    }

    pub fn with_count(mut self, key: &str, count: u64) -> Self {
        self.counts.insert(key.to_string(), count);
        self
    }
}

impl<'de> Deserialize<'de> for TabSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.map(|v| TabSnapshot::from_value(&v)).unwrap_or_default())
    }
}

fn records_from_values(items: &[Value]) -> Vec<SummaryRecord> {
    items
        .iter()
        .filter_map(|item| serde_json::from_value::<SummaryRecord>(item.clone()).ok())
        .collect()
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn clamp_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .map(clamp_u64)
        .unwrap_or(0))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_f64(deserializer)?.unwrap_or(0.0))
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|v| v.is_finite()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<T>(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(value @ Value::Object(_)) => serde_json::from_value::<T>(value).ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_kpis() {
        let snapshot: DashboardSnapshot = serde_json::from_value(json!({ "kpis": null })).unwrap();
        assert!(snapshot.kpis.is_none());
        assert!(snapshot.recently_closed_jobs.is_empty());
        assert!(snapshot.today_completed_tasks.is_none());
    }

    #[test]
    fn test_lenient_numbers() {
        let snapshot: DashboardSnapshot = serde_json::from_value(json!({
            "kpis": {
                "jobs_in_progress": "4",
                "ready_to_invoice": null,
                "today_revenue": "1250.50"
            },
            "daily_jobs_chart": [
                { "date": "2025-01-01", "job_count": 3 },
                { "date": "2025-01-02", "count": 2.0 }
            ]
        }))
        .unwrap();
        let kpis = snapshot.kpis.unwrap();
        assert_eq!(kpis.jobs_in_progress, 4);
        assert_eq!(kpis.ready_to_invoice, 0);
        assert_eq!(kpis.vehicles_serviced, 0);
        assert!((kpis.today_revenue - 1250.5).abs() < f64::EPSILON);
        let counts: Vec<u64> = snapshot.daily_jobs_chart.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![3, 2]);
    }

    #[test]
    fn test_bad_record_does_not_drop_siblings() {
        let snapshot: DashboardSnapshot = serde_json::from_value(json!({
            "recently_closed_jobs": [
                "not-a-record",
                { "name": "JC-0002", "customer": "C-002" }
            ],
            "today_appointments": { "unexpected": "shape" },
            "pending_inspections": [{ "name": "VI-0001" }]
        }))
        .unwrap();
        assert_eq!(snapshot.recently_closed_jobs.len(), 1);
        assert_eq!(snapshot.recently_closed_jobs[0].name, "JC-0002");
        assert!(snapshot.today_appointments.is_empty());
        assert_eq!(snapshot.pending_inspections.len(), 1);
    }

    #[test]
    fn test_tab_snapshot_buckets_and_counts() {
        let snapshot: TabSnapshot = serde_json::from_value(json!({
            "active": [
                {
                    "name": "JC-0001",
                    "customer": "C-001",
                    "vehicle": "V-001",
                    "status": "In Progress"
                }
            ],
            "counts": { "active": 1, "pending": "0" }
        }))
        .unwrap();
        assert_eq!(snapshot.bucket("active").len(), 1);
        assert!(snapshot.bucket("pending").is_empty());
        assert_eq!(snapshot.count("active"), Some(1));
        assert_eq!(snapshot.count("pending"), Some(0));
        assert_eq!(snapshot.count("completed"), None);
    }

    #[test]
    fn test_dashboard_from_non_object() {
        let snapshot = DashboardSnapshot::from_value(&json!([1, 2]));
        assert!(snapshot.kpis.is_none());
        assert!(snapshot.job_status_summary.is_empty());
    }

    #[test]
    fn test_tab_snapshot_null() {
        let snapshot: TabSnapshot = serde_json::from_value(Value::Null).unwrap();
        assert_eq!(snapshot, TabSnapshot::default());
    }

    #[test]
    fn test_task_percent() {
        let tasks = TaskSummary { completed: 3, total: 4 };
        assert_eq!(tasks.percent(), 75);
        assert_eq!(TaskSummary::default().percent(), 0);
    }

    #[test]
    fn test_task_percent_huge_counts() {
        let tasks = TaskSummary { completed: u64::MAX, total: u64::MAX };
        assert_eq!(tasks.percent(), 100);
        let tasks = TaskSummary { completed: u64::MAX / 2, total: u64::MAX };
        assert_eq!(tasks.percent(), 49);
    }
}
