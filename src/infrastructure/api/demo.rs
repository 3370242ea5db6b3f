//! In-process backend with canned garage data, used by `--demo` and tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, NaiveDate};

use super::{ApiError, GarageApi};
use crate::domain::{
    DailyCount, DashboardSnapshot, FilterState, Kpis, StatusCount, SummaryRecord, Tab,
    TabSnapshot, TaskSummary,
};

pub struct DemoGarageApi {
    today: NaiveDate,
    latency: Duration,
    failing: AtomicBool,
}

impl DemoGarageApi {
    pub fn new() -> Self {
        Self {
            today: Local::now().date_naive(),
            latency: Duration::ZERO,
            failing: AtomicBool::new(false),
        }
    }

    /// Fix "today" so generated dates are stable
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every call fail until switched back
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    async fn simulate(&self) -> Result<(), ApiError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("demo backend unavailable".to_string()));
        }
        Ok(())
    }

    fn day(&self, offset: i64) -> String {
        (self.today + ChronoDuration::days(offset)).format("%Y-%m-%d").to_string()
    }

    fn job_cards(&self) -> Vec<SummaryRecord> {
        let rows = [
            ("JC-0001", "C-001", "V-001", "In Progress", 0),
            ("JC-0002", "C-002", "V-014", "Estimated", -1),
            ("JC-0003", "C-003", "V-022", "Ready to Invoice", -2),
            ("JC-0004", "C-001", "V-001", "Closed", -5),
            ("JC-0005", "C-007", "V-031", "Checked In", 0),
            ("JC-0006", "C-009", "V-040", "Draft", 0),
            ("JC-0007", "C-004", "V-018", "Invoiced", -3),
        ];
        rows.iter()
            .map(|(name, customer, vehicle, status, offset)| SummaryRecord {
                name: name.to_string(),
                customer: Some(customer.to_string()),
                vehicle: Some(vehicle.to_string()),
                status: Some(status.to_string()),
                posting_date: Some(self.day(*offset)),
                ..SummaryRecord::default()
            })
            .collect()
    }

    fn appointments(&self) -> Vec<SummaryRecord> {
        let rows = [
            ("SA-0001", "C-011", "V-050", "Scheduled", 0, "09:30:00"),
            ("SA-0002", "C-012", "V-051", "Checked In", 0, "11:00:00"),
            ("SA-0003", "C-013", "V-052", "Scheduled", 1, "08:00:00"),
            ("SA-0004", "C-014", "V-053", "Scheduled", 3, "14:15:00"),
            ("SA-0005", "C-002", "V-014", "Completed", -1, "10:00:00"),
        ];
        rows.iter()
            .map(|(name, customer, vehicle, status, offset, time)| SummaryRecord {
                name: name.to_string(),
                customer: Some(customer.to_string()),
                vehicle: Some(vehicle.to_string()),
                status: Some(status.to_string()),
                scheduled_start: Some(format!("{} {}", self.day(*offset), time)),
                ..SummaryRecord::default()
            })
            .collect()
    }

    fn inspections(&self) -> Vec<SummaryRecord> {
        let rows = [
            ("VI-0001", "V-001", "Draft", Some("JC-0001")),
            ("VI-0002", "V-060", "In Progress", None),
            ("VI-0003", "V-022", "Completed", Some("JC-0003")),
        ];
        rows.iter()
            .map(|(name, vehicle, status, job_card)| SummaryRecord {
                name: name.to_string(),
                vehicle: Some(vehicle.to_string()),
                status: Some(status.to_string()),
                posting_date: Some(self.day(0)),
                job_card: job_card.map(str::to_string),
                ..SummaryRecord::default()
            })
            .collect()
    }

    fn sales(&self) -> Vec<(&'static str, SummaryRecord)> {
        let rows = [
            ("quotations", "SAL-QTN-0001", "C-002", "Draft", 1840.0),
            ("quotations", "SAL-QTN-0002", "C-009", "Open", 320.5),
            ("unpaid_invoices", "ACC-SINV-0001", "C-003", "Unpaid", 2150.0),
            ("unpaid_invoices", "ACC-SINV-0002", "C-004", "Overdue", 980.0),
            ("paid_invoices", "ACC-SINV-0003", "C-001", "Paid", 12500.0),
        ];
        rows.iter()
            .map(|(bucket, name, customer, status, total)| {
                let record = SummaryRecord {
                    name: name.to_string(),
                    customer: Some(customer.to_string()),
                    status: Some(status.to_string()),
                    posting_date: Some(self.day(-1)),
                    grand_total: Some(*total),
                    ..SummaryRecord::default()
                };
                (*bucket, record)
            })
            .collect()
    }
}

impl Default for DemoGarageApi {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_filters(record: &SummaryRecord, filters: &FilterState) -> bool {
    let status_ok = filters.status.is_empty()
        || record
            .status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(&filters.status));
    let date = record
        .posting_date
        .as_deref()
        .or(record.scheduled_start.as_deref())
        .map(|d| d.get(..10).unwrap_or(d))
        .unwrap_or_default();
    let from_ok = filters.date_from.is_empty() || date >= filters.date_from.as_str();
    let to_ok = filters.date_to.is_empty() || date <= filters.date_to.as_str();
    let job_card_ok = match filters.has_job_card.as_str() {
        "yes" => record.job_card.is_some(),
        "no" => record.job_card.is_none(),
        _ => true,
    };
    status_ok && from_ok && to_ok && job_card_ok
}

fn bucketed<F>(records: Vec<SummaryRecord>, filters: &FilterState, bucket_of: F) -> TabSnapshot
where
    F: Fn(&SummaryRecord) -> Option<&'static str>,
{
    let mut snapshot = TabSnapshot::default();
    for record in records.into_iter().filter(|r| matches_filters(r, filters)) {
        if let Some(bucket) = bucket_of(&record) {
            snapshot.buckets.entry(bucket.to_string()).or_default().push(record);
        }
    }
    let counts: Vec<(String, u64)> = snapshot
        .buckets
        .iter()
        .map(|(key, records)| (key.clone(), records.len() as u64))
        .collect();
    snapshot.counts.extend(counts);
    snapshot
}

#[async_trait]
impl GarageApi for DemoGarageApi {
    async fn dashboard_data(&self, _company: Option<&str>) -> Result<DashboardSnapshot, ApiError> {
        self.simulate().await?;

        let jobs = self.job_cards();
        let with_status = |status: &str| -> Vec<SummaryRecord> {
            jobs.iter()
                .filter(|j| j.status.as_deref() == Some(status))
                .cloned()
                .collect()
        };
        let today = self.day(0);
        let (today_appointments, upcoming_appointments): (Vec<_>, Vec<_>) = self
            .appointments()
            .into_iter()
            .filter(|a| a.status.as_deref() != Some("Completed"))
            .partition(|a| a.scheduled_start.as_deref().is_some_and(|s| s.starts_with(&today)));

        let mut status_summary: Vec<StatusCount> = Vec::new();
        for job in &jobs {
            let status = job.status.clone().unwrap_or_default();
            match status_summary.iter_mut().find(|s| s.status == status) {
                Some(entry) => entry.count += 1,
                None => status_summary.push(StatusCount { status, count: 1 }),
            }
        }

        Ok(DashboardSnapshot {
            kpis: Some(Kpis {
                jobs_in_progress: with_status("In Progress").len() as u64,
                ready_to_invoice: with_status("Ready to Invoice").len() as u64,
                today_revenue: 15250.0,
                vehicles_serviced: 42,
            }),
            job_status_summary: status_summary,
            recently_closed_jobs: with_status("Closed"),
            today_appointments,
            pending_inspections: self
                .inspections()
                .into_iter()
                .filter(|i| i.status.as_deref() != Some("Completed"))
                .collect(),
            jobs_ready_to_invoice: with_status("Ready to Invoice"),
            upcoming_appointments,
            daily_jobs_chart: (0..30)
                .rev()
                .map(|offset: i64| DailyCount {
                    date: self.day(-offset),
                    count: ((offset * 7 + 3) % 6) as u64,
                })
                .collect(),
            today_completed_tasks: Some(TaskSummary {
                completed: 5,
                total: 8,
            }),
        })
    }

    async fn sidebar_data(
        &self,
        tab: Tab,
        filters: &FilterState,
        _company: Option<&str>,
    ) -> Result<TabSnapshot, ApiError> {
        self.simulate().await?;

        let today = self.day(0);
        let snapshot = match tab {
            Tab::Dashboard => TabSnapshot::default(),
            Tab::Jobs => bucketed(self.job_cards(), filters, |job| {
                match job.status.as_deref() {
                    Some("In Progress" | "Checked In" | "Inspected" | "Approved") => Some("active"),
                    Some("Draft" | "Estimated") => Some("pending"),
                    _ => Some("completed"),
                }
            }),
            Tab::Appointments => bucketed(self.appointments(), filters, |appt| {
                let start = appt.scheduled_start.as_deref().unwrap_or_default();
                if appt.status.as_deref() == Some("Completed") {
                    Some("completed")
                } else if start.starts_with(&today) {
                    Some("today")
                } else {
                    Some("upcoming")
                }
            }),
            Tab::Inspections => bucketed(self.inspections(), filters, |inspection| {
                match inspection.status.as_deref() {
                    Some("Completed") => Some("completed"),
                    _ => Some("pending"),
                }
            }),
            Tab::Sales => {
                let sales = self.sales();
                bucketed(
                    sales.iter().map(|(_, record)| record.clone()).collect(),
                    filters,
                    |record| {
                        sales
                            .iter()
                            .find(|(_, r)| r.name == record.name)
                            .map(|(bucket, _)| *bucket)
                    },
                )
            }
        };
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        "demo backend".to_string()
    }
}
