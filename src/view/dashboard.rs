//! Dashboard tab: KPI cards, charts and the five overview lists

use crate::domain::{DashboardSnapshot, Kpis, RecordKind};

use super::format::{format_count, format_currency, format_date};
use super::{Container, DashboardWidgets, KpiCard, Panel, ScreenView, Tone};

pub const RECENTLY_CLOSED: &str = "recently_closed_jobs";
pub const TODAY_APPOINTMENTS: &str = "today_appointments";
pub const PENDING_INSPECTIONS: &str = "pending_inspections";
pub const READY_TO_INVOICE: &str = "jobs_ready_to_invoice";
pub const UPCOMING_APPOINTMENTS: &str = "upcoming_appointments";

/// Value shown on a KPI card before data arrives or when the backend sent no KPIs
pub const KPI_UNKNOWN: &str = "-";

pub fn containers_shell() -> Vec<Container> {
    vec![
        Container::loading(RECENTLY_CLOSED, "Recently Closed Jobs", "No recently closed jobs"),
        Container::loading(TODAY_APPOINTMENTS, "Today's Appointments", "No appointments today"),
        Container::loading(PENDING_INSPECTIONS, "Pending Inspections", "No pending inspections"),
        Container::loading(READY_TO_INVOICE, "Ready to Invoice", "No jobs ready to invoice"),
        Container::loading(
            UPCOMING_APPOINTMENTS,
            "Upcoming Appointments",
            "No upcoming appointments",
        ),
    ]
}

pub fn widgets_shell() -> DashboardWidgets {
    DashboardWidgets {
        kpis: kpi_cards(None),
        daily_jobs: Panel::Loading,
        status_mix: Panel::Loading,
        tasks: Panel::Loading,
    }
}

/// The four KPI cards. Without a KPI object every card shows `-`.
pub fn kpi_cards(kpis: Option<&Kpis>) -> Vec<KpiCard> {
    let value = |f: fn(&Kpis) -> String| kpis.map(f).unwrap_or_else(|| KPI_UNKNOWN.to_string());
    vec![
        KpiCard {
            label: "Jobs In Progress",
            value: value(|k| format_count(k.jobs_in_progress)),
            tone: Tone::Info,
        },
        KpiCard {
            label: "Ready to Invoice",
            value: value(|k| format_count(k.ready_to_invoice)),
            tone: Tone::Accent,
        },
        KpiCard {
            label: "Today's Revenue",
            value: value(|k| format_currency(k.today_revenue)),
            tone: Tone::Success,
        },
        KpiCard {
            label: "Vehicles Serviced (Month)",
            value: value(|k| format_count(k.vehicles_serviced)),
            tone: Tone::Warning,
        },
    ]
}

pub(super) fn fill(screen: &mut ScreenView, snapshot: &DashboardSnapshot) {
    if let Some(widgets) = screen.widgets.as_mut() {
        widgets.kpis = kpi_cards(snapshot.kpis.as_ref());

        widgets.daily_jobs = if snapshot.daily_jobs_chart.is_empty() {
            Panel::Empty("No job activity in the last 30 days")
        } else {
            Panel::Ready(
                snapshot
                    .daily_jobs_chart
                    .iter()
                    .map(|point| (format_date(&point.date), point.count))
                    .collect(),
            )
        };

        let statuses: Vec<(String, u64)> = snapshot
            .job_status_summary
            .iter()
            .filter(|entry| entry.count > 0 && !entry.status.is_empty())
            .map(|entry| (entry.status.clone(), entry.count))
            .collect();
        widgets.status_mix = if statuses.is_empty() {
            Panel::Empty("No status data available")
        } else {
            Panel::Ready(statuses)
        };

        widgets.tasks = match snapshot.today_completed_tasks {
            Some(tasks) if tasks.total > 0 => {
                Panel::Ready((tasks.completed, tasks.total, tasks.percent()))
            }
            _ => Panel::Empty("No tasks scheduled today"),
        };
    }

    for container in &mut screen.containers {
        let (records, kind) = match container.id {
            RECENTLY_CLOSED => (&snapshot.recently_closed_jobs, RecordKind::JobCard),
            TODAY_APPOINTMENTS => (&snapshot.today_appointments, RecordKind::ServiceAppointment),
            PENDING_INSPECTIONS => (&snapshot.pending_inspections, RecordKind::VehicleInspection),
            READY_TO_INVOICE => (&snapshot.jobs_ready_to_invoice, RecordKind::JobCard),
            UPCOMING_APPOINTMENTS => {
                (&snapshot.upcoming_appointments, RecordKind::ServiceAppointment)
            }
            _ => continue,
        };
        container.fill_records(records, kind);
    }
}
