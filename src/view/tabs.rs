//! Scoped tabs (jobs, appointments, inspections, sales)

use crate::domain::{FilterField, RecordKind, Tab, TabSnapshot};

use super::{Container, ScreenView};

/// Filter controls each tab exposes, in display order
pub fn filter_fields(tab: Tab) -> &'static [FilterField] {
    match tab {
        Tab::Dashboard => &[],
        Tab::Jobs | Tab::Appointments | Tab::Sales => {
            &[FilterField::Status, FilterField::DateFrom, FilterField::DateTo]
        }
        Tab::Inspections => &[
            FilterField::Status,
            FilterField::HasJobCard,
            FilterField::DateFrom,
            FilterField::DateTo,
        ],
    }
}

/// Values offered by the status control; cycling past the end clears the filter
pub fn status_options(tab: Tab) -> &'static [&'static str] {
    match tab {
        Tab::Dashboard => &[],
        Tab::Jobs => &[
            "Draft",
            "Checked In",
            "Inspected",
            "Estimated",
            "Approved",
            "In Progress",
            "Ready to Invoice",
            "Invoiced",
            "Closed",
        ],
        Tab::Appointments => &["Scheduled", "Checked In", "Completed", "Cancelled", "No Show"],
        Tab::Inspections => &["Draft", "In Progress", "Completed"],
        Tab::Sales => &["Draft", "Unpaid", "Overdue", "Paid"],
    }
}

/// Next value of the status control after `current`
pub fn next_status(tab: Tab, current: &str) -> String {
    let options = status_options(tab);
    match options.iter().position(|o| o.eq_ignore_ascii_case(current)) {
        Some(index) if index + 1 < options.len() => options[index + 1].to_string(),
        Some(_) => String::new(),
        None if current.is_empty() => options.first().map(|o| o.to_string()).unwrap_or_default(),
        None => String::new(),
    }
}

/// Record kind a bucket links to, unless a record names its own doctype
pub fn record_kind(tab: Tab, bucket: &str) -> RecordKind {
    match tab {
        Tab::Dashboard | Tab::Jobs => RecordKind::JobCard,
        Tab::Appointments => RecordKind::ServiceAppointment,
        Tab::Inspections => RecordKind::VehicleInspection,
        Tab::Sales if bucket == "quotations" => RecordKind::Quotation,
        Tab::Sales => RecordKind::SalesInvoice,
    }
}

pub fn containers_shell(tab: Tab) -> Vec<Container> {
    tab.buckets()
        .iter()
        .map(|bucket| Container::loading(bucket.key, bucket.title, bucket.placeholder))
        .collect()
}

/// Badge count for a tab: the primary bucket's count, else its length
pub fn badge_count(tab: Tab, snapshot: &TabSnapshot) -> u64 {
    let Some(primary) = tab.primary_bucket() else {
        return 0;
    };
    snapshot
        .count(primary.key)
        .unwrap_or(snapshot.bucket(primary.key).len() as u64)
}

pub(super) fn fill(screen: &mut ScreenView, snapshot: &TabSnapshot) {
    let tab = screen.tab;
    for container in &mut screen.containers {
        container.fill_records(snapshot.bucket(container.id), record_kind(tab, container.id));
    }
}
