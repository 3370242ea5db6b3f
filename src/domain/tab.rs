//! Dashboard tabs and the buckets each tab groups its records into

use std::fmt;
use std::str::FromStr;

/// Main tabs of the garage dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tab {
    Dashboard,
    Jobs,
    Appointments,
    Inspections,
    Sales,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Jobs,
        Tab::Appointments,
        Tab::Inspections,
        Tab::Sales,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Jobs => "Jobs",
            Tab::Appointments => "Appointments",
            Tab::Inspections => "Inspections",
            Tab::Sales => "Sales",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            Tab::Dashboard => '1',
            Tab::Jobs => '2',
            Tab::Appointments => '3',
            Tab::Inspections => '4',
            Tab::Sales => '5',
        }
    }

    /// Name used on the wire for `get_sidebar_data`
    pub fn wire_name(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Jobs => "jobs",
            Tab::Appointments => "appointments",
            Tab::Inspections => "inspections",
            Tab::Sales => "sales",
        }
    }

    /// Ordered buckets a scoped tab snapshot is split into.
    /// The first bucket drives the tab badge count.
    pub fn buckets(&self) -> &'static [Bucket] {
        match self {
            Tab::Dashboard => &[],
            Tab::Jobs => JOB_BUCKETS,
            Tab::Appointments => APPOINTMENT_BUCKETS,
            Tab::Inspections => INSPECTION_BUCKETS,
            Tab::Sales => SALES_BUCKETS,
        }
    }

    pub fn primary_bucket(&self) -> Option<&'static Bucket> {
        self.buckets().first()
    }

    pub fn next(&self) -> Tab {
        let index = Tab::ALL.iter().position(|t| t == self).unwrap_or(0);
        Tab::ALL[(index + 1) % Tab::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        let index = Tab::ALL.iter().position(|t| t == self).unwrap_or(0);
        Tab::ALL[(index + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    pub fn from_shortcut(ch: char) -> Option<Tab> {
        Tab::ALL.iter().copied().find(|tab| tab.shortcut() == ch)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" | "home" | "dash" => Ok(Tab::Dashboard),
            "jobs" | "job" | "jobcards" => Ok(Tab::Jobs),
            "appointments" | "appointment" | "appts" => Ok(Tab::Appointments),
            "inspections" | "inspection" => Ok(Tab::Inspections),
            "sales" | "sale" => Ok(Tab::Sales),
            other => Err(format!("unknown tab: {other}")),
        }
    }
}

const JOB_BUCKETS: &[Bucket] = &[
    Bucket::new("active", "Active Jobs", "No active jobs"),
    Bucket::new("pending", "Pending Jobs", "No pending jobs"),
    Bucket::new("completed", "Completed Jobs", "No completed jobs"),
];

const APPOINTMENT_BUCKETS: &[Bucket] = &[
    Bucket::new("today", "Today", "No appointments today"),
    Bucket::new("upcoming", "Upcoming", "No upcoming appointments"),
    Bucket::new("completed", "Completed", "No completed appointments"),
];

const INSPECTION_BUCKETS: &[Bucket] = &[
    Bucket::new("pending", "Pending Inspections", "No pending inspections"),
    Bucket::new("completed", "Completed Inspections", "No completed inspections"),
];

const SALES_BUCKETS: &[Bucket] = &[
    Bucket::new("quotations", "Quotations", "No quotations"),
    Bucket::new("unpaid_invoices", "Unpaid Invoices", "No unpaid invoices"),
    Bucket::new("paid_invoices", "Paid Invoices", "No paid invoices"),
];

/// A named group of records inside a scoped tab snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub key: &'static str,
    pub title: &'static str,
    pub placeholder: &'static str,
}

impl Bucket {
    const fn new(key: &'static str, title: &'static str, placeholder: &'static str) -> Self {
        Self {
            key,
            title,
            placeholder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Dashboard.next(), Tab::Jobs);
        assert_eq!(Tab::Sales.next(), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.prev(), Tab::Sales);
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!("Jobs".parse::<Tab>(), Ok(Tab::Jobs));
        assert_eq!("appts".parse::<Tab>(), Ok(Tab::Appointments));
        assert!("garage".parse::<Tab>().is_err());
    }

    #[test]
    fn test_every_scoped_tab_has_buckets() {
        for tab in Tab::ALL.iter().filter(|t| **t != Tab::Dashboard) {
            assert!(!tab.buckets().is_empty(), "{tab} has no buckets");
        }
        assert_eq!(Tab::Jobs.primary_bucket().map(|b| b.key), Some("active"));
    }
}
