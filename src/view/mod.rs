//! View models for the dashboard screen
//!
//! Render functions here turn snapshots into plain data: containers,
//! rows, KPI cards and chart series. The `ui` layer draws these and binds
//! key handling to each row's `RecordRef`; nothing in this module touches
//! the terminal.

pub mod dashboard;
pub mod format;
pub mod tabs;

use crate::domain::{
    DashboardSnapshot, FilterField, FilterState, RecordKind, RecordRef, SummaryRecord, Tab,
    TabSnapshot,
};

use format::{format_currency, format_date, format_datetime, status_tone};

pub const LOADING_TEXT: &str = "Loading…";
pub const FAILED_TEXT: &str = "Failed to load. Press r to retry.";

/// Colour intent, mapped to terminal colours by the ui layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Accent,
    Danger,
}

/// Content state of any panel on screen
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Loading,
    /// Data arrived but there is nothing to show
    Empty(&'static str),
    Ready(T),
    Failed(String),
}

impl<T> Panel<T> {
    /// Text shown instead of content, if any
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Panel::Loading => Some(LOADING_TEXT),
            Panel::Empty(text) => Some(*text),
            Panel::Ready(_) => None,
            Panel::Failed(text) => Some(text.as_str()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Panel::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Panel::Failed(_))
    }
}

/// One list row
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub title: String,
    pub subtext: String,
    pub badge: Option<String>,
    pub tone: Tone,
    pub trailing: Option<String>,
    /// Detail view opened when the row is activated
    pub target: Option<RecordRef>,
}

impl RowView {
    pub fn from_record(record: &SummaryRecord, default_kind: RecordKind) -> Self {
        let kind = record
            .doctype
            .as_deref()
            .and_then(RecordKind::from_doctype)
            .unwrap_or(default_kind);

        let mut subtext = [record.customer.as_deref(), record.vehicle.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if subtext.is_empty() {
            subtext = record
                .scheduled_start
                .as_deref()
                .map(format_datetime)
                .or_else(|| record.posting_date.as_deref().map(format_date))
                .unwrap_or_default();
        }

        let trailing = record
            .grand_total
            .map(format_currency)
            .or_else(|| record.scheduled_start.as_deref().map(format_datetime));

        let target = if record.name.is_empty() {
            None
        } else {
            Some(RecordRef::new(kind, record.name.clone()))
        };

        Self {
            title: if record.name.is_empty() {
                "-".to_string()
            } else {
                record.name.clone()
            },
            subtext,
            badge: record.status.clone(),
            tone: record.status.as_deref().map(status_tone).unwrap_or(Tone::Neutral),
            trailing,
            target,
        }
    }
}

/// A titled list region of the screen
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: &'static str,
    pub title: &'static str,
    pub placeholder: &'static str,
    pub state: Panel<Vec<RowView>>,
}

impl Container {
    pub fn loading(id: &'static str, title: &'static str, placeholder: &'static str) -> Self {
        Self {
            id,
            title,
            placeholder,
            state: Panel::Loading,
        }
    }

    /// Show rows, or the container's placeholder when there are none
    pub fn fill(&mut self, rows: Vec<RowView>) {
        self.state = if rows.is_empty() {
            Panel::Empty(self.placeholder)
        } else {
            Panel::Ready(rows)
        };
    }

    pub fn fill_records(&mut self, records: &[SummaryRecord], kind: RecordKind) {
        self.fill(records.iter().map(|r| RowView::from_record(r, kind)).collect());
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = Panel::Failed(message.into());
    }

    pub fn rows(&self) -> &[RowView] {
        match &self.state {
            Panel::Ready(rows) => rows,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

/// Widgets that only exist on the dashboard tab
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardWidgets {
    pub kpis: Vec<KpiCard>,
    /// (date label, job count), oldest first
    pub daily_jobs: Panel<Vec<(String, u64)>>,
    pub status_mix: Panel<Vec<(String, u64)>>,
    /// (completed, total, percent)
    pub tasks: Panel<(u64, u64, u16)>,
}

/// Filter controls shown above a scoped tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBar {
    pub fields: Vec<(FilterField, String)>,
}

impl FilterBar {
    pub fn for_tab(tab: Tab, filters: &FilterState) -> Option<Self> {
        let fields = tabs::filter_fields(tab);
        if fields.is_empty() {
            return None;
        }
        Some(Self {
            fields: fields
                .iter()
                .map(|field| (*field, filters.get(*field).to_string()))
                .collect(),
        })
    }
}

/// Everything the ui needs to draw the active tab
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenView {
    pub tab: Tab,
    pub filter_bar: Option<FilterBar>,
    pub widgets: Option<DashboardWidgets>,
    pub containers: Vec<Container>,
}

impl ScreenView {
    /// Static layout of a tab: every container loading, filter controls
    /// showing `filters`
    pub fn shell(tab: Tab, filters: &FilterState) -> Self {
        match tab {
            Tab::Dashboard => Self {
                tab,
                filter_bar: None,
                widgets: Some(dashboard::widgets_shell()),
                containers: dashboard::containers_shell(),
            },
            _ => Self {
                tab,
                filter_bar: FilterBar::for_tab(tab, filters),
                widgets: None,
                containers: tabs::containers_shell(tab),
            },
        }
    }

    pub fn fill_dashboard(&mut self, snapshot: &DashboardSnapshot) {
        if self.tab != Tab::Dashboard {
            return;
        }
        dashboard::fill(self, snapshot);
    }

    pub fn fill_tab(&mut self, snapshot: &TabSnapshot) {
        if self.tab == Tab::Dashboard {
            return;
        }
        tabs::fill(self, snapshot);
    }

    /// Every panel switches to the failed state with a retry hint
    pub fn fail(&mut self) {
        for container in &mut self.containers {
            container.fail(FAILED_TEXT);
        }
        if let Some(widgets) = self.widgets.as_mut() {
            widgets.daily_jobs = Panel::Failed(FAILED_TEXT.to_string());
            widgets.status_mix = Panel::Failed(FAILED_TEXT.to_string());
            widgets.tasks = Panel::Failed(FAILED_TEXT.to_string());
        }
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.containers.iter().any(|c| c.state.is_loading())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_from_record() {
        let record = SummaryRecord {
            name: "JC-0001".to_string(),
            customer: Some("C-001".to_string()),
            vehicle: Some("V-001".to_string()),
            status: Some("In Progress".to_string()),
            ..SummaryRecord::default()
        };
        let row = RowView::from_record(&record, RecordKind::JobCard);
        assert_eq!(row.title, "JC-0001");
        assert_eq!(row.subtext, "C-001 V-001");
        assert_eq!(row.badge.as_deref(), Some("In Progress"));
        assert_eq!(row.tone, Tone::Warning);
        assert_eq!(row.target, Some(RecordRef::new(RecordKind::JobCard, "JC-0001")));
    }

    #[test]
    fn test_row_falls_back_to_date_and_doctype() {
        let record = SummaryRecord {
            name: "ACC-SINV-0004".to_string(),
            posting_date: Some("2025-02-01".to_string()),
            grand_total: Some(420.0),
            doctype: Some("Sales Invoice".to_string()),
            ..SummaryRecord::default()
        };
        let row = RowView::from_record(&record, RecordKind::Quotation);
        assert_eq!(row.subtext, "01-02-2025");
        assert_eq!(row.trailing.as_deref(), Some("420.00"));
        assert_eq!(row.target.map(|t| t.kind), Some(RecordKind::SalesInvoice));
    }

    #[test]
    fn test_unnamed_record_has_no_target() {
        let row = RowView::from_record(&SummaryRecord::default(), RecordKind::JobCard);
        assert_eq!(row.title, "-");
        assert!(row.target.is_none());
    }

    #[test]
    fn test_container_fill_empty_shows_placeholder() {
        let mut container = Container::loading("x", "X", "Nothing here");
        assert_eq!(container.state.placeholder(), Some(LOADING_TEXT));
        container.fill(Vec::new());
        assert_eq!(container.state, Panel::Empty("Nothing here"));
        assert_eq!(container.state.placeholder(), Some("Nothing here"));
    }

    #[test]
    fn test_shell_is_loading() {
        for tab in Tab::ALL {
            let screen = ScreenView::shell(tab, &FilterState::default());
            assert!(screen.is_loading(), "{tab} shell should be loading");
            assert_eq!(screen.widgets.is_some(), tab == Tab::Dashboard);
        }
    }

    #[test]
    fn test_fail_marks_every_panel() {
        let mut screen = ScreenView::shell(Tab::Dashboard, &FilterState::default());
        screen.fail();
        assert!(screen.containers.iter().all(|c| c.state.is_failed()));
        let widgets = screen.widgets.as_ref().unwrap();
        assert!(widgets.daily_jobs.is_failed());
        assert!(widgets.tasks.is_failed());
    }
}
