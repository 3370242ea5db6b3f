//! Dashboard controller
//!
//! Owns which tab is active, the filters of every tab, the auto-refresh
//! timer and the current `ScreenView`. It performs no IO: fetches are queued
//! as `FetchRequest`s for the runtime to execute, and results come back
//! through `apply_response` tagged with the ticket they were issued under.
//! A result is rendered only if its ticket is the latest one issued and
//! still describes the visible tab, its filters and the company.

mod timer;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::domain::{DashboardSnapshot, FilterPolicy, FilterState, Tab, TabSnapshot};
use crate::view::{tabs, FilterBar, ScreenView};

pub use timer::{RefreshTimer, DEFAULT_REFRESH_INTERVAL};

/// What triggered a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSource {
    Initial,
    Manual,
    FilterChange,
    /// Auto-refresh; never shows the progress indicator
    Timer,
}

impl RefreshSource {
    pub fn is_silent(&self) -> bool {
        matches!(self, RefreshSource::Timer)
    }
}

/// Staleness token attached to every fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub tab: Tab,
    pub filters: FilterState,
    pub company: Option<String>,
}

/// Backend query a fetch performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchQuery {
    /// `get_dashboard_data`
    Dashboard { company: Option<String> },
    /// `get_sidebar_data` for one scoped tab
    Tab {
        tab: Tab,
        filters: FilterState,
        company: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: RequestTicket,
    pub source: RefreshSource,
    pub query: FetchQuery,
}

#[derive(Debug, Clone)]
pub enum Payload {
    Dashboard(DashboardSnapshot),
    Tab(TabSnapshot),
}

/// Result of a fetch; the error is a display message
pub type FetchOutcome = Result<Payload, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Response rendered into the screen
    Applied,
    /// Response discarded: superseded, mismatched or controller disposed
    Stale,
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub policy: FilterPolicy,
    pub company: Option<String>,
    pub refresh_interval: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            policy: FilterPolicy::default(),
            company: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

pub struct DashboardController {
    active: Tab,
    filters: BTreeMap<Tab, FilterState>,
    company: Option<String>,
    policy: FilterPolicy,
    seq: u64,
    latest: Option<RequestTicket>,
    timer: RefreshTimer,
    screen: ScreenView,
    tab_counts: BTreeMap<Tab, u64>,
    busy: bool,
    last_error: Option<String>,
    disposed: bool,
    outbox: Vec<FetchRequest>,
}

impl DashboardController {
    pub fn new(settings: ControllerSettings) -> Self {
        let filters = Tab::ALL
            .into_iter()
            .map(|tab| (tab, FilterState::default()))
            .collect();
        Self {
            active: Tab::Dashboard,
            filters,
            company: normalize_company(settings.company),
            policy: settings.policy,
            seq: 0,
            latest: None,
            timer: RefreshTimer::new(settings.refresh_interval),
            screen: ScreenView::shell(Tab::Dashboard, &FilterState::default()),
            tab_counts: BTreeMap::new(),
            busy: false,
            last_error: None,
            disposed: false,
            outbox: Vec::new(),
        }
    }

    /// Render the dashboard shell, issue the initial fetch and arm the timer
    pub fn mount(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.active = Tab::Dashboard;
        self.screen = ScreenView::shell(Tab::Dashboard, self.filters(Tab::Dashboard));
        self.refresh(RefreshSource::Initial);
        self.timer.arm(now);
        info!(period_secs = self.timer.period().as_secs(), "dashboard mounted");
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.disposed {
            return;
        }
        if self.policy == FilterPolicy::ResetOnSwitch {
            self.filters.insert(tab, FilterState::default());
        }
        self.active = tab;
        self.screen = ScreenView::shell(tab, self.filters(tab));
        self.issue(RefreshSource::Manual);
    }

    /// Store filters for `tab`; only the active tab is re-fetched
    pub fn apply_filters(&mut self, tab: Tab, filters: FilterState) {
        if self.disposed {
            return;
        }
        self.filters.insert(tab, filters);
        if tab == self.active {
            self.screen.filter_bar = FilterBar::for_tab(tab, self.filters(tab));
            self.issue(RefreshSource::FilterChange);
        }
    }

    pub fn clear_filters(&mut self, tab: Tab) {
        self.apply_filters(tab, FilterState::default());
    }

    /// Re-fetch the active tab with its current filters
    pub fn refresh(&mut self, source: RefreshSource) {
        if self.disposed {
            return;
        }
        self.issue(source);
    }

    pub fn tick(&mut self) {
        self.refresh(RefreshSource::Timer);
    }

    /// Fire the auto-refresh if its period has elapsed. Returns whether it fired.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        if self.disposed || !self.timer.poll(now) {
            return false;
        }
        debug!(tab = %self.active, "auto refresh");
        self.tick();
        true
    }

    pub fn set_company(&mut self, company: Option<String>) {
        if self.disposed {
            return;
        }
        self.company = normalize_company(company);
        info!(company = ?self.company, "company changed");
        self.issue(RefreshSource::FilterChange);
    }

    pub fn apply_response(&mut self, ticket: &RequestTicket, outcome: FetchOutcome) -> Delivery {
        if !self.is_current(ticket) {
            debug!(seq = ticket.seq, tab = %ticket.tab, "dropping stale response");
            return Delivery::Stale;
        }

        match outcome {
            Ok(Payload::Dashboard(snapshot)) if ticket.tab == Tab::Dashboard => {
                self.screen.fill_dashboard(&snapshot);
                self.last_error = None;
            }
            Ok(Payload::Tab(snapshot)) if ticket.tab != Tab::Dashboard => {
                self.tab_counts
                    .insert(ticket.tab, tabs::badge_count(ticket.tab, &snapshot));
                self.screen.fill_tab(&snapshot);
                self.last_error = None;
            }
            Ok(_) => {
                warn!(seq = ticket.seq, tab = %ticket.tab, "payload does not match its tab");
                self.screen.fail();
                self.last_error =
                    Some(format!("unexpected payload for {}", ticket.tab.title()));
                self.busy = false;
                return Delivery::Stale;
            }
            Err(message) => {
                warn!(seq = ticket.seq, tab = %ticket.tab, error = %message, "fetch failed");
                self.screen.fail();
                self.last_error = Some(message);
            }
        }
        self.busy = false;
        Delivery::Applied
    }

    /// Stop the timer and ignore everything that arrives afterwards
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.timer.disarm();
        self.outbox.clear();
        self.latest = None;
        self.busy = false;
        info!("dashboard disposed");
    }

    pub fn take_fetch_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.outbox)
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    pub fn filters(&self, tab: Tab) -> &FilterState {
        static EMPTY: FilterState = FilterState {
            status: String::new(),
            date_from: String::new(),
            date_to: String::new(),
            has_job_card: String::new(),
        };
        self.filters.get(&tab).unwrap_or(&EMPTY)
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    pub fn screen(&self) -> &ScreenView {
        &self.screen
    }

    /// Badge count of a scoped tab, once it has been loaded
    pub fn tab_count(&self, tab: Tab) -> Option<u64> {
        self.tab_counts.get(&tab).copied()
    }

    pub fn tab_counts(&self) -> &BTreeMap<Tab, u64> {
        &self.tab_counts
    }

    /// Whether the progress indicator is showing
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn timer(&self) -> &RefreshTimer {
        &self.timer
    }

    fn issue(&mut self, source: RefreshSource) {
        self.seq += 1;
        let tab = self.active;
        let filters = if tab == Tab::Dashboard {
            FilterState::default()
        } else {
            self.filters(tab).clone()
        };
        let ticket = RequestTicket {
            seq: self.seq,
            tab,
            filters: filters.clone(),
            company: self.company.clone(),
        };
        let query = match tab {
            Tab::Dashboard => FetchQuery::Dashboard {
                company: self.company.clone(),
            },
            _ => FetchQuery::Tab {
                tab,
                filters,
                company: self.company.clone(),
            },
        };
        if !source.is_silent() {
            self.busy = true;
        }
        debug!(seq = ticket.seq, %tab, ?source, "issuing fetch");
        self.latest = Some(ticket.clone());
        self.outbox.push(FetchRequest {
            ticket,
            source,
            query,
        });
    }

    fn is_current(&self, ticket: &RequestTicket) -> bool {
        if self.disposed || self.latest.as_ref() != Some(ticket) {
            return false;
        }
        let filters_match =
            ticket.tab == Tab::Dashboard || self.filters(ticket.tab) == &ticket.filters;
        ticket.tab == self.active && filters_match && ticket.company == self.company
    }
}

fn normalize_company(company: Option<String>) -> Option<String> {
    company
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
