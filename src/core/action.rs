//! Actions that commands and key handlers return to the app

use crate::domain::{ListView, RecordKind, RecordRef, Tab};

/// Actions returned by commands to communicate state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Navigate to a tab or a record form
    Navigate(NavigateTarget),

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Request quit
    Quit,
}

/// Navigation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateTarget {
    Tab(Tab),
    /// Detail form of an existing record
    Record(RecordRef),
    /// Blank form for a new record
    New(RecordKind),
    /// Desk list view
    List(ListView),
}

impl NavigateTarget {
    /// Desk route for record targets
    pub fn route(&self) -> Option<String> {
        match self {
            NavigateTarget::Tab(_) => None,
            NavigateTarget::Record(record) => Some(record.route()),
            NavigateTarget::New(kind) => Some(kind.new_route()),
            NavigateTarget::List(view) => Some(view.route()),
        }
    }
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
