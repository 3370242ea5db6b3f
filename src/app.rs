use std::time::{Duration, Instant};

use tracing::info;

use crate::controller::{DashboardController, Delivery, RefreshSource};
use crate::core::{parse_command, Action, Command, NavigateTarget, NotifyLevel};
use crate::domain::{FilterField, Tab};
use crate::infrastructure::RuntimeEvent;
use crate::view::{tabs, RowView};

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

impl From<NotifyLevel> for StatusLevel {
    fn from(level: NotifyLevel) -> Self {
        match level {
            NotifyLevel::Info => StatusLevel::Info,
            NotifyLevel::Warn => StatusLevel::Warn,
            NotifyLevel::Error => StatusLevel::Error,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

pub struct App {
    pub controller: DashboardController,
    /// Backend shown in the header
    pub backend: String,
    /// Base URL record routes are joined to
    pub desk_url: Option<String>,
    pub input_mode: InputMode,
    pub command: CommandBar,
    pub status: Option<StatusMessage>,
    /// Index into the active screen's containers
    pub focused_container: usize,
    pub selected_row: usize,
    /// Route of the last opened record or form
    pub last_navigation: Option<String>,
    pub help_open: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: DashboardController, backend: impl Into<String>) -> Self {
        Self {
            controller,
            backend: backend.into(),
            desk_url: None,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            status: None,
            focused_container: 0,
            selected_row: 0,
            last_navigation: None,
            help_open: false,
            should_quit: false,
        }
    }

    pub fn with_desk_url(mut self, url: Option<String>) -> Self {
        self.desk_url = url.map(|u| u.trim_end_matches('/').to_string());
        self
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.level != StatusLevel::Error && status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.controller.active_tab()
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.controller.select_tab(tab);
        self.focused_container = 0;
        self.selected_row = 0;
    }

    pub fn cycle_tab(&mut self, forward: bool) {
        let current = self.active_tab();
        self.select_tab(if forward { current.next() } else { current.prev() });
    }

    pub fn refresh(&mut self) {
        self.controller.refresh(RefreshSource::Manual);
        self.set_status(format!("Refreshing {}…", self.active_tab().title()), StatusLevel::Info);
    }

    pub fn clear_filters(&mut self) {
        let tab = self.active_tab();
        if tab == Tab::Dashboard {
            self.set_status("Dashboard has no filters", StatusLevel::Warn);
            return;
        }
        self.controller.clear_filters(tab);
        self.set_status(format!("{} filters cleared", tab.title()), StatusLevel::Info);
    }

    /// Step the active tab's status filter through its options
    pub fn cycle_status_filter(&mut self) {
        let tab = self.active_tab();
        let next = tabs::next_status(tab, &self.controller.filters(tab).status);
        self.set_filter(FilterField::Status, next);
    }

    /// yes -> no -> any on the inspections job card filter
    pub fn cycle_job_card_filter(&mut self) {
        let tab = self.active_tab();
        let next = match self.controller.filters(tab).has_job_card.as_str() {
            "" => "yes",
            "yes" => "no",
            _ => "",
        };
        self.set_filter(FilterField::HasJobCard, next.to_string());
    }

    pub fn set_filter(&mut self, field: FilterField, value: String) {
        let tab = self.active_tab();
        if !tabs::filter_fields(tab).contains(&field) {
            self.set_status(
                format!("{} has no {} filter", tab.title(), field.label()),
                StatusLevel::Warn,
            );
            return;
        }
        let mut filters = self.controller.filters(tab).clone();
        filters.set(field, value);
        let summary = filters.summary();
        self.controller.apply_filters(tab, filters);
        self.selected_row = 0;
        if summary.is_empty() {
            self.set_status(format!("{}: no filters", tab.title()), StatusLevel::Info);
        } else {
            self.set_status(format!("{}: {summary}", tab.title()), StatusLevel::Info);
        }
    }

    pub fn focus_next_container(&mut self, forward: bool) {
        let count = self.controller.screen().containers.len();
        if count == 0 {
            return;
        }
        self.focused_container = if forward {
            (self.focused_container + 1) % count
        } else {
            (self.focused_container + count - 1) % count
        };
        self.selected_row = 0;
    }

    pub fn move_selection_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let len = self.focused_rows().len();
        if len > 0 && self.selected_row + 1 < len {
            self.selected_row += 1;
        }
    }

    pub fn focused_rows(&self) -> &[RowView] {
        self.controller
            .screen()
            .containers
            .get(self.focused_container)
            .map(|c| c.rows())
            .unwrap_or(&[])
    }

    pub fn selected_row(&self) -> Option<&RowView> {
        self.focused_rows().get(self.selected_row)
    }

    /// Keep focus and selection inside what is on screen
    pub fn clamp_selection(&mut self) {
        let count = self.controller.screen().containers.len();
        if self.focused_container >= count {
            self.focused_container = count.saturating_sub(1);
        }
        let len = self.focused_rows().len();
        if self.selected_row >= len {
            self.selected_row = len.saturating_sub(1);
        }
    }

    pub fn open_selected(&mut self) {
        let action = match self.selected_row().and_then(|row| row.target.clone()) {
            Some(record) => Action::Navigate(NavigateTarget::Record(record)),
            None => Action::Notify("Nothing to open".to_string(), NotifyLevel::Warn),
        };
        self.apply_action(action);
    }

    /// Feed one runtime event to the controller
    pub fn apply_runtime_event(&mut self, event: RuntimeEvent) {
        if let RuntimeEvent::Error { message } = &event {
            self.set_status(message.clone(), StatusLevel::Error);
            return;
        }
        let Some((ticket, outcome)) = event.into_response() else {
            return;
        };
        let failed = outcome.as_ref().err().cloned();
        if self.controller.apply_response(&ticket, outcome) == Delivery::Applied {
            if let Some(message) = failed {
                self.set_status(format!("Failed to load: {message}"), StatusLevel::Error);
            } else if matches!(self.status_text(), Some((_, StatusLevel::Error))) {
                self.status = None;
            }
            self.clamp_selection();
        }
    }

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        if input.is_empty() {
            self.exit_command();
            return;
        }
        let cmd = parse_command(&input);
        let action = self.execute_command(&cmd);
        self.apply_action(action);
        self.command.last = Some(input);
        self.exit_command();
    }

    /// Execute a parsed command
    pub fn execute_command(&mut self, cmd: &Command) -> Action {
        match cmd {
            Command::Tab(tab) => Action::Navigate(NavigateTarget::Tab(*tab)),
            Command::Open(record) => Action::Navigate(NavigateTarget::Record(record.clone())),
            Command::New(kind) => Action::Navigate(NavigateTarget::New(*kind)),
            Command::List(view) => Action::Navigate(NavigateTarget::List(*view)),

            Command::Status(value) => {
                self.set_filter(FilterField::Status, value.clone());
                Action::None
            }
            Command::From(value) => {
                self.set_filter(FilterField::DateFrom, value.clone());
                Action::None
            }
            Command::To(value) => {
                self.set_filter(FilterField::DateTo, value.clone());
                Action::None
            }
            Command::JobCard(value) => {
                self.set_filter(FilterField::HasJobCard, value.clone());
                Action::None
            }
            Command::Clear => {
                self.clear_filters();
                Action::None
            }

            Command::Company(company) => {
                self.controller.set_company(company.clone());
                let text = match self.controller.company() {
                    Some(company) => format!("Company: {company}"),
                    None => "Company filter cleared".to_string(),
                };
                Action::Notify(text, NotifyLevel::Info)
            }
            Command::Refresh => {
                self.refresh();
                Action::None
            }
            Command::Help => {
                self.help_open = true;
                Action::None
            }
            Command::Quit => Action::Quit,

            Command::Invalid(message) => Action::Notify(message.clone(), NotifyLevel::Warn),
            Command::Unknown(s) => {
                Action::Notify(format!("Unknown command: {}", s), NotifyLevel::Warn)
            }
        }
    }

    /// Apply an action returned by a command or key handler
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(NavigateTarget::Tab(tab)) => self.select_tab(tab),
            Action::Navigate(target) => {
                let Some(route) = target.route() else {
                    return;
                };
                let url = match &self.desk_url {
                    Some(base) => format!("{base}{route}"),
                    None => route.clone(),
                };
                let label = match &target {
                    NavigateTarget::Record(record) => record.to_string(),
                    NavigateTarget::New(kind) => format!("New {}", kind.doctype()),
                    NavigateTarget::List(view) => view.title().to_string(),
                    NavigateTarget::Tab(tab) => tab.title().to_string(),
                };
                info!(%url, "open record");
                self.set_status(format!("{label}: {url}"), StatusLevel::Info);
                self.last_navigation = Some(route);
            }
            Action::Notify(msg, level) => self.set_status(msg, level.into()),
            Action::Quit => self.should_quit = true,
        }
    }
}
