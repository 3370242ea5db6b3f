//! Per-tab filter state

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Editable filter fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Status,
    DateFrom,
    DateTo,
    HasJobCard,
}

impl FilterField {
    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Status => "Status",
            FilterField::DateFrom => "From",
            FilterField::DateTo => "To",
            FilterField::HasJobCard => "Job Card",
        }
    }
}

/// Filter values for one tab. An empty string means unfiltered.
///
/// Dates are forwarded as-is; the backend owns range validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub status: String,
    pub date_from: String,
    pub date_to: String,
    pub has_job_card: String,
}

impl FilterState {
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_dates(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.date_from = from.into();
        self.date_to = to.into();
        self
    }

    pub fn with_job_card(mut self, has_job_card: impl Into<String>) -> Self {
        self.has_job_card = has_job_card.into();
        self
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Status => &self.status,
            FilterField::DateFrom => &self.date_from,
            FilterField::DateTo => &self.date_to,
            FilterField::HasJobCard => &self.has_job_card,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into().trim().to_string();
        match field {
            FilterField::Status => self.status = value,
            FilterField::DateFrom => self.date_from = value,
            FilterField::DateTo => self.date_to = value,
            FilterField::HasJobCard => self.has_job_card = normalize_job_card(&value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
            && self.date_from.is_empty()
            && self.date_to.is_empty()
            && self.has_job_card.is_empty()
    }

    /// Short description for status lines, e.g. `status=In Progress from=2025-01-01`
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.status.is_empty() {
            parts.push(format!("status={}", self.status));
        }
        if !self.date_from.is_empty() {
            parts.push(format!("from={}", self.date_from));
        }
        if !self.date_to.is_empty() {
            parts.push(format!("to={}", self.date_to));
        }
        if !self.has_job_card.is_empty() {
            parts.push(format!("jobcard={}", self.has_job_card));
        }
        parts.join(" ")
    }
}

fn normalize_job_card(value: &str) -> String {
    match value.to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => "yes".to_string(),
        "no" | "n" | "false" | "0" => "no".to_string(),
        _ => String::new(),
    }
}

/// Whether a tab's filters survive switching away from it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPolicy {
    /// Keep filters across tab switches; clear only on explicit request
    #[default]
    Persist,
    /// Clear a tab's filters every time it is selected
    ResetOnSwitch,
}

impl FromStr for FilterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "persist" => Ok(FilterPolicy::Persist),
            "reset_on_switch" | "reset" => Ok(FilterPolicy::ResetOnSwitch),
            other => Err(format!("unknown filter policy: {other}")),
        }
    }
}
