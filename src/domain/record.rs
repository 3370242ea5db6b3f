//! Record references used for detail-view navigation

use std::fmt;
use std::str::FromStr;

/// Backend record types the dashboard links to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    JobCard,
    ServiceAppointment,
    VehicleInspection,
    Vehicle,
    Quotation,
    SalesInvoice,
}

impl RecordKind {
    pub fn doctype(&self) -> &'static str {
        match self {
            RecordKind::JobCard => "Job Card",
            RecordKind::ServiceAppointment => "Service Appointment",
            RecordKind::VehicleInspection => "Vehicle Inspection",
            RecordKind::Vehicle => "Vehicle",
            RecordKind::Quotation => "Quotation",
            RecordKind::SalesInvoice => "Sales Invoice",
        }
    }

    /// URL slug of the doctype, e.g. `job-card`
    pub fn slug(&self) -> String {
        self.doctype().to_lowercase().replace(' ', "-")
    }

    pub fn from_doctype(doctype: &str) -> Option<Self> {
        let wanted = doctype.trim();
        [
            RecordKind::JobCard,
            RecordKind::ServiceAppointment,
            RecordKind::VehicleInspection,
            RecordKind::Vehicle,
            RecordKind::Quotation,
            RecordKind::SalesInvoice,
        ]
        .into_iter()
        .find(|kind| kind.doctype().eq_ignore_ascii_case(wanted))
    }

    /// Desk route for a new record of this kind
    pub fn new_route(&self) -> String {
        format!("/app/{}/new", self.slug())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "job" | "jobcard" | "job-card" => Ok(RecordKind::JobCard),
            "appointment" | "appt" => Ok(RecordKind::ServiceAppointment),
            "inspection" => Ok(RecordKind::VehicleInspection),
            "vehicle" => Ok(RecordKind::Vehicle),
            "quotation" | "quote" => Ok(RecordKind::Quotation),
            "invoice" => Ok(RecordKind::SalesInvoice),
            other => RecordKind::from_doctype(other)
                .ok_or_else(|| format!("unknown record kind: {other}")),
        }
    }
}

/// Key of a record detail view: (kind, name)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordRef {
    pub kind: RecordKind,
    pub name: String,
}

impl RecordRef {
    pub fn new(kind: RecordKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Desk route of the record form; the name is percent-encoded
    pub fn route(&self) -> String {
        format!("/app/{}/{}", self.kind.slug(), urlencoding::encode(&self.name))
    }
}

/// Desk list views reachable from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListView {
    Jobs,
    Vehicles,
    /// Reports whose reference doctype is Job Card
    Reports,
    /// Sales invoices linked to a job card
    Invoices,
}

impl ListView {
    pub fn title(&self) -> &'static str {
        match self {
            ListView::Jobs => "All Jobs",
            ListView::Vehicles => "Vehicles",
            ListView::Reports => "Job Card Reports",
            ListView::Invoices => "Job Card Invoices",
        }
    }

    /// Desk list route, with the list filter as query options
    pub fn route(&self) -> String {
        match self {
            ListView::Jobs => format!("/app/{}", RecordKind::JobCard.slug()),
            ListView::Vehicles => format!("/app/{}", RecordKind::Vehicle.slug()),
            ListView::Reports => format!(
                "/app/report?ref_doctype={}",
                urlencoding::encode(RecordKind::JobCard.doctype())
            ),
            ListView::Invoices => format!(
                "/app/{}?custom_job_card={}",
                RecordKind::SalesInvoice.slug(),
                urlencoding::encode(r#"["is","set"]"#)
            ),
        }
    }
}

impl FromStr for ListView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jobs" | "job" => Ok(ListView::Jobs),
            "vehicles" | "vehicle" => Ok(ListView::Vehicles),
            "reports" | "report" => Ok(ListView::Reports),
            "invoices" | "invoice" => Ok(ListView::Invoices),
            other => Err(format!("unknown list: {other}")),
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.doctype(), self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route() {
        let record = RecordRef::new(RecordKind::JobCard, "JC-0001");
        assert_eq!(record.route(), "/app/job-card/JC-0001");
        assert_eq!(RecordKind::ServiceAppointment.new_route(), "/app/service-appointment/new");
    }

    #[test]
    fn test_route_encodes_name() {
        let record = RecordRef::new(RecordKind::Vehicle, "KA 01/AB 1234");
        assert_eq!(record.route(), "/app/vehicle/KA%2001%2FAB%201234");
    }

    #[test]
    fn test_list_routes() {
        assert_eq!(ListView::Jobs.route(), "/app/job-card");
        assert_eq!(ListView::Vehicles.route(), "/app/vehicle");
        assert_eq!(ListView::Reports.route(), "/app/report?ref_doctype=Job%20Card");
        assert_eq!(
            ListView::Invoices.route(),
            "/app/sales-invoice?custom_job_card=%5B%22is%22%2C%22set%22%5D"
        );
        assert_eq!("invoices".parse::<ListView>(), Ok(ListView::Invoices));
        assert!("garages".parse::<ListView>().is_err());
    }

    #[test]
    fn test_from_doctype() {
        assert_eq!(RecordKind::from_doctype("sales invoice"), Some(RecordKind::SalesInvoice));
        assert_eq!(RecordKind::from_doctype("Timesheet"), None);
        assert_eq!("job".parse::<RecordKind>(), Ok(RecordKind::JobCard));
    }
}
