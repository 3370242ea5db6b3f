//! Command parser for the : command system

use crate::domain::{ListView, RecordKind, RecordRef, Tab};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Navigation
    Tab(Tab),
    Open(RecordRef),
    New(RecordKind),
    List(ListView),

    // Filters on the active tab; an empty value clears the field
    Status(String),
    From(String),
    To(String),
    JobCard(String),
    Clear,

    // Dashboard-wide
    Company(Option<String>),
    Refresh,
    Help,
    Quit,

    /// Recognized command with bad arguments
    Invalid(String),
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.to_lowercase().as_str() {
        "tab" | "t" | "go" => match args.as_deref().map(str::parse::<Tab>) {
            Some(Ok(tab)) => Command::Tab(tab),
            Some(Err(err)) => Command::Invalid(err),
            None => Command::Invalid(
                "usage: tab <dashboard|jobs|appointments|inspections|sales>".into(),
            ),
        },
        "open" | "o" => parse_open(args.as_deref()),
        "new" | "n" => match args.as_deref().map(str::parse::<RecordKind>) {
            Some(Ok(kind @ (RecordKind::JobCard
            | RecordKind::ServiceAppointment
            | RecordKind::Vehicle
            | RecordKind::VehicleInspection))) => Command::New(kind),
            Some(Ok(kind)) => Command::Invalid(format!("cannot create {} here", kind.doctype())),
            Some(Err(err)) => Command::Invalid(err),
            None => Command::Invalid("usage: new <job|appointment|vehicle|inspection>".into()),
        },

        "list" | "ls" => match args.as_deref().map(str::parse::<ListView>) {
            Some(Ok(view)) => Command::List(view),
            Some(Err(err)) => Command::Invalid(err),
            None => Command::Invalid("usage: list <jobs|vehicles|reports|invoices>".into()),
        },

        "status" | "st" => Command::Status(args.unwrap_or_default()),
        "from" => Command::From(args.unwrap_or_default()),
        "to" => Command::To(args.unwrap_or_default()),
        "jobcard" | "jc" => match args.as_deref().map(str::to_lowercase).as_deref() {
            Some("yes" | "y") => Command::JobCard("yes".into()),
            Some("no" | "n") => Command::JobCard("no".into()),
            Some("any") | None => Command::JobCard(String::new()),
            Some(other) => Command::Invalid(format!("jobcard expects yes, no or any, got {other}")),
        },
        "clear" | "reset" => Command::Clear,

        "company" | "co" => Command::Company(args),
        "refresh" | "r" | "reload" => Command::Refresh,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,

        _ => Command::Unknown(input.to_string()),
    }
}

fn parse_open(args: Option<&str>) -> Command {
    let Some(args) = args else {
        return Command::Invalid("usage: open <kind> <name>".into());
    };
    let mut parts = args.splitn(2, ' ');
    let kind = parts.next().unwrap_or_default();
    let name = parts.next().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Command::Invalid("usage: open <kind> <name>".into());
    }
    match kind.parse::<RecordKind>() {
        Ok(kind) => Command::Open(RecordRef::new(kind, name)),
        Err(err) => Command::Invalid(err),
    }
}
