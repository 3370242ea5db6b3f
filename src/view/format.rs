//! Display formatting for counts, money, dates and statuses

use chrono::{NaiveDate, NaiveDateTime};

use super::Tone;

/// `1234567` -> `1,234,567`
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Two decimals with thousands separators: `1234.5` -> `1,234.50`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = group_thousands(&(cents / 100).to_string());
    let out = format!("{}.{:02}", whole, cents % 100);
    if negative && cents > 0 {
        format!("-{out}")
    } else {
        out
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Backend dates (`2025-01-31`) -> `31-01-2025`; anything else is passed through
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => date.format("%d-%m-%Y").to_string(),
        Err(_) => format_datetime(trimmed),
    }
}

/// Backend datetimes (`2025-01-31 09:30:00.000000`) -> `31-01-2025 09:30`
pub fn format_datetime(raw: &str) -> String {
    let trimmed = raw.trim();
    const PATTERNS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for pattern in PATTERNS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return dt.format("%d-%m-%Y %H:%M").to_string();
        }
    }
    trimmed.to_string()
}

/// Badge colour for job card, appointment and invoice statuses
pub fn status_tone(status: &str) -> Tone {
    match status.trim().to_lowercase().as_str() {
        "draft" | "scheduled" => Tone::Neutral,
        "checked in" | "checked-in" | "inspected" | "estimated" => Tone::Info,
        "approved" | "completed" | "paid" | "invoiced" => Tone::Success,
        "in progress" | "pending" | "unpaid" => Tone::Warning,
        "ready to invoice" | "overdue" => Tone::Accent,
        "cancelled" | "no show" | "no-show" | "rejected" => Tone::Danger,
        _ => Tone::Neutral,
    }
}

pub fn truncate_str(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    value.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
}
