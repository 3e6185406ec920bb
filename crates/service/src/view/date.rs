use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use tracing::warn;

const DEFAULT_FORMAT: &str = "%b %-d, %Y";

/// Renders dates with a `chrono` format string.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    format: String,
}

impl DateFormatter {
    /// Formats that do not parse, or that need time or offset fields a date
    /// cannot supply, fall back to the default.
    pub fn new(format: &str) -> Self {
        if !renders_dates(format) {
            warn!(format, "invalid date format, using default");
            return Self { format: DEFAULT_FORMAT.to_string() };
        }
        Self { format: format.to_string() }
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(&self.format).to_string()
    }
}

fn renders_dates(format: &str) -> bool {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    let sample = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
    let mut out = String::new();
    write!(out, "{}", sample.format_with_items(StrftimeItems::new(format))).is_ok()
}

impl Default for DateFormatter {
    fn default() -> Self { Self::new(DEFAULT_FORMAT) }
}
