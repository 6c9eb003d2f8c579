use chrono::{Datelike as _, NaiveDate};

/// Date layout used by QuickBooks and by the conversion date the user enters.
pub const IIF_DATE_FORMAT: &str = "%m/%d/%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `MM/DD/YYYY` date. Two-digit years are rejected since chrono would read `25` as
/// the year 25.
pub fn parse_us_date(content: &str) -> Result<NaiveDate, &'static str> {
    let date = NaiveDate::parse_from_str(content.trim(), IIF_DATE_FORMAT)
        .map_err(|_| "Expected a date like MM/DD/YYYY")?;
    if date.year() < 1000 {
        return Err("Expected a four-digit year");
    }
    Ok(date)
}

/// Parse a date cell of the general ledger. Exports come either as `MM/DD/YYYY` or as ISO dates.
pub fn parse_ledger_date(content: &str) -> Result<NaiveDate, &'static str> {
    let content = content.trim();
    if content.is_empty() {
        return Err("Empty date");
    }
    parse_us_date(content)
        .or_else(|_| NaiveDate::parse_from_str(content, ISO_DATE_FORMAT))
        .map_err(|_| "Expected a date like MM/DD/YYYY or YYYY-MM-DD")
}

pub fn format_iif_date(date: NaiveDate) -> String {
    date.format(IIF_DATE_FORMAT).to_string()
}

/// "September 2025"
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
