//! Date parsing and formatting for voucher fields

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Display format used on the voucher, e.g. `28 Sep 2025`
pub const DISPLAY_FORMAT: &str = "%d %b %Y";

const INPUT_FORMATS: [&str; 3] = ["%d %b %Y", "%Y-%m-%d", "%d %B %Y"];

/// Parse a date the way booking confirmations tend to write it
///
/// `Sept` and `September` are normalized to `Sep` (as whole words, any
/// case) before trying `%d %b %Y`, `%Y-%m-%d` and `%d %B %Y` in turn.
pub fn parse_smart_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = normalize_september(trimmed);
    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&normalized, format).ok())
}

static SEPTEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsept(ember)?\b").expect("valid september regex"));

/// Replace whole-word `sept` / `september` with `Sep`
fn normalize_september(text: &str) -> String {
    SEPTEMBER.replace_all(text, "Sep").into_owned()
}

pub fn format_display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Nights between two dates, never less than one
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(1)
}
