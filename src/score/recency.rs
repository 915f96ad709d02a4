use regex::Regex;
use std::sync::LazyLock;

pub const UNKNOWN_DAYS: u32 = 30;

static WEEKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s+week").unwrap());
static MONTHS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s+month").unwrap());
static DAYS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s+day").unwrap());

/// Converts a "last seen" phrase into elapsed days. Unknown or missing
/// phrases count as stale.
pub fn days_since(text: Option<&str>) -> u32 {
    let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
        return UNKNOWN_DAYS;
    };
    let text = text.to_lowercase();

    if text.contains("yesterday") {
        1
    } else if ["today", "hour", "minute", "online now"]
        .iter()
        .any(|keyword| text.contains(keyword))
    {
        0
    } else if text.contains("week") {
        leading_count(&WEEKS_RE, &text).map_or(14, |weeks| weeks.saturating_mul(7))
    } else if text.contains("month") {
        leading_count(&MONTHS_RE, &text).map_or(30, |months| months.saturating_mul(30))
    } else if text.contains("day") {
        leading_count(&DAYS_RE, &text).unwrap_or(3)
    } else {
        UNKNOWN_DAYS
    }
}

fn leading_count(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|count| count.as_str().parse::<u32>().ok())
}
