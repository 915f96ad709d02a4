use regex::Regex;
use std::sync::LazyLock;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\$?\s*(\d[\d,]*(?:\.\d+)?|\.\d+)\s*([KMB])?$").unwrap()
});
static CARD_AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\$?\s*(\d[\d,]*(?:\.\d+)?)\s*([KM])?$").unwrap());

pub fn parse_percent(raw: &str) -> Option<u8> {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|rate| *rate <= 100)
}

pub fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().replace(',', "").parse::<u32>().ok()
}

/// Full-page spend figure: `$16K`, `$2.5M`, `$1,200`, `$1B`. Rounded to
/// whole currency units.
pub fn parse_amount(raw: &str) -> Option<f64> {
    scaled_amount(&AMOUNT_RE, raw).map(f64::round)
}

/// Spend figure from a result card's spend element. Only K and M suffixes
/// appear there.
pub fn parse_card_amount(raw: &str) -> Option<f64> {
    scaled_amount(&CARD_AMOUNT_RE, raw)
}

fn scaled_amount(re: &Regex, raw: &str) -> Option<f64> {
    let caps = re.captures(raw.trim())?;
    let value = caps.get(1)?.as_str().replace(',', "").parse::<f64>().ok()?;
    let multiplier = match caps.get(2).map(|suffix| suffix.as_str().to_ascii_uppercase()) {
        Some(suffix) if suffix == "K" => 1_000.0,
        Some(suffix) if suffix == "M" => 1_000_000.0,
        Some(suffix) if suffix == "B" => 1_000_000_000.0,
        _ => 1.0,
    };
    let amount = value * multiplier;
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}
