//! ISO-8601 durations (`PT1H30M`) rendered as human-readable text.

use std::sync::LazyLock;

use regex::Regex;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

/// `PnYnMnWnDTnHnMnS`, every component optional, decimals allowed.
static ISO_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^P",
        r"(?:(\d+(?:[.,]\d+)?)Y)?",
        r"(?:(\d+(?:[.,]\d+)?)M)?",
        r"(?:(\d+(?:[.,]\d+)?)W)?",
        r"(?:(\d+(?:[.,]\d+)?)D)?",
        r"(?:T",
        r"(?:(\d+(?:[.,]\d+)?)H)?",
        r"(?:(\d+(?:[.,]\d+)?)M)?",
        r"(?:(\d+(?:[.,]\d+)?)S)?",
        r")?$",
    ))
    .expect("Invalid ISO duration regex")
});

/// A parsed duration. Years and months have no fixed length, so they stay
/// separate; everything from weeks down is folded into `seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IsoDuration {
    pub years: u64,
    pub months: u64,
    pub seconds: u64,
}

impl IsoDuration {
    /// Render as e.g. "1 hour 30 minutes". Zero components are skipped and
    /// an all-zero duration has no text.
    pub fn to_text(&self) -> Option<String> {
        let days = self.seconds / DAY;
        let hours = (self.seconds % DAY) / HOUR;
        let minutes = (self.seconds % HOUR) / MINUTE;
        let seconds = self.seconds % MINUTE;

        let parts: Vec<String> = [
            (self.years, "year"),
            (self.months, "month"),
            (days, "day"),
            (hours, "hour"),
            (minutes, "minute"),
            (seconds, "second"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| pluralize(n, unit))
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

fn pluralize(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Parse an ISO-8601 duration. Returns None when the string is not a
/// duration or carries no numeric component at all (`"P"`, `"PT"`).
pub fn parse_iso_duration(input: &str) -> Option<IsoDuration> {
    let caps = ISO_DURATION_REGEX.captures(input.trim())?;

    // Group 0 is the whole match; at least one component must be present.
    if caps.iter().skip(1).all(|m| m.is_none()) {
        return None;
    }

    let component = |idx: usize| -> Option<f64> {
        caps.get(idx)
            .map(|m| m.as_str().replace(',', "."))
            .and_then(|s| s.parse::<f64>().ok())
    };

    let years = component(1).unwrap_or(0.0).round() as u64;
    let months = component(2).unwrap_or(0.0).round() as u64;

    let seconds = component(3).unwrap_or(0.0) * WEEK as f64
        + component(4).unwrap_or(0.0) * DAY as f64
        + component(5).unwrap_or(0.0) * HOUR as f64
        + component(6).unwrap_or(0.0) * MINUTE as f64
        + component(7).unwrap_or(0.0);

    Some(IsoDuration {
        years,
        months,
        seconds: seconds.round() as u64,
    })
}

/// Convert an ISO-8601 duration straight to display text.
pub fn duration_to_text(input: &str) -> Option<String> {
    parse_iso_duration(input)?.to_text()
}
