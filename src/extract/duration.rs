use std::sync::LazyLock;

use regex::Regex;

use super::types::DurationMention;

/// Duration-like spans: "for 3 days" / "since yesterday", bare "<n> <unit>",
/// and compact "<n><d|w|m|y>". Every non-overlapping match is kept.
static DUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:(?:for|since)\s+(?:\d+\s+(?:minute|hour|day|week|month|year)s?|yesterday|today|last\s+night))|(?:\b\d+\s*(?:minutes?|hours?|days?|weeks?|months?|years?)\b)|(?:\b\d+\s*[dwmy]\b)",
    )
    .expect("invalid duration regex")
});

static UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(minutes?|hours?|days?|weeks?|months?|years?|[dwmy])\b")
        .expect("invalid duration-unit regex")
});

fn unit_days(unit: &str) -> Option<f64> {
    let days = match unit.trim_end_matches('s') {
        "minute" => 1.0 / 1440.0,
        "hour" => 1.0 / 24.0,
        "day" | "d" => 1.0,
        "week" | "w" => 7.0,
        "month" | "m" => 30.0,
        "year" | "y" => 365.0,
        _ => return None,
    };
    Some(days)
}

/// Normalize one matched span to a day count; None when the unit cannot be
/// resolved (e.g. "since last night").
pub fn normalize_duration(span: &str) -> DurationMention {
    let lower = span.to_lowercase();
    let days = if let Some(c) = UNIT_RE.captures(&lower) {
        let n: f64 = c[1].parse().ok().unwrap_or(0.0);
        unit_days(&c[2]).map(|per| n * per)
    } else if lower.contains("since yesterday") {
        Some(1.0)
    } else if lower.contains("since today") {
        Some(0.0)
    } else {
        None
    };
    DurationMention {
        text: span.to_string(),
        days,
    }
}

/// All duration spans in the sentence, each independently normalized.
pub fn find_durations(sentence: &str) -> Vec<DurationMention> {
    DUR_RE
        .find_iter(sentence)
        .map(|m| normalize_duration(m.as_str()))
        .collect()
}
