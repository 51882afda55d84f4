use std::sync::LazyLock;

use regex::Regex;

use super::types::Vitals;

/// Vital-sign spotters. Each is applied independently against the raw
/// sentence text; the first match per category wins.
/// Temperature values may run to three digits (Fahrenheit readings).
static TEMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:temp(?:erature)?\s*[:=]?\s*)?(\d{2,3}(?:\.\d)?)(?:\s*°?\s*[cf])")
        .expect("invalid temperature regex")
});

static HR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:hr|heart\s*rate)\s*[:=]?\s*(\d{2,3})").expect("invalid heart-rate regex")
});

static BP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:bp|blood\s*pressure)\s*[:=]?\s*(\d{2,3})\s*/\s*(\d{2,3})")
        .expect("invalid blood-pressure regex")
});

static SPO2_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:spo2|o2\s*saturation|oxygen)\s*[:=]?\s*(\d{2,3})\s*%")
        .expect("invalid spo2 regex")
});

static GLU_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:glucose|bgl|blood\s*sugar)\s*[:=]?\s*(\d{2,3})")
        .expect("invalid glucose regex")
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2,3}(?:\.\d)?)").expect("invalid number regex"));

pub fn parse_vitals(sentence: &str) -> Vitals {
    let mut vitals = Vitals::default();

    if let Some(m) = TEMP_RE.find(sentence) {
        vitals.temperature = Some(m.as_str().to_string());
    }
    if let Some(c) = HR_RE.captures(sentence) {
        vitals.heart_rate = c[1].parse().ok();
    }
    if let Some(c) = BP_RE.captures(sentence) {
        vitals.blood_pressure = Some(format!("{}/{}", &c[1], &c[2]));
    }
    if let Some(c) = SPO2_RE.captures(sentence) {
        vitals.spo2 = c[1].parse().ok();
    }
    if let Some(c) = GLU_RE.captures(sentence) {
        vitals.glucose = c[1].parse().ok();
    }

    vitals
}

/// Parse a matched temperature span like "temp 39C" or "temperature 102F"
/// into degrees Celsius. Unit is Fahrenheit when an 'f' appears in the span.
pub fn temperature_celsius(temp_text: &str) -> Option<f64> {
    let value: f64 = NUMBER_RE.captures(temp_text)?[1].parse().ok()?;
    if temp_text.to_lowercase().contains('f') {
        Some((value - 32.0) * 5.0 / 9.0)
    } else {
        Some(value)
    }
}

/// First temperature reading in a raw sentence, in Celsius.
pub fn sentence_temperature_celsius(sentence: &str) -> Option<f64> {
    let m = TEMP_RE.find(sentence)?;
    temperature_celsius(m.as_str())
}
