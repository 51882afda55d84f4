use std::sync::LazyLock;

use regex::Regex;

use super::types::Severity;
use super::vitals::{parse_vitals, sentence_temperature_celsius};

/// Explicit severity keywords, checked as substrings in table order.
/// Order matters: the table is scanned top to bottom and the first hit wins.
const SEVERITY_KEYWORDS: &[(&str, Severity)] = &[
    ("mild", Severity::Mild),
    ("slight", Severity::Mild),
    ("a little", Severity::Mild),
    ("bit", Severity::Mild),
    ("moderate", Severity::Moderate),
    ("worse", Severity::Moderate),
    ("getting worse", Severity::Moderate),
    ("severe", Severity::Severe),
    ("intense", Severity::Severe),
    ("extreme", Severity::Severe),
    ("unbearable", Severity::Severe),
    ("excruciating", Severity::Severe),
    ("unable to", Severity::Severe),
];

pub const RED_FLAG_PAIRS: &[(&str, &str)] = &[("chest pain", "shortness of breath")];

static PAIN_SCALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pain\s*(\d|10)\s*/\s*10").expect("invalid pain-scale regex"));

/// Case-insensitive check that two critical terms co-occur in raw text.
pub fn has_red_flag_pair(text: &str) -> bool {
    let t = text.to_lowercase();
    RED_FLAG_PAIRS.iter().any(|(a, b)| t.contains(a) && t.contains(b))
}

/// Decide sentence severity by the first matching rule, in strict priority
/// order: explicit keyword, numeric pain scale, temperature threshold,
/// red-flag symptom pair, heart rate, blood pressure. None if nothing fires.
pub fn pick_severity(sentence: &str) -> Option<Severity> {
    let lower = sentence.to_lowercase();

    for (keyword, level) in SEVERITY_KEYWORDS {
        if lower.contains(keyword) {
            return Some(*level);
        }
    }

    if let Some(c) = PAIN_SCALE_RE.captures(&lower) {
        let value: u8 = c[1].parse().ok()?;
        return Some(match value {
            0..=3 => Severity::Mild,
            4..=6 => Severity::Moderate,
            _ => Severity::Severe,
        });
    }

    if let Some(celsius) = sentence_temperature_celsius(sentence) {
        if celsius >= 39.0 {
            return Some(Severity::Severe);
        }
        if celsius >= 38.0 {
            return Some(Severity::Moderate);
        }
    }

    if has_red_flag_pair(&lower) {
        return Some(Severity::Severe);
    }

    let vitals = parse_vitals(sentence);
    if vitals.heart_rate.is_some_and(|hr| hr >= 120) {
        return Some(Severity::Moderate);
    }
    if let Some((sys, dia)) = vitals.blood_pressure_values() {
        if sys >= 180 || dia >= 120 {
            return Some(Severity::Severe);
        }
        if sys >= 160 || dia >= 100 {
            return Some(Severity::Moderate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_keyword_beats_everything() {
        // "mild" keyword wins even with a severe temperature present.
        assert_eq!(pick_severity("mild headache, temp 40C"), Some(Severity::Mild));
        assert_eq!(pick_severity("unbearable pain"), Some(Severity::Severe));
    }

    #[test]
    fn pain_scale_thresholds() {
        assert_eq!(pick_severity("pain 2/10"), Some(Severity::Mild));
        assert_eq!(pick_severity("pain 5/10"), Some(Severity::Moderate));
        assert_eq!(pick_severity("pain 9/10"), Some(Severity::Severe));
        assert_eq!(pick_severity("pain 10/10"), Some(Severity::Severe));
    }

    #[test]
    fn temperature_thresholds() {
        assert_eq!(pick_severity("temp 39C"), Some(Severity::Severe));
        assert_eq!(pick_severity("temp 38.2C"), Some(Severity::Moderate));
        assert_eq!(pick_severity("temp 37C"), None);
        // 102F is about 38.9C.
        assert_eq!(pick_severity("temperature 102F"), Some(Severity::Moderate));
    }

    #[test]
    fn red_flag_pair_is_severe() {
        assert_eq!(
            pick_severity("chest pain and shortness of breath"),
            Some(Severity::Severe)
        );
        assert_eq!(pick_severity("chest pain only"), None);
    }

    #[test]
    fn vitals_thresholds() {
        assert_eq!(pick_severity("HR 120"), Some(Severity::Moderate));
        assert_eq!(pick_severity("HR 90"), None);
        assert_eq!(pick_severity("BP 185/95"), Some(Severity::Severe));
        assert_eq!(pick_severity("BP 160/100"), Some(Severity::Moderate));
        assert_eq!(pick_severity("BP 130/80"), None);
    }

    #[test]
    fn no_signal_is_none() {
        assert_eq!(pick_severity("I have a cough"), None);
        assert_eq!(pick_severity(""), None);
    }
}
