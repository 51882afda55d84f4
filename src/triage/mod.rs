use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::extract::severity::has_red_flag_pair;
use crate::extract::types::{RawExtraction, Severity, Vitals};
use crate::extract::vitals::temperature_celsius;

/// A temperature at or above this (Celsius) is folded into a "fever" symptom.
pub const FEVER_THRESHOLD_C: f64 = 38.0;

/// How long a complaint must have lasted before duration alone raises triage.
pub const DURATION_MODERATE_DAYS: f64 = 3.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TriageLevel {
    Mild,
    Moderate,
    Severe,
}

/// Vital-sign threshold crossings noted while combining. Used for triage,
/// not part of the serialized summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VitalsFlag {
    Tachycardia,
    HypertensiveCrisis,
    MarkedHypertension,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymptomReport {
    pub name: String,
    /// Sentence-wide shared duration; the same value is attached to every
    /// symptom in the sentence.
    pub duration_days: Option<f64>,
}

/// Minimal clinical summary for one sentence. The `symptoms` key is present
/// only when at least one positive symptom exists, and `vitals` never carries
/// a raw temperature (fever handling replaces it).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriageSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<SymptomReport>>,
    pub vitals: Vitals,
    #[serde(skip)]
    pub vitals_flags: Vec<VitalsFlag>,
    pub triage_level: TriageLevel,
}

/// Post-process a raw extraction into the minimal triage summary.
/// Pure and deterministic.
pub fn combine(raw: &RawExtraction) -> TriageSummary {
    // Shared duration: conservative maximum over all resolved day counts.
    let duration_days = raw
        .duration
        .iter()
        .filter_map(|d| d.days)
        .fold(None, |acc: Option<f64>, d| {
            Some(acc.map_or(d, |a: f64| a.max(d)))
        });

    let mut positive: BTreeSet<String> = raw.symptoms.difference(&raw.negated).cloned().collect();

    // The raw temperature never survives into the output vitals; a febrile
    // reading becomes a symptom instead.
    let mut vitals = raw.vitals.clone();
    let temp_text = vitals.temperature.take();
    if let Some(text) = temp_text {
        if temperature_celsius(&text).is_some_and(|c| c >= FEVER_THRESHOLD_C) {
            positive.insert("fever".to_string());
        }
    }

    let red_flag = has_red_flag_pair(&raw.text);

    let mut vitals_flags = Vec::new();
    if vitals.heart_rate.is_some_and(|hr| hr >= 120) {
        vitals_flags.push(VitalsFlag::Tachycardia);
    }
    if let Some((sys, dia)) = vitals.blood_pressure_values() {
        if sys >= 180 || dia >= 120 {
            vitals_flags.push(VitalsFlag::HypertensiveCrisis);
        } else if sys >= 160 || dia >= 100 {
            vitals_flags.push(VitalsFlag::MarkedHypertension);
        }
    }

    let mut triage_level = if red_flag || vitals_flags.contains(&VitalsFlag::HypertensiveCrisis) {
        TriageLevel::Severe
    } else if vitals_flags.contains(&VitalsFlag::MarkedHypertension)
        || duration_days.is_some_and(|d| d >= DURATION_MODERATE_DAYS)
        || positive.contains("fever")
    {
        TriageLevel::Moderate
    } else {
        TriageLevel::Mild
    };

    // Explicit extracted severity can upgrade, never downgrade.
    match raw.severity {
        Some(Severity::Severe) => triage_level = TriageLevel::Severe,
        Some(Severity::Moderate) if triage_level == TriageLevel::Mild => {
            triage_level = TriageLevel::Moderate
        }
        _ => {}
    }

    let symptoms = if positive.is_empty() {
        None
    } else {
        Some(
            positive
                .into_iter()
                .map(|name| SymptomReport {
                    name,
                    duration_days,
                })
                .collect(),
        )
    };

    TriageSummary {
        symptoms,
        vitals,
        vitals_flags,
        triage_level,
    }
}
