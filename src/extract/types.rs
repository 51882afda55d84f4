use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Sentence-level severity, decided by the first matching rule in priority
/// order (keyword, pain scale, temperature, red-flag pair, vitals).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Onset {
    Sudden,
    Gradual,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Vital signs spotted in the raw sentence. Each field is independently
/// optional; the first regex match per category wins. Temperature keeps the
/// raw matched text because the combiner re-parses value and unit from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vitals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u16>,
    /// "systolic/diastolic", e.g. "160/100".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spo2: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glucose: Option<u16>,
}

impl Vitals {
    /// Parse the "sys/dia" string into numbers; None if absent or malformed.
    pub fn blood_pressure_values(&self) -> Option<(u16, u16)> {
        let bp = self.blood_pressure.as_deref()?;
        let (sys, dia) = bp.split_once('/')?;
        Some((sys.trim().parse().ok()?, dia.trim().parse().ok()?))
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.heart_rate.is_none()
            && self.blood_pressure.is_none()
            && self.spo2.is_none()
            && self.glucose.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgeSex {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
}

/// One duration-like span, kept verbatim plus its day-count normalization.
/// `days` is None when the unit could not be resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DurationMention {
    pub text: String,
    pub days: Option<f64>,
}

/// Structured observation for one sentence. Sets are ordered so output is
/// deterministic. Invariants: `symptoms` and `diseases` are disjoint, and no
/// entry of `symptoms`/`diseases`/`body_sites` is a strict substring of
/// another entry in the same set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawExtraction {
    /// The input sentence, kept for raw-text checks in the combiner.
    pub text: String,
    pub symptoms: BTreeSet<String>,
    pub diseases: BTreeSet<String>,
    /// Phrases that matched a symptom/disease pattern inside a negation scope.
    pub negated: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub duration: Vec<DurationMention>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onset: Option<Onset>,
    pub body_sites: BTreeSet<String>,
    pub temporal: BTreeSet<String>,
    pub vitals: Vitals,
    pub age_sex: AgeSex,
    pub risk_factors: BTreeSet<String>,
}

impl RawExtraction {
    pub fn empty(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }
}
