use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::dictionary::{normalize_term, TermSet};

use super::duration::find_durations;
use super::matcher::PhraseMatcher;
use super::negation::{negated_to_left, NEGATION_WINDOW};
use super::severity::pick_severity;
use super::tokenize::{RuleTokenizer, Token, Tokenizer};
use super::types::{AgeSex, Onset, RawExtraction, Sex};
use super::vitals::parse_vitals;

/// Anatomical terms recognized in retained mention text.
const BODY_SITES: &[&str] = &[
    "head", "throat", "chest", "abdomen", "stomach", "back", "lower back", "shoulder", "arm",
    "hand", "knee", "leg", "ankle", "foot", "eye", "ear", "nose", "jaw", "tooth",
];

/// Closed list of temporal anchors; bare "for"/"since" are deliberately
/// excluded since the duration scanner owns those.
const TIME_WORDS: &[&str] = &[
    "today",
    "yesterday",
    "tonight",
    "this morning",
    "this afternoon",
    "last night",
    "last week",
    "last month",
];

const RISK_KEYWORDS: &[&str] = &["smoker", "pregnant", "diabetic", "asthma", "hypertensive"];

static BODY_SITE_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    BODY_SITES
        .iter()
        .map(|site| {
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(site)))
                .expect("invalid body-site regex");
            (*site, re)
        })
        .collect()
});

static TIME_WORD_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    TIME_WORDS
        .iter()
        .map(|word| {
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(word)))
                .expect("invalid temporal regex");
            (*word, re)
        })
        .collect()
});

static AGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})-?year-?old\b").expect("invalid age regex"));
static MALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(male|man)\b").expect("invalid sex regex"));
static FEMALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(female|woman)\b").expect("invalid sex regex"));

/// Longest-match deduplication: drop any string that is a strict substring of
/// another retained string. Inputs are already normalized (lowercase).
pub fn keep_longest(strings: impl IntoIterator<Item = String>) -> BTreeSet<String> {
    let mut sorted: Vec<String> = strings.into_iter().filter(|s| !s.is_empty()).collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sorted.dedup();

    let mut kept: Vec<String> = Vec::new();
    for s in sorted {
        if !kept.iter().any(|k| k != &s && k.contains(&s)) {
            kept.push(s);
        }
    }
    kept.into_iter().collect()
}

/// Immutable extraction context: term dictionary plus compiled matchers and
/// the shared tokenizer. Built once at startup; safe to share across threads.
pub struct NlpContext {
    terms: TermSet,
    symptom_matcher: PhraseMatcher,
    disease_matcher: PhraseMatcher,
    tokenizer: Box<dyn Tokenizer>,
}

impl NlpContext {
    pub fn new(terms: TermSet) -> Self {
        Self::with_tokenizer(terms, Box::new(RuleTokenizer))
    }

    pub fn with_tokenizer(terms: TermSet, tokenizer: Box<dyn Tokenizer>) -> Self {
        let symptom_matcher = PhraseMatcher::compile(&terms.symptoms, tokenizer.as_ref());
        let disease_matcher = PhraseMatcher::compile(&terms.diseases, tokenizer.as_ref());
        tracing::debug!(
            symptom_patterns = symptom_matcher.pattern_count(),
            disease_patterns = disease_matcher.pattern_count(),
            "phrase matchers compiled"
        );
        Self {
            terms,
            symptom_matcher,
            disease_matcher,
            tokenizer,
        }
    }

    pub fn terms(&self) -> &TermSet {
        &self.terms
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    /// Extract a structured clinical observation from one sentence.
    /// Pure: same input, same context, same output. Empty or punctuation-only
    /// input yields an all-empty record, never an error.
    pub fn extract(&self, sentence: &str) -> RawExtraction {
        let lower = sentence.to_lowercase();
        let tokens = self.tokenizer.tokenize(sentence);

        let mut out = RawExtraction::empty(sentence);

        out.vitals = parse_vitals(sentence);
        out.severity = pick_severity(sentence);
        out.duration = find_durations(sentence);

        // Sudden is checked before gradual; first hit wins.
        out.onset = if lower.contains("sudden") {
            Some(Onset::Sudden)
        } else if lower.contains("gradual") || lower.contains("slowly") {
            Some(Onset::Gradual)
        } else {
            None
        };

        for (word, re) in TIME_WORD_RES.iter() {
            if re.is_match(&lower) {
                out.temporal.insert((*word).to_string());
            }
        }

        for risk in RISK_KEYWORDS {
            if lower.contains(risk) {
                out.risk_factors.insert((*risk).to_string());
            }
        }

        let (symptoms, mut negated) = self.partition_matches(&self.symptom_matcher, &tokens);
        let (diseases, negated_diseases) = self.partition_matches(&self.disease_matcher, &tokens);
        negated.extend(negated_diseases);

        out.symptoms = keep_longest(symptoms);
        out.diseases = keep_longest(diseases);
        out.negated = negated.into_iter().collect();

        // Conflict rule: a term present in both sets stays a symptom only.
        let overlap: Vec<String> = out
            .diseases
            .intersection(&out.symptoms)
            .cloned()
            .collect();
        for term in overlap {
            out.diseases.remove(&term);
        }

        // Body sites come from retained non-negated mention text only, so a
        // negated phrase elsewhere in the sentence cannot contribute one.
        let mut sites: Vec<String> = Vec::new();
        for phrase in out.symptoms.iter().chain(out.diseases.iter()) {
            for (site, re) in BODY_SITE_RES.iter() {
                if re.is_match(phrase) {
                    sites.push((*site).to_string());
                }
            }
        }
        out.body_sites = keep_longest(sites);

        out.age_sex = parse_age_sex(&lower);

        out
    }

    fn partition_matches(
        &self,
        matcher: &PhraseMatcher,
        tokens: &[Token],
    ) -> (Vec<String>, Vec<String>) {
        let mut positive = Vec::new();
        let mut negated = Vec::new();
        for m in matcher.find_matches(tokens) {
            let term = normalize_term(&m.text);
            if term.is_empty() {
                continue;
            }
            if negated_to_left(tokens, m.start, NEGATION_WINDOW) {
                negated.push(term);
            } else {
                positive.push(term);
            }
        }
        (positive, negated)
    }
}

fn parse_age_sex(lower: &str) -> AgeSex {
    let mut out = AgeSex::default();
    if let Some(c) = AGE_RE.captures(lower) {
        out.age = c[1].parse().ok();
    }
    // Word-boundary patterns: "woman" must not register as male via its
    // embedded "man", and the female check runs regardless of the male one.
    if MALE_RE.is_match(lower) {
        out.sex = Some(Sex::Male);
    }
    if FEMALE_RE.is_match(lower) {
        out.sex = Some(Sex::Female);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::seed_terms;

    fn ctx() -> NlpContext {
        NlpContext::new(seed_terms())
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keep_longest_drops_strict_substrings() {
        let kept = keep_longest(vec![
            "back pain".to_string(),
            "lower back pain".to_string(),
            "fever".to_string(),
        ]);
        assert_eq!(kept, set(&["lower back pain", "fever"]));
    }

    #[test]
    fn keep_longest_keeps_equal_strings_once() {
        let kept = keep_longest(vec!["cough".to_string(), "cough".to_string()]);
        assert_eq!(kept, set(&["cough"]));
    }

    #[test]
    fn red_flag_sentence() {
        let out = ctx().extract("I have severe chest pain and shortness of breath for 3 days, temp 39C.");
        assert_eq!(out.symptoms, set(&["chest pain", "shortness of breath"]));
        assert!(out.negated.is_empty());
        assert_eq!(out.severity, Some(crate::extract::types::Severity::Severe));
        assert_eq!(out.duration.len(), 1);
        assert_eq!(out.duration[0].days, Some(3.0));
        assert_eq!(out.vitals.temperature.as_deref(), Some("temp 39C"));
        assert_eq!(out.body_sites, set(&["chest"]));
    }

    #[test]
    fn negation_with_boundary() {
        let out = ctx().extract("No fever but mild headache since yesterday.");
        assert_eq!(out.negated, set(&["fever"]));
        assert_eq!(out.symptoms, set(&["headache"]));
        assert_eq!(out.severity, Some(crate::extract::types::Severity::Mild));
        assert_eq!(out.duration[0].days, Some(1.0));
        assert_eq!(out.temporal, set(&["yesterday"]));
    }

    #[test]
    fn denied_symptoms_with_vitals() {
        let out = ctx().extract("Patient denies cough or sore throat. HR 120, BP 160/100.");
        assert_eq!(out.negated, set(&["cough", "sore throat"]));
        assert!(out.symptoms.is_empty());
        assert_eq!(out.vitals.heart_rate, Some(120));
        assert_eq!(out.vitals.blood_pressure.as_deref(), Some("160/100"));
    }

    #[test]
    fn age_sex_onset_and_longest_match() {
        let out = ctx().extract("I am a 38-year-old female, sudden lower back pain tonight.");
        assert_eq!(out.age_sex.age, Some(38));
        assert_eq!(out.age_sex.sex, Some(Sex::Female));
        assert_eq!(out.onset, Some(Onset::Sudden));
        assert_eq!(out.symptoms, set(&["lower back pain"]));
        assert_eq!(out.body_sites, set(&["lower back"]));
        assert_eq!(out.temporal, set(&["tonight"]));
    }

    #[test]
    fn woman_is_not_male() {
        let out = ctx().extract("A 40-year-old woman with cough.");
        assert_eq!(out.age_sex.sex, Some(Sex::Female));
    }

    #[test]
    fn disease_negation_and_conflict_free_sets() {
        let out = ctx().extract("I think it's just flu, not pneumonia.");
        assert_eq!(out.diseases, set(&["flu"]));
        assert_eq!(out.negated, set(&["pneumonia"]));
        assert!(out.symptoms.is_disjoint(&out.diseases));
    }

    #[test]
    fn symptom_wins_symptom_disease_overlap() {
        let mut terms = seed_terms();
        terms.symptoms.insert("asthma".to_string());
        let out = NlpContext::new(terms).extract("history of asthma");
        assert!(out.symptoms.contains("asthma"));
        assert!(!out.diseases.contains("asthma"));
    }

    #[test]
    fn risk_factors_spotted() {
        let out = ctx().extract("Patient is a smoker and diabetic.");
        assert_eq!(out.risk_factors, set(&["smoker", "diabetic"]));
    }

    #[test]
    fn empty_sentence_is_valid() {
        let out = ctx().extract("");
        assert_eq!(out, RawExtraction::empty(""));
        let out = ctx().extract("?!;");
        assert!(out.symptoms.is_empty() && out.severity.is_none());
    }

    #[test]
    fn extraction_is_idempotent() {
        let c = ctx();
        let sentence = "No fever but mild headache since yesterday.";
        let a = serde_json::to_string(&c.extract(sentence)).unwrap();
        let b = serde_json::to_string(&c.extract(sentence)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn gradual_onset_after_sudden_check() {
        let out = ctx().extract("It came on gradually over days");
        assert_eq!(out.onset, Some(Onset::Gradual));
    }
}
