pub mod config;
pub mod dictionary;
pub mod extract;
pub mod predict;
pub mod triage;

pub use dictionary::{load_terms, ConfigError, DictionarySources, LoadedTerms, TermSet};
pub use extract::{NlpContext, RawExtraction};
pub use triage::{combine, TriageLevel, TriageSummary};

/// Run extraction and combination for one sentence.
pub fn extract_and_combine(ctx: &NlpContext, sentence: &str) -> TriageSummary {
    combine(&ctx.extract(sentence))
}

/// Process many lines of text, skipping blank ones.
pub fn process_texts<'a, I>(ctx: &NlpContext, texts: I) -> Vec<TriageSummary>
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| extract_and_combine(ctx, t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::seed_terms;

    fn ctx() -> NlpContext {
        NlpContext::new(seed_terms())
    }

    fn symptom_names(summary: &TriageSummary) -> Vec<String> {
        summary
            .symptoms
            .iter()
            .flatten()
            .map(|s| s.name.clone())
            .collect()
    }

    #[test]
    fn severe_scenario_red_flags_fever_and_duration() {
        let summary = extract_and_combine(
            &ctx(),
            "I have severe chest pain and shortness of breath for 3 days, temp 39C.",
        );
        assert_eq!(summary.triage_level, TriageLevel::Severe);
        let names = symptom_names(&summary);
        for expected in ["chest pain", "shortness of breath", "fever"] {
            assert!(names.contains(&expected.to_string()), "missing {expected}");
        }
        for report in summary.symptoms.as_deref().unwrap() {
            assert_eq!(report.duration_days, Some(3.0));
        }
        assert!(summary.vitals.temperature.is_none());
    }

    #[test]
    fn moderate_scenario_denied_symptoms_with_vitals() {
        let summary = extract_and_combine(
            &ctx(),
            "Patient denies cough or sore throat. HR 120, BP 160/100.",
        );
        assert!(summary.symptoms.is_none());
        assert!(summary
            .vitals_flags
            .contains(&triage::VitalsFlag::Tachycardia));
        assert!(summary
            .vitals_flags
            .contains(&triage::VitalsFlag::MarkedHypertension));
        assert_eq!(summary.triage_level, TriageLevel::Moderate);
    }

    #[test]
    fn fahrenheit_reading_folds_into_fever() {
        let summary = extract_and_combine(&ctx(), "Bad cough, temperature 101F for 2 days.");
        let names = symptom_names(&summary);
        assert!(names.contains(&"fever".to_string()));
        assert!(names.contains(&"cough".to_string()));
        assert!(summary.vitals.temperature.is_none());
        assert_eq!(summary.triage_level, TriageLevel::Moderate);
    }

    #[test]
    fn symptoms_and_diseases_stay_disjoint() {
        let c = ctx();
        for sentence in [
            "I think it's just flu, not pneumonia.",
            "asthma with wheezing and chest tightness",
            "No fever but mild headache since yesterday.",
        ] {
            let raw = c.extract(sentence);
            assert!(raw.symptoms.is_disjoint(&raw.diseases), "overlap in: {sentence}");
        }
    }

    #[test]
    fn pipeline_is_idempotent() {
        let c = ctx();
        let sentence = "I am a 38-year-old female, sudden lower back pain tonight.";
        let a = serde_json::to_string(&extract_and_combine(&c, sentence)).unwrap();
        let b = serde_json::to_string(&extract_and_combine(&c, sentence)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let summaries = process_texts(&ctx(), ["", "  ", "mild cough", "\t"]);
        assert_eq!(summaries.len(), 1);
    }

    #[test]
    fn empty_sentence_triages_mild() {
        let summary = extract_and_combine(&ctx(), "");
        assert!(summary.symptoms.is_none());
        assert_eq!(summary.triage_level, TriageLevel::Mild);
    }
}
