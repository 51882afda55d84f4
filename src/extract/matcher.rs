use std::collections::{BTreeSet, HashMap, HashSet};

use super::tokenize::{Token, Tokenizer};

/// Compile-cost/memory bound: phrases beyond this (in sorted term order) are
/// dropped deterministically.
pub const MAX_PATTERNS: usize = 5000;

/// A phrase hit over the shared token stream. `start`/`end` are token
/// indices (`end` exclusive) so negation windows can be anchored on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Case-insensitive whole-token phrase matcher, compiled once from a term
/// set. Phrases are tokenized with the same tokenizer as the extractor so
/// offsets align.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    phrases: Vec<Vec<String>>,
    first_token_index: HashMap<String, Vec<usize>>,
}

impl PhraseMatcher {
    pub fn compile(terms: &BTreeSet<String>, tokenizer: &dyn Tokenizer) -> Self {
        let mut phrases: Vec<Vec<String>> = Vec::new();
        for term in terms.iter().take(MAX_PATTERNS) {
            let toks: Vec<String> = tokenizer
                .tokenize(term)
                .into_iter()
                .map(|t| t.lower)
                .collect();
            if !toks.is_empty() {
                phrases.push(toks);
            }
        }

        let mut first_token_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, phrase) in phrases.iter().enumerate() {
            first_token_index
                .entry(phrase[0].clone())
                .or_default()
                .push(idx);
        }

        Self {
            phrases,
            first_token_index,
        }
    }

    pub fn pattern_count(&self) -> usize {
        self.phrases.len()
    }

    /// All phrase hits, including overlapping ones; longest-match
    /// deduplication happens later, after normalization.
    pub fn find_matches(&self, tokens: &[Token]) -> Vec<PhraseMatch> {
        let mut matches = Vec::new();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        for start in 0..tokens.len() {
            let Some(candidates) = self.first_token_index.get(&tokens[start].lower) else {
                continue;
            };
            for &idx in candidates {
                let phrase = &self.phrases[idx];
                let end = start + phrase.len();
                if end > tokens.len() {
                    continue;
                }
                let hit = phrase
                    .iter()
                    .zip(&tokens[start..end])
                    .all(|(want, tok)| *want == tok.lower);
                if hit && seen.insert((start, end)) {
                    let text = tokens[start..end]
                        .iter()
                        .map(|t| t.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    matches.push(PhraseMatch { start, end, text });
                }
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::tokenize::RuleTokenizer;

    fn matcher_for(terms: &[&str]) -> PhraseMatcher {
        let set: BTreeSet<String> = terms.iter().map(|t| t.to_string()).collect();
        PhraseMatcher::compile(&set, &RuleTokenizer)
    }

    fn matched_texts(matcher: &PhraseMatcher, sentence: &str) -> Vec<String> {
        let tokens = RuleTokenizer.tokenize(sentence);
        matcher
            .find_matches(&tokens)
            .into_iter()
            .map(|m| m.text)
            .collect()
    }

    #[test]
    fn multi_word_phrase_matches_case_insensitively() {
        let m = matcher_for(&["chest pain"]);
        assert_eq!(matched_texts(&m, "Severe Chest Pain tonight"), vec!["Chest Pain"]);
    }

    #[test]
    fn whole_token_only_no_substring_hits() {
        let m = matcher_for(&["back pain"]);
        assert!(matched_texts(&m, "hunchback pain").is_empty());
        assert_eq!(matched_texts(&m, "my back pain is back"), vec!["back pain"]);
    }

    #[test]
    fn overlapping_phrases_all_reported() {
        let m = matcher_for(&["back pain", "lower back pain"]);
        let texts = matched_texts(&m, "sudden lower back pain tonight");
        assert!(texts.contains(&"back pain".to_string()));
        assert!(texts.contains(&"lower back pain".to_string()));
    }

    #[test]
    fn offsets_align_with_tokenizer() {
        let m = matcher_for(&["fever"]);
        let tokens = RuleTokenizer.tokenize("no fever, but cough");
        let hits = m.find_matches(&tokens);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start, 1);
        assert_eq!(hits[0].end, 2);
    }

    #[test]
    fn pattern_cap_is_deterministic() {
        let terms: BTreeSet<String> = (0..6000).map(|i| format!("symptom {i:05}")).collect();
        let m = PhraseMatcher::compile(&terms, &RuleTokenizer);
        assert_eq!(m.pattern_count(), MAX_PATTERNS);
        // Sorted order means the lowest-numbered terms survive the cap.
        let tokens = RuleTokenizer.tokenize("symptom 00000 and symptom 05999");
        let texts: Vec<String> = m.find_matches(&tokens).into_iter().map(|x| x.text).collect();
        assert_eq!(texts, vec!["symptom 00000"]);
    }
}
