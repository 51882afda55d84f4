/// A single word-level token. Matching and negation windows operate on the
/// lowercase form; reported match text keeps the original case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub lower: String,
}

impl Token {
    fn new(text: String) -> Self {
        let lower = text.to_lowercase();
        Self { text, lower }
    }
}

/// Tokenization strategy. The phrase matcher, negation scan and extractor all
/// share one tokenizer so token offsets line up.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
    fn split_sentences(&self, text: &str) -> Vec<String>;
}

/// Rule-based tokenizer: words keep internal hyphens and apostrophes,
/// punctuation becomes standalone tokens (the negation scan needs to see
/// `,` and `;` as boundaries).
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTokenizer;

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '\''
}

impl Tokenizer for RuleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut word = String::new();
        for ch in text.chars() {
            if is_word_char(ch) {
                word.push(ch);
            } else {
                if !word.is_empty() {
                    tokens.push(Token::new(std::mem::take(&mut word)));
                }
                if !ch.is_whitespace() {
                    tokens.push(Token::new(ch.to_string()));
                }
            }
        }
        if !word.is_empty() {
            tokens.push(Token::new(word));
        }
        tokens
    }

    fn split_sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            current.push(ch);
            if matches!(ch, '.' | '!' | '?') {
                let at_break = chars.peek().map(|c| c.is_whitespace()).unwrap_or(true);
                if at_break {
                    let s = current.trim();
                    if !s.is_empty() {
                        sentences.push(s.to_string());
                    }
                    current.clear();
                }
            }
        }
        let s = current.trim();
        if !s.is_empty() {
            sentences.push(s.to_string());
        }
        sentences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lowers(text: &str) -> Vec<String> {
        RuleTokenizer.tokenize(text).into_iter().map(|t| t.lower).collect()
    }

    #[test]
    fn punctuation_is_standalone() {
        assert_eq!(
            lowers("No fever, but cough."),
            vec!["no", "fever", ",", "but", "cough", "."]
        );
    }

    #[test]
    fn hyphen_and_apostrophe_stay_inside_words() {
        assert_eq!(lowers("covid-19 isn't fun"), vec!["covid-19", "isn't", "fun"]);
    }

    #[test]
    fn numbers_with_units_split_on_symbols() {
        assert_eq!(lowers("BP 160/100"), vec!["bp", "160", "/", "100"]);
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(RuleTokenizer.tokenize("").is_empty());
        assert!(RuleTokenizer.tokenize("   ").is_empty());
    }

    #[test]
    fn sentence_split_on_terminators() {
        let sents = RuleTokenizer
            .split_sentences("Patient denies cough. HR 120, BP 160/100. Feels tired");
        assert_eq!(sents.len(), 3);
        assert_eq!(sents[0], "Patient denies cough.");
        assert_eq!(sents[2], "Feels tired");
    }

    #[test]
    fn decimal_numbers_not_split_into_sentences() {
        let sents = RuleTokenizer.split_sentences("Temp 38.5C since yesterday.");
        assert_eq!(sents.len(), 1);
    }
}
