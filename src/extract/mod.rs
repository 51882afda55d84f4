pub mod duration;
pub mod extractor;
pub mod matcher;
pub mod negation;
pub mod severity;
pub mod tokenize;
pub mod types;
pub mod vitals;

pub use extractor::{keep_longest, NlpContext};
pub use matcher::{PhraseMatch, PhraseMatcher, MAX_PATTERNS};
pub use tokenize::{RuleTokenizer, Token, Tokenizer};
pub use types::{
    AgeSex, DurationMention, Onset, RawExtraction, Severity, Sex, Vitals,
};
