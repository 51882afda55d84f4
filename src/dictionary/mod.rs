pub mod precautions;

pub use precautions::PrecautionTable;

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no dictionary source found; also missing fallback file: {0}")]
    SourceNotFound(PathBuf),

    #[error("{path}: expected a disease column and a symptom column, got headers: {found:?}")]
    MissingColumns { path: PathBuf, found: Vec<String> },

    #[error("{0}: source contains no rows")]
    EmptySource(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Normalized vocabulary of known symptom and disease phrases.
/// Built once at startup, never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct TermSet {
    pub symptoms: BTreeSet<String>,
    pub diseases: BTreeSet<String>,
}

/// Result of dictionary loading, including which source tier won.
#[derive(Debug, Clone)]
pub struct LoadedTerms {
    pub terms: TermSet,
    pub source_name: String,
}

/// The three dictionary source locations, in resolution order.
#[derive(Debug, Clone)]
pub struct DictionarySources {
    /// Tier 1: two-column (disease, symptom) dictionary.csv.
    pub dictionary: PathBuf,
    /// Tier 2: wide disease-by-symptom presence matrix.
    pub wide_matrix: PathBuf,
    /// Tier 3: two-column dataset where symptom cells may hold several phrases.
    pub fallback: PathBuf,
}

impl DictionarySources {
    pub fn from_data_dir(data_dir: &Path) -> Self {
        Self {
            dictionary: config::dictionary_csv(data_dir),
            wide_matrix: config::wide_matrix_csv(data_dir),
            fallback: config::default_fallback_csv(data_dir),
        }
    }

    /// Override the tier-3 fallback dataset path (CLI flag).
    pub fn with_fallback(mut self, path: PathBuf) -> Self {
        self.fallback = path;
        self
    }
}

const DISEASE_HEADERS: &[&str] = &["disease", "diseases", "diagnosis", "condition"];
const SYMPTOM_HEADERS: &[&str] = &["symptom", "symptoms"];

/// Seed vocabulary unioned into every load so the matcher works even on a
/// minimal or oddly-shaped dataset.
const SEED_SYMPTOMS: &[&str] = &[
    "chest pain",
    "shortness of breath",
    "fever",
    "mild fever",
    "headache",
    "cough",
    "sore throat",
    "back pain",
    "lower back pain",
    "nausea",
    "vomiting",
    "diarrhea",
    "runny nose",
    "wheezing",
    "chest tightness",
];

const SEED_DISEASES: &[&str] = &[
    "flu",
    "pneumonia",
    "asthma",
    "hypertension",
    "diabetes",
    "covid-19",
    "common cold",
];

const STOP_LIKE: &[&str] = &["and", "or", "the", "a", "an", "with", "of", "in", "to", "on"];

/// Normalize a raw term: lowercase, underscores/slashes to spaces, strip
/// everything but `[a-z0-9 '-]`, collapse whitespace, strip trailing dots.
pub fn normalize_term(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.trim().chars() {
        let ch = match ch {
            '_' | '/' => ' ',
            c => c.to_ascii_lowercase(),
        };
        let keep = ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '\'';
        if keep {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }
    out.trim_end_matches('.').to_string()
}

/// Detect the delimiter of a CSV file by sampling its first 4KB.
/// Candidates are comma, semicolon and tab; comma wins ties.
pub fn sniff_delimiter(path: &Path) -> Result<u8, ConfigError> {
    let mut sample = vec![0u8; 4096];
    let mut file = File::open(path)?;
    let n = file.read(&mut sample)?;
    sample.truncate(n);

    let mut best = b',';
    let mut best_count = 0usize;
    for &cand in &[b',', b';', b'\t'] {
        let count = sample.iter().filter(|&&b| b == cand).count();
        if count > best_count {
            best = cand;
            best_count = count;
        }
    }
    Ok(best)
}

fn reader_for(path: &Path) -> Result<csv::Reader<File>, ConfigError> {
    let sep = sniff_delimiter(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(sep)
        .flexible(true)
        .from_path(path)?)
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
}

/// Tier 1: two-column dictionary.csv with one (disease, symptom) pair per row.
fn load_dictionary_csv(path: &Path) -> Result<TermSet, ConfigError> {
    let mut reader = reader_for(path)?;
    let headers = reader.headers()?.clone();
    let dcol = find_column(&headers, DISEASE_HEADERS);
    let scol = find_column(&headers, SYMPTOM_HEADERS);
    let (dcol, scol) = match (dcol, scol) {
        (Some(d), Some(s)) => (d, s),
        _ => {
            return Err(ConfigError::MissingColumns {
                path: path.to_path_buf(),
                found: headers.iter().map(str::to_string).collect(),
            })
        }
    };

    let mut terms = TermSet::default();
    for record in reader.records() {
        let record = record?;
        let dis = normalize_term(record.get(dcol).unwrap_or(""));
        let sym = normalize_term(record.get(scol).unwrap_or(""));
        if !dis.is_empty() {
            terms.diseases.insert(dis);
        }
        if sym.len() > 2 {
            terms.symptoms.insert(sym);
        }
    }
    Ok(terms)
}

/// Tier 2: wide matrix — first column holds disease names, the remaining
/// header cells are symptom names. Cell values are presence markers the
/// loader does not need.
fn load_wide_matrix(path: &Path) -> Result<TermSet, ConfigError> {
    let sep = sniff_delimiter(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sep)
        .flexible(true)
        .has_headers(false)
        .from_path(path)?;

    let mut rows = reader.records();
    let header = match rows.next() {
        Some(record) => record?,
        None => return Err(ConfigError::EmptySource(path.to_path_buf())),
    };

    let mut terms = TermSet::default();
    for cell in header.iter().skip(1) {
        let sym = normalize_term(cell);
        if sym.len() > 2 {
            terms.symptoms.insert(sym);
        }
    }
    for record in rows {
        let record = record?;
        if let Some(first) = record.get(0) {
            let dis = normalize_term(first);
            if !dis.is_empty() {
                terms.diseases.insert(dis);
            }
        }
    }
    Ok(terms)
}

/// Splits a multi-phrase symptom cell like "cough; fever and chills/or pain".
static SYMPTOM_CELL_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;,/]|\band\b|\bor\b").expect("invalid split regex"));

/// Tier 3: fallback two-column dataset whose symptom cell may contain several
/// phrases joined by `; , /` or the words "and"/"or".
fn load_fallback_csv(path: &Path) -> Result<TermSet, ConfigError> {
    let mut reader = reader_for(path)?;
    let headers = reader.headers()?.clone();
    let dcol = find_column(&headers, DISEASE_HEADERS);
    let scol = find_column(&headers, SYMPTOM_HEADERS);
    let (dcol, scol) = match (dcol, scol) {
        (Some(d), Some(s)) => (d, s),
        _ => {
            return Err(ConfigError::MissingColumns {
                path: path.to_path_buf(),
                found: headers.iter().map(str::to_string).collect(),
            })
        }
    };

    let mut terms = TermSet::default();
    for record in reader.records() {
        let record = record?;
        let dis = normalize_term(record.get(dcol).unwrap_or(""));
        if !dis.is_empty() {
            terms.diseases.insert(dis);
        }
        let cell = record.get(scol).unwrap_or("").to_lowercase();
        for piece in SYMPTOM_CELL_SPLIT.split(&cell) {
            let sym = normalize_term(piece);
            if sym.len() > 2 {
                terms.symptoms.insert(sym);
            }
        }
    }
    Ok(terms)
}

/// Union seed terms and drop stop-like or too-short entries.
fn finalize(mut terms: TermSet) -> TermSet {
    for s in SEED_SYMPTOMS {
        terms.symptoms.insert((*s).to_string());
    }
    for d in SEED_DISEASES {
        terms.diseases.insert((*d).to_string());
    }
    let keep = |t: &String| t.len() > 2 && !STOP_LIKE.contains(&t.as_str());
    terms.symptoms.retain(keep);
    terms.diseases.retain(keep);
    terms
}

/// Load the term dictionary with the three-tier source fallback.
/// Fatal at startup: a missing source chain or malformed headers is a
/// `ConfigError`, never retried.
pub fn load_terms(sources: &DictionarySources) -> Result<LoadedTerms, ConfigError> {
    let (terms, source_name) = if sources.dictionary.exists() {
        (load_dictionary_csv(&sources.dictionary)?, "dictionary.csv")
    } else if sources.wide_matrix.exists() {
        (load_wide_matrix(&sources.wide_matrix)?, "cleaned_wide.csv")
    } else if sources.fallback.exists() {
        (load_fallback_csv(&sources.fallback)?, "fallback dataset")
    } else {
        return Err(ConfigError::SourceNotFound(sources.fallback.clone()));
    };

    let terms = finalize(terms);
    tracing::info!(
        source = source_name,
        diseases = terms.diseases.len(),
        symptoms = terms.symptoms.len(),
        "dictionary loaded"
    );
    Ok(LoadedTerms {
        terms,
        source_name: source_name.to_string(),
    })
}

/// A term set built from the seed vocabulary alone, for callers (and tests)
/// that have no CSV source at hand.
pub fn seed_terms() -> TermSet {
    finalize(TermSet::default())
}
