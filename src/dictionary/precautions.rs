use std::collections::BTreeMap;
use std::path::Path;

use super::{normalize_term, sniff_delimiter, ConfigError};

const DISEASE_HEADERS: &[&str] = &["disease", "diseases", "diagnosis", "condition"];
const PRECAUTION_HEADERS: &[&str] = &["precautions", "precaution"];

/// Lookup table from disease name to its recommended precautions, loaded once
/// at startup from a `(disease, precautions)` CSV where the precautions cell
/// is a comma-joined list.
#[derive(Debug, Clone, Default)]
pub struct PrecautionTable {
    by_disease: BTreeMap<String, Vec<String>>,
}

impl PrecautionTable {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::SourceNotFound(path.to_path_buf()));
        }
        let sep = sniff_delimiter(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(sep)
            .flexible(true)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let dcol = headers
            .iter()
            .position(|h| DISEASE_HEADERS.contains(&h.trim().to_lowercase().as_str()));
        let pcol = headers
            .iter()
            .position(|h| PRECAUTION_HEADERS.contains(&h.trim().to_lowercase().as_str()));
        let (dcol, pcol) = match (dcol, pcol) {
            (Some(d), Some(p)) => (d, p),
            _ => {
                return Err(ConfigError::MissingColumns {
                    path: path.to_path_buf(),
                    found: headers.iter().map(str::to_string).collect(),
                })
            }
        };

        let mut by_disease = BTreeMap::new();
        for record in reader.records() {
            let record = record?;
            let disease = normalize_term(record.get(dcol).unwrap_or(""));
            if disease.is_empty() {
                continue;
            }
            let precautions: Vec<String> = record
                .get(pcol)
                .unwrap_or("")
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            by_disease.insert(disease, precautions);
        }

        tracing::debug!(entries = by_disease.len(), "precaution table loaded");
        Ok(Self { by_disease })
    }

    /// Case-insensitive lookup; an unknown disease yields an empty slice.
    pub fn get(&self, disease: &str) -> &[String] {
        self.by_disease
            .get(&normalize_term(disease))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_disease.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_disease.is_empty()
    }
}
