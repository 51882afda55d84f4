use std::path::{Path, PathBuf};

/// Application-level constants
pub const APP_NAME: &str = "symtriage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info", APP_NAME)
}

/// Get the application data directory (~/.symtriage).
/// Dictionary CSV sources are looked up here unless overridden on the CLI.
pub fn default_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(".symtriage")
}

/// Preferred two-column (disease, symptom) dictionary.
pub fn dictionary_csv(data_dir: &Path) -> PathBuf {
    data_dir.join("dictionary.csv")
}

/// Wide disease-by-symptom presence matrix.
pub fn wide_matrix_csv(data_dir: &Path) -> PathBuf {
    data_dir.join("cleaned_wide.csv")
}

/// Fallback two-column dataset; the path the CLI flag overrides.
pub fn default_fallback_csv(data_dir: &Path) -> PathBuf {
    data_dir.join("Disease_symptom_and_patient_profile_dataset.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_under_home() {
        let dir = default_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with(".symtriage"));
    }

    #[test]
    fn dictionary_paths_under_data_dir() {
        let dir = default_data_dir();
        assert!(dictionary_csv(&dir).ends_with("dictionary.csv"));
        assert!(wide_matrix_csv(&dir).ends_with("cleaned_wide.csv"));
        assert!(default_fallback_csv(&dir).starts_with(&dir));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
