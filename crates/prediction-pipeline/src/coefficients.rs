//! Fusion weight loading.
//!
//! Weights live in a small JSON document with numeric `x`, `y` and `z` keys.
//! A missing or malformed document never fails a request: the provider logs
//! a warning and hands out [`FusionCoefficients::DEFAULT`].

use std::path::{Path, PathBuf};

use market_core::{CoefficientSource, FusionCoefficients};
use thiserror::Error;

pub const DEFAULT_COEFFICIENTS_PATH: &str = "config/coefficients.json";

#[derive(Error, Debug)]
pub enum CoefficientError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads coefficients from a JSON file on every `load`.
#[derive(Debug, Clone)]
pub struct FileCoefficients {
    path: PathBuf,
}

impl FileCoefficients {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file, surfacing the failure.
    pub fn try_load(&self) -> Result<FusionCoefficients, CoefficientError> {
        let path = self.path.display().to_string();
        let raw = std::fs::read_to_string(&self.path).map_err(|source| CoefficientError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CoefficientError::Parse { path, source })
    }
}

impl Default for FileCoefficients {
    fn default() -> Self {
        Self::new(DEFAULT_COEFFICIENTS_PATH)
    }
}

impl CoefficientSource for FileCoefficients {
    fn load(&self) -> FusionCoefficients {
        match self.try_load() {
            Ok(coeffs) => coeffs,
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to default fusion coefficients");
                FusionCoefficients::DEFAULT
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_coefficients() {
        let file = write_temp(r#"{"x": 0.6, "y": 0.25, "z": 0.15}"#);
        let provider = FileCoefficients::new(file.path());
        assert_eq!(provider.load(), FusionCoefficients::new(0.6, 0.25, 0.15));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileCoefficients::new(dir.path().join("absent.json"));
        assert!(matches!(provider.try_load(), Err(CoefficientError::Io { .. })));
        assert_eq!(provider.load(), FusionCoefficients::DEFAULT);
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let file = write_temp("{ not json");
        let provider = FileCoefficients::new(file.path());
        assert!(matches!(provider.try_load(), Err(CoefficientError::Parse { .. })));
        assert_eq!(provider.load(), FusionCoefficients::DEFAULT);
    }

    #[test]
    fn test_missing_key_uses_full_default_set() {
        let file = write_temp(r#"{"x": 0.9, "y": 0.1}"#);
        let provider = FileCoefficients::new(file.path());
        assert_eq!(provider.load(), FusionCoefficients::DEFAULT);
    }
}
