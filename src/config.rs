use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::rules::canonical_identifier;

pub const DEFAULT_MINIMUM_BITS: i64 = 2048;
pub const DEFAULT_BIT_ALIGNMENT: i64 = 8;
pub const DEFAULT_MINIMUM_SESSION_KEY_BYTES: usize = 16;
pub const SECURE_RANDOM_SOURCE: &str = "crypto/rand.Reader";

/// Thresholds and allow-lists used by the argument checks.
///
/// Every field has a default, so a config file only needs to name the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub minimum_bits: i64,
    pub bit_alignment: i64,
    pub minimum_session_key_bytes: usize,
    pub accepted_hash_identifiers: BTreeSet<String>,
    pub accepted_hash_constructors: BTreeSet<String>,
    pub secure_source_symbols: BTreeSet<String>,
    /// Analyze functions on the rayon pool.
    pub parallel: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            minimum_bits: DEFAULT_MINIMUM_BITS,
            bit_alignment: DEFAULT_BIT_ALIGNMENT,
            minimum_session_key_bytes: DEFAULT_MINIMUM_SESSION_KEY_BYTES,
            accepted_hash_identifiers: ["SHA-256", "SHA-512"]
                .into_iter()
                .map(String::from)
                .collect(),
            accepted_hash_constructors: ["crypto/sha256.New", "crypto/sha512.New"]
                .into_iter()
                .map(String::from)
                .collect(),
            secure_source_symbols: std::iter::once(SECURE_RANDOM_SOURCE.to_string()).collect(),
            parallel: false,
        }
    }
}

impl AnalyzerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading analyzer config");

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::read_error(path, e.to_string()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config: Self = match extension {
            "json" => serde_json::from_str(&content)
                .map_err(|e| ConfigError::parse_error(path, e.to_string()))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| ConfigError::parse_error(path, e.to_string()))?,
            _ => return Err(ConfigError::unsupported_format(extension)),
        };

        config.validate()?;
        trace!(?config, "analyzer config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_bits <= 0 {
            return Err(ConfigError::invalid_value(
                "minimum_bits",
                "must be greater than zero",
            ));
        }
        if self.bit_alignment <= 0 {
            return Err(ConfigError::invalid_value(
                "bit_alignment",
                "must be greater than zero",
            ));
        }
        if self.secure_source_symbols.is_empty() {
            return Err(ConfigError::invalid_value(
                "secure_source_symbols",
                "at least one secure source is required",
            ));
        }
        Ok(())
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Configured identifiers may use any spelling `canonical_identifier`
    /// understands; `name` is already canonical.
    pub fn accepts_hash_identifier(&self, name: &str) -> bool {
        self.accepted_hash_identifiers
            .iter()
            .any(|accepted| canonical_identifier(accepted) == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.minimum_bits, 2048);
        assert_eq!(config.bit_alignment, 8);
        assert_eq!(config.minimum_session_key_bytes, 16);
        assert!(config.accepted_hash_identifiers.contains("SHA-256"));
        assert!(config.accepted_hash_identifiers.contains("SHA-512"));
        assert!(config.secure_source_symbols.contains("crypto/rand.Reader"));
        assert!(config.accepts_hash_identifier("SHA-256"));
        assert!(!config.accepts_hash_identifier("SHA-1"));
        assert!(!config.parallel);
    }

    #[test]
    fn test_load_partial_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rsalint.yaml");
        fs::write(&path, "minimum_bits: 3072\nminimum_session_key_bytes: 32\n").unwrap();

        let config = AnalyzerConfig::load(&path).unwrap();
        assert_eq!(config.minimum_bits, 3072);
        assert_eq!(config.minimum_session_key_bytes, 32);
        assert_eq!(config.bit_alignment, 8);
        assert_eq!(config.accepted_hash_identifiers.len(), 2);
    }

    #[test]
    fn test_load_json_hash_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rsalint.json");
        fs::write(&path, r#"{"accepted_hash_identifiers": ["SHA-384"]}"#).unwrap();

        let config = AnalyzerConfig::load(&path).unwrap();
        assert_eq!(
            config.accepted_hash_identifiers,
            std::iter::once("SHA-384".to_string()).collect()
        );
    }

    #[test]
    fn test_hash_identifiers_accept_constant_spellings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rsalint.yaml");
        fs::write(
            &path,
            "accepted_hash_identifiers: [\"SHA384\", \"crypto.SHA512\"]\n",
        )
        .unwrap();

        let config = AnalyzerConfig::load(&path).unwrap();
        assert!(config.accepts_hash_identifier("SHA-384"));
        assert!(config.accepts_hash_identifier("SHA-512"));
        assert!(!config.accepts_hash_identifier("SHA-256"));
    }

    #[test]
    fn test_load_unsupported_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rsalint.toml");
        fs::write(&path, "minimum_bits = 4096").unwrap();

        let err = AnalyzerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_rejects_zero_alignment() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rsalint.json");
        fs::write(&path, r#"{"bit_alignment": 0}"#).unwrap();

        let err = AnalyzerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnalyzerConfig::load("/nonexistent/rsalint.json").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
