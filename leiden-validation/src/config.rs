use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use leiden_lookup::RetryPolicy;
use leiden_vcf::VcfTags;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("`{0}` must be at least 1")]
    Zero(&'static str),
    #[error("Set either `lookup.base_url` or `lookup.table`, not both")]
    ConflictingLookup,
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

///
/// Where frameshift and codon-loss answers come from, and how hard to try.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LookupSettings {
    pub base_url: Option<String>,
    /// JSON answer table used instead of the HTTP service.
    pub table: Option<PathBuf>,
    pub timeout_ms: u64,
    pub max_concurrent: usize,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for LookupSettings {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        LookupSettings {
            base_url: None,
            table: None,
            timeout_ms: 10_000,
            max_concurrent: 4,
            max_attempts: retry.max_attempts,
            initial_backoff_ms: retry.initial_backoff.as_millis() as u64,
            max_backoff_ms: retry.max_backoff.as_millis() as u64,
        }
    }
}

impl LookupSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

///
/// Run configuration. Every section is optional in the TOML file; command
/// line flags are applied on top by the caller.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ValidationConfig {
    /// Evaluation threads; `None` means one per available core.
    pub workers: Option<usize>,
    pub lookup: LookupSettings,
    pub tags: VcfTags,
}

impl ValidationConfig {
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    ///
    /// Reject settings that would stall or silently pick one of two sources.
    ///
    pub fn validate(&self) -> ConfigResult<()> {
        if self.workers == Some(0) {
            return Err(ConfigError::Zero("workers"));
        }
        if self.lookup.max_concurrent == 0 {
            return Err(ConfigError::Zero("lookup.max_concurrent"));
        }
        if self.lookup.max_attempts == 0 {
            return Err(ConfigError::Zero("lookup.max_attempts"));
        }
        if self.lookup.base_url.is_some() && self.lookup.table.is_some() {
            return Err(ConfigError::ConflictingLookup);
        }
        Ok(())
    }
}

impl TryFrom<&Path> for ValidationConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: ValidationConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use std::path::PathBuf;

    #[rstest]
    fn test_try_from_toml() {
        let path = PathBuf::from("../tests/data/config/validation.toml");
        let config = ValidationConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.workers, Some(4));
        assert_eq!(config.worker_count(), 4);
        assert_eq!(
            config.lookup.base_url.as_deref(),
            Some("http://localhost:8080/lookup")
        );
        assert_eq!(config.lookup.timeout(), Duration::from_millis(2500));
        assert_eq!(config.lookup.max_concurrent, 2);
        assert_eq!(config.lookup.retry_policy().max_attempts, 5);
    }

    #[rstest]
    fn test_partial_tags_keep_defaults() {
        let path = PathBuf::from("../tests/data/config/validation.toml");
        let config = ValidationConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.tags.submission, "LOVD2");
        assert_eq!(config.tags.consequence, "CSQ");
        assert_eq!(config.tags.splice_reference, "SPLICE_REF");
        assert_eq!(config.tags.hgmd_mutation, "HGMD_MUTATION");
        assert_eq!(config.tags.allele_count, "AC_MAC26K");
    }

    #[rstest]
    fn test_minimal_config() {
        let path = PathBuf::from("../tests/data/config/minimal.toml");
        let config = ValidationConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.workers, None);
        assert_eq!(config.lookup.base_url, None);
        assert_eq!(config.lookup.retry_policy(), RetryPolicy::default());
        assert_eq!(config.tags, VcfTags::default());
    }

    #[rstest]
    #[case("workers = 0")]
    #[case("[lookup]\nmax_concurrent = 0")]
    #[case("[lookup]\nbase_url = \"http://x\"\ntable = \"t.json\"")]
    fn test_rejects_invalid_settings(#[case] toml_str: &str) {
        let config: ValidationConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.validate().is_err(), true);
    }

    #[rstest]
    fn test_missing_file() {
        let path = PathBuf::from("../tests/data/config/does_not_exist.toml");
        let result = ValidationConfig::try_from(path.as_path());
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
