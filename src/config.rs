//! Engine configuration, with optional YAML file loading.
//!
//! [`EngineConfig`] holds the parameters that shape indexing and matching for
//! the lifetime of a [`Comparator`](crate::Comparator); per-comparison knobs
//! live in [`CompareOptions`]. Both are serde-friendly so they can be stored
//! in config files or passed across process boundaries.
//!
//! ## Example YAML configuration
//!
//! ```yaml
//! version: 1
//! seed_size: 3
//! merge_distance: 15
//! max_workers: 4
//! max_edit_distance: 5
//! max_drift: 5
//! min_block_words: 3
//! parallel_fuzzy: false
//! cache_dir: /var/cache/textmatch
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use matcher::{MatchMode, MatchParams};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Engine-wide configuration.
///
/// The defaults reproduce the reference behavior: 3-word shingles, a 15-word
/// merge gap, 4 worker threads, and no on-disk cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Configuration schema version; must be >= 1.
    #[serde(default = "EngineConfig::default_version")]
    pub version: u32,
    /// Words per shingle.
    #[serde(default = "EngineConfig::default_seed_size")]
    pub seed_size: usize,
    /// Maximum target-side gap, in filtered words, bridged when merging
    /// candidates into blocks.
    #[serde(default = "EngineConfig::default_merge_distance")]
    pub merge_distance: usize,
    /// Worker threads for reference indexing and exact-mode matching.
    #[serde(default = "EngineConfig::default_max_workers")]
    pub max_workers: usize,
    /// Seed for shingle hashing. Indices built with different seeds are not
    /// comparable.
    #[serde(default = "EngineConfig::default_seed")]
    pub seed: u64,
    /// Fuzzy mode: maximum character edit distance between joined shingles.
    #[serde(default = "EngineConfig::default_max_edit_distance")]
    pub max_edit_distance: usize,
    /// Maximum divergence between target-side and source-side advance when
    /// extending a block.
    #[serde(default = "EngineConfig::default_max_drift")]
    pub max_drift: usize,
    /// Minimum target words a block must span to be kept.
    #[serde(default = "EngineConfig::default_min_block_words")]
    pub min_block_words: usize,
    /// Run fuzzy-mode chunks on the worker pool. Off by default; the index
    /// is read-only during matching so this is safe, but it changes nothing
    /// for small documents and is kept an explicit opt-in.
    #[serde(default)]
    pub parallel_fuzzy: bool,
    /// Directory for the tokenization cache. `None` disables caching.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl EngineConfig {
    pub(crate) fn default_version() -> u32 {
        1
    }

    pub(crate) fn default_seed_size() -> usize {
        3
    }

    pub(crate) fn default_merge_distance() -> usize {
        15
    }

    pub(crate) fn default_max_workers() -> usize {
        4
    }

    pub(crate) fn default_seed() -> u64 {
        0x0D0C_5EED_0D0C_5EED
    }

    pub(crate) fn default_max_edit_distance() -> usize {
        5
    }

    pub(crate) fn default_max_drift() -> usize {
        5
    }

    pub(crate) fn default_min_block_words() -> usize {
        3
    }

    /// Check the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "version must be >= 1".into(),
            ));
        }
        if self.seed_size == 0 {
            return Err(ConfigLoadError::Validation(
                "seed_size must be >= 1".into(),
            ));
        }
        if self.max_workers == 0 {
            return Err(ConfigLoadError::Validation(
                "max_workers must be >= 1".into(),
            ));
        }
        if self.min_block_words == 0 {
            return Err(ConfigLoadError::Validation(
                "min_block_words must be >= 1".into(),
            ));
        }
        Ok(())
    }

    /// Load and validate a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// The matching parameters derived from this configuration.
    pub fn match_params(&self) -> MatchParams {
        MatchParams {
            seed_size: self.seed_size,
            merge_distance: self.merge_distance,
            max_drift: self.max_drift,
            max_edit_distance: self.max_edit_distance,
            min_block_words: self.min_block_words,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            seed_size: Self::default_seed_size(),
            merge_distance: Self::default_merge_distance(),
            max_workers: Self::default_max_workers(),
            seed: Self::default_seed(),
            max_edit_distance: Self::default_max_edit_distance(),
            max_drift: Self::default_max_drift(),
            min_block_words: Self::default_min_block_words(),
            parallel_fuzzy: false,
            cache_dir: None,
        }
    }
}

/// Per-comparison options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Candidate generation strategy.
    #[serde(default)]
    pub mode: MatchMode,
    /// Run Smith-Waterman refinement on merged blocks.
    #[serde(default = "CompareOptions::default_use_alignment")]
    pub use_alignment: bool,
    /// Alignment window expansion, in filtered words, on each side of a
    /// block.
    #[serde(default = "CompareOptions::default_expansion")]
    pub expansion: usize,
}

impl CompareOptions {
    pub(crate) fn default_use_alignment() -> bool {
        true
    }

    pub(crate) fn default_expansion() -> usize {
        1
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::default(),
            use_alignment: Self::default_use_alignment(),
            expansion: Self::default_expansion(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.seed_size, 3);
        assert_eq!(cfg.merge_distance, 15);
        assert_eq!(cfg.max_workers, 4);
        assert!(cfg.cache_dir.is_none());
    }

    #[test]
    fn zero_seed_size_rejected() {
        let cfg = EngineConfig {
            seed_size: 0,
            ..EngineConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(matches!(err, ConfigLoadError::Validation(msg) if msg.contains("seed_size")));
    }

    #[test]
    fn yaml_round_trip_with_partial_file() {
        let yaml = "seed_size: 4\nmerge_distance: 20\n";
        let cfg: EngineConfig = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(cfg.seed_size, 4);
        assert_eq!(cfg.merge_distance, 20);
        // Unspecified fields keep their defaults.
        assert_eq!(cfg.max_workers, 4);
        assert!(!cfg.parallel_fuzzy);
    }

    #[test]
    fn compare_options_default_to_exact_with_alignment() {
        let opts = CompareOptions::default();
        assert_eq!(opts.mode, MatchMode::Exact);
        assert!(opts.use_alignment);
        assert_eq!(opts.expansion, 1);
    }
}
