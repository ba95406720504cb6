use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// State document, relative to the repository root.
pub const STATE_FILE: &str = "architecture.json";
/// Previous generation of the state document, refreshed on every save.
pub const BACKUP_FILE: &str = "architecture.json.backup";
/// Temporary path written before the atomic rename.
pub const TEMP_FILE: &str = "architecture.json.tmp";
/// Baseline snapshot of an in-flight session.
pub const SESSION_FILE: &str = ".session_start";
/// Optional configuration file.
pub const CONFIG_FILE: &str = "atlas.toml";

/// Insight quality strictness: sets the word floor and whether impact is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    Lenient,
    #[default]
    Standard,
    Strict,
}

impl Strictness {
    /// Minimum number of whitespace-separated words.
    pub fn min_words(self) -> usize {
        match self {
            Self::Lenient => 10,
            Self::Standard => 15,
            Self::Strict => 20,
        }
    }

    pub fn requires_impact(self) -> bool {
        !matches!(self, Self::Lenient)
    }
}

/// Top-level Atlas configuration, matching `atlas.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub classification: ClassificationSection,
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub insights: InsightSection,
    #[serde(default)]
    pub gates: GateSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationSection {
    /// Files smaller than this many KiB are never significant.
    pub size_threshold_kb: f64,
    /// Config files at or above this many KiB are treated as generated data.
    pub max_config_size_kb: f64,
    /// Added to the built-in data/asset directory names.
    pub extra_data_directories: Vec<String>,
}

impl Default for ClassificationSection {
    fn default() -> Self {
        Self {
            size_threshold_kb: 1.0,
            max_config_size_kb: 50.0,
            extra_data_directories: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// Fold `.gitignore` entries into the ignore rules.
    pub use_gitignore: bool,
    pub extra_ignore_dirs: Vec<String>,
    /// Extensions with or without the leading dot.
    pub extra_ignore_extensions: Vec<String>,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            use_gitignore: true,
            extra_ignore_dirs: Vec::new(),
            extra_ignore_extensions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightSection {
    pub strictness: Strictness,
    /// Word-overlap ratio above which an insight counts as a duplicate.
    pub duplicate_threshold: f64,
}

impl Default for InsightSection {
    fn default() -> Self {
        Self {
            strictness: Strictness::Standard,
            duplicate_threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSection {
    /// Gate A: coverage percentage at which the survey may stop.
    pub coverage_target: f64,
    /// Gate B: number of trailing sessions inspected.
    pub stall_window: usize,
    /// Gate B: a session is low-yield when it mapped fewer files than this.
    pub stall_max_new_files: usize,
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            coverage_target: 90.0,
            stall_window: 3,
            stall_max_new_files: 3,
        }
    }
}

impl AtlasConfig {
    /// Load `atlas.toml` from `root`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.classification;
        if c.size_threshold_kb < 0.0 || c.max_config_size_kb < 0.0 {
            return Err(ConfigError::Invalid(
                "classification sizes must not be negative".into(),
            ));
        }
        let dup = self.insights.duplicate_threshold;
        if !(dup > 0.0 && dup <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "insights.duplicate_threshold must be in (0, 1], got {dup}"
            )));
        }
        if self.gates.stall_window == 0 {
            return Err(ConfigError::Invalid(
                "gates.stall_window must be at least 1".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.gates.coverage_target) {
            return Err(ConfigError::Invalid(format!(
                "gates.coverage_target must be a percentage, got {}",
                self.gates.coverage_target
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AtlasConfig::load(tmp.path()).unwrap();
        assert!((config.classification.size_threshold_kb - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.insights.strictness, Strictness::Standard);
        assert_eq!(config.gates.stall_window, 3);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = AtlasConfig::parse(
            r#"
[classification]
extra_data_directories = ["corpus"]

[insights]
strictness = "strict"
"#,
        )
        .unwrap();
        assert_eq!(config.classification.extra_data_directories, vec!["corpus"]);
        assert!((config.classification.max_config_size_kb - 50.0).abs() < f64::EPSILON);
        assert_eq!(config.insights.strictness.min_words(), 20);
        assert!((config.insights.duplicate_threshold - 0.8).abs() < f64::EPSILON);
        assert!(config.scan.use_gitignore);
    }

    #[test]
    fn rejects_zero_stall_window() {
        let err = AtlasConfig::parse("[gates]\nstall_window = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_toml() {
        let err = AtlasConfig::parse("[scan\nuse_gitignore = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn lenient_skips_impact() {
        assert!(!Strictness::Lenient.requires_impact());
        assert!(Strictness::Standard.requires_impact());
        assert_eq!(Strictness::Lenient.min_words(), 10);
    }
}
