//! Optimizer configuration.
//!
//! Values come from an optional JSON file, then environment variables, then
//! whatever the caller sets explicitly (the CLI flags).

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::utils::{OptimizerError, OptimizerResult, validate_config};

pub const QUALITY_ENV: &str = "IMAGE_OPTIMIZER_QUALITY";
pub const OUTPUT_DIR_ENV: &str = "IMAGE_OPTIMIZER_OUTPUT_DIR";

/// Default JPEG quality, same as the slider's initial position.
pub const DEFAULT_QUALITY: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizerConfig {
    /// JPEG quality (1-100)
    pub quality: u32,
    /// Directory downloads are written to
    pub output_dir: PathBuf,
    /// Prepended to the original file name of every download
    pub prefix: String,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            output_dir: PathBuf::from("optimized"),
            prefix: "optimized-".to_string(),
        }
    }
}

impl OptimizerConfig {
    /// Loads a JSON config file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> OptimizerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OptimizerError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn with_env(self) -> OptimizerResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by the environment variable names.
    pub fn with_overrides<F>(mut self, lookup: F) -> OptimizerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(QUALITY_ENV) {
            self.quality = raw.trim().parse().map_err(|_| {
                OptimizerError::config(format!("{QUALITY_ENV} is not a number: {raw}"))
            })?;
        }

        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|d| !d.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }

        Ok(self)
    }

    pub fn validate(&self) -> OptimizerResult<()> {
        validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: OptimizerConfig = serde_json::from_str(r#"{ "quality": 80 }"#).unwrap();
        assert_eq!(config.quality, 80);
        assert_eq!(config.prefix, "optimized-");
        assert_eq!(config.output_dir, PathBuf::from("optimized"));
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars: HashMap<&str, &str> =
            [(QUALITY_ENV, " 55 "), (OUTPUT_DIR_ENV, "/tmp/out")].into_iter().collect();

        let config = OptimizerConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.quality, 55);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn non_numeric_quality_is_a_config_error() {
        let err = OptimizerConfig::default()
            .with_overrides(|key| (key == QUALITY_ENV).then(|| "high".to_string()))
            .unwrap_err();
        assert!(matches!(err, OptimizerError::Config(_)));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = OptimizerConfig::load("/no/such/config.json").unwrap_err();
        assert!(matches!(err, OptimizerError::Config(_)));
    }
}
