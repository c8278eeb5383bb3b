use std::path::Path;
use crate::core::OptimizerConfig;
use crate::utils::{OptimizerError, OptimizerResult, ValidationError};

/// Lowest accepted JPEG quality.
pub const MIN_QUALITY: u8 = 1;
/// Highest accepted JPEG quality.
pub const MAX_QUALITY: u8 = 100;

/// Validates a quality value against the inclusive 1-100 range.
pub fn validate_quality(quality: u32) -> OptimizerResult<u8> {
    if quality < MIN_QUALITY as u32 || quality > MAX_QUALITY as u32 {
        return Err(OptimizerError::settings(format!(
            "Invalid quality value: {quality}. Must be between {MIN_QUALITY} and {MAX_QUALITY}"
        )));
    }
    Ok(quality as u8)
}

/// Validates that an input path exists and is a regular file.
pub fn validate_input_path(path: &Path) -> OptimizerResult<()> {
    if !path.exists() {
        return Err(ValidationError::path_not_found(path).into());
    }

    if !path.is_file() {
        return Err(ValidationError::not_a_file(path).into());
    }

    Ok(())
}

/// Validates a whole configuration before it is used.
pub fn validate_config(config: &OptimizerConfig) -> OptimizerResult<()> {
    validate_quality(config.quality)?;

    if config.prefix.is_empty() {
        return Err(OptimizerError::settings("Download prefix cannot be empty"));
    }

    if config.prefix.contains(['/', '\\']) {
        return Err(OptimizerError::settings(format!(
            "Download prefix cannot contain path separators: {}",
            config.prefix
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_bounds_are_inclusive() {
        assert_eq!(validate_quality(1).unwrap(), 1);
        assert_eq!(validate_quality(100).unwrap(), 100);
        assert!(validate_quality(0).is_err());
        assert!(validate_quality(101).is_err());
    }

    #[test]
    fn missing_input_is_reported_as_path_error() {
        let err = validate_input_path(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::Validation(ValidationError::Path(_))
        ));
    }

    #[test]
    fn prefix_must_be_a_plain_name() {
        let mut config = OptimizerConfig::default();
        assert!(validate_config(&config).is_ok());

        config.prefix = "../".to_string();
        assert!(validate_config(&config).is_err());

        config.prefix.clear();
        assert!(validate_config(&config).is_err());
    }
}
