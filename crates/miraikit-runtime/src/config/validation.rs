//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogLevel, LogOutput, LoggingConfig, MiraikitConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &MiraikitConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File {
        match &logging.file_path {
            None => {
                return Err(ConfigError::validation(
                    "File output requires logging.file_path",
                ));
            }
            Some(path) if path.file_name().is_none() => {
                return Err(ConfigError::validation(format!(
                    "Log file path has no file name: {}",
                    path.display()
                )));
            }
            Some(_) => {}
        }
    }

    for (module, level) in &logging.filters {
        if module.is_empty() {
            return Err(ConfigError::validation("Log filter module cannot be empty"));
        }
        if let Err(e) = level.parse::<LogLevel>() {
            return Err(ConfigError::validation(format!(
                "Invalid log filter for {module}: {e}. Valid values are: {:?}",
                LogLevel::ALL.map(LogLevel::as_str)
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&MiraikitConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_file_output_without_path() {
        let mut config = MiraikitConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some(PathBuf::from("/"));
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some(PathBuf::from("logs/miraikit.log"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_filter_level() {
        let mut config = MiraikitConfig::default();
        config
            .logging
            .filters
            .insert("miraikit_mirai".into(), "loud".into());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("miraikit_mirai"));

        config
            .logging
            .filters
            .insert("miraikit_mirai".into(), "TRACE".into());
        assert!(validate_config(&config).is_ok());

        config.logging.filters.insert(String::new(), "info".into());
        assert!(validate_config(&config).is_err());
    }
}
