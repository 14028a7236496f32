use crate::config::types::{AnalysisConfig, Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_analysis_config(&config.analysis)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be > 0, got {}",
            config.timeout_seconds
        )));
    }

    Ok(())
}

/// Validates analysis configuration
fn validate_analysis_config(config: &AnalysisConfig) -> Result<(), ConfigError> {
    if config.min_word_length < 1 {
        return Err(ConfigError::Validation(format!(
            "min_word_length must be >= 1, got {}",
            config.min_word_length
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if matches!(config.directory.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "directory cannot be empty".to_string(),
        ));
    }

    if matches!(config.report_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "report_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
