use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.watch_folders.is_empty() {
        return Err(ConfigError::Validation {
            message: "At least one watch folder is required".to_string(),
        });
    }

    if config.watch_folders.iter().any(|f| f.trim().is_empty()) {
        return Err(ConfigError::Validation {
            message: "Watch folder paths must not be empty".to_string(),
        });
    }

    if config.organized_root.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "organized_root must not be empty".to_string(),
        });
    }

    if config.retention == 0 {
        return Err(ConfigError::Validation {
            message: "retention must be greater than 0".to_string(),
        });
    }

    if config.report_batch == 0 {
        return Err(ConfigError::Validation {
            message: "report_batch must be greater than 0".to_string(),
        });
    }

    if config.inference.url.trim().is_empty() || config.inference.model.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "inference.url and inference.model are required".to_string(),
        });
    }

    for pattern in &config.ignore_patterns {
        if let Err(e) = glob::Pattern::new(pattern) {
            return Err(ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }

    Ok(())
}
