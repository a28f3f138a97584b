//! Configuration validation.

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate everything that does not need a live session.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_poll(config, &mut result);
        Self::validate_storage(config, &mut result);
        Self::validate_classifier(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    /// Validate the configuration, including credentials for a Discord session.
    pub fn validate_for_session(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = Self::validate(config)?;
        Self::validate_credentials(config, &mut result);
        Ok(result)
    }

    fn validate_credentials(config: &Config, result: &mut ValidationResult) {
        let creds = &config.credentials;
        let fields = [
            ("credentials.email", &creds.email),
            ("credentials.password", &creds.password),
            ("credentials.server_id", &creds.server_id),
            ("credentials.channel_id", &creds.channel_id),
        ];

        for (path, value) in fields {
            if value.trim().is_empty() {
                result.add_error(ValidationError::new(path, "must not be empty"));
            }
        }

        for (path, value) in [
            ("credentials.server_id", &creds.server_id),
            ("credentials.channel_id", &creds.channel_id),
        ] {
            if !value.is_empty() && !value.chars().all(|c| c.is_ascii_digit()) {
                result.add_error(ValidationError::new(
                    path,
                    format!("'{}' is not a numeric Discord id", value),
                ));
            }
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }

        if config.browser.ready_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.ready_timeout_secs",
                "ready_timeout_secs must be greater than 0",
            ));
        }

        if let Some(ref path) = config.browser.chrome_path {
            if !std::path::Path::new(path).exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Chrome binary does not exist: {}", path),
                ));
            }
        }
    }

    fn validate_poll(config: &Config, result: &mut ValidationResult) {
        if config.poll.interval_ms == 0 {
            result.add_error(ValidationError::new(
                "poll.interval_ms",
                "interval_ms must be greater than 0",
            ));
        } else if config.poll.interval_ms < 250 {
            result.add_warning(ValidationWarning::new(
                "poll.interval_ms",
                "interval_ms below 250 re-reads the whole channel very often",
            ));
        }

        if config.poll.deadline_secs == Some(0) {
            result.add_error(ValidationError::new(
                "poll.deadline_secs",
                "deadline_secs must be greater than 0, or unset to wait forever",
            ));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        if config.storage.output_dir.trim().is_empty() {
            result.add_error(ValidationError::new(
                "storage.output_dir",
                "Output directory cannot be empty",
            ));
        }

        if config.storage.download_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "storage.download_timeout_secs",
                "download_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_classifier(config: &Config, result: &mut ValidationResult) {
        for (name, pattern) in config.classifier.overrides() {
            if let Err(e) = Regex::new(pattern) {
                result.add_error(ValidationError::new(
                    format!("classifier.{}", name),
                    format!("Invalid pattern: {}", e),
                ));
            }
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, LOG_LEVELS
                ),
            ));
        }
    }
}
