//! Configuration loader.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Like [`ConfigLoader::load`], but an unset `${VAR}` becomes an empty
    /// string instead of an error. Returns the names of the unset variables.
    ///
    /// For commands that never read the values those variables feed.
    pub fn load_lenient(path: &Path) -> Result<(Config, Vec<String>), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str_lenient(&content)
    }

    pub fn load_str_lenient(content: &str) -> Result<(Config, Vec<String>), ConfigError> {
        let mut missing: Vec<String> = Vec::new();
        let expanded = ENV_VAR.replace_all(content, |cap: &Captures<'_>| {
            std::env::var(&cap[1]).unwrap_or_else(|_| {
                if !missing.iter().any(|name| name == &cap[1]) {
                    missing.push(cap[1].to_string());
                }
                String::new()
            })
        });
        let config: Config = toml::from_str(&expanded)?;
        Ok((config, missing))
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    ///
    /// Lets credentials stay out of the file, e.g. `password = "${MJ_PASSWORD}"`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_VAR.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.mjbridge`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.browser.debug_port, 9222);
        assert_eq!(config.poll.interval_ms, 1000);
        assert_eq!(config.storage.output_dir, "./images");
    }

    #[test]
    fn test_load_credentials() {
        let content = r#"
            [credentials]
            email = "artist@example.com"
            password = "secret"
            server_id = "1142869065577283806"
            channel_id = "1153420952768626838"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        let creds = config.credentials.to_credentials();
        assert_eq!(creds.email, "artist@example.com");
        assert_eq!(creds.server_id, "1142869065577283806");
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [browser]
            debug_port = 9333
            headless = true
            ready_timeout_secs = 30

            [poll]
            interval_ms = 500
            deadline_secs = 900

            [storage]
            output_dir = "/tmp/grids"

            [classifier]
            grid = ' - <@.+> \('

            [logging]
            level = "debug"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.browser.debug_port, 9333);
        assert!(config.browser.headless);
        assert_eq!(config.poll.interval_ms, 500);
        assert_eq!(config.poll.deadline_secs, Some(900));
        assert_eq!(config.storage.output_dir, "/tmp/grids");
        assert_eq!(config.classifier.grid.as_deref(), Some(r" - <@.+> \("));
        assert!(config.classifier.progress.is_none());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[poll]").unwrap();
        writeln!(file, "interval_ms = 2000").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.poll.interval_ms, 2000);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/mjbridge.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_lenient_load_blanks_unset_vars() {
        let content = r#"
[credentials]
email = "${MJBRIDGE_UNSET_EMAIL_31337}"
password = "${MJBRIDGE_UNSET_EMAIL_31337}"

[storage]
output_dir = "./grids"
"#;
        assert!(matches!(
            ConfigLoader::load_str(content),
            Err(ConfigError::EnvVarNotSet(_))
        ));

        let (config, missing) = ConfigLoader::load_str_lenient(content).unwrap();
        assert_eq!(config.credentials.email, "");
        assert_eq!(config.storage.output_dir, "./grids");
        assert_eq!(missing, vec!["MJBRIDGE_UNSET_EMAIL_31337".to_string()]);
    }

    #[test]
    fn test_lenient_load_nonexistent_file() {
        let result = ConfigLoader::load_lenient(Path::new("/nonexistent/path/mjbridge.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("MJBRIDGE_TEST_PASSWORD", "from-env");
        }
        let content = "[credentials]\npassword = \"${MJBRIDGE_TEST_PASSWORD}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.credentials.password, "from-env");
        unsafe {
            std::env::remove_var("MJBRIDGE_TEST_PASSWORD");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${MJBRIDGE_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_no_tilde() {
        assert_eq!(ConfigLoader::expand_path("/usr/local/bin"), "/usr/local/bin");
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/profile");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/profile"));
    }
}
