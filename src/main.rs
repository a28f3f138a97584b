//! mjbridge - Midjourney through a Discord browser session.
//!
//! Main entry point for the mjbridge CLI.

mod cli;
mod cmd_session;
mod cmd_split;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mjbridge_config::{Config, ConfigError, ConfigLoader, LoggingConfig};

use cli::{Cli, Commands};

/// Get the mjbridge home directory (~/.mjbridge).
fn mjbridge_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mjbridge")
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = match &logging.dir {
        Some(dir) => PathBuf::from(ConfigLoader::expand_path(dir)),
        None => mjbridge_dir().join("logs"),
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("mjbridge")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Loaded configuration and what was off about it.
struct LoadedConfig {
    config: Config,
    found: bool,
    unset_vars: Vec<String>,
}

/// Load the config file, falling back to defaults when it does not exist.
///
/// Commands that never touch the session do not need the credentials, so
/// for them unset `${VAR}` references are tolerated.
fn load_config(path: &Path, needs_session: bool) -> Result<LoadedConfig, ConfigError> {
    let loaded = if needs_session {
        ConfigLoader::load(path).map(|config| (config, Vec::new()))
    } else {
        ConfigLoader::load_lenient(path)
    };

    match loaded {
        Ok((config, unset_vars)) => Ok(LoadedConfig {
            config,
            found: true,
            unset_vars,
        }),
        Err(ConfigError::NotFound(_)) => Ok(LoadedConfig {
            config: Config::default(),
            found: false,
            unset_vars: Vec::new(),
        }),
        Err(e) => Err(e),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let needs_session = !matches!(cli.command, Commands::Split { .. });
    let LoadedConfig {
        config,
        found,
        unset_vars,
    } = load_config(&cli.config, needs_session)?;
    init_tracing(&config.logging)?;
    if !found {
        warn!(
            "Config file {} not found, using defaults",
            cli.config.display()
        );
    }
    if !unset_vars.is_empty() {
        debug!("Unset config variables left empty: {}", unset_vars.join(", "));
    }

    match cli.command {
        Commands::Imagine {
            prompt,
            timeout_secs,
            output_dir,
        } => cmd_session::imagine(config, &prompt, timeout_secs, output_dir).await,
        Commands::Login => cmd_session::login(config).await,
        Commands::Split { image, output_dir } => {
            for path in cmd_split::split(&config, &image, output_dir)? {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_split_tolerates_unset_credentials() {
        let file = config_file(
            "[credentials]\nemail = \"${MJBRIDGE_UNSET_SPLIT_EMAIL_4242}\"\n\n[storage]\noutput_dir = \"./grids\"\n",
        );

        let loaded = load_config(file.path(), false).unwrap();
        assert!(loaded.found);
        assert_eq!(loaded.config.storage.output_dir, "./grids");
        assert_eq!(loaded.unset_vars, vec!["MJBRIDGE_UNSET_SPLIT_EMAIL_4242".to_string()]);

        assert!(matches!(
            load_config(file.path(), true),
            Err(ConfigError::EnvVarNotSet(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let loaded = load_config(Path::new("/nonexistent/mjbridge.toml"), true).unwrap();
        assert!(!loaded.found);
        assert_eq!(loaded.config.poll.interval_ms, 1000);
    }
}
