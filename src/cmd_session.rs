//! Commands that drive the Discord session: `imagine` and `login`.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use mjbridge_config::{BrowserConfig, Config, ConfigValidator};
use mjbridge_core::{
    ArtifactStore, ClassifierPatterns, ImageCreator, ImageDownloader, MessageClassifier,
    PollOptions, ResultPoller,
};
use mjbridge_discord_browser::{BrowserSession, DiscordSession, LaunchConfig};
use mjbridge_protocols::{SessionBootstrap, SessionReady};

/// Tab to reuse when Chrome is already open.
const DISCORD_HOST: &str = "discord.com";

pub(crate) async fn imagine(
    config: Config,
    prompt: &str,
    timeout_secs: Option<u64>,
    output_dir: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    check_session_config(&config)?;
    let poller = build_poller(&config, timeout_secs, output_dir)?;
    let session = open_session(&config).await?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let mut creator = ImageCreator::new(session, poller);
    let result = creator.create_image(prompt, &cancel).await;

    if let Err(e) = creator.into_session().close().await {
        warn!("Failed to close browser session: {}", e);
    }

    for path in result? {
        println!("{}", path.display());
    }
    Ok(())
}

pub(crate) async fn login(config: Config) -> Result<(), Box<dyn Error>> {
    check_session_config(&config)?;
    let session = open_session(&config).await?;
    info!("Browser profile is logged in");
    session.close().await?;
    Ok(())
}

fn check_session_config(config: &Config) -> Result<(), Box<dyn Error>> {
    let warnings = ConfigValidator::validate_for_session(config)?.into_result()?;
    for warning in warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    Ok(())
}

/// Acquire the browser and make sure the channel is open and logged in.
/// The browser is released again if the bootstrap fails.
async fn open_session(config: &Config) -> Result<DiscordSession, Box<dyn Error>> {
    let browser = BrowserSession::acquire(launch_config(&config.browser), DISCORD_HOST).await?;
    let session = DiscordSession::new(browser, config.browser.ready_timeout());

    let credentials = config.credentials.to_credentials();
    let ready = session.ensure_authenticated_session(&credentials).await;
    match ready {
        Ok(SessionReady::AlreadyLoggedIn) | Ok(SessionReady::LoggedIn) => Ok(session),
        Err(e) => {
            if let Err(close_err) = session.close().await {
                warn!("Failed to close browser session: {}", close_err);
            }
            Err(e.into())
        }
    }
}

fn launch_config(browser: &BrowserConfig) -> LaunchConfig {
    LaunchConfig {
        debug_port: browser.debug_port,
        profile_dir: Some(browser.resolved_profile_dir()),
        chrome_path: browser.chrome_path.as_deref().map(PathBuf::from),
        headless: browser.headless,
        ..Default::default()
    }
}

/// Wire the poller from configuration. `--timeout-secs` wins over
/// `poll.deadline_secs`, `--output-dir` over `storage.output_dir`.
pub(crate) fn build_poller(
    config: &Config,
    timeout_secs: Option<u64>,
    output_dir: Option<PathBuf>,
) -> Result<ResultPoller, Box<dyn Error>> {
    let mut patterns = ClassifierPatterns::midjourney();
    for (name, pattern) in config.classifier.overrides() {
        patterns = patterns.with_override(name, pattern)?;
    }

    let downloader = ImageDownloader::new(config.storage.download_timeout())?;
    let store = ArtifactStore::new(output_dir.unwrap_or_else(|| config.storage.output_path()));
    let options = PollOptions {
        interval: config.poll.interval(),
        deadline: timeout_secs
            .map(Duration::from_secs)
            .or_else(|| config.poll.deadline()),
    };

    Ok(ResultPoller::new(
        MessageClassifier::new(patterns),
        downloader,
        store,
        options,
    ))
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Interrupted, stopping");
        cancel.cancel();
    }
}
