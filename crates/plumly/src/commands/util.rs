//! Shared helpers for command handlers.

use std::sync::Arc;
use std::time::Duration;

use plumly_config::Config;
use plumly_core::{LightpadId, LoggingAccessoryLayer, Platform, PlatformConfig};
use tokio::sync::broadcast::error::RecvError;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the config file and apply CLI overrides.
pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = plumly_config::load_config()?;
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    Ok(cfg)
}

/// Build a platform with resolved credentials.
pub fn build_platform(global: &GlobalOpts) -> Result<Platform, CliError> {
    let cfg = load_config(global)?;
    let platform_config: PlatformConfig = plumly_config::to_platform_config(&cfg)?;
    tracing::debug!(cloud_url = %platform_config.cloud_url, "building platform");
    Ok(Platform::new(
        platform_config,
        Arc::new(LoggingAccessoryLayer),
    )?)
}

/// Start the platform, then wait until `lpid` is reachable or `wait` elapses.
pub async fn start_for_device(
    global: &GlobalOpts,
    lpid: &LightpadId,
    wait: Duration,
) -> Result<Platform, CliError> {
    let platform = build_platform(global)?;
    // Subscribe before starting so no reachability event is missed.
    let mut events = platform.registry().events();
    platform.start_discovery().await?;
    if let Err(e) = platform.refresh_topology().await {
        platform.shutdown().await;
        return Err(e.into());
    }

    let ready = |p: &Platform| p.registry().get(lpid).is_some_and(|h| h.reachable);

    let deadline = tokio::time::sleep(wait);
    tokio::pin!(deadline);

    while !ready(&platform) {
        tokio::select! {
            () = &mut deadline => break,
            event = events.recv() => {
                if matches!(event, Err(RecvError::Closed)) {
                    break;
                }
            }
        }
    }

    if ready(&platform) {
        return Ok(platform);
    }
    let known = platform.registry().contains(lpid);
    platform.shutdown().await;
    if known {
        Err(CliError::Unreachable {
            lpid: lpid.to_string(),
        })
    } else {
        Err(CliError::NotFound {
            lpid: lpid.to_string(),
        })
    }
}
