//! CLI configuration: thin wrapper around `fieldlink_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--host, --port, --secure, --timeout).

use std::time::Duration;

use fieldlink_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use fieldlink_config::{
    Config, DEFAULT_PROFILE, Profile, config_path, load_config, load_config_or_default,
    profile_to_controller_config, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.into())
}

/// Build the `ControllerConfig` for this invocation.
///
/// Precedence: CLI flag / `FIELDLINK_*` flag env > profile > defaults.
pub fn resolve_controller_config(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<ControllerConfig, CliError> {
    let name = active_profile_name(global, cfg);
    let (_, mut profile) = cfg.resolve_profile(Some(&name)).map_err(|_| {
        CliError::ProfileNotFound {
            name: name.clone(),
            available: available_profiles(cfg),
        }
    })?;

    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(port) = global.port {
        profile.port = port;
    }
    if global.secure {
        profile.secure = true;
    }

    let mut controller = profile_to_controller_config(&profile, &cfg.defaults)?;
    if let Some(secs) = global.timeout {
        controller.timeout = Duration::from_secs(secs);
    }
    Ok(controller)
}

/// Comma-separated profile names for help text.
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
