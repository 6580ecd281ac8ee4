//! Config subcommand handlers.

use dialoguer::{Confirm, Input};
use serde::Serialize;
use tabled::Tabled;

use fieldlink_core::config::{DEFAULT_HOST, DEFAULT_PORT};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

#[derive(Clone, Serialize, Tabled)]
struct ProfileRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Default")]
    default: String,
}

fn profile_rows(cfg: &Config) -> Vec<ProfileRow> {
    let default = cfg
        .default_profile
        .as_deref()
        .unwrap_or(config::DEFAULT_PROFILE);
    cfg.profiles
        .iter()
        .map(|(name, profile)| ProfileRow {
            name: name.clone(),
            url: config::profile_to_controller_config(profile, &cfg.defaults)
                .ok()
                .and_then(|c| c.ws_url().ok())
                .map_or_else(|| "(invalid)".into(), |u| u.to_string()),
            default: if name == default { "*".into() } else { String::new() },
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("fieldlink configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(config::DEFAULT_PROFILE.into())
                .interact_text()
                .map_err(prompt_err)?;

            let host: String = Input::new()
                .with_prompt("Controller host")
                .default(DEFAULT_HOST.into())
                .interact_text()
                .map_err(prompt_err)?;

            let secure = Confirm::new()
                .with_prompt("Connect through a TLS proxy (wss)?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile {
                host,
                secure,
                ..Profile::default()
            };
            if !secure {
                profile.port = Input::new()
                    .with_prompt("Controller port")
                    .default(DEFAULT_PORT)
                    .interact_text()
                    .map_err(prompt_err)?;
            }

            // Reject before writing anything.
            let url = config::profile_to_controller_config(&profile, &cfg.defaults)?.ws_url()?;

            let make_default = cfg.profiles.is_empty()
                || Confirm::new()
                    .with_prompt(format!("Make '{profile_name}' the default profile?"))
                    .default(true)
                    .interact()
                    .map_err(prompt_err)?;

            cfg.profiles.insert(profile_name.clone(), profile);
            if make_default {
                cfg.default_profile = Some(profile_name.clone());
            }
            config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Profile '{profile_name}' -> {url}");
            eprintln!("\n  Test it: fieldlink status");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_default(),
                |c| {
                    c.default_profile
                        .clone()
                        .unwrap_or_else(|| config::DEFAULT_PROFILE.into())
                },
            )?;
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() && global.output == OutputFormat::Table {
                eprintln!("No profiles configured. Run: fieldlink config init");
                return Ok(());
            }
            let rows = profile_rows(&cfg);
            let out = output::render_list(
                global.output,
                &rows,
                ProfileRow::clone,
                |r| r.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("Default profile set to '{name}'");
            Ok(())
        }
    }
}
