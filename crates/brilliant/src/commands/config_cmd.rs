//! Config subcommand handlers.

use dialoguer::{Confirm, Input};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn render_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# unrenderable config: {e}"))
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config::config_path();
            eprintln!("Brilliant CLI configuration");
            eprintln!("   Config path: {}\n", path.display());

            let defaults = Config::default();

            let url: String = Input::new()
                .with_prompt("Backend URL")
                .default(defaults.backend.url.clone())
                .interact_text()
                .map_err(prompt_err)?;

            let timeout: u64 = Input::new()
                .with_prompt("Request timeout (seconds)")
                .default(defaults.backend.timeout)
                .interact_text()
                .map_err(prompt_err)?;

            let persist = Confirm::new()
                .with_prompt("Remember license verifications between runs?")
                .default(true)
                .interact()
                .map_err(prompt_err)?;

            let ttl: u64 = if persist {
                Input::new()
                    .with_prompt("Reuse a verification for how many seconds?")
                    .default(defaults.cache.ttl)
                    .interact_text()
                    .map_err(prompt_err)?
            } else {
                defaults.cache.ttl
            };

            let mut cfg = defaults;
            cfg.backend.url = url;
            cfg.backend.timeout = timeout;
            cfg.cache.persist = persist;
            cfg.cache.ttl = ttl;

            // Reject what the runtime would reject before writing it.
            cfg.to_app_config()?;
            let written = config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", written.display());
            eprintln!("\n  Test it: brilliant license status");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::apply_overrides(config::load_config()?, global);
            let out = output::render_single(&global.output, &cfg, render_toml, |c| {
                c.backend.url.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
