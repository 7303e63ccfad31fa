//! Verification cache inspection.

use serde::Serialize;

use brilliant_core::{App, LicenseStatus};

use crate::cli::{CacheArgs, CacheCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

#[derive(Serialize)]
struct CacheReport {
    key: String,
    stored_at: String,
    age_secs: i64,
    ttl_secs: u64,
    fresh: bool,
    is_activated: bool,
    already_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    license_status: Option<LicenseStatus>,
}

fn detail(r: &CacheReport, color: bool) -> String {
    let fresh = if r.fresh {
        output::paint("fresh", Tone::Good, color)
    } else {
        output::paint("stale", Tone::Warn, color)
    };
    let mut pairs = vec![
        ("Key", r.key.clone()),
        ("Stored", r.stored_at.clone()),
        ("Age", format!("{}s of {}s", r.age_secs, r.ttl_secs)),
        ("State", fresh),
        ("Activated", util::yes_no(r.is_activated)),
        ("Verified", util::yes_no(r.already_verified)),
    ];
    if let Some(ref status) = r.license_status {
        pairs.push(("Status", status.status.to_string()));
    }
    output::detail_lines(&pairs)
}


pub fn handle(app: &App, args: CacheArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let gate = app.gate();
    let cache = gate.cache();

    match args.command {
        CacheCommand::Show => {
            let Some(entry) = cache.peek()? else {
                if !global.quiet {
                    eprintln!("No verification record is cached.");
                }
                return Ok(());
            };

            let report = CacheReport {
                key: cache.key().to_owned(),
                stored_at: entry.inserted_at.to_rfc3339(),
                age_secs: cache.age(&entry).num_seconds(),
                ttl_secs: cache.ttl().as_secs(),
                fresh: cache.is_fresh(&entry),
                is_activated: entry.value.is_activated,
                already_verified: entry.value.already_verified,
                license_status: entry.value.license_status.clone(),
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &report,
                |r| detail(r, color),
                |r| if r.fresh { "fresh" } else { "stale" }.into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CacheCommand::Clear => {
            gate.clear_cache()?;
            if !global.quiet {
                eprintln!("Verification cache cleared.");
            }
            Ok(())
        }
    }
}
