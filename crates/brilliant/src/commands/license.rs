//! License command handlers.

use serde::Serialize;

use brilliant_core::{
    App, GateState, GateView, LicenseInfo, LicenseState, LicenseStatus, MountOutcome,
};

use crate::cli::{GlobalOpts, LicenseArgs, LicenseCommand};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

// ── Report types ────────────────────────────────────────────────────

/// Gate outcome as printed by `license status`.
#[derive(Serialize)]
struct StatusReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    view: GateView,
    can_use_app: bool,
    is_activated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    license_status: Option<LicenseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license_info: Option<LicenseInfo>,
}

impl StatusReport {
    fn new(state: &GateState, outcome: Option<MountOutcome>) -> Self {
        Self {
            source: outcome.map(|o| o.to_string()),
            view: state.view(),
            can_use_app: state.can_use_app(),
            is_activated: state.is_activated,
            license_status: state.license_status.clone(),
            license_info: state.license_info.as_ref().map(masked),
        }
    }
}

/// Copy of `info` with the key masked.
fn masked(info: &LicenseInfo) -> LicenseInfo {
    LicenseInfo {
        key: info.masked_key(),
        ..info.clone()
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn view_label(view: &GateView, color: bool) -> String {
    match view {
        GateView::Verifying => output::paint("verifying", Tone::Warn, color),
        GateView::VerificationFailed { .. } => {
            output::paint("verification failed", Tone::Bad, color)
        }
        GateView::ActivationRequired => output::paint("activation required", Tone::Bad, color),
        GateView::Open { .. } => output::paint("open", Tone::Good, color),
    }
}

fn status_tone(status: &LicenseStatus) -> Tone {
    match &status.status {
        LicenseState::Valid => Tone::Good,
        LicenseState::NearExpiration => Tone::Warn,
        LicenseState::Other(_) if status.is_valid => Tone::Warn,
        _ => Tone::Bad,
    }
}

fn status_line(status: &LicenseStatus, color: bool) -> String {
    let word = output::paint(&status.status.to_string(), status_tone(status), color);
    if status.message.is_empty() {
        word
    } else {
        format!("{word} ({})", status.message)
    }
}

fn info_pairs(info: &LicenseInfo) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("Key", info.masked_key()),
        ("Machine", info.machine_code.clone()),
        ("Product", info.product_id.clone()),
        ("Premium", if info.premium { "yes" } else { "no" }.into()),
        (
            "Expires",
            format!("{} ({} days)", info.expires, info.days_until_expiry),
        ),
        ("Offline", format!("{} days allowed", info.max_offline_days)),
    ];
    if let Some(ref last) = info.last_activation {
        pairs.push(("Activated", last.clone()));
    }
    pairs
}

fn status_detail(report: &StatusReport, color: bool) -> String {
    let mut pairs: Vec<(&str, String)> = vec![("Gate", view_label(&report.view, color))];
    if let Some(ref source) = report.source {
        pairs.push(("Source", source.clone()));
    }
    match &report.view {
        GateView::VerificationFailed { error } => pairs.push(("Error", error.clone())),
        GateView::Open {
            expiry_warning: Some(days),
            ..
        } => pairs.push((
            "Warning",
            output::paint(&format!("license expires in {days} days"), Tone::Warn, color),
        )),
        _ => {}
    }
    if let Some(ref status) = report.license_status {
        pairs.push(("Status", status_line(status, color)));
    }
    if let Some(ref info) = report.license_info {
        pairs.extend(info_pairs(info));
    }
    output::detail_lines(&pairs)
}

fn print_status(report: &StatusReport, global: &GlobalOpts) {
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        report,
        |r| status_detail(r, color),
        |r| view_label(&r.view, false),
    );
    output::print_output(&out, global.quiet);
}

fn notice(message: &str, global: &GlobalOpts) {
    if !global.quiet && !message.is_empty() {
        eprintln!("{message}");
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(app: &App, args: LicenseArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let gate = app.gate();

    match args.command {
        LicenseCommand::Status => {
            let pb = output::spinner(global, "Verifying license...");
            let outcome = gate.mount().await;
            pb.finish_and_clear();
            print_status(&StatusReport::new(&gate.state(), Some(outcome)), global);
            Ok(())
        }

        LicenseCommand::Activate { key } => {
            let key = util::license_key(key)?;
            let pb = output::spinner(global, "Activating license...");
            let result = gate.activate_license(&key).await;
            pb.finish_and_clear();
            notice(&result?, global);
            print_status(&StatusReport::new(&gate.state(), None), global);
            Ok(())
        }

        LicenseCommand::Renew => {
            let pb = output::spinner(global, "Renewing license...");
            let result = gate.renew_license().await;
            pb.finish_and_clear();
            notice(&result?, global);
            print_status(&StatusReport::new(&gate.state(), None), global);
            Ok(())
        }

        LicenseCommand::Deactivate => {
            if !util::confirm(
                "Release the license from this machine? The catalog will be locked.",
                global.yes,
            )? {
                return Ok(());
            }
            let message = gate.deactivate_license().await?;
            notice(&message, global);
            Ok(())
        }

        LicenseCommand::Validate => {
            let status = gate.validate_license().await?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &status,
                |s| {
                    let mut pairs = vec![
                        ("Status", status_line(s, color)),
                        ("Valid", if s.is_valid { "yes" } else { "no" }.into()),
                    ];
                    if let Some(days) = s.days_remaining {
                        pairs.push(("Remaining", format!("{days} days")));
                    }
                    output::detail_lines(&pairs)
                },
                |s| s.status.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LicenseCommand::Info => {
            let info = masked(&gate.get_license_info().await?);
            let out = output::render_single(
                &global.output,
                &info,
                |i| output::detail_lines(&info_pairs(i)),
                |i| i.key.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LicenseCommand::MachineCode => {
            let code = gate.get_machine_code().await?;
            let out = output::render_single(&global.output, &code, String::clone, String::clone);
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
