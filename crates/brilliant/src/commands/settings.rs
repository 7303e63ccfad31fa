//! Profile settings handlers.

use serde::Serialize;

use brilliant_core::{App, SettingsPatch, UserSettings};

use crate::cli::{GlobalOpts, ImageCommand, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

/// The profile as shown to the user: the image blob is summarized.
#[derive(Serialize)]
struct ProfileView {
    name: String,
    email: String,
    phone_number: String,
    instagram_username: String,
    website_url: String,
    youtube_channel: String,
    palette: String,
    save_path: String,
    image_bytes: usize,
    updated_at: String,
}

impl From<UserSettings> for ProfileView {
    fn from(s: UserSettings) -> Self {
        Self {
            image_bytes: s.image_blob.as_ref().map_or(0, Vec::len),
            name: s.name,
            email: s.email,
            phone_number: s.phone_number,
            instagram_username: s.instagram_username,
            website_url: s.website_url,
            youtube_channel: s.youtube_channel,
            palette: s.pallet,
            save_path: s.save_path,
            updated_at: s.updated_at,
        }
    }
}

fn detail(p: &ProfileView) -> String {
    let image = if p.image_bytes == 0 {
        "none".to_owned()
    } else {
        format!("{} bytes", p.image_bytes)
    };
    output::detail_lines(&[
        ("Name", p.name.clone()),
        ("Email", p.email.clone()),
        ("Phone", p.phone_number.clone()),
        ("Instagram", p.instagram_username.clone()),
        ("Website", p.website_url.clone()),
        ("YouTube", p.youtube_channel.clone()),
        ("Palette", p.palette.clone()),
        ("Save path", p.save_path.clone()),
        ("Image", image),
        ("Updated", p.updated_at.clone()),
    ])
}

fn print_profile(settings: UserSettings, global: &GlobalOpts) {
    let view = ProfileView::from(settings);
    let out = output::render_single(&global.output, &view, detail, |p| p.name.clone());
    output::print_output(&out, global.quiet);
}

pub async fn handle(app: &App, args: SettingsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let settings = app.open_settings().await?;

    match args.command {
        SettingsCommand::Show => {
            print_profile(settings.get().await?, global);
            Ok(())
        }

        SettingsCommand::Set {
            name,
            email,
            phone,
            instagram,
            website,
            youtube,
            palette,
            save_path,
        } => {
            let patch = SettingsPatch {
                name,
                email,
                phone_number: phone,
                instagram_username: instagram,
                website_url: website,
                youtube_channel: youtube,
                save_path,
                palette,
            };
            let saved = settings.update(&patch).await?;
            if !global.quiet {
                eprintln!("Settings saved");
            }
            print_profile(saved, global);
            Ok(())
        }

        SettingsCommand::Image(image) => match image.command {
            ImageCommand::Set { path } => {
                let bytes = util::read_image(&path)?;
                let format = settings.set_image(&bytes).await?;
                if !global.quiet {
                    eprintln!("Profile image saved ({format}, {} bytes)", bytes.len());
                }
                Ok(())
            }

            ImageCommand::Get { path } => match settings.image().await? {
                Some(bytes) => {
                    std::fs::write(&path, &bytes)?;
                    if !global.quiet {
                        eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
                    }
                    Ok(())
                }
                None => Err(CliError::NotFound {
                    resource_type: "Profile image".into(),
                    identifier: "current profile".into(),
                    list_command: "settings show".into(),
                }),
            },

            ImageCommand::Remove => {
                if !util::confirm("Remove the profile image?", global.yes)? {
                    return Ok(());
                }
                settings.remove_image().await?;
                if !global.quiet {
                    eprintln!("Profile image removed");
                }
                Ok(())
            }
        },
    }
}
