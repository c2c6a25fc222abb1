use anyhow::Result;
use log::info;

use crate::cli::commands::auth::AddArgs;
use crate::config::Config;
use crate::ui::{prompt_overwrite_confirmation, prompt_profile, text_input};

pub async fn add_command(args: AddArgs) -> Result<()> {
    let mut config = Config::load()?;

    let name = match args.name {
        Some(name) => name,
        None => text_input("Profile name (e.g. 'prod', 'test')", None)?,
    };

    if config.profiles.contains_key(&name) && !prompt_overwrite_confirmation(&name)? {
        println!("Nothing saved.");
        return Ok(());
    }

    let profile = prompt_profile(
        args.service_url,
        args.partner_id,
        args.admin_secret,
        args.user_id,
    )?;

    info!("Saving profile '{}' (partner {})", name, profile.partner_id);
    config.add_profile(name.clone(), profile);
    config.save()?;

    println!("✓ Profile '{}' saved", name);
    if config.current_profile.as_deref() == Some(name.as_str()) {
        println!("  It is now the current profile.");
    }
    Ok(())
}
