use anyhow::Result;
use log::info;

use crate::config::Config;
use crate::ui::prompt_remove_confirmation;

pub async fn remove_command(name: String, force: bool) -> Result<()> {
    let mut config = Config::load()?;

    if !config.profiles.contains_key(&name) {
        println!("Profile '{}' not found.", name);
        println!("Available profiles:");
        for profile_name in config.list_profiles() {
            println!("  ○ {}", profile_name);
        }
        return Ok(());
    }

    if config.current_profile.as_deref() == Some(name.as_str()) {
        println!("⚠ Warning: '{}' is the current profile", name);
    }

    let confirm = if force {
        true
    } else {
        prompt_remove_confirmation(&name)?
    };

    if !confirm {
        println!("Removal cancelled.");
        return Ok(());
    }

    config.remove_profile(&name)?;
    config.save()?;
    info!("Removed profile '{}'", name);
    println!("✓ Profile '{}' removed", name);

    if config.current_profile.is_none() {
        println!("No current profile selected. Run 'mediactl auth select' to choose one.");
    }
    Ok(())
}
