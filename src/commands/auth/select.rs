use anyhow::{bail, Result};

use crate::config::Config;
use crate::ui::select_index;

pub async fn select_command(name: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let name = match name {
        Some(name) => name,
        None => {
            let names = config.list_profiles();
            if names.is_empty() {
                bail!("No profiles configured. Run 'mediactl auth add' first.");
            }
            let index = select_index("Select profile", &names)?;
            names[index].to_string()
        }
    };

    config.select_profile(&name)?;
    config.save()?;
    println!("✓ Current profile: {}", name);
    Ok(())
}

pub async fn list_command() -> Result<()> {
    let config = Config::load()?;

    if config.profiles.is_empty() {
        println!("No profiles configured.");
        println!("Run 'mediactl auth add' to create one.");
        return Ok(());
    }

    for name in config.list_profiles() {
        let profile = &config.profiles[name];
        if config.current_profile.as_deref() == Some(name) {
            println!("  ● {} (current) — partner {}", name, profile.partner_id);
        } else {
            println!("  ○ {} — partner {}", name, profile.partner_id);
        }
    }
    Ok(())
}
