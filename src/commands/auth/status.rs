use anyhow::Result;
use colored::Colorize;
use log::{error, info};

use crate::api::PlatformClient;
use crate::config::Config;

pub async fn status_command() -> Result<()> {
    let config = Config::load()?;

    println!("mediactl authentication status");
    println!("==============================");

    if config.profiles.is_empty() && Config::profile_from_env()?.is_none() {
        println!("No profiles configured and no PARTNER_ID/ADMIN_SECRET in the environment.");
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

    let profile = match config.resolve_profile(None) {
        Ok(profile) => profile,
        Err(err) => {
            println!("\nNo usable profile: {}", err);
            return Ok(());
        }
    };

    println!("\nTesting session against {}...", profile.service_url);
    match PlatformClient::connect(&profile).await {
        Ok(_) => {
            info!("Session test successful for partner {}", profile.partner_id);
            println!(
                "{}",
                format!("✓ Session opened for partner {}", profile.partner_id).green()
            );
        }
        Err(e) => {
            error!("Session test failed: {}", e);
            println!("{}", format!("✗ Session failed: {}", e).red());
        }
    }
    Ok(())
}
