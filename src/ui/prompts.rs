use anyhow::{bail, Result};
use dialoguer::{Input, Password, Select};
use is_terminal::IsTerminal;

use crate::config::Profile;

/// Whether interactive prompts are possible at all.
pub fn interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Interactive confirmation prompt using arrow-key navigable selection
pub fn confirm(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = vec!["Yes", "No"];
    let default_index = if default_yes { 0 } else { 1 };

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(selection == 0)
}

/// Destructive-action gate: the user must type the keyword (e.g. `DELETE`)
/// verbatim. `skip` (from a `--yes` flag) bypasses the prompt.
pub fn confirm_typed(prompt: &str, keyword: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }
    if !interactive() {
        bail!(
            "Refusing to run a destructive operation without a terminal; pass --yes to override"
        );
    }

    let answer = Input::<String>::new().with_prompt(prompt).interact_text()?;
    Ok(answer.trim().eq_ignore_ascii_case(keyword))
}

/// Pick one of several destructive keywords (e.g. DELETE vs RECYCLE).
/// Returns the matched keyword, or `None` when the input matches nothing.
pub fn confirm_typed_choice(prompt: &str, keywords: &[&str]) -> Result<Option<String>> {
    if !interactive() {
        bail!("Refusing to run a destructive operation without a terminal");
    }

    let answer = Input::<String>::new().with_prompt(prompt).interact_text()?;
    let answer = answer.trim().to_uppercase();
    Ok(keywords
        .iter()
        .find(|k| k.eq_ignore_ascii_case(&answer))
        .map(|k| k.to_string()))
}

/// Simple text input prompt with optional default value
pub fn text_input(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(default_val) = default {
        input = input.default(default_val.to_string());
    }
    Ok(input.interact_text()?)
}

pub fn select_index(prompt: &str, items: &[&str]) -> Result<usize> {
    Ok(Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?)
}

pub fn prompt_overwrite_confirmation(name: &str) -> Result<bool> {
    confirm(
        &format!("Profile '{}' already exists. Overwrite?", name),
        false, // Default to "No" for safety
    )
}

pub fn prompt_remove_confirmation(name: &str) -> Result<bool> {
    confirm(&format!("Remove profile '{}'?", name), false)
}

/// Collect profile fields, prompting only for the ones not already given.
pub fn prompt_profile(
    service_url: Option<String>,
    partner_id: Option<i64>,
    admin_secret: Option<String>,
    user_id: Option<String>,
) -> Result<Profile> {
    let service_url_val = if let Some(u) = service_url {
        u
    } else {
        Input::<String>::new()
            .with_prompt("Service URL")
            .default("https://www.kaltura.com".to_string())
            .interact_text()?
    };

    let partner_id_val = if let Some(p) = partner_id {
        p
    } else {
        Input::<i64>::new()
            .with_prompt("Partner ID")
            .interact_text()?
    };

    let admin_secret_val = if let Some(s) = admin_secret {
        s
    } else {
        Password::new().with_prompt("Admin secret").interact()?
    };

    let user_id_val = if let Some(u) = user_id {
        u
    } else {
        Input::<String>::new()
            .with_prompt("Session user ID")
            .allow_empty(true)
            .interact_text()?
    };

    Ok(Profile {
        service_url: service_url_val.trim_end_matches('/').to_string(),
        partner_id: partner_id_val,
        admin_secret: admin_secret_val,
        user_id: user_id_val,
        privileges: crate::api::DEFAULT_PRIVILEGES.to_string(),
        session_expiry: crate::api::DEFAULT_SESSION_EXPIRY,
    })
}
