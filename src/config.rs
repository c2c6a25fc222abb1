use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::api::{DEFAULT_PRIVILEGES, DEFAULT_SESSION_EXPIRY};

/// Credentials and session parameters for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default = "default_service_url")]
    pub service_url: String,
    pub partner_id: i64,
    pub admin_secret: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default = "default_privileges")]
    pub privileges: String,
    #[serde(default = "default_session_expiry")]
    pub session_expiry: i64,
}

fn default_service_url() -> String {
    "https://www.kaltura.com".to_string()
}

fn default_privileges() -> String {
    DEFAULT_PRIVILEGES.to_string()
}

fn default_session_expiry() -> i64 {
    DEFAULT_SESSION_EXPIRY
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory that receives timestamped report files.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,
    /// Timezone used when rendering timestamps in reports.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Caption label treated as auto-generated.
    #[serde(default = "default_caption_label")]
    pub caption_label: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_reports_dir() -> String {
    "reports".to_string()
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

fn default_caption_label() -> String {
    "English (auto-generated)".to_string()
}

fn default_page_size() -> u32 {
    500
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir(),
            timezone: default_timezone(),
            caption_label: default_caption_label(),
            page_size: default_page_size(),
        }
    }
}

/// Site-specific knobs for channel creation and lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelSettings {
    /// Parent category for new channels.
    pub parent_id: Option<i64>,
    /// Category fullName prefix, e.g. `MediaSpace>site>channels>`.
    #[serde(default = "default_full_name_prefix")]
    pub full_name_prefix: String,
    /// Portal base URL used to build channel links in reports.
    pub base_url: Option<String>,
    #[serde(default = "default_privacy_context")]
    pub privacy_context: String,
    #[serde(default = "default_user_join_policy")]
    pub user_join_policy: i64,
    #[serde(default = "default_appear_in_list")]
    pub appear_in_list: i64,
    #[serde(default = "default_inheritance_type")]
    pub inheritance_type: i64,
    #[serde(default = "default_permission_level")]
    pub default_permission_level: i64,
    #[serde(default = "default_contribution_policy")]
    pub contribution_policy: i64,
    #[serde(default)]
    pub moderation: i64,
    /// Metadata profile holding the channel playlists document.
    pub metadata_profile_id: Option<i64>,
}

fn default_full_name_prefix() -> String {
    "MediaSpace>site>channels>".to_string()
}

fn default_privacy_context() -> String {
    "MediaSpace".to_string()
}

fn default_user_join_policy() -> i64 {
    3
}

fn default_appear_in_list() -> i64 {
    3
}

fn default_inheritance_type() -> i64 {
    2
}

fn default_permission_level() -> i64 {
    3
}

fn default_contribution_policy() -> i64 {
    2
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    pub current_profile: Option<String>,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub channels: ChannelSettings,
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("mediactl")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".mediactl")
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        debug!("Saved config to: {:?}", config_path);
        Ok(())
    }

    pub fn list_profiles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    pub fn add_profile(&mut self, name: String, profile: Profile) {
        // First profile added becomes the current one
        if self.current_profile.is_none() {
            self.current_profile = Some(name.clone());
        }
        self.profiles.insert(name, profile);
    }

    pub fn remove_profile(&mut self, name: &str) -> Result<()> {
        self.profiles
            .remove(name)
            .with_context(|| format!("Profile '{}' not found", name))?;
        if self.current_profile.as_deref() == Some(name) {
            self.current_profile = None;
        }
        Ok(())
    }

    pub fn select_profile(&mut self, name: &str) -> Result<()> {
        if !self.profiles.contains_key(name) {
            bail!("Profile '{}' not found", name);
        }
        self.current_profile = Some(name.to_string());
        Ok(())
    }

    /// Resolve the profile a command should run against.
    ///
    /// Priority: explicit `--profile` name, then a complete set of
    /// environment variables (`PARTNER_ID` + `ADMIN_SECRET`, typically via
    /// `.env`), then the configured current profile.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<Profile> {
        if let Some(name) = name {
            return self
                .profiles
                .get(name)
                .cloned()
                .with_context(|| format!("Profile '{}' not found", name));
        }

        if let Some(profile) = Self::profile_from_env()? {
            debug!("Using credentials from environment");
            return Ok(profile);
        }

        let current = self.current_profile.as_deref().context(
            "No profile configured. Run 'mediactl auth add' or set PARTNER_ID/ADMIN_SECRET",
        )?;
        self.profiles
            .get(current)
            .cloned()
            .with_context(|| format!("Current profile '{}' no longer exists", current))
    }

    /// Build a profile purely from environment variables, if present.
    pub fn profile_from_env() -> Result<Option<Profile>> {
        let partner_id = match std::env::var("PARTNER_ID") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .context("PARTNER_ID must be an integer")?,
            Err(_) => return Ok(None),
        };
        let admin_secret = match std::env::var("ADMIN_SECRET") {
            Ok(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
            _ => return Ok(None),
        };

        Ok(Some(Profile {
            service_url: std::env::var("SERVICE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| default_service_url()),
            partner_id,
            admin_secret,
            user_id: std::env::var("USER_ID").unwrap_or_default(),
            privileges: std::env::var("PRIVILEGES").unwrap_or_else(|_| default_privileges()),
            session_expiry: default_session_expiry(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(partner_id: i64) -> Profile {
        Profile {
            service_url: default_service_url(),
            partner_id,
            admin_secret: "secret".into(),
            user_id: String::new(),
            privileges: default_privileges(),
            session_expiry: default_session_expiry(),
        }
    }

    #[test]
    fn test_first_profile_becomes_current() {
        let mut config = Config::default();
        config.add_profile("prod".into(), profile(101));
        config.add_profile("test".into(), profile(102));
        assert_eq!(config.current_profile.as_deref(), Some("prod"));
    }

    #[test]
    fn test_remove_current_profile_clears_selection() {
        let mut config = Config::default();
        config.add_profile("prod".into(), profile(101));
        config.remove_profile("prod").unwrap();
        assert!(config.current_profile.is_none());
        assert!(config.remove_profile("prod").is_err());
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = Config::default();
        config.add_profile("prod".into(), profile(101));
        config.channels.parent_id = Some(7);

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.profiles["prod"].partner_id, 101);
        assert_eq!(parsed.channels.parent_id, Some(7));
        assert_eq!(parsed.settings.page_size, 500);
        assert_eq!(parsed.profiles["prod"].privileges, DEFAULT_PRIVILEGES);
    }

    #[test]
    fn test_select_unknown_profile_fails() {
        let mut config = Config::default();
        assert!(config.select_profile("nope").is_err());
    }
}
