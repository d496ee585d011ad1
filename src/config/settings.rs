use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub slack: SlackConfig,
}

/// Webhook settings. `fields` lists the ticket fields worth reporting in the
/// attribute and change listings, in display order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SlackConfig {
    #[serde(default = "default_webhook")]
    pub webhook: String,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
}

fn default_webhook() -> String {
    "https://hooks.slack.com/services/".to_string()
}

fn default_channel() -> String {
    "#Trac".to_string()
}

fn default_username() -> String {
    "Trac-Bot".to_string()
}

fn default_fields() -> Vec<String> {
    vec![
        "type".to_string(),
        "component".to_string(),
        "resolution".to_string(),
    ]
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            webhook: default_webhook(),
            channel: default_channel(),
            username: default_username(),
            fields: default_fields(),
        }
    }
}

impl SlackConfig {
    /// Splits a comma-separated field list as entered in `init` or
    /// `config set slack.fields`.
    pub fn parse_fields(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!("{}", crate::errors::NotifyError::ConfigNotFound);
        }

        let config_str = std::fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let settings: Settings = toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("{}", crate::errors::NotifyError::ConfigInvalid(e.to_string())))?;

        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, config_str)
            .context("Failed to write config file")?;

        // the webhook URL embeds a secret token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&config_path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&config_path, perms)?;
        }

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".ticketping"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let settings = Settings {
            slack: SlackConfig {
                webhook: "https://hooks.slack.com/services/T0/B0/xyz".to_string(),
                channel: "#builds".to_string(),
                username: "ticket-bot".to_string(),
                fields: vec!["type".to_string(), "milestone".to_string()],
            },
        };

        let toml_str = toml::to_string(&settings).unwrap();
        assert!(toml_str.contains("https://hooks.slack.com/services/T0/B0/xyz"));
        assert!(toml_str.contains("#builds"));

        let deserialized: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.slack.channel, "#builds");
        assert_eq!(deserialized.slack.fields, vec!["type", "milestone"]);
    }

    #[test]
    fn test_config_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.slack.channel, "#Trac");
        assert_eq!(settings.slack.username, "Trac-Bot");
        assert_eq!(
            settings.slack.fields,
            vec!["type", "component", "resolution"]
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let settings: Settings =
            toml::from_str("[slack]\nchannel = \"#ops\"\n").unwrap();
        assert_eq!(settings.slack.channel, "#ops");
        assert_eq!(settings.slack.username, "Trac-Bot");
    }

    #[test]
    fn test_parse_fields() {
        assert_eq!(
            SlackConfig::parse_fields("type, component ,resolution"),
            vec!["type", "component", "resolution"]
        );
        assert_eq!(SlackConfig::parse_fields(""), Vec::<String>::new());
        assert_eq!(SlackConfig::parse_fields("milestone,,"), vec!["milestone"]);
    }
}
