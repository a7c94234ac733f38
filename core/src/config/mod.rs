use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const FARMGUARD_DIR: &str = ".farmguard";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmailConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEmail {
    pub api_key: String,
    pub base_url: Option<String>,
    pub from: String,
}

impl EmailConfig {
    /// Credentials from the environment, falling back to the file.
    pub fn resolve(&self) -> Option<ResolvedEmail> {
        let api_key = env_or(&["EMAIL_API_KEY", "FARMGUARD_EMAIL_API_KEY"], &self.api_key)?;
        let from = env_or(&["EMAIL_USER", "FARMGUARD_EMAIL_FROM"], &self.from)?;
        Some(ResolvedEmail {
            api_key,
            base_url: self.base_url.clone(),
            from,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTwilio {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl TwilioConfig {
    pub fn resolve(&self) -> Option<ResolvedTwilio> {
        Some(ResolvedTwilio {
            account_sid: env_or(&["TWILIO_SID", "TWILIO_ACCOUNT_SID"], &self.account_sid)?,
            auth_token: env_or(&["TWILIO_AUTH", "TWILIO_AUTH_TOKEN"], &self.auth_token)?,
            from_number: env_or(&["TWILIO_PHONE", "TWILIO_FROM_NUMBER"], &self.from_number)?,
        })
    }
}

pub(crate) fn env_or(env_vars: &[&str], config_value: &str) -> Option<String> {
    env_vars
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.trim().is_empty())
        .or_else(|| (!config_value.trim().is_empty()).then(|| config_value.to_string()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_iterations: usize,
    pub model_timeout_secs: u64,
    pub tool_timeout_secs: u64,
    pub channel_timeout_secs: u64,
    pub email: EmailConfig,
    pub twilio: TwilioConfig,
    #[serde(skip)]
    pub workspace_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: None,
            api_key: String::new(),
            base_url: None,
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.3,
            max_iterations: 20,
            model_timeout_secs: 120,
            tool_timeout_secs: 30,
            channel_timeout_secs: 20,
            email: EmailConfig::default(),
            twilio: TwilioConfig::default(),
            workspace_dir: get_farmguard_dir().join("workspace"),
        }
    }
}

pub fn get_farmguard_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(FARMGUARD_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_farmguard_dir().join("config.toml")
}

pub fn ensure_farmguard_dir() -> Result<PathBuf> {
    let dir = get_farmguard_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).with_context(|| {
            format!("Failed to create farmguard directory at {}", dir.display())
        })?;
    }

    Ok(dir)
}

impl Config {
    /// Per-channel alert timeout, capped one second under the tool timeout.
    pub fn channel_timeout(&self) -> Duration {
        let cap = self.tool_timeout_secs.saturating_sub(1).max(1);
        Duration::from_secs(self.channel_timeout_secs.clamp(1, cap))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.workspace_dir = get_farmguard_dir().join("workspace");
        Ok(config)
    }
}

pub fn load_config() -> Result<Config> {
    let config_path = get_config_path();

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found. Run 'farmguard onboard' to set up your configuration."
            )
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", config_path.display(), e)
        }
    })?;

    Config::from_toml(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))
}

pub fn save_config(config: &Config) -> Result<()> {
    ensure_farmguard_dir()?;

    let config_path = get_config_path();
    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}
