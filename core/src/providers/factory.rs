use crate::config::{Config, env_or};
use crate::providers::OpenAIProvider;
use crate::traits::Provider;
use anyhow::{Result, anyhow};

struct Preset {
    base_url: &'static str,
    env_vars: &'static [&'static str],
    model_env_vars: &'static [&'static str],
    needs_key: bool,
}

fn preset(provider_name: &str) -> Option<Preset> {
    match provider_name {
        "groq" => Some(Preset {
            base_url: "https://api.groq.com/openai/v1",
            env_vars: &["GROQ_API_KEY", "FARMGUARD_GROQ_API_KEY"],
            model_env_vars: &["GROQ_API_MODEL", "FARMGUARD_MODEL"],
            needs_key: true,
        }),
        "openai" => Some(Preset {
            base_url: "https://api.openai.com/v1",
            env_vars: &["OPENAI_API_KEY", "FARMGUARD_OPENAI_API_KEY"],
            model_env_vars: &["FARMGUARD_MODEL"],
            needs_key: true,
        }),
        "openrouter" => Some(Preset {
            base_url: "https://openrouter.ai/api/v1",
            env_vars: &["OPENROUTER_API_KEY", "FARMGUARD_OPENROUTER_API_KEY"],
            model_env_vars: &["FARMGUARD_MODEL"],
            needs_key: true,
        }),
        "ollama" => Some(Preset {
            base_url: "http://localhost:11434/v1",
            env_vars: &[],
            model_env_vars: &["FARMGUARD_MODEL"],
            needs_key: false,
        }),
        _ => None,
    }
}

pub fn create_provider(config: &Config) -> Result<Box<dyn Provider>> {
    let provider_name = config.provider.as_deref().unwrap_or("groq").to_lowercase();

    let preset = preset(&provider_name).ok_or_else(|| {
        anyhow!(
            "Unknown provider: {}. Available: groq, openai, openrouter, ollama",
            provider_name
        )
    })?;

    let api_key = if preset.needs_key {
        Some(resolve_api_key_with_fallback(preset.env_vars, &config.api_key)?)
    } else {
        None
    };

    let provider = OpenAIProvider::new(api_key)
        .with_model(resolve_model(&preset, config))
        .with_temperature(config.temperature)
        .with_base_url(config.base_url.as_deref().unwrap_or(preset.base_url));

    Ok(Box::new(provider))
}

/// `GROQ_API_MODEL` (or `FARMGUARD_MODEL`) wins over the configured model.
fn resolve_model(preset: &Preset, config: &Config) -> String {
    env_or(preset.model_env_vars, &config.model).unwrap_or_else(|| config.model.clone())
}

fn resolve_api_key_with_fallback(env_vars: &[&str], config_key: &str) -> Result<String> {
    for var_name in env_vars {
        if let Ok(key) = resolve_api_key_from_env(var_name) {
            return Ok(key);
        }
    }
    if !config_key.is_empty() {
        Ok(config_key.to_string())
    } else {
        Err(anyhow!(
            "No API key found. Set one of {} or run 'farmguard onboard'",
            env_vars.join(", ")
        ))
    }
}

fn resolve_api_key_from_env(var_name: &str) -> Result<String> {
    std::env::var(var_name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("Environment variable {} not set", var_name))
}
