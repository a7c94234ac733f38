use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};
use farmguard_core::Session;
use farmguard_core::config::{Config, EmailConfig, TwilioConfig};
use std::path::Path;

const BANNER: &str = r"
    -------------------------------------

      F A R M G U A R D   🌾

      autonomous agricultural agent

    -------------------------------------
";

const PROVIDERS: &[(&str, &str)] = &[
    ("groq", "llama-3.3-70b-versatile"),
    ("openai", "gpt-4o-mini"),
    ("openrouter", "meta-llama/llama-3.3-70b-instruct"),
    ("ollama", "llama3.2"),
];

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

fn ensure_file(path: &Path, content: &str) -> Result<bool> {
    if !path.exists() {
        std::fs::write(path, content)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn create_workspace(workspace: &Path) -> Result<()> {
    std::fs::create_dir_all(workspace)?;
    ensure_file(&workspace.join("FARM.md"), DEFAULT_FARM_NOTES)?;
    Ok(())
}

pub const DEFAULT_FARM_NOTES: &str = r#"# FARM.md

Local notes FarmGuard reads on every turn. Keep them short.

## Region

- District: [e.g. Gulu]
- Rainy seasons: [e.g. March to May, August to November]

## Local Contacts

- Extension officer: [name, phone]
- Nearest agro-dealer: [name, location]
"#;

fn setup_provider() -> Result<(String, String)> {
    let names: Vec<&str> = PROVIDERS.iter().map(|(name, _)| *name).collect();

    let selection = Select::new()
        .with_prompt("Select your model provider")
        .items(&names)
        .default(0)
        .interact()
        .context("Failed to select provider")?;

    let (provider, default_model) = PROVIDERS[selection];

    let model: String = Input::new()
        .with_prompt("Model")
        .default(default_model.to_string())
        .interact_text()
        .context("Failed to read model")?;

    Ok((provider.to_string(), model))
}

fn setup_api_key(provider: &str) -> Result<String> {
    if provider == "ollama" {
        return Ok(String::new());
    }

    let api_key: String = Input::new()
        .with_prompt(format!("Enter your {} API key", provider))
        .interact_text()
        .context("Failed to read API key")?;

    if api_key.is_empty() {
        return Err(anyhow::anyhow!("API key cannot be empty"));
    }

    Ok(api_key)
}

fn setup_alerts() -> Result<(TwilioConfig, EmailConfig)> {
    let mut twilio = TwilioConfig::default();
    let mut email = EmailConfig::default();

    if Confirm::new()
        .with_prompt("Configure Twilio for SMS and voice alerts?")
        .default(false)
        .interact()?
    {
        twilio.account_sid = Input::new().with_prompt("Twilio account SID").interact_text()?;
        twilio.auth_token = Input::new().with_prompt("Twilio auth token").interact_text()?;
        twilio.from_number = Input::new()
            .with_prompt("Twilio phone number")
            .interact_text()?;
    }

    if Confirm::new()
        .with_prompt("Configure email alerts?")
        .default(false)
        .interact()?
    {
        email.api_key = Input::new().with_prompt("Mail API key").interact_text()?;
        email.from = Input::new().with_prompt("Sender address").interact_text()?;
    }

    Ok((twilio, email))
}

pub fn run_onboard() -> Result<Config> {
    println!("{}", style(BANNER).green().bold());

    println!("  {}", style("Welcome to FarmGuard!").white().bold());
    println!(
        "  {}",
        style("This wizard will configure your agent and its alert channels.").dim()
    );
    println!();

    print_step(1, 3, "Model Setup");
    let (provider, model) = setup_provider()?;
    let api_key = setup_api_key(&provider)?;

    print_step(2, 3, "Alert Channels");
    let (twilio, email) = setup_alerts()?;

    let config = Config {
        provider: Some(provider),
        api_key,
        model,
        twilio,
        email,
        ..Default::default()
    };

    print_step(3, 3, "Workspace Setup");
    if let Err(e) = create_workspace(&config.workspace_dir) {
        eprintln!(
            "  {} Warning: Could not create workspace: {}",
            style("!").yellow(),
            e
        );
    } else {
        println!(
            "  {} Workspace ready at {}",
            style("✓").green(),
            style(config.workspace_dir.display()).cyan()
        );
        println!("  {} - FARM.md", style("  ").dim());
    }

    println!();
    println!("  {} Configuration complete!", style("✓").green().bold());
    println!(
        "  {} Config saved to {}",
        style("→").green(),
        style(farmguard_core::config::get_config_path().display()).cyan()
    );
    println!(
        "  {} You can now run: {}",
        style("→").green(),
        style("farmguard chat").cyan().bold()
    );
    println!();

    Ok(config)
}

/// Starts a session, asking for whichever contact detail was not given.
pub fn register_session(email: Option<String>, phone: Option<String>) -> Result<Session> {
    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("📧 Enter your email")
            .interact_text()
            .context("Failed to read email")?,
    };
    let phone = match phone {
        Some(phone) => phone,
        None => Input::new()
            .with_prompt("📱 Enter your phone number")
            .interact_text()
            .context("Failed to read phone number")?,
    };

    Session::new(email, phone).context("Provide both email and phone")
}
