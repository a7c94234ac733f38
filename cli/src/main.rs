use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use farmguard_core::{Session, agent, config, memory, notify, providers};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
mod onboard;

#[derive(Parser)]
#[command(name = "farmguard")]
#[command(about = "farmguard - farming assistant with risk escalation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Onboard,
    Chat {
        /// Email address alerts are sent to
        #[arg(short, long)]
        email: Option<String>,
        /// Phone number for SMS alerts and calls
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        message: Option<String>,
    },
}

/// Loads `.env` from the working directory when there is one.
fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("Failed to load .env"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("farmguard_core=info,farmguard=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv()?;
    init_tracing();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or_else(|| {
        if !config::config_exists() {
            Commands::Onboard
        } else {
            Commands::Chat {
                email: None,
                phone: None,
                message: None,
            }
        }
    });

    match command {
        Commands::Onboard => {
            let onboard_config = onboard::run_onboard().map_err(|e| {
                eprintln!("❌ Onboarding failed: {}", e);
                anyhow::anyhow!("Onboarding failed: {}", e)
            })?;
            config::save_config(&onboard_config)?;
        }
        Commands::Chat {
            email,
            phone,
            message,
        } => {
            let config = config::load_config()?;

            if !config.workspace_dir.exists() {
                std::fs::create_dir_all(&config.workspace_dir).with_context(|| {
                    format!(
                        "Could not create workspace at {}",
                        config.workspace_dir.display()
                    )
                })?;
            }

            let provider: Arc<dyn farmguard_core::Provider> =
                Arc::from(providers::create_provider(&config)?);
            let memory = memory::create_memory(&config.workspace_dir)?;
            let channels = notify::create_channels(&config);
            let tool_registry = Arc::new(agent::ToolRegistry::farmguard(memory, channels));
            let context_builder =
                agent::ContextBuilder::new().with_workspace(&config.workspace_dir);

            let agent_loop = agent::AgentLoop::new(provider, context_builder, tool_registry)
                .with_max_iterations(config.max_iterations)
                .with_model_timeout(Duration::from_secs(config.model_timeout_secs))
                .with_tool_timeout(Duration::from_secs(config.tool_timeout_secs));

            let mut session = onboard::register_session(email, phone)?;
            tracing::info!(thread_id = session.thread_id(), "session started");

            if let Some(msg) = message {
                println!("\n🌱 Thinking...\n");
                let outcome = agent_loop
                    .process_turn(&mut session, &msg)
                    .await
                    .context("Agent processing failed")?;
                println!("{}", outcome.answer);
            } else {
                run_interactive(&agent_loop, &mut session).await;
            }
        }
    }

    Ok(())
}

async fn run_interactive(agent_loop: &agent::AgentLoop, session: &mut Session) {
    println!("🌾 FarmGuard");
    println!("Ask about your farm (Ctrl+D to exit):\n");
    use std::io::{self, BufRead};
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut stdout_lock = stdout.lock();

    loop {
        print!("> ");
        let _ = stdout_lock.flush();

        let mut input = String::new();
        let mut reader = stdin.lock();

        match reader.read_line(&mut input) {
            Ok(0) => {
                println!("\n👋 Goodbye!");
                break;
            }
            Ok(_) => {
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }

                println!("\n🌱 Thinking...\n");

                match agent_loop.process_turn(session, input).await {
                    Ok(outcome) => {
                        println!("{}", outcome.answer);
                    }
                    Err(e) => {
                        eprintln!("❌ Error: {}", e);
                    }
                }

                println!();
            }
            Err(_) => {
                println!("\n👋 Goodbye!");
                break;
            }
        }
    }
}
