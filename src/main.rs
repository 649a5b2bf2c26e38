//! AutoClaw - Autonomous Personal AI Assistant
//!
//! Binary entry point: parses flags, bootstraps the on-disk session
//! artifacts, assembles the runtime configuration, and hands off to the
//! interaction loop.

use anyhow::{Context, Result};
use autoclaw::config::{ModelTier, RunOverrides, RuntimeConfig};
use autoclaw::llm::ChatClient;
use autoclaw::memory::{get_memory, MemoryKind};
use autoclaw::{agent::Agent, bootstrap, prompt, startup, BootstrapPaths};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "autoclaw")]
#[command(author = "A3S Lab Team")]
#[command(version)]
#[command(about = "Autonomous Personal AI Assistant")]
struct Cli {
    /// Enable continuous mode (no per-cycle authorization)
    #[arg(short, long)]
    continuous: bool,

    /// Number of cycles to run in continuous mode
    #[arg(short = 'l', long, value_name = "N")]
    continuous_limit: Option<u32>,

    /// Settings file to use; an existing file resumes that session
    #[arg(short = 'C', long, value_name = "PATH")]
    ai_settings: Option<PathBuf>,

    /// Memory index JSON file to use
    #[arg(long, value_name = "PATH")]
    memory_index: Option<PathBuf>,

    /// Skip the authorization prompt for the first cycle
    #[arg(short = 'y', long)]
    skip_reprompt: bool,

    /// Memory backend to use
    #[arg(short = 'm', long = "use-memory", value_enum, default_value_t)]
    use_memory: MemoryKind,

    /// Enable speech output
    #[arg(long)]
    speak: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Restrict all LLM calls to the fast model
    #[arg(long, conflicts_with = "smart_llm_only")]
    fast_llm_only: bool,

    /// Restrict all LLM calls to the smart model
    #[arg(long)]
    smart_llm_only: bool,

    /// Browser used for web scraping tasks
    #[arg(short = 'b', long, value_name = "NAME")]
    browser_name: Option<String>,

    /// Dangerous: allow the assistant to download files natively
    #[arg(long)]
    allow_downloads: bool,

    /// Suppress the latest-news output on startup
    #[arg(long)]
    skip_news: bool,

    /// Data directory holding the template, sessions, and memory index
    #[arg(long, env = "AUTOCLAW_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("autoclaw={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Resolve the filesystem layout once, up front; nothing downstream
    // consults ambient state for paths.
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => dirs_next::home_dir()
            .context("could not determine home directory")?
            .join(".autoclaw"),
    };
    let paths = BootstrapPaths::under_data_dir(&data_dir);
    bootstrap::seed_template(&paths.template)?;

    // Provision the run's on-disk artifacts
    let (settings_path, memory_path) =
        bootstrap::bootstrap(&paths, cli.ai_settings.as_deref(), cli.memory_index.as_deref())?;

    let model_tier = if cli.fast_llm_only {
        ModelTier::FastOnly
    } else if cli.smart_llm_only {
        ModelTier::SmartOnly
    } else {
        ModelTier::Any
    };

    let overrides = RunOverrides {
        continuous: cli.continuous,
        continuous_limit: cli.continuous_limit,
        skip_reprompt: cli.skip_reprompt,
        speak: cli.speak,
        debug: cli.debug,
        model_tier,
        memory_backend: cli.use_memory,
        browser_name: cli.browser_name,
        allow_downloads: cli.allow_downloads,
        skip_news: cli.skip_news,
    };
    let config = RuntimeConfig::assemble(settings_path, memory_path, overrides)?;

    let api_key = startup::require_api_key()?;

    if !config.skip_news {
        if let Some(bulletin) = startup::latest_bulletin().await {
            println!("NEWS: {bulletin}");
        }
        if let Some(branch) = startup::current_git_branch().await {
            if branch != startup::SUPPORTED_BRANCH {
                tracing::warn!(
                    branch,
                    "you are running on an unsupported branch; use `{}` for production",
                    startup::SUPPORTED_BRANCH
                );
            }
        }
    }

    if config.allow_downloads {
        tracing::warn!("native downloading enabled; the assistant may write files to disk");
    }
    if config.speak {
        tracing::info!("speak mode enabled");
    }

    // Fresh start: the index file survives, its contents do not
    let memory = get_memory(config.memory_backend, &config.memory_path, true).await?;
    tracing::info!(backend = memory.name(), "using memory backend");
    tracing::info!(browser = %config.browser, "using browser");

    let client = ChatClient::new(api_key, config.model_tier);
    tracing::info!(model = client.model(), "using model");
    tracing::debug!(
        "system prompt:\n{}",
        prompt::build_system_prompt(&config.profile)
    );

    let mut agent = Agent::new(&config, memory, client);
    agent.start_interaction_loop().await?;

    Ok(())
}
