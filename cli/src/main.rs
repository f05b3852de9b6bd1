//! CLI entrypoint for lmagent
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use lmagent_application::{
    AutoApproveConfirmation, AutoRejectConfirmation, ConfirmationPort, ConversationLogger,
    ExecutionParams, LlmGateway, MemoryManager, NoConversationLogger, RunTurnUseCase,
    ToolDispatcher,
};
use lmagent_domain::agent::llm_models;
use lmagent_domain::{AgentConfig, ConfirmationMode, ToolCallingMode};
use lmagent_infrastructure::{
    ConfigLoader, JsonFileMemoryStore, JsonlConversationLogger, LmStudioGateway, LmsCli,
    LocalToolExecutor, SystemShell, TrashConfig, tool_spec_from_entries,
};
use lmagent_presentation::{
    AgentRepl, Cli, ConsoleConfirmation, ConsoleFormatter, Interrupt, SpinnerProgress, select_model,
    session_mode,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let loader = ConfigLoader::new().with_explicit(cli.config.clone());
    if cli.show_config {
        loader.print_config_sources();
        let effective = if cli.no_config {
            ConfigLoader::load_defaults()
        } else {
            loader.load().context("Failed to load configuration")?
        };
        println!();
        println!("Effective configuration:");
        print!("{}", effective.to_toml()?);
        return Ok(());
    }

    let config = load_config(&cli, &loader)?;
    info!(
        base_url = %config.base_url,
        mode = %config.confirmation_mode,
        dev_mode = config.dev_mode,
        "Starting lmagent"
    );

    // === Model runtime ===
    let mut gateway = LmStudioGateway::new(&config.base_url)?;
    match LmsCli::detect() {
        Ok(lms) => gateway = gateway.with_cli(lms),
        Err(e) => warn!(error = %e, "Model listing and server start-up unavailable"),
    }
    let gateway = Arc::new(gateway);

    if cli.list_models {
        let models = llm_models(gateway.list_models().await?);
        print!("{}", ConsoleFormatter::model_list(&models));
        return Ok(());
    }

    gateway
        .ensure_ready()
        .await
        .context("Failed to start the LM Studio server")?;
    let (model, mode) = choose_model(gateway.as_ref(), config.model.as_deref()).await?;
    println!("Selected model: {}", model);

    // === Memory ===
    let store = Arc::new(JsonFileMemoryStore::new(&config.long_term_path));
    let memory = MemoryManager::load(config.short_term_cap, store)
        .context("Failed to load long-term memory")?;

    // === Tools ===
    let command_timeout = Duration::from_secs(config.command_timeout_secs);
    let confirmation: Arc<dyn ConfirmationPort> = match config.confirmation_mode {
        ConfirmationMode::Interactive => Arc::new(ConsoleConfirmation::new()),
        ConfirmationMode::AutoApprove => {
            warn!("Destructive commands will run without confirmation");
            Arc::new(AutoApproveConfirmation)
        }
        ConfirmationMode::AutoReject => Arc::new(AutoRejectConfirmation),
    };
    let executor = Arc::new(LocalToolExecutor::new(
        tool_spec_from_entries(&config.tools),
        Arc::new(SystemShell::new()),
        confirmation,
        TrashConfig::detect(),
        command_timeout,
    ));

    let logger: Arc<dyn ConversationLogger> = match &config.conversation_log {
        Some(path) => match JsonlConversationLogger::open(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoConversationLogger),
        },
        None => Arc::new(NoConversationLogger),
    };

    // === Use case ===
    let use_case = RunTurnUseCase::new(
        gateway,
        ToolDispatcher::new(executor, logger.clone()),
        memory,
        logger,
        Arc::new(SpinnerProgress::new()),
        model,
        mode,
        config.system_prompt.clone(),
        ExecutionParams::from_config(&config),
    );

    AgentRepl::new(use_case, Interrupt::ctrl_c()).run().await?;
    Ok(())
}

/// Merge config sources, apply command line overrides and validate.
fn load_config(cli: &Cli, loader: &ConfigLoader) -> Result<AgentConfig> {
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        loader.load().context("Failed to load configuration")?
    };
    let mut config = file_config
        .into_agent_config()
        .context("Invalid configuration")?;

    if let Some(model) = cli.model.as_ref().filter(|m| !m.trim().is_empty()) {
        config.model = Some(model.clone());
    }
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(mode) = cli.confirmation_mode {
        config.confirmation_mode = mode.into();
    }
    if let Some(path) = &cli.log_conversation {
        config.conversation_log = Some(path.display().to_string());
    }
    config.dev_mode |= cli.dev;

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Resolve the session's model key and how tool calls are obtained from it.
async fn choose_model(
    gateway: &dyn LlmGateway,
    preferred: Option<&str>,
) -> Result<(String, ToolCallingMode)> {
    let records = match gateway.list_models().await {
        Ok(records) => records,
        Err(e) => match preferred {
            // Without a listing the capability is unknown
            Some(key) => {
                warn!(error = %e, model = %key, "Cannot list models; using prompt-based tool calls");
                return Ok((key.to_string(), ToolCallingMode::PromptBased));
            }
            None => return Err(e).context("Failed to list models"),
        },
    };

    let models = llm_models(records);
    if models.is_empty() {
        bail!("No LLM models available. Please download an LLM model in LM Studio first.");
    }

    let mut stdin = io::stdin().lock();
    let chosen = select_model(&models, preferred, &mut stdin)?;
    Ok((chosen.model_key.clone(), session_mode(chosen)))
}
