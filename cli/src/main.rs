//! CLI entrypoint for dbl-chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod logging;
mod overrides;

use anyhow::{Context, Result};
use clap::Parser;
use dbl_chat_application::{
    ConversationEvent, ConversationLogger, GatewayTransport, NegotiateSessionInput,
    NegotiateSessionUseCase, NoConversationLogger, ResponseDeliveryEngine, TurnSequencer,
};
use dbl_chat_domain::ChatProfile;
use dbl_chat_infrastructure::{ConfigLoader, FileConfig, HttpGatewayTransport, JsonlConversationLogger};
use dbl_chat_presentation::{ChatRepl, Cli, OutputConfig, ReplConfig};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_without_files()?
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    overrides::apply(&mut config, &cli);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref(), !cli.no_config);
        println!();
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    let log_file = config.logging.file.as_deref().map(overrides::expand_home);
    let _log_guard = logging::init(cli.verbose, log_file.as_deref())?;

    config.validate()?;
    OutputConfig {
        color: config.output.color,
    }
    .apply();

    info!("Starting dbl-chat against {}", config.gateway.base_url);

    // === Dependency Injection ===
    let transport: Arc<dyn GatewayTransport> = Arc::new(
        HttpGatewayTransport::new(&config.gateway.base_url, config.gateway.timeout())
            .context("Failed to create gateway client")?,
    );

    let session = NegotiateSessionUseCase::new(Arc::clone(&transport))
        .execute(
            NegotiateSessionInput::new()
                .with_model_id(config.session.model_id.clone())
                .with_provider(config.session.provider.clone()),
        )
        .await?;

    let conversation_logger = open_transcript(&config);
    let profile = build_profile(&config, session.model.clone())?;

    let sequencer = TurnSequencer::new(Arc::clone(&transport), profile)
        .with_conversation_logger(Arc::clone(&conversation_logger));
    let mut engine =
        ResponseDeliveryEngine::new(transport, &session.capabilities, config.delivery_params())
            .with_conversation_logger(Arc::clone(&conversation_logger));

    conversation_logger.log(ConversationEvent::new(
        "session_started",
        serde_json::json!({
            "thread_id": sequencer.thread_id().as_str(),
            "base_url": config.gateway.base_url,
            "model_id": session.model.model_id,
            "provider": session.model.provider,
            "delivery_mode": engine.mode().map(|mode| mode.to_string()),
        }),
    ));

    if let Err(e) = engine.prime().await {
        warn!("Could not skip existing event history: {}", e);
    }

    let repl_config = ReplConfig {
        show_progress: config.repl.show_progress,
        history_file: config.repl.history_file.as_deref().map(overrides::expand_home),
    };
    ChatRepl::new(sequencer, engine)
        .with_config(repl_config)
        .run()
        .await?;

    Ok(())
}

fn build_profile(
    config: &FileConfig,
    model: dbl_chat_domain::ModelSelection,
) -> Result<ChatProfile> {
    let principal_id = config
        .session
        .principal_id
        .clone()
        .context("session.principal_id is required")?;

    Ok(ChatProfile::new(principal_id, model)
        .with_workspace_id(config.session.workspace_id.clone())
        .with_lane(config.session.lane.clone())
        .with_max_output_tokens(config.session.max_output_tokens))
}

fn open_transcript(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let Some(path) = config.logging.transcript.as_deref() else {
        return Arc::new(NoConversationLogger);
    };
    let path = overrides::expand_home(path);

    match JsonlConversationLogger::open(&path) {
        Ok(logger) => {
            info!("Writing conversation transcript to {}", logger.path().display());
            Arc::new(logger)
        }
        Err(e) => {
            warn!("Could not open transcript {}: {}", path.display(), e);
            Arc::new(NoConversationLogger)
        }
    }
}
