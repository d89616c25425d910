//! Entry point for the Housing Advisor binary.
//!
//! By default the binary starts an HTTP server exposing the estimator,
//! the contract lookup, the guide and the advisor.  `chat` instead
//! opens a conversation with the advisor on the terminal.  Every
//! option can also be set through the environment; see
//! `housing-advisor --help`.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use housing_advisor::advisor::{Advisor, Conversation, GeminiAdvisor, ReplyStatus, NOT_CONFIGURED_MESSAGE};
use housing_advisor::api::{self, AppState};
use housing_advisor::config::{Command, Settings};
use housing_advisor::logging;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();
    logging::init_logging(&settings.log)?;

    let estimator = settings
        .estimator_config()
        .context("Failed to load estimator configuration")?;
    let advisor = GeminiAdvisor::new(
        settings.resolved_api_key(),
        settings.model.clone(),
        settings.api_base.clone(),
        settings.timeout(),
    )
    .context("Failed to build advisor client")?;
    if !advisor.is_configured() {
        info!("no API key configured; advisor disabled");
    }

    match settings.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => {
            let state = AppState {
                estimator,
                advisor: Arc::new(advisor),
            };
            api::serve(&settings.bind, state)
                .await
                .with_context(|| format!("Failed to run server on {}", settings.bind))
        }
        Command::Chat => chat(&advisor).await,
    }
}

async fn chat(advisor: &dyn Advisor) -> Result<()> {
    if !advisor.is_configured() {
        println!("{NOT_CONFIGURED_MESSAGE}");
        return Ok(());
    }
    let mut conversation = Conversation::new();
    for message in conversation.messages() {
        println!("asesor> {}", message.text);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(reply) = conversation.submit(advisor, &line).await {
            println!("asesor> {}", reply.text);
            if reply.status == ReplyStatus::Fallback {
                info!("advisor unavailable for this question");
            }
        }
    }
    Ok(())
}
