//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for `PromptPay` Buddy: the slash
//! commands, the account autocomplete handler, the framework error hook and the
//! client startup.

/// Discord command implementations (payment, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{config::accounts::AccountBook, errors::Error};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// Both fields are read-only after startup; per-request choices such as the
/// account and amount travel as command parameters.
pub struct BotData {
    /// Database connection for payment request records
    pub database: DatabaseConnection,
    /// Payee accounts the bot may issue codes for
    pub accounts: AccountBook,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(database: DatabaseConnection, accounts: AccountBook) -> Self {
        Self { database, accounts }
    }
}

/// Poise context used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say("❌ Something went wrong, please try again.").await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Every command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::pp(),
        commands::pp_lookup(),
        commands::pp_history(),
        commands::pp_check(),
        commands::ping(),
        commands::help(),
    ]
}

/// Builds the poise framework, registers commands globally and runs the client
/// until it stops.
///
/// # Errors
/// Returns the serenity error if the client cannot be created or the gateway
/// connection fails.
#[instrument(skip_all)]
pub async fn run_bot(
    token: String,
    database: DatabaseConnection,
    accounts: AccountBook,
) -> Result<(), serenity::Error> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, accounts))
            })
        })
        .build();

    // Slash commands only need the non-privileged intents
    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))
}
