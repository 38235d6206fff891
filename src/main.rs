use dotenvy::dotenv;
use promptpay_buddy::{
    bot,
    config::{accounts::AccountBook, database},
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load and validate payee accounts
    let accounts = AccountBook::load()
        .inspect_err(|e| error!("Failed to load PromptPay accounts: {}", e))?;
    if accounts.is_empty() {
        warn!("No PromptPay accounts configured; /pp will refuse to create codes.");
    }

    // 4. Connect to the database and make sure the tables exist
    let database = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&database)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Run the bot
    let token = env::var("DISCORD_TOKEN")
        .inspect_err(|e| error!("DISCORD_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, database, accounts).await?;

    Ok(())
}
