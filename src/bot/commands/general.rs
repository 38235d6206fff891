//! General Discord commands - ping and help.
//! These commands don't touch the database or the payment accounts.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**PromptPay Buddy Help**\n\
        Create PromptPay payment codes for the configured accounts.\n\n\
        **Payment Commands**\n\
        • `/pp [amount] [account]` - Creates a PromptPay payload. Leave the amount empty to let the payer enter it.\n\
        • `/pp_lookup <reference>` - Shows a previously created payment request again.\n\
        • `/pp_history` - Lists your 10 most recent payment requests.\n\
        • `/pp_check <payload>` - Checks a PromptPay payload and shows who it pays and how much.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
