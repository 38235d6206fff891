//! Autocomplete handlers for Discord slash command parameters.

use crate::bot::Context;

/// Suggests configured accounts whose label or masked number contains `partial`.
///
/// Only display names are offered; the raw account numbers never leave the bot.
pub async fn autocomplete_account(ctx: Context<'_>, partial: &str) -> Vec<String> {
    ctx.data().accounts.autocomplete(partial)
}
