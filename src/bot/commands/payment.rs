//! `PromptPay` Discord commands - `pp`, `pp_lookup`, `pp_history` and `pp_check`.
//!
//! Bad user input (an unparsable amount, an unknown account or reference) is
//! answered with an ephemeral `❌` message. Only infrastructure failures reach the
//! framework error hook.

use crate::{
    core::{Amount, promptpay::DecodedPayload},
    entities::PaymentRequestModel,
};
use poise::serenity_prelude as serenity;

/// Number of requests shown by `/pp_history`.
pub const HISTORY_LIMIT: u64 = 10;

const EMBED_TITLE: &str = "💳 PromptPay QR Payment";
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S UTC";

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{HISTORY_LIMIT, check_summary, history_line, payment_embed};
    use crate::{
        bot::{Context, handlers::autocomplete},
        core::{Amount, payment, promptpay},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::{info, warn};

    async fn reply_ephemeral(ctx: Context<'_>, text: impl Into<String>) -> Result<()> {
        ctx.send(
            poise::CreateReply::default()
                .content(text.into())
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Fetches the user who created a stored request, for the embed author line.
    async fn requester(ctx: Context<'_>, user_id: &str) -> Option<serenity::User> {
        let id = user_id
            .parse::<u64>()
            .ok()
            .filter(|&id| id != 0)
            .map(serenity::UserId::new)?;
        id.to_user(ctx)
            .await
            .inspect_err(|e| warn!("Could not fetch requester {user_id}: {e}"))
            .ok()
    }

    /// Creates a PromptPay payment code.
    ///
    /// Without an amount the code is static and the payer types the amount in their
    /// banking app. With an amount the code is dynamic and fixed to that amount.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pp(
        ctx: Context<'_>,
        #[description = "Amount in baht, e.g. 100 or 1,250.50 (leave empty for payer-entered)"]
        amount: Option<String>,
        #[description = "Account to receive the payment"]
        #[autocomplete = "autocomplete::autocomplete_account"]
        account: Option<String>,
    ) -> Result<()> {
        let accounts = &ctx.data().accounts;
        if accounts.is_empty() {
            return reply_ephemeral(ctx, "❌ No PromptPay account is configured.").await;
        }

        let amount = match amount.as_deref().map(Amount::parse).transpose() {
            Ok(amount) => amount,
            Err(e) => {
                warn!("Rejected /pp amount: {e}");
                return reply_ephemeral(
                    ctx,
                    "❌ The amount must be a number, e.g. `100` or `1,250.50`.",
                )
                .await;
            }
        };

        let account = match accounts.resolve(account.as_deref()) {
            Ok(account) => account,
            Err(Error::AccountNotFound { query }) => {
                warn!("Rejected /pp account: {query}");
                return reply_ephemeral(
                    ctx,
                    format!("❌ No account named `{query}`. Pick one from the suggestions."),
                )
                .await;
            }
            Err(e) => return Err(e),
        };

        let author_id = ctx.author().id.to_string();
        let db = &ctx.data().database;
        let request =
            payment::create_payment_request(db, &author_id, &account.payee, amount).await?;

        let author = ctx.author();
        let embed = payment_embed(&request, author.display_name(), Some(author.face().as_str()));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows a previously created payment request by its reference code.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pp_lookup(
        ctx: Context<'_>,
        #[description = "Reference code from the payment footer, e.g. 3FA9C1"] reference: String,
    ) -> Result<()> {
        let Some(request) = payment::get_by_reference(&ctx.data().database, &reference).await?
        else {
            let message = format!("❌ No payment request with reference `{}`.", reference.trim());
            return reply_ephemeral(ctx, message).await;
        };

        if !promptpay::verify_checksum(&request.payload) {
            warn!(reference = %request.reference, "Stored payload failed its checksum");
        }

        let embed = match requester(ctx, &request.user_id).await {
            Some(user) => payment_embed(&request, user.display_name(), Some(user.face().as_str())),
            None => payment_embed(&request, &request.user_id, None),
        };
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists your most recent payment requests.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pp_history(ctx: Context<'_>) -> Result<()> {
        let author_id = ctx.author().id.to_string();
        let requests =
            payment::list_recent_for_user(&ctx.data().database, &author_id, HISTORY_LIMIT).await?;

        if requests.is_empty() {
            return reply_ephemeral(ctx, "You have not created any payment requests yet.").await;
        }

        let lines: Vec<String> = requests.iter().map(history_line).collect();
        reply_ephemeral(
            ctx,
            format!("**Your recent payment requests**\n{}", lines.join("\n")),
        )
        .await
    }

    /// Checks a PromptPay payload and shows who it pays and how much.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pp_check(
        ctx: Context<'_>,
        #[description = "The payload text encoded in the QR code"] payload: String,
    ) -> Result<()> {
        match promptpay::decode(&payload) {
            Ok(decoded) => {
                info!(payee = %decoded.payee.masked(), "Checked PromptPay payload");
                reply_ephemeral(ctx, check_summary(&decoded)).await
            }
            Err(Error::MalformedPayload { reason }) => {
                reply_ephemeral(ctx, format!("❌ Not a valid PromptPay payload: {reason}.")).await
            }
            Err(e) => Err(e),
        }
    }
}

// Re-export all commands
pub use inner::*;

/// Text of the amount field: the fixed amount, or a note that the payer types it.
#[must_use]
pub fn amount_text(amount: Option<Amount>) -> String {
    amount.map_or_else(
        || "*Payer enters the amount*".to_string(),
        |a| format!("**{}**", a.display()),
    )
}

/// Footer line carrying the reference code and creation time.
#[must_use]
pub fn footer_text(request: &PaymentRequestModel) -> String {
    format!(
        "Ref: {} • Created: {}",
        request.reference,
        request.created_at.format(TIMESTAMP_FORMAT)
    )
}

/// One line of `/pp_history` output.
#[must_use]
pub fn history_line(request: &PaymentRequestModel) -> String {
    let amount = request
        .amount()
        .map_or_else(|| "payer enters amount".to_string(), Amount::display);
    format!(
        "`{}` • {} • {} • {}",
        request.reference,
        request.masked_account(),
        amount,
        request.created_at.format(TIMESTAMP_FORMAT)
    )
}

/// Reply for a payload that decoded successfully.
#[must_use]
pub fn check_summary(decoded: &DecodedPayload) -> String {
    format!(
        "✅ Valid PromptPay payload\n**Payee:** `{}`\n**Amount:** {}",
        decoded.payee.masked(),
        amount_text(decoded.amount)
    )
}

/// The embed shown for an issued payment request, authored by the requester's name
/// and avatar.
#[must_use]
pub fn payment_embed(
    request: &PaymentRequestModel,
    requester_name: &str,
    requester_avatar: Option<&str>,
) -> serenity::CreateEmbed {
    let mut author = serenity::CreateEmbedAuthor::new(requester_name);
    if let Some(url) = requester_avatar {
        author = author.icon_url(url);
    }

    serenity::CreateEmbed::new()
        .author(author)
        .title(EMBED_TITLE)
        .colour(serenity::Colour::new(0x00_00_00))
        .description(format!(
            "**Payee:** `{}`\n**Requested by:** <@{}>",
            request.masked_account(),
            request.user_id
        ))
        .field("💰 Amount", amount_text(request.amount()), false)
        .field("Payload", format!("```\n{}\n```", request.payload), false)
        .footer(serenity::CreateEmbedFooter::new(footer_text(request)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::PayeeId;
    use chrono::TimeZone;

    fn request(amount_satang: Option<i64>) -> PaymentRequestModel {
        PaymentRequestModel {
            id: 1,
            reference: "3FA9C1".to_string(),
            user_id: "42".to_string(),
            account: "0812345678".to_string(),
            amount_satang,
            payload: "000201".to_string(),
            created_at: chrono::Utc.with_ymd_and_hms(2026, 10, 18, 13, 5, 9).unwrap(),
        }
    }

    #[test]
    fn test_amount_text() {
        assert_eq!(amount_text(None), "*Payer enters the amount*");
        assert_eq!(
            amount_text(Some(Amount::from_satang(125_050))),
            "**฿ 1,250.50**"
        );
    }

    #[test]
    fn test_footer_text() {
        assert_eq!(
            footer_text(&request(None)),
            "Ref: 3FA9C1 • Created: 18/10/2026 13:05:09 UTC"
        );
    }

    #[test]
    fn test_history_line() {
        assert_eq!(
            history_line(&request(Some(10_000))),
            "`3FA9C1` • 081-xxx-5678 • ฿ 100.00 • 18/10/2026 13:05:09 UTC"
        );
        assert_eq!(
            history_line(&request(None)),
            "`3FA9C1` • 081-xxx-5678 • payer enters amount • 18/10/2026 13:05:09 UTC"
        );
    }

    #[test]
    fn test_payment_embed_carries_requester() {
        let avatar = "https://cdn.discordapp.com/avatars/42/abc.webp?size=1024";
        let embed =
            serde_json::to_value(payment_embed(&request(Some(10_000)), "alice", Some(avatar)))
                .unwrap();

        assert_eq!(embed["author"]["name"], "alice");
        assert_eq!(embed["author"]["icon_url"], avatar);
        assert_eq!(embed["title"], EMBED_TITLE);
        assert_eq!(
            embed["footer"]["text"],
            "Ref: 3FA9C1 • Created: 18/10/2026 13:05:09 UTC"
        );

        let embed = serde_json::to_value(payment_embed(&request(None), "42", None)).unwrap();
        assert_eq!(embed["author"]["name"], "42");
        assert!(embed["author"].get("icon_url").is_none_or(serde_json::Value::is_null));
    }

    #[test]
    fn test_check_summary() {
        let decoded = DecodedPayload {
            payee: PayeeId::parse("1234567890123").unwrap(),
            amount: None,
        };
        assert_eq!(
            check_summary(&decoded),
            "✅ Valid PromptPay payload\n**Payee:** `123-xxx-0123`\n**Amount:** *Payer enters the amount*"
        );
    }
}
