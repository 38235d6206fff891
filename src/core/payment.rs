//! Payment request business logic - issuing, storing and looking up payloads.
//!
//! Every `/pp` invocation creates one payment request: the payload is encoded first
//! (so a bad payee or amount never touches the database), then stored together
//! with a short random reference code that users can quote later. The reference is
//! display metadata only and never appears inside the payload.

use crate::{
    core::{amount::Amount, payee::PayeeId, promptpay},
    entities::{PaymentRequest, payment_request},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, SqlErr, prelude::*};
use tracing::{debug, info};

/// Length of the tracking code shown to users.
pub const REFERENCE_LEN: usize = 6;
const MAX_REFERENCE_ATTEMPTS: usize = 5;

/// Masks an account for display: `0812345678` becomes `081-xxx-5678`.
///
/// Values shorter than 10 characters are returned unchanged.
#[must_use]
pub fn mask_account(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() < 10 {
        return raw.to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}-xxx-{tail}")
}

/// Generates a fresh reference code from a random v4 UUID.
#[must_use]
pub fn new_reference() -> String {
    let mut reference = uuid::Uuid::new_v4().simple().to_string();
    reference.truncate(REFERENCE_LEN);
    reference.make_ascii_uppercase();
    reference
}

/// Encodes a payload for `payee` and records it as a new payment request.
///
/// # Arguments
/// * `user_id` - Discord user ID of the requester
/// * `payee` - The configured account receiving the payment
/// * `amount` - Fixed amount, or `None`/zero for a static code
///
/// # Errors
/// Encoding errors are returned before anything is written. Database errors are
/// propagated, and a database error is also returned if every reference code
/// tried was already taken.
pub async fn create_payment_request(
    db: &DatabaseConnection,
    user_id: &str,
    payee: &PayeeId,
    amount: Option<Amount>,
) -> Result<payment_request::Model> {
    create_with_references(db, user_id, payee, amount, new_reference).await
}

/// Inserts a request, drawing reference codes from `next_reference` until one is
/// accepted by the unique index on `reference`.
async fn create_with_references<F>(
    db: &DatabaseConnection,
    user_id: &str,
    payee: &PayeeId,
    amount: Option<Amount>,
    mut next_reference: F,
) -> Result<payment_request::Model>
where
    F: FnMut() -> String,
{
    let amount = amount.filter(|a| !a.is_zero());
    let payload = promptpay::encode(payee, amount)?;

    let amount_satang = amount
        .map(|a| {
            i64::try_from(a.satang()).map_err(|_| Error::InvalidAmount {
                input: a.payload_value(),
            })
        })
        .transpose()?;

    for _ in 0..MAX_REFERENCE_ATTEMPTS {
        let model = payment_request::ActiveModel {
            reference: Set(next_reference()),
            user_id: Set(user_id.to_string()),
            account: Set(payee.digits().to_string()),
            amount_satang: Set(amount_satang),
            payload: Set(payload.clone()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        match model.insert(db).await {
            Ok(saved) => {
                info!(
                    reference = %saved.reference,
                    user_id,
                    account = %payee.masked(),
                    dynamic = saved.amount_satang.is_some(),
                    "Issued PromptPay payment request"
                );
                return Ok(saved);
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!("Reference code already taken, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(DbErr::Custom("could not allocate an unused reference code".to_string()).into())
}

/// Looks up a payment request by its reference code, ignoring case and
/// surrounding whitespace.
pub async fn get_by_reference(
    db: &DatabaseConnection,
    reference: &str,
) -> Result<Option<payment_request::Model>> {
    PaymentRequest::find()
        .filter(payment_request::Column::Reference.eq(reference.trim().to_ascii_uppercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's most recent payment requests, newest first.
pub async fn list_recent_for_user(
    db: &DatabaseConnection,
    user_id: &str,
    limit: u64,
) -> Result<Vec<payment_request::Model>> {
    PaymentRequest::find()
        .filter(payment_request::Column::UserId.eq(user_id))
        .order_by_desc(payment_request::Column::CreatedAt)
        .order_by_desc(payment_request::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

impl payment_request::Model {
    /// The fixed amount, `None` for static codes.
    #[must_use]
    pub fn amount(&self) -> Option<Amount> {
        self.amount_satang
            .and_then(|s| u64::try_from(s).ok())
            .map(Amount::from_satang)
    }

    /// Masked payee for display.
    #[must_use]
    pub fn masked_account(&self) -> String {
        mask_account(&self.account)
    }
}
