//! Payment request entity - one row per `PromptPay` payload issued by the bot.
//!
//! The `reference` is the short tracking code shown to users; it is not part of
//! the payload. `amount_satang` is `NULL` for static codes.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment request database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_requests")]
pub struct Model {
    /// Unique identifier for the request
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Six-character uppercase tracking code
    #[sea_orm(unique)]
    pub reference: String,
    /// Discord user ID who asked for the code
    pub user_id: String,
    /// Sanitized payee digits as configured (local form for mobile numbers)
    pub account: String,
    /// Fixed amount in satang, `None` for a static code
    pub amount_satang: Option<i64>,
    /// The encoded `PromptPay` payload
    pub payload: String,
    /// When the request was issued
    pub created_at: DateTimeUtc,
}

/// Payment requests have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
