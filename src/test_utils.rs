//! Shared test utilities for `PromptPay` Buddy.
//!
//! This module provides common helper functions for setting up test databases
//! and creating payment requests with sensible defaults.

use crate::{
    core::{Amount, PayeeId, payment},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The mobile payee `0812345678`.
///
/// # Panics
/// Never; the literal is a valid mobile number.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_mobile_payee() -> PayeeId {
    PayeeId::parse("0812345678").unwrap()
}

/// Creates a payment request with sensible defaults.
///
/// # Defaults
/// * payee: `0812345678`
/// * amount: 50.00
pub async fn create_test_request(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<entities::PaymentRequestModel> {
    payment::create_payment_request(
        db,
        user_id,
        &test_mobile_payee(),
        Some(Amount::from_satang(5_000)),
    )
    .await
}
