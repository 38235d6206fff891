//! Core business logic - framework-agnostic `PromptPay` encoding and payment requests.
//!
//! Everything below `promptpay` is pure and synchronous; only `payment` touches the
//! database.

pub mod amount;
pub mod crc;
pub mod payee;
pub mod payment;
pub mod promptpay;
pub mod tlv;

pub use amount::Amount;
pub use payee::PayeeId;
