//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// `PromptPay` payment commands
pub mod payment;

// Export commands
pub use general::*;
pub use payment::*;
