//! `PromptPay` payee identifiers.
//!
//! A payee is either a local mobile number (10 digits with a leading zero) or a
//! 13-digit national ID / tax ID. Everything that is not a digit is stripped before
//! the length is checked, so `081-234-5678` and `0812345678` are the same payee.

use crate::errors::{Error, Result};
use std::fmt;

const MOBILE_LEN: usize = 10;
const NATIONAL_ID_LEN: usize = 13;
const COUNTRY_PREFIX: &str = "0066";

/// A validated payee identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PayeeId {
    /// Local mobile number, stored as the 10 sanitized digits (`0812345678`)
    Mobile(String),
    /// National ID or tax ID, stored as the 13 sanitized digits
    NationalId(String),
}

impl PayeeId {
    /// Sanitizes and validates a raw identifier.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPayee`] if the sanitized digits are neither a
    /// 10-digit number starting with `0` nor a 13-digit number.
    pub fn parse(raw: &str) -> Result<Self> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        match digits.len() {
            MOBILE_LEN if digits.starts_with('0') => Ok(Self::Mobile(digits)),
            NATIONAL_ID_LEN => Ok(Self::NationalId(digits)),
            _ => Err(Error::InvalidPayee {
                value: raw.to_string(),
            }),
        }
    }

    /// Rebuilds a payee from the value carried in a payload's merchant account
    /// field. Mobile numbers arrive in `0066` international form.
    pub(crate) fn from_payload(sub_tag: &str, value: &str) -> Result<Self> {
        let invalid = || Error::MalformedPayload {
            reason: format!("invalid payee '{value}' under sub-tag {sub_tag}"),
        };
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        match sub_tag {
            "01" => value
                .strip_prefix(COUNTRY_PREFIX)
                .filter(|local| local.len() == MOBILE_LEN - 1)
                .map(|local| Self::Mobile(format!("0{local}")))
                .ok_or_else(invalid),
            "02" if value.len() == NATIONAL_ID_LEN => Ok(Self::NationalId(value.to_string())),
            _ => Err(invalid()),
        }
    }

    /// The sanitized digits as entered (local form for mobile numbers).
    #[must_use]
    pub fn digits(&self) -> &str {
        match self {
            Self::Mobile(d) | Self::NationalId(d) => d,
        }
    }

    /// Merchant account sub-tag: `01` for mobile, `02` for national ID.
    #[must_use]
    pub const fn sub_tag(&self) -> &'static str {
        match self {
            Self::Mobile(_) => "01",
            Self::NationalId(_) => "02",
        }
    }

    /// The value encoded in the payload.
    ///
    /// Mobile numbers lose their leading zero and gain the `0066` prefix
    /// (`0812345678` becomes `0066812345678`). National IDs are used as-is.
    #[must_use]
    pub fn payload_value(&self) -> String {
        match self {
            Self::Mobile(d) => format!("{COUNTRY_PREFIX}{}", &d[1..]),
            Self::NationalId(d) => d.clone(),
        }
    }

    /// Masked form for display, e.g. `081-xxx-5678`.
    #[must_use]
    pub fn masked(&self) -> String {
        crate::core::payment::mask_account(self.digits())
    }
}

impl fmt::Display for PayeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.digits())
    }
}
