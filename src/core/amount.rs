//! Payment amounts in Thai Baht.
//!
//! Amounts are kept as a whole number of satang (1/100 baht) so that formatting for
//! the payload never goes through binary floating point. Text input is rounded
//! half-up at the third fractional digit: `0.005` becomes `0.01`, `0.004` becomes
//! `0.00`.

use crate::errors::{Error, Result};
use std::fmt;

const SATANG_PER_BAHT: u64 = 100;

/// A non-negative amount of Thai Baht with satang precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    satang: u64,
}

impl Amount {
    /// Zero baht. Encodes as a static (payer-entered) code.
    pub const ZERO: Self = Self { satang: 0 };

    /// Creates an amount from a satang count.
    #[must_use]
    pub const fn from_satang(satang: u64) -> Self {
        Self { satang }
    }

    /// Parses user-entered text such as `100`, `1,234.5` or `99.999`.
    ///
    /// Commas and surrounding whitespace are ignored. Only digits with an optional
    /// single decimal point are accepted.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] for empty, signed, non-numeric or
    /// overflowing input.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidAmount {
            input: input.to_string(),
        };

        let cleaned: String = input.trim().chars().filter(|&c| c != ',').collect();
        let (whole, fraction) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let digit = |i: usize| fraction.as_bytes().get(i).map_or(0, |b| u64::from(b - b'0'));
        let round_up = u64::from(digit(2) >= 5);

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        whole
            .checked_mul(SATANG_PER_BAHT)
            .and_then(|s| s.checked_add(digit(0) * 10 + digit(1)))
            .and_then(|s| s.checked_add(round_up))
            .map(Self::from_satang)
            .ok_or_else(invalid)
    }

    /// Parses the tag `54` value of a payload: digits with an optional decimal
    /// point and at most two fractional digits. Nothing is rounded or stripped.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] for anything else, including separators
    /// and a third fractional digit.
    pub fn from_payload_value(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidAmount {
            input: value.to_string(),
        };

        let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || fraction.len() > 2 || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(invalid());
        }

        Self::parse(value).map_err(|_| invalid())
    }

    /// Converts a numeric baht value, rounding half away from zero to satang.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] for negative, non-finite or out of range
    /// values.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn from_baht(baht: f64) -> Result<Self> {
        let satang = (baht * 100.0).round();
        if !satang.is_finite() || satang < 0.0 || satang >= u64::MAX as f64 {
            return Err(Error::InvalidAmount {
                input: baht.to_string(),
            });
        }
        Ok(Self::from_satang(satang as u64))
    }

    /// Whole satang count.
    #[must_use]
    pub const fn satang(self) -> u64 {
        self.satang
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.satang == 0
    }

    /// The payload form: two fractional digits, no separators (`1234.50`).
    #[must_use]
    pub fn payload_value(self) -> String {
        format!(
            "{}.{:02}",
            self.satang / SATANG_PER_BAHT,
            self.satang % SATANG_PER_BAHT
        )
    }

    /// Human form with thousands separators (`฿ 1,234.50`).
    #[must_use]
    pub fn display(self) -> String {
        let whole = (self.satang / SATANG_PER_BAHT).to_string();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        format!("฿ {grouped}.{:02}", self.satang % SATANG_PER_BAHT)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.payload_value())
    }
}
