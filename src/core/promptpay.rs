//! `PromptPay` QR payload encoding and decoding.
//!
//! Payloads follow the EMV QR Code Specification for Payment Systems (merchant
//! presented mode) as profiled for Thailand's `PromptPay` scheme. Encoding is pure
//! and deterministic: the same payee and amount always produce the same string.
//! Reference codes and timestamps shown next to a payload are never part of it.

use crate::{
    core::{amount::Amount, crc, payee::PayeeId, tlv},
    errors::{Error, Result},
};

const TAG_FORMAT_INDICATOR: &str = "00";
const TAG_INITIATION_METHOD: &str = "01";
const TAG_MERCHANT_ACCOUNT: &str = "29";
const TAG_CURRENCY: &str = "53";
const TAG_AMOUNT: &str = "54";
const TAG_COUNTRY: &str = "58";
const TAG_CRC: &str = "63";

const SUB_TAG_AID: &str = "00";

const FORMAT_INDICATOR: &str = "01";
const STATIC_CODE: &str = "11";
const DYNAMIC_CODE: &str = "12";
/// Application identifier registered for `PromptPay` credit transfers.
pub const PROMPTPAY_AID: &str = "A000000677010111";
/// ISO 4217 numeric code for Thai Baht.
pub const CURRENCY_THB: &str = "764";
const COUNTRY_TH: &str = "TH";

/// Header of the trailing checksum field (tag `63`, length `04`).
const CRC_HEADER: &str = "6304";
const CRC_LEN: usize = 4;

/// Payee and amount recovered from an encoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub payee: PayeeId,
    /// `None` for static codes
    pub amount: Option<Amount>,
}

/// Sanitizes `payee_raw` and encodes it with an optional amount.
///
/// An absent or zero amount yields a static code; a positive amount yields a
/// dynamic code carrying that amount.
///
/// # Errors
/// Returns [`Error::InvalidPayee`] before any encoding happens if the identifier is
/// malformed.
pub fn generate_payload(payee_raw: &str, amount: Option<Amount>) -> Result<String> {
    let payee = PayeeId::parse(payee_raw)?;
    encode(&payee, amount)
}

/// Encodes an already validated payee.
pub fn encode(payee: &PayeeId, amount: Option<Amount>) -> Result<String> {
    let amount = amount.filter(|a| !a.is_zero());

    let payee_value = payee.payload_value();
    let merchant_account = tlv::encode_all(&[
        (SUB_TAG_AID, PROMPTPAY_AID),
        (payee.sub_tag(), payee_value.as_str()),
    ])?;

    let initiation = if amount.is_some() {
        DYNAMIC_CODE
    } else {
        STATIC_CODE
    };

    let mut payload = tlv::encode_all(&[
        (TAG_FORMAT_INDICATOR, FORMAT_INDICATOR),
        (TAG_INITIATION_METHOD, initiation),
        (TAG_MERCHANT_ACCOUNT, merchant_account.as_str()),
        (TAG_CURRENCY, CURRENCY_THB),
    ])?;
    if let Some(amount) = amount {
        payload.push_str(&tlv::encode(TAG_AMOUNT, &amount.payload_value())?);
    }
    payload.push_str(&tlv::encode(TAG_COUNTRY, COUNTRY_TH)?);

    payload.push_str(CRC_HEADER);
    let checksum = crc::crc16_hex(payload.as_bytes());
    payload.push_str(&checksum);

    Ok(payload)
}

/// Checks that `payload` ends in a `6304XXXX` field whose value matches the CRC of
/// everything before it.
#[must_use]
pub fn verify_checksum(payload: &str) -> bool {
    if payload.len() < CRC_HEADER.len() + CRC_LEN
        || !payload.is_char_boundary(payload.len() - CRC_LEN)
    {
        return false;
    }
    let (body, checksum) = payload.split_at(payload.len() - CRC_LEN);
    body.ends_with(CRC_HEADER) && crc::crc16_hex(body.as_bytes()).eq_ignore_ascii_case(checksum)
}

/// Decodes a payload back into its payee and amount.
///
/// Unknown top-level tags are ignored, so payloads from other generators that add
/// optional fields still decode.
///
/// # Errors
/// Returns [`Error::MalformedPayload`] for a bad checksum, broken TLV framing, a
/// missing or foreign merchant account field, or an unreadable amount.
pub fn decode(payload: &str) -> Result<DecodedPayload> {
    let payload = payload.trim();
    if !verify_checksum(payload) {
        return Err(malformed("checksum does not match"));
    }

    let fields = tlv::parse(payload)?;
    if fields.last().map(|f| f.tag) != Some(TAG_CRC) {
        return Err(malformed("checksum is not the last field"));
    }

    let merchant_account = tlv::find(&fields, TAG_MERCHANT_ACCOUNT)
        .ok_or_else(|| malformed("no PromptPay merchant account (tag 29)"))?;
    let inner = tlv::parse(merchant_account)?;
    if tlv::find(&inner, SUB_TAG_AID) != Some(PROMPTPAY_AID) {
        return Err(malformed("merchant account is not a PromptPay AID"));
    }

    let payee = inner
        .iter()
        .find(|f| f.tag != SUB_TAG_AID)
        .ok_or_else(|| malformed("merchant account has no payee"))
        .and_then(|f| PayeeId::from_payload(f.tag, f.value))?;

    let amount = tlv::find(&fields, TAG_AMOUNT)
        .map(|value| {
            Amount::from_payload_value(value)
                .map_err(|_| malformed(&format!("unreadable amount '{value}'")))
        })
        .transpose()?
        .filter(|a| !a.is_zero());

    Ok(DecodedPayload { payee, amount })
}

fn malformed(reason: &str) -> Error {
    Error::MalformedPayload {
        reason: reason.to_string(),
    }
}
