//! Tag-Length-Value encoding used by EMV QR payloads.
//!
//! A field is a two-digit tag, a two-digit zero-padded byte length and the value
//! itself, with no delimiters. Nested structures are encoded first and then
//! wrapped as the value of an outer tag, so the outer length covers the whole
//! inner encoding.

use crate::errors::{Error, Result};

/// Largest value a two-digit length header can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// A decoded field, borrowing from the payload it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    /// Two-digit tag
    pub tag: &'a str,
    /// Raw value
    pub value: &'a str,
}

/// Encodes a single field.
///
/// # Errors
/// Returns [`Error::FieldTooLong`] if `value` is longer than 99 bytes, and
/// [`Error::MalformedPayload`] if `tag` is not two ASCII digits.
pub fn encode(tag: &str, value: &str) -> Result<String> {
    if tag.len() != 2 || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedPayload {
            reason: format!("tag '{tag}' is not two digits"),
        });
    }
    if value.len() > MAX_VALUE_LEN {
        return Err(Error::FieldTooLong {
            tag: tag.to_string(),
            len: value.len(),
        });
    }
    Ok(format!("{tag}{:02}{value}", value.len()))
}

/// Encodes a list of fields back to back.
pub fn encode_all(fields: &[(&str, &str)]) -> Result<String> {
    fields.iter().try_fold(String::new(), |mut out, (tag, value)| {
        out.push_str(&encode(tag, value)?);
        Ok(out)
    })
}

/// Splits a TLV string into its fields, in order.
///
/// # Errors
/// Returns [`Error::MalformedPayload`] when a header is not four ASCII digits or a
/// declared length runs past the end of the input.
pub fn parse(input: &str) -> Result<Vec<Field<'_>>> {
    let mut fields = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        let header = rest.get(..4).ok_or_else(|| Error::MalformedPayload {
            reason: format!("truncated field header '{rest}'"),
        })?;
        if !header.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedPayload {
                reason: format!("field header '{header}' is not numeric"),
            });
        }

        let (tag, len) = header.split_at(2);
        let len: usize = len.parse().map_err(|_| Error::MalformedPayload {
            reason: format!("bad length in header '{header}'"),
        })?;

        let value = rest.get(4..4 + len).ok_or_else(|| Error::MalformedPayload {
            reason: format!("field {tag} declares {len} bytes but the payload ends early"),
        })?;

        fields.push(Field { tag, value });
        rest = &rest[4 + len..];
    }

    Ok(fields)
}

/// Finds the first field with the given tag.
#[must_use]
pub fn find<'a>(fields: &[Field<'a>], tag: &str) -> Option<&'a str> {
    fields.iter().find(|f| f.tag == tag).map(|f| f.value)
}
