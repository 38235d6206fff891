//! CRC16 checksum used by the EMV QR payload (tag `63`).
//!
//! Polynomial `0x1021`, initial register `0xFFFF`, no reflection and no final XOR,
//! processed one byte at a time, most significant bit first.

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

/// Computes the CRC16 of `data`.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(INITIAL, |crc, &byte| {
        let mut crc = crc ^ (u16::from(byte) << 8);
        for _ in 0..8 {
            crc = if crc & 0x8000 == 0 {
                crc << 1
            } else {
                (crc << 1) ^ POLYNOMIAL
            };
        }
        crc
    })
}

/// Renders the CRC16 of `data` as four uppercase hex digits.
#[must_use]
pub fn crc16_hex(data: &[u8]) -> String {
    format!("{:04X}", crc16(data))
}
