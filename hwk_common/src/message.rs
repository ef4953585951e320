use unicode_normalization::UnicodeNormalization;

use crate::{Error, Result};

/// Bytes of a text message to be signed by the device, in NFC form.
pub fn prepare_message_bytes(message: &str) -> Vec<u8> {
    message.nfc().collect::<String>().into_bytes()
}

/// Decode an hex string, the `0x` prefix is optional.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(hex_part).map_err(|source| Error::InvalidHex {
        input: input.to_string(),
        source,
    })
}
