//! Benfen commands, and the BFC address format used to show who signed.

use blake2::{digest::consts::U32, Blake2b, Digest};
use hwk_common::prepare_message_bytes;
use sha2::Sha256;

use crate::{
    messages::{
        BenfenAddress, BenfenGetAddress, BenfenMessageSignature, BenfenSignMessage, BenfenSignTx,
        BenfenSignedTx,
    },
    Client, Error, Result, Transport,
};

type Blake2b256 = Blake2b<U32>;

pub const BFC_PREFIX: &str = "BFC";

/// Hex chars of the account part of an address
const HEX_LEN: usize = 64;

/// Get the address at `address_n`, optionally showing it on the device for confirmation
pub fn get_address<T: Transport>(
    client: &Client<T>,
    address_n: &[u32],
    show_display: bool,
) -> Result<String> {
    let response: BenfenAddress = client.call_expect(BenfenGetAddress {
        address_n: address_n.to_vec(),
        show_display: Some(show_display),
    })?;
    response.address.ok_or(Error::MissingField("address"))
}

/// Blind sign a serialized transaction, `coin_type` is passed through to the device
pub fn sign_tx<T: Transport>(
    client: &Client<T>,
    address_n: &[u32],
    raw_tx: &[u8],
    coin_type: &[u8],
) -> Result<BenfenSignedTx> {
    tracing::debug!("Data length: {} bytes", raw_tx.len());
    client.call_expect(BenfenSignTx {
        address_n: address_n.to_vec(),
        raw_tx: raw_tx.to_vec(),
        data_initial_chunk: None,
        coin_type: Some(coin_type.to_vec()),
        data_length: None,
    })
}

pub fn sign_message<T: Transport>(
    client: &Client<T>,
    address_n: &[u32],
    message: &str,
) -> Result<BenfenMessageSignature> {
    client.call_expect(BenfenSignMessage {
        address_n: address_n.to_vec(),
        message: prepare_message_bytes(message),
    })
}

/// The BFC address of an ed25519 public key
pub fn address_from_public_key(public_key: &[u8]) -> Result<String> {
    if public_key.len() != 32 {
        return Err(Error::InvalidPublicKey(public_key.len()));
    }
    let mut hasher = Blake2b256::new();
    hasher.update([0x00u8]);
    hasher.update(public_key);
    let account = hasher.finalize();
    to_bfc_address(&format!("0x{}", hex::encode(account)))
}

/// Convert a `0x` hex address to the BFC format: prefix, zero padded hex and a 2 bytes checksum
pub fn to_bfc_address(hex_address: &str) -> Result<String> {
    let invalid = || Error::InvalidAddress(hex_address.to_string());
    let hex_part = hex_address
        .strip_prefix("0x")
        .or_else(|| hex_address.strip_prefix("0X"))
        .ok_or_else(invalid)?;
    if hex_part.is_empty()
        || hex_part.len() > HEX_LEN
        || !hex_part.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(invalid());
    }

    let padded = format!("{:0>width$}", hex_part, width = HEX_LEN);
    let hash = Sha256::digest(padded.as_bytes());
    Ok(format!("{BFC_PREFIX}{padded}{}", hex::encode(&hash[..2])))
}
