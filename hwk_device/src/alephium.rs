use crate::{
    messages::{
        AlephiumAddress, AlephiumGetAddress, AlephiumMessageSignature, AlephiumSignMessage,
        AlephiumSignTx, AlephiumSignedTx,
    },
    Client, Result, Transport,
};

/// Get the address at `address_n`.
///
/// With `target_group` the device derives the first address belonging to that group,
/// the path actually used is returned in [`AlephiumAddress::derived_path`].
pub fn get_address<T: Transport>(
    client: &Client<T>,
    address_n: &[u32],
    show_display: bool,
    include_public_key: bool,
    target_group: Option<u32>,
) -> Result<AlephiumAddress> {
    client.call_expect(AlephiumGetAddress {
        address_n: address_n.to_vec(),
        show_display: Some(show_display),
        include_public_key: Some(include_public_key),
        target_group,
    })
}

/// Sign the unsigned transaction `data`, sent in a single message.
pub fn sign_tx<T: Transport>(
    client: &Client<T>,
    address_n: &[u32],
    data: &[u8],
    data_length: Option<u32>,
) -> Result<AlephiumSignedTx> {
    tracing::debug!("Data length: {} bytes", data.len());
    client.call_expect(AlephiumSignTx {
        address_n: address_n.to_vec(),
        data_initial_chunk: data.to_vec(),
        data_length,
    })
}

pub fn sign_message<T: Transport>(
    client: &Client<T>,
    address_n: &[u32],
    message: &str,
    message_type: &str,
) -> Result<AlephiumMessageSignature> {
    client.call_expect(AlephiumSignMessage {
        address_n: address_n.to_vec(),
        message: Some(message.as_bytes().to_vec()),
        message_type: Some(message_type.as_bytes().to_vec()),
    })
}
