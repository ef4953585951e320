use std::sync::Mutex;

use crate::{
    messages::{
        AlephiumMessageSignature, AlephiumSignedTx, BenfenMessageSignature, BenfenSignedTx,
        ButtonAck, ButtonRequest, Failure, MessageType,
    },
    wire::RawMessage,
    DeviceMessage, Error, Result, Transport,
};

/// A hardware wallet reachable through the transport `T`.
///
/// Every call is a single request, answered by a single response once the
/// device interactions (button presses) are done.
#[derive(Debug)]
pub struct Client<T: Transport> {
    transport: Mutex<T>,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Mutex::new(transport),
        }
    }

    pub fn into_transport(self) -> Result<T> {
        self.transport
            .into_inner()
            .map_err(|e| Error::PoisonError(e.to_string()))
    }

    /// Send `request` and return the first response that isn't a device interaction.
    ///
    /// Button requests are acknowledged, the user confirms on the device.
    /// A `Failure` from the device is returned as [`Error::Failure`].
    pub fn call<M: DeviceMessage>(&self, request: M) -> Result<RawMessage> {
        let mut transport = self.transport.lock()?;
        let mut message = RawMessage::encode(&request);

        loop {
            tracing::debug!(
                "\n--->\t{}\n\t({} bytes) {}",
                message.name(),
                message.payload.len(),
                hex::encode(&message.payload),
            );
            let response = transport.exchange(&message)?;
            tracing::debug!(
                "\n<---\t{}\n\t({} bytes) {}",
                response.name(),
                response.payload.len(),
                hex::encode(&response.payload),
            );

            match response.message_type() {
                Some(MessageType::ButtonRequest) => {
                    let button: ButtonRequest = response.decode()?;
                    tracing::info!("confirm on device (code: {:?})", button.code);
                    message = RawMessage::encode(&ButtonAck {});
                }
                Some(MessageType::Failure) => {
                    let failure: Failure = response.decode()?;
                    return Err(Error::Failure(failure.into()));
                }
                Some(t @ (MessageType::PinMatrixRequest | MessageType::PassphraseRequest)) => {
                    return Err(Error::UnsupportedInteraction(t.to_string()));
                }
                _ => return Ok(response),
            }
        }
    }

    /// Like [`Client::call`] but the response must be an `R`
    pub fn call_expect<M: DeviceMessage, R: DeviceMessage>(&self, request: M) -> Result<R> {
        self.call(request)?.decode()
    }
}

/// Responses carrying a signature
pub trait SignatureResponse {
    /// The signature, `None` when missing or empty
    fn signature_bytes(&self) -> Option<&[u8]>;
}

fn non_empty(bytes: &[u8]) -> Option<&[u8]> {
    (!bytes.is_empty()).then_some(bytes)
}

impl SignatureResponse for BenfenSignedTx {
    fn signature_bytes(&self) -> Option<&[u8]> {
        non_empty(&self.signature)
    }
}

impl SignatureResponse for BenfenMessageSignature {
    fn signature_bytes(&self) -> Option<&[u8]> {
        non_empty(&self.signature)
    }
}

impl SignatureResponse for AlephiumSignedTx {
    fn signature_bytes(&self) -> Option<&[u8]> {
        non_empty(&self.signature)
    }
}

impl SignatureResponse for AlephiumMessageSignature {
    fn signature_bytes(&self) -> Option<&[u8]> {
        self.signature.as_deref().and_then(non_empty)
    }
}
