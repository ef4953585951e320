use std::{
    net::SocketAddr,
    sync::{MutexGuard, PoisonError},
};

use crate::messages::{failure::FailureType, Failure};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Device failure: {0}")]
    Failure(FailureDetails),

    #[error("Unexpected message from the device, expected {expected} got {got}")]
    UnexpectedMessage { expected: String, got: String },

    #[error("The device requested {0}, which is not supported by this client")]
    UnsupportedInteraction(String),

    #[error("The device response is missing the {0} field")]
    MissingField(&'static str),

    #[error("Wire protocol error: {0}")]
    Wire(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    ProstDecode(#[from] prost::DecodeError),

    #[error(transparent)]
    Common(#[from] hwk_common::Error),

    #[error(transparent)]
    Hex(#[from] hex::FromHexError),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    HttpReqwest(#[from] reqwest::Error),

    #[error("Http request to {0} returned {1} instead of 200")]
    HttpStatus(String, u16),

    #[error("No device connected to the bridge")]
    NoDevice,

    #[error("The emulator at {0} is not responding")]
    EmulatorNotResponding(SocketAddr),

    #[error("Public key must be 32 bytes, got {0}")]
    InvalidPublicKey(usize),

    #[error("Invalid address \"{0}\"")]
    InvalidAddress(String),

    #[error("Poison error: {0}")]
    PoisonError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetails {
    pub code: Option<FailureType>,
    pub message: String,
}

impl From<Failure> for FailureDetails {
    fn from(failure: Failure) -> Self {
        FailureDetails {
            code: failure.code.and_then(|c| FailureType::try_from(c).ok()),
            message: failure.message.unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for FailureDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{code:?} - message: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(e: PoisonError<MutexGuard<'_, T>>) -> Self {
        Error::PoisonError(e.to_string())
    }
}
