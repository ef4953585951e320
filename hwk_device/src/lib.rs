#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

pub mod alephium;
pub mod benfen;
mod client;
mod connection;
pub mod consts;
pub mod error;
pub mod messages;
pub mod wire;

#[cfg(feature = "test_mock")]
pub mod mock;

pub use client::{Client, SignatureResponse};
pub use connection::{BridgeTransport, Connection, Transport, UdpTransport};
pub use consts::{DEFAULT_BRIDGE_URL, DEFAULT_EMULATOR_ADDR, TIMEOUT};
pub use error::Error;
pub use messages::{DeviceMessage, MessageType};
pub use wire::RawMessage;

pub type Result<T> = std::result::Result<T, error::Error>;
