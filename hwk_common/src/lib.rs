#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

mod error;
mod message;
mod path;

pub use crate::error::Error;
pub use crate::message::{parse_hex, prepare_message_bytes};
pub use crate::path::{derivation_path_to_vec, format_path, parse_path, vec_to_derivation_path};

/// Path used by default for the first Alephium account, `m/44'/1234'/0'/0/0`
pub const ALEPHIUM_DEFAULT_PATH: &str = "m/44'/1234'/0'/0/0";

pub type Result<T> = std::result::Result<T, Error>;
