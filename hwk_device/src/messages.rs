//! Protobuf messages exchanged with the device.
//!
//! Only the messages used by the Benfen and Alephium commands and by the call loop are defined.
//! Optional fields follow the proto2 schema of the firmware, so repeated integers are not packed.

/// A protobuf message with its wire type identifier
pub trait DeviceMessage: prost::Message + Default {
    const KIND: MessageType;
}

macro_rules! device_messages {
    ($($name:ident = $kind:literal),* $(,)?) => {
        /// Wire identifiers of the known messages
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum MessageType {
            $($name = $kind,)*
        }

        impl TryFrom<u16> for MessageType {
            type Error = u16;

            fn try_from(kind: u16) -> Result<Self, Self::Error> {
                match kind {
                    $($kind => Ok(MessageType::$name),)*
                    other => Err(other),
                }
            }
        }

        impl std::fmt::Display for MessageType {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let name = match self {
                    $(MessageType::$name => stringify!($name),)*
                };
                write!(f, "{name}")
            }
        }

        $(
            impl DeviceMessage for $name {
                const KIND: MessageType = MessageType::$name;
            }
        )*
    };
}

device_messages!(
    Success = 2,
    Failure = 3,
    PinMatrixRequest = 18,
    ButtonRequest = 26,
    ButtonAck = 27,
    PassphraseRequest = 41,
    AlephiumGetAddress = 12101,
    AlephiumAddress = 12102,
    AlephiumSignTx = 12103,
    AlephiumSignedTx = 12104,
    AlephiumSignMessage = 12109,
    AlephiumMessageSignature = 12110,
    BenfenGetAddress = 12201,
    BenfenAddress = 12202,
    BenfenSignTx = 12203,
    BenfenSignedTx = 12204,
    BenfenSignMessage = 12207,
    BenfenMessageSignature = 12208,
);

impl MessageType {
    /// Human readable name of a wire identifier, including the ones not known to this crate
    pub fn name(kind: u16) -> String {
        match MessageType::try_from(kind) {
            Ok(t) => t.to_string(),
            Err(kind) => format!("unknown message {kind}"),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Success {
    #[prost(string, optional, tag = "1")]
    pub message: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Failure {
    #[prost(enumeration = "failure::FailureType", optional, tag = "1")]
    pub code: Option<i32>,
    #[prost(string, optional, tag = "2")]
    pub message: Option<String>,
}

pub mod failure {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum FailureType {
        UnexpectedMessage = 1,
        ButtonExpected = 2,
        DataError = 3,
        ActionCancelled = 4,
        PinExpected = 5,
        PinCancelled = 6,
        PinInvalid = 7,
        InvalidSignature = 8,
        ProcessError = 9,
        NotEnoughFunds = 10,
        NotInitialized = 11,
        PinMismatch = 12,
        WipeCodeMismatch = 13,
        InvalidSession = 14,
        FirmwareError = 99,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PinMatrixRequest {
    #[prost(int32, optional, tag = "1")]
    pub r#type: Option<i32>,
}

/// The device is waiting for a physical confirmation
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ButtonRequest {
    #[prost(int32, optional, tag = "1")]
    pub code: Option<i32>,
    #[prost(uint32, optional, tag = "2")]
    pub pages: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ButtonAck {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PassphraseRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BenfenGetAddress {
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub address_n: Vec<u32>,
    #[prost(bool, optional, tag = "2")]
    pub show_display: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BenfenAddress {
    #[prost(string, optional, tag = "1")]
    pub address: Option<String>,
}

/// Blind signing request, `raw_tx` is hashed and signed as a whole
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BenfenSignTx {
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub address_n: Vec<u32>,
    #[prost(bytes = "vec", required, tag = "2")]
    pub raw_tx: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub data_initial_chunk: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub coin_type: Option<Vec<u8>>,
    #[prost(uint32, optional, tag = "5")]
    pub data_length: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BenfenSignedTx {
    #[prost(bytes = "vec", required, tag = "1")]
    pub public_key: Vec<u8>,
    #[prost(bytes = "vec", required, tag = "2")]
    pub signature: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BenfenSignMessage {
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub address_n: Vec<u32>,
    #[prost(bytes = "vec", required, tag = "2")]
    pub message: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BenfenMessageSignature {
    #[prost(bytes = "vec", required, tag = "1")]
    pub signature: Vec<u8>,
    #[prost(string, optional, tag = "2")]
    pub address: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AlephiumGetAddress {
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub address_n: Vec<u32>,
    #[prost(bool, optional, tag = "2")]
    pub show_display: Option<bool>,
    #[prost(bool, optional, tag = "3")]
    pub include_public_key: Option<bool>,
    /// Group the derived address must belong to (0-3), the device searches the following indexes
    #[prost(uint32, optional, tag = "4")]
    pub target_group: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AlephiumAddress {
    #[prost(string, required, tag = "1")]
    pub address: String,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub public_key: Option<Vec<u8>>,
    /// Path actually used, it differs from the requested one when a target group is given
    #[prost(uint32, repeated, packed = "false", tag = "3")]
    pub derived_path: Vec<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AlephiumSignTx {
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub address_n: Vec<u32>,
    #[prost(bytes = "vec", required, tag = "2")]
    pub data_initial_chunk: Vec<u8>,
    #[prost(uint32, optional, tag = "3")]
    pub data_length: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AlephiumSignedTx {
    #[prost(bytes = "vec", required, tag = "1")]
    pub signature: Vec<u8>,
    #[prost(string, optional, tag = "2")]
    pub address: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AlephiumSignMessage {
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub address_n: Vec<u32>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub message: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub message_type: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AlephiumMessageSignature {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub signature: Option<Vec<u8>>,
    #[prost(string, optional, tag = "2")]
    pub address: Option<String>,
}
