use elements::bitcoin::bip32;

#[allow(missing_docs)]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid derivation path \"{path}\": {source}")]
    InvalidPath { path: String, source: bip32::Error },

    #[error("Invalid hex \"{input}\": {source}")]
    InvalidHex {
        input: String,
        source: hex::FromHexError,
    },
}
