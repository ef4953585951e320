use std::str::FromStr;

use elements::bitcoin::bip32::{ChildNumber, DerivationPath};

use crate::{Error, Result};

/// Parse a BIP-32 path into the sequence of child numbers sent to the device.
///
/// Hardened components may be marked with `'` or `h`, the leading `m/` is optional.
///
/// Example: "m/44'/1234'/0'/0/0"
pub fn parse_path(path: &str) -> Result<Vec<u32>> {
    let trimmed = path.trim();
    let components = match trimmed {
        "" | "m" | "m/" => return Ok(vec![]),
        s => s.strip_prefix("m/").unwrap_or(s),
    };

    components
        .split('/')
        .map(|c| {
            ChildNumber::from_str(c)
                .map(u32::from)
                .map_err(|source| Error::InvalidPath {
                    path: path.to_string(),
                    source,
                })
        })
        .collect()
}

/// Render a path as the raw integers returned by the device, `m/44/1234/0/0/0`.
///
/// Hardened components are not converted back to the `'` notation.
pub fn format_path(path: &[u32]) -> String {
    let mut s = String::from("m");
    for index in path {
        s.push('/');
        s.push_str(&index.to_string());
    }
    s
}

pub fn derivation_path_to_vec(path: &DerivationPath) -> Vec<u32> {
    path.into_iter().map(|e| (*e).into()).collect()
}

pub fn vec_to_derivation_path(path: &[u32]) -> DerivationPath {
    DerivationPath::from_iter(path.iter().cloned().map(Into::into))
}
