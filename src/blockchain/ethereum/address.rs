/*
Copyright 2026 EmeraldPay, Inc

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/
//! # Account address (20 bytes)

use crate::{
    error::SignerError,
    util::{keccak256, to_arr},
};
use secp256k1::PublicKey;
use std::{convert::TryFrom, fmt, ops, str::FromStr};

/// Fixed bytes number to represent `Address`
pub const ETHEREUM_ADDRESS_BYTES: usize = 20;

/// Account address (20 bytes)
///
/// Stored as raw bytes, so parsing is case-insensitive and the mixed-case checksum
/// form is only a matter of presentation.
#[derive(Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EthereumAddress(pub [u8; ETHEREUM_ADDRESS_BYTES]);

impl ops::Deref for EthereumAddress {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<[u8; ETHEREUM_ADDRESS_BYTES]> for EthereumAddress {
    fn from(bytes: [u8; ETHEREUM_ADDRESS_BYTES]) -> Self {
        EthereumAddress(bytes)
    }
}

impl AsRef<[u8]> for EthereumAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for EthereumAddress {
    type Error = SignerError;

    /// # Example
    ///
    /// ```
    /// use std::convert::TryFrom;
    /// let addr = emerald_signer::EthereumAddress::try_from(&[0u8; emerald_signer::ETHEREUM_ADDRESS_BYTES][..]).unwrap();
    /// assert_eq!(addr.to_string(), "0x0000000000000000000000000000000000000000");
    /// ```
    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        if data.len() != ETHEREUM_ADDRESS_BYTES {
            return Err(SignerError::InvalidRecipient);
        }

        Ok(EthereumAddress(to_arr(data)))
    }
}

impl FromStr for EthereumAddress {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.strip_prefix("0x").unwrap_or(s);
        if value.len() != ETHEREUM_ADDRESS_BYTES * 2 {
            return Err(SignerError::InvalidRecipient);
        }

        let bytes = hex::decode(value).map_err(|_| SignerError::InvalidRecipient)?;
        EthereumAddress::try_from(bytes.as_slice())
    }
}

impl From<PublicKey> for EthereumAddress {
    fn from(value: PublicKey) -> Self {
        let hash = keccak256(&value.serialize_uncompressed()[1..] /* cut '04' */);
        EthereumAddress(to_arr(&hash[12..]))
    }
}

impl fmt::Display for EthereumAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for EthereumAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
