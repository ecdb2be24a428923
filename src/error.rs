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
//! # Local validation errors
//!
//! Every variant is detected before anything is sent to a node.

use std::fmt::Display;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// Secret scalar is zero, not less than the curve order, or not 32 bytes
    InvalidSecret,
    /// OS entropy source failed
    RandomnessFailure,
    /// Max fee is below the priority fee, or the fee arithmetic overflows
    InvalidFeeConfiguration,
    /// Recipient is not a well-formed 20 byte address
    InvalidRecipient,
    /// Gas limit is below the allowed floor
    InvalidGasLimit,
    /// Amount has more fractional digits than the unit can hold
    AmountPrecisionLoss,
    /// Amount is not a plain decimal number or doesn't fit into 256 bits
    InvalidAmount(String),
    /// Signing key doesn't belong to the sender of the transaction
    KeyMismatch,
    /// Signature components are out of range
    MalformedSignature,
    /// No public key corresponds to the signature
    RecoveryFailure,
    /// Message is larger than `MAX_MESSAGE_BYTES`
    MessageTooLarge(usize),
    /// Input bytes are not a valid hex or RLP encoding
    InvalidEncoding(String),
}

impl std::error::Error for SignerError {}

impl From<secp256k1::Error> for SignerError {
    fn from(err: secp256k1::Error) -> Self {
        match err {
            secp256k1::Error::InvalidSecretKey => SignerError::InvalidSecret,
            secp256k1::Error::InvalidSignature | secp256k1::Error::InvalidRecoveryId => {
                SignerError::MalformedSignature
            }
            secp256k1::Error::InvalidMessage => SignerError::InvalidEncoding("message hash".to_string()),
            _ => SignerError::RecoveryFailure,
        }
    }
}

impl From<rand::Error> for SignerError {
    fn from(_: rand::Error) -> Self {
        SignerError::RandomnessFailure
    }
}

impl From<rlp::DecoderError> for SignerError {
    fn from(err: rlp::DecoderError) -> Self {
        SignerError::InvalidEncoding(err.to_string())
    }
}

impl From<hex::FromHexError> for SignerError {
    fn from(err: hex::FromHexError) -> Self {
        SignerError::InvalidEncoding(err.to_string())
    }
}
