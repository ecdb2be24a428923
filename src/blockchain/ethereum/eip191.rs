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

//!
//! A basic Ethereum like signature to authenticate a plain text message.
//!
//! Used by `personal_sign` JSON RPC
//!
//! See:
//! - https://eips.ethereum.org/EIPS/eip-191
//!

use crate::{
    error::SignerError,
    util::{keccak256, KECCAK256_BYTES},
};

const PREFIX: &[u8] = "Ethereum Signed Message:\n".as_bytes();

/// Largest message accepted for signing or verification, 1 MiB
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// Offset added to the recovery id of a message signature
pub const MESSAGE_V_OFFSET: u8 = 27;

/// `0x19 || "Ethereum Signed Message:\n" || decimal(len) || message`
pub fn as_sign_message(msg: &[u8]) -> Result<Vec<u8>, SignerError> {
    if msg.len() > MAX_MESSAGE_BYTES {
        return Err(SignerError::MessageTooLarge(msg.len()));
    }
    let mut buf = Vec::with_capacity(1 + PREFIX.len() + 8 + msg.len());
    buf.push(0x19);
    buf.extend_from_slice(PREFIX);
    buf.extend_from_slice(msg.len().to_string().as_bytes());
    buf.extend_from_slice(msg);
    Ok(buf)
}

/// Keccak-256 of the prefixed message
pub fn message_hash(msg: &[u8]) -> Result<[u8; KECCAK256_BYTES], SignerError> {
    as_sign_message(msg).map(|buf| keccak256(&buf))
}
