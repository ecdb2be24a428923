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
//! # Account ECDSA signatures using the SECG curve secp256k1

use super::address::EthereumAddress;
use crate::{
    error::SignerError,
    util::{to_arr, KECCAK256_BYTES},
};
use rand::{rngs::OsRng, RngCore};
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    All,
    Message,
    PublicKey,
    Secp256k1,
    SecretKey,
    ONE_KEY,
};
use std::{convert::TryFrom, fmt, ptr, str, sync::atomic};
use zeroize::Zeroize;

/// Private key length in bytes
pub const PRIVATE_KEY_BYTES: usize = 32;

/// ECDSA crypto signature length in bytes
pub const ECDSA_SIGNATURE_BYTES: usize = 65;

/// How many times a random candidate is redrawn before the entropy source is considered broken
const GENERATE_ATTEMPTS: usize = 16;

/// Order of the secp256k1 group (n), big-endian
const SECP256K1_N: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// n / 2, the largest canonical `s`
const SECP256K1_HALF_N: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

lazy_static! {
    static ref ECDSA: Secp256k1<All> = Secp256k1::new();
}

/// Transaction sign data (see Appendix F. "Signing Transactions" from Yellow Paper)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EthereumSignature {
    /// ‘recovery id’, 0 or 1 for transactions (y parity), 27 or 28 for messages
    pub v: u8,

    /// ECDSA signature first point (0 < r < secp256k1n)
    pub r: [u8; 32],

    /// ECDSA signature second point (0 < s < secp256k1n ÷ 2 + 1)
    pub s: [u8; 32],
}

impl EthereumSignature {
    /// Recovery id with the message offset (27) removed
    pub fn recovery_id(&self) -> Result<RecoveryId, SignerError> {
        let id = match self.v {
            0 | 27 => 0,
            1 | 28 => 1,
            _ => return Err(SignerError::MalformedSignature),
        };
        RecoveryId::from_i32(id).map_err(|_| SignerError::MalformedSignature)
    }

    /// Check that `r` and `s` are in `[1, n)` and that `s` is in the lower half of the order.
    pub fn check_range(&self) -> Result<(), SignerError> {
        let zero = [0u8; 32];
        if self.r == zero || self.r >= SECP256K1_N {
            return Err(SignerError::MalformedSignature);
        }
        if self.s == zero || self.s > SECP256K1_HALF_N {
            return Err(SignerError::MalformedSignature);
        }
        Ok(())
    }

    /// Recover the public key which produced the signature for the hash
    pub fn recover(&self, hash: &[u8; KECCAK256_BYTES]) -> Result<PublicKey, SignerError> {
        self.check_range()?;
        let rid = self.recovery_id()?;

        let mut compact = [0u8; 64];
        compact[0..32].copy_from_slice(&self.r);
        compact[32..64].copy_from_slice(&self.s);
        let sig = RecoverableSignature::from_compact(&compact, rid)
            .map_err(|_| SignerError::MalformedSignature)?;

        let msg = Message::from_slice(hash)?;
        ECDSA
            .recover_ecdsa(&msg, &sig)
            .map_err(|_| SignerError::RecoveryFailure)
    }

    /// Recover the address which produced the signature for the hash
    pub fn recover_address(&self, hash: &[u8; KECCAK256_BYTES]) -> Result<EthereumAddress, SignerError> {
        self.recover(hash).map(EthereumAddress::from)
    }

    /// 65 bytes of `r || s || v`
    pub fn to_bytes(&self) -> [u8; ECDSA_SIGNATURE_BYTES] {
        let mut buf = [0u8; ECDSA_SIGNATURE_BYTES];
        buf[0..32].copy_from_slice(&self.r);
        buf[32..64].copy_from_slice(&self.s);
        buf[64] = self.v;
        buf
    }
}

impl From<[u8; ECDSA_SIGNATURE_BYTES]> for EthereumSignature {
    fn from(data: [u8; ECDSA_SIGNATURE_BYTES]) -> Self {
        EthereumSignature {
            r: to_arr(&data[0..32]),
            s: to_arr(&data[32..64]),
            v: data[64],
        }
    }
}

impl str::FromStr for EthereumSignature {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.strip_prefix("0x").unwrap_or(s);
        if value.len() != ECDSA_SIGNATURE_BYTES * 2 {
            return Err(SignerError::MalformedSignature);
        }
        let bytes = hex::decode(value).map_err(|_| SignerError::MalformedSignature)?;
        let mut buf = [0u8; ECDSA_SIGNATURE_BYTES];
        buf.copy_from_slice(&bytes);
        Ok(EthereumSignature::from(buf))
    }
}

impl fmt::Display for EthereumSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

/// Private key used as x in an ECDSA signature.
///
/// The secret is kept in a single `SecretKey`, it never leaves the struct except through
/// [`EthereumPrivateKey::export_hex`] and it's overwritten when the key is dropped.
pub struct EthereumPrivateKey {
    secret: SecretKey,
    public: PublicKey,
}

impl EthereumPrivateKey {
    /// Generate a new `PrivateKey` at random (`rand::OsRng`)
    pub fn generate() -> Result<Self, SignerError> {
        Self::generate_with(&mut OsRng)
    }

    /// Generate a new `PrivateKey` with given custom random generator
    pub fn generate_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<Self, SignerError> {
        let mut candidate = [0u8; PRIVATE_KEY_BYTES];
        for _ in 0..GENERATE_ATTEMPTS {
            rng.try_fill_bytes(&mut candidate)?;
            if let Ok(key) = EthereumPrivateKey::from_secret(candidate) {
                candidate.zeroize();
                return Ok(key);
            }
        }
        candidate.zeroize();
        Err(SignerError::RandomnessFailure)
    }

    /// Load a key from a 32 byte secret scalar
    ///
    /// # Example
    ///
    /// ```
    /// let mut secret = [0u8; emerald_signer::PRIVATE_KEY_BYTES];
    /// secret[31] = 1;
    /// let pk = emerald_signer::EthereumPrivateKey::from_secret(secret).unwrap();
    /// assert_eq!(pk.address().to_string(), "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    /// ```
    pub fn from_secret(mut secret: [u8; PRIVATE_KEY_BYTES]) -> Result<Self, SignerError> {
        let key = SecretKey::from_slice(&secret);
        secret.zeroize();
        let secret = key.map_err(|_| SignerError::InvalidSecret)?;
        let public = PublicKey::from_secret_key(&ECDSA, &secret);
        Ok(EthereumPrivateKey { secret, public })
    }

    /// Extract `Address` from current private key.
    pub fn address(&self) -> EthereumAddress {
        EthereumAddress::from(self.public)
    }

    /// Uncompressed public key without the `04` tag
    pub fn public_key(&self) -> [u8; 64] {
        let mut buf = [0u8; 64];
        buf.copy_from_slice(&self.public.serialize_uncompressed()[1..]);
        buf
    }

    /// Hex encoded secret, with `0x` prefix
    pub fn export_hex(&self) -> String {
        let mut bytes = self.secret.secret_bytes();
        let value = format!("0x{}", hex::encode(bytes));
        bytes.zeroize();
        value
    }

    /// Sign a 32 byte hash. Nonces are deterministic (RFC6979) and `s` is always in the lower
    /// half of the curve order. Returned `v` is the plain recovery id, 0 or 1.
    pub(crate) fn sign_hash(&self, hash: &[u8; KECCAK256_BYTES]) -> Result<EthereumSignature, SignerError> {
        let msg = Message::from_slice(hash)?;
        let (rid, sig) = ECDSA.sign_ecdsa_recoverable(&msg, &self.secret).serialize_compact();

        Ok(EthereumSignature {
            v: rid.to_i32() as u8,
            r: to_arr(&sig[0..32]),
            s: to_arr(&sig[32..64]),
        })
    }
}

impl TryFrom<&[u8]> for EthereumPrivateKey {
    type Error = SignerError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        if data.len() != PRIVATE_KEY_BYTES {
            return Err(SignerError::InvalidSecret);
        }
        EthereumPrivateKey::from_secret(to_arr(data))
    }
}

impl str::FromStr for EthereumPrivateKey {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.strip_prefix("0x").unwrap_or(s);
        if value.len() != PRIVATE_KEY_BYTES * 2 {
            return Err(SignerError::InvalidSecret);
        }

        let mut bytes = hex::decode(value).map_err(|_| SignerError::InvalidSecret)?;
        let key = EthereumPrivateKey::try_from(bytes.as_slice());
        bytes.zeroize();
        key
    }
}

impl PartialEq for EthereumPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public
    }
}

impl Eq for EthereumPrivateKey {}

impl fmt::Debug for EthereumPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EthereumPrivateKey({})", self.address())
    }
}

impl EthereumPrivateKey {
    /// Replace the secret with the scalar `1`
    fn wipe(&mut self) {
        // SAFETY: `self.secret` is a valid, aligned `Copy` value without drop glue
        unsafe { ptr::write_volatile(&mut self.secret, ONE_KEY) };
        atomic::compiler_fence(atomic::Ordering::SeqCst);
    }
}

impl Drop for EthereumPrivateKey {
    fn drop(&mut self) {
        self.wipe();
    }
}
