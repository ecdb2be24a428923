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
//! # Signing and verification
//!
//! Transactions are signed over their typed payload and carry the y parity as `v`.
//! Messages are signed in the EIP-191 `personal_sign` form and carry `v` of 27 or 28.

use crate::{
    blockchain::ethereum::{
        address::EthereumAddress,
        eip191::{message_hash, MESSAGE_V_OFFSET},
        signature::{EthereumPrivateKey, EthereumSignature},
        transaction::{Eip1559Transaction, SignedTransaction},
    },
    error::SignerError,
};

/// Sign the transaction with the key of its sender
pub fn sign_transaction(
    tx: &Eip1559Transaction,
    key: &EthereumPrivateKey,
) -> Result<SignedTransaction, SignerError> {
    let signed = tx.sign(key)?;
    trace!("Signed transaction {}", hex::encode(signed.hash()));
    Ok(signed)
}

/// Sender address of a signed transaction
pub fn recover_transaction_sender(signed: &SignedTransaction) -> Result<EthereumAddress, SignerError> {
    signed.recover_sender()
}

/// Sign a message as `personal_sign` does
pub fn sign_message<M: AsRef<[u8]>>(
    msg: M,
    key: &EthereumPrivateKey,
) -> Result<EthereumSignature, SignerError> {
    let hash = message_hash(msg.as_ref())?;
    let mut signature = key.sign_hash(&hash)?;
    signature.v += MESSAGE_V_OFFSET;
    Ok(signature)
}

/// Address which signed the message
pub fn recover_address<M: AsRef<[u8]>>(
    msg: M,
    signature: &EthereumSignature,
) -> Result<EthereumAddress, SignerError> {
    let hash = message_hash(msg.as_ref())?;
    signature.recover_address(&hash)
}

/// Check that the message was signed by `expected`.
///
/// A mismatch is a normal `false`. So is a malformed signature or a message that can't be
/// hashed, nothing would verify for them.
pub fn verify<M: AsRef<[u8]>>(msg: M, signature: &EthereumSignature, expected: &EthereumAddress) -> bool {
    match recover_address(msg, signature) {
        Ok(address) => address == *expected,
        Err(e) => {
            debug!("Signature doesn't verify: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        blockchain::ethereum::{eip191::MAX_MESSAGE_BYTES, fees::FeeParameters, transaction::TransactionBuilder},
        tests::*,
        U256,
    };
    use quickcheck::{quickcheck, TestResult};
    use std::str::FromStr;

    fn key() -> EthereumPrivateKey {
        EthereumPrivateKey::from_str(
            "0x4646464646464646464646464646464646464646464646464646464646464646",
        )
        .unwrap()
    }

    fn key_one() -> EthereumPrivateKey {
        let mut secret = [0u8; 32];
        secret[31] = 1;
        EthereumPrivateKey::from_secret(secret).unwrap()
    }

    #[test]
    fn sign_message_known_vector() {
        let signature = sign_message("test-test-test", &key()).unwrap();
        assert_eq!(
            signature.to_string(),
            "0xc26a3a1922d97e573db507e82cbace7b57e54106cc96d598d29ac16aabe48153313302cb629b7307baae0ae5e74f68e58564615ccfde0d03603381e1a233e0ed1c"
        );
        assert_eq!(signature.v, 28);
    }

    #[test]
    fn sign_and_recover_message() {
        let key = key_one();
        let signature = sign_message("Hello, Web3!", &key).unwrap();

        assert!(signature.v == 27 || signature.v == 28);
        assert_eq!(
            recover_address("Hello, Web3!", &signature).unwrap(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf".parse().unwrap()
        );
        assert!(verify("Hello, Web3!", &signature, &key.address()));
    }

    #[test]
    fn sign_empty_message() {
        let key = key_one();
        let signature = sign_message("", &key).unwrap();
        assert!(verify("", &signature, &key.address()));
    }

    #[test]
    fn verify_tampered_message() {
        let key = key_one();
        let signature = sign_message("Hello, Web3!", &key).unwrap();

        assert!(!verify("Hello, Web3?", &signature, &key.address()));
    }

    #[test]
    fn verify_other_address() {
        let signature = sign_message("Hello, Web3!", &key_one()).unwrap();

        assert!(!verify("Hello, Web3!", &signature, &key().address()));
    }

    #[test]
    fn verify_malformed_signature() {
        let key = key_one();
        let mut signature = sign_message("Hello, Web3!", &key).unwrap();
        signature.v = 30;
        assert!(!verify("Hello, Web3!", &signature, &key.address()));

        let zero = EthereumSignature::default();
        assert!(!verify("Hello, Web3!", &zero, &key.address()));
    }

    #[test]
    fn verify_rejects_high_s() {
        let key = key_one();
        let mut signature = sign_message("Hello, Web3!", &key).unwrap();
        // s' = n - s recovers the same key on a malleable verifier
        let n = U256::from_big_endian(&to_32bytes(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
        ));
        let high = n - U256::from_big_endian(&signature.s);
        high.to_big_endian(&mut signature.s);
        signature.v = if signature.v == 27 { 28 } else { 27 };

        assert_eq!(
            recover_address("Hello, Web3!", &signature),
            Err(SignerError::MalformedSignature)
        );
        assert!(!verify("Hello, Web3!", &signature, &key.address()));
    }

    #[test]
    fn message_too_large() {
        let msg = vec![0u8; MAX_MESSAGE_BYTES + 1];
        assert_eq!(
            sign_message(&msg, &key()).err(),
            Some(SignerError::MessageTooLarge(MAX_MESSAGE_BYTES + 1))
        );
        assert_eq!(
            recover_address(&msg, &EthereumSignature::default()),
            Err(SignerError::MessageTooLarge(MAX_MESSAGE_BYTES + 1))
        );
        assert!(!verify(&msg, &EthereumSignature::default(), &key().address()));
    }

    #[test]
    fn sign_transaction_recovers_sender() {
        let key = key();
        let fees = FeeParameters {
            base_fee: U256::from(1_000_000_000u64),
            max_priority_fee_per_gas: U256::from(100_000_000u64),
            max_fee_per_gas: U256::from(2_100_000_000u64),
        };
        let tx = TransactionBuilder::new()
            .build(
                key.address(),
                to_20bytes("3535353535353535353535353535353535353535"),
                U256::from(1_000u64),
                21_000,
                &fees,
                0,
                11155111,
            )
            .unwrap();
        let signed = sign_transaction(&tx, &key).unwrap();

        assert!(signed.signature.v <= 1);
        assert_eq!(recover_transaction_sender(&signed).unwrap(), key.address());
    }

    #[test]
    fn message_round_trip() {
        fn prop(seed: u64, msg: Vec<u8>) -> TestResult {
            let mut secret = [0u8; 32];
            secret[24..32].copy_from_slice(&seed.to_be_bytes());
            let key = match EthereumPrivateKey::from_secret(secret) {
                Ok(key) => key,
                Err(_) => return TestResult::discard(),
            };
            let signature = sign_message(&msg, &key).unwrap();
            TestResult::from_bool(verify(&msg, &signature, &key.address()))
        }
        quickcheck(prop as fn(u64, Vec<u8>) -> TestResult);
    }
}
