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
//! # Account transaction
//!
//! EIP-1559 fee market transaction in the EIP-2718 typed envelope:
//! `0x02 || rlp([chain_id, nonce, max_priority_fee_per_gas, max_fee_per_gas, gas_limit, to,
//! value, data, access_list, y_parity, r, s])`

use super::{
    address::{EthereumAddress, ETHEREUM_ADDRESS_BYTES},
    fees::FeeParameters,
    hex::EthereumHex,
    signature::{EthereumPrivateKey, EthereumSignature},
};
use crate::{
    error::SignerError,
    units,
    util::{keccak256, KECCAK256_BYTES},
};
use ethers_core::types::U256;
use rlp::{Rlp, RlpStream};
use std::{convert::TryFrom, str::FromStr};

/// EIP-2718 type of a fee market transaction
pub const EIP1559_TX_TYPE: u8 = 0x02;

/// Gas used by a plain value transfer
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

const UNSIGNED_FIELDS: usize = 9;
const SIGNED_FIELDS: usize = 12;

/// Transaction data
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eip1559Transaction {
    /// Chain Id, replay protection
    pub chain_id: u64,

    /// Nonce
    pub nonce: u64,

    /// Sender, not part of the encoding and recovered from the signature when decoded
    pub from: EthereumAddress,

    /// Target address
    pub to: EthereumAddress,

    /// Value transferred with transaction, in wei
    pub value: U256,

    /// Gas Limit
    pub gas_limit: u64,

    /// Max Priority Fee per gas, in wei
    pub max_priority_fee_per_gas: U256,

    /// Max Fee per gas, in wei
    pub max_fee_per_gas: U256,

    /// Data transferred with transaction
    pub data: Vec<u8>,
}

impl Eip1559Transaction {
    fn append_fields(&self, rlp: &mut RlpStream) {
        rlp.append(&self.chain_id);
        rlp.append(&self.nonce);
        rlp.append(&self.max_priority_fee_per_gas);
        rlp.append(&self.max_fee_per_gas);
        rlp.append(&self.gas_limit);
        rlp.append(&self.to.to_vec());
        rlp.append(&self.value);
        rlp.append(&self.data);
        // access list is always empty
        rlp.begin_list(0);
    }

    /// Typed payload signed by the sender, i.e. the transaction without a signature
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut rlp = RlpStream::new_list(UNSIGNED_FIELDS);
        self.append_fields(&mut rlp);
        typed(&rlp.out())
    }

    pub fn signing_hash(&self) -> [u8; KECCAK256_BYTES] {
        keccak256(&self.signing_payload())
    }

    /// The largest amount the sender may spend, `value + gas_limit * max_fee_per_gas`
    pub fn max_cost(&self) -> Option<U256> {
        self.max_fee_per_gas
            .checked_mul(U256::from(self.gas_limit))
            .and_then(|gas| gas.checked_add(self.value))
    }

    /// Sign transaction data with provided private key
    pub fn sign(&self, key: &EthereumPrivateKey) -> Result<SignedTransaction, SignerError> {
        if key.address() != self.from {
            return Err(SignerError::KeyMismatch);
        }
        let signature = key.sign_hash(&self.signing_hash())?;
        Ok(SignedTransaction {
            tx: self.clone(),
            signature,
        })
    }
}

fn typed(body: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + body.len());
    buf.push(EIP1559_TX_TYPE);
    buf.extend_from_slice(body);
    buf
}

/// Transaction with its signature, `v` of the signature is the y parity (0 or 1)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub tx: Eip1559Transaction,
    pub signature: EthereumSignature,
}

impl SignedTransaction {
    /// Raw bytes as accepted by `eth_sendRawTransaction`
    pub fn to_raw(&self) -> Vec<u8> {
        let mut rlp = RlpStream::new_list(SIGNED_FIELDS);
        self.tx.append_fields(&mut rlp);
        rlp.append(&self.signature.v);
        rlp.append(&U256::from_big_endian(&self.signature.r));
        rlp.append(&U256::from_big_endian(&self.signature.s));
        typed(&rlp.out())
    }

    pub fn to_hex(&self) -> String {
        EthereumHex::encode(self.to_raw())
    }

    /// Transaction hash, as the network identifies the transaction
    pub fn hash(&self) -> [u8; KECCAK256_BYTES] {
        keccak256(&self.to_raw())
    }

    pub fn recover_sender(&self) -> Result<EthereumAddress, SignerError> {
        self.signature.recover_address(&self.tx.signing_hash())
    }

    /// Decode raw signed transaction. The sender is recovered from the signature.
    pub fn decode(raw: &[u8]) -> Result<SignedTransaction, SignerError> {
        let (tx_type, body) = raw
            .split_first()
            .ok_or_else(|| SignerError::InvalidEncoding("empty transaction".to_string()))?;
        if *tx_type != EIP1559_TX_TYPE {
            return Err(SignerError::InvalidEncoding(format!(
                "unsupported transaction type 0x{:02x}",
                tx_type
            )));
        }

        let rlp = Rlp::new(body);
        if !rlp.is_list() {
            return Err(SignerError::InvalidEncoding("not a list".to_string()));
        }
        let info = rlp.payload_info()?;
        if info.header_len + info.value_len != body.len() {
            return Err(SignerError::InvalidEncoding("trailing bytes".to_string()));
        }
        if rlp.item_count()? != SIGNED_FIELDS {
            return Err(SignerError::InvalidEncoding(format!(
                "expected {} fields",
                SIGNED_FIELDS
            )));
        }

        let to: Vec<u8> = rlp.val_at(5)?;
        let access_list = rlp.at(8)?;
        if !access_list.is_list() || access_list.item_count()? != 0 {
            return Err(SignerError::InvalidEncoding(
                "access list is not supported".to_string(),
            ));
        }

        let y_parity: u8 = rlp.val_at(9)?;
        if y_parity > 1 {
            return Err(SignerError::MalformedSignature);
        }
        let r: U256 = rlp.val_at(10)?;
        let s: U256 = rlp.val_at(11)?;
        let mut signature = EthereumSignature {
            v: y_parity,
            ..EthereumSignature::default()
        };
        r.to_big_endian(&mut signature.r);
        s.to_big_endian(&mut signature.s);

        let mut tx = Eip1559Transaction {
            chain_id: rlp.val_at(0)?,
            nonce: rlp.val_at(1)?,
            from: EthereumAddress::default(),
            to: EthereumAddress::try_from(to.as_slice())?,
            value: rlp.val_at(6)?,
            gas_limit: rlp.val_at(4)?,
            max_priority_fee_per_gas: rlp.val_at(2)?,
            max_fee_per_gas: rlp.val_at(3)?,
            data: rlp.val_at(7)?,
        };
        tx.from = signature.recover_address(&tx.signing_hash())?;

        Ok(SignedTransaction { tx, signature })
    }
}

/// Recipient of a transaction, given as an address, raw bytes or hex text
pub trait ToRecipient {
    fn to_recipient(&self) -> Result<EthereumAddress, SignerError>;
}

impl ToRecipient for EthereumAddress {
    fn to_recipient(&self) -> Result<EthereumAddress, SignerError> {
        Ok(*self)
    }
}

impl ToRecipient for [u8; ETHEREUM_ADDRESS_BYTES] {
    fn to_recipient(&self) -> Result<EthereumAddress, SignerError> {
        Ok(EthereumAddress::from(*self))
    }
}

/// Exactly 20 raw bytes
impl ToRecipient for [u8] {
    fn to_recipient(&self) -> Result<EthereumAddress, SignerError> {
        EthereumAddress::try_from(self)
    }
}

impl ToRecipient for Vec<u8> {
    fn to_recipient(&self) -> Result<EthereumAddress, SignerError> {
        self.as_slice().to_recipient()
    }
}

/// 40 hex characters, `0x` prefix is optional
impl ToRecipient for str {
    fn to_recipient(&self) -> Result<EthereumAddress, SignerError> {
        EthereumAddress::from_str(self)
    }
}

impl ToRecipient for String {
    fn to_recipient(&self) -> Result<EthereumAddress, SignerError> {
        self.as_str().to_recipient()
    }
}

impl<T: ToRecipient + ?Sized> ToRecipient for &T {
    fn to_recipient(&self) -> Result<EthereumAddress, SignerError> {
        (**self).to_recipient()
    }
}

/// Assembles and validates unsigned transactions
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    min_gas_limit: u64,
    data: Vec<u8>,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        TransactionBuilder {
            min_gas_limit: TRANSFER_GAS_LIMIT,
            data: Vec::new(),
        }
    }
}

impl TransactionBuilder {
    pub fn new() -> Self {
        TransactionBuilder::default()
    }

    /// Allow a gas limit below the plain transfer cost. Only for a contract call where the caller
    /// knows the exact gas usage.
    pub fn with_min_gas_limit(self, min_gas_limit: u64) -> Self {
        TransactionBuilder {
            min_gas_limit,
            ..self
        }
    }

    pub fn with_data(self, data: Vec<u8>) -> Self {
        TransactionBuilder { data, ..self }
    }

    /// Exact conversion of an ether amount, like `"0.15"`, to wei
    pub fn value_from_decimal(amount: &str) -> Result<U256, SignerError> {
        units::parse_ether(amount)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn build<R: ToRecipient>(
        &self,
        sender: EthereumAddress,
        recipient: R,
        value: U256,
        gas_limit: u64,
        fee: &FeeParameters,
        nonce: u64,
        chain_id: u64,
    ) -> Result<Eip1559Transaction, SignerError> {
        let to = recipient.to_recipient()?;
        if gas_limit < self.min_gas_limit {
            return Err(SignerError::InvalidGasLimit);
        }
        fee.validate()?;

        Ok(Eip1559Transaction {
            chain_id,
            nonce,
            from: sender,
            to,
            value,
            gas_limit,
            max_priority_fee_per_gas: fee.max_priority_fee_per_gas,
            max_fee_per_gas: fee.max_fee_per_gas,
            data: self.data.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;
    use quickcheck::{quickcheck, TestResult};

    const GWEI: u64 = 1_000_000_000;

    fn key() -> EthereumPrivateKey {
        EthereumPrivateKey::from_str(
            "0x4646464646464646464646464646464646464646464646464646464646464646",
        )
        .unwrap()
    }

    fn fees() -> FeeParameters {
        FeeParameters {
            base_fee: U256::from(GWEI),
            max_priority_fee_per_gas: U256::from(100_000_000u64),
            max_fee_per_gas: U256::from(2_100_000_000u64),
        }
    }

    fn transfer() -> Eip1559Transaction {
        TransactionBuilder::new()
            .build(
                key().address(),
                to_20bytes("3535353535353535353535353535353535353535"),
                U256::from(1_000_000_000_000_000_000u64),
                TRANSFER_GAS_LIMIT,
                &fees(),
                9,
                1,
            )
            .unwrap()
    }

    #[test]
    fn encode_signing_payload() {
        let tx = Eip1559Transaction {
            chain_id: 1,
            nonce: 0,
            from: EthereumAddress::default(),
            to: "0x3535353535353535353535353535353535353535".parse().unwrap(),
            value: U256::zero(),
            gas_limit: 21000,
            max_priority_fee_per_gas: U256::from(1u64),
            max_fee_per_gas: U256::from(2u64),
            data: Vec::new(),
        };

        assert_eq!(
            hex::encode(tx.signing_payload()),
            "".to_owned() +
                "02" + // type
                "df" + // list, 31 bytes
                "01" + // chain id
                "80" + // nonce
                "01" + // max priority fee
                "02" + // max fee
                "82" + "5208" + // gas
                "94" + "3535353535353535353535353535353535353535" + // to
                "80" + // value
                "80" + // data
                "c0" // access list
        );
    }

    #[test]
    fn encode_signing_payload_with_value() {
        let tx = transfer();
        let payload = hex::encode(tx.signing_payload());

        assert_eq!(
            payload,
            "02\
             ef\
             01\
             09\
             84\
             05f5e100\
             84\
             7d2b7500\
             82\
             5208\
             94\
             3535353535353535353535353535353535353535\
             88\
             0de0b6b3a7640000\
             80\
             c0"
        );
    }

    #[test]
    fn sign_and_decode() {
        let tx = transfer();
        let signed = tx.sign(&key()).unwrap();
        let raw = signed.to_raw();

        assert_eq!(raw[0], EIP1559_TX_TYPE);
        assert!(signed.signature.v <= 1);

        let decoded = SignedTransaction::decode(&raw).unwrap();
        assert_eq!(decoded, signed);
        assert_eq!(decoded.tx.from, key().address());
        assert_eq!(decoded.hash(), keccak256(&raw));
    }

    #[test]
    fn sign_is_deterministic() {
        let tx = transfer();
        assert_eq!(
            tx.sign(&key()).unwrap().to_raw(),
            tx.sign(&key()).unwrap().to_raw()
        );
    }

    #[test]
    fn sign_with_other_key_fails() {
        let tx = transfer();
        let other = EthereumPrivateKey::from_secret(to_32bytes(
            "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
        ))
        .unwrap();

        assert_eq!(tx.sign(&other).err(), Some(SignerError::KeyMismatch));
    }

    #[test]
    fn hex_of_signed() {
        let signed = transfer().sign(&key()).unwrap();
        assert!(signed.to_hex().starts_with("0x02f8"));
        assert_eq!(EthereumHex::decode(signed.to_hex()).unwrap(), signed.to_raw());
    }

    #[test]
    fn tampered_payload_changes_sender() {
        let signed = transfer().sign(&key()).unwrap();
        let mut tampered = signed.clone();
        tampered.tx.nonce += 1;

        let decoded = SignedTransaction::decode(&tampered.to_raw());
        match decoded {
            Ok(decoded) => assert_ne!(decoded.tx.from, key().address()),
            Err(e) => assert_eq!(e, SignerError::RecoveryFailure),
        }
    }

    #[test]
    fn decode_rejects_legacy() {
        let raw = hex::decode("f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83").unwrap();
        assert!(matches!(
            SignedTransaction::decode(&raw),
            Err(SignerError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn decode_rejects_empty_and_trailing() {
        assert!(SignedTransaction::decode(&[]).is_err());

        let mut raw = transfer().sign(&key()).unwrap().to_raw();
        raw.push(0x00);
        assert!(matches!(
            SignedTransaction::decode(&raw),
            Err(SignerError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn decode_rejects_access_list() {
        let signed = transfer().sign(&key()).unwrap();
        let tx = &signed.tx;
        let mut rlp = RlpStream::new_list(SIGNED_FIELDS);
        rlp.append(&tx.chain_id);
        rlp.append(&tx.nonce);
        rlp.append(&tx.max_priority_fee_per_gas);
        rlp.append(&tx.max_fee_per_gas);
        rlp.append(&tx.gas_limit);
        rlp.append(&tx.to.to_vec());
        rlp.append(&tx.value);
        rlp.append(&tx.data);
        rlp.begin_list(1);
        rlp.begin_list(2);
        rlp.append(&tx.to.to_vec());
        rlp.begin_list(0);
        rlp.append(&signed.signature.v);
        rlp.append(&U256::from_big_endian(&signed.signature.r));
        rlp.append(&U256::from_big_endian(&signed.signature.s));

        assert!(matches!(
            SignedTransaction::decode(&typed(&rlp.out())),
            Err(SignerError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn build_rejects_short_recipient() {
        let result = TransactionBuilder::new().build(
            key().address(),
            vec![0x35u8; 19],
            U256::zero(),
            TRANSFER_GAS_LIMIT,
            &fees(),
            0,
            1,
        );
        assert_eq!(result, Err(SignerError::InvalidRecipient));
    }

    fn build_to<R: ToRecipient>(recipient: R) -> Result<Eip1559Transaction, SignerError> {
        TransactionBuilder::new().build(
            key().address(),
            recipient,
            U256::zero(),
            TRANSFER_GAS_LIMIT,
            &fees(),
            0,
            1,
        )
    }

    #[test]
    fn build_accepts_hex_recipient() {
        let expected = EthereumAddress::from(to_20bytes("3535353535353535353535353535353535353535"));

        for recipient in &[
            "0x3535353535353535353535353535353535353535",
            "3535353535353535353535353535353535353535",
        ] {
            assert_eq!(build_to(*recipient).unwrap().to, expected);
        }
        assert_eq!(
            build_to("0x3535353535353535353535353535353535353535".to_string())
                .unwrap()
                .to,
            expected
        );
    }

    #[test]
    fn build_accepts_raw_recipient() {
        let bytes = to_20bytes("3f4e0668c20e100d7c2a27d4b177ac65b2875d26");

        assert_eq!(build_to(&bytes[..]).unwrap().to, EthereumAddress::from(bytes));
        assert_eq!(build_to(bytes.to_vec()).unwrap().to, EthereumAddress::from(bytes));
    }

    #[test]
    fn build_rejects_text_recipient() {
        assert_eq!(build_to("vitalik.eth........."), Err(SignerError::InvalidRecipient));
        assert_eq!(
            build_to("0x353535353535353535353535353535353535353z"),
            Err(SignerError::InvalidRecipient)
        );
        assert_eq!(build_to(""), Err(SignerError::InvalidRecipient));
    }

    #[test]
    fn build_rejects_low_gas() {
        let result = TransactionBuilder::new().build(
            key().address(),
            key().address(),
            U256::zero(),
            TRANSFER_GAS_LIMIT - 1,
            &fees(),
            0,
            1,
        );
        assert_eq!(result, Err(SignerError::InvalidGasLimit));
    }

    #[test]
    fn build_allows_lower_gas_when_configured() {
        let tx = TransactionBuilder::new()
            .with_min_gas_limit(0)
            .with_data(vec![0xa9, 0x05, 0x9c, 0xbb])
            .build(
                key().address(),
                key().address(),
                U256::zero(),
                20_000,
                &fees(),
                0,
                1,
            )
            .unwrap();
        assert_eq!(tx.gas_limit, 20_000);
        assert_eq!(tx.data, vec![0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn build_rejects_invalid_fee() {
        let fee = FeeParameters {
            max_fee_per_gas: U256::from(1u64),
            ..fees()
        };
        let result = TransactionBuilder::new().build(
            key().address(),
            key().address(),
            U256::zero(),
            TRANSFER_GAS_LIMIT,
            &fee,
            0,
            1,
        );
        assert_eq!(result, Err(SignerError::InvalidFeeConfiguration));
    }

    #[test]
    fn value_from_decimal_is_exact() {
        assert_eq!(
            TransactionBuilder::value_from_decimal("0.15").unwrap(),
            U256::from(150_000_000_000_000_000u64)
        );
        assert_eq!(
            TransactionBuilder::value_from_decimal("0.1234567890123456789"),
            Err(SignerError::AmountPrecisionLoss)
        );
    }

    #[test]
    fn max_cost() {
        let tx = transfer();
        assert_eq!(
            tx.max_cost(),
            Some(U256::from(1_000_000_000_000_000_000u64) + U256::from(21_000u64 * 2_100_000_000u64))
        );
    }

    type Limbs = (u64, u64, u64, u64);

    fn wide(limbs: Limbs) -> U256 {
        U256([limbs.0, limbs.1, limbs.2, limbs.3])
    }

    #[test]
    fn round_trip_restores_fields() {
        fn prop(nonce: u64, chain_id: u64, value: Limbs, priority: Limbs, extra: Limbs, gas: u64, data: Vec<u8>) -> TestResult {
            let key = key();
            let priority = wide(priority);
            let fee = FeeParameters {
                base_fee: U256::zero(),
                max_priority_fee_per_gas: priority,
                max_fee_per_gas: priority.saturating_add(wide(extra)),
            };
            let tx = match TransactionBuilder::new().with_data(data).build(
                key.address(),
                to_20bytes("3535353535353535353535353535353535353535"),
                wide(value),
                gas.max(TRANSFER_GAS_LIMIT),
                &fee,
                nonce,
                chain_id,
            ) {
                Ok(tx) => tx,
                Err(_) => return TestResult::failed(),
            };
            let signed = tx.sign(&key).unwrap();
            let decoded = SignedTransaction::decode(&signed.to_raw()).unwrap();
            TestResult::from_bool(decoded.tx == tx && decoded.signature == signed.signature)
        }
        quickcheck(prop as fn(u64, u64, Limbs, Limbs, Limbs, u64, Vec<u8>) -> TestResult);
    }

    #[test]
    fn round_trip_extreme_values() {
        let key = key();
        let fee = FeeParameters {
            base_fee: U256::MAX,
            max_priority_fee_per_gas: U256::MAX,
            max_fee_per_gas: U256::MAX,
        };
        let tx = TransactionBuilder::new()
            .build(
                key.address(),
                key.address(),
                U256::MAX,
                u64::MAX,
                &fee,
                u64::MAX,
                u64::MAX,
            )
            .unwrap();
        let signed = tx.sign(&key).unwrap();

        assert_eq!(SignedTransaction::decode(&signed.to_raw()).unwrap(), signed);
        assert_eq!(tx.max_cost(), None);
    }
}
