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
//! # Ethereum accounts, EIP-1559 transactions and message signatures
//!
//! Keys, fee computation, transaction building, signing and verification are pure and
//! synchronous. Access to a node goes through an explicit [`client::ChainClient`] handle.

#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate enum_display_derive;

pub mod account;
pub mod blockchain;
pub mod client;
pub mod config;
pub mod error;
pub mod sign;
pub mod units;
pub mod util;

pub use self::{
    account::{Account, AccountError, GasPrices, TransferRequest},
    blockchain::{
        chains::EthereumChainId,
        ethereum::{
            address::{EthereumAddress, ETHEREUM_ADDRESS_BYTES},
            fees::{FeeEstimator, FeeParameters},
            signature::{EthereumPrivateKey, EthereumSignature, ECDSA_SIGNATURE_BYTES, PRIVATE_KEY_BYTES},
            transaction::{Eip1559Transaction, SignedTransaction, ToRecipient, TransactionBuilder, TRANSFER_GAS_LIMIT},
        },
    },
    client::{ChainClient, ClientError, Receipt, ReceiptStatus, TxHash},
    config::{FeePolicy, ReceiptPolicy, SignerConfig},
    error::SignerError,
    util::{keccak256, KECCAK256_BYTES},
};
pub use ethers_core::types::U256;
