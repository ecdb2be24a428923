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
//! # Node interaction
//!
//! The library doesn't talk to a node by itself. A caller provides an implementation of
//! [`ChainClient`] on top of its own transport (JSON RPC over HTTP, IPC, a test double, etc).

use crate::{blockchain::ethereum::address::EthereumAddress, util::KECCAK256_BYTES};
use ethers_core::types::U256;
use std::fmt::Display;

/// Hash of a transaction, as returned by `eth_sendRawTransaction`
pub type TxHash = [u8; KECCAK256_BYTES];

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Node is not reachable or answered with garbage
    Transport(String),
    /// Node refused the request, e.g. a nonce is too low
    Rejected(String),
    /// No answer in the expected time
    Timeout,
}

impl std::error::Error for ClientError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Failure,
}

/// Receipt of a mined transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub status: ReceiptStatus,
    pub block_number: u64,
    pub transaction_hash: TxHash,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

/// Access to the chain state
pub trait ChainClient {
    /// Next nonce of the address, including pending transactions
    fn get_nonce(&self, address: &EthereumAddress) -> Result<u64, ClientError>;

    /// Base fee of the pending block, in wei
    fn get_base_fee(&self) -> Result<U256, ClientError>;

    /// Priority fee suggested by the node, in wei
    fn suggest_priority_fee(&self) -> Result<U256, ClientError>;

    /// Balance of the address, in wei
    fn get_balance(&self, address: &EthereumAddress) -> Result<U256, ClientError>;

    fn estimate_gas(
        &self,
        from: &EthereumAddress,
        to: &EthereumAddress,
        value: U256,
    ) -> Result<u64, ClientError>;

    /// Broadcast raw signed transaction
    fn submit_raw(&self, raw: &[u8]) -> Result<TxHash, ClientError>;

    /// Receipt of the transaction, `None` while it isn't mined yet
    fn get_receipt(&self, hash: &TxHash) -> Result<Option<Receipt>, ClientError>;
}
