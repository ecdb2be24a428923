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
//! # Logic to manage configuration parameters

use crate::{blockchain::chains::EthereumChainId, error::SignerError};
use std::time::Duration;

/// Сonfiguration parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Chain id put into every transaction
    pub chain_id: u64,
    pub fees: FeePolicy,
    pub receipts: ReceiptPolicy,
}

/// Limits applied to fee values suggested by a node
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeePolicy {
    /// Upper bound for a node-suggested priority fee, in wei. Explicit values are not limited.
    pub max_priority_fee_ceiling: Option<u64>,
}

/// How long to wait for a transaction receipt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptPolicy {
    /// Number of receipt requests before giving up
    pub attempts: u32,
    /// Pause between two requests, in milliseconds
    pub interval_ms: u64,
}

impl Default for SignerConfig {
    fn default() -> Self {
        SignerConfig {
            chain_id: EthereumChainId::Ethereum.as_chainid(),
            fees: FeePolicy::default(),
            receipts: ReceiptPolicy::default(),
        }
    }
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        ReceiptPolicy {
            attempts: 120,
            interval_ms: 1000,
        }
    }
}

impl ReceiptPolicy {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl SignerConfig {
    pub fn new(chain: EthereumChainId) -> SignerConfig {
        SignerConfig {
            chain_id: chain.as_chainid(),
            ..SignerConfig::default()
        }
    }

    pub fn chain(&self) -> EthereumChainId {
        EthereumChainId::from(self.chain_id)
    }

    /// Read configuration from JSON, missing fields get default values
    pub fn from_json<S: AsRef<str>>(json: S) -> Result<SignerConfig, SignerError> {
        serde_json::from_str(json.as_ref()).map_err(|e| SignerError::InvalidEncoding(e.to_string()))
    }
}
