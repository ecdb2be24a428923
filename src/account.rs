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
//! # Account
//!
//! Ties a key to a node: reads the chain state, computes fees, builds, signs and submits
//! transfers, waits for receipts.

use crate::{
    blockchain::ethereum::{
        address::EthereumAddress,
        fees::{FeeEstimator, FeeParameters},
        signature::{EthereumPrivateKey, EthereumSignature},
        transaction::{Eip1559Transaction, TransactionBuilder, TRANSFER_GAS_LIMIT},
    },
    client::{ChainClient, ClientError, Receipt, TxHash},
    config::SignerConfig,
    error::SignerError,
    sign,
    units,
};
use ethers_core::types::U256;
use std::{fmt, thread};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// Invalid input, nothing was sent
    Core(SignerError),
    /// Failure on the node side
    Chain(ClientError),
    /// Balance doesn't cover `value + gas_limit * max_fee_per_gas`
    InsufficientFunds { required: U256, available: U256 },
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccountError::Core(e) => write!(f, "Core({})", e),
            AccountError::Chain(e) => write!(f, "Chain({})", e),
            AccountError::InsufficientFunds {
                required,
                available,
            } => write!(
                f,
                "InsufficientFunds(required {} ETH, available {} ETH)",
                units::format_ether(*required),
                units::format_ether(*available)
            ),
        }
    }
}

impl std::error::Error for AccountError {}

impl From<SignerError> for AccountError {
    fn from(err: SignerError) -> Self {
        AccountError::Core(err)
    }
}

impl From<ClientError> for AccountError {
    fn from(err: ClientError) -> Self {
        AccountError::Chain(err)
    }
}

/// Current fee levels, in wei
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasPrices {
    pub base_fee: U256,
    pub priority_fee: U256,
    /// Max fee a transfer would be sent with, `2 * base_fee + priority_fee`
    pub max_fee: U256,
}

impl fmt::Display for GasPrices {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "base fee {} gwei, priority fee {} gwei, max fee {} gwei",
            units::format_gwei(self.base_fee),
            units::format_gwei(self.priority_fee),
            units::format_gwei(self.max_fee)
        )
    }
}

/// Parameters of a value transfer. Fees that are not set are computed from the node state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: EthereumAddress,
    /// Value in wei
    pub value: U256,
    /// Gas limit, 21000 unless set
    pub gas_limit: u64,
    pub max_priority_fee_per_gas: Option<U256>,
    pub max_fee_per_gas: Option<U256>,
}

impl TransferRequest {
    pub fn new(to: EthereumAddress, value: U256) -> Self {
        TransferRequest {
            to,
            value,
            gas_limit: TRANSFER_GAS_LIMIT,
            max_priority_fee_per_gas: None,
            max_fee_per_gas: None,
        }
    }

    /// Transfer of a decimal amount of ether, like `"0.5"`
    pub fn ether(to: EthereumAddress, amount: &str) -> Result<Self, SignerError> {
        Ok(TransferRequest::new(
            to,
            TransactionBuilder::value_from_decimal(amount)?,
        ))
    }

    pub fn with_gas_limit(self, gas_limit: u64) -> Self {
        TransferRequest {
            gas_limit,
            ..self
        }
    }

    pub fn with_priority_fee(self, fee: U256) -> Self {
        TransferRequest {
            max_priority_fee_per_gas: Some(fee),
            ..self
        }
    }

    pub fn with_max_fee(self, fee: U256) -> Self {
        TransferRequest {
            max_fee_per_gas: Some(fee),
            ..self
        }
    }
}

pub struct Account<C: ChainClient> {
    key: EthereumPrivateKey,
    client: C,
    config: SignerConfig,
}

impl<C: ChainClient> Account<C> {
    /// Account with a freshly generated key
    pub fn create(client: C, config: SignerConfig) -> Result<Self, AccountError> {
        let key = EthereumPrivateKey::generate()?;
        debug!("Created account {}", key.address());
        Ok(Account::load(key, client, config))
    }

    pub fn load(key: EthereumPrivateKey, client: C, config: SignerConfig) -> Self {
        Account {
            key,
            client,
            config,
        }
    }

    pub fn address(&self) -> EthereumAddress {
        self.key.address()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Balance in wei
    pub fn balance(&self) -> Result<U256, AccountError> {
        Ok(self.client.get_balance(&self.address())?)
    }

    pub fn estimate_gas(&self, to: &EthereumAddress, value: U256) -> Result<u64, AccountError> {
        Ok(self.client.estimate_gas(&self.address(), to, value)?)
    }

    pub fn gas_prices(&self) -> Result<GasPrices, AccountError> {
        let fees = self.fees(None, None)?;
        Ok(GasPrices {
            base_fee: fees.base_fee,
            priority_fee: fees.max_priority_fee_per_gas,
            max_fee: fees.max_fee_per_gas,
        })
    }

    fn fees(
        &self,
        priority_fee: Option<U256>,
        max_fee: Option<U256>,
    ) -> Result<FeeParameters, AccountError> {
        let base_fee = self.client.get_base_fee()?;
        let suggested = match priority_fee {
            Some(fee) => fee,
            None => self.client.suggest_priority_fee()?,
        };
        let estimator = FeeEstimator::with_policy(suggested, &self.config.fees);
        Ok(estimator.compute(base_fee, priority_fee, max_fee)?)
    }

    /// Build an unsigned transfer for the current nonce and fees. Fails if the balance can't cover
    /// the maximum cost of the transaction.
    pub fn prepare_transfer(&self, request: &TransferRequest) -> Result<Eip1559Transaction, AccountError> {
        let from = self.address();
        let fees = self.fees(request.max_priority_fee_per_gas, request.max_fee_per_gas)?;
        let nonce = self.client.get_nonce(&from)?;

        let tx = TransactionBuilder::new().build(
            from,
            request.to,
            request.value,
            request.gas_limit,
            &fees,
            nonce,
            self.config.chain_id,
        )?;

        let required = tx
            .max_cost()
            .ok_or(SignerError::InvalidFeeConfiguration)?;
        let available = self.client.get_balance(&from)?;
        if available < required {
            return Err(AccountError::InsufficientFunds {
                required,
                available,
            });
        }

        trace!(
            "Prepared transfer from {} to {}, nonce {}, {}",
            from,
            tx.to,
            nonce,
            GasPrices {
                base_fee: fees.base_fee,
                priority_fee: fees.max_priority_fee_per_gas,
                max_fee: fees.max_fee_per_gas,
            }
        );
        Ok(tx)
    }

    /// Sign and broadcast a transfer, returns the hash of the transaction
    pub fn send_transfer(&self, request: &TransferRequest) -> Result<TxHash, AccountError> {
        let tx = self.prepare_transfer(request)?;
        let signed = sign::sign_transaction(&tx, &self.key)?;
        let hash = self.client.submit_raw(&signed.to_raw())?;
        if hash != signed.hash() {
            warn!(
                "Node returned hash 0x{} for transaction 0x{}",
                hex::encode(hash),
                hex::encode(signed.hash())
            );
        }
        debug!("Sent transaction 0x{}", hex::encode(hash));
        Ok(hash)
    }

    /// Poll the node for the receipt according to the receipt policy of the config
    pub fn await_receipt(&self, hash: &TxHash) -> Result<Receipt, AccountError> {
        let policy = &self.config.receipts;
        for attempt in 1..=policy.attempts {
            if let Some(receipt) = self.client.get_receipt(hash)? {
                debug!(
                    "Transaction 0x{} mined in block {}, {:?}",
                    hex::encode(hash),
                    receipt.block_number,
                    receipt.status
                );
                return Ok(receipt);
            }
            trace!("No receipt for 0x{} (attempt {})", hex::encode(hash), attempt);
            if attempt < policy.attempts {
                thread::sleep(policy.interval());
            }
        }
        Err(AccountError::Chain(ClientError::Timeout))
    }

    pub fn sign_message<M: AsRef<[u8]>>(&self, msg: M) -> Result<EthereumSignature, AccountError> {
        Ok(sign::sign_message(msg, &self.key)?)
    }

    /// Check that the message was signed by this account
    pub fn verify<M: AsRef<[u8]>>(&self, msg: M, signature: &EthereumSignature) -> bool {
        sign::verify(msg, signature, &self.address())
    }
}
