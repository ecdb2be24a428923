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
//! # EIP-1559 fee parameters
//!
//! All values are in wei. Conversion to gwei or ether is done only when displayed, see `units`.

use crate::{config::FeePolicy, error::SignerError};
use ethers_core::types::U256;

/// Fee parameters of a fee market transaction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeParameters {
    /// Base fee of the block the parameters were computed for
    pub base_fee: U256,
    /// Tip paid to the block producer, per gas
    pub max_priority_fee_per_gas: U256,
    /// Upper limit of the total fee per gas
    pub max_fee_per_gas: U256,
}

impl FeeParameters {
    /// A transaction with `max_fee_per_gas < max_priority_fee_per_gas` is rejected by the network
    pub fn validate(&self) -> Result<(), SignerError> {
        if self.max_fee_per_gas < self.max_priority_fee_per_gas {
            return Err(SignerError::InvalidFeeConfiguration);
        }
        Ok(())
    }

    /// Maximum amount paid for gas, i.e. `gas_limit * max_fee_per_gas`
    pub fn max_gas_cost(&self, gas_limit: u64) -> Option<U256> {
        self.max_fee_per_gas.checked_mul(U256::from(gas_limit))
    }
}

/// Computes fee parameters from the current base fee and a priority fee suggested by a node.
///
/// Without overrides `max_fee_per_gas = 2 * base_fee + priority_fee`, which keeps the
/// transaction includable while the base fee doubles.
#[derive(Clone, Debug)]
pub struct FeeEstimator {
    suggested_priority_fee: U256,
    priority_fee_ceiling: Option<U256>,
}

impl FeeEstimator {
    pub fn new(suggested_priority_fee: U256) -> Self {
        FeeEstimator {
            suggested_priority_fee,
            priority_fee_ceiling: None,
        }
    }

    pub fn with_policy(suggested_priority_fee: U256, policy: &FeePolicy) -> Self {
        FeeEstimator {
            suggested_priority_fee,
            priority_fee_ceiling: policy.max_priority_fee_ceiling.map(U256::from),
        }
    }

    /// Suggested priority fee, limited by the ceiling of the policy if there is one
    fn suggested(&self) -> U256 {
        match self.priority_fee_ceiling {
            Some(ceiling) if self.suggested_priority_fee > ceiling => {
                warn!(
                    "Suggested priority fee {} is above the ceiling {}, using the ceiling",
                    self.suggested_priority_fee, ceiling
                );
                ceiling
            }
            _ => self.suggested_priority_fee,
        }
    }

    pub fn compute(
        &self,
        base_fee: U256,
        priority_fee_override: Option<U256>,
        max_fee_override: Option<U256>,
    ) -> Result<FeeParameters, SignerError> {
        let priority = priority_fee_override.unwrap_or_else(|| self.suggested());

        let max = match max_fee_override {
            Some(max) => max,
            None => base_fee
                .checked_mul(U256::from(2u64))
                .and_then(|double| double.checked_add(priority))
                .ok_or(SignerError::InvalidFeeConfiguration)?,
        };

        let fees = FeeParameters {
            base_fee,
            max_priority_fee_per_gas: priority,
            max_fee_per_gas: max,
        };
        fees.validate()?;
        Ok(fees)
    }
}
