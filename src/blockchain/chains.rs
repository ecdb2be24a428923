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
use std::str::FromStr;

/// Ethereum Chain Id Reference
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EthereumChainId {
    /// Ethereum
    Ethereum,
    /// Ethereum Classic
    EthereumClassic,
    /// Goerli Testnet
    Goerli,
    /// Sepolia Testnet
    Sepolia,
    Custom(u64),
}

impl EthereumChainId {
    /// chain_id for current Chain
    pub fn as_chainid(&self) -> u64 {
        match self {
            EthereumChainId::Ethereum => 1,
            EthereumChainId::Goerli => 5,
            EthereumChainId::EthereumClassic => 61,
            EthereumChainId::Sepolia => 11155111,
            EthereumChainId::Custom(v) => *v,
        }
    }

    pub fn is_mainnet(&self) -> bool {
        matches!(self, EthereumChainId::Ethereum | EthereumChainId::EthereumClassic)
    }
}

impl From<u64> for EthereumChainId {
    fn from(value: u64) -> Self {
        match value {
            1 => EthereumChainId::Ethereum,
            5 => EthereumChainId::Goerli,
            61 => EthereumChainId::EthereumClassic,
            11155111 => EthereumChainId::Sepolia,
            v => EthereumChainId::Custom(v),
        }
    }
}

impl FromStr for EthereumChainId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean = s.to_lowercase();
        match clean.as_str() {
            "eth" | "ethereum" | "eth-mainnet" => Ok(EthereumChainId::Ethereum),
            "etc-mainnet" | "etc" | "ethereum-classic" | "ethereum classic" => {
                Ok(EthereumChainId::EthereumClassic)
            }
            "goerli" => Ok(EthereumChainId::Goerli),
            "sepolia" => Ok(EthereumChainId::Sepolia),
            other => other
                .parse::<u64>()
                .map(EthereumChainId::from)
                .map_err(|_| ()),
        }
    }
}
