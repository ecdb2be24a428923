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
use crate::error::SignerError;

pub struct EthereumHex {}

///
/// Common utilities to encode and decode bytes in Ethereum-kind hex format (i.e., with 0x prefix)
impl EthereumHex {
    pub fn decode<S: AsRef<str>>(s: S) -> Result<Vec<u8>, SignerError> {
        let value = s
            .as_ref()
            .strip_prefix("0x")
            .ok_or_else(|| SignerError::InvalidEncoding("missing 0x prefix".to_string()))?;
        Ok(hex::decode(value)?)
    }

    pub fn encode<T: AsRef<[u8]>>(n: T) -> String {
        format!("0x{}", hex::encode(n))
    }
}
