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
//! # Conversion between decimal amounts and the smallest unit (wei)
//!
//! Only integer arithmetic is used; an amount that can't be represented exactly is an error.

use crate::error::SignerError;
use ethers_core::types::U256;

/// Decimals of wei
pub const WEI: usize = 0;
/// Decimals of gwei
pub const GWEI: usize = 9;
/// Decimals of ether
pub const ETHER: usize = 18;

/// Most decimals a unit can have, `10^78` doesn't fit into 256 bits
pub const MAX_DECIMALS: usize = 77;

fn check_decimals(decimals: usize) -> Result<(), SignerError> {
    if decimals > MAX_DECIMALS {
        return Err(SignerError::InvalidAmount(format!("{} decimals", decimals)));
    }
    Ok(())
}

/// Parse a decimal amount like `1.25` into the smallest unit, where a whole unit has `decimals`
/// decimal places.
///
/// # Example
///
/// ```
/// use emerald_signer::{units, U256};
/// assert_eq!(units::parse_units("1.5", units::GWEI).unwrap(), U256::from(1_500_000_000u64));
/// ```
pub fn parse_units(amount: &str, decimals: usize) -> Result<U256, SignerError> {
    check_decimals(decimals)?;
    let amount = amount.trim();
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(SignerError::InvalidAmount(amount.to_string()));
    }
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(SignerError::InvalidAmount(amount.to_string()));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals {
        return Err(SignerError::AmountPrecisionLoss);
    }

    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals - fraction.len()));
    if digits.is_empty() {
        return Ok(U256::zero());
    }

    U256::from_dec_str(&digits).map_err(|_| SignerError::InvalidAmount(amount.to_string()))
}

/// Parse an amount of ether into wei
pub fn parse_ether(amount: &str) -> Result<U256, SignerError> {
    parse_units(amount, ETHER)
}

/// Format a value in the smallest unit as a decimal amount with `decimals` decimal places,
/// without trailing zeros
pub fn format_units(value: U256, decimals: usize) -> Result<String, SignerError> {
    check_decimals(decimals)?;
    Ok(format_digits(value, decimals))
}

/// Format wei as ether
pub fn format_ether(value: U256) -> String {
    format_digits(value, ETHER)
}

/// Format wei as gwei
pub fn format_gwei(value: U256) -> String {
    format_digits(value, GWEI)
}

// `decimals` is at most MAX_DECIMALS
fn format_digits(value: U256, decimals: usize) -> String {
    let digits = value.to_string();
    if decimals == 0 {
        return digits;
    }
    let digits = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (whole, fraction) = digits.split_at(digits.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}
