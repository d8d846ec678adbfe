//! Conversions from what people type into the units the contract expects.

use alloy_primitives::U256;
use alloy_primitives::utils::{format_ether, parse_ether};
use dcs_api_types::SECONDS_PER_DAY;

use crate::error::FormError;

const ETHER_DECIMALS: usize = 18;

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn days_to_seconds(days: &str) -> Result<u64, FormError> {
    let days = days.trim();
    days.parse::<u64>()
        .ok()
        .and_then(|d| d.checked_mul(SECONDS_PER_DAY))
        .ok_or_else(|| FormError::InvalidDuration(days.to_owned()))
}

/// Decimal ETH → wei.
pub fn parse_amount(amount: &str) -> Result<U256, FormError> {
    let amount = amount.trim();
    let too_precise = amount
        .split_once('.')
        .is_some_and(|(_, fraction)| fraction.len() > ETHER_DECIMALS);
    if amount.starts_with('-') || too_precise {
        return Err(FormError::InvalidAmount(amount.to_owned()));
    }
    parse_ether(amount).map_err(|_| FormError::InvalidAmount(amount.to_owned()))
}

pub fn parse_uint(field: &'static str, value: &str) -> Result<U256, FormError> {
    let value = value.trim();
    U256::from_str_radix(value, 10).map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_owned(),
    })
}

pub fn parse_index(field: &'static str, value: &str) -> Result<u64, FormError> {
    let value = value.trim();
    value.parse::<u64>().map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_owned(),
    })
}

/// Wei → decimal ETH with trailing zeros trimmed ("1.5", "2.0").
pub fn format_amount(wei: U256) -> String {
    let mut text = format_ether(wei);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').len();
        text.truncate(trimmed);
        if text.ends_with('.') {
            text.push('0');
        }
    } else {
        text.push_str(".0");
    }
    text
}
