use alloy_primitives::utils::format_units;
use alloy_primitives::U256;
use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, RoundingMode};

pub const GWEI_DECIMALS: u8 = 9;
pub const ETHER_DECIMALS: u8 = 18;

fn to_decimal(amount: U256, decimals: u8) -> BigDecimal {
    BigDecimal::new(BigInt::from_bytes_be(Sign::Plus, &amount.to_be_bytes::<32>()), decimals as i64)
}

/// Converts an amount in base units to its decimal representation, keeping every significant
/// digit. There is always at least one fractional digit.
/// - 1000000000000000000 with 18 decimals -> 1.0
/// - 1500 with 3 decimals -> 1.5
pub fn format_amount(amount: U256, decimals: u8) -> String {
    let formatted = format_units(amount, decimals).unwrap_or_else(|_| to_decimal(amount, decimals).to_plain_string());

    match formatted.split_once('.') {
        Some((integer, fraction)) => match fraction.trim_end_matches('0') {
            "" => format!("{}.0", integer),
            fraction => format!("{}.{}", integer, fraction),
        },
        None => format!("{}.0", formatted),
    }
}

/// Converts an amount in base units to a decimal representation with exactly `places` fractional
/// digits, rounding half up.
/// - 1234567 with 6 decimals and 2 places -> 1.23
/// - 1999 with 3 decimals and 2 places -> 2.00
pub fn format_amount_fixed(amount: U256, decimals: u8, places: usize) -> String {
    to_decimal(amount, decimals)
        .with_scale_round(places as i64, RoundingMode::HalfUp)
        .to_plain_string()
}

/// Inserts a comma every three digits of the integer part of a decimal string.
/// - 1234567.891 -> 1,234,567.891
pub fn group_thousands(value: &str) -> String {
    let (integer, fraction) = match value.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (value, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(fraction) => format!("{}.{}", grouped, fraction),
        None => grouped,
    }
}

/// Human readable token quantity: at most three fractional digits, thousands separated.
/// - 1000000 tokens -> 1,000,000
/// - 1234.5678 tokens -> 1,234.568
pub fn format_quantity(amount: U256, decimals: u8) -> String {
    let fixed = format_amount_fixed(amount, decimals, 3);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');

    group_thousands(trimmed)
}

/// Converts a wei amount to gwei with the given number of fractional digits
pub fn format_gwei(wei: U256, places: usize) -> String {
    format_amount_fixed(wei, GWEI_DECIMALS, places)
}

/// Converts a wei amount to ether with the given number of fractional digits
pub fn format_ether(wei: U256, places: usize) -> String {
    format_amount_fixed(wei, ETHER_DECIMALS, places)
}

/// Amount of wei in `gwei` gwei
pub fn gwei(gwei: u64) -> U256 {
    U256::from(gwei) * U256::from(1_000_000_000u64)
}
