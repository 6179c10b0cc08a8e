use alloy_primitives::Address;

/// Checks that `candidate` is a `0x` prefixed, 20 bytes hex address. Mixed case addresses must
/// carry a valid EIP-55 checksum, all-lowercase and all-uppercase ones are accepted as is.
pub fn is_valid_address(candidate: &str) -> bool {
    let Some(digits) = candidate.strip_prefix("0x") else {
        return false;
    };

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }

    Address::parse_checksummed(candidate, None).is_ok()
}

/// Parses `candidate` into an [`Address`] if [`is_valid_address`] accepts it.
pub fn parse_address(candidate: &str) -> Option<Address> {
    if !is_valid_address(candidate) {
        return None;
    }

    candidate.parse().ok()
}
