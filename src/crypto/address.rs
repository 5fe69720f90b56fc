// EVM address and transaction hash helpers (EIP-55 checksums, random fixtures).

use sha3::{Digest, Keccak256};

/// Formats 20 raw bytes as an EIP-55 mixed-case checksum address.
pub fn to_checksum_address(bytes: &[u8; 20]) -> String {
    let lower = hex::encode(bytes);
    let digest = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (digest[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_address_bytes(address: &str) -> Option<[u8; 20]> {
    let hex_part = address.strip_prefix("0x").or_else(|| address.strip_prefix("0X"))?;
    if hex_part.len() != 40 {
        return None;
    }
    let decoded = hex::decode(hex_part).ok()?;
    decoded.try_into().ok()
}

/// Accepts all-lowercase, all-uppercase, or correctly checksummed addresses.
pub fn is_valid_address(address: &str) -> bool {
    let Some(bytes) = parse_address_bytes(address) else {
        return false;
    };
    let hex_part = &address[2..];
    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }
    to_checksum_address(&bytes)[2..] == *hex_part
}

/// Canonical EIP-55 form of a valid address, `None` if it fails [`is_valid_address`].
pub fn checksummed(address: &str) -> Option<String> {
    if !is_valid_address(address) {
        return None;
    }
    parse_address_bytes(address).map(|bytes| to_checksum_address(&bytes))
}

/// A fresh checksummed address from 20 CSPRNG bytes.
pub fn random_address() -> String {
    to_checksum_address(&rand::random::<[u8; 20]>())
}

/// A fresh `0x`-prefixed 32-byte transaction hash.
pub fn random_tx_hash() -> String {
    format!("0x{}", hex::encode(rand::random::<[u8; 32]>()))
}
