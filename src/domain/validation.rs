//! Field-level validation shared by the meme coin, token and auth flows.

use crate::crypto::address;
use crate::domain::networks;
use primitive_types::U256;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const MAX_DECIMALS: u8 = 18;
pub const MAX_TAX_PERCENTAGE: u8 = 25;
pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

type Result<T = ()> = std::result::Result<T, ValidationError>;

fn token_symbol_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9]{2,20}$").expect("static regex"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"))
}

fn tx_hash_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0x[0-9a-fA-F]{64}$").expect("static regex"))
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{3,50}$").expect("static regex"))
}

/// Checks a trimmed length in characters.
pub fn length(field: &str, value: &str, min: usize, max: usize) -> Result {
    let n = value.trim().chars().count();
    if n < min || n > max {
        return Err(ValidationError::new(
            field,
            format!("must be between {} and {} characters", min, max),
        ));
    }
    Ok(())
}

pub fn max_length(field: &str, value: &str, max: usize) -> Result {
    length(field, value, 0, max)
}

/// Meme coin symbols: 2-10 ASCII alphanumerics. Returns the uppercased form.
pub fn meme_coin_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    length("symbol", symbol, 2, 10)?;
    if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::new("symbol", "must be alphanumeric"));
    }
    Ok(symbol.to_ascii_uppercase())
}

pub fn token_symbol(symbol: &str) -> Result {
    if !token_symbol_regex().is_match(symbol) {
        return Err(ValidationError::new(
            "symbol",
            "must be 2-20 alphanumeric characters",
        ));
    }
    Ok(())
}

pub fn decimals(decimals: u8) -> Result {
    if decimals > MAX_DECIMALS {
        return Err(ValidationError::new(
            "decimals",
            format!("cannot exceed {}", MAX_DECIMALS),
        ));
    }
    Ok(())
}

/// Parses a whole-token supply and returns it scaled to base units.
///
/// The supply must be a positive decimal integer and `supply * 10^decimals`
/// must fit in a uint256.
pub fn total_supply(supply: &str, decimals: u8) -> Result<U256> {
    self::decimals(decimals)?;
    let supply = supply.trim();
    if supply.is_empty() || !supply.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new(
            "total_supply",
            "must be a positive integer",
        ));
    }
    let whole = U256::from_dec_str(supply)
        .map_err(|_| ValidationError::new("total_supply", "does not fit in uint256"))?;
    if whole.is_zero() {
        return Err(ValidationError::new(
            "total_supply",
            "must be a positive integer",
        ));
    }
    whole
        .checked_mul(U256::exp10(decimals as usize))
        .ok_or_else(|| ValidationError::new("total_supply", "overflows uint256 once scaled by decimals"))
}

/// Accepts absent or blank values; anything else must be an http(s) URL with a host.
pub fn optional_url(field: &str, value: Option<&str>) -> Result {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    match url::Url::parse(raw) {
        Ok(parsed)
            if (parsed.scheme() == "http" || parsed.scheme() == "https")
                && parsed.host().is_some() =>
        {
            Ok(())
        }
        _ => Err(ValidationError::new(field, "must be an http(s) URL")),
    }
}

pub fn meme_coin_network(network: &str) -> Result {
    if networks::deployment_networks().any(|n| n == network) {
        Ok(())
    } else {
        Err(ValidationError::new("network", "unsupported network"))
    }
}

pub fn tax_percentage(field: &str, value: u8) -> Result {
    if value > MAX_TAX_PERCENTAGE {
        return Err(ValidationError::new(
            field,
            format!("cannot exceed {}%", MAX_TAX_PERCENTAGE),
        ));
    }
    Ok(())
}

pub fn username(username: &str) -> Result {
    if !username_regex().is_match(username) {
        return Err(ValidationError::new(
            "username",
            "must be 3-50 characters of letters, digits or underscores",
        ));
    }
    Ok(())
}

pub fn password(password: &str) -> Result {
    if password.chars().count() < 8 {
        return Err(ValidationError::new(
            "password",
            "must be at least 8 characters",
        ));
    }
    Ok(())
}

pub fn email(value: &str) -> Result {
    max_length("email", value, 255)?;
    if !email_regex().is_match(value) {
        return Err(ValidationError::new("email", "must be a valid email address"));
    }
    Ok(())
}

pub fn transaction_hash(value: &str) -> Result {
    if !tx_hash_regex().is_match(value) {
        return Err(ValidationError::new(
            "transaction_hash",
            "must be 0x followed by 64 hex characters",
        ));
    }
    Ok(())
}

pub fn wallet_address(value: &str) -> Result {
    if !address::is_valid_address(value) {
        return Err(ValidationError::new(
            "address",
            "must be a 0x-prefixed 20-byte hex address with a valid checksum",
        ));
    }
    Ok(())
}

/// Normalized `limit`/`offset` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Out-of-range limits fall back to the default rather than erroring.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(l) if (1..=MAX_PAGE_LIMIT).contains(&l) => l,
            _ => DEFAULT_PAGE_LIMIT,
        };
        let offset = offset.filter(|o| *o >= 0).unwrap_or(0);
        Self { limit, offset }
    }

    /// Query-string form: unparsable values count as absent.
    pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(parse(limit), parse(offset))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meme_coin_symbol_is_uppercased() {
        assert_eq!(meme_coin_symbol("doge").unwrap(), "DOGE");
        assert_eq!(meme_coin_symbol(" pepe2 ").unwrap(), "PEPE2");
    }

    #[test]
    fn meme_coin_symbol_rejects_bad_lengths_and_symbols() {
        assert!(meme_coin_symbol("D").is_err());
        assert!(meme_coin_symbol("ABCDEFGHIJK").is_err());
        assert!(meme_coin_symbol("DO-GE").is_err());
    }

    #[test]
    fn token_symbol_allows_up_to_twenty() {
        assert!(token_symbol("ABCDEFGHIJKLMNOPQRST").is_ok());
        assert!(token_symbol("ABCDEFGHIJKLMNOPQRSTU").is_err());
        assert!(token_symbol("a b").is_err());
    }

    #[test]
    fn total_supply_scales_by_decimals() {
        let raw = total_supply("1000", 18).unwrap();
        assert_eq!(raw, U256::from(1000u64) * U256::exp10(18));
        assert_eq!(total_supply("7", 0).unwrap(), U256::from(7u64));
    }

    #[test]
    fn total_supply_rejects_non_positive_and_fractional() {
        for bad in ["0", "", "-5", "1.5", "1e9", "abc"] {
            assert!(total_supply(bad, 18).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn total_supply_rejects_overflow_after_scaling() {
        // 2^256 / 10^18 is roughly 1.15e59, so a 60-digit supply overflows.
        let huge = "9".repeat(60);
        assert!(total_supply(&huge, 0).is_ok());
        let err = total_supply(&huge, 18).unwrap_err();
        assert_eq!(err.field, "total_supply");
    }

    #[test]
    fn decimals_cap_at_eighteen() {
        assert!(decimals(18).is_ok());
        assert!(decimals(19).is_err());
    }

    #[test]
    fn urls_must_be_http() {
        assert!(optional_url("website", None).is_ok());
        assert!(optional_url("website", Some("  ")).is_ok());
        assert!(optional_url("website", Some("https://doge.example")).is_ok());
        assert!(optional_url("website", Some("ftp://doge.example")).is_err());
        assert!(optional_url("website", Some("doge.example")).is_err());
    }

    #[test]
    fn meme_coin_networks_match_catalogue() {
        assert!(meme_coin_network("polygon").is_ok());
        assert!(meme_coin_network("avalanche").is_err());
    }

    #[test]
    fn page_falls_back_to_defaults() {
        assert_eq!(Page::new(None, None), Page { limit: 20, offset: 0 });
        assert_eq!(Page::new(Some(0), Some(-3)), Page { limit: 20, offset: 0 });
        assert_eq!(Page::new(Some(101), Some(5)), Page { limit: 20, offset: 5 });
        assert_eq!(Page::new(Some(50), Some(10)), Page { limit: 50, offset: 10 });
    }

    #[test]
    fn raw_page_values_that_do_not_parse_use_defaults() {
        assert_eq!(Page::from_raw(Some("abc"), Some("xyz")), Page { limit: 20, offset: 0 });
        assert_eq!(Page::from_raw(Some(" 5 "), Some("7")), Page { limit: 5, offset: 7 });
        assert_eq!(Page::from_raw(Some(""), Some("-1")), Page { limit: 20, offset: 0 });
        assert_eq!(Page::from_raw(Some("1e3"), None), Page { limit: 20, offset: 0 });
    }

    #[test]
    fn usernames_and_passwords() {
        assert!(username("degen_42").is_ok());
        assert!(username("ab").is_err());
        assert!(username("has space").is_err());
        assert!(password("hunter22").is_ok());
        assert!(password("short").is_err());
    }

    #[test]
    fn emails_and_hashes() {
        assert!(email("dev@doge.example").is_ok());
        assert!(email("dev@localhost").is_err());
        assert!(email("not an email").is_err());
        assert!(transaction_hash(&format!("0x{}", "a".repeat(64))).is_ok());
        assert!(transaction_hash("0x1234").is_err());
    }

    #[test]
    fn taxes_cap_at_twenty_five() {
        assert!(tax_percentage("buy_tax_percentage", 25).is_ok());
        assert!(tax_percentage("buy_tax_percentage", 26).is_err());
    }
}
