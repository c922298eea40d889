use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Number of octas in one APT.
pub const OCTAS_PER_APT: u64 = 100_000_000;

/// Length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// An Aptos account address.
///
/// Accepts both the long form (`0x` + 64 hex digits) and short forms such as
/// `0x1`; short forms are left-padded with zeros, so `0x1` and
/// `0x000…0001` compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    /// Parse an address from its hex representation (with or without `0x`).
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(CoreError::InvalidAddress(format!(
                "address has no hex digits: {:?}",
                input
            )));
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(CoreError::InvalidAddress(format!(
                "address longer than {} hex digits: {}",
                ADDRESS_LENGTH * 2,
                input
            )));
        }

        let padded = format!("{:0>width$}", digits, width = ADDRESS_LENGTH * 2);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| CoreError::InvalidAddress(format!("{}: {}", input, e)))?;
        Ok(Self(bytes))
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Full `0x`-prefixed, 64-digit lower-case form.
    pub fn to_long_string(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Abbreviated form for display, e.g. `0x742d…5e57`.
    pub fn short(&self) -> String {
        let full = hex::encode(self.0);
        let significant = full.trim_start_matches('0');
        if significant.len() <= 8 {
            return format!("0x{}", if significant.is_empty() { "0" } else { significant });
        }
        format!(
            "0x{}…{}",
            &significant[..4],
            &significant[significant.len() - 4..]
        )
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_long_string())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.short())
    }
}

impl FromStr for AccountAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> Self {
        address.to_long_string()
    }
}

/// An APT balance in octas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(u64);

impl Balance {
    pub const ZERO: Balance = Balance(0);

    pub fn from_octas(octas: u64) -> Self {
        Self(octas)
    }

    pub fn octas(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:08} APT",
            self.0 / OCTAS_PER_APT,
            self.0 % OCTAS_PER_APT
        )
    }
}

/// The account a wallet reports as active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    pub address: AccountAddress,
    #[serde(rename = "publicKey", default)]
    pub public_key: String,
}

impl WalletAccount {
    pub fn new(address: AccountAddress, public_key: impl Into<String>) -> Self {
        Self {
            address,
            public_key: public_key.into(),
        }
    }
}

/// The network a wallet is pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub name: String,
    #[serde(rename = "chainId")]
    pub chain_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address_is_padded() {
        let short = AccountAddress::parse("0x1").unwrap();
        let long = AccountAddress::parse(
            "0x0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        assert_eq!(short, long);
        assert_eq!(short.as_bytes()[ADDRESS_LENGTH - 1], 1);
    }

    #[test]
    fn test_address_is_case_insensitive() {
        let upper = AccountAddress::parse("0x742d35Cc6634C0532925a3b8D7389C5e57").unwrap();
        let lower = AccountAddress::parse("0x742d35cc6634c0532925a3b8d7389c5e57").unwrap();
        assert_eq!(upper, lower);
        assert!(upper.to_long_string().ends_with("742d35cc6634c0532925a3b8d7389c5e57"));
    }

    #[test]
    fn test_address_without_prefix() {
        let addr = AccountAddress::parse("abc").unwrap();
        assert_eq!(addr.short(), "0xabc");
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(AccountAddress::parse("").is_err());
        assert!(AccountAddress::parse("0x").is_err());
        assert!(AccountAddress::parse("0xzz").is_err());
        let too_long = format!("0x{}", "1".repeat(65));
        assert!(AccountAddress::parse(&too_long).is_err());
    }

    #[test]
    fn test_short_display() {
        let addr = AccountAddress::parse("0x742d35Cc6634C0532925a3b8D7389C5e57").unwrap();
        assert_eq!(addr.short(), "0x742d…5e57");
        assert_eq!(AccountAddress::parse("0x0").unwrap().short(), "0x0");
    }

    #[test]
    fn test_address_serde_as_string() {
        let addr = AccountAddress::parse("0x1").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.to_long_string()));
        let back: AccountAddress = serde_json::from_str("\"0x1\"").unwrap();
        assert_eq!(back, addr);
        assert!(serde_json::from_str::<AccountAddress>("\"nope\"").is_err());
    }

    #[test]
    fn test_balance_display() {
        assert_eq!(Balance::from_octas(1_245_000_000).to_string(), "12.45000000 APT");
        assert_eq!(Balance::ZERO.to_string(), "0.00000000 APT");
        assert_eq!(Balance::from_octas(1).to_string(), "0.00000001 APT");
    }

    #[test]
    fn test_wallet_account_from_provider_json() {
        let json = r#"{"address":"0x1","publicKey":"0xabcdef"}"#;
        let account: WalletAccount = serde_json::from_str(json).unwrap();
        assert_eq!(account.address, AccountAddress::parse("0x1").unwrap());
        assert_eq!(account.public_key, "0xabcdef");
    }
}
