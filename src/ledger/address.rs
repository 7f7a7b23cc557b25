//! Account identifiers for the ledger
//!
//! Addresses are fixed-width 20-byte identifiers rendered as `0x`-prefixed
//! hex strings. The all-zero address is a reserved sentinel: it is never a
//! real balance holder, and mint/burn use it as the implicit counterparty in
//! their transfer events.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of bytes in an address
pub const ADDRESS_LEN: usize = 20;

/// Errors from parsing an address string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("Invalid address length: expected {expected} hex chars, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),
}

/// A 20-byte account identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The reserved zero identifier (never a real account)
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create an address from raw bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    /// Derive a fresh address by hashing arbitrary input
    ///
    /// Used by the registry to generate token addresses: the first 20 bytes
    /// of SHA-256 over the input.
    pub fn derive(input: &[u8]) -> Self {
        let hash = Sha256::digest(input);
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&hash[..ADDRESS_LEN]);
        Address(bytes)
    }

    /// Whether this is the reserved zero identifier
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Raw bytes of the address
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("0x").unwrap_or(s);

        if hex_part.len() != ADDRESS_LEN * 2 {
            return Err(AddressParseError::InvalidLength {
                expected: ADDRESS_LEN * 2,
                got: hex_part.len(),
            });
        }

        let bytes = hex::decode(hex_part).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;

        let mut array = [0u8; ADDRESS_LEN];
        array.copy_from_slice(&bytes);
        Ok(Address(array))
    }
}

// Addresses serialize as their hex string so they can be used as JSON map keys.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
