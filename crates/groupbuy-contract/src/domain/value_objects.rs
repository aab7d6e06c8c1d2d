//! # Value Objects
//!
//! Immutable domain primitives for the group-buy ledger.
//! These types are defined by their value, not identity.

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export U256 from primitive-types for exact 256-bit amounts
pub use primitive_types::U256;

// =============================================================================
// ACCOUNT ADDRESS
// =============================================================================

/// Host-supplied account address (bech32 in practice).
///
/// The contract never interprets the address, it only compares it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Creates an address from any string-like value.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the raw address bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns true if the address is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.0)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountAddress {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for AccountAddress {
    fn from(address: String) -> Self {
        Self(address)
    }
}

// =============================================================================
// AMOUNT (exact, string-encoded)
// =============================================================================

/// Exact token amount in the smallest denomination.
///
/// Encoded as a decimal string at the boundary (`"1000"`) so that no client
/// ever routes it through a float.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(U256);

impl Amount {
    /// Zero amount.
    #[must_use]
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parses a decimal string.
    ///
    /// # Errors
    ///
    /// Returns [`AmountParseError`] on empty input, non-digits or overflow.
    pub fn parse(s: &str) -> Result<Self, AmountParseError> {
        if s.is_empty() {
            return Err(AmountParseError(s.to_string()));
        }
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|_| AmountParseError(s.to_string()))
    }

    /// Checked addition.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Checked multiplication by a unit count.
    #[must_use]
    pub fn checked_mul_units(self, units: u32) -> Option<Self> {
        self.0.checked_mul(U256::from(units)).map(Self)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0.to_string()
    }
}

/// Error returned when an amount string is not a valid decimal U256.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmountParseError(pub String);

impl fmt::Display for AmountParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal amount: {:?}", self.0)
    }
}

impl std::error::Error for AmountParseError {}

// =============================================================================
// ITEM KEY
// =============================================================================

/// Unique key of a catalog item: `(category, url)`.
///
/// Field order matters: ordering by category first lets the catalog
/// enumerate one category as a contiguous range.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    /// Item category.
    pub category: String,
    /// Item url, unique within its category.
    pub url: String,
}

impl ItemKey {
    /// Creates a key.
    #[must_use]
    pub fn new(category: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            url: url.into(),
        }
    }

    /// Smallest possible key within `category`.
    #[must_use]
    pub fn category_start(category: &str) -> Self {
        Self {
            category: category.to_string(),
            url: String::new(),
        }
    }
}

impl fmt::Debug for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemKey({}/{})", self.category, self.url)
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.url)
    }
}

// =============================================================================
// TESTS
// =============================================================================
