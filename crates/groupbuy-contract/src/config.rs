//! Contract configuration from environment variables.

use std::env;
use thiserror::Error;

/// Default coin denomination.
pub const DEFAULT_DENOM: &str = "uscrt";

/// Default ceiling on items listed in one category.
pub const DEFAULT_MAX_ITEMS_PER_CATEGORY: usize = 1000;

/// Default ceiling on a single commitment's quantity.
pub const DEFAULT_MAX_QUANTITY: u32 = 1_000_000;

/// Limits and denomination used by every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    /// Denomination of escrowed funds and transfers.
    pub denom: String,

    /// Maximum number of items per category.
    pub max_items_per_category: usize,

    /// Maximum quantity of one commitment.
    pub max_quantity_per_commitment: u32,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            denom: DEFAULT_DENOM.to_string(),
            max_items_per_category: DEFAULT_MAX_ITEMS_PER_CATEGORY,
            max_quantity_per_commitment: DEFAULT_MAX_QUANTITY,
        }
    }
}

/// Rejected configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Denomination is empty.
    #[error("denom must not be empty")]
    EmptyDenom,

    /// A limit is zero.
    #[error("{0} must be positive")]
    ZeroLimit(&'static str),
}

impl ContractConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GB_DENOM`: Coin denomination (default: uscrt)
    /// - `GB_MAX_ITEMS_PER_CATEGORY`: Items per category (default: 1000)
    /// - `GB_MAX_QUANTITY`: Quantity per commitment (default: 1000000)
    ///
    /// Unparsable numbers fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ContractConfig::from_env`] over any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            denom: lookup("GB_DENOM")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DENOM.to_string()),

            max_items_per_category: lookup("GB_MAX_ITEMS_PER_CATEGORY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ITEMS_PER_CATEGORY),

            max_quantity_per_commitment: lookup("GB_MAX_QUANTITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_QUANTITY),
        }
    }

    /// Checks that every limit is usable.
    ///
    /// # Errors
    /// [`ConfigError`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.denom.trim().is_empty() {
            return Err(ConfigError::EmptyDenom);
        }
        if self.max_items_per_category == 0 {
            return Err(ConfigError::ZeroLimit("max_items_per_category"));
        }
        if self.max_quantity_per_commitment == 0 {
            return Err(ConfigError::ZeroLimit("max_quantity_per_commitment"));
        }
        Ok(())
    }
}
