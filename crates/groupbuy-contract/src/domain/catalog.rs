//! # Item Catalog
//!
//! Canonical listing of items keyed by `(category, url)`.
//!
//! ## Data Structures
//!
//! - `items`: `BTreeMap<ItemKey, ItemData>`, ordered by category then url,
//!   so one category is a contiguous range and enumeration is deterministic
//!   across replicas.

use crate::domain::entities::{ItemData, StaticItemData};
use crate::domain::value_objects::ItemKey;
use crate::errors::ContractError;
use std::collections::BTreeMap;

/// Keyed item store.
///
/// INVARIANTS:
/// - No two items share a key (checked in `add_item()`)
/// - `current_group_size` only changes through `set_group_size()`
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    items: BTreeMap<ItemKey, ItemData>,
}

impl ItemCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists a new item with an empty group.
    ///
    /// # Errors
    /// - `InvalidItem` if the static data fails validation
    /// - `DuplicateItem` if the key is taken
    /// - `CategoryFull` if the category already holds `max_per_category` items
    pub fn add_item(
        &mut self,
        static_data: StaticItemData,
        max_per_category: usize,
    ) -> Result<&ItemData, ContractError> {
        static_data.validate()?;

        let key = static_data.key();
        if self.items.contains_key(&key) {
            return Err(ContractError::DuplicateItem {
                category: key.category,
                url: key.url,
            });
        }

        if self.category_len(&key.category) >= max_per_category {
            return Err(ContractError::CategoryFull {
                category: key.category,
                max: max_per_category,
            });
        }

        Ok(&*self
            .items
            .entry(key)
            .or_insert_with(|| ItemData::new(static_data)))
    }

    /// Gets an item.
    ///
    /// # Errors
    /// `NotFound` when no item has this key.
    pub fn get(&self, key: &ItemKey) -> Result<&ItemData, ContractError> {
        self.items
            .get(key)
            .ok_or_else(|| ContractError::not_found(&key.category, &key.url))
    }

    /// Checks if an item is listed.
    #[must_use]
    pub fn contains(&self, key: &ItemKey) -> bool {
        self.items.contains_key(key)
    }

    /// All items of one category, ordered by url.
    #[must_use]
    pub fn list(&self, category: &str) -> Vec<ItemData> {
        self.category_range(category).cloned().collect()
    }

    /// Number of items in one category.
    #[must_use]
    pub fn category_len(&self, category: &str) -> usize {
        self.category_range(category).count()
    }

    /// Overwrites an item's running group size.
    ///
    /// # Errors
    /// `NotFound` when no item has this key.
    pub fn set_group_size(&mut self, key: &ItemKey, size: u32) -> Result<(), ContractError> {
        let item = self
            .items
            .get_mut(key)
            .ok_or_else(|| ContractError::not_found(&key.category, &key.url))?;
        item.current_group_size = size;
        Ok(())
    }

    /// Delists an item and returns it.
    ///
    /// # Errors
    /// `NotFound` when no item has this key.
    pub fn remove(&mut self, key: &ItemKey) -> Result<ItemData, ContractError> {
        self.items
            .remove(key)
            .ok_or_else(|| ContractError::not_found(&key.category, &key.url))
    }

    /// Iterates over every listed item.
    pub fn iter(&self) -> impl Iterator<Item = &ItemData> {
        self.items.values()
    }

    /// Total number of listed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn category_range<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ItemData> {
        self.items
            .range(ItemKey::category_start(category)..)
            .take_while(move |(key, _)| key.category == category)
            .map(|(_, item)| item)
    }
}

// =============================================================================
// TESTS
// =============================================================================
