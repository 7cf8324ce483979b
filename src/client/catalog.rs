use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::dto::stone::Stone;

/// Outcome of merging a saved stone into the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Inserted,
    Replaced,
}

/// What happens to a category whose last stone is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyCategory {
    /// Keep the key with an empty list (the panel shows a placeholder)
    #[default]
    Keep,
    /// Drop the key entirely
    Drop,
}

/// Ordering of a category's stones for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoneSort {
    /// Case-insensitive by name
    #[default]
    Name,
    /// Most recently added first
    Newest,
}

/// Client-side copy of the stone list, keyed by chakra id
///
/// Loaded once from the list endpoint, then kept in sync from mutation
/// responses without refetching. Every operation returns a new catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoneCatalog {
    categories: BTreeMap<String, Vec<Stone>>,
}

impl StoneCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_grouped(categories: BTreeMap<String, Vec<Stone>>) -> Self {
        Self { categories }
    }

    /// Build from a raw list response
    ///
    /// Numeric ids are coerced to strings. Entries that are not stone
    /// objects are skipped.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(groups) = value else {
            tracing::warn!("Stone list response is not an object; starting with an empty catalog");
            return Self::new();
        };

        let categories = groups
            .into_iter()
            .filter_map(|(chakra, stones)| match stones {
                Value::Array(entries) => Some((chakra, entries)),
                _ => None,
            })
            .map(|(chakra, entries)| {
                let stones = entries.into_iter().filter_map(parse_stone).collect();
                (chakra, stones)
            })
            .collect();

        Self { categories }
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn has_category(&self, chakra: &str) -> bool {
        self.categories.contains_key(chakra)
    }

    /// Stones of one category in catalog order
    pub fn stones_in(&self, chakra: &str) -> &[Stone] {
        self.categories.get(chakra).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, chakra: &str, id: &str) -> Option<&Stone> {
        self.stones_in(chakra).iter().find(|stone| stone.id == id)
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge a saved stone: replace by id within the category, else append
    pub fn upsert(&self, chakra: &str, stone: Stone) -> (Self, Reconciled) {
        let mut categories = self.categories.clone();
        let stones = categories.entry(chakra.to_string()).or_default();

        let outcome = match stones.iter_mut().find(|existing| existing.id == stone.id) {
            Some(existing) => {
                *existing = stone;
                Reconciled::Replaced
            }
            None => {
                stones.push(stone);
                Reconciled::Inserted
            }
        };

        (Self { categories }, outcome)
    }

    /// Filter a stone out of its category
    pub fn remove(&self, chakra: &str, id: &str, empty: EmptyCategory) -> Self {
        let mut categories = self.categories.clone();

        if let Some(stones) = categories.get_mut(chakra) {
            stones.retain(|stone| stone.id != id);
            if stones.is_empty() && empty == EmptyCategory::Drop {
                categories.remove(chakra);
            }
        }

        Self { categories }
    }

    /// Sorted view of one category for rendering
    pub fn stones_for(&self, chakra: &str, sort: StoneSort) -> Vec<&Stone> {
        let mut stones: Vec<&Stone> = self.stones_in(chakra).iter().collect();
        match sort {
            StoneSort::Name => stones.sort_by_cached_key(|stone| stone.name.to_lowercase()),
            StoneSort::Newest => stones.reverse(),
        }
        stones
    }

    /// Case-insensitive match on name or virtues across every category
    ///
    /// Results are `(chakra, stone)` pairs ordered by stone name. A blank
    /// query matches nothing.
    pub fn search(&self, query: &str) -> Vec<(&str, &Stone)> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(&str, &Stone)> = self
            .categories
            .iter()
            .flat_map(|(chakra, stones)| stones.iter().map(move |stone| (chakra.as_str(), stone)))
            .filter(|(_, stone)| {
                stone.name.to_lowercase().contains(&needle) || stone.virtues.to_lowercase().contains(&needle)
            })
            .collect();
        matches.sort_by_cached_key(|(_, stone)| stone.name.to_lowercase());
        matches
    }
}

fn parse_stone(mut entry: Value) -> Option<Stone> {
    if let Some(id) = entry.get_mut("id") {
        if let Value::Number(number) = id {
            *id = Value::String(number.to_string());
        }
    }

    match serde_json::from_value(entry) {
        Ok(stone) => Some(stone),
        Err(e) => {
            tracing::warn!("Skipping malformed stone in list response: {}", e);
            None
        }
    }
}
