//! Quote and comparison result types

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A single store's reported price and listing link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreQuote {
    /// Display text as returned by the API, e.g. "$19.99"
    pub price: String,
    pub url: String,
}

impl StoreQuote {
    pub fn new(price: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            price: price.into(),
            url: url.into(),
        }
    }
}

/// Store name → quote mapping for one query.
///
/// Keys are exactly the stores the API returned; nothing is filtered.
/// Iteration order is by store name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct ComparisonResult {
    quotes: BTreeMap<String, StoreQuote>,
}

impl ComparisonResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, store: impl Into<String>, quote: StoreQuote) {
        self.quotes.insert(store.into(), quote);
    }

    pub fn get(&self, store: &str) -> Option<&StoreQuote> {
        self.quotes.get(store)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn stores(&self) -> impl Iterator<Item = &str> {
        self.quotes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, StoreQuote> {
        self.quotes.iter()
    }
}

impl FromIterator<(String, StoreQuote)> for ComparisonResult {
    fn from_iter<I: IntoIterator<Item = (String, StoreQuote)>>(iter: I) -> Self {
        Self {
            quotes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ComparisonResult {
    type Item = (&'a String, &'a StoreQuote);
    type IntoIter = btree_map::Iter<'a, String, StoreQuote>;

    fn into_iter(self) -> Self::IntoIter {
        self.quotes.iter()
    }
}

/// Summary statistics over a comparison result
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceSummary {
    pub min: f64,
    pub max: f64,
    /// (max - min) / min * 100
    pub margin: f64,
    pub cheapest_store: String,
    pub priciest_store: String,
}

/// Display outcome of aggregating the current result
#[derive(Debug, Clone, PartialEq)]
pub enum MarginStatus {
    Available(PriceSummary),
    /// Aggregation failed; the reason is for logs and tooltips, not a hard error
    Unavailable(String),
}

impl MarginStatus {
    pub fn summary(&self) -> Option<&PriceSummary> {
        match self {
            Self::Available(summary) => Some(summary),
            Self::Unavailable(_) => None,
        }
    }

    /// "12.34%" or "unavailable"
    pub fn display(&self) -> String {
        match self {
            Self::Available(summary) => format!("{:.2}%", summary.margin),
            Self::Unavailable(_) => "unavailable".to_string(),
        }
    }
}
