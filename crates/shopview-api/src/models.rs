// Wire types for the product catalogue endpoint.
//
// These mirror the JSON exactly as the source sends it. Domain types
// (with validation and normalized fields) live in `shopview-core`.

use serde::{Deserialize, Serialize};

/// Any JSON number, kept as sent (`7`, `-1`, `2.5`).
pub use serde_json::Number;

/// Product identifier as sent by the source: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawProductId {
    Number(Number),
    Text(String),
}

/// Aggregate customer rating attached to some catalogue records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRating {
    pub rate: f64,
    #[serde(default)]
    pub count: u64,
}

/// One element of the catalogue array.
///
/// Only `id` and `price` are hard requirements at the wire level; a missing
/// or `null` title / image deserializes to `None`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    pub id: RawProductId,
    #[serde(default)]
    pub title: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<RawRating>,
}
