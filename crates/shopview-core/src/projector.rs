// ── View projector ──
//
// Pure title filter. Same list + same query always yields the same
// projection, in source order.

use std::sync::Arc;

use crate::model::Product;

/// Fold a raw query into the form `matches` expects.
pub fn normalize(query: &str) -> String {
    query.to_lowercase()
}

/// Whether `product`'s title contains an already-normalized query.
pub fn matches(product: &Product, normalized_query: &str) -> bool {
    normalized_query.is_empty() || product.title.to_lowercase().contains(normalized_query)
}

/// Products whose title contains `query`, case-insensitively.
///
/// An empty query keeps everything. Relative order is preserved.
pub fn project(products: &[Arc<Product>], query: &str) -> Vec<Arc<Product>> {
    let needle = normalize(query);
    products
        .iter()
        .filter(|p| matches(p, &needle))
        .cloned()
        .collect()
}
