// ── Wire → domain conversion ──
//
// Turns `shopview_api::RawProduct` records into `Product`. The catalogue is
// all-or-nothing: one bad record fails the whole list.

use shopview_api::{RawProduct, RawProductId, RawRating};

use crate::error::CoreError;
use crate::model::{Product, ProductId, Rating};

impl From<RawProductId> for ProductId {
    fn from(raw: RawProductId) -> Self {
        match raw {
            RawProductId::Number(n) => Self::Numeric(n),
            RawProductId::Text(s) => Self::Text(s),
        }
    }
}

impl From<RawRating> for Rating {
    fn from(raw: RawRating) -> Self {
        Self {
            rate: raw.rate,
            count: raw.count,
        }
    }
}

impl TryFrom<RawProduct> for Product {
    type Error = CoreError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        if !raw.price.is_finite() || raw.price < 0.0 {
            return Err(CoreError::load_failure(format!(
                "product {:?} has invalid price {}",
                raw.id, raw.price
            )));
        }

        Ok(Self {
            id: raw.id.into(),
            // Absent titles match only the empty query.
            title: raw.title.unwrap_or_default(),
            price: raw.price,
            image: raw.image.unwrap_or_default(),
            description: raw.description,
            category: raw.category,
            rating: raw.rating.map(Rating::from),
        })
    }
}

/// Convert a full payload, preserving arrival order.
pub fn products_from_raw(raw: Vec<RawProduct>) -> Result<Vec<Product>, CoreError> {
    raw.into_iter().map(Product::try_from).collect()
}
