// ── Product identity and record types ──
//
// ProductId wraps whatever identifier the source hands out (number or
// string) behind one comparable token. Product is the immutable record
// every consumer renders.

use serde::{Deserialize, Serialize};
use shopview_api::Number;
use std::fmt;
use std::str::FromStr;

// ── ProductId ───────────────────────────────────────────────────────

/// Opaque identifier for a catalogue entry.
///
/// Sources may send numeric or string ids. Numbers keep the value the
/// source sent, negative or fractional included. Consumers compare and
/// display them but never do arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Numeric(Number),
    Text(String),
}

impl ProductId {
    pub fn as_numeric(&self) -> Option<u64> {
        match self {
            Self::Numeric(n) => n.as_u64(),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Numeric(_) => None,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for ProductId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<u64> for ProductId {
    fn from(n: u64) -> Self {
        Self::Numeric(n.into())
    }
}

impl From<Number> for ProductId {
    fn from(n: Number) -> Self {
        Self::Numeric(n)
    }
}

/// Strings that spell a number exactly as it displays become `Numeric`, so
/// `"7"` or `"-1"` typed on a command line matches a source that sent the
/// number. Anything else (`"007"`, `"1e3"`, `"sku-7"`) stays text.
impl From<String> for ProductId {
    fn from(s: String) -> Self {
        match s.parse::<Number>() {
            Ok(n) if n.to_string() == s => Self::Numeric(n),
            _ => Self::Text(s),
        }
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

// ── Product ─────────────────────────────────────────────────────────

/// Aggregate customer rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

/// One catalogue entry.
///
/// `title` is the only search key. `image` is an opaque asset reference
/// that this crate never dereferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Product {
    /// Minimal record with just the four core fields.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        price: f64,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            image: image.into(),
            description: None,
            category: None,
            rating: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn product_id_from_digit_string_is_numeric() {
        let id = ProductId::from("42");
        assert_eq!(id.as_numeric(), Some(42));
    }

    #[test]
    fn product_id_from_sku_is_text() {
        let id = ProductId::from("sku-42");
        assert_eq!(id.as_text(), Some("sku-42"));
    }

    #[test]
    fn product_id_from_signed_or_fractional_string_is_numeric() {
        assert_eq!(ProductId::from("-1").to_string(), "-1");
        assert!(matches!(ProductId::from("-1"), ProductId::Numeric(_)));
        assert!(matches!(ProductId::from("2.5"), ProductId::Numeric(_)));
        assert_eq!(ProductId::from("-1").as_numeric(), None);
    }

    #[test]
    fn product_id_from_non_canonical_number_is_text() {
        assert_eq!(ProductId::from("007").as_text(), Some("007"));
        assert_eq!(ProductId::from("1e3").as_text(), Some("1e3"));
    }

    #[test]
    fn product_id_display() {
        assert_eq!(ProductId::from(7).to_string(), "7");
        assert_eq!(ProductId::Text("abc".into()).to_string(), "abc");
    }

    #[test]
    fn product_id_from_str() {
        let id: ProductId = "19".parse().unwrap();
        assert_eq!(id, ProductId::from(19));
    }

    #[test]
    fn product_id_serializes_untagged() {
        assert_eq!(serde_json::to_string(&ProductId::from(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ProductId::Text("x".into())).unwrap(),
            "\"x\""
        );
    }

    #[test]
    fn product_json_omits_missing_extras() {
        let product = Product::new(1, "Blue Shirt", 19.99, "https://img/1.png");
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("category").is_none());
        assert_eq!(json["title"], "Blue Shirt");
    }
}
