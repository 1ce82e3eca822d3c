//! Auto.dev listing types.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// One vehicle listing. Price-like fields are kept loose because the
/// upstream mixes numbers, strings and nulls across dealers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub photo_urls: Option<Vec<Value>>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub list_price: Option<Value>,
    #[serde(default)]
    pub asking_price: Option<Value>,
    #[serde(default)]
    pub msrp: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl Listing {
    /// First strictly positive numeric price, checked in the order
    /// `price`, `listPrice`, `askingPrice`, `msrp`, `value`.
    pub fn effective_price(&self) -> Option<Number> {
        [
            &self.price,
            &self.list_price,
            &self.asking_price,
            &self.msrp,
            &self.value,
        ]
        .into_iter()
        .flatten()
        .find_map(|v| match v {
            Value::Number(n) if n.as_f64().is_some_and(|p| p > 0.0) => Some(n.clone()),
            _ => None,
        })
    }

    /// Non-empty photo URLs in listing order.
    pub fn photos(&self) -> impl Iterator<Item = &str> {
        self.photo_urls
            .iter()
            .flatten()
            .filter_map(Value::as_str)
            .filter(|url| !url.is_empty())
    }
}

/// `GET /listings` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingsPage {
    #[serde(default)]
    pub records: Option<Vec<Listing>>,
}

/// Lookup parameters for a make/model/year, optionally filtered by colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub make: String,
    pub model: String,
    pub year: String,
    /// English colour name as understood by Auto.dev.
    pub color: Option<String>,
}

/// Photos and prices distilled from a set of listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub photos: Vec<String>,
    pub prices: Vec<Number>,
    pub average_price: Option<i64>,
}
