//! Product catalog embedded in a storefront product page.
//!
//! ## Observed shape of the embedded document
//!
//! The product page renders the product as JSON inside a
//! `<script id="product-json">` element. The relevant fields:
//!
//! ### `options`
//! Either a list of option names (`["Color", "Size"]`) or a list of objects
//! carrying `name`, `position` and `values`. Both shapes are accepted. When a
//! position is absent the list order defines it (1-based).
//!
//! ### `variants[].options`
//! Ordered list of option values aligned with `options`. Older themes only
//! render `option1`..`option3`; the tuple is rebuilt from those when the list
//! is absent.
//!
//! ### `variants[].price` / `price_min`
//! Integers in minor currency units (`1000` is `$10.00`). `price_min` may be
//! absent on trimmed payloads; it then falls back to the cheapest variant.
//!
//! ### `variants[].available`
//! Boolean. Defaults to `true` when absent.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::Money;

/// 1-based index of an option definition. Position `0` cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OptionPosition(usize);

impl OptionPosition {
    #[must_use]
    pub const fn new(position: usize) -> Option<Self> {
        if position == 0 {
            None
        } else {
            Some(Self(position))
        }
    }

    /// Position for the option at zero-based list `index`.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Zero-based index into an option value tuple.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for OptionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named axis of variation, e.g. `Color`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductOption {
    pub name: String,
    pub position: OptionPosition,
    /// Known values, when the document lists them. May be empty.
    pub values: Vec<String>,
}

/// A concrete purchasable combination of one value per option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub id: i64,
    pub title: String,
    /// Option values, position-aligned with [`Product::options`].
    pub options: Vec<String>,
    pub price: Money,
    pub available: bool,
}

impl Variant {
    /// Value this variant carries for `position`, if any.
    #[must_use]
    pub fn option(&self, position: OptionPosition) -> Option<&str> {
        self.options.get(position.index()).map(String::as_str)
    }
}

/// Immutable product snapshot, loaded once per page view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub handle: String,
    /// Option definitions ordered by position.
    pub options: Vec<ProductOption>,
    /// Variants in document order; resolution relies on this order for
    /// first-match tie-breaking.
    pub variants: Vec<Variant>,
    pub price_min: Money,
}

impl Product {
    /// Parses the embedded product JSON document.
    ///
    /// Catalog inconsistencies (tuple length mismatches, duplicate option
    /// tuples) are logged but not rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Deserialize`] if `json` is not a product document.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let raw: RawProduct =
            serde_json::from_str(json).map_err(|source| CoreError::Deserialize {
                context: "embedded product document".to_owned(),
                source,
            })?;
        let product = Self::from_raw(raw);
        product.log_catalog_issues();
        Ok(product)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    fn from_raw(raw: RawProduct) -> Self {
        let mut options: Vec<ProductOption> = raw
            .options
            .into_iter()
            .enumerate()
            .map(|(idx, option)| option.into_option(idx))
            .collect();
        options.sort_by_key(|o| o.position);

        let variants: Vec<Variant> = raw.variants.into_iter().map(RawVariant::into_variant).collect();

        let price_min = raw.price_min.map_or_else(
            || variants.iter().map(|v| v.price).min().unwrap_or_default(),
            Money::from_cents,
        );

        Self {
            id: raw.id,
            title: raw.title,
            handle: raw.handle,
            options,
            variants,
            price_min,
        }
    }

    fn log_catalog_issues(&self) {
        let option_count = self.option_count();
        let mut seen = HashSet::new();
        for variant in &self.variants {
            if variant.options.len() != option_count {
                tracing::warn!(
                    product_id = self.id,
                    variant_id = variant.id,
                    expected = option_count,
                    actual = variant.options.len(),
                    "variant option tuple length differs from option count; it can never resolve"
                );
            }
            if !seen.insert(variant.options.as_slice()) {
                tracing::warn!(
                    product_id = self.id,
                    variant_id = variant.id,
                    options = ?variant.options,
                    "duplicate option tuple; the earlier variant wins resolution"
                );
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    handle: String,
    #[serde(default)]
    options: Vec<RawOption>,
    #[serde(default)]
    variants: Vec<RawVariant>,
    #[serde(default)]
    price_min: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOption {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        position: Option<usize>,
        #[serde(default)]
        values: Vec<String>,
    },
}

impl RawOption {
    fn into_option(self, index: usize) -> ProductOption {
        match self {
            Self::Name(name) => ProductOption {
                name,
                position: OptionPosition::from_index(index),
                values: Vec::new(),
            },
            Self::Detailed {
                name,
                position,
                values,
            } => ProductOption {
                name,
                position: position
                    .and_then(OptionPosition::new)
                    .unwrap_or(OptionPosition::from_index(index)),
                values,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawVariant {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    option1: Option<String>,
    #[serde(default)]
    option2: Option<String>,
    #[serde(default)]
    option3: Option<String>,
    price: i64,
    #[serde(default = "default_available")]
    available: bool,
}

impl RawVariant {
    fn into_variant(self) -> Variant {
        let options = self.options.unwrap_or_else(|| {
            [self.option1, self.option2, self.option3]
                .into_iter()
                .map_while(|v| v)
                .collect()
        });
        Variant {
            id: self.id,
            title: self.title,
            options,
            price: Money::from_cents(self.price),
            available: self.available,
        }
    }
}

/// serde needs a function path here; absent availability is treated as in stock.
fn default_available() -> bool {
    true
}

#[cfg(test)]
#[path = "product_test.rs"]
mod tests;
