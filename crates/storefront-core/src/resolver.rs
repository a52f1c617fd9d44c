//! Variant Resolver: maps a selection onto the product's variant catalog.

use crate::product::{Product, Variant};
use crate::selection::SelectionState;

/// Outcome of resolving a selection against a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Every position has a value and exactly this variant carries the tuple
    /// (the first one in catalog order if the catalog repeats a tuple).
    Variant(&'a Variant),
    /// Every position has a value but no variant carries the tuple.
    NotFound,
    /// Fewer positions are selected than the product has options.
    Incomplete,
}

impl<'a> Resolution<'a> {
    #[must_use]
    pub fn variant(self) -> Option<&'a Variant> {
        match self {
            Self::Variant(variant) => Some(variant),
            Self::NotFound | Self::Incomplete => None,
        }
    }
}

/// Resolves `selection` to a variant of `product`.
///
/// The tuple is read from positions `1..=N` in increasing order, where `N` is
/// the product's option count, and compared against each variant's option
/// tuple position by position.
#[must_use]
pub fn resolve<'a>(product: &'a Product, selection: &SelectionState) -> Resolution<'a> {
    let Some(tuple) = selection
        .tuple()
        .filter(|tuple| tuple.len() == product.option_count())
    else {
        return Resolution::Incomplete;
    };

    product
        .variants
        .iter()
        .find(|variant| {
            variant.options.len() == tuple.len()
                && variant.options.iter().zip(&tuple).all(|(a, b)| a == b)
        })
        .map_or_else(
            || {
                tracing::debug!(product_id = product.id, ?tuple, "no variant matches selection");
                Resolution::NotFound
            },
            Resolution::Variant,
        )
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
