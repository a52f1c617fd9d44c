//! Presentation Synchronizer: pushes a resolution onto every bound surface.

use std::sync::Arc;

use storefront_core::{CurrencyCode, Money, Product, Resolution, Variant};

use crate::history::{replace_variant_param, AddressBar};
use crate::surface::Surface;

pub const ADD_TO_CART: &str = "Add to cart";
pub const SOLD_OUT: &str = "Sold out";

/// Label text for a submit control, e.g. `"$12.00 - Sold out"`.
#[must_use]
pub fn submit_label(price: Money, currency: &CurrencyCode, available: bool) -> String {
    let action = if available { ADD_TO_CART } else { SOLD_OUT };
    format!("{} - {action}", price.format(currency))
}

pub struct PresentationSync {
    currency: CurrencyCode,
    address_bar: Arc<dyn AddressBar>,
}

impl PresentationSync {
    #[must_use]
    pub fn new(currency: CurrencyCode, address_bar: Arc<dyn AddressBar>) -> Self {
        Self {
            currency,
            address_bar,
        }
    }

    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Applies `resolution` to every surface.
    ///
    /// `NotFound` leaves all surfaces untouched.
    pub fn apply(&self, product: &Product, resolution: Resolution<'_>, surfaces: &[Surface]) {
        match resolution {
            Resolution::Incomplete => self.apply_incomplete(product, surfaces),
            Resolution::Variant(variant) => self.apply_variant(variant, surfaces),
            Resolution::NotFound => {
                tracing::debug!(product_id = product.id, "selection matches no variant; leaving surfaces as-is");
            }
        }
    }

    fn apply_incomplete(&self, product: &Product, surfaces: &[Surface]) {
        let label = submit_label(product.price_min, &self.currency, true);
        for surface in surfaces {
            surface.update(|state| {
                if let Some(submit) = state.submit.as_mut() {
                    submit.disabled = true;
                    submit.label.clone_from(&label);
                }
            });
        }
    }

    fn apply_variant(&self, variant: &Variant, surfaces: &[Surface]) {
        let id = variant.id.to_string();
        let price_text = variant.price.format(&self.currency);
        let label = submit_label(variant.price, &self.currency, variant.available);

        for surface in surfaces {
            surface.update(|state| {
                if let Some(field) = state.variant_id.as_mut() {
                    field.clone_from(&id);
                }
                if let Some(price) = state.price_text.as_mut() {
                    price.clone_from(&price_text);
                }
                if let Some(submit) = state.submit.as_mut() {
                    submit.label.clone_from(&label);
                    submit.disabled = !variant.available;
                }
            });
        }

        replace_variant_param(self.address_bar.as_ref(), variant.id);
        tracing::debug!(variant_id = variant.id, available = variant.available, "variant applied");
    }
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
