//! Variant selector: the controller behind the option buttons.
//!
//! Owns the product snapshot and the Option State Store, and drives the
//! Presentation Synchronizer across every surface of the widget. All work
//! happens synchronously inside one event callback.

use std::sync::Arc;

use storefront_core::{
    resolve, CoreError, CurrencyCode, OptionPosition, Product, Resolution, SelectionState,
};

use crate::history::AddressBar;
use crate::surface::Surface;
use crate::sync::PresentationSync;

pub struct VariantSelector {
    product: Product,
    selection: SelectionState,
    surfaces: Vec<Surface>,
    sync: PresentationSync,
}

impl VariantSelector {
    /// Binds the selector to `surfaces`.
    ///
    /// The selection is seeded from buttons already marked selected on any
    /// surface (a variant chosen via URL or the page default). The currency
    /// is the first surface's `data-currency`, else `fallback_currency`.
    #[must_use]
    pub fn new(
        product: Product,
        surfaces: Vec<Surface>,
        address_bar: Arc<dyn AddressBar>,
        fallback_currency: &CurrencyCode,
    ) -> Self {
        let currency = surface_currency(&surfaces, fallback_currency);
        let mut selection = SelectionState::new(product.option_count());

        for surface in &surfaces {
            surface.with(|state| {
                for button in state.option_buttons.iter().filter(|b| b.selected) {
                    if let Err(e) = selection.set_selection(button.position, button.value.clone()) {
                        tracing::warn!(surface = %state.name, error = %e, "ignoring pre-selected option button");
                    }
                }
            });
        }

        tracing::debug!(
            product_id = product.id,
            surfaces = surfaces.len(),
            seeded = selection.selection_count(),
            currency = %currency,
            "variant selector initialized"
        );

        Self {
            product,
            selection,
            surfaces,
            sync: PresentationSync::new(currency, address_bar),
        }
    }

    #[must_use]
    pub fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        self.sync.currency()
    }

    /// Handles a click on `button` of `surface` (indices into the bound lists).
    ///
    /// Returns `None` when the button does not exist or is disabled; nothing
    /// changes in that case.
    pub fn click(&mut self, surface: usize, button: usize) -> Option<Resolution<'_>> {
        let clicked = self.surfaces.get(surface).and_then(|s| {
            s.with(|state| {
                state
                    .option_buttons
                    .get(button)
                    .map(|b| (b.position, b.value.clone(), b.disabled))
            })
        });

        let Some((position, value, disabled)) = clicked else {
            tracing::debug!(surface, button, "click on unbound option button ignored");
            return None;
        };
        if disabled {
            return None;
        }

        match self.select(position, value) {
            Ok(resolution) => Some(resolution),
            Err(e) => {
                tracing::warn!(error = %e, "option button position does not exist on product");
                None
            }
        }
    }

    /// Selects `value` for `position`, re-highlights buttons on every surface,
    /// then resolves and applies the result.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PositionOutOfRange`] if the product has no option
    /// at `position`; nothing changes in that case.
    pub fn select(
        &mut self,
        position: OptionPosition,
        value: impl Into<String>,
    ) -> Result<Resolution<'_>, CoreError> {
        let value = value.into();
        self.selection.set_selection(position, value.clone())?;
        self.highlight(position, &value);
        Ok(self.refresh())
    }

    /// Resolves the current selection and applies it to every surface.
    pub fn refresh(&self) -> Resolution<'_> {
        let resolution = resolve(&self.product, &self.selection);
        self.sync.apply(&self.product, resolution, &self.surfaces);
        resolution
    }

    fn highlight(&self, position: OptionPosition, value: &str) {
        for surface in &self.surfaces {
            surface.update(|state| {
                for button in state
                    .option_buttons
                    .iter_mut()
                    .filter(|b| b.position == position)
                {
                    button.selected = button.value == value;
                }
            });
        }
    }
}

fn surface_currency(surfaces: &[Surface], fallback: &CurrencyCode) -> CurrencyCode {
    let Some(raw) = surfaces
        .first()
        .and_then(|s| s.with(|state| state.currency.clone()))
    else {
        return fallback.clone();
    };
    CurrencyCode::parse(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, fallback = %fallback, "invalid widget currency; using fallback");
        fallback.clone()
    })
}

#[cfg(test)]
#[path = "selector_test.rs"]
mod tests;
