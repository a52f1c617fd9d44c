//! UI Surfaces: one rendered instance of the purchase widget each.
//!
//! A product page may render the widget more than once (a mobile and a
//! desktop layout). Every element a surface binds is optional; a missing
//! element is skipped by whoever would have updated it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use storefront_core::OptionPosition;

/// Form field name carrying the resolved variant id.
pub const VARIANT_ID_FIELD: &str = "id";

/// A clickable option value, e.g. `Size: M`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionButton {
    pub position: OptionPosition,
    pub value: String,
    pub selected: bool,
    pub disabled: bool,
}

impl OptionButton {
    #[must_use]
    pub fn new(position: OptionPosition, value: impl Into<String>) -> Self {
        Self {
            position,
            value: value.into(),
            selected: false,
            disabled: false,
        }
    }

    #[must_use]
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadingSpinner {
    pub hidden: bool,
}

impl Default for LoadingSpinner {
    fn default() -> Self {
        Self { hidden: true }
    }
}

/// The form's submit button with its nested label and loading indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub disabled: bool,
    pub label: String,
    pub spinner: Option<LoadingSpinner>,
    /// Transient "in progress" styling while a cart add is in flight.
    pub in_progress: bool,
}

impl SubmitControl {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            disabled: false,
            label: label.into(),
            spinner: Some(LoadingSpinner::default()),
            in_progress: false,
        }
    }

    #[must_use]
    pub fn without_spinner(mut self) -> Self {
        self.spinner = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SurfaceState {
    pub name: String,
    /// `data-currency` of the widget container, verbatim.
    pub currency: Option<String>,
    pub option_buttons: Vec<OptionButton>,
    pub price_text: Option<String>,
    pub submit: Option<SubmitControl>,
    /// Hidden variant-id field. `None` when the surface has no such field,
    /// `Some("")` when it exists but no variant is chosen.
    pub variant_id: Option<String>,
    /// Other product-form fields (quantity, line-item properties, ...).
    pub form_fields: Vec<(String, String)>,
}

impl SurfaceState {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Serialized form fields in submission order, hidden variant id first.
    #[must_use]
    pub fn form_data(&self) -> Vec<(String, String)> {
        self.variant_id
            .iter()
            .map(|id| (VARIANT_ID_FIELD.to_owned(), id.clone()))
            .chain(self.form_fields.iter().cloned())
            .collect()
    }
}

/// Shared handle to one surface.
///
/// Clones point at the same state, so the option selector and the cart
/// submission controller observe each other's updates.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    state: Arc<Mutex<SurfaceState>>,
}

impl Surface {
    #[must_use]
    pub fn new(state: SurfaceState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Reads the surface under its lock.
    pub fn with<R>(&self, f: impl FnOnce(&SurfaceState) -> R) -> R {
        f(&self.lock())
    }

    /// Mutates the surface under its lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut SurfaceState) -> R) -> R {
        f(&mut self.lock())
    }

    #[must_use]
    pub fn snapshot(&self) -> SurfaceState {
        self.lock().clone()
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.lock().name.clone()
    }

    // Updates never panic mid-write, so a poisoned lock still holds
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<SurfaceState> for Surface {
    fn from(state: SurfaceState) -> Self {
        Self::new(state)
    }
}
