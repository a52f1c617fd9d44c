//! Cart Submission Controller: one add-to-cart lifecycle per product form.
//!
//! ```text
//!   Idle ──submit──► Submitting ──response / failure──► Idle
//!     ▲                  │
//!     └── submit while Submitting: dropped, no request
//! ```
//!
//! The lock is claimed before any asynchronous work starts, and released by a
//! drop guard: every exit path (success, rejection, transport failure, or the
//! future being dropped mid-flight) returns the form to an interactive state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use storefront_widget::surface::VARIANT_ID_FIELD;
use storefront_widget::{AddressBar, Surface, SurfaceState};

use crate::client::StorefrontClient;
use crate::error::CartError;
use crate::preview::CartPreview;
use crate::types::{CartAddResult, CartRejection, SectionsPayload};

/// Form field listing the region ids to re-render alongside the cart add.
pub const SECTIONS_FIELD: &str = "sections";
/// Form field carrying the page path the sections are rendered for.
pub const SECTIONS_URL_FIELD: &str = "sections_url";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A submission from this form is already in flight.
    InFlight,
    /// The form carries no variant id.
    MissingVariant,
}

/// How a submit attempt settled. Failures are reported here, never raised.
#[derive(Debug)]
pub enum SubmitOutcome {
    Added(SectionsPayload),
    Rejected(CartRejection),
    Failed(CartError),
    Skipped(SkipReason),
}

pub struct CartSubmissionController {
    client: Arc<StorefrontClient>,
    surface: Surface,
    address_bar: Arc<dyn AddressBar>,
    preview: Option<Arc<dyn CartPreview>>,
    cart_section: String,
    submitting: AtomicBool,
}

impl CartSubmissionController {
    /// Binds a controller to the product form on `surface`.
    ///
    /// Returns `None` (and logs) when the surface renders no product form,
    /// i.e. has no hidden variant-id field; other surfaces are unaffected.
    #[must_use]
    pub fn bind(
        client: Arc<StorefrontClient>,
        surface: Surface,
        address_bar: Arc<dyn AddressBar>,
        cart_section: impl Into<String>,
    ) -> Option<Self> {
        let (name, has_form) = surface.with(|s| (s.name.clone(), s.variant_id.is_some()));
        if !has_form {
            tracing::error!(surface = %name, "product form not found; cart submission inactive");
            return None;
        }
        tracing::debug!(surface = %name, "cart submission controller bound");

        Some(Self {
            client,
            surface,
            address_bar,
            preview: None,
            cart_section: cart_section.into(),
            submitting: AtomicBool::new(false),
        })
    }

    /// Injects the cart-preview collaborator.
    #[must_use]
    pub fn with_preview(mut self, preview: Arc<dyn CartPreview>) -> Self {
        self.preview = Some(preview);
        self
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Handles a submit event on the bound form.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("submission already in flight; ignoring submit");
            return SubmitOutcome::Skipped(SkipReason::InFlight);
        }
        let mut guard = SubmissionGuard {
            controller: self,
            ui_locked: false,
        };

        let mut fields = self.surface.with(SurfaceState::form_data);
        let has_variant = fields
            .iter()
            .any(|(name, value)| name == VARIANT_ID_FIELD && !value.trim().is_empty());
        if !has_variant {
            tracing::warn!("no variant selected; cart add aborted");
            return SubmitOutcome::Skipped(SkipReason::MissingVariant);
        }

        guard.lock_ui();

        fields.push((SECTIONS_FIELD.to_owned(), self.cart_section.clone()));
        fields.push((
            SECTIONS_URL_FIELD.to_owned(),
            self.address_bar.current_url().path().to_owned(),
        ));

        match self.client.add_to_cart(&fields).await {
            Ok(CartAddResult::Added { item, sections }) => {
                tracing::info!(
                    variant_id = ?item.variant_id,
                    quantity = ?item.quantity,
                    sections = sections.sections.len(),
                    "item added to cart"
                );
                match &self.preview {
                    Some(preview) => preview.render_contents(&sections),
                    None => tracing::warn!("cart preview not available; contents not refreshed"),
                }
                SubmitOutcome::Added(sections)
            }
            Ok(CartAddResult::Rejected(rejection)) => {
                tracing::error!(
                    status = %rejection.status,
                    message = ?rejection.message,
                    description = ?rejection.description,
                    "add to cart rejected"
                );
                SubmitOutcome::Rejected(rejection)
            }
            Err(e) => {
                tracing::error!(error = %e, "error adding to cart");
                SubmitOutcome::Failed(e)
            }
        }
    }
}

/// Returns the controller to `Idle` when dropped.
struct SubmissionGuard<'a> {
    controller: &'a CartSubmissionController,
    ui_locked: bool,
}

impl SubmissionGuard<'_> {
    fn lock_ui(&mut self) {
        self.controller.surface.update(|state| {
            if let Some(submit) = state.submit.as_mut() {
                submit.disabled = true;
                submit.in_progress = true;
                if let Some(spinner) = submit.spinner.as_mut() {
                    spinner.hidden = false;
                }
            }
        });
        self.ui_locked = true;
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        if self.ui_locked {
            self.controller.surface.update(|state| {
                if let Some(submit) = state.submit.as_mut() {
                    submit.disabled = false;
                    submit.in_progress = false;
                    if let Some(spinner) = submit.spinner.as_mut() {
                        spinner.hidden = true;
                    }
                }
            });
        }
        self.controller.submitting.store(false, Ordering::Release);
    }
}
