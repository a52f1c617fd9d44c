//! `add` command: resolve a variant, then submit the first surface's product
//! form through the cart submission controller.

use std::sync::Arc;

use storefront_cart::{
    CartPreview, CartSubmissionController, SectionsPayload, SubmitOutcome,
};
use storefront_core::AppConfig;

use crate::widget::{load_product, run_selector, storefront_client, widget_report, WidgetArgs};

/// Cart preview that logs each re-rendered section.
#[derive(Debug, Default)]
pub(crate) struct LoggedPreview;

impl CartPreview for LoggedPreview {
    fn render_contents(&self, payload: &SectionsPayload) {
        for (section, html) in &payload.sections {
            match html {
                Some(html) => {
                    tracing::info!(section = %section, bytes = html.len(), "cart section re-rendered");
                }
                None => tracing::warn!(section = %section, "cart section could not be rendered"),
            }
        }
    }
}

/// Set the `quantity` field on a surface's product form.
pub(crate) fn set_quantity(fields: &mut Vec<(String, String)>, quantity: u32) {
    let value = quantity.to_string();
    match fields.iter_mut().find(|(name, _)| name == "quantity") {
        Some((_, existing)) => *existing = value,
        None => fields.push(("quantity".to_string(), value)),
    }
}

/// Resolve the selections and add the resulting variant to the cart.
///
/// # Errors
///
/// Returns an error if no shop URL is configured, the product cannot be
/// loaded, no surface is rendered, or the cart add does not succeed.
pub(crate) async fn run_add(
    config: &AppConfig,
    args: &WidgetArgs,
    quantity: u32,
) -> anyhow::Result<()> {
    let client = Arc::new(storefront_client(config)?);
    let loaded = load_product(config, args).await?;
    let (selector, history) = run_selector(config, loaded, args)?;

    let Some(surface) = selector.surfaces().first().cloned() else {
        anyhow::bail!("at least one surface is required to submit a product form");
    };
    surface.update(|state| set_quantity(&mut state.form_fields, quantity));

    let controller =
        CartSubmissionController::bind(client, surface, history.clone(), &config.cart_section)
            .ok_or_else(|| anyhow::anyhow!("surface has no product form"))?
            .with_preview(Arc::new(LoggedPreview));

    let outcome = controller.submit().await;
    let report = widget_report(&selector, history.as_ref());

    match outcome {
        SubmitOutcome::Added(sections) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "widget": report,
                    "cart": sections,
                }))?
            );
            Ok(())
        }
        SubmitOutcome::Rejected(rejection) => anyhow::bail!(
            "cart rejected the item: {}",
            rejection
                .description
                .or(rejection.message)
                .unwrap_or_else(|| rejection.status.to_string())
        ),
        SubmitOutcome::Failed(e) => Err(e.into()),
        SubmitOutcome::Skipped(reason) => anyhow::bail!("cart add skipped: {reason:?}"),
    }
}
