//! Widget command handlers: load a product, render it onto surfaces, and
//! replay option selections through the variant selector.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use serde_json::{json, Value};
use storefront_cart::StorefrontClient;
use storefront_core::{
    extract_currency, extract_product_json, resolve, AppConfig, OptionPosition, Product,
    ProductOption, Resolution,
};
use storefront_widget::sync::ADD_TO_CART;
use storefront_widget::{
    AddressBar, MemoryHistory, OptionButton, SubmitControl, Surface, SurfaceState, VariantSelector,
};
use url::Url;

/// Product source and option selections shared by every widget command.
#[derive(Debug, Args)]
pub struct WidgetArgs {
    /// Product page path on the storefront (e.g. /products/field-jacket)
    #[arg(long, required_unless_present = "product_file", conflicts_with = "product_file")]
    pub page: Option<String>,
    /// Local product JSON, or a saved product page containing it
    #[arg(long)]
    pub product_file: Option<PathBuf>,
    /// Option selection as POSITION=VALUE, applied in order (repeatable)
    #[arg(long = "select", value_parser = parse_selection)]
    pub selections: Vec<(OptionPosition, String)>,
    /// Number of surfaces rendering the widget (e.g. mobile and desktop)
    #[arg(long, default_value = "2")]
    pub surfaces: usize,
}

/// A product snapshot plus what the page it came from said about it.
#[derive(Debug)]
pub(crate) struct LoadedProduct {
    pub product: Product,
    /// `data-currency` of the widget container, when the page carried one.
    pub currency: Option<String>,
    pub page_url: Url,
}

/// Parse a `POSITION=VALUE` selection argument.
pub(crate) fn parse_selection(raw: &str) -> Result<(OptionPosition, String), String> {
    let (position, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected POSITION=VALUE, got '{raw}'"))?;
    let position = position
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(OptionPosition::new)
        .ok_or_else(|| format!("option position must be a positive integer, got '{position}'"))?;
    Ok((position, value.to_string()))
}

/// Parse either raw product JSON or a product page embedding it.
///
/// # Errors
///
/// Returns an error if the page embeds no product JSON or the JSON is
/// malformed.
pub(crate) fn product_from_text(text: &str) -> anyhow::Result<(Product, Option<String>)> {
    if text.trim_start().starts_with('{') {
        return Ok((Product::from_json(text)?, None));
    }
    let json = extract_product_json(text)?;
    Ok((Product::from_json(json)?, extract_currency(text)))
}

/// Build the storefront client from the configured shop URL.
///
/// # Errors
///
/// Returns an error if `STOREFRONT_SHOP_URL` is unset or not a valid URL.
pub(crate) fn storefront_client(config: &AppConfig) -> anyhow::Result<StorefrontClient> {
    Ok(StorefrontClient::new(
        config.require_shop_url()?,
        config.request_timeout_secs,
        &config.user_agent,
    )?)
}

/// Load the product named by `args`, either from disk or from the storefront.
///
/// A product file needs no shop URL: when none is configured the page URL is
/// the file's own `file://` URL.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the page cannot be fetched,
/// or the product JSON cannot be parsed.
pub(crate) async fn load_product(
    config: &AppConfig,
    args: &WidgetArgs,
) -> anyhow::Result<LoadedProduct> {
    if let Some(path) = &args.product_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let (product, currency) = product_from_text(&text)?;
        let page_url = match config.shop_url {
            Some(_) => storefront_client(config)?
                .origin()
                .join(&format!("/products/{}", product.handle))
                .context("product handle does not form a valid page url")?,
            None => file_url(path)?,
        };
        return Ok(LoadedProduct {
            product,
            currency,
            page_url,
        });
    }

    let client = storefront_client(config)?;
    let page = args.page.as_deref().unwrap_or("/");
    let html = client.fetch_page(page).await?;
    let (product, currency) = product_from_text(&html)?;
    let page_url = client
        .origin()
        .join(page)
        .with_context(|| format!("invalid page path '{page}'"))?;
    tracing::info!(
        product_id = product.id,
        handle = %product.handle,
        variants = product.variants.len(),
        "loaded product page"
    );
    Ok(LoadedProduct {
        product,
        currency,
        page_url,
    })
}

fn file_url(path: &Path) -> anyhow::Result<Url> {
    let absolute = std::fs::canonicalize(path)
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    Url::from_file_path(&absolute)
        .map_err(|()| anyhow::anyhow!("{} cannot be expressed as a URL", absolute.display()))
}

/// Render `count` surfaces for `product`, one button per option value.
pub(crate) fn build_surfaces(
    product: &Product,
    currency: Option<&str>,
    count: usize,
) -> Vec<Surface> {
    (1..=count)
        .map(|n| {
            let mut state = SurfaceState::new(format!("surface-{n}"));
            state.currency = currency.map(str::to_string);
            state.option_buttons = product
                .options
                .iter()
                .flat_map(|option| {
                    option_values(product, option)
                        .into_iter()
                        .map(|value| OptionButton::new(option.position, value))
                })
                .collect();
            state.submit = Some(SubmitControl::new(ADD_TO_CART));
            state.variant_id = Some(String::new());
            state.form_fields = vec![("quantity".to_string(), "1".to_string())];
            Surface::new(state)
        })
        .collect()
}

/// Values offered for `option`: its declared list, or else the distinct values
/// the variants carry at its position, in catalog order.
fn option_values(product: &Product, option: &ProductOption) -> Vec<String> {
    if !option.values.is_empty() {
        return option.values.clone();
    }
    let mut values: Vec<String> = Vec::new();
    for value in product
        .variants
        .iter()
        .filter_map(|v| v.option(option.position))
    {
        if !values.iter().any(|existing| existing == value) {
            values.push(value.to_string());
        }
    }
    values
}

/// Bind a selector to freshly rendered surfaces and replay `args.selections`.
///
/// # Errors
///
/// Returns an error if a selection names a position the product lacks.
pub(crate) fn run_selector(
    config: &AppConfig,
    loaded: LoadedProduct,
    args: &WidgetArgs,
) -> anyhow::Result<(VariantSelector, Arc<MemoryHistory>)> {
    let history = Arc::new(MemoryHistory::new(loaded.page_url));
    let surfaces = build_surfaces(&loaded.product, loaded.currency.as_deref(), args.surfaces);
    let mut selector = VariantSelector::new(
        loaded.product,
        surfaces,
        history.clone(),
        &config.fallback_currency,
    );

    for (position, value) in &args.selections {
        selector
            .select(*position, value.clone())
            .with_context(|| format!("cannot select '{value}' for option {position}"))?;
    }
    if args.selections.is_empty() {
        selector.refresh();
    }
    Ok((selector, history))
}

/// JSON summary of the selector after the last event.
pub(crate) fn widget_report(selector: &VariantSelector, history: &MemoryHistory) -> Value {
    let selection = selector.selection();
    let selected: Vec<Option<&str>> = (0..selection.option_count())
        .map(|idx| selection.value(OptionPosition::from_index(idx)))
        .collect();
    let resolution = resolve(selector.product(), selection);
    let (outcome, variant) = match resolution {
        Resolution::Variant(v) => ("variant", Some(v)),
        Resolution::NotFound => ("not_found", None),
        Resolution::Incomplete => ("incomplete", None),
    };
    let surfaces: Vec<SurfaceState> = selector.surfaces().iter().map(Surface::snapshot).collect();

    json!({
        "product": selector.product().handle,
        "currency": selector.currency().as_str(),
        "selected": selected,
        "resolution": outcome,
        "variant": variant,
        "url": history.current_url().as_str(),
        "url_replacements": history.replacements(),
        "surfaces": surfaces,
    })
}

/// Resolve the selections and print the widget state.
///
/// # Errors
///
/// Returns an error if the product cannot be loaded or a selection is invalid.
pub(crate) async fn run_resolve(config: &AppConfig, args: &WidgetArgs) -> anyhow::Result<()> {
    let loaded = load_product(config, args).await?;
    let (selector, history) = run_selector(config, loaded, args)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&widget_report(&selector, history.as_ref()))?
    );
    Ok(())
}
