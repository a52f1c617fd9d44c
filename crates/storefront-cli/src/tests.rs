use clap::Parser;
use storefront_core::{AppConfig, CurrencyCode, Environment, OptionPosition};
use storefront_widget::AddressBar;

use super::*;
use crate::cart::{run_add, set_quantity};
use crate::widget::{
    build_surfaces, load_product, parse_selection, product_from_text, run_selector, widget_report,
    LoadedProduct,
};

const JACKET: &str = r#"{
    "id": 42,
    "title": "Field Jacket",
    "handle": "field-jacket",
    "options": ["Color", "Size"],
    "price_min": 1000,
    "variants": [
        {"id": 1, "options": ["Red", "S"], "price": 1000, "available": true},
        {"id": 2, "options": ["Red", "M"], "price": 1200, "available": false}
    ]
}"#;

fn pos(n: usize) -> OptionPosition {
    OptionPosition::new(n).unwrap()
}

fn config() -> AppConfig {
    AppConfig {
        shop_url: Some("https://shop.example.com".to_string()),
        env: Environment::Test,
        log_level: "info".to_string(),
        request_timeout_secs: 5,
        user_agent: "storefront-test/0.1".to_string(),
        cart_section: "header".to_string(),
        fallback_currency: CurrencyCode::usd(),
    }
}

fn loaded(currency: Option<&str>) -> LoadedProduct {
    let (product, _) = product_from_text(JACKET).unwrap();
    LoadedProduct {
        product,
        currency: currency.map(str::to_string),
        page_url: "https://shop.example.com/products/field-jacket".parse().unwrap(),
    }
}

fn widget_args(argv: &[&str]) -> WidgetArgs {
    let mut full = vec!["storefront-cli", "resolve"];
    full.extend_from_slice(argv);
    match Cli::try_parse_from(full).expect("expected valid cli args").command {
        Commands::Resolve { widget } => widget,
        Commands::Add { .. } => panic!("expected resolve"),
    }
}

#[test]
fn parses_resolve_with_page_and_selections() {
    let args = widget_args(&[
        "--page",
        "/products/field-jacket",
        "--select",
        "1=Red",
        "--select",
        "2=M",
    ]);
    assert_eq!(args.page.as_deref(), Some("/products/field-jacket"));
    assert_eq!(
        args.selections,
        vec![(pos(1), "Red".to_string()), (pos(2), "M".to_string())]
    );
    assert_eq!(args.surfaces, 2);
}

#[test]
fn parses_add_with_quantity() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "add",
        "--product-file",
        "jacket.json",
        "--quantity",
        "3",
    ])
    .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Add { quantity: 3, .. }));
}

#[test]
fn product_source_is_required() {
    assert!(Cli::try_parse_from(["storefront-cli", "resolve"]).is_err());
}

#[test]
fn page_and_file_conflict() {
    assert!(Cli::try_parse_from([
        "storefront-cli",
        "resolve",
        "--page",
        "/products/field-jacket",
        "--product-file",
        "jacket.json",
    ])
    .is_err());
}

#[test]
fn no_command_is_an_error() {
    assert!(Cli::try_parse_from(["storefront-cli"]).is_err());
}

#[test]
fn selection_value_may_contain_equals() {
    assert_eq!(
        parse_selection("2=A=B").unwrap(),
        (pos(2), "A=B".to_string())
    );
}

#[test]
fn selection_rejects_zero_and_garbage_positions() {
    assert!(parse_selection("0=Red").is_err());
    assert!(parse_selection("first=Red").is_err());
    assert!(parse_selection("Red").is_err());
}

#[test]
fn product_text_accepts_embedded_page() {
    let html = format!(
        r#"<div class="product-form-wrapper" data-currency="EUR">
        <script type="application/json" id="product-json">{JACKET}</script></div>"#
    );
    let (product, currency) = product_from_text(&html).unwrap();
    assert_eq!(product.handle, "field-jacket");
    assert_eq!(currency.as_deref(), Some("EUR"));
}

#[test]
fn surfaces_render_one_button_per_option_value() {
    let (product, _) = product_from_text(JACKET).unwrap();
    let surfaces = build_surfaces(&product, Some("CAD"), 2);

    assert_eq!(surfaces.len(), 2);
    let state = surfaces[1].snapshot();
    assert_eq!(state.name, "surface-2");
    assert_eq!(state.currency.as_deref(), Some("CAD"));
    let values: Vec<&str> = state.option_buttons.iter().map(|b| b.value.as_str()).collect();
    assert_eq!(values, vec!["Red", "S", "M"]);
    assert_eq!(state.variant_id.as_deref(), Some(""));
}

#[test]
fn replayed_selections_resolve_and_report() {
    let args = widget_args(&["--product-file", "jacket.json", "--select", "1=Red", "--select", "2=S"]);
    let (selector, history) = run_selector(&config(), loaded(None), &args).unwrap();

    let report = widget_report(&selector, history.as_ref());
    assert_eq!(report["resolution"], "variant");
    assert_eq!(report["variant"]["id"], 1);
    assert_eq!(report["selected"], serde_json::json!(["Red", "S"]));
    assert_eq!(
        report["url"],
        "https://shop.example.com/products/field-jacket?variant=1"
    );
    assert_eq!(report["surfaces"][0]["submit"]["label"], "$10.00 - Add to cart");
    assert_eq!(report["url_replacements"], 1);
    assert_eq!(report["surfaces"][1]["variant_id"], "1");
}

#[test]
fn partial_selection_reports_incomplete() {
    let args = widget_args(&["--product-file", "jacket.json", "--select", "1=Red"]);
    let (selector, history) = run_selector(&config(), loaded(Some("GBP")), &args).unwrap();

    let report = widget_report(&selector, history.as_ref());
    assert_eq!(report["resolution"], "incomplete");
    assert_eq!(report["currency"], "GBP");
    assert_eq!(report["selected"], serde_json::json!(["Red", null]));
    assert_eq!(report["surfaces"][0]["submit"]["disabled"], true);
    assert_eq!(history.current_url().query(), None);
}

#[test]
fn selection_beyond_option_count_is_an_error() {
    let args = widget_args(&["--product-file", "jacket.json", "--select", "3=Wool"]);
    assert!(run_selector(&config(), loaded(None), &args).is_err());
}

#[test]
fn quantity_replaces_existing_field() {
    let mut fields = vec![("quantity".to_string(), "1".to_string())];
    set_quantity(&mut fields, 4);
    assert_eq!(fields, vec![("quantity".to_string(), "4".to_string())]);

    let mut empty = Vec::new();
    set_quantity(&mut empty, 2);
    assert_eq!(empty, vec![("quantity".to_string(), "2".to_string())]);
}

fn write_product_file(name: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("{name}-{}.json", std::process::id()));
    std::fs::write(&path, JACKET).unwrap();
    path
}

#[tokio::test]
async fn product_file_loads_without_shop_url() {
    let path = write_product_file("storefront-cli-offline");
    let config = AppConfig {
        shop_url: None,
        ..config()
    };
    let args = widget_args(&["--product-file", path.to_str().unwrap(), "--select", "1=Red"]);

    let loaded = load_product(&config, &args).await.unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.product.handle, "field-jacket");
    assert_eq!(loaded.page_url.scheme(), "file");
}

#[tokio::test]
async fn product_file_uses_shop_page_url_when_configured() {
    let path = write_product_file("storefront-cli-online");
    let args = widget_args(&["--product-file", path.to_str().unwrap()]);

    let loaded = load_product(&config(), &args).await.unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(
        loaded.page_url.as_str(),
        "https://shop.example.com/products/field-jacket"
    );
}

#[tokio::test]
async fn add_requires_shop_url() {
    let config = AppConfig {
        shop_url: None,
        ..config()
    };
    let args = widget_args(&["--product-file", "jacket.json"]);

    let err = run_add(&config, &args, 1).await.unwrap_err();
    assert!(err.to_string().contains("STOREFRONT_SHOP_URL"), "got: {err}");
}
