//! Extraction of the widget's inputs from a rendered product page.

use regex::Regex;

use crate::error::CoreError;

/// Returns the JSON text of the `<script id="product-json">` element.
///
/// # Errors
///
/// Returns [`CoreError::MissingEmbeddedProduct`] if the page has no such
/// element or the element is empty.
pub fn extract_product_json(html: &str) -> Result<&str, CoreError> {
    let script_re =
        Regex::new(r#"(?is)<script\b[^>]*\sid\s*=\s*["']product-json["'][^>]*>(.*?)</script>"#)
            .expect("valid regex");

    let content = script_re
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(|| CoreError::MissingEmbeddedProduct {
            reason: "no <script id=\"product-json\"> element".to_owned(),
        })?;

    if content.is_empty() {
        return Err(CoreError::MissingEmbeddedProduct {
            reason: "<script id=\"product-json\"> element is empty".to_owned(),
        });
    }
    Ok(content)
}

/// Reads `data-currency` from the first `.product-form-wrapper` container.
///
/// Returns `None` when the container or the attribute is absent.
#[must_use]
pub fn extract_currency(html: &str) -> Option<String> {
    let container_re = Regex::new(
        r#"(?is)<[a-z][a-z0-9-]*\b[^>]*\sclass\s*=\s*["'][^"']*\bproduct-form-wrapper\b[^"']*["'][^>]*>"#,
    )
    .expect("valid regex");
    let currency_re =
        Regex::new(r#"(?i)\sdata-currency\s*=\s*["']([^"']*)["']"#).expect("valid regex");

    let tag = container_re.find(html)?.as_str();
    currency_re
        .captures(tag)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|s| !s.is_empty())
}
