//! HTTP client for a storefront's public AJAX endpoints.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::CartError;
use crate::types::CartAddResult;

pub(crate) const CART_ADD_PATH: &str = "/cart/add.js";

/// Marks a request as asynchronous so the storefront answers with JSON
/// instead of redirecting to the cart page.
pub(crate) const AJAX_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// HTTP client for one storefront.
///
/// Endpoint URLs are built from the store's origin, so a configured shop URL
/// that points at a collection or product page still reaches the store root.
/// No request is retried.
pub struct StorefrontClient {
    client: Client,
    origin: Url,
}

impl StorefrontClient {
    /// Creates a `StorefrontClient` with configured timeout and `User-Agent`.
    ///
    /// A `timeout_secs` of `0` disables the request timeout.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidShopUrl`] if no origin can be parsed from `shop_url`.
    /// - [`CartError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(shop_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CartError> {
        let origin = Self::origin_url(shop_url)?;

        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent);
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }

        Ok(Self {
            client: builder.build()?,
            origin,
        })
    }

    #[must_use]
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Adds an item to the cart with a form-encoded `POST /cart/add.js`.
    ///
    /// The body is classified whatever the HTTP status: a truthy `status`
    /// field yields [`CartAddResult::Rejected`], anything else
    /// [`CartAddResult::Added`].
    ///
    /// # Errors
    ///
    /// - [`CartError::Http`] on network, TLS or timeout failure.
    /// - [`CartError::Deserialize`] if the body is not a recognizable JSON response.
    pub async fn add_to_cart(
        &self,
        fields: &[(String, String)],
    ) -> Result<CartAddResult, CartError> {
        let url = self.endpoint(CART_ADD_PATH)?;
        tracing::debug!(url = %url, fields = fields.len(), "posting cart add");

        let response = self
            .client
            .post(url.clone())
            .header(AJAX_HEADER.0, AJAX_HEADER.1)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(fields)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let context = || format!("cart add response ({status}) from {url}");

        let value = serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
            CartError::Deserialize {
                context: context(),
                source: e,
            }
        })?;
        CartAddResult::from_body(value).map_err(|e| CartError::Deserialize {
            context: context(),
            source: e,
        })
    }

    /// Fetches a storefront page (e.g. `/products/field-jacket`) as HTML.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`] for HTTP 404.
    /// - [`CartError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`CartError::Http`] on network, TLS or timeout failure.
    pub async fn fetch_page(&self, path: &str) -> Result<String, CartError> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CartError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CartError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// Resolves `path` (and any query it carries) against the store origin.
    fn endpoint(&self, path: &str) -> Result<Url, CartError> {
        self.origin
            .join(path)
            .map_err(|e| CartError::InvalidShopUrl {
                shop_url: self.origin.to_string(),
                reason: format!("cannot join path \"{path}\": {e}"),
            })
    }

    /// Reduces `shop_url` to its scheme and host, as a base URL ending in `/`.
    ///
    /// Storefront endpoints live at the store root, whatever path the
    /// configured shop URL carries.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidShopUrl`] if `shop_url` is not an absolute
    /// URL with a host.
    fn origin_url(shop_url: &str) -> Result<Url, CartError> {
        let invalid = |reason: String| CartError::InvalidShopUrl {
            shop_url: shop_url.to_owned(),
            reason,
        };

        let parsed = Url::parse(shop_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if parsed.host_str().is_none() {
            return Err(invalid("URL has no host".to_owned()));
        }
        let origin = parsed.origin().ascii_serialization();
        Url::parse(&format!("{origin}/"))
            .map_err(|e| invalid(format!("origin \"{origin}\" is not a valid URL base: {e}")))
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
