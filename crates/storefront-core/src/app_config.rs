use crate::money::CurrencyCode;
use crate::ConfigError;

/// Environment variable naming the storefront.
pub const SHOP_URL_VAR: &str = "STOREFRONT_SHOP_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Storefront the widget talks to, e.g. `https://shop.example.com`.
    /// Only needed for commands that reach the network.
    pub shop_url: Option<String>,
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Region id of the cart preview rendered alongside a cart add.
    pub cart_section: String,
    /// Used when the widget container carries no (or an invalid) currency.
    pub fallback_currency: CurrencyCode,
}

impl AppConfig {
    /// The configured shop URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `STOREFRONT_SHOP_URL` is
    /// unset or blank.
    pub fn require_shop_url(&self) -> Result<&str, ConfigError> {
        self.shop_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(SHOP_URL_VAR.to_string()))
    }
}
