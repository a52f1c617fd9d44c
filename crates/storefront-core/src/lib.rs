pub mod app_config;
pub mod config;
pub mod embedded;
pub mod error;
pub mod money;
pub mod product;
pub mod resolver;
pub mod selection;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use embedded::{extract_currency, extract_product_json};
pub use error::{ConfigError, CoreError};
pub use money::{CurrencyCode, Money};
pub use product::{OptionPosition, Product, ProductOption, Variant};
pub use resolver::{resolve, Resolution};
pub use selection::SelectionState;
