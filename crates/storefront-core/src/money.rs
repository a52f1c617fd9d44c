//! Integer minor-unit prices and `en-US` currency formatting.
//!
//! Storefront documents carry prices as integers in the currency's minor unit
//! (`1250` is `$12.50`). Prices stay integral everywhere; the only conversion
//! to a major-unit amount happens while rendering text for a label.
//!
//! Formatting mirrors what a browser's `Intl.NumberFormat("en-US", { style:
//! "currency" })` prints for the same amount:
//!
//! | minor units | currency | text          |
//! |-------------|----------|---------------|
//! | `1200`      | `USD`    | `$12.00`      |
//! | `123456789` | `EUR`    | `€1,234,567.89` |
//! | `1250`      | `JPY`    | `¥13`         |
//! | `999`       | `CHF`    | `CHF 9.99`    |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An amount in minor currency units (cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Renders the amount as `en-US` currency text for `currency`.
    ///
    /// The amount is interpreted as `minor / 100` regardless of currency; for
    /// zero-decimal currencies the major amount is rounded half away from zero.
    #[must_use]
    pub fn format(self, currency: &CurrencyCode) -> String {
        let style = CurrencyStyle::for_code(currency.as_str());
        let magnitude = self.0.unsigned_abs();

        let (major, minor) = if style.fraction_digits == 0 {
            (magnitude.saturating_add(50) / 100, None)
        } else {
            (magnitude / 100, Some(magnitude % 100))
        };

        let mut out = String::new();
        if self.0 < 0 {
            out.push('-');
        }
        match style.symbol {
            Some(symbol) => out.push_str(symbol),
            None => {
                out.push_str(currency.as_str());
                out.push('\u{a0}');
            }
        }
        out.push_str(&group_thousands(major));
        if let Some(minor) = minor {
            out.push_str(&format!(".{minor:02}"));
        }
        out
    }
}

/// ISO 4217 currency code, always three upper-case ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses a currency code, normalizing to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCurrency`] unless `raw` (trimmed) is
    /// exactly three ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidCurrency(raw.to_owned()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn usd() -> Self {
        Self("USD".to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::usd()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct CurrencyStyle {
    symbol: Option<&'static str>,
    fraction_digits: u32,
}

impl CurrencyStyle {
    fn for_code(code: &str) -> Self {
        let symbol = match code {
            "USD" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            "JPY" => Some("¥"),
            "CAD" => Some("CA$"),
            "AUD" => Some("A$"),
            "NZD" => Some("NZ$"),
            "HKD" => Some("HK$"),
            "MXN" => Some("MX$"),
            "BRL" => Some("R$"),
            "TWD" => Some("NT$"),
            "CNY" => Some("CN¥"),
            "INR" => Some("₹"),
            "KRW" => Some("₩"),
            "ILS" => Some("₪"),
            "VND" => Some("₫"),
            "PHP" => Some("₱"),
            _ => None,
        };
        let fraction_digits = match code {
            "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "PYG" => 0,
            _ => 2,
        };
        Self {
            symbol,
            fraction_digits,
        }
    }
}

/// Inserts `,` between every group of three digits.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
