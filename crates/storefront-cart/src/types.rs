//! Response types for the storefront's `POST /cart/add.js` endpoint.
//!
//! ## Observed shape
//!
//! ### Success (HTTP 200)
//! The added line item as a JSON object (`id`, `variant_id`, `quantity`,
//! `title`, ...). When the request carried `sections=<ids>`, a `sections`
//! object maps each requested region id to its re-rendered HTML, or `null`
//! when the theme could not render that section.
//!
//! ### Business rejection (HTTP 422)
//! `{"status": 422, "message": "Cart Error", "description": "..."}`. The
//! response status is not an error at the transport level; the truthy
//! `status` field in the body is what marks the rejection. Bodies are
//! classified the same way whatever the HTTP status.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Re-rendered HTML fragments keyed by region id, handed to the cart preview.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionsPayload {
    #[serde(default)]
    pub sections: BTreeMap<String, Option<String>>,
}

/// Summary of the line item the cart service reports as added.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct AddedItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub variant_id: Option<i64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

/// A business-level refusal, e.g. insufficient inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartRejection {
    pub status: Value,
    pub message: Option<String>,
    pub description: Option<String>,
}

impl CartRejection {
    /// Reads a rejection body without failing on unexpected field types.
    ///
    /// Non-string `message` / `description` values (e.g. a per-field error
    /// map) are kept as their JSON text.
    fn from_body(status: Value, body: &Value) -> Self {
        Self {
            status,
            message: body.get("message").and_then(text_field),
            description: body.get("description").and_then(text_field),
        }
    }
}

fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartAddResult {
    Added {
        item: AddedItem,
        sections: SectionsPayload,
    },
    Rejected(CartRejection),
}

impl CartAddResult {
    /// Classifies a parsed response body.
    ///
    /// # Errors
    ///
    /// Returns the serde error if a success body carries a `sections` value
    /// that is not a map of strings/nulls. A truthy `status` is always a
    /// rejection, whatever the other fields hold.
    pub fn from_body(body: Value) -> Result<Self, serde_json::Error> {
        if let Some(status) = body.get("status").filter(|s| is_truthy(s)) {
            return Ok(Self::Rejected(CartRejection::from_body(status.clone(), &body)));
        }

        let sections: SectionsPayload = serde_json::from_value(body.clone())?;
        let item: AddedItem = serde_json::from_value(body).unwrap_or_default();
        Ok(Self::Added { item, sections })
    }
}

/// Truthiness as the storefront script sees it: `null`, `false`, `0` and `""`
/// are falsy, everything else (including empty arrays/objects) is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
