//! Browser address bar abstraction.

use std::sync::{Mutex, MutexGuard, PoisonError};

use url::Url;

/// Query parameter carrying the resolved variant id.
pub const VARIANT_PARAM: &str = "variant";

/// The page URL and its session history.
pub trait AddressBar: Send + Sync {
    fn current_url(&self) -> Url;

    /// Replaces the current history entry without navigating.
    fn replace_url(&self, url: Url);
}

/// Sets `variant=<id>` on the current URL through a history replacement.
///
/// Like `URLSearchParams.set`: the first existing `variant` pair is updated in
/// place, later duplicates are dropped, and the pair is appended when absent.
/// Other query parameters are kept.
pub fn replace_variant_param(address_bar: &dyn AddressBar, variant_id: i64) {
    let mut url = address_bar.current_url();
    let id = variant_id.to_string();

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let mut replaced = false;
    pairs.retain_mut(|(key, value)| {
        if key != VARIANT_PARAM {
            return true;
        }
        if replaced {
            return false;
        }
        value.clone_from(&id);
        replaced = true;
        true
    });
    if !replaced {
        pairs.push((VARIANT_PARAM.to_owned(), id));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
    tracing::debug!(url = %url, "replacing history entry");
    address_bar.replace_url(url);
}

/// In-memory address bar, for headless runs and tests.
///
/// Only replacements are modelled; the widget never adds history entries.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: Mutex<HistoryState>,
}

#[derive(Debug)]
struct HistoryState {
    current: Url,
    replacements: usize,
}

impl MemoryHistory {
    #[must_use]
    pub fn new(initial: Url) -> Self {
        Self {
            inner: Mutex::new(HistoryState {
                current: initial,
                replacements: 0,
            }),
        }
    }

    /// Parses `initial` and starts a history at it.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] if `initial` is not an absolute URL.
    pub fn parse(initial: &str) -> Result<Self, url::ParseError> {
        Url::parse(initial).map(Self::new)
    }

    /// Number of in-place URL replacements so far.
    #[must_use]
    pub fn replacements(&self) -> usize {
        self.lock().replacements
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AddressBar for MemoryHistory {
    fn current_url(&self) -> Url {
        self.lock().current.clone()
    }

    fn replace_url(&self, url: Url) {
        let mut state = self.lock();
        state.replacements += 1;
        state.current = url;
    }
}
