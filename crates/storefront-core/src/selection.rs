//! Option State Store: the shopper's current, possibly partial, choice of one
//! value per option position.
//!
//! Positions are bounded by the product's option count, so a complete
//! selection always covers positions `1..=N` without gaps. Selections only
//! ever replace an earlier value; nothing reverts a position to unset.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::product::OptionPosition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    option_count: usize,
    values: BTreeMap<OptionPosition, String>,
}

impl SelectionState {
    #[must_use]
    pub fn new(option_count: usize) -> Self {
        Self {
            option_count,
            values: BTreeMap::new(),
        }
    }

    /// Sets the value for `position`, overwriting any earlier value.
    ///
    /// Returns the value it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PositionOutOfRange`] when `position` exceeds the
    /// option count; the state is left unchanged.
    pub fn set_selection(
        &mut self,
        position: OptionPosition,
        value: impl Into<String>,
    ) -> Result<Option<String>, CoreError> {
        if position.get() > self.option_count {
            return Err(CoreError::PositionOutOfRange {
                position: position.get(),
                option_count: self.option_count,
            });
        }
        Ok(self.values.insert(position, value.into()))
    }

    #[must_use]
    pub fn selection_count(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.option_count
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.selection_count() >= self.option_count
    }

    #[must_use]
    pub fn value(&self, position: OptionPosition) -> Option<&str> {
        self.values.get(&position).map(String::as_str)
    }

    /// Selected values in position order, or `None` while incomplete.
    #[must_use]
    pub fn tuple(&self) -> Option<Vec<&str>> {
        if !self.is_complete() {
            return None;
        }
        (0..self.option_count)
            .map(|idx| self.value(OptionPosition::from_index(idx)))
            .collect()
    }
}
