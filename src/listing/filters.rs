use std::collections::BTreeSet;

use crate::api::types::{FilterCriteria, FilterField};

/// Sole holder of the current [`FilterCriteria`].
///
/// Edits never mutate the held value in place: each one builds a new
/// criteria and swaps it in.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    current: FilterCriteria,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

impl FilterState {
    pub fn new(initial: FilterCriteria) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> &FilterCriteria {
        &self.current
    }

    /// Apply a set of field edits and return the resulting criteria
    pub fn update<I>(&mut self, changes: I) -> &FilterCriteria
    where
        I: IntoIterator<Item = FilterField>,
    {
        let mut next = self.current.clone();
        for change in changes {
            change.apply(&mut next);
        }
        self.current = next;
        &self.current
    }

    /// Back to `{page_size: 20}`
    pub fn reset(&mut self) -> &FilterCriteria {
        self.current = FilterCriteria::default();
        &self.current
    }

    /// Edit that adds the amenity if absent and removes it otherwise.
    ///
    /// The joined list is rebuilt from the toggled set; an empty set clears
    /// the field.
    pub fn amenity_toggle(&self, amenity: &str) -> FilterField {
        let mut selected = self.current.selected_amenities();
        if let Some(pos) = selected.iter().position(|a| a == amenity) {
            selected.remove(pos);
        } else {
            selected.push(amenity.to_string());
        }

        // Drop duplicates a hand-typed list may carry
        let mut seen = BTreeSet::new();
        selected.retain(|a| seen.insert(a.clone()));

        if selected.is_empty() {
            FilterField::Amenities(None)
        } else {
            FilterField::Amenities(Some(selected.join(",")))
        }
    }

    pub fn toggle_amenity(&mut self, amenity: &str) -> &FilterCriteria {
        let change = self.amenity_toggle(amenity);
        self.update([change])
    }
}
