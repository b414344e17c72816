use serde::Serialize;

use super::record::Record;

/// Rows of `metadata/data-availability` for one geography.
///
/// Used to skip subcategories that have no data for the geography.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AvailabilityIndex(Vec<Record>);

impl AvailabilityIndex {
    pub fn new(entries: Vec<Record>) -> Self {
        Self(entries)
    }

    pub fn contains_subcategory(&self, subcategory: &str) -> bool {
        self.0
            .iter()
            .any(|entry| entry.str_field("subcategory") == Some(subcategory))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Record>> for AvailabilityIndex {
    fn from(entries: Vec<Record>) -> Self {
        Self(entries)
    }
}
