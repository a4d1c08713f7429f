use std::collections::BTreeMap;

use super::model::{Record, discover_fields};

// ---------------------------------------------------------------------------
// Filter predicate: a substring constraint per field
// ---------------------------------------------------------------------------

/// Per-field constraints: field name → needle.
/// An absent field or an empty needle means "no filter" (match all).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    constraints: BTreeMap<String, String>,
}

/// Fields the record explorer exposes as text inputs.
pub const EXPLORER_FIELDS: [&str; 3] = ["pays", "maladie", "date"];

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria over the explorer's fields, all empty.
    pub fn explorer_default() -> Self {
        let mut criteria = Self::new();
        for field in EXPLORER_FIELDS {
            criteria.set(field, "");
        }
        criteria
    }

    pub fn set(&mut self, field: impl Into<String>, needle: impl Into<String>) {
        self.constraints.insert(field.into(), needle.into());
    }

    /// Builder-style [`FilterCriteria::set`].
    pub fn with(mut self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.set(field, needle);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.constraints.get(field).map(String::as_str)
    }

    pub fn clear(&mut self) {
        for needle in self.constraints.values_mut() {
            needle.clear();
        }
    }

    /// True when no constraint would exclude anything.
    pub fn is_empty(&self) -> bool {
        self.constraints.values().all(String::is_empty)
    }

    /// The non-empty constraints only.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.constraints
            .iter()
            .filter(|(_, needle)| !needle.is_empty())
            .map(|(field, needle)| (field.as_str(), needle.as_str()))
    }

    /// Drop constraints on fields outside `fields`. Unknown fields are
    /// ignored rather than treated as errors.
    pub fn restricted_to(&self, fields: &[String]) -> FilterCriteria {
        let constraints = self
            .constraints
            .iter()
            .filter(|(field, _)| fields.contains(*field))
            .map(|(field, needle)| (field.clone(), needle.clone()))
            .collect();
        FilterCriteria { constraints }
    }

    /// Whether `record` passes every active constraint.
    ///
    /// A record passes a constraint when its value for the field, in natural
    /// string form, contains the needle (case-sensitive). A missing or null
    /// field fails the constraint.
    pub fn matches(&self, record: &Record) -> bool {
        self.active().all(|(field, needle)| {
            record
                .get(field)
                .and_then(|value| value.as_text())
                .is_some_and(|text| text.contains(needle))
        })
    }
}

/// Return the records passing all active constraints, in input order.
///
/// Constraints only apply to fields of the collection (as discovered from the
/// first record).
pub fn apply_filter(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    let effective = criteria.restricted_to(&discover_fields(records));
    if effective.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| effective.matches(record))
        .cloned()
        .collect()
}
