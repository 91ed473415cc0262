//! Structured filter criteria.
//!
//! Criteria map a field to the set of option values picked in a dropdown.
//! A row passes when, for every restricted field, its value is one of the
//! picked options.

use crate::{value, FieldName, FilterOption, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Prefix of filter parameters in URL-style queries (`filter.status=approved`).
pub const FILTER_PARAM_PREFIX: &str = "filter.";

type FieldSets = BTreeMap<FieldName, BTreeSet<String>>;

/// Selected filter values per field. Empty sets are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldSets", into = "FieldSets")]
pub struct FilterCriteria {
    fields: FieldSets,
}

impl From<FieldSets> for FilterCriteria {
    fn from(fields: FieldSets) -> Self {
        let mut criteria = Self::new();
        for (field, values) in fields {
            criteria.set(field, values);
        }
        criteria
    }
}

impl From<FilterCriteria> for FieldSets {
    fn from(criteria: FilterCriteria) -> Self {
        criteria.fields
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection for one field. An empty selection lifts the
    /// restriction.
    pub fn set<I, S>(&mut self, field: impl Into<FieldName>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = field.into();
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, values);
        }
    }

    /// Replace the selection for one field from picked dropdown options.
    pub fn set_options(&mut self, field: impl Into<FieldName>, options: &[FilterOption]) {
        self.set(field, options.iter().map(|o| o.value.clone()));
    }

    /// Builder-style [`FilterCriteria::set`].
    pub fn with<I, S>(mut self, field: impl Into<FieldName>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(field, values);
        self
    }

    pub fn clear_field(&mut self, field: &str) {
        self.fields.remove(field);
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Selected values for a field.
    pub fn get(&self, field: &str) -> Option<&BTreeSet<String>> {
        self.fields.get(field)
    }

    /// Restricted fields with their selected values.
    pub fn active(&self) -> impl Iterator<Item = (&FieldName, &BTreeSet<String>)> {
        self.fields.iter()
    }

    /// Whether a row passes every restricted field.
    ///
    /// Values are compared as text; array-valued fields pass when any
    /// element is selected. Missing and null values never pass.
    pub fn matches<R: Row>(&self, row: &R) -> bool {
        self.fields.iter().all(|(field, selected)| match row.field(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(value::to_text)
                .any(|text| selected.contains(&text)),
            Some(v) => value::to_text(&v).is_some_and(|text| selected.contains(&text)),
            None => false,
        })
    }

    /// Read `filter.<field>=<value>` parameters.
    ///
    /// Each parameter carries one value, taken whole, so option values may
    /// contain commas. Repeat the parameter to select several values.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut fields = FieldSets::new();
        for (key, raw) in params {
            let Some(field) = key.strip_prefix(FILTER_PARAM_PREFIX) else {
                continue;
            };
            let value = raw.trim();
            if field.is_empty() || value.is_empty() {
                continue;
            }
            fields
                .entry(field.to_string())
                .or_default()
                .insert(value.to_string());
        }
        Self { fields }
    }
}
