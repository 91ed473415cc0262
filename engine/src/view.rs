//! View configuration.
//!
//! A [`ViewConfig`] is everything that differs between two admin list
//! views: which fields the search box looks at, which columns exist and how
//! they sort, which dropdown filters are offered, the add/edit form schema
//! and the CSV export columns.

use crate::{CollectionSchema, FieldName, FieldType, ViewName, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    /// Row field the column reads
    pub key: FieldName,
    /// Header text (also the CSV header)
    pub label: String,
    /// Decides how the column sorts and exports
    pub field_type: FieldType,
}

impl ColumnDef {
    pub fn new(key: impl Into<FieldName>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
        }
    }
}

/// One choice of a dropdown filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A dropdown / multi-select filter over one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDef {
    pub field: FieldName,
    pub label: String,
    pub options: Vec<FilterOption>,
}

impl FilterDef {
    pub fn new(
        field: impl Into<FieldName>,
        label: impl Into<String>,
        options: Vec<FilterOption>,
    ) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            options,
        }
    }
}

/// Configuration of one admin list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    /// Collection name, e.g. `demands`
    pub name: ViewName,
    /// Route the view is mounted at, e.g. `/demands`
    pub route: String,
    /// Singular noun used in notifications, e.g. `Demand`
    pub item_label: String,
    /// Fields the free-text search looks at
    pub searchable: Vec<FieldName>,
    /// Table columns, in display order
    pub columns: Vec<ColumnDef>,
    /// Dropdown filters offered by the filter drawer
    pub filters: Vec<FilterDef>,
    /// Page size on mount
    pub default_page_size: usize,
    /// Field written by status changes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_field: Option<FieldName>,
    /// Add/edit form schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<CollectionSchema>,
    /// Column keys exported to CSV; empty means every column
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub export_columns: Vec<FieldName>,
}

impl ViewConfig {
    pub fn new(name: impl Into<ViewName>, route: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            route: route.into(),
            item_label: "Item".to_string(),
            searchable: Vec::new(),
            columns: Vec::new(),
            filters: Vec::new(),
            default_page_size: DEFAULT_PAGE_SIZE,
            status_field: None,
            form: None,
            export_columns: Vec::new(),
        }
    }

    pub fn item_label(mut self, label: impl Into<String>) -> Self {
        self.item_label = label.into();
        self
    }

    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldName>,
    {
        self.searchable = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn filter(mut self, filter: FilterDef) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size.max(1);
        self
    }

    pub fn status_field(mut self, field: impl Into<FieldName>) -> Self {
        self.status_field = Some(field.into());
        self
    }

    pub fn form(mut self, schema: CollectionSchema) -> Self {
        self.form = Some(schema);
        self
    }

    pub fn export<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldName>,
    {
        self.export_columns = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Look up a column by key.
    pub fn column_def(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Look up a filter by field.
    pub fn filter_def(&self, field: &str) -> Option<&FilterDef> {
        self.filters.iter().find(|f| f.field == field)
    }

    /// Columns written by CSV export, in export order.
    ///
    /// Unknown keys in `export_columns` are skipped.
    pub fn csv_columns(&self) -> Vec<&ColumnDef> {
        if self.export_columns.is_empty() {
            return self.columns.iter().collect();
        }
        self.export_columns
            .iter()
            .filter_map(|key| self.column_def(key))
            .collect()
    }
}
