//! Query state: pagination, sort and search text.
//!
//! The state is replaced on every interaction through a [`QueryPatch`].
//! Anything that can change the size of the result set (search text, sort,
//! page size) sends the view back to page 1.

use crate::FieldName;
use serde::{Deserialize, Serialize};

/// Page size used when a view does not choose one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse `asc` / `desc`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Sort key and direction. Sorting applies only when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub key: Option<FieldName>,
    pub order: Option<SortOrder>,
}

impl Sort {
    pub fn new(key: impl Into<FieldName>, order: SortOrder) -> Self {
        Self {
            key: Some(key.into()),
            order: Some(order),
        }
    }

    /// Whether the sort stage will run.
    pub fn is_active(&self) -> bool {
        self.key.is_some() && self.order.is_some()
    }

    /// The sort after clicking the header of column `key`.
    ///
    /// A new column starts ascending; the same column cycles
    /// ascending → descending → unsorted.
    pub fn toggled(&self, key: &str) -> Sort {
        match (self.key.as_deref(), self.order) {
            (Some(k), Some(SortOrder::Asc)) if k == key => Sort::new(key, SortOrder::Desc),
            (Some(k), Some(SortOrder::Desc)) if k == key => Sort::default(),
            _ => Sort::new(key, SortOrder::Asc),
        }
    }
}

/// Pagination, sort and search text of a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    /// 1-based page number
    pub page_index: usize,
    /// Rows per page, at least 1
    pub page_size: usize,
    pub sort: Sort,
    /// Free-text search
    pub query: String,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// What a [`QueryState::set_query`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryChange {
    /// The page index was forced back to 1
    pub page_reset: bool,
    pub page_size_changed: bool,
}

impl QueryState {
    /// Initial state on mount: page 1, no sort, empty search.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 1,
            page_size: page_size.max(1),
            sort: Sort::default(),
            query: String::new(),
        }
    }

    /// Merge a partial update.
    ///
    /// Any field other than the page index resets the page index to 1,
    /// even when the patch also carries a page index.
    pub fn set_query(&mut self, patch: QueryPatch) -> QueryChange {
        let mut change = QueryChange::default();

        if let Some(page_index) = patch.page_index {
            self.page_index = page_index.max(1);
        }

        let resets = patch.page_size.is_some() || patch.sort.is_some() || patch.query.is_some();

        if let Some(page_size) = patch.page_size {
            let page_size = page_size.max(1);
            change.page_size_changed = page_size != self.page_size;
            self.page_size = page_size;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        if let Some(query) = patch.query {
            self.query = query;
        }

        if resets {
            change.page_reset = self.page_index != 1;
            self.page_index = 1;
        }

        change
    }

    /// Go back to page 1 (used when filter criteria change).
    pub fn reset_page(&mut self) {
        self.page_index = 1;
    }

    /// Index of the first row of the current page.
    pub fn offset(&self) -> usize {
        (self.page_index.max(1) - 1).saturating_mul(self.page_size)
    }

    /// Build a state from URL-style parameters.
    ///
    /// Recognized keys: `pageIndex`, `pageSize`, `sortKey`, `sortOrder`,
    /// `query` (or `q`). Unparseable numbers and unknown keys are ignored.
    pub fn from_params<'a, I>(params: I, default_page_size: usize) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut state = QueryState::new(default_page_size);
        for (key, value) in params {
            match key {
                "pageIndex" => {
                    if let Ok(n) = value.trim().parse::<usize>() {
                        state.page_index = n.max(1);
                    }
                }
                "pageSize" => {
                    if let Ok(n) = value.trim().parse::<usize>() {
                        state.page_size = n.max(1);
                    }
                }
                "sortKey" if !value.is_empty() => state.sort.key = Some(value.to_string()),
                "sortOrder" => state.sort.order = SortOrder::parse(value),
                "query" | "q" => state.query = value.to_string(),
                _ => {}
            }
        }
        state
    }
}

/// A partial update to a [`QueryState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
    pub page_index: Option<usize>,
    pub page_size: Option<usize>,
    pub sort: Option<Sort>,
    pub query: Option<String>,
}

impl QueryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page_index: usize) -> Self {
        self.page_index = Some(page_index);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.page_index.is_none()
            && self.page_size.is_none()
            && self.sort.is_none()
            && self.query.is_none()
    }
}
