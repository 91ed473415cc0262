//! Row selection across pages.
//!
//! The selection is keyed by row id, so it survives page navigation and
//! re-sorting. "Select all" acts on the visible page only.

use crate::{Row, RowId};
use std::collections::BTreeMap;

/// State of the header checkbox for the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    None,
    Some,
    All,
}

/// Selected rows by id.
#[derive(Debug, Clone)]
pub struct Selection<R> {
    rows: BTreeMap<RowId, R>,
}

impl<R> Default for Selection<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<R: Row> Selection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select or deselect one row.
    pub fn toggle_row(&mut self, checked: bool, row: &R) {
        if checked {
            self.rows.insert(row.id(), row.clone());
        } else {
            self.rows.remove(&row.id());
        }
    }

    /// Select or deselect every visible row.
    ///
    /// Checking adds the visible rows to the selection; unchecking removes
    /// exactly the visible rows and keeps selections made on other pages.
    pub fn toggle_all_on_page(&mut self, checked: bool, visible: &[&R]) {
        for row in visible {
            self.toggle_row(checked, row);
        }
    }

    /// Header checkbox state for the visible rows.
    pub fn page_state(&self, visible: &[&R]) -> PageSelection {
        let selected = visible
            .iter()
            .filter(|row| self.rows.contains_key(&row.id()))
            .count();
        match selected {
            0 => PageSelection::None,
            n if n == visible.len() => PageSelection::All,
            _ => PageSelection::Some,
        }
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.rows.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Selected ids in id order.
    pub fn ids(&self) -> Vec<RowId> {
        self.rows.keys().cloned().collect()
    }

    /// Selected rows in id order.
    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Drop the given ids from the selection.
    pub fn prune(&mut self, ids: &[RowId]) {
        for id in ids {
            self.rows.remove(id);
        }
    }

    /// Reconcile against the full dataset: ids that no longer exist are
    /// dropped and stale copies are replaced by the current rows.
    ///
    /// Returns the number of dropped ids.
    pub fn reconcile(&mut self, all: &[R]) -> usize {
        let before = self.rows.len();
        let mut current = BTreeMap::new();
        for row in all {
            let id = row.id();
            if self.rows.contains_key(&id) {
                current.insert(id, row.clone());
            }
        }
        self.rows = current;
        before - self.rows.len()
    }
}
