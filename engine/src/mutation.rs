//! Mutations and their lifecycle.
//!
//! Changes to a collection are expressed as [`Mutation`]s. Each kind moves
//! through `idle → submitting → succeeded | failed`, and at most one
//! mutation may be in flight per view.

use crate::{error::Result, Error, Row, RowId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kinds of mutation a list view offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    Add,
    Edit,
    Delete,
    BulkDelete,
    StatusChange,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Add => write!(f, "add"),
            MutationKind::Edit => write!(f, "edit"),
            MutationKind::Delete => write!(f, "delete"),
            MutationKind::BulkDelete => write!(f, "bulk delete"),
            MutationKind::StatusChange => write!(f, "status change"),
        }
    }
}

/// A change to a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<R> {
    Add(R),
    Edit(R),
    Delete(RowId),
    BulkDelete(Vec<RowId>),
    StatusChange { id: RowId, status: String },
}

impl<R: Row> Mutation<R> {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Add(_) => MutationKind::Add,
            Mutation::Edit(_) => MutationKind::Edit,
            Mutation::Delete(_) => MutationKind::Delete,
            Mutation::BulkDelete(_) => MutationKind::BulkDelete,
            Mutation::StatusChange { .. } => MutationKind::StatusChange,
        }
    }

    /// Ids this mutation removes from the collection.
    pub fn removed_ids(&self) -> &[RowId] {
        match self {
            Mutation::Delete(id) => std::slice::from_ref(id),
            Mutation::BulkDelete(ids) => ids,
            _ => &[],
        }
    }

    /// Success notification text, e.g. `Designation deleted successfully`.
    pub fn success_message(&self, item_label: &str) -> String {
        match self {
            Mutation::Add(_) => format!("{} added successfully", item_label),
            Mutation::Edit(_) => format!("{} updated successfully", item_label),
            Mutation::Delete(_) => format!("{} deleted successfully", item_label),
            Mutation::BulkDelete(ids) => {
                format!("{} {}(s) deleted successfully", ids.len(), item_label.to_lowercase())
            }
            Mutation::StatusChange { status, .. } => {
                format!("{} status changed to {}", item_label, status)
            }
        }
    }
}

/// Lifecycle state of one mutation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "camelCase")]
pub enum MutationState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Tracks mutation states and the single in-flight slot of a view.
#[derive(Debug, Clone, Default)]
pub struct MutationTracker {
    states: HashMap<MutationKind, MutationState>,
    in_flight: Option<MutationKind>,
}

impl MutationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `submitting`. Fails while another mutation is in flight.
    pub fn begin(&mut self, kind: MutationKind) -> Result<()> {
        if let Some(current) = self.in_flight {
            return Err(Error::MutationInFlight(current));
        }
        self.in_flight = Some(kind);
        self.states.insert(kind, MutationState::Submitting);
        Ok(())
    }

    pub fn succeed(&mut self, kind: MutationKind) {
        self.finish(kind, MutationState::Succeeded);
    }

    pub fn fail(&mut self, kind: MutationKind, message: impl Into<String>) {
        self.finish(kind, MutationState::Failed(message.into()));
    }

    fn finish(&mut self, kind: MutationKind, state: MutationState) {
        if self.in_flight == Some(kind) {
            self.in_flight = None;
        }
        self.states.insert(kind, state);
    }

    /// Current state of a kind; kinds never submitted are idle.
    pub fn state(&self, kind: MutationKind) -> MutationState {
        self.states.get(&kind).cloned().unwrap_or_default()
    }

    pub fn in_flight(&self) -> Option<MutationKind> {
        self.in_flight
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }
}
