//! The list-view controller.
//!
//! One controller backs one admin view. It owns the data source, the query
//! state, the filter criteria, the selection, the drawer and the mutation
//! lifecycle, and derives the visible page on demand through
//! [`pipeline::run`].
//!
//! Local views (mock data) apply mutations to their own rows. Remote views
//! send the mutation to a [`Backend`], wait for the answer, and re-fetch the
//! canonical collection on success; on failure nothing local changes.

use crate::{
    error::Result, pipeline, Backend, Collection, Error, FilterCriteria, ListResult, Mutation,
    MutationKind, MutationState, MutationTracker, Notification, PageSelection, QueryChange,
    QueryPatch, QueryState, Row, RowId, Selection, ViewConfig,
};

/// Which form drawer is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Drawer {
    #[default]
    Closed,
    Add,
    Edit(RowId),
}

enum Source<R: Row> {
    Local,
    Remote(Box<dyn Backend<R>>),
}

/// Controller of one admin list view.
pub struct ListController<R: Row> {
    view: ViewConfig,
    rows: Collection<R>,
    source: Source<R>,
    query: QueryState,
    filters: FilterCriteria,
    selection: Selection<R>,
    mutations: MutationTracker,
    drawer: Drawer,
    notifications: Vec<Notification>,
}

impl<R: Row> ListController<R> {
    fn with_source(view: ViewConfig, rows: Collection<R>, source: Source<R>) -> Self {
        let query = QueryState::new(view.default_page_size);
        Self {
            view,
            rows,
            source,
            query,
            filters: FilterCriteria::new(),
            selection: Selection::new(),
            mutations: MutationTracker::new(),
            drawer: Drawer::Closed,
            notifications: Vec::new(),
        }
    }

    /// A view over a local array.
    pub fn local(view: ViewConfig, rows: Vec<R>) -> Self {
        Self::with_source(view, Collection::from_rows(rows), Source::Local)
    }

    /// A view over a remote collection, fetched once on creation.
    ///
    /// A failed initial fetch leaves the view empty with an error
    /// notification queued.
    pub fn remote(view: ViewConfig, backend: impl Backend<R> + 'static) -> Self {
        let mut controller =
            Self::with_source(view, Collection::new(), Source::Remote(Box::new(backend)));
        if let Err(err) = controller.refresh() {
            tracing::warn!(view = %controller.view.name, error = %err, "initial fetch failed");
        }
        controller
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.source, Source::Remote(_))
    }

    /// The full, unfiltered data source.
    pub fn rows(&self) -> &[R] {
        self.rows.rows()
    }

    pub fn row(&self, id: &RowId) -> Option<&R> {
        self.rows.get(id)
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn selection(&self) -> &Selection<R> {
        &self.selection
    }

    pub fn drawer(&self) -> &Drawer {
        &self.drawer
    }

    pub fn mutation_state(&self, kind: MutationKind) -> MutationState {
        self.mutations.state(kind)
    }

    pub fn is_submitting(&self) -> bool {
        self.mutations.is_submitting()
    }

    /// Queued notifications, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Hand the queued notifications to the caller.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Re-fetch the canonical collection of a remote view.
    pub fn refresh(&mut self) -> Result<()> {
        let fetched = match &self.source {
            Source::Local => return Ok(()),
            Source::Remote(backend) => backend.fetch_all(),
        };
        match fetched {
            Ok(rows) => {
                self.rows = Collection::from_rows(rows);
                self.selection.reconcile(self.rows.rows());
                tracing::debug!(view = %self.view.name, rows = self.rows.len(), "collection fetched");
                Ok(())
            }
            Err(err) => {
                self.notifications.push(Notification::error(err.user_message()));
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Query state
    // ------------------------------------------------------------------

    /// Merge a query update. A page-size change clears the selection.
    pub fn set_query(&mut self, patch: QueryPatch) -> QueryChange {
        let change = self.query.set_query(patch);
        if change.page_size_changed {
            self.selection.clear();
        }
        change
    }

    pub fn search(&mut self, text: impl Into<String>) -> QueryChange {
        self.set_query(QueryPatch::new().query(text))
    }

    /// Sort-header click on column `key`.
    pub fn sort_by_header(&mut self, key: &str) -> QueryChange {
        let sort = self.query.sort.toggled(key);
        self.set_query(QueryPatch::new().sort(sort))
    }

    pub fn go_to_page(&mut self, page_index: usize) -> QueryChange {
        self.set_query(QueryPatch::new().page(page_index))
    }

    pub fn set_page_size(&mut self, page_size: usize) -> QueryChange {
        self.set_query(QueryPatch::new().page_size(page_size))
    }

    /// Replace the selection of one filter field and go back to page 1.
    pub fn set_filter<I, S>(&mut self, field: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.set(field, values);
        self.query.reset_page();
    }

    /// Replace all filter criteria (filter drawer "apply").
    pub fn apply_filters(&mut self, criteria: FilterCriteria) {
        self.filters = criteria;
        self.query.reset_page();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.query.reset_page();
    }

    /// Run the pipeline over the current inputs.
    pub fn result(&self) -> ListResult<'_, R> {
        pipeline::run(self.rows.rows(), &self.query, &self.filters, &self.view)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn toggle_row(&mut self, checked: bool, id: &RowId) -> Result<()> {
        let row = self
            .rows
            .get(id)
            .ok_or_else(|| Error::RowNotFound(id.clone()))?;
        self.selection.toggle_row(checked, row);
        Ok(())
    }

    /// Header checkbox: select or deselect the visible page.
    pub fn toggle_all_on_page(&mut self, checked: bool) {
        let result = pipeline::run(self.rows.rows(), &self.query, &self.filters, &self.view);
        self.selection.toggle_all_on_page(checked, result.page_data());
    }

    pub fn page_selection(&self) -> PageSelection {
        self.selection.page_state(self.result().page_data())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ------------------------------------------------------------------
    // Drawer
    // ------------------------------------------------------------------

    fn ensure_idle(&self) -> Result<()> {
        match self.mutations.in_flight() {
            Some(kind) => Err(Error::MutationInFlight(kind)),
            None => Ok(()),
        }
    }

    pub fn open_add_drawer(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.drawer = Drawer::Add;
        Ok(())
    }

    pub fn open_edit_drawer(&mut self, id: &RowId) -> Result<()> {
        self.ensure_idle()?;
        if !self.rows.contains(id) {
            return Err(Error::RowNotFound(id.clone()));
        }
        self.drawer = Drawer::Edit(id.clone());
        Ok(())
    }

    pub fn close_drawer(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.drawer = Drawer::Closed;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn add(&mut self, row: R) -> Result<()> {
        self.submit(Mutation::Add(row))
    }

    pub fn edit(&mut self, row: R) -> Result<()> {
        self.submit(Mutation::Edit(row))
    }

    pub fn delete(&mut self, id: RowId) -> Result<()> {
        self.submit(Mutation::Delete(id))
    }

    /// Delete every selected row in one call.
    pub fn delete_selected(&mut self) -> Result<()> {
        if self.selection.is_empty() {
            return Err(Error::EmptySelection);
        }
        self.submit(Mutation::BulkDelete(self.selection.ids()))
    }

    pub fn change_status(&mut self, id: RowId, status: impl Into<String>) -> Result<()> {
        self.submit(Mutation::StatusChange {
            id,
            status: status.into(),
        })
    }

    fn validate(&self, mutation: &Mutation<R>) -> Result<()> {
        match (mutation, &self.view.form) {
            (Mutation::Add(row) | Mutation::Edit(row), Some(form)) => {
                form.validate_form(&row.to_payload())
            }
            _ => Ok(()),
        }
    }

    /// Run a mutation through its full lifecycle.
    ///
    /// Form validation errors are returned before anything is submitted and
    /// raise no notification. Every submitted mutation raises exactly one
    /// notification.
    pub fn submit(&mut self, mutation: Mutation<R>) -> Result<()> {
        let kind = mutation.kind();
        self.validate(&mutation)?;
        self.mutations.begin(kind)?;
        tracing::debug!(view = %self.view.name, kind = %kind, "submitting mutation");

        let status_field = self.view.status_field.as_deref();
        let outcome = match &mut self.source {
            Source::Local => {
                let mut next = self.rows.clone();
                next.apply(&mutation, status_field).map(|()| next)
            }
            Source::Remote(backend) => match send(backend.as_mut(), &mutation, status_field) {
                Ok(()) => Ok(match backend.fetch_all() {
                    Ok(rows) => Collection::from_rows(rows),
                    // The remote already holds the change; mirror it locally
                    // until the next successful refresh.
                    Err(err) => {
                        tracing::warn!(
                            view = %self.view.name,
                            kind = %kind,
                            error = %err,
                            "re-fetch after mutation failed, applying locally"
                        );
                        let mut next = self.rows.clone();
                        match next.apply(&mutation, status_field) {
                            Ok(()) => next,
                            Err(_) => self.rows.clone(),
                        }
                    }
                }),
                Err(err) => Err(err),
            },
        };

        match outcome {
            Ok(next) => {
                self.rows = next;
                if kind == MutationKind::BulkDelete {
                    self.selection.clear();
                } else {
                    self.selection.prune(mutation.removed_ids());
                }
                self.selection.reconcile(self.rows.rows());
                self.mutations.succeed(kind);
                self.drawer = Drawer::Closed;
                tracing::info!(view = %self.view.name, kind = %kind, "mutation succeeded");
                self.notifications.push(Notification::success(
                    mutation.success_message(&self.view.item_label),
                ));
                Ok(())
            }
            Err(err) => {
                let message = err.user_message();
                tracing::warn!(view = %self.view.name, kind = %kind, error = %err, "mutation failed");
                self.mutations.fail(kind, message.clone());
                self.notifications.push(Notification::error(message));
                Err(err)
            }
        }
    }
}

fn send<R: Row>(
    backend: &mut dyn Backend<R>,
    mutation: &Mutation<R>,
    status_field: Option<&str>,
) -> Result<()> {
    match mutation {
        Mutation::Add(row) => backend.create(row.clone()).map(|_| ()),
        Mutation::Edit(row) => backend.update(row.clone()).map(|_| ()),
        Mutation::Delete(id) => backend.delete(id),
        Mutation::BulkDelete(ids) => backend.delete_many(ids),
        Mutation::StatusChange { id, status } => {
            let field = status_field.ok_or_else(|| Error::FieldNotWritable("status".into()))?;
            backend.set_status(id, field, status).map(|_| ())
        }
    }
}
