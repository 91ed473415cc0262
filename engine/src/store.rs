//! Collections and the backend seam.
//!
//! A [`Collection`] is an ordered set of rows with unique ids. Mutations are
//! applied to it all-or-nothing: a failing mutation leaves the collection
//! exactly as it was. [`Backend`] is how a controller reaches a remote
//! collection; [`MemoryStore`] is the in-process implementation.

use crate::{error::Result, Error, Mutation, Row, RowId};
use serde_json::Value;

/// An ordered collection of rows with unique ids.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    rows: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Row> Collection<R> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from rows. Later duplicates of an id are dropped.
    pub fn from_rows(rows: Vec<R>) -> Self {
        let mut collection = Self::new();
        for row in rows {
            if !collection.contains(&row.id()) {
                collection.rows.push(row);
            }
        }
        collection
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by id.
    pub fn get(&self, id: &RowId) -> Option<&R> {
        self.rows.iter().find(|r| &r.id() == id)
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &RowId) -> Option<usize> {
        self.rows.iter().position(|r| &r.id() == id)
    }

    /// Append a new row.
    pub fn insert(&mut self, row: R) -> Result<()> {
        let id = row.id();
        if self.contains(&id) {
            return Err(Error::RowAlreadyExists(id));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Replace an existing row, keeping its position.
    pub fn replace(&mut self, row: R) -> Result<()> {
        let id = row.id();
        let index = self.position(&id).ok_or(Error::RowNotFound(id))?;
        self.rows[index] = row;
        Ok(())
    }

    /// Remove a row by id.
    pub fn remove(&mut self, id: &RowId) -> Result<R> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::RowNotFound(id.clone()))?;
        Ok(self.rows.remove(index))
    }

    /// Remove several rows. Either every id exists and all are removed, or
    /// nothing changes.
    pub fn remove_many(&mut self, ids: &[RowId]) -> Result<Vec<R>> {
        if ids.is_empty() {
            return Err(Error::EmptySelection);
        }
        if let Some(missing) = ids.iter().find(|id| !self.contains(id)) {
            return Err(Error::RowNotFound(missing.clone()));
        }
        let (removed, kept): (Vec<R>, Vec<R>) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|r| ids.contains(&r.id()));
        self.rows = kept;
        Ok(removed)
    }

    /// Replace one field of a row with a copy carrying the new value.
    pub fn set_field(&mut self, id: &RowId, field: &str, value: Value) -> Result<R> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::RowNotFound(id.clone()))?;
        let updated = self.rows[index].with_field(field, value)?;
        self.rows[index] = updated.clone();
        Ok(updated)
    }

    /// Apply a mutation. `status_field` names the field status changes
    /// write to.
    pub fn apply(&mut self, mutation: &Mutation<R>, status_field: Option<&str>) -> Result<()> {
        match mutation {
            Mutation::Add(row) => self.insert(row.clone()),
            Mutation::Edit(row) => self.replace(row.clone()),
            Mutation::Delete(id) => self.remove(id).map(|_| ()),
            Mutation::BulkDelete(ids) => self.remove_many(ids).map(|_| ()),
            Mutation::StatusChange { id, status } => {
                let field = status_field.ok_or_else(|| Error::FieldNotWritable("status".into()))?;
                self.set_field(id, field, Value::String(status.clone()))
                    .map(|_| ())
            }
        }
    }
}

/// The remote side of a list view.
///
/// Calls return once the remote has answered; the controller never assumes
/// success before that.
pub trait Backend<R: Row> {
    /// Fetch the canonical collection.
    fn fetch_all(&self) -> Result<Vec<R>>;

    fn create(&mut self, row: R) -> Result<R>;

    fn update(&mut self, row: R) -> Result<R>;

    fn delete(&mut self, id: &RowId) -> Result<()>;

    /// Delete several rows in one call, all-or-nothing.
    fn delete_many(&mut self, ids: &[RowId]) -> Result<()>;

    fn set_status(&mut self, id: &RowId, field: &str, status: &str) -> Result<R>;
}

/// An in-process backend holding its collection in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore<R> {
    collection: Collection<R>,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            collection: Collection::default(),
        }
    }
}

impl<R: Row> MemoryStore<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            collection: Collection::from_rows(rows),
        }
    }

    pub fn collection(&self) -> &Collection<R> {
        &self.collection
    }
}

impl<R: Row> Backend<R> for MemoryStore<R> {
    fn fetch_all(&self) -> Result<Vec<R>> {
        Ok(self.collection.rows().to_vec())
    }

    fn create(&mut self, row: R) -> Result<R> {
        self.collection.insert(row.clone())?;
        Ok(row)
    }

    fn update(&mut self, row: R) -> Result<R> {
        self.collection.replace(row.clone())?;
        Ok(row)
    }

    fn delete(&mut self, id: &RowId) -> Result<()> {
        self.collection.remove(id).map(|_| ())
    }

    fn delete_many(&mut self, ids: &[RowId]) -> Result<()> {
        self.collection.remove_many(ids).map(|_| ())
    }

    fn set_status(&mut self, id: &RowId, field: &str, status: &str) -> Result<R> {
        self.collection
            .set_field(id, field, Value::String(status.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use serde_json::json;

    fn designation(id: i32, name: &str) -> Record {
        Record::new(id, json!({"name": name, "status": "active"}), 1000)
    }

    fn test_collection() -> Collection<Record> {
        Collection::from_rows(vec![
            designation(1, "Sales Manager"),
            designation(2, "HR Executive"),
            designation(3, "Accountant"),
        ])
    }

    #[test]
    fn from_rows_drops_duplicate_ids() {
        let collection = Collection::from_rows(vec![
            designation(1, "first"),
            designation(1, "second"),
        ]);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(&1.into()).unwrap().payload["name"], "first");
    }

    #[test]
    fn insert_duplicate() {
        let mut collection = test_collection();
        let result = collection.insert(designation(2, "Other"));
        assert!(matches!(result, Err(Error::RowAlreadyExists(_))));
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn replace_keeps_position() {
        let mut collection = test_collection();
        collection.replace(designation(2, "HR Lead")).unwrap();
        assert_eq!(collection.rows()[1].payload["name"], "HR Lead");
    }

    #[test]
    fn replace_missing() {
        let mut collection = test_collection();
        let result = collection.replace(designation(9, "Ghost"));
        assert!(matches!(result, Err(Error::RowNotFound(_))));
    }

    #[test]
    fn remove_many_is_all_or_nothing() {
        let mut collection = test_collection();

        let result = collection.remove_many(&[1.into(), 9.into()]);
        assert!(matches!(result, Err(Error::RowNotFound(RowId::Number(9)))));
        assert_eq!(collection.len(), 3);

        let removed = collection.remove_many(&[1.into(), 3.into()]).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(collection.len(), 1);
        assert!(collection.contains(&2.into()));
    }

    #[test]
    fn remove_many_requires_ids() {
        let mut collection = test_collection();
        assert!(matches!(collection.remove_many(&[]), Err(Error::EmptySelection)));
    }

    #[test]
    fn apply_status_change() {
        let mut collection = test_collection();
        let mutation = Mutation::StatusChange {
            id: 1.into(),
            status: "inactive".into(),
        };

        collection.apply(&mutation, Some("status")).unwrap();
        assert_eq!(collection.get(&1.into()).unwrap().payload["status"], "inactive");

        let result = collection.apply(&mutation, None);
        assert!(matches!(result, Err(Error::FieldNotWritable(_))));
    }

    #[test]
    fn memory_store_backend() {
        let mut store = MemoryStore::new(vec![designation(1, "Sales Manager")]);

        store.create(designation(2, "Accountant")).unwrap();
        store.update(designation(1, "Sales Lead")).unwrap();
        let updated = store.set_status(&2.into(), "status", "inactive").unwrap();
        assert_eq!(updated.payload["status"], "inactive");

        let rows = store.fetch_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].payload["name"], "Sales Lead");

        store.delete_many(&[1.into(), 2.into()]).unwrap();
        assert!(store.collection().is_empty());
        assert!(matches!(store.delete(&1.into()), Err(Error::RowNotFound(_))));
    }
}
