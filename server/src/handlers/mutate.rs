//! Mutation handlers - create, update, status change and deletes.
//!
//! Every handler validates against the view before touching storage and
//! answers with the same success message the admin screens show.

use backoffice_engine::{Error as EngineError, Mutation, Record, RowId, ViewConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::db::Repository;
use crate::error::{AppError, Result};

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// Request body for a bulk delete.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<RowId>,
}

/// Response for a successful mutation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    /// Notification text, e.g. `Demand added successfully`
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<usize>,
}

impl MutationResponse {
    fn new(view: &ViewConfig, mutation: &Mutation<Record>) -> Self {
        Self {
            message: mutation.success_message(&view.item_label),
            row: None,
            deleted: None,
        }
    }

    fn with_row(mut self, row: Record) -> Self {
        self.row = Some(row);
        self
    }
}

fn into_object(body: Value) -> Result<Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(EngineError::InvalidPayload("payload must be an object".into()).into()),
    }
}

fn validate(view: &ViewConfig, payload: &Value) -> Result<()> {
    if let Some(form) = &view.form {
        form.validate_form(payload)?;
    }
    Ok(())
}

/// Create a row. The id comes from the body's `id` key when present and is
/// generated otherwise.
pub async fn handle_create(
    repo: &Repository,
    view: &ViewConfig,
    body: Value,
    now: u64,
) -> Result<MutationResponse> {
    let mut payload = into_object(body)?;
    let id = match payload.remove("id") {
        Some(raw) => RowId::from_value(&raw).ok_or_else(|| {
            AppError::BadRequest("id must be a number or a non-empty string".into())
        })?,
        None => RowId::from(uuid::Uuid::new_v4().to_string()),
    };
    let payload = Value::Object(payload);
    validate(view, &payload)?;

    let created = repo.create(&view.name, Record::new(id, payload, now)).await?;

    tracing::info!(view = %view.name, id = %created.id, "row created");
    Ok(MutationResponse::new(view, &Mutation::Add(created.clone())).with_row(created))
}

/// Replace the payload of a row, keeping its creation time.
pub async fn handle_update(
    repo: &Repository,
    view: &ViewConfig,
    id: RowId,
    body: Value,
    now: u64,
) -> Result<MutationResponse> {
    let mut payload = into_object(body)?;
    if let Some(raw) = payload.remove("id") {
        if RowId::from_value(&raw).as_ref() != Some(&id) {
            return Err(AppError::BadRequest("id in body does not match the path".into()));
        }
    }
    let payload = Value::Object(payload);
    validate(view, &payload)?;

    let existing = repo.get(&view.name, &id).await?;
    let updated = repo
        .update(&view.name, existing.with_payload(payload, now))
        .await?;

    tracing::info!(view = %view.name, id = %id, "row updated");
    Ok(MutationResponse::new(view, &Mutation::Edit(updated.clone())).with_row(updated))
}

/// Change the status field of a row.
///
/// When the view filters on its status field, the new status must be one of
/// the filter's options.
pub async fn handle_status(
    repo: &Repository,
    view: &ViewConfig,
    id: RowId,
    request: StatusRequest,
    now: u64,
) -> Result<MutationResponse> {
    let field = view
        .status_field
        .as_deref()
        .ok_or_else(|| EngineError::FieldNotWritable("status".into()))?;
    let status = request.status.trim();
    if status.is_empty() {
        return Err(AppError::BadRequest("status must not be empty".into()));
    }
    if let Some(filter) = view.filter_def(field) {
        if !filter.options.is_empty() && !filter.options.iter().any(|o| o.value == status) {
            return Err(AppError::BadRequest(format!(
                "unknown status '{}' for {}",
                status, view.name
            )));
        }
    }

    let mutation: Mutation<Record> = Mutation::StatusChange {
        id: id.clone(),
        status: status.to_string(),
    };
    let updated = repo.set_field(&view.name, &id, field, status, now).await?;

    tracing::info!(view = %view.name, id = %id, status, "status changed");
    Ok(MutationResponse::new(view, &mutation).with_row(updated))
}

/// Delete one row.
pub async fn handle_delete(
    repo: &Repository,
    view: &ViewConfig,
    id: RowId,
) -> Result<MutationResponse> {
    repo.delete(&view.name, &id).await?;

    tracing::info!(view = %view.name, id = %id, "row deleted");
    Ok(MutationResponse::new(view, &Mutation::Delete(id)))
}

/// Delete several rows, all or nothing.
pub async fn handle_bulk_delete(
    repo: &Repository,
    view: &ViewConfig,
    request: BulkDeleteRequest,
) -> Result<MutationResponse> {
    if request.ids.is_empty() {
        return Err(EngineError::EmptySelection.into());
    }
    let ids: Vec<RowId> = request.ids.into_iter().map(RowId::canonical).collect();
    repo.delete_many(&view.name, &ids).await?;

    let deleted = ids.len();
    tracing::info!(view = %view.name, deleted, "rows deleted");
    let mut response = MutationResponse::new(view, &Mutation::BulkDelete(ids));
    response.deleted = Some(deleted);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::db::MemoryRepository;
    use crate::seed;
    use serde_json::json;

    fn setup() -> (Repository, Catalog) {
        (
            Repository::memory(MemoryRepository::seeded(seed::mock_data(1000))),
            Catalog::builtin(10),
        )
    }

    #[tokio::test]
    async fn create_blog_with_only_a_title() {
        let (repo, catalog) = setup();
        let view = catalog.get("blogs").unwrap();

        let response = handle_create(&repo, view, json!({"title": "Steel outlook 2024"}), 2000)
            .await
            .unwrap();

        assert_eq!(response.message, "Blog added successfully");
        let row = response.row.unwrap();
        assert!(matches!(row.id, RowId::Text(_)));
        assert_eq!(row.created_at, 2000);
        assert_eq!(repo.fetch_all("blogs").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn create_reports_every_failing_field() {
        let (repo, catalog) = setup();
        let view = catalog.get("offers").unwrap();

        let result = handle_create(&repo, view, json!({"price": "cheap"}), 2000).await;
        match result {
            Err(AppError::Engine(EngineError::Validation(errors))) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["product", "supplier", "price"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn numeric_looking_text_id_is_reachable_by_path() {
        let (repo, catalog) = setup();
        let view = catalog.get("designations").unwrap();

        let response = handle_create(&repo, view, json!({"id": "42", "name": "Driver"}), 2000)
            .await
            .unwrap();
        assert_eq!(response.row.unwrap().id, RowId::Number(42));

        let found = repo.get("designations", &RowId::parse("42")).await.unwrap();
        assert_eq!(found.payload["name"], "Driver");

        handle_delete(&repo, view, RowId::parse("42")).await.unwrap();
        assert!(repo.get("designations", &RowId::parse("42")).await.is_err());
    }

    #[tokio::test]
    async fn zero_padded_id_stays_text() {
        let (repo, catalog) = setup();
        let view = catalog.get("designations").unwrap();

        handle_create(&repo, view, json!({"id": "007", "name": "Driver"}), 2000)
            .await
            .unwrap();

        let found = repo.get("designations", &RowId::parse("007")).await.unwrap();
        assert_eq!(found.id, RowId::Text("007".into()));
        assert!(repo.get("designations", &RowId::parse("7")).await.is_err());
    }

    #[tokio::test]
    async fn bulk_delete_accepts_ids_as_strings() {
        let (repo, catalog) = setup();
        let view = catalog.get("designations").unwrap();
        let request: BulkDeleteRequest = serde_json::from_value(json!({"ids": ["1", 3]})).unwrap();

        let response = handle_bulk_delete(&repo, view, request).await.unwrap();

        assert_eq!(response.deleted, Some(2));
        assert_eq!(repo.fetch_all("designations").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_with_taken_id_conflicts() {
        let (repo, catalog) = setup();
        let view = catalog.get("designations").unwrap();

        let result = handle_create(&repo, view, json!({"id": 1, "name": "Driver"}), 2000).await;
        assert!(matches!(
            result,
            Err(AppError::Engine(EngineError::RowAlreadyExists(RowId::Number(1))))
        ));
    }

    #[tokio::test]
    async fn update_keeps_created_at() {
        let (repo, catalog) = setup();
        let view = catalog.get("designations").unwrap();

        let response = handle_update(
            &repo,
            view,
            RowId::from(2),
            json!({"name": "HR Lead", "department": "HR"}),
            3000,
        )
        .await
        .unwrap();

        assert_eq!(response.message, "Designation updated successfully");
        let row = response.row.unwrap();
        assert_eq!(row.created_at, 1000);
        assert_eq!(row.updated_at, 3000);
    }

    #[tokio::test]
    async fn status_must_be_a_known_option() {
        let (repo, catalog) = setup();
        let view = catalog.get("kyc").unwrap();
        let id = RowId::from("kyc-2");

        let result = handle_status(
            &repo,
            view,
            id.clone(),
            StatusRequest { status: "maybe".into() },
            3000,
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let response = handle_status(
            &repo,
            view,
            id,
            StatusRequest { status: "approved".into() },
            3000,
        )
        .await
        .unwrap();
        assert_eq!(response.message, "KYC request status changed to approved");
        assert_eq!(response.row.unwrap().payload["status"], "approved");
    }

    #[tokio::test]
    async fn status_change_needs_a_status_field() {
        let (repo, catalog) = setup();
        let view = catalog.get("designations").unwrap();

        let result = handle_status(
            &repo,
            view,
            RowId::from(1),
            StatusRequest { status: "active".into() },
            3000,
        )
        .await;
        assert!(matches!(
            result,
            Err(AppError::Engine(EngineError::FieldNotWritable(_)))
        ));
    }

    #[tokio::test]
    async fn bulk_delete_two_designations() {
        let (repo, catalog) = setup();
        let view = catalog.get("designations").unwrap();

        let response = handle_bulk_delete(
            &repo,
            view,
            BulkDeleteRequest {
                ids: vec![RowId::from(1), RowId::from(3)],
            },
        )
        .await
        .unwrap();

        assert_eq!(response.message, "2 designation(s) deleted successfully");
        assert_eq!(response.deleted, Some(2));
        assert_eq!(repo.fetch_all("designations").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_missing_row() {
        let (repo, catalog) = setup();
        let view = catalog.get("tasks").unwrap();

        let result = handle_delete(&repo, view, RowId::from(99)).await;
        assert!(matches!(
            result,
            Err(AppError::Engine(EngineError::RowNotFound(_)))
        ));
    }
}
