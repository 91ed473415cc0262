//! Admin view routes.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use backoffice_engine::{export::CSV_CONTENT_TYPE, Record, RowId, ViewConfig};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::handlers::{
    handle_bulk_delete, handle_create, handle_delete, handle_export, handle_list, handle_status,
    handle_update, now_millis, BulkDeleteRequest, MutationResponse, PageResponse, StatusRequest,
};
use crate::AppState;

/// Create view routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/views", get(list_views))
        .route("/api/{view}", get(list_handler).post(create_handler))
        .route("/api/{view}/export.csv", get(export_handler))
        .route("/api/{view}/bulk-delete", post(bulk_delete_handler))
        .route(
            "/api/{view}/{id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route("/api/{view}/{id}/status", patch(status_handler))
}

fn find_view<'a>(state: &'a AppState, name: &str) -> Result<&'a ViewConfig> {
    state
        .catalog
        .get(name)
        .ok_or_else(|| AppError::NotFound(format!("view '{}'", name)))
}

/// GET /api/views - Every configured view.
async fn list_views(State(state): State<AppState>) -> Json<Vec<ViewConfig>> {
    Json(state.catalog.views().to_vec())
}

/// GET /api/{view} - One page of rows.
async fn list_handler(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<PageResponse>> {
    let view = find_view(&state, &view)?;
    let page = handle_list(&state.repo, view, &params, state.config.max_page_size).await?;
    Ok(Json(page))
}

/// GET /api/{view}/export.csv - Filtered and sorted rows as a CSV download.
async fn export_handler(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response> {
    let view = find_view(&state, &view)?;
    let csv = handle_export(&state.repo, view, &params).await?;
    let disposition = format!("attachment; filename=\"{}\"", csv.filename);
    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv.bytes,
    )
        .into_response())
}

/// POST /api/{view} - Create a row.
async fn create_handler(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    let view = find_view(&state, &view)?;
    let response = handle_create(&state.repo, view, body, now_millis()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/{view}/{id} - One row.
async fn get_handler(
    State(state): State<AppState>,
    Path((view, id)): Path<(String, String)>,
) -> Result<Json<Record>> {
    let view = find_view(&state, &view)?;
    let record = state.repo.get(&view.name, &RowId::parse(&id)).await?;
    Ok(Json(record))
}

/// PUT /api/{view}/{id} - Replace a row's payload.
async fn update_handler(
    State(state): State<AppState>,
    Path((view, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<MutationResponse>> {
    let view = find_view(&state, &view)?;
    let response =
        handle_update(&state.repo, view, RowId::parse(&id), body, now_millis()).await?;
    Ok(Json(response))
}

/// PATCH /api/{view}/{id}/status - Change a row's status.
async fn status_handler(
    State(state): State<AppState>,
    Path((view, id)): Path<(String, String)>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<MutationResponse>> {
    let view = find_view(&state, &view)?;
    let response =
        handle_status(&state.repo, view, RowId::parse(&id), request, now_millis()).await?;
    Ok(Json(response))
}

/// DELETE /api/{view}/{id} - Delete a row.
async fn delete_handler(
    State(state): State<AppState>,
    Path((view, id)): Path<(String, String)>,
) -> Result<Json<MutationResponse>> {
    let view = find_view(&state, &view)?;
    let response = handle_delete(&state.repo, view, RowId::parse(&id)).await?;
    Ok(Json(response))
}

/// POST /api/{view}/bulk-delete - Delete several rows, all or nothing.
async fn bulk_delete_handler(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Json(request): Json<BulkDeleteRequest>,
) -> Result<Json<MutationResponse>> {
    let view = find_view(&state, &view)?;
    let response = handle_bulk_delete(&state.repo, view, request).await?;
    Ok(Json(response))
}
