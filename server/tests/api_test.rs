//! HTTP tests against the router backed by seeded in-memory storage.

use std::sync::Arc;

use backoffice_server::catalog::Catalog;
use backoffice_server::config::Config;
use backoffice_server::db::{MemoryRepository, Repository};
use backoffice_server::{app, seed, AppState};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Serve the app on an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let config = Config::default();
    let state = AppState {
        repo: Repository::memory(MemoryRepository::seeded(seed::mock_data(1_700_000_000_000))),
        catalog: Arc::new(Catalog::builtin(config.default_page_size)),
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });

    format!("http://{}", addr)
}

#[cfg(test)]
mod api_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let base = spawn_server().await;
        let body: Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "memory");
        assert_eq!(body["views"], 12);
    }

    #[tokio::test]
    async fn test_views_listing() {
        let base = spawn_server().await;
        let views: Vec<Value> = reqwest::get(format!("{}/api/views", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert!(views.iter().any(|v| v["name"] == "price-lists"));
    }

    #[tokio::test]
    async fn test_list_approved_demands() {
        let base = spawn_server().await;
        let page: Value = reqwest::Client::new()
            .get(format!("{}/api/demands", base))
            .query(&[("filter.status", "approved"), ("pageSize", "2")])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(page["total"], 3);
        assert_eq!(page["pageCount"], 2);
        assert_eq!(page["rows"].as_array().unwrap().len(), 2);
        assert_eq!(page["rows"][0]["payload"]["product"], "Industrial Machinery Parts");
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let base = spawn_server().await;
        let page: Value = reqwest::Client::new()
            .get(format!("{}/api/demands", base))
            .query(&[("q", "  COPPER ")])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(page["total"], 1);
        assert_eq!(page["rows"][0]["payload"]["product"], "Copper Cathodes");
    }

    #[tokio::test]
    async fn test_unknown_view_is_not_found() {
        let base = spawn_server().await;
        let response = reqwest::get(format!("{}/api/warehouses", base)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Not found: view 'warehouses'");
    }

    #[tokio::test]
    async fn test_export_csv() {
        let base = spawn_server().await;
        let response = reqwest::Client::new()
            .get(format!("{}/api/demands/export.csv", base))
            .query(&[("filter.status", "approved"), ("pageSize", "1")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/csv;charset=utf-8;"
        );
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"demands-export.csv\""
        );

        let bytes = response.bytes().await.unwrap();
        assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        // Header plus every approved demand, regardless of page size
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("\"Stainless Steel Sheets, Grade 304\""));
    }

    #[tokio::test]
    async fn test_create_and_fetch_blog() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/blogs", base))
            .json(&json!({"id": 10, "title": "Steel outlook 2024"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Blog added successfully");

        let row: Value = client
            .get(format!("{}/api/blogs/10", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(row["id"], 10);
        assert_eq!(row["payload"]["title"], "Steel outlook 2024");
    }

    #[tokio::test]
    async fn test_string_id_round_trip() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/designations", base))
            .json(&json!({"id": "42", "name": "Driver"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = client
            .get(format!("{}/api/designations/42", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = client
            .delete(format!("{}/api/designations/42", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = client
            .get(format!("{}/api/designations/42", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_validation_errors() {
        let base = spawn_server().await;
        let response = reqwest::Client::new()
            .post(format!("{}/api/offers", base))
            .json(&json!({"price": "cheap"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json().await.unwrap();
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["field"].as_str())
            .collect();
        assert_eq!(fields, vec!["product", "supplier", "price"]);
    }

    #[tokio::test]
    async fn test_create_duplicate_id_conflicts() {
        let base = spawn_server().await;
        let response = reqwest::Client::new()
            .post(format!("{}/api/designations", base))
            .json(&json!({"id": 1, "name": "Driver"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_row() {
        let base = spawn_server().await;
        let response = reqwest::Client::new()
            .put(format!("{}/api/designations/2", base))
            .json(&json!({"name": "HR Lead", "department": "HR"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Designation updated successfully");
        assert_eq!(body["row"]["payload"]["name"], "HR Lead");
    }

    #[tokio::test]
    async fn test_status_change() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let response = client
            .patch(format!("{}/api/kyc/kyc-2/status", base))
            .json(&json!({"status": "approved"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page: Value = client
            .get(format!("{}/api/kyc", base))
            .query(&[("filter.status", "approved")])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(page["total"], 2);
    }

    #[tokio::test]
    async fn test_bulk_delete_is_all_or_nothing() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/designations/bulk-delete", base))
            .json(&json!({"ids": [1, 99]}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = client
            .post(format!("{}/api/designations/bulk-delete", base))
            .json(&json!({"ids": [1, 3]}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "2 designation(s) deleted successfully");
        assert_eq!(body["deleted"], 2);

        let page: Value = client
            .get(format!("{}/api/designations", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(page["total"], 2);
    }

    #[tokio::test]
    async fn test_delete_missing_row() {
        let base = spawn_server().await;
        let response = reqwest::Client::new()
            .delete(format!("{}/api/tasks/99", base))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
