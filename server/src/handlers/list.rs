//! List handler - runs the engine pipeline over a stored collection.

use backoffice_engine::{
    export, pipeline, FilterCriteria, QueryState, Record, Sort, ViewConfig,
};
use serde::Serialize;

use crate::db::Repository;
use crate::error::Result;

/// One page of a view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub view: String,
    pub page_index: usize,
    pub page_size: usize,
    /// Rows matching search and filters, before pagination
    pub total: usize,
    pub page_count: usize,
    pub sort: Sort,
    pub query: String,
    pub filters: FilterCriteria,
    pub rows: Vec<Record>,
}

/// A rendered CSV export.
#[derive(Debug)]
pub struct CsvExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Read query state and filter criteria from request parameters.
///
/// Page sizes above `max_page_size` are capped.
pub fn parse_list_params(
    params: &[(String, String)],
    view: &ViewConfig,
    max_page_size: usize,
) -> (QueryState, FilterCriteria) {
    let pairs = || params.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    let mut query = QueryState::from_params(pairs(), view.default_page_size);
    query.page_size = query.page_size.min(max_page_size.max(1));
    let criteria = FilterCriteria::from_params(pairs());
    (query, criteria)
}

/// Serve one page of a view.
pub async fn handle_list(
    repo: &Repository,
    view: &ViewConfig,
    params: &[(String, String)],
    max_page_size: usize,
) -> Result<PageResponse> {
    let (query, criteria) = parse_list_params(params, view, max_page_size);
    let rows = repo.fetch_all(&view.name).await?;

    let result = pipeline::run(&rows, &query, &criteria, view);
    let page_count = result.page_count(query.page_size);
    let total = result.total();
    let page_rows: Vec<Record> = result.page_data().iter().map(|r| (*r).clone()).collect();

    tracing::debug!(
        view = %view.name,
        total,
        page = query.page_index,
        "served list page"
    );

    Ok(PageResponse {
        view: view.name.clone(),
        page_index: query.page_index,
        page_size: query.page_size,
        total,
        page_count,
        sort: query.sort,
        query: query.query,
        filters: criteria,
        rows: page_rows,
    })
}

/// Export every filtered and sorted row of a view as CSV.
///
/// Pagination parameters are ignored.
pub async fn handle_export(
    repo: &Repository,
    view: &ViewConfig,
    params: &[(String, String)],
) -> Result<CsvExport> {
    let (query, criteria) = parse_list_params(params, view, usize::MAX);
    let rows = repo.fetch_all(&view.name).await?;

    let result = pipeline::run(&rows, &query, &criteria, view);
    let bytes = export::export_csv(result.all_filtered_and_sorted(), &view.csv_columns())?;

    tracing::info!(view = %view.name, rows = result.total(), "exported csv");

    Ok(CsvExport {
        filename: export::export_filename(&view.name),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::db::MemoryRepository;
    use crate::seed;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn repo() -> Repository {
        Repository::memory(MemoryRepository::seeded(seed::mock_data(1000)))
    }

    #[test]
    fn page_size_is_capped() {
        let catalog = Catalog::builtin(10);
        let view = catalog.get("demands").unwrap();
        let (query, criteria) = parse_list_params(
            &params(&[("pageSize", "5000"), ("filter.status", "approved")]),
            view,
            100,
        );
        assert_eq!(query.page_size, 100);
        assert!(criteria.get("status").is_some());
    }

    #[tokio::test]
    async fn approved_demands_page() {
        let catalog = Catalog::builtin(10);
        let view = catalog.get("demands").unwrap();
        let page = handle_list(
            &repo(),
            view,
            &params(&[("filter.status", "approved")]),
            100,
        )
        .await
        .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.page_count, 1);
        let products: Vec<&str> = page
            .rows
            .iter()
            .filter_map(|r| r.payload["product"].as_str())
            .collect();
        assert_eq!(
            products,
            vec![
                "Industrial Machinery Parts",
                "Stainless Steel Sheets, Grade 304",
                "Natural Rubber",
            ]
        );
    }

    #[tokio::test]
    async fn export_ignores_pagination() {
        let catalog = Catalog::builtin(2);
        let view = catalog.get("designations").unwrap();
        let csv = handle_export(&repo(), view, &params(&[("pageSize", "1")]))
            .await
            .unwrap();

        assert_eq!(csv.filename, "designations-export.csv");
        let text = String::from_utf8(csv.bytes[export::UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.starts_with("Name,Department,Created\n"));
    }
}
