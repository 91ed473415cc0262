//! The list-view pipeline.
//!
//! Stages run in a fixed order: criteria filter, free-text filter, sort,
//! page slice. Each run starts from the full collection; nothing derived is
//! cached between runs.

use crate::{value, FieldType, FilterCriteria, QueryState, Row, Sort, SortOrder, ViewConfig};
use std::cmp::Ordering;
use std::ops::Range;

/// Derived result of one pipeline run.
#[derive(Debug, Clone)]
pub struct ListResult<'a, R> {
    rows: Vec<&'a R>,
    page: Range<usize>,
}

impl<'a, R> ListResult<'a, R> {
    /// Rows on the current page.
    pub fn page_data(&self) -> &[&'a R] {
        &self.rows[self.page.clone()]
    }

    /// Number of rows matching the filters, before pagination.
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    /// Every matching row, sorted, before pagination.
    pub fn all_filtered_and_sorted(&self) -> &[&'a R] {
        &self.rows
    }

    /// Number of pages at `page_size` rows per page.
    pub fn page_count(&self, page_size: usize) -> usize {
        self.rows.len().div_ceil(page_size.max(1))
    }
}

/// Run the pipeline.
pub fn run<'a, R: Row>(
    rows: &'a [R],
    query: &QueryState,
    criteria: &FilterCriteria,
    view: &ViewConfig,
) -> ListResult<'a, R> {
    let needle = value::fold(query.query.trim());

    let mut matched: Vec<&'a R> = rows
        .iter()
        .filter(|row| criteria.matches(*row))
        .filter(|row| needle.is_empty() || matches_text(*row, &needle, &view.searchable))
        .collect();

    sort_rows(&mut matched, &query.sort, view);

    let start = query.offset().min(matched.len());
    let end = start.saturating_add(query.page_size).min(matched.len());

    ListResult {
        rows: matched,
        page: start..end,
    }
}

/// Whether any searchable field contains `needle` (already case-folded).
fn matches_text<R: Row>(row: &R, needle: &str, fields: &[String]) -> bool {
    fields.iter().any(|field| {
        row.field(field)
            .as_ref()
            .and_then(value::to_text)
            .is_some_and(|text| value::fold(&text).contains(needle))
    })
}

/// Precomputed sort key of one row.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    /// Case-folded text first, raw text as tie-break
    Text(String, String),
    Missing,
}

fn sort_key<R: Row>(row: &R, key: &str, field_type: FieldType) -> SortKey {
    let Some(v) = row.field(key) else {
        return SortKey::Missing;
    };
    let number = match field_type {
        FieldType::Int | FieldType::Float => value::to_number(&v),
        FieldType::Timestamp => value::to_timestamp_millis(&v).map(|ms| ms as f64),
        _ => None,
    };
    if field_type.is_numeric() {
        return number.map_or(SortKey::Missing, SortKey::Number);
    }
    match value::to_text(&v) {
        Some(text) => SortKey::Text(value::fold(&text), text),
        None => SortKey::Missing,
    }
}

/// Compare two keys. Missing values go last in both directions.
fn compare_keys(a: &SortKey, b: &SortKey, order: SortOrder) -> Ordering {
    let ordering = match (a, b) {
        (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
        (SortKey::Missing, _) => return Ordering::Greater,
        (_, SortKey::Missing) => return Ordering::Less,
        (SortKey::Number(x), SortKey::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (SortKey::Text(fx, rx), SortKey::Text(fy, ry)) => fx.cmp(fy).then_with(|| rx.cmp(ry)),
        // A column has one type, so mixed keys only come from bad data.
        (SortKey::Number(_), SortKey::Text(..)) => Ordering::Less,
        (SortKey::Text(..), SortKey::Number(_)) => Ordering::Greater,
    };
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Stable sort by the configured column. Keys that are not a column of the
/// view leave the order untouched.
fn sort_rows<R: Row>(rows: &mut Vec<&R>, sort: &Sort, view: &ViewConfig) {
    let (Some(key), Some(order)) = (sort.key.as_deref(), sort.order) else {
        return;
    };
    let Some(column) = view.column_def(key) else {
        return;
    };

    let mut keyed: Vec<(SortKey, &R)> = rows
        .iter()
        .map(|row| (sort_key(*row, key, column.field_type), *row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, order));

    *rows = keyed.into_iter().map(|(_, row)| row).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnDef, QueryPatch, Record, RowId};
    use serde_json::json;

    fn view() -> ViewConfig {
        ViewConfig::new("offers", "/offers")
            .searchable(["title", "id"])
            .column(ColumnDef::new("title", "Title", FieldType::String))
            .column(ColumnDef::new("price", "Price", FieldType::Float))
            .column(ColumnDef::new("postedAt", "Posted", FieldType::Timestamp))
    }

    fn rows() -> Vec<Record> {
        vec![
            Record::new(1, json!({"title": "copper wire", "price": 30, "postedAt": "2024-03-02"}), 0),
            Record::new(2, json!({"title": "Aluminium", "price": 5.5, "postedAt": "2024-01-10"}), 0),
            Record::new(3, json!({"title": "brass", "price": null}), 0),
            Record::new(14, json!({"title": "Copper plate", "price": 120, "postedAt": "2023-12-31"}), 0),
        ]
    }

    fn ids(rows: &[&Record]) -> Vec<i64> {
        rows.iter()
            .map(|r| match r.id {
                RowId::Number(n) => n,
                RowId::Text(_) => panic!("numeric ids only"),
            })
            .collect()
    }

    #[test]
    fn no_query_returns_everything_in_source_order() {
        let data = rows();
        let result = run(&data, &QueryState::default(), &FilterCriteria::new(), &view());
        assert_eq!(result.total(), 4);
        assert_eq!(ids(result.page_data()), vec![1, 2, 3, 14]);
    }

    #[test]
    fn search_is_trimmed_and_case_insensitive() {
        let data = rows();
        let mut query = QueryState::default();
        query.set_query(QueryPatch::new().query("  COPPER "));

        let result = run(&data, &query, &FilterCriteria::new(), &view());
        assert_eq!(ids(result.page_data()), vec![1, 14]);
    }

    #[test]
    fn search_coerces_numeric_ids() {
        let data = rows();
        let mut query = QueryState::default();
        query.set_query(QueryPatch::new().query("14"));

        let result = run(&data, &query, &FilterCriteria::new(), &view());
        assert_eq!(ids(result.page_data()), vec![14]);
    }

    #[test]
    fn text_sort_folds_case() {
        let data = rows();
        let mut query = QueryState::default();
        query.set_query(QueryPatch::new().sort(Sort::new("title", SortOrder::Asc)));

        let result = run(&data, &query, &FilterCriteria::new(), &view());
        assert_eq!(
            ids(result.all_filtered_and_sorted()),
            vec![2, 3, 14, 1]
        );
    }

    #[test]
    fn numeric_sort_puts_missing_last_both_ways() {
        let data = rows();
        let mut query = QueryState::default();

        query.set_query(QueryPatch::new().sort(Sort::new("price", SortOrder::Asc)));
        let result = run(&data, &query, &FilterCriteria::new(), &view());
        assert_eq!(
            ids(result.all_filtered_and_sorted()),
            vec![2, 1, 14, 3]
        );

        query.set_query(QueryPatch::new().sort(Sort::new("price", SortOrder::Desc)));
        let result = run(&data, &query, &FilterCriteria::new(), &view());
        assert_eq!(
            ids(result.all_filtered_and_sorted()),
            vec![14, 1, 2, 3]
        );
    }

    #[test]
    fn date_sort_is_chronological() {
        let data = rows();
        let mut query = QueryState::default();
        query.set_query(QueryPatch::new().sort(Sort::new("postedAt", SortOrder::Asc)));

        let result = run(&data, &query, &FilterCriteria::new(), &view());
        assert_eq!(
            ids(result.all_filtered_and_sorted()),
            vec![14, 2, 1, 3]
        );
    }

    #[test]
    fn unknown_sort_key_is_a_no_op() {
        let data = rows();
        let mut query = QueryState::default();
        query.set_query(QueryPatch::new().sort(Sort::new("nope", SortOrder::Desc)));

        let result = run(&data, &query, &FilterCriteria::new(), &view());
        assert_eq!(
            ids(result.all_filtered_and_sorted()),
            vec![1, 2, 3, 14]
        );
    }

    #[test]
    fn sort_without_order_is_skipped() {
        let data = rows();
        let mut query = QueryState::default();
        query.sort.key = Some("price".into());

        let result = run(&data, &query, &FilterCriteria::new(), &view());
        assert_eq!(ids(result.page_data())[0], 1);
    }

    #[test]
    fn pagination_slices_after_sorting() {
        let data = rows();
        let mut query = QueryState::new(3);
        query.set_query(QueryPatch::new().sort(Sort::new("price", SortOrder::Asc)));
        query.set_query(QueryPatch::new().page(2));

        let result = run(&data, &query, &FilterCriteria::new(), &view());
        assert_eq!(result.total(), 4);
        assert_eq!(result.page_count(3), 2);
        assert_eq!(ids(result.page_data()), vec![3]);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let data = rows();
        let mut query = QueryState::new(2);
        query.set_query(QueryPatch::new().page(9));

        let result = run(&data, &query, &FilterCriteria::new(), &view());
        assert!(result.page_data().is_empty());
        assert_eq!(result.total(), 4);
    }

    #[test]
    fn empty_source() {
        let data: Vec<Record> = Vec::new();
        let result = run(&data, &QueryState::default(), &FilterCriteria::new(), &view());
        assert_eq!(result.total(), 0);
        assert!(result.page_data().is_empty());
        assert_eq!(result.page_count(10), 0);
    }

    #[test]
    fn criteria_then_search() {
        let data = vec![
            Record::new(1, json!({"title": "Copper", "kind": "offer"}), 0),
            Record::new(2, json!({"title": "Copper", "kind": "demand"}), 0),
            Record::new(3, json!({"title": "Zinc", "kind": "offer"}), 0),
        ];
        let mut query = QueryState::default();
        query.set_query(QueryPatch::new().query("copper"));
        let criteria = FilterCriteria::new().with("kind", ["offer"]);

        let result = run(&data, &query, &criteria, &view());
        assert_eq!(ids(result.page_data()), vec![1]);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_rows() -> impl Strategy<Value = Vec<Record>> {
            prop::collection::vec(
                ("[a-dA-D ]{0,8}", prop::option::of(-50i64..50), 0usize..3),
                0..40,
            )
            .prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (title, price, kind))| {
                        let kind = ["offer", "demand", "kyc"][kind];
                        Record::new(
                            i as i64,
                            json!({
                                "title": title,
                                "price": price,
                                "kind": kind,
                            }),
                            0,
                        )
                    })
                    .collect()
            })
        }

        fn arb_query() -> impl Strategy<Value = QueryState> {
            ("[a-dA-D]{0,2}", 1usize..8, 1usize..6, any::<bool>()).prop_map(
                |(text, page_size, page, desc)| {
                    let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
                    let mut query = QueryState::new(page_size);
                    query.set_query(
                        QueryPatch::new()
                            .query(text)
                            .sort(Sort::new("price", order)),
                    );
                    query.set_query(QueryPatch::new().page(page));
                    query
                },
            )
        }

        proptest! {
            #[test]
            fn prop_every_row_matches_the_search(rows in arb_rows(), query in arb_query()) {
                let result = run(&rows, &query, &FilterCriteria::new(), &view());
                let needle = query.query.trim().to_lowercase();
                for row in result.all_filtered_and_sorted() {
                    let title = row.payload["title"].as_str().unwrap_or_default().to_lowercase();
                    let id = row.id.to_string();
                    prop_assert!(title.contains(&needle) || id.contains(&needle));
                }
            }

            #[test]
            fn prop_every_row_satisfies_the_criteria(
                rows in arb_rows(),
                query in arb_query(),
                kinds in prop::collection::btree_set(prop_oneof![Just("offer"), Just("kyc")], 1..3),
            ) {
                let criteria = FilterCriteria::new().with("kind", kinds.iter().copied());
                let result = run(&rows, &query, &criteria, &view());
                for row in result.all_filtered_and_sorted() {
                    let kind = row.payload["kind"].as_str().unwrap_or_default();
                    prop_assert!(kinds.contains(kind));
                }
            }

            #[test]
            fn prop_page_length_arithmetic(rows in arb_rows(), query in arb_query()) {
                let result = run(&rows, &query, &FilterCriteria::new(), &view());
                prop_assert!(result.total() <= rows.len());
                let remaining = result.total().saturating_sub(query.offset());
                prop_assert_eq!(result.page_data().len(), remaining.min(query.page_size));
            }

            #[test]
            fn prop_sorted_by_price_with_missing_last(rows in arb_rows(), query in arb_query()) {
                let result = run(&rows, &query, &FilterCriteria::new(), &view());
                let prices: Vec<Option<i64>> = result
                    .all_filtered_and_sorted()
                    .iter()
                    .map(|r| r.payload["price"].as_i64())
                    .collect();
                let desc = query.sort.order == Some(SortOrder::Desc);
                for pair in prices.windows(2) {
                    match (pair[0], pair[1]) {
                        (None, b) => prop_assert!(b.is_none()),
                        (Some(_), None) => {}
                        (Some(a), Some(b)) if desc => prop_assert!(a >= b),
                        (Some(a), Some(b)) => prop_assert!(a <= b),
                    }
                }
            }

            #[test]
            fn prop_run_is_idempotent(rows in arb_rows(), query in arb_query()) {
                let first = run(&rows, &query, &FilterCriteria::new(), &view());
                let second = run(&rows, &query, &FilterCriteria::new(), &view());
                prop_assert_eq!(
                    ids(first.all_filtered_and_sorted()),
                    ids(second.all_filtered_and_sorted())
                );
                prop_assert_eq!(ids(first.page_data()), ids(second.page_data()));
            }
        }
    }
}
