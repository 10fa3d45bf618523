//! Polymorphic data source: the one seam through which the rest of the
//! engine reads rows, independent of whether they live in memory or behind
//! a paged remote fetch.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use indexmap::{IndexMap, IndexSet};
use log::warn;

use crate::model::{cell_as_f64, stringify_cell, Column, Query, Row, SummaryType};
use crate::state::GridMode;

/// Result of `applyQuery`: the new filtered/sorted row count, and whether
/// the caller should reset its scroll position (always true: a new query
/// invalidates whatever window was being viewed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOutcome {
    pub total_rows: usize,
    pub should_reset_scroll: bool,
}

/// One page of remote rows plus the dataset's current total, as returned by
/// a host-supplied `fetch_page` closure.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub rows: Vec<Row>,
    pub total_rows: usize,
}

/// The capability set the rest of the engine depends on. `InMemoryStrategy`
/// and `PagedRemoteStrategy` are the two variants a bootstrap policy picks
/// between; callers otherwise treat this as an opaque data source.
pub trait DataStrategy {
    fn bootstrap(&self) -> LocalBoxFuture<'_, anyhow::Result<usize>>;
    fn get_row(&self, row_index: usize) -> Option<Row>;
    fn ensure_page_for_row(&self, row_index: usize) -> LocalBoxFuture<'static, ()>;
    fn apply_query(&self, query: Query) -> LocalBoxFuture<'_, anyhow::Result<QueryOutcome>>;
    fn get_summary(&self) -> LocalBoxFuture<'_, Option<Row>>;
    fn get_total_rows(&self) -> usize;
    fn get_filter_options(&self, key: &str) -> Vec<String>;
    /// Whether a host should treat this as the client or server grid mode,
    /// dispatched once by the Bootstrap Policy via `SET_MODE`.
    fn mode(&self) -> GridMode;
}

fn row_matches_filter_text(row: &Row, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    row.values()
        .any(|v| stringify_cell(v).to_lowercase().contains(&needle))
}

fn compare_cells(a: &serde_json::Value, b: &serde_json::Value) -> std::cmp::Ordering {
    match (cell_as_f64(a), cell_as_f64(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        _ => stringify_cell(a).cmp(&stringify_cell(b)),
    }
}

fn summarize(rows: &[&Row], columns: &[Column]) -> Row {
    let mut summary = Row::new();
    for column in columns {
        if column.summary_type == SummaryType::None {
            continue;
        }
        let values: Vec<f64> = rows
            .iter()
            .filter_map(|row| cell_as_f64(row.get(&column.key)?))
            .collect();
        let value = match column.summary_type {
            SummaryType::None => continue,
            SummaryType::Sum => values.iter().sum::<f64>(),
            SummaryType::Avg => {
                if values.is_empty() {
                    0.0
                } else {
                    (values.iter().sum::<f64>() / values.len() as f64 * 100.0).round() / 100.0
                }
            }
            SummaryType::Count => rows.len() as f64,
            SummaryType::Max => {
                if values.is_empty() {
                    0.0
                } else {
                    values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
                }
            }
            SummaryType::Min => {
                if values.is_empty() {
                    0.0
                } else {
                    values.iter().cloned().fold(f64::INFINITY, f64::min)
                }
            }
        };
        summary.insert(
            column.key.clone(),
            serde_json::Number::from_f64(value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        );
    }
    summary
}

struct InMemoryInner {
    full_data: Vec<Row>,
    columns: Vec<Column>,
    filtered_data: Vec<usize>,
    current_query: Query,
}

/// Holds the full dataset and a post-filter-sort view of its indices,
/// recomputed wholesale on every `apply_query`.
pub struct InMemoryStrategy {
    inner: RefCell<InMemoryInner>,
}

impl InMemoryStrategy {
    pub fn new(data: Vec<Row>, columns: Vec<Column>) -> Self {
        let filtered_data = (0..data.len()).collect();
        Self {
            inner: RefCell::new(InMemoryInner {
                full_data: data,
                columns,
                filtered_data,
                current_query: Query::default(),
            }),
        }
    }
}

impl DataStrategy for InMemoryStrategy {
    fn bootstrap(&self) -> LocalBoxFuture<'_, anyhow::Result<usize>> {
        let len = self.inner.borrow().full_data.len();
        Box::pin(async move { Ok(len) })
    }

    fn get_row(&self, row_index: usize) -> Option<Row> {
        let inner = self.inner.borrow();
        let idx = *inner.filtered_data.get(row_index)?;
        inner.full_data.get(idx).cloned()
    }

    fn ensure_page_for_row(&self, _row_index: usize) -> LocalBoxFuture<'static, ()> {
        Box::pin(async {})
    }

    fn apply_query(&self, query: Query) -> LocalBoxFuture<'_, anyhow::Result<QueryOutcome>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();

            let column_gates: Vec<&crate::props::FilterFn> =
                inner.columns.iter().filter_map(|c| c.filter.as_ref()).collect();

            let mut filtered: Vec<usize> = inner
                .full_data
                .iter()
                .enumerate()
                .filter(|(_, row)| row_matches_filter_text(row, &query.filter_text))
                .filter(|(_, row)| {
                    query
                        .column_filters
                        .iter()
                        .all(|(key, filter)| filter.matches(row.get(key).unwrap_or(&serde_json::Value::Null)))
                })
                .filter(|(_, row)| column_gates.iter().all(|gate| gate.apply(row)))
                .map(|(i, _)| i)
                .collect();

            if let Some(sort) = &query.sort {
                let full_data = &inner.full_data;
                let sorter = inner.columns.iter().find(|c| c.key == sort.key).and_then(|c| c.sorter.as_ref());
                filtered.sort_by(|a, b| {
                    let a_value = full_data[*a].get(&sort.key).unwrap_or(&serde_json::Value::Null);
                    let b_value = full_data[*b].get(&sort.key).unwrap_or(&serde_json::Value::Null);
                    let ord = match sorter {
                        Some(sorter) => sorter.cmp(a_value, b_value),
                        None => compare_cells(a_value, b_value),
                    };
                    match sort.direction {
                        crate::model::SortDirection::Asc => ord,
                        crate::model::SortDirection::Desc => ord.reverse(),
                    }
                });
            }

            let total_rows = filtered.len();
            inner.filtered_data = filtered;
            inner.current_query = query;

            Ok(QueryOutcome {
                total_rows,
                should_reset_scroll: true,
            })
        })
    }

    fn get_summary(&self) -> LocalBoxFuture<'_, Option<Row>> {
        Box::pin(async move {
            let inner = self.inner.borrow();
            if inner.columns.iter().all(|c| c.summary_type == SummaryType::None) {
                return None;
            }
            let rows: Vec<&Row> = inner
                .filtered_data
                .iter()
                .map(|&i| &inner.full_data[i])
                .collect();
            Some(summarize(&rows, &inner.columns))
        })
    }

    fn get_total_rows(&self) -> usize {
        self.inner.borrow().filtered_data.len()
    }

    fn get_filter_options(&self, key: &str) -> Vec<String> {
        let inner = self.inner.borrow();
        let mut seen = IndexSet::new();
        for row in &inner.full_data {
            if let Some(value) = row.get(key) {
                seen.insert(stringify_cell(value));
            }
        }
        seen.into_iter().collect()
    }

    fn mode(&self) -> GridMode {
        GridMode::Client
    }
}

pub type FetchPageFn = Rc<dyn Fn(usize, Query) -> LocalBoxFuture<'static, anyhow::Result<PageResponse>>>;
pub type FetchSummaryFn = Rc<dyn Fn(Query) -> LocalBoxFuture<'static, anyhow::Result<Row>>>;

type PageFetch = Shared<LocalBoxFuture<'static, Result<(), Rc<str>>>>;

struct PagedRemoteState {
    page_cache: IndexMap<usize, Rc<Vec<Row>>>,
    in_flight: HashMap<usize, PageFetch>,
    current_query: Query,
    total_rows: usize,
}

/// Holds a bounded, recency-ordered page cache plus in-flight fetch
/// deduplication, so a burst of `ensure_page_for_row` calls for the same
/// page during one scroll gesture triggers exactly one `fetch_page` call.
pub struct PagedRemoteStrategy {
    fetch_page: FetchPageFn,
    fetch_summary: Option<FetchSummaryFn>,
    page_size: usize,
    max_cached_pages: usize,
    state: Rc<RefCell<PagedRemoteState>>,
}

impl PagedRemoteStrategy {
    pub fn new(fetch_page: FetchPageFn, page_size: usize, max_cached_pages: usize) -> Self {
        Self {
            fetch_page,
            fetch_summary: None,
            page_size,
            max_cached_pages,
            state: Rc::new(RefCell::new(PagedRemoteState {
                page_cache: IndexMap::new(),
                in_flight: HashMap::new(),
                current_query: Query::default(),
                total_rows: 0,
            })),
        }
    }

    pub fn with_fetch_summary(mut self, fetch_summary: FetchSummaryFn) -> Self {
        self.fetch_summary = Some(fetch_summary);
        self
    }

    fn evict_if_over_capacity(state: &mut PagedRemoteState, max_cached_pages: usize) {
        while state.page_cache.len() > max_cached_pages {
            let victim = state
                .page_cache
                .keys()
                .find(|&&page| page != 0)
                .copied();
            match victim {
                Some(page) => {
                    state.page_cache.shift_remove(&page);
                }
                None => break,
            }
        }
    }

    fn start_fetch(&self, page: usize) -> PageFetch {
        let fetch_page = Rc::clone(&self.fetch_page);
        let state = Rc::clone(&self.state);
        let query = self.state.borrow().current_query.clone();
        let max_cached_pages = self.max_cached_pages;

        let fut: LocalBoxFuture<'static, Result<(), Rc<str>>> = Box::pin(async move {
            let result = fetch_page(page, query).await;
            let mut state_ref = state.borrow_mut();
            state_ref.in_flight.remove(&page);
            match result {
                Ok(response) => {
                    state_ref.total_rows = response.total_rows;
                    state_ref.page_cache.insert(page, Rc::new(response.rows));
                    Self::evict_if_over_capacity(&mut state_ref, max_cached_pages);
                    Ok(())
                }
                Err(err) => {
                    warn!("fetch_page({page}) failed: {err}");
                    Err(Rc::from(err.to_string()))
                }
            }
        });

        let shared = fut.shared();
        self.state.borrow_mut().in_flight.insert(page, shared.clone());
        shared
    }
}

impl DataStrategy for PagedRemoteStrategy {
    fn bootstrap(&self) -> LocalBoxFuture<'_, anyhow::Result<usize>> {
        Box::pin(async move {
            self.ensure_page_for_row(0).await;
            Ok(self.state.borrow().total_rows)
        })
    }

    fn get_row(&self, row_index: usize) -> Option<Row> {
        let page = row_index / self.page_size;
        let offset = row_index % self.page_size;
        let mut state = self.state.borrow_mut();
        let rows = state.page_cache.get(&page).cloned()?;
        // bump recency: move this page to the back of the eviction order.
        state.page_cache.shift_remove(&page);
        state.page_cache.insert(page, Rc::clone(&rows));
        rows.get(offset).cloned()
    }

    fn ensure_page_for_row(&self, row_index: usize) -> LocalBoxFuture<'static, ()> {
        let page = row_index / self.page_size;
        if self.state.borrow().page_cache.contains_key(&page) {
            return Box::pin(async {});
        }
        let existing = self.state.borrow().in_flight.get(&page).cloned();
        let fetch = existing.unwrap_or_else(|| self.start_fetch(page));
        Box::pin(async move {
            let _ = fetch.await;
        })
    }

    fn apply_query(&self, query: Query) -> LocalBoxFuture<'_, anyhow::Result<QueryOutcome>> {
        Box::pin(async move {
            {
                let mut state = self.state.borrow_mut();
                state.page_cache.clear();
                state.in_flight.clear();
                state.current_query = query;
            }
            self.ensure_page_for_row(0).await;
            let total_rows = self.state.borrow().total_rows;
            Ok(QueryOutcome {
                total_rows,
                should_reset_scroll: true,
            })
        })
    }

    fn get_summary(&self) -> LocalBoxFuture<'_, Option<Row>> {
        Box::pin(async move {
            let fetch_summary = self.fetch_summary.as_ref()?;
            let query = self.state.borrow().current_query.clone();
            match fetch_summary(query).await {
                Ok(row) => Some(row),
                Err(err) => {
                    warn!("fetch_summary failed: {err}");
                    None
                }
            }
        })
    }

    fn get_total_rows(&self) -> usize {
        self.state.borrow().total_rows
    }

    fn get_filter_options(&self, _key: &str) -> Vec<String> {
        // Distinct values across an unbounded remote dataset are a host
        // concern (typically its own lightweight query); the core only
        // promises this for the in-memory strategy.
        Vec::new()
    }

    fn mode(&self) -> GridMode {
        GridMode::Server
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn in_memory_sort_orders_rows_ascending() {
        let data = vec![
            row(&[("a", json!(3))]),
            row(&[("a", json!(1))]),
            row(&[("a", json!(2))]),
        ];
        let strategy = InMemoryStrategy::new(data, vec![Column::new("a", "A")]);
        let query = Query {
            sort: Some(crate::model::Sort {
                key: "a".to_string(),
                direction: crate::model::SortDirection::Asc,
            }),
            ..Default::default()
        };
        let outcome = block_on(strategy.apply_query(query)).unwrap();
        assert_eq!(outcome.total_rows, 3);
        assert_eq!(strategy.get_row(0).unwrap()["a"], json!(1));
        assert_eq!(strategy.get_row(2).unwrap()["a"], json!(3));
    }

    #[test]
    fn in_memory_global_filter_matches_substring_case_insensitively() {
        let data = vec![
            row(&[("name", json!("a"))]),
            row(&[("name", json!("bbb"))]),
            row(&[("name", json!("cc"))]),
        ];
        let strategy = InMemoryStrategy::new(data, vec![Column::new("name", "Name")]);
        let query = Query {
            filter_text: "BB".to_string(),
            ..Default::default()
        };
        let outcome = block_on(strategy.apply_query(query)).unwrap();
        assert_eq!(outcome.total_rows, 1);
        assert_eq!(strategy.get_row(0).unwrap()["name"], json!("bbb"));
    }

    #[test]
    fn in_memory_column_set_filter_preserves_order_of_remaining_rows() {
        let data = vec![
            row(&[("type", json!("A"))]),
            row(&[("type", json!("B"))]),
            row(&[("type", json!("C"))]),
            row(&[("type", json!("A"))]),
        ];
        let strategy = InMemoryStrategy::new(data, vec![Column::new("type", "Type")]);
        let mut column_filters = IndexMap::new();
        column_filters.insert(
            "type".to_string(),
            crate::model::ColumnFilter::Set {
                values: vec!["B".to_string(), "C".to_string()],
            },
        );
        let query = Query {
            column_filters,
            ..Default::default()
        };
        let outcome = block_on(strategy.apply_query(query)).unwrap();
        assert_eq!(outcome.total_rows, 2);
        assert_eq!(strategy.get_row(0).unwrap()["type"], json!("B"));
        assert_eq!(strategy.get_row(1).unwrap()["type"], json!("C"));
    }

    #[test]
    fn custom_sorter_overrides_the_default_comparison() {
        let data = vec![row(&[("a", json!("x2"))]), row(&[("a", json!("x10"))]), row(&[("a", json!("x1"))])];
        // numeric suffix order, not lexicographic string order.
        let column = Column::new("a", "A").sorter(crate::props::SorterFn::new(|a, b| {
            let parse = |v: &serde_json::Value| -> i64 {
                v.as_str().and_then(|s| s.trim_start_matches('x').parse().ok()).unwrap_or(0)
            };
            parse(a).cmp(&parse(b))
        }));
        let strategy = InMemoryStrategy::new(data, vec![column]);
        let query = Query {
            sort: Some(crate::model::Sort {
                key: "a".to_string(),
                direction: crate::model::SortDirection::Asc,
            }),
            ..Default::default()
        };
        block_on(strategy.apply_query(query)).unwrap();
        let ordered: Vec<_> = (0..3).map(|i| strategy.get_row(i).unwrap()["a"].clone()).collect();
        assert_eq!(ordered, vec![json!("x1"), json!("x2"), json!("x10")]);
    }

    #[test]
    fn custom_filter_gates_rows_in_addition_to_the_text_filter() {
        let data = vec![row(&[("active", json!(true))]), row(&[("active", json!(false))])];
        let column = Column::new("active", "Active").filter(crate::props::FilterFn::new(|row| {
            row.get("active") == Some(&json!(true))
        }));
        let strategy = InMemoryStrategy::new(data, vec![column]);
        let outcome = block_on(strategy.apply_query(Query::default())).unwrap();
        assert_eq!(outcome.total_rows, 1);
        assert_eq!(strategy.get_row(0).unwrap()["active"], json!(true));
    }

    #[test]
    fn max_summary_of_all_negative_column_is_not_clamped_to_zero() {
        let data = vec![row(&[("a", json!(-5))]), row(&[("a", json!(-1))])];
        let column = Column::new("a", "A").summary_type(SummaryType::Max);
        let strategy = InMemoryStrategy::new(data, vec![column]);
        block_on(strategy.apply_query(Query::default())).unwrap();
        let summary = block_on(strategy.get_summary()).unwrap();
        assert_eq!(summary["a"], json!(-1.0));
    }

    #[test]
    fn paged_remote_dedups_concurrent_fetches_for_the_same_page() {
        let calls = Rc::new(RefCell::new(0u32));
        let calls_clone = Rc::clone(&calls);
        let fetch_page: FetchPageFn = Rc::new(move |_page, _query| {
            *calls_clone.borrow_mut() += 1;
            Box::pin(async {
                Ok(PageResponse {
                    rows: vec![row(&[("a", json!(1))]); 50],
                    total_rows: 500,
                })
            })
        });
        let strategy = PagedRemoteStrategy::new(fetch_page, 50, 4);

        block_on(async {
            let futures = (0..5).map(|_| strategy.ensure_page_for_row(10));
            futures::future::join_all(futures).await;
        });

        assert_eq!(*calls.borrow(), 1);
        assert!(strategy.get_row(10).is_some());
    }

    #[test]
    fn paged_remote_evicts_least_recently_used_but_keeps_anchor_page() {
        let fetch_page: FetchPageFn = Rc::new(move |page, _query| {
            Box::pin(async move {
                Ok(PageResponse {
                    rows: vec![row(&[("a", json!(page))]); 10],
                    total_rows: 1000,
                })
            })
        });
        let strategy = PagedRemoteStrategy::new(fetch_page, 10, 2);
        block_on(async {
            strategy.ensure_page_for_row(0).await; // page 0, anchor
            strategy.ensure_page_for_row(10).await; // page 1
            strategy.ensure_page_for_row(20).await; // page 2, should evict page 1, not page 0
        });
        assert!(strategy.get_row(0).is_some());
        assert!(strategy.get_row(20).is_some());
    }
}
