//! Decides, from configuration and (for a remote source) a first-page
//! probe, whether the grid runs against data already in memory or delegates
//! every query to the host's paged fetch function.

use std::rc::Rc;

use crate::model::{Column, Row};

use super::data_strategy::{DataStrategy, FetchPageFn, FetchSummaryFn, InMemoryStrategy, PagedRemoteStrategy};

/// The data source a grid is configured against.
pub enum DataSource {
    InMemory {
        data: Vec<Row>,
        columns: Vec<Column>,
    },
    Remote {
        fetch_page: FetchPageFn,
        fetch_summary: Option<FetchSummaryFn>,
        page_size: usize,
        max_cached_pages: usize,
        columns: Vec<Column>,
    },
}

pub struct BootstrapPolicy;

impl BootstrapPolicy {
    /// Builds and bootstraps the data strategy for `source`. A remote
    /// source whose first-page probe reveals a dataset that both fits
    /// under `client_side_max_rows` and arrived whole in that first page is
    /// promoted to an in-memory strategy, so later sorts and filters never
    /// round-trip to the host again.
    pub async fn choose(source: DataSource, client_side_max_rows: usize) -> anyhow::Result<Rc<dyn DataStrategy>> {
        match source {
            DataSource::InMemory { data, columns } => {
                let strategy = InMemoryStrategy::new(data, columns);
                strategy.bootstrap().await?;
                Ok(Rc::new(strategy))
            }
            DataSource::Remote {
                fetch_page,
                fetch_summary,
                page_size,
                max_cached_pages,
                columns,
            } => {
                let mut remote = PagedRemoteStrategy::new(fetch_page, page_size, max_cached_pages);
                if let Some(fetch_summary) = fetch_summary {
                    remote = remote.with_fetch_summary(fetch_summary);
                }
                let total_rows = remote.bootstrap().await?;

                if total_rows <= client_side_max_rows && total_rows <= page_size {
                    let rows: Vec<Row> = (0..total_rows).filter_map(|i| remote.get_row(i)).collect();
                    return Ok(Rc::new(InMemoryStrategy::new(rows, columns)));
                }

                Ok(Rc::new(remote))
            }
        }
    }
}
