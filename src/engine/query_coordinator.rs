//! Sequences what happens when sort, filter or row-group state changes:
//! reset scroll to the top, re-run the query against the data strategy,
//! refresh the viewport, and asynchronously refresh the summary row behind
//! a generation check so a slow response from a superseded query can never
//! clobber a newer one's result.

use crate::element_factory::ElementFactory;
use crate::model::ResolvedColumn;
use crate::state::{Action, Store};

use super::data_strategy::DataStrategy;
use super::grid_state::GridState;
use super::viewport::Viewport;

/// Runs one `applyQuery` cycle. Always resets scroll to the top first: a
/// new query invalidates whatever window was being viewed, so there is
/// nothing worth preserving the old scroll position for.
pub async fn apply_query<EF: ElementFactory>(
    store: &Store<GridState>,
    strategy: &dyn DataStrategy,
    viewport: &mut Viewport<EF>,
    resolved_columns: &[ResolvedColumn],
) -> anyhow::Result<()> {
    let generation = store.state().generation;
    store.dispatch(Action::SetScrollTop(0.0));

    let query = store.state().query();
    let outcome = strategy.apply_query(query).await?;

    store.dispatch(Action::SetTotalRows {
        total_rows: outcome.total_rows,
        generation,
    });

    let viewport_height = store.state().viewport_height;
    let pending = viewport.update_visible_rows(
        strategy,
        0.0,
        viewport_height,
        outcome.total_rows,
        generation,
        resolved_columns,
    );
    for fut in pending {
        fut.await;
    }
    viewport.refresh(strategy, generation, resolved_columns);

    refresh_summary(store, strategy, generation).await;
    Ok(())
}

async fn refresh_summary(store: &Store<GridState>, strategy: &dyn DataStrategy, generation: u64) {
    let summary = strategy.get_summary().await;
    store.dispatch(Action::SummaryLoaded { summary, generation });
}
