//! Two-phase construction: [`Lifecycle::new`] synchronously validates
//! configuration and builds a placeholder store and viewport; the returned
//! future does the async half (choosing and loading the data strategy) and
//! flushes whatever was dispatched in between.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::element_factory::ElementFactory;
use crate::error::{GridError, GridResult};
use crate::model::Column;
use crate::state::{Action, EffectClass, KeyValueStore, PersistenceAdapter, Store};

use super::action_router;
use super::bootstrap::{BootstrapPolicy, DataSource};
use super::column_manager;
use super::column_model::{self, ColumnState};
use super::data_strategy::DataStrategy;
use super::grid_state::GridState;
use super::query_coordinator;
use super::scroller::Scroller;
use super::viewport::Viewport;

pub struct GridConfig<EF: ElementFactory> {
    pub columns: Vec<Column>,
    pub row_height: u32,
    pub overscan: usize,
    pub client_side_max_rows: usize,
    pub source: DataSource,
    pub element_factory: EF,
    pub persistence: Option<(Rc<dyn KeyValueStore>, String)>,
}

impl<EF: ElementFactory> GridConfig<EF> {
    pub fn new(columns: Vec<Column>, source: DataSource, element_factory: EF) -> Self {
        Self {
            columns,
            row_height: 32,
            overscan: 4,
            client_side_max_rows: 10_000,
            source,
            element_factory,
            persistence: None,
        }
    }

    pub fn row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn client_side_max_rows(mut self, client_side_max_rows: usize) -> Self {
        self.client_side_max_rows = client_side_max_rows;
        self
    }

    /// Restores column widths/order/table width from `store` under
    /// `namespace` before the first dispatch, and saves changes back to it
    /// on every layout-affecting action thereafter.
    pub fn persistence(mut self, store: impl KeyValueStore + 'static, namespace: impl Into<String>) -> Self {
        self.persistence = Some((Rc::new(store), namespace.into()));
        self
    }
}

/// Owns the store, the resolved column declarations and the viewport
/// across the grid's lifetime. `dispatch` works immediately for layout and
/// scroll actions; actions dispatched before bootstrap completes are
/// queued and replayed once the data strategy is ready.
pub struct Lifecycle<EF: ElementFactory> {
    pub store: Store<GridState>,
    columns: Vec<Column>,
    strategy: Rc<RefCell<Option<Rc<dyn DataStrategy>>>>,
    viewport: Rc<RefCell<Viewport<EF>>>,
    ready: Rc<RefCell<bool>>,
    pending: Rc<RefCell<VecDeque<Action>>>,
    persistence: Option<Rc<PersistenceAdapter>>,
}

impl<EF: ElementFactory + 'static> Lifecycle<EF> {
    pub fn new(config: GridConfig<EF>) -> GridResult<(Self, LocalBoxFuture<'static, anyhow::Result<()>>)> {
        if config.columns.is_empty() {
            return Err(GridError::EmptyColumns);
        }
        column_model::check_unique_keys(&config.columns)?;

        let persistence = config
            .persistence
            .map(|(store, namespace)| Rc::new(PersistenceAdapter::new(store, namespace)));

        let known_column_keys: Vec<String> = config.columns.iter().map(|c| c.key.clone()).collect();
        let mut order = known_column_keys.clone();
        let mut width_overrides = indexmap::IndexMap::new();
        let mut table_width = None;
        if let Some(adapter) = &persistence {
            if let Some(persisted_order) = adapter.load_column_order() {
                order = column_model::normalize_order(persisted_order, &known_column_keys);
            }
            if let Some(persisted_widths) = adapter.load_column_widths() {
                width_overrides = persisted_widths.into_iter().collect();
            }
            table_width = adapter.load_table_width();
        }

        let initial = GridState {
            known_column_keys,
            table_width,
            columns: ColumnState {
                order,
                width_overrides,
                ..ColumnState::default()
            },
            ..GridState::default()
        };
        let store = Store::new(initial, Rc::new(action_router::reduce));

        let scroller = Scroller::new(config.row_height, config.overscan);
        let viewport = Rc::new(RefCell::new(Viewport::new(scroller, config.element_factory)));

        let strategy: Rc<RefCell<Option<Rc<dyn DataStrategy>>>> = Rc::new(RefCell::new(None));
        let ready = Rc::new(RefCell::new(false));
        let pending: Rc<RefCell<VecDeque<Action>>> = Rc::new(RefCell::new(VecDeque::new()));

        let lifecycle = Self {
            store: store.clone(),
            columns: config.columns,
            strategy: Rc::clone(&strategy),
            viewport: Rc::clone(&viewport),
            ready: Rc::clone(&ready),
            pending: Rc::clone(&pending),
            persistence,
        };

        let bootstrap_store = store.clone();
        let client_side_max_rows = config.client_side_max_rows;
        let source = config.source;
        let bootstrap: LocalBoxFuture<'static, anyhow::Result<()>> = Box::pin(async move {
            let loaded = BootstrapPolicy::choose(source, client_side_max_rows).await?;
            let total_rows = loaded.get_total_rows();
            let generation = bootstrap_store.state().generation;
            bootstrap_store.dispatch(Action::SetTotalRows { total_rows, generation });
            bootstrap_store.dispatch(Action::SetMode(loaded.mode()));

            *strategy.borrow_mut() = Some(loaded);
            *ready.borrow_mut() = true;

            let drained: Vec<Action> = pending.borrow_mut().drain(..).collect();
            for action in drained {
                bootstrap_store.dispatch(action);
            }
            Ok(())
        });

        Ok((lifecycle, bootstrap))
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Dispatches `action`, returning a future for whatever async tail the
    /// resulting effect needs (fetching a page, re-running a query). `None`
    /// means the effect, if any, already ran synchronously, or the action
    /// was queued because bootstrap has not completed yet.
    pub fn dispatch(&self, action: Action) -> Option<LocalBoxFuture<'static, ()>> {
        if !*self.ready.borrow() {
            self.pending.borrow_mut().push_back(action);
            return None;
        }
        let effect = self.store.dispatch(action);
        self.run_effect(effect)
    }

    fn run_effect(&self, effect: EffectClass) -> Option<LocalBoxFuture<'static, ()>> {
        let strategy = self.strategy.borrow().clone()?;
        match effect {
            EffectClass::None => None,
            EffectClass::Requery => {
                let store = self.store.clone();
                let viewport = Rc::clone(&self.viewport);
                let resolved = column_model::resolve(&self.columns, &self.store.state().columns);
                Some(Box::pin(async move {
                    let mut viewport = viewport.borrow_mut();
                    let _ = query_coordinator::apply_query(&store, strategy.as_ref(), &mut viewport, &resolved).await;
                }))
            }
            EffectClass::RelayoutColumns => {
                let state = self.store.state();
                let resolved = column_model::resolve(&self.columns, &state.columns);
                column_manager::apply(self.viewport.borrow_mut().element_factory_mut(), &resolved);
                if let Some(adapter) = &self.persistence {
                    let widths: Vec<(String, u32)> = state
                        .columns
                        .width_overrides
                        .iter()
                        .map(|(k, v)| (k.clone(), *v))
                        .collect();
                    adapter.store_column_widths(&widths);
                    adapter.store_column_order(&state.columns.order);
                    if let Some(width) = state.table_width {
                        adapter.store_table_width(width);
                    }
                }
                None
            }
            EffectClass::Rescroll => {
                let state = self.store.state();
                let generation = state.generation;
                let resolved = column_model::resolve(&self.columns, &state.columns);
                let pending = self.viewport.borrow_mut().update_visible_rows(
                    strategy.as_ref(),
                    state.scroll_top,
                    state.viewport_height,
                    state.total_rows,
                    generation,
                    &resolved,
                );
                if pending.is_empty() {
                    return None;
                }
                let viewport = Rc::clone(&self.viewport);
                Some(Box::pin(async move {
                    for fut in pending {
                        fut.await;
                    }
                    viewport.borrow_mut().refresh(strategy.as_ref(), generation, &resolved);
                }))
            }
        }
    }
}
