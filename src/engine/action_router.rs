//! Reduces a dispatched [`Action`] against the current [`GridState`],
//! deciding both the next state and the [`EffectClass`] the lifecycle must
//! run afterwards. This function is the `Reducer` handed to `Store::new`.

use log::warn;

use crate::state::{Action, EffectClass};

use super::column_model::normalize_order;
use super::grid_state::GridState;

pub fn reduce(state: &GridState, action: &Action) -> (GridState, EffectClass) {
    let mut next = state.clone();

    let effect = match action {
        Action::SetSort(sort) => {
            next.sort = sort.clone();
            next.generation += 1;
            EffectClass::Requery
        }
        Action::SetFilterText(text) => {
            next.filter_text = text.clone();
            next.generation += 1;
            EffectClass::Requery
        }
        Action::SetColumnFilter { key, filter } => {
            match filter {
                Some(f) => {
                    next.column_filters.insert(key.clone(), f.clone());
                }
                None => {
                    next.column_filters.shift_remove(key);
                }
            }
            next.generation += 1;
            EffectClass::Requery
        }
        Action::ClearColumnFilters => {
            next.column_filters.clear();
            next.generation += 1;
            EffectClass::Requery
        }
        Action::SetColumnWidth { key, width } => {
            next.columns.width_overrides.insert(key.clone(), *width);
            EffectClass::RelayoutColumns
        }
        Action::SetColumnOrder(order) => {
            next.columns.order = normalize_order(order.clone(), &state.known_column_keys);
            EffectClass::RelayoutColumns
        }
        Action::SetColumnHidden { key, hidden } => {
            if *hidden {
                next.columns.hidden_keys.insert(key.clone());
            } else {
                next.columns.hidden_keys.shift_remove(key);
            }
            EffectClass::RelayoutColumns
        }
        Action::BatchSetColumnHidden { keys, hidden } => {
            for key in keys {
                if *hidden {
                    next.columns.hidden_keys.insert(key.clone());
                } else {
                    next.columns.hidden_keys.shift_remove(key);
                }
            }
            EffectClass::RelayoutColumns
        }
        Action::ResetColumnVisibility => {
            next.columns.hidden_keys.clear();
            EffectClass::RelayoutColumns
        }
        Action::SetTableWidth(width) => {
            next.table_width = Some(*width);
            EffectClass::RelayoutColumns
        }
        Action::SetMode(mode) => {
            next.mode = *mode;
            EffectClass::None
        }
        Action::SetColumnFrozen { key, frozen } => {
            // frozen_count pins a leading run of the resolved order, not
            // individual keys, so freezing pulls the threshold forward to
            // cover `key` and everything before it; unfreezing clears it.
            if *frozen {
                if let Some(pos) = next.columns.order.iter().position(|k| k == key) {
                    next.columns.frozen_count = next.columns.frozen_count.max(pos + 1);
                }
            } else {
                next.columns.frozen_count = 0;
            }
            EffectClass::RelayoutColumns
        }
        Action::SetScrollTop(top) => {
            next.scroll_top = *top;
            EffectClass::Rescroll
        }
        Action::SetViewportHeight(height) => {
            next.viewport_height = *height;
            EffectClass::Rescroll
        }
        Action::SetViewMode(mode) => {
            next.view_mode = *mode;
            next.generation += 1;
            EffectClass::Requery
        }
        Action::SetRowGroups(groups) => {
            next.row_groups = groups.clone();
            next.generation += 1;
            EffectClass::Requery
        }
        Action::ToggleGroupNode { .. } => {
            // The pivot tree itself lives outside the store (rebuilding it
            // per dispatch would throw away expansion state); toggling just
            // needs listeners to redraw.
            EffectClass::None
        }
        Action::SetTotalRows { total_rows, generation } => {
            if *generation != state.generation {
                warn!("dropping total-row count from stale generation {generation}");
            } else {
                next.total_rows = *total_rows;
            }
            EffectClass::None
        }
        Action::PageLoaded { generation, .. } => {
            if *generation != state.generation {
                warn!("dropping page response from stale generation {generation}");
            }
            EffectClass::None
        }
        Action::SummaryLoaded { summary, generation } => {
            if *generation != state.generation {
                warn!("dropping summary response from stale generation {generation}");
            } else {
                next.summary = summary.clone();
            }
            EffectClass::None
        }
        Action::FetchFailed { generation } => {
            if *generation != state.generation {
                warn!("dropping failure from stale generation {generation}");
            }
            EffectClass::None
        }
    };

    (next, effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Sort, SortDirection};

    #[test]
    fn set_sort_bumps_generation_and_requeries() {
        let state = GridState::default();
        let (next, effect) = reduce(
            &state,
            &Action::SetSort(Some(Sort {
                key: "a".to_string(),
                direction: SortDirection::Asc,
            })),
        );
        assert_eq!(effect, EffectClass::Requery);
        assert_eq!(next.generation, 1);
    }

    #[test]
    fn set_column_width_relayouts_without_requery() {
        let state = GridState::default();
        let (next, effect) = reduce(
            &state,
            &Action::SetColumnWidth {
                key: "a".to_string(),
                width: 120,
            },
        );
        assert_eq!(effect, EffectClass::RelayoutColumns);
        assert_eq!(next.columns.width_overrides.get("a"), Some(&120));
        assert_eq!(next.generation, 0);
    }

    #[test]
    fn set_column_order_drops_unknown_keys_and_appends_missing_known_ones() {
        let mut state = GridState::default();
        state.known_column_keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let (next, effect) = reduce(&state, &Action::SetColumnOrder(vec!["z".to_string(), "b".to_string()]));
        assert_eq!(effect, EffectClass::RelayoutColumns);
        assert_eq!(next.columns.order, vec!["b", "a", "c"]);
    }

    #[test]
    fn reset_column_visibility_clears_hidden_keys() {
        let mut state = GridState::default();
        state.columns.hidden_keys.insert("a".to_string());
        let (next, effect) = reduce(&state, &Action::ResetColumnVisibility);
        assert_eq!(effect, EffectClass::RelayoutColumns);
        assert!(next.columns.hidden_keys.is_empty());
    }

    #[test]
    fn set_mode_is_a_pure_state_change() {
        let state = GridState::default();
        let (next, effect) = reduce(&state, &Action::SetMode(crate::state::GridMode::Server));
        assert_eq!(effect, EffectClass::None);
        assert_eq!(next.mode, crate::state::GridMode::Server);
    }

    #[test]
    fn freezing_a_column_pins_everything_before_it() {
        let mut state = GridState::default();
        state.columns.order = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let (next, _) = reduce(
            &state,
            &Action::SetColumnFrozen {
                key: "b".to_string(),
                frozen: true,
            },
        );
        assert_eq!(next.columns.frozen_count, 2);
    }

    #[test]
    fn stale_generation_page_response_is_a_no_op_effect() {
        let mut state = GridState::default();
        state.generation = 3;
        let (_, effect) = reduce(
            &state,
            &Action::PageLoaded {
                page: 0,
                generation: 1,
            },
        );
        assert_eq!(effect, EffectClass::None);
    }
}
