use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use slab::Slab;

use super::actions::{Action, EffectClass};

/// A reducer: given the current state and a dispatched action, produces the
/// next state and the class of effect that follows it.
pub type Reducer<S> = Rc<dyn Fn(&S, &Action) -> (S, EffectClass)>;

/// A store listener: called with `(next, prev, action)` after every
/// dispatch, including ones that happened while an earlier dispatch was
/// still reducing (the queue in [`StoreState`] flattens those into
/// sequential calls).
///
/// `Rc`, not `Box`: `apply` clones the listener list out of the slab before
/// calling any of them, so a listener that dispatches reentrantly never
/// finds the store's `RefCell` already borrowed.
type Listener<S> = Rc<dyn Fn(&S, &S, &Action)>;

/// Shared, observable, reducer-driven state container.
///
/// Cloning a [`Store`] clones the handle, not the state: all clones observe
/// and mutate the same underlying [`StoreState`] through `Rc<RefCell<_>>`,
/// the same sharing model as a plain observable record store, generalized
/// here to go through a reducer instead of direct field writes.
pub struct Store<S: 'static> {
    inner: Rc<RefCell<StoreState<S>>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct StoreState<S> {
    state: Rc<S>,
    reduce: Reducer<S>,
    listeners: Slab<Listener<S>>,
    /// Actions queued because `dispatch` was called again while a previous
    /// dispatch was still running its listeners (a listener reacting to one
    /// action by dispatching another). Processed in order, depth-first
    /// dispatches never interleave with each other's listener calls.
    pending: VecDeque<Action>,
    dispatching: bool,
}

impl<S: 'static> Store<S> {
    pub fn new(initial: S, reduce: Reducer<S>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreState {
                state: Rc::new(initial),
                reduce,
                listeners: Slab::new(),
                pending: VecDeque::new(),
                dispatching: false,
            })),
        }
    }

    /// Current state snapshot. Cheap: `Rc::clone`.
    pub fn state(&self) -> Rc<S> {
        Rc::clone(&self.inner.borrow().state)
    }

    /// Lock the store for read access without cloning the state.
    pub fn read(&self) -> StoreReadGuard<'_, S> {
        StoreReadGuard {
            state: self.inner.borrow(),
        }
    }

    /// Register a listener, returning a guard that unregisters it on drop.
    pub fn subscribe(&self, listener: impl Fn(&S, &S, &Action) + 'static) -> StoreObserver<S> {
        let key = self
            .inner
            .borrow_mut()
            .listeners
            .insert(Rc::new(listener));
        StoreObserver {
            key,
            inner: Rc::clone(&self.inner),
        }
    }

    /// Run the reducer and notify listeners with `(next, prev, action)`.
    ///
    /// If called reentrantly from inside a listener, the action is queued
    /// and processed after the outer dispatch's listener pass completes, so
    /// no listener ever observes two actions "at once".
    pub fn dispatch(&self, action: Action) -> EffectClass {
        let mut state_ref = self.inner.borrow_mut();
        if state_ref.dispatching {
            state_ref.pending.push_back(action);
            return EffectClass::None;
        }
        state_ref.dispatching = true;
        drop(state_ref);

        let effect = self.apply(action);

        loop {
            let next = self.inner.borrow_mut().pending.pop_front();
            match next {
                Some(queued) => {
                    self.apply(queued);
                }
                None => break,
            }
        }
        self.inner.borrow_mut().dispatching = false;
        effect
    }

    fn apply(&self, action: Action) -> EffectClass {
        let (prev, reduce) = {
            let state_ref = self.inner.borrow();
            (Rc::clone(&state_ref.state), Rc::clone(&state_ref.reduce))
        };
        let (next_state, effect) = (reduce)(&prev, &action);
        let next = Rc::new(next_state);
        self.inner.borrow_mut().state = Rc::clone(&next);

        // Clone listeners out of the slab before calling any of them: a
        // listener that dispatches reentrantly must find no outstanding
        // `RefCell` borrow, only the `dispatching` flag queuing its action.
        let listeners: Vec<Listener<S>> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in &listeners {
            listener(&next, &prev, &action);
        }
        effect
    }
}

/// Read-only borrow of a [`Store`]'s current state.
pub struct StoreReadGuard<'a, S> {
    state: Ref<'a, StoreState<S>>,
}

impl<S> Deref for StoreReadGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        &self.state.state
    }
}

/// RAII handle for a registered listener; unregisters on drop.
pub struct StoreObserver<S: 'static> {
    key: usize,
    inner: Rc<RefCell<StoreState<S>>>,
}

impl<S> Drop for StoreObserver<S> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.inner.try_borrow_mut() {
            state.listeners.remove(self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter_reducer() -> Reducer<i32> {
        Rc::new(|state: &i32, action: &Action| match action {
            Action::SetScrollTop(delta) => (state + *delta as i32, EffectClass::Rescroll),
            _ => (*state, EffectClass::None),
        })
    }

    #[test]
    fn dispatch_updates_state_and_notifies_listeners() {
        let store = Store::new(0i32, counter_reducer());
        let seen = Rc::new(Cell::new((0, 0)));
        let seen_clone = Rc::clone(&seen);
        let _guard = store.subscribe(move |next, prev, _action| {
            seen_clone.set((*prev, *next));
        });

        let effect = store.dispatch(Action::SetScrollTop(5.0));
        assert_eq!(effect, EffectClass::Rescroll);
        assert_eq!(*store.read(), 5);
        assert_eq!(seen.get(), (0, 5));
    }

    #[test]
    fn dropped_observer_stops_receiving_updates() {
        let store = Store::new(0i32, counter_reducer());
        let calls = Rc::new(Cell::new(0));
        let calls_clone = Rc::clone(&calls);
        let guard = store.subscribe(move |_, _, _| calls_clone.set(calls_clone.get() + 1));
        store.dispatch(Action::SetScrollTop(1.0));
        drop(guard);
        store.dispatch(Action::SetScrollTop(1.0));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn reentrant_dispatch_is_queued_not_interleaved() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let reduce: Reducer<i32> = Rc::new(|state, _action| (state + 1, EffectClass::None));
        let store = Store::new(0i32, reduce);

        let order_clone = Rc::clone(&order);
        let store_clone = store.clone();
        let _guard = store.subscribe(move |next, _prev, _action| {
            order_clone.borrow_mut().push(*next);
            if *next == 1 {
                store_clone.dispatch(Action::SetScrollTop(0.0));
            }
        });

        store.dispatch(Action::SetScrollTop(0.0));
        assert_eq!(*order.borrow(), vec![1, 2]);
    }
}
