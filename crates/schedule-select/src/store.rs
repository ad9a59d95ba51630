//! An owning adapter around the pure reducer.
//!
//! [`SelectionStore`] holds the latest state, applies actions one at a time
//! and republishes the descriptor to subscribers only when it actually
//! changes. It is the single writer the reducer assumes.

use std::fmt;

use crate::action::{reduce, SelectionAction};
use crate::config::SelectionConfig;
use crate::state::SelectionState;
use crate::synthesize::SelectionValue;

type Listener = Box<dyn FnMut(Option<&SelectionValue>)>;

pub struct SelectionStore {
    state: SelectionState,
    listeners: Vec<Listener>,
}

impl SelectionStore {
    pub fn new(config: SelectionConfig) -> Self {
        Self::from_state(SelectionState::new(config))
    }

    pub fn from_state(state: SelectionState) -> Self {
        Self {
            state,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn value(&self) -> Option<&SelectionValue> {
        self.state.selection_value()
    }

    /// Register a callback invoked after every change of the descriptor.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(Option<&SelectionValue>) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Apply an action. Returns `true` when the descriptor changed.
    pub fn dispatch(&mut self, action: &SelectionAction) -> bool {
        let next = reduce(&self.state, action);
        let changed = next.selection_value() != self.state.selection_value();
        self.state = next;
        if changed {
            let value = self.state.selection_value();
            for listener in &mut self.listeners {
                listener(value);
            }
        }
        changed
    }
}

impl fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
