//! Tabular action-value storage

use std::collections::HashMap;

use crate::{Action, State};

/// Action-value table keyed by `(state, action)`
///
/// Absent entries read as 0.0. Entries are created on first write and never
/// removed.
#[derive(Debug, Clone)]
pub struct QTable<S, A> {
    values: HashMap<(S, A), f64>,
}

impl<S: State, A: Action> QTable<S, A> {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Q(state, action)
    #[must_use]
    pub fn get(&self, state: &S, action: &A) -> f64 {
        self.values
            .get(&(state.clone(), *action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Overwrite Q(state, action)
    pub fn set(&mut self, state: S, action: A, value: f64) {
        self.values.insert((state, action), value);
    }

    /// Largest value among `actions` in `state`, `None` for no actions
    #[must_use]
    pub fn max_value(&self, state: &S, actions: &[A]) -> Option<f64> {
        actions
            .iter()
            .map(|a| self.get(state, a))
            .reduce(f64::max)
    }

    /// Every action in `actions` attaining the maximum value in `state`
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn argmax(&self, state: &S, actions: &[A]) -> Vec<A> {
        let Some(best) = self.max_value(state, actions) else {
            return Vec::new();
        };
        actions
            .iter()
            .copied()
            .filter(|a| self.get(state, a) == best)
            .collect()
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been written yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: State, A: Action> Default for QTable<S, A> {
    fn default() -> Self {
        Self::new()
    }
}
