//! Lazily grown action-value table

use std::collections::HashMap;

use super::state::StateKey;
use crate::game::Direction;

/// Estimated value of each action, indexed by [`Direction::index`]
pub type ActionValues = [f32; 4];

/// Mapping from state key to per-action value estimates
///
/// Rows are created on first touch with every action at zero, so a present
/// key always carries all four actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    rows: HashMap<StateKey, ActionValues>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of states seen so far
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, state: &StateKey) -> bool {
        self.rows.contains_key(state)
    }

    /// Row for `state`, if it has been seen
    pub fn get(&self, state: &StateKey) -> Option<&ActionValues> {
        self.rows.get(state)
    }

    /// Row for `state`, inserting an all-zero row if it is missing
    pub fn get_or_insert_default(&mut self, state: StateKey) -> &mut ActionValues {
        self.rows.entry(state).or_insert([0.0; 4])
    }

    /// Stored value of `action` in `state`; unseen entries read as zero
    pub fn value(&self, state: &StateKey, action: Direction) -> f32 {
        self.rows
            .get(state)
            .map(|row| row[action.index()])
            .unwrap_or(0.0)
    }

    /// Overwrite one entry, creating the row if needed
    pub fn set(&mut self, state: StateKey, action: Direction, value: f32) {
        self.get_or_insert_default(state)[action.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &ActionValues)> {
        self.rows.iter()
    }
}

impl FromIterator<(StateKey, ActionValues)> for QTable {
    fn from_iter<I: IntoIterator<Item = (StateKey, ActionValues)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Highest value in a row
pub fn max_value(values: &ActionValues) -> f32 {
    values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

/// Action with the highest value
///
/// Ties go to the earliest action in `Up, Down, Left, Right` order.
pub fn best_action(values: &ActionValues) -> Direction {
    let mut best = Direction::ALL[0];

    for direction in Direction::ALL.into_iter().skip(1) {
        if values[direction.index()] > values[best.index()] {
            best = direction;
        }
    }

    best
}
