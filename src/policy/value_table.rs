use fxhash::FxBuildHasher;
use indexmap::IndexMap;

use crate::discretizer::{DiscreteState, Discretizer};
use crate::error::{Error, Result};
use crate::utils::{argmax, max};

pub(crate) type StateValues = IndexMap<DiscreteState, Vec<f64>, FxBuildHasher>;

/// Action values for every state of a discretization grid.
///
/// The table is fully enumerated at construction: every grid state holds a
/// zero vector with one entry per action. Lookups of states outside the
/// grid fail instead of inserting a default.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    pub(crate) num_actions: usize,
    pub(crate) values: StateValues,
}

impl ValueTable {
    pub fn initialize(discretizer: &Discretizer, num_actions: usize) -> Result<Self> {
        if num_actions == 0 {
            return Err(Error::invalid_config("the action set must not be empty"));
        }
        let mut values: StateValues =
            IndexMap::with_capacity_and_hasher(discretizer.num_bins().pow(2), Default::default());
        for state in discretizer.states() {
            values.insert(state, vec![0.0; num_actions]);
        }
        Ok(Self {
            num_actions,
            values,
        })
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, state: &DiscreteState) -> bool {
        self.values.contains_key(state)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DiscreteState, &[f64])> {
        self.values.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn get(&self, state: &DiscreteState) -> Result<&[f64]> {
        self.values
            .get(state)
            .map(Vec::as_slice)
            .ok_or(Error::UnknownState {
                position: state.position,
                velocity: state.velocity,
            })
    }

    pub fn set(&mut self, state: &DiscreteState, action: usize, value: f64) -> Result<()> {
        let num_actions = self.num_actions;
        if action >= num_actions {
            return Err(Error::InvalidAction {
                action,
                num_actions,
            });
        }
        let values = self.values.get_mut(state).ok_or(Error::UnknownState {
            position: state.position,
            velocity: state.velocity,
        })?;
        values[action] = value;
        Ok(())
    }

    pub fn max_value(&self, state: &DiscreteState) -> Result<f64> {
        Ok(max(self.get(state)?))
    }

    pub fn best_action(&self, state: &DiscreteState) -> Result<usize> {
        Ok(argmax(self.get(state)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Bounds, ObservationSpace};

    fn discretizer(num_bins: usize) -> Discretizer {
        let space = ObservationSpace::new(Bounds::new(-1.2, 0.6), Bounds::new(-0.07, 0.07));
        Discretizer::new(num_bins, &space).unwrap()
    }

    #[test]
    fn initialize_enumerates_every_state_with_zeros() {
        let d = discretizer(4);
        let table = ValueTable::initialize(&d, 3).unwrap();
        assert_eq!(table.len(), 16);
        for state in d.states() {
            assert_eq!(table.get(&state).unwrap(), &[0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn get_unknown_state_fails() {
        let table = ValueTable::initialize(&discretizer(3), 3).unwrap();
        let err = table.get(&DiscreteState::new(0.123, 0.0)).unwrap_err();
        assert!(matches!(err, Error::UnknownState { .. }));
    }

    #[test]
    fn set_changes_a_single_entry() {
        let d = discretizer(3);
        let mut table = ValueTable::initialize(&d, 3).unwrap();
        let state = DiscreteState::new(-1.2, -0.07);
        table.set(&state, 2, 1.5).unwrap();
        assert_eq!(table.get(&state).unwrap(), &[0.0, 0.0, 1.5]);
        let other_entries = table
            .iter()
            .filter(|(s, _)| **s != state)
            .all(|(_, v)| v.iter().all(|x| *x == 0.0));
        assert!(other_entries);
    }

    #[test]
    fn set_rejects_out_of_range_action() {
        let mut table = ValueTable::initialize(&discretizer(3), 3).unwrap();
        let err = table
            .set(&DiscreteState::new(-1.2, -0.07), 3, 1.0)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAction {
                action: 3,
                num_actions: 3
            }
        ));
    }

    #[test]
    fn set_unknown_state_fails() {
        let mut table = ValueTable::initialize(&discretizer(3), 3).unwrap();
        let err = table.set(&DiscreteState::new(9.0, 9.0), 0, 1.0).unwrap_err();
        assert!(matches!(err, Error::UnknownState { .. }));
    }

    #[test]
    fn best_action_breaks_ties_by_lowest_index() {
        let mut table = ValueTable::initialize(&discretizer(3), 3).unwrap();
        let state = DiscreteState::new(-1.2, -0.07);
        assert_eq!(table.best_action(&state).unwrap(), 0);
        table.set(&state, 1, 2.0).unwrap();
        table.set(&state, 2, 2.0).unwrap();
        assert_eq!(table.best_action(&state).unwrap(), 1);
        assert_eq!(table.max_value(&state).unwrap(), 2.0);
    }

    #[test]
    fn empty_action_set_is_rejected() {
        assert!(matches!(
            ValueTable::initialize(&discretizer(3), 0),
            Err(Error::InvalidConfiguration { .. })
        ));
    }
}
