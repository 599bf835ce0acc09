//! JSON persistence for [`ValueTable`].
//!
//! A saved table records its action count and one entry per grid state, in
//! grid order:
//!
//! ```json
//! { "num_actions": 3, "entries": [ { "state": [-1.2, -0.07], "values": [0.0, -0.1, 0.0] } ] }
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::value_table::{StateValues, ValueTable};
use crate::discretizer::DiscreteState;
use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
struct SavedEntry {
    state: [f64; 2],
    values: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedTable {
    num_actions: usize,
    entries: Vec<SavedEntry>,
}

impl ValueTable {
    /// Fails with `CorruptData` when a value is not finite, since such a
    /// table would not load back.
    pub fn save(&self) -> Result<String> {
        if let Some((state, _)) = self
            .values
            .iter()
            .find(|(_, values)| values.iter().any(|v| !v.is_finite()))
        {
            return Err(Error::corrupt(format!(
                "state ({}, {}) holds a non-finite value",
                state.position, state.velocity
            )));
        }
        let saved = SavedTable {
            num_actions: self.num_actions,
            entries: self
                .values
                .iter()
                .map(|(state, values)| SavedEntry {
                    state: [state.position, state.velocity],
                    values: values.clone(),
                })
                .collect(),
        };
        Ok(serde_json::to_string(&saved)?)
    }

    /// Replaces the whole table with the one encoded in `blob`.
    ///
    /// The table is left untouched when the blob does not decode into a
    /// table with the same action count.
    pub fn load(&mut self, blob: &str) -> Result<()> {
        let saved: SavedTable =
            serde_json::from_str(blob).map_err(|e| Error::corrupt(e.to_string()))?;
        if saved.num_actions != self.num_actions {
            return Err(Error::corrupt(format!(
                "expected {} actions per state, blob has {}",
                self.num_actions, saved.num_actions
            )));
        }
        if saved.entries.is_empty() {
            return Err(Error::corrupt("blob holds no states"));
        }

        let mut values: StateValues =
            IndexMap::with_capacity_and_hasher(saved.entries.len(), Default::default());
        for entry in saved.entries {
            let [position, velocity] = entry.state;
            if !position.is_finite() || !velocity.is_finite() {
                return Err(Error::corrupt(format!(
                    "state ({position}, {velocity}) is not finite"
                )));
            }
            if entry.values.len() != self.num_actions {
                return Err(Error::corrupt(format!(
                    "state ({position}, {velocity}) has {} values, expected {}",
                    entry.values.len(),
                    self.num_actions
                )));
            }
            if entry.values.iter().any(|v| !v.is_finite()) {
                return Err(Error::corrupt(format!(
                    "state ({position}, {velocity}) holds a non-finite value"
                )));
            }
            let state = DiscreteState::new(position, velocity);
            if values.insert(state, entry.values).is_some() {
                return Err(Error::corrupt(format!(
                    "state ({position}, {velocity}) appears twice"
                )));
            }
        }
        debug!(states = values.len(), "value table decoded");
        self.values = values;
        Ok(())
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let blob = self.save()?;
        fs::write(path, blob)
            .map_err(|e| Error::io(format!("write value table to {}", path.display()), e))?;
        info!(path = %path.display(), states = self.len(), "value table saved");
        Ok(())
    }

    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let blob = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("read value table from {}", path.display()), e))?;
        self.load(&blob)?;
        info!(path = %path.display(), states = self.len(), "value table loaded");
        Ok(())
    }
}
