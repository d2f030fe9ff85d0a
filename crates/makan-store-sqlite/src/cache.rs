//! Whole-table read snapshots.

use std::sync::Arc;

use makan_core::{restaurant::Restaurant, review::Review};
use parking_lot::RwLock;

/// A cached copy of one table, dropped whenever the table is written.
///
/// Each invalidation bumps a generation counter. A reader that missed the
/// cache records the generation before querying and only installs its rows
/// if no write happened in between, so a slow read can never resurrect a
/// snapshot older than the latest write.
pub(crate) struct Snapshot<T> {
  state: RwLock<State<T>>,
}

struct State<T> {
  generation: u64,
  rows:       Option<Arc<Vec<T>>>,
}

impl<T> Default for Snapshot<T> {
  fn default() -> Self {
    Self {
      state: RwLock::new(State { generation: 0, rows: None }),
    }
  }
}

impl<T> Snapshot<T> {
  /// The cached rows, or the generation to pass to [`Snapshot::fill`].
  pub fn get(&self) -> Result<Arc<Vec<T>>, u64> {
    let state = self.state.read();
    match &state.rows {
      Some(rows) => Ok(Arc::clone(rows)),
      None => Err(state.generation),
    }
  }

  /// Install freshly loaded rows unless the table changed since `generation`.
  pub fn fill(&self, generation: u64, rows: Vec<T>) -> Arc<Vec<T>> {
    let rows = Arc::new(rows);
    let mut state = self.state.write();
    if state.generation == generation {
      state.rows = Some(Arc::clone(&rows));
    }
    rows
  }

  pub fn invalidate(&self) {
    let mut state = self.state.write();
    state.generation += 1;
    state.rows = None;
  }
}

/// Snapshots for the tables read in full on every search.
#[derive(Default)]
pub(crate) struct TableCache {
  pub restaurants: Snapshot<Restaurant>,
  pub reviews:     Snapshot<Review>,
}
