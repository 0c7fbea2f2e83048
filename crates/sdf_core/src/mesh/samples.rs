//! Flattening the sparse octree grid into a dense, stably-ordered sample
//! array plus an index back into it.
//!
//! A stable order (sorted by `(x,y,z)`) is required for bit-for-bit
//! reproducibility across runs. This crate always sorts, since the cost is
//! a single `O(n log n)` pass relative to the `O(n)` phases it unblocks,
//! and it is the only way to keep repeated `mesh()` calls idempotent.

use std::collections::HashMap;

use glam::IVec3;

use super::types::{GridIndexBuildHasher, SparseGrid};

/// A flattened view of a `SparseGrid`: samples in a stable order, plus a
/// lookup from grid index back to array position.
pub struct SampleTable {
  pub indices: Vec<IVec3>,
  pub values: Vec<f64>,
  pub index_of: HashMap<IVec3, i32, GridIndexBuildHasher>,
}

impl SampleTable {
  pub fn len(&self) -> usize {
    self.indices.len()
  }

  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  /// Array position of `idx`, if it was sampled.
  #[inline]
  pub fn position_of(&self, idx: IVec3) -> Option<usize> {
    self.index_of.get(&idx).map(|&i| i as usize)
  }
}

pub fn flatten(grid: &SparseGrid) -> SampleTable {
  let mut entries: Vec<(IVec3, f64)> = grid.iter().map(|(&k, &v)| (k, v)).collect();
  entries.sort_unstable_by_key(|(idx, _)| (idx.x, idx.y, idx.z));

  let mut indices = Vec::with_capacity(entries.len());
  let mut values = Vec::with_capacity(entries.len());
  let mut index_of = HashMap::with_capacity_and_hasher(entries.len(), GridIndexBuildHasher::default());
  for (i, (idx, value)) in entries.into_iter().enumerate() {
    index_of.insert(idx, i as i32);
    indices.push(idx);
    values.push(value);
  }

  SampleTable { indices, values, index_of }
}

#[cfg(test)]
#[path = "samples_test.rs"]
mod samples_test;
