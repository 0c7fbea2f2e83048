//! Shared grid/mesh data types for the adaptive dual-contouring mesher.

use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hasher};

use glam::{DVec3, IVec3};

/// An inclusive-lower, exclusive-upper integer AABB in index space.
/// `max - min` must be `>= 1` on every axis; a cell violating that is a
/// programming error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
  pub min: IVec3,
  pub max: IVec3,
}

impl GridCell {
  pub fn new(min: IVec3, max: IVec3) -> Self {
    Self { min, max }
  }

  /// `max - min`: the cell's extent in index space.
  #[inline]
  pub fn extent(&self) -> IVec3 {
    self.max - self.min
  }

  /// `true` iff every axis has a positive extent.
  #[inline]
  pub fn is_valid(&self) -> bool {
    let e = self.extent();
    e.x >= 1 && e.y >= 1 && e.z >= 1
  }

  /// Total number of grid points the cell spans.
  #[inline]
  pub fn voxel_count(&self) -> i64 {
    let e = self.extent();
    e.x as i64 * e.y as i64 * e.z as i64
  }
}

/// Well-mixed hasher for `IVec3` grid-index keys. `FxHash`-style
/// multiplicative mixing, specialised to the one key shape this crate ever
/// hashes.
#[derive(Default)]
pub struct GridIndexHasher {
  state: u64,
}

/// 2^64 / golden ratio, the same odd multiplicative constant `rustc`'s
/// `FxHasher` and similar "fast, well-distributed for small integer keys"
/// hashers use.
const GOLDEN_RATIO: u64 = 0x9E3779B97F4A7C15;

impl Hasher for GridIndexHasher {
  fn write(&mut self, bytes: &[u8]) {
    for &b in bytes {
      self.state = (self.state.rotate_left(5) ^ b as u64).wrapping_mul(GOLDEN_RATIO);
    }
  }

  fn write_i32(&mut self, i: i32) {
    self.state = (self.state.rotate_left(5) ^ i as u32 as u64).wrapping_mul(GOLDEN_RATIO);
  }

  fn finish(&self) -> u64 {
    self.state
  }
}

pub type GridIndexBuildHasher = BuildHasherDefault<GridIndexHasher>;

/// `ivec3 -> value` map built during octree subdivision. Keys are unique;
/// merging two shards that disagree on a key is a programming error, never
/// a silently-resolved conflict.
pub type SparseGrid = HashMap<IVec3, f64, GridIndexBuildHasher>;

pub fn new_sparse_grid() -> SparseGrid {
  HashMap::with_hasher(GridIndexBuildHasher::default())
}

/// Merge `from` into `to`, asserting no key collides: duplicate keys across
/// merged shards are an invariant violation, not an expected error.
pub fn merge_sparse_grids(to: &mut SparseGrid, from: SparseGrid) {
  for (k, v) in from {
    let prior = to.insert(k, v);
    debug_assert!(
      prior.is_none(),
      "sparse grid merge collided on grid index {k:?}; subdivision should never sample the same index twice"
    );
  }
}

/// Final polygonised output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadMesh {
  pub vertices: Vec<DVec3>,
  pub quads: Vec<[u32; 4]>,
}

impl QuadMesh {
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty() && self.quads.is_empty()
  }
}

/// Unit offset along axis `a` (0 = x, 1 = y, 2 = z).
#[inline]
pub fn axis_unit(a: usize) -> IVec3 {
  match a {
    0 => IVec3::X,
    1 => IVec3::Y,
    _ => IVec3::Z,
  }
}

/// Perpendicular-axis table: for an edge along axis `a`, the two axes
/// `(u, v)` whose offsets identify the four voxels sharing that edge.
#[inline]
pub fn perpendicular_axes(a: usize) -> (usize, usize) {
  match a {
    0 => (2, 1),
    1 => (0, 2),
    _ => (1, 0),
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
