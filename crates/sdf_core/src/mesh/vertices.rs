//! Per-voxel vertex placement.
//!
//! Each grid sample is the minimum corner of one voxel. The voxel's twelve
//! canonical edges are gathered, their quadrics (when flagged as crossing)
//! summed, and the vertex placed at the sum's minimiser. Samples with no
//! contributing edge are left vertex-less. This pass writes to its own
//! pre-sized slot per sample, then a sequential compaction produces a dense
//! output array.

use std::sync::atomic::AtomicBool;

use glam::{DVec3, IVec3};
use rayon::prelude::*;

use super::edges::EdgeData;
use super::samples::SampleTable;
use crate::error::MesherError;
use crate::quadric::Quadric;

/// Sentinel written to `vertex_index` for a sample with no placed vertex.
pub const NO_VERTEX: i32 = -1;

pub struct VertexData {
  /// Dense array of placed vertex positions.
  pub positions: Vec<DVec3>,
  /// `sample_index -> vertex_index`, `NO_VERTEX` when the sample has none.
  pub vertex_index: Vec<i32>,
}

pub fn solve_vertices(table: &SampleTable, edges: &EdgeData, cancel: Option<&AtomicBool>) -> Result<VertexData, MesherError> {
  if let Some(c) = cancel {
    if c.load(std::sync::atomic::Ordering::Relaxed) {
      return Err(MesherError::Cancelled);
    }
  }

  let per_sample: Vec<Option<DVec3>> = (0..table.len())
    .into_par_iter()
    .map(|i| solve_voxel(table, edges, i))
    .collect();

  if let Some(c) = cancel {
    if c.load(std::sync::atomic::Ordering::Relaxed) {
      return Err(MesherError::Cancelled);
    }
  }

  let mut positions = Vec::new();
  let mut vertex_index = Vec::with_capacity(table.len());
  for slot in per_sample {
    match slot {
      Some(p) => {
        vertex_index.push(positions.len() as i32);
        positions.push(p);
      }
      None => vertex_index.push(NO_VERTEX),
    }
  }

  Ok(VertexData { positions, vertex_index })
}

fn solve_voxel(table: &SampleTable, edges: &EdgeData, i: usize) -> Option<DVec3> {
  let idx = table.indices[i];
  let mut sum = Quadric::ZERO;
  let mut contributed = false;

  for (corner, axis) in canonical_edges(idx) {
    let Some(pos) = table.position_of(corner) else {
      continue;
    };
    let slot = pos * 3 + axis;
    if edges.has_crossing[slot] {
      sum += edges.quadrics[slot];
      contributed = true;
    }
  }

  contributed.then(|| sum.minimizer())
}

/// The two axes other than `a`, in increasing order.
fn other_axes(a: usize) -> (usize, usize) {
  match a {
    0 => (1, 2),
    1 => (0, 2),
    _ => (0, 1),
  }
}

fn with_axis_set(mut v: IVec3, axis: usize, value: i32) -> IVec3 {
  match axis {
    0 => v.x = value,
    1 => v.y = value,
    _ => v.z = value,
  }
  v
}

/// The twelve canonical edges of the voxel whose minimum corner is `idx`:
/// for each axis, the four edges parallel to it identified by the two
/// perpendicular axes' offsets in `{0,1}`.
fn canonical_edges(idx: IVec3) -> [(IVec3, usize); 12] {
  let mut edges = [(idx, 0); 12];
  let mut n = 0;
  for axis in 0..3 {
    let (u, v) = other_axes(axis);
    for du in [0, 1] {
      for dv in [0, 1] {
        let corner = with_axis_set(with_axis_set(idx, u, idx_component(idx, u) + du), v, idx_component(idx, v) + dv);
        edges[n] = (corner, axis);
        n += 1;
      }
    }
  }
  edges
}

fn idx_component(v: IVec3, axis: usize) -> i32 {
  match axis {
    0 => v.x,
    1 => v.y,
    _ => v.z,
  }
}

#[cfg(test)]
#[path = "vertices_test.rs"]
mod vertices_test;
