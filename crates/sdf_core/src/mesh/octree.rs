//! Adaptive octree subdivision.
//!
//! Recursively halves the cubic index-space domain, pruning any cell whose
//! centre sample is farther from zero than `prune_k` times the cell's half
//! diagonal, sound because the compiled function is an SDF and therefore
//! 1-Lipschitz, so no zero crossing can hide inside a cell that far from
//! the surface.

use std::sync::atomic::{AtomicBool, Ordering};

use glam::IVec3;

use super::types::{merge_sparse_grids, new_sparse_grid, GridCell, SparseGrid};
use crate::error::MesherError;
use crate::jit::CompiledFn;
use crate::config::MesherConfig;

/// Sample `f` over the whole domain at `config.resolution`, returning the
/// sparse set of grid points the adaptive subdivision decided to visit.
///
/// `cancel`, if set, is polled at every cell's recursion entry; once
/// observed set the call unwinds with `MesherError::Cancelled` without
/// surfacing a partial grid.
pub fn subdivide(f: &CompiledFn, config: &MesherConfig, cancel: Option<&AtomicBool>) -> Result<SparseGrid, MesherError> {
  let root = GridCell::new(IVec3::ZERO, IVec3::splat(config.resolution));
  subdivide_cell(root, f, config, cancel)
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
  cancel.map(|c| c.load(Ordering::Relaxed)).unwrap_or(false)
}

fn subdivide_cell(
  cell: GridCell,
  f: &CompiledFn,
  config: &MesherConfig,
  cancel: Option<&AtomicBool>,
) -> Result<SparseGrid, MesherError> {
  if !cell.is_valid() {
    return Err(MesherError::InvalidCell { min: cell.min, max: cell.max });
  }
  if is_cancelled(cancel) {
    return Err(MesherError::Cancelled);
  }

  let extent = cell.extent();
  if cell.voxel_count() <= config.leaf_voxel_budget || extent.x == 1 || extent.y == 1 || extent.z == 1 {
    return Ok(sample_leaf(cell, f, config));
  }

  let center = cell.min + extent / 2;
  let center_world = config.grid_to_world(center);
  let v = f.call(center_world.x, center_world.y, center_world.z);
  let p_min = config.grid_to_world(cell.min);
  let p_max = config.grid_to_world(cell.max);
  let half_diagonal = 0.5 * (p_max - p_min).length();

  if v.abs() > config.prune_k * half_diagonal {
    // 1-Lipschitz bound: no crossing can lie inside this cell.
    return Ok(new_sparse_grid());
  }

  let children = split_into_children(cell);
  subdivide_many(&children, f, config, cancel)
}

/// Every grid index `(i,j,k)` with `min <= (i,j,k) < max` is sampled and
/// inserted directly.
fn sample_leaf(cell: GridCell, f: &CompiledFn, config: &MesherConfig) -> SparseGrid {
  let mut grid = new_sparse_grid();
  for i in cell.min.x..cell.max.x {
    for j in cell.min.y..cell.max.y {
      for k in cell.min.z..cell.max.z {
        let idx = IVec3::new(i, j, k);
        let p = config.grid_to_world(idx);
        let value = f.call(p.x, p.y, p.z);
        grid.insert(idx, value);
      }
    }
  }
  grid
}

/// Split a cell into eight children by halving each axis, the last child on
/// each axis absorbing any odd remainder.
fn split_into_children(cell: GridCell) -> [GridCell; 8] {
  let mid = cell.min + cell.extent() / 2;
  let xs = [(cell.min.x, mid.x), (mid.x, cell.max.x)];
  let ys = [(cell.min.y, mid.y), (mid.y, cell.max.y)];
  let zs = [(cell.min.z, mid.z), (mid.z, cell.max.z)];

  let mut children = [GridCell::new(IVec3::ZERO, IVec3::ONE); 8];
  let mut n = 0;
  for &(x0, x1) in &xs {
    for &(y0, y1) in &ys {
      for &(z0, z1) in &zs {
        children[n] = GridCell::new(IVec3::new(x0, y0, z0), IVec3::new(x1, y1, z1));
        n += 1;
      }
    }
  }
  children
}

/// Recursively dispatch a slice of independent cells to the work-stealing
/// pool via `rayon::join`, merging each pair's sparse grids once both
/// halves return.
fn subdivide_many(
  cells: &[GridCell],
  f: &CompiledFn,
  config: &MesherConfig,
  cancel: Option<&AtomicBool>,
) -> Result<SparseGrid, MesherError> {
  if cells.len() == 1 {
    return subdivide_cell(cells[0], f, config, cancel);
  }
  let mid = cells.len() / 2;
  let (left, right) = cells.split_at(mid);
  let (left_result, right_result) = rayon::join(
    || subdivide_many(left, f, config, cancel),
    || subdivide_many(right, f, config, cancel),
  );
  let mut merged = left_result?;
  merge_sparse_grids(&mut merged, right_result?);
  Ok(merged)
}

#[cfg(test)]
#[path = "octree_test.rs"]
mod octree_test;
