//! Adaptive dual-contouring mesher.
//!
//! Polygonises the zero level set of a compiled scalar field into a quad
//! mesh: octree subdivision locates candidate samples, the edge pass finds
//! zero crossings and fits quadrics, the vertex pass places one vertex per
//! voxel, and stitching connects them into quads.

use std::sync::atomic::AtomicBool;

use crate::config::MesherConfig;
use crate::error::MesherError;
use crate::jit::CompiledFn;

mod edges;
mod octree;
mod samples;
mod stitch;
pub mod types;
mod vertices;

#[cfg(test)]
mod test_support;

pub use types::QuadMesh;

/// Polygonise `f`'s zero level set per `config` into a quad mesh.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(f, config)))]
pub fn mesh(f: &CompiledFn, config: &MesherConfig) -> Result<QuadMesh, MesherError> {
  mesh_cancellable(f, config, None)
}

/// Same as [`mesh`], but polls `cancel` at each parallel phase's task
/// boundary. If set, the in-flight call unwinds with
/// `MesherError::Cancelled` and surfaces no partial mesh.
pub fn mesh_cancellable(f: &CompiledFn, config: &MesherConfig, cancel: Option<&AtomicBool>) -> Result<QuadMesh, MesherError> {
  #[cfg(feature = "tracing")]
  let _subdivide_span = tracing::info_span!("octree_subdivision").entered();
  let grid = octree::subdivide(f, config, cancel)?;
  #[cfg(feature = "tracing")]
  drop(_subdivide_span);

  let table = samples::flatten(&grid);
  if table.is_empty() {
    return Ok(QuadMesh::default());
  }

  #[cfg(feature = "tracing")]
  let _edges_span = tracing::info_span!("edge_crossing_detection", samples = table.len()).entered();
  let edge_data = edges::compute_edges(&table, f, config, cancel)?;
  #[cfg(feature = "tracing")]
  drop(_edges_span);

  #[cfg(feature = "tracing")]
  let _vertex_span = tracing::info_span!("vertex_solve").entered();
  let vertex_data = vertices::solve_vertices(&table, &edge_data, cancel)?;
  #[cfg(feature = "tracing")]
  drop(_vertex_span);

  #[cfg(feature = "tracing")]
  let _stitch_span = tracing::info_span!("quad_stitching", vertices = vertex_data.positions.len()).entered();
  let quads = stitch::stitch_quads(&table, &edge_data, &vertex_data);
  #[cfg(feature = "tracing")]
  drop(_stitch_span);

  Ok(QuadMesh {
    vertices: vertex_data.positions,
    quads,
  })
}
