//! Quad stitching.
//!
//! A sequential pass appending to a single quad vector whose ordering need
//! not be deterministic but whose membership must be the union over all
//! samples. For every recorded edge crossing, the four voxels sharing that
//! edge are looked up and a quad emitted, wound by the sign of the edge's
//! endpoints.

use glam::IVec3;

use super::edges::EdgeData;
use super::samples::SampleTable;
use super::types::{axis_unit, perpendicular_axes};
use super::vertices::{VertexData, NO_VERTEX};

pub fn stitch_quads(table: &SampleTable, edges: &EdgeData, vertices: &VertexData) -> Vec<[u32; 4]> {
  let mut quads = Vec::new();

  for i in 0..table.len() {
    let a0 = table.indices[i];
    let v0 = table.values[i];

    for a in 0..3 {
      let slot = i * 3 + a;
      if !edges.has_crossing[slot] {
        continue;
      }

      let (u, v) = perpendicular_axes(a);
      let eu = axis_unit(u);
      let ev = axis_unit(v);
      let corners = [a0, a0 - eu, a0 - eu - ev, a0 - ev];

      let Some(vertex_indices) = lookup_vertices(table, vertices, &corners) else {
        // Boundary voxel missing a neighbour's vertex: skip rather than
        // panic. This never happens in the interior; near the domain edge
        // the sparse grid can legitimately lack one of the four corners.
        continue;
      };

      let neighbor_pos = table.position_of(a0 + axis_unit(a));
      let v1 = neighbor_pos.map(|p| table.values[p]).unwrap_or(v0);

      let reverse = (v0 == 0.0 && v1 > 0.0) || (v1 == 0.0 && v0 < 0.0) || (v1 > 0.0 && v0 < 0.0);

      let quad = if reverse {
        [vertex_indices[0], vertex_indices[3], vertex_indices[2], vertex_indices[1]]
      } else {
        vertex_indices
      };
      quads.push(quad);
    }
  }

  quads
}

fn lookup_vertices(table: &SampleTable, vertices: &VertexData, corners: &[IVec3; 4]) -> Option<[u32; 4]> {
  let mut out = [0u32; 4];
  for (i, &corner) in corners.iter().enumerate() {
    let pos = table.position_of(corner)?;
    let vertex_index = vertices.vertex_index[pos];
    if vertex_index == NO_VERTEX {
      return None;
    }
    out[i] = vertex_index as u32;
  }
  Some(out)
}

#[cfg(test)]
#[path = "stitch_test.rs"]
mod stitch_test;
