use std::collections::HashMap;

use glam::{DVec3, IVec3};

use super::*;
use crate::mesh::samples::SampleTable;
use crate::mesh::types::GridIndexBuildHasher;
use crate::quadric::Quadric;

fn table_with(entries: &[(IVec3, f64)]) -> SampleTable {
  let mut indices = Vec::new();
  let mut values = Vec::new();
  let mut index_of = HashMap::with_hasher(GridIndexBuildHasher::default());
  for (i, &(idx, value)) in entries.iter().enumerate() {
    index_of.insert(idx, i as i32);
    indices.push(idx);
    values.push(value);
  }
  SampleTable { indices, values, index_of }
}

#[test]
fn single_crossing_emits_one_correctly_wound_quad() {
  let table = table_with(&[
    (IVec3::new(1, 1, 0), -0.5), // a0
    (IVec3::new(1, 0, 0), -0.5), // a0 - e_y
    (IVec3::new(0, 0, 0), -0.5), // a0 - e_y - e_x
    (IVec3::new(0, 1, 0), -0.5), // a0 - e_x
    (IVec3::new(1, 1, 1), 0.5),  // neighbour along +z
  ]);

  let mut has_crossing = vec![false; table.len() * 3];
  has_crossing[0 * 3 + 2] = true;
  let quadrics = vec![Quadric::ZERO; table.len() * 3];
  let edges = EdgeData { quadrics, has_crossing };

  let positions = vec![DVec3::ZERO; 4];
  let vertex_index = vec![0, 1, 2, 3, NO_VERTEX];
  let vertices = VertexData { positions, vertex_index };

  let quads = stitch_quads(&table, &edges, &vertices);
  assert_eq!(quads.len(), 1);
  // v0 < 0 and v1 > 0 reverses winding: [a0, a0-ev, a0-eu-ev, a0-eu].
  assert_eq!(quads[0], [0, 3, 2, 1]);
}

#[test]
fn missing_neighbor_vertex_is_skipped_not_panicked() {
  let table = table_with(&[(IVec3::new(1, 1, 0), -0.5), (IVec3::new(1, 1, 1), 0.5)]);
  let mut has_crossing = vec![false; table.len() * 3];
  has_crossing[0 * 3 + 2] = true;
  let edges = EdgeData {
    quadrics: vec![Quadric::ZERO; table.len() * 3],
    has_crossing,
  };
  let vertices = VertexData {
    positions: vec![DVec3::ZERO],
    vertex_index: vec![0, NO_VERTEX],
  };

  let quads = stitch_quads(&table, &edges, &vertices);
  assert!(quads.is_empty());
}
