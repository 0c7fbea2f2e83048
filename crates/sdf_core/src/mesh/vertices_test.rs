use glam::DVec3;

use super::*;
use crate::config::MesherConfig;
use crate::mesh::edges::compute_edges;
use crate::mesh::octree::subdivide;
use crate::mesh::samples::flatten;
use crate::mesh::test_support::compile_sphere;

#[test]
fn sphere_voxels_near_surface_get_vertices() {
  let f = compile_sphere(DVec3::ZERO, 1.0);
  let config = MesherConfig::new(24);
  let grid = subdivide(&f, &config, None).unwrap();
  let table = flatten(&grid);
  let edges = compute_edges(&table, &f, &config, None).unwrap();
  let vertices = solve_vertices(&table, &edges, None).unwrap();

  assert!(!vertices.positions.is_empty());
  for &idx in &vertices.vertex_index {
    if idx != NO_VERTEX {
      let p = vertices.positions[idx as usize];
      assert!(p.is_finite());
    }
  }
}

#[test]
fn canonical_edges_cover_all_twelve_with_correct_axes() {
  let idx = glam::IVec3::new(3, 4, 5);
  let edges = canonical_edges(idx);
  assert_eq!(edges.len(), 12);
  let by_axis = |a: usize| edges.iter().filter(|(_, axis)| *axis == a).count();
  assert_eq!(by_axis(0), 4);
  assert_eq!(by_axis(1), 4);
  assert_eq!(by_axis(2), 4);
  // Every edge's axis component equals idx's (moving axis starts at idx).
  for (corner, axis) in edges {
    assert_eq!(idx_component(corner, axis), idx_component(idx, axis));
  }
}
