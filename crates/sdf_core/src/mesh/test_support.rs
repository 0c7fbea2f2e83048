//! Shared test helpers: compile small analytic SDFs via the real IR + JIT
//! pipeline rather than hand-rolling `extern "C" fn` stand-ins, so the
//! mesher's test suite exercises the same `CompiledFn` the crate's public
//! API hands callers.

use glam::DVec3;

use crate::ir::{self, Constants, RegisterAllocator};
use crate::jit::{self, CompiledFn};
use crate::node::{Graph, Node, NodeId};

fn compile_graph(build: impl FnOnce(&mut Graph) -> NodeId) -> CompiledFn {
  let mut graph = Graph::new();
  let root = build(&mut graph);
  let output = graph.push(Node::Output { input: Some(root) });
  let (instructions, constants) = crate::node::generate_instructions(&graph, output, 0.0).expect("graph has a root");
  jit::compile(&instructions, &constants).expect("compiles")
}

pub fn compile_sphere(center: DVec3, radius: f64) -> CompiledFn {
  compile_graph(|graph| {
    let c = graph.push(Node::Point(center));
    let r = graph.push(Node::Scalar(radius));
    graph.push(Node::Sphere {
      center: Some(c),
      radius: Some(r),
    })
  })
}

pub fn compile_box(half_extents: DVec3) -> CompiledFn {
  compile_graph(|graph| {
    let size = graph.push(Node::Point(half_extents));
    graph.push(Node::Box {
      half_extents: Some(size),
      center: None,
    })
  })
}

pub fn compile_torus(major_radius: f64, minor_radius: f64) -> CompiledFn {
  compile_graph(|graph| {
    let r1 = graph.push(Node::Scalar(major_radius));
    let r2 = graph.push(Node::Scalar(minor_radius));
    graph.push(Node::Torus {
      major_radius: Some(r1),
      minor_radius: Some(r2),
      center: None,
    })
  })
}

pub fn compile_smooth_union_sphere_box(sphere_center: DVec3, sphere_radius: f64, box_center: DVec3, box_half: DVec3, rounding: f64) -> CompiledFn {
  compile_graph(|graph| {
    let sc = graph.push(Node::Point(sphere_center));
    let sr = graph.push(Node::Scalar(sphere_radius));
    let sphere = graph.push(Node::Sphere {
      center: Some(sc),
      radius: Some(sr),
    });
    let bc = graph.push(Node::Point(box_center));
    let bh = graph.push(Node::Point(box_half));
    let b = graph.push(Node::Box {
      half_extents: Some(bh),
      center: Some(bc),
    });
    let r = graph.push(Node::Scalar(rounding));
    graph.push(Node::SmoothUnion {
      a: Some(sphere),
      b: Some(b),
      rounding: Some(r),
    })
  })
}

/// `f(p) = 1` everywhere: an empty domain with no zero crossing.
pub fn compile_constant(value: f64) -> CompiledFn {
  let mut constants = Constants::new();
  let mut alloc = RegisterAllocator::new();
  let mut instructions = Vec::new();
  let c = ir::make_constant(&mut constants, &mut alloc, value);
  // A no-op instruction so the stream isn't empty: out = c + 0.
  let zero = ir::make_constant(&mut constants, &mut alloc, 0.0);
  ir::gen_add(&mut instructions, &mut alloc, c, zero);
  jit::compile(&instructions, &constants).expect("compiles")
}
