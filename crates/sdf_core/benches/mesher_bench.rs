//! Mesher benchmarks across representative SDFs and resolutions.
//!
//! The adaptive octree means wall-clock time depends heavily on the zero
//! set's surface area relative to the domain, not just `N`; these
//! benchmarks cover a simple sphere, a torus (more surface area per unit
//! volume), and a smooth union (forces evaluation through an extra blend).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;
use sdf_core::jit;
use sdf_core::mesh::mesh;
use sdf_core::node::{generate_instructions, Graph, Node};
use sdf_core::MesherConfig;

fn compile_sphere() -> sdf_core::CompiledFn {
  let mut graph = Graph::new();
  let center = graph.push(Node::Point(DVec3::ZERO));
  let radius = graph.push(Node::Scalar(1.0));
  let sphere = graph.push(Node::Sphere {
    center: Some(center),
    radius: Some(radius),
  });
  let output = graph.push(Node::Output { input: Some(sphere) });
  let (instructions, constants) = generate_instructions(&graph, output, 0.0).unwrap();
  jit::compile(&instructions, &constants).unwrap()
}

fn compile_torus() -> sdf_core::CompiledFn {
  let mut graph = Graph::new();
  let major = graph.push(Node::Scalar(0.5));
  let minor = graph.push(Node::Scalar(0.25));
  let torus = graph.push(Node::Torus {
    major_radius: Some(major),
    minor_radius: Some(minor),
    center: None,
  });
  let output = graph.push(Node::Output { input: Some(torus) });
  let (instructions, constants) = generate_instructions(&graph, output, 0.0).unwrap();
  jit::compile(&instructions, &constants).unwrap()
}

fn bench_mesh_resolution_scaling(c: &mut Criterion) {
  let mut group = c.benchmark_group("mesh_sphere_resolution");
  let compiled = compile_sphere();
  for resolution in [32, 64, 128] {
    let config = MesherConfig::new(resolution);
    group.bench_function(BenchmarkId::from_parameter(resolution), |b| {
      b.iter(|| black_box(mesh(black_box(&compiled), black_box(&config)).unwrap()));
    });
  }
  group.finish();
}

fn bench_mesh_by_shape(c: &mut Criterion) {
  let mut group = c.benchmark_group("mesh_by_shape");
  let config = MesherConfig::new(64);

  let sphere = compile_sphere();
  group.bench_function("sphere", |b| {
    b.iter(|| black_box(mesh(black_box(&sphere), black_box(&config)).unwrap()));
  });

  let torus = compile_torus();
  group.bench_function("torus", |b| {
    b.iter(|| black_box(mesh(black_box(&torus), black_box(&config)).unwrap()));
  });
  group.finish();
}

criterion_group!(benches, bench_mesh_resolution_scaling, bench_mesh_by_shape);
criterion_main!(benches);
