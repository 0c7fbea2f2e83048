//! JIT compile + evaluate benchmarks.
//!
//! Measures both the one-time cost of compiling a node graph to native code
//! and the steady-state cost of calling the compiled function, since a
//! host rebuilding on every frame pays the former on every graph edit and
//! the latter on every mesher sample.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;
use sdf_core::jit;
use sdf_core::node::{generate_instructions, Graph, Node};

fn sphere_program() -> (Vec<sdf_core::ir::Instruction>, sdf_core::ir::Constants) {
  let mut graph = Graph::new();
  let center = graph.push(Node::Point(DVec3::ZERO));
  let radius = graph.push(Node::Scalar(1.0));
  let sphere = graph.push(Node::Sphere {
    center: Some(center),
    radius: Some(radius),
  });
  let output = graph.push(Node::Output { input: Some(sphere) });
  generate_instructions(&graph, output, 0.0).unwrap()
}

fn smooth_union_program() -> (Vec<sdf_core::ir::Instruction>, sdf_core::ir::Constants) {
  let mut graph = Graph::new();
  let c1 = graph.push(Node::Point(DVec3::ZERO));
  let r1 = graph.push(Node::Scalar(0.3));
  let sphere = graph.push(Node::Sphere {
    center: Some(c1),
    radius: Some(r1),
  });
  let half = graph.push(Node::Point(DVec3::splat(0.2)));
  let c2 = graph.push(Node::Point(DVec3::new(0.5, 0.0, 0.0)));
  let b = graph.push(Node::Box {
    half_extents: Some(half),
    center: Some(c2),
  });
  let rounding = graph.push(Node::Scalar(0.1));
  let union = graph.push(Node::SmoothUnion {
    a: Some(sphere),
    b: Some(b),
    rounding: Some(rounding),
  });
  let output = graph.push(Node::Output { input: Some(union) });
  generate_instructions(&graph, output, 0.0).unwrap()
}

fn bench_compile(c: &mut Criterion) {
  let mut group = c.benchmark_group("jit_compile");
  let (sphere_instructions, sphere_constants) = sphere_program();
  group.bench_function(BenchmarkId::new("compile", "sphere"), |b| {
    b.iter(|| jit::compile(black_box(&sphere_instructions), black_box(&sphere_constants)).unwrap());
  });

  let (union_instructions, union_constants) = smooth_union_program();
  group.bench_function(BenchmarkId::new("compile", "smooth_union"), |b| {
    b.iter(|| jit::compile(black_box(&union_instructions), black_box(&union_constants)).unwrap());
  });
  group.finish();
}

fn bench_call(c: &mut Criterion) {
  let mut group = c.benchmark_group("jit_call");
  let (instructions, constants) = sphere_program();
  let compiled = jit::compile(&instructions, &constants).unwrap();

  group.bench_function("sphere_single_call", |b| {
    b.iter(|| black_box(compiled.call(black_box(0.3), black_box(0.4), black_box(0.5))));
  });

  group.bench_function("sphere_200_cubed_samples", |b| {
    b.iter(|| {
      let mut acc = 0.0f64;
      for i in 0..200 {
        let x = -3.0 + i as f64 * (6.0 / 199.0);
        acc += black_box(compiled.call(x, 0.0, 0.0));
      }
      black_box(acc)
    });
  });
  group.finish();
}

criterion_group!(benches, bench_compile, bench_call);
criterion_main!(benches);
