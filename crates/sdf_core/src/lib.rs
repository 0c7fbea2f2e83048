//! SDF graph IR, JIT compiler, and adaptive dual-contouring mesher.
//!
//! This crate is the engine behind an interactive implicit-surface
//! modeller: a node graph lowers to a flat arithmetic IR (`ir`), the IR is
//! JIT-compiled to a native `(x,y,z) -> f64` function (`jit`), and that
//! function's zero level set is polygonised into a quad mesh by an
//! adaptive octree dual-contouring mesher (`mesh`). Graph editing UI, scene
//! display, and windowing are out of scope: this crate is a library
//! linked by a host application (no CLI, files, network, or env vars).
//!
//! # Example
//!
//! ```ignore
//! use sdf_core::config::MesherConfig;
//! use sdf_core::jit;
//! use sdf_core::node::{generate_instructions, Graph, Node};
//!
//! let mut graph = Graph::new();
//! let center = graph.push(Node::Point(glam::DVec3::ZERO));
//! let radius = graph.push(Node::Scalar(1.0));
//! let sphere = graph.push(Node::Sphere { center: Some(center), radius: Some(radius) });
//! let output = graph.push(Node::Output { input: Some(sphere) });
//!
//! let (instructions, constants) = generate_instructions(&graph, output, 0.0).unwrap();
//! let compiled = jit::compile(&instructions, &constants).unwrap();
//! let mesh = sdf_core::mesh::mesh(&compiled, &MesherConfig::new(64)).unwrap();
//! println!("{} vertices, {} quads", mesh.vertices.len(), mesh.quads.len());
//! ```

pub mod config;
pub mod error;
pub mod ir;
pub mod jit;
pub mod mesh;
pub mod node;
pub mod quadric;

pub use config::MesherConfig;
pub use error::{JitError, MesherError};
pub use jit::CompiledFn;
pub use mesh::{mesh as build_mesh, mesh_cancellable, QuadMesh};
pub use quadric::Quadric;
