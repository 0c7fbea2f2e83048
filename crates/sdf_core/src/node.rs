//! Node graph → IR lowering.
//!
//! Given a closed-set node graph and a resolver that answers "what feeds
//! input `k` of node `n`", produce the IR instruction stream. Graph editing
//! bookkeeping (id allocation, link creation, UI) is the host's
//! responsibility.
//!
//! Node dispatch is a closed Rust enum: a tagged sum type is a fine
//! substitute for virtual dispatch when the node-kind count is small and the
//! hot path is compiled-function evaluation, not dispatch.

use glam::DVec3;
use smallvec::{smallvec, SmallVec};

use crate::ir::{
  self, gen_abs, gen_abs3, gen_add, gen_length2, gen_length3, gen_max, gen_max3, gen_max_element3, gen_min, gen_mul,
  gen_sub, gen_sub3, make_constant, Constants, Instruction, Reg, RegisterAllocator,
};

/// A node's output registers: one for a scalar value, three for a vector
/// (`Point`) value. Never more than three, so a stack-allocated small
/// vector avoids a heap allocation on every lowered node.
type Regs = SmallVec<[Reg; 3]>;

/// Identifies a node within a `Graph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// The closed set of node kinds the lowering contract understands.
///
/// `center` fields default to the origin when the editor leaves them
/// unbound: an unbound vector input synthesises three zero constants.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
  /// Forwards its single scalar input. Exactly one per graph (the root).
  Output { input: Option<NodeId> },
  /// `length(p - center) - radius`.
  Sphere {
    center: Option<NodeId>,
    radius: Option<NodeId>,
  },
  /// `sqrt((length(q.xz) - r_major)^2 + q.y^2) - r_minor`, `q = p - center`.
  Torus {
    major_radius: Option<NodeId>,
    minor_radius: Option<NodeId>,
    center: Option<NodeId>,
  },
  /// `min(maxElement(q), 0) + length(max(q, 0))`, `q = |p - center| - size`.
  Box {
    half_extents: Option<NodeId>,
    center: Option<NodeId>,
  },
  /// `max(length(q.xz) - radius, |q.y| - height)`, `q = p - center`.
  Cylinder {
    radius: Option<NodeId>,
    height: Option<NodeId>,
    center: Option<NodeId>,
  },
  /// A literal scalar constant.
  Scalar(f64),
  /// A literal point/vector constant.
  Point(DVec3),
  /// A host-supplied wall-clock sample, lowered as a literal constant.
  Time,
  /// `min(a, b)`.
  Union { a: Option<NodeId>, b: Option<NodeId> },
  /// `max(min(a,b), r) - length(max(r-a, 0), max(r-b, 0))`.
  SmoothUnion {
    a: Option<NodeId>,
    b: Option<NodeId>,
    rounding: Option<NodeId>,
  },
  /// Unary math node wrapping a scalar input.
  Unary { op: UnaryMath, input: Option<NodeId> },
}

/// The unary math operations exposed as standalone nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryMath {
  Sin,
  Cos,
  Abs,
  Sqrt,
}

/// An append-only collection of nodes, addressed by `NodeId`.
///
/// Links between nodes are *not* stored here; they come from the host's
/// `InputResolver`/the `Option<NodeId>` fields above, which the host
/// populates from its own graph editor state.
#[derive(Clone, Debug, Default)]
pub struct Graph {
  nodes: Vec<Node>,
}

impl Graph {
  pub fn new() -> Self {
    Self { nodes: Vec::new() }
  }

  /// Insert a node, returning its fresh id.
  pub fn push(&mut self, node: Node) -> NodeId {
    let id = NodeId(self.nodes.len() as u32);
    self.nodes.push(node);
    id
  }

  pub fn get(&self, id: NodeId) -> &Node {
    &self.nodes[id.0 as usize]
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }
}

/// Lower a single node to IR, returning its output register(s): one for a
/// scalar-valued node, three for a vector-valued node (`Point`).
///
/// `time` is the host-supplied wall-clock sample used by `Node::Time`,
/// lowered as a plain constant.
fn lower_node(
  graph: &Graph,
  id: NodeId,
  instructions: &mut Vec<Instruction>,
  alloc: &mut RegisterAllocator,
  constants: &mut Constants,
  time: f64,
) -> Regs {
  match graph.get(id) {
    Node::Output { input } => lower_scalar_input(graph, *input, instructions, alloc, constants, time),

    Node::Sphere { center, radius } => {
      let c = lower_vector_input(graph, *center, instructions, alloc, constants, time);
      let r = lower_scalar_input(graph, *radius, instructions, alloc, constants, time)[0];
      let q = gen_sub3(instructions, alloc, [ir::REG_X, ir::REG_Y, ir::REG_Z], c);
      let len = gen_length3(instructions, alloc, q);
      smallvec![gen_sub(instructions, alloc, len, r)]
    }

    Node::Torus {
      major_radius,
      minor_radius,
      center,
    } => {
      let r1 = lower_scalar_input(graph, *major_radius, instructions, alloc, constants, time)[0];
      let r2 = lower_scalar_input(graph, *minor_radius, instructions, alloc, constants, time)[0];
      let c = lower_vector_input(graph, *center, instructions, alloc, constants, time);
      let q = gen_sub3(instructions, alloc, [ir::REG_X, ir::REG_Y, ir::REG_Z], c);
      let xz_len = gen_length2(instructions, alloc, [q[0], q[2]]);
      let d = gen_sub(instructions, alloc, xz_len, r1);
      let d2 = gen_mul(instructions, alloc, d, d);
      let yy = gen_mul(instructions, alloc, q[1], q[1]);
      let sum = gen_add(instructions, alloc, d2, yy);
      let len = ir::gen_sqrt(instructions, alloc, sum);
      smallvec![gen_sub(instructions, alloc, len, r2)]
    }

    Node::Box { half_extents, center } => {
      let size = lower_vector_input(graph, *half_extents, instructions, alloc, constants, time);
      let c = lower_vector_input(graph, *center, instructions, alloc, constants, time);
      let p = [ir::REG_X, ir::REG_Y, ir::REG_Z];
      let p_minus_c = gen_sub3(instructions, alloc, p, c);
      let abs_p = gen_abs3(instructions, alloc, p_minus_c);
      let q = gen_sub3(instructions, alloc, abs_p, size);
      let zero = make_constant(constants, alloc, 0.0);
      let max_elem = gen_max_element3(instructions, alloc, q);
      let inside_term = gen_min(instructions, alloc, max_elem, zero);
      let clamped = gen_max3(instructions, alloc, q, [zero, zero, zero]);
      let inside_len = gen_length3(instructions, alloc, clamped);
      smallvec![gen_add(instructions, alloc, inside_len, inside_term)]
    }

    Node::Cylinder { radius, height, center } => {
      let r = lower_scalar_input(graph, *radius, instructions, alloc, constants, time)[0];
      let h = lower_scalar_input(graph, *height, instructions, alloc, constants, time)[0];
      let c = lower_vector_input(graph, *center, instructions, alloc, constants, time);
      let p = [ir::REG_X, ir::REG_Y, ir::REG_Z];
      let q = gen_sub3(instructions, alloc, p, c);
      let xz_len = gen_length2(instructions, alloc, [q[0], q[2]]);
      let side = gen_sub(instructions, alloc, xz_len, r);
      let cap = {
        let abs_y = gen_abs(instructions, alloc, q[1]);
        gen_sub(instructions, alloc, abs_y, h)
      };
      smallvec![gen_max(instructions, alloc, side, cap)]
    }

    Node::Scalar(value) => smallvec![make_constant(constants, alloc, *value)],

    Node::Point(value) => smallvec![
      make_constant(constants, alloc, value.x),
      make_constant(constants, alloc, value.y),
      make_constant(constants, alloc, value.z),
    ],

    Node::Time => smallvec![make_constant(constants, alloc, time)],

    Node::Union { a, b } => {
      let va = lower_scalar_input(graph, *a, instructions, alloc, constants, time)[0];
      let vb = lower_scalar_input(graph, *b, instructions, alloc, constants, time)[0];
      smallvec![gen_min(instructions, alloc, va, vb)]
    }

    Node::SmoothUnion { a, b, rounding } => {
      let va = lower_scalar_input(graph, *a, instructions, alloc, constants, time)[0];
      let vb = lower_scalar_input(graph, *b, instructions, alloc, constants, time)[0];
      let r = lower_scalar_input(graph, *rounding, instructions, alloc, constants, time)[0];
      let zero = make_constant(constants, alloc, 0.0);
      let ra = gen_sub(instructions, alloc, r, va);
      let rb = gen_sub(instructions, alloc, r, vb);
      let ha = gen_max(instructions, alloc, ra, zero);
      let hb = gen_max(instructions, alloc, rb, zero);
      let blend_len = gen_length2(instructions, alloc, [ha, hb]);
      let min_ab = gen_min(instructions, alloc, va, vb);
      let floor = gen_max(instructions, alloc, min_ab, r);
      smallvec![gen_sub(instructions, alloc, floor, blend_len)]
    }

    Node::Unary { op, input } => {
      let v = lower_scalar_input(graph, *input, instructions, alloc, constants, time)[0];
      let out = match op {
        UnaryMath::Sin => ir::gen_sin(instructions, alloc, v),
        UnaryMath::Cos => ir::gen_cos(instructions, alloc, v),
        UnaryMath::Abs => gen_abs(instructions, alloc, v),
        UnaryMath::Sqrt => ir::gen_sqrt(instructions, alloc, v),
      };
      smallvec![out]
    }
  }
}

/// Lower a scalar-typed input, synthesising a zero constant when unbound.
fn lower_scalar_input(
  graph: &Graph,
  input: Option<NodeId>,
  instructions: &mut Vec<Instruction>,
  alloc: &mut RegisterAllocator,
  constants: &mut Constants,
  time: f64,
) -> Regs {
  match input {
    Some(id) => lower_node(graph, id, instructions, alloc, constants, time),
    None => smallvec![make_constant(constants, alloc, 0.0)],
  }
}

/// Lower a vector-typed input, synthesising three zero constants when
/// unbound.
fn lower_vector_input(
  graph: &Graph,
  input: Option<NodeId>,
  instructions: &mut Vec<Instruction>,
  alloc: &mut RegisterAllocator,
  constants: &mut Constants,
  time: f64,
) -> [Reg; 3] {
  match input {
    Some(id) => {
      let regs = lower_node(graph, id, instructions, alloc, constants, time);
      [regs[0], regs[1], regs[2]]
    }
    None => {
      let z = make_constant(constants, alloc, 0.0);
      let z2 = make_constant(constants, alloc, 0.0);
      let z3 = make_constant(constants, alloc, 0.0);
      [z, z2, z3]
    }
  }
}

/// Entry point: lowers the root Output node into a flat instruction stream
/// and its constant table, starting register allocation fresh.
///
/// Returns `None` when the Output node has no linked source. A graph
/// missing its root input is not an error, it just means the mesher should
/// not be invoked yet.
pub fn generate_instructions(graph: &Graph, output: NodeId, time: f64) -> Option<(Vec<Instruction>, Constants)> {
  if let Node::Output { input: None } = graph.get(output) {
    return None;
  }

  let mut instructions = Vec::new();
  let mut constants = Constants::new();
  let mut alloc = RegisterAllocator::new();
  lower_node(graph, output, &mut instructions, &mut alloc, &mut constants, time);

  if instructions.is_empty() {
    None
  } else {
    Some((instructions, constants))
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
