//! Edge-crossing detection and probabilistic-plane-quadric fitting.
//!
//! A parallel, read-only pass over the flattened sample array: for each
//! sample and each of its three positive-direction axis neighbours, detect
//! a sign change, locate the crossing by iterative linear bracketing,
//! estimate the surface normal by finite differences, and fit a quadric.
//! Every sample writes only to its own `3*i + a` slots, so the pass needs
//! no locking.

use std::sync::atomic::AtomicBool;

use glam::DVec3;
use rayon::prelude::*;

use super::samples::SampleTable;
use super::types::axis_unit;
use crate::config::MesherConfig;
use crate::error::MesherError;
use crate::jit::CompiledFn;
use crate::quadric::Quadric;

/// Result of the edge pass: `quadrics[3*i+a]` / `has_crossing[3*i+a]`
/// describe the axial edge from sample `i` in direction `+a`.
pub struct EdgeData {
  pub quadrics: Vec<Quadric>,
  pub has_crossing: Vec<bool>,
}

pub fn compute_edges(
  table: &SampleTable,
  f: &CompiledFn,
  config: &MesherConfig,
  cancel: Option<&AtomicBool>,
) -> Result<EdgeData, MesherError> {
  if let Some(c) = cancel {
    if c.load(std::sync::atomic::Ordering::Relaxed) {
      return Err(MesherError::Cancelled);
    }
  }

  let per_sample: Vec<[(Quadric, bool); 3]> = (0..table.len())
    .into_par_iter()
    .map(|i| edges_for_sample(table, i, f, config))
    .collect();

  if let Some(c) = cancel {
    if c.load(std::sync::atomic::Ordering::Relaxed) {
      return Err(MesherError::Cancelled);
    }
  }

  let mut quadrics = Vec::with_capacity(table.len() * 3);
  let mut has_crossing = Vec::with_capacity(table.len() * 3);
  for slots in per_sample {
    for (q, c) in slots {
      quadrics.push(q);
      has_crossing.push(c);
    }
  }

  Ok(EdgeData { quadrics, has_crossing })
}

fn edges_for_sample(table: &SampleTable, i: usize, f: &CompiledFn, config: &MesherConfig) -> [(Quadric, bool); 3] {
  let idx = table.indices[i];
  let v1 = table.values[i];
  let mut out = [(Quadric::ZERO, false); 3];

  for a in 0..3 {
    let neighbor_idx = idx + axis_unit(a);
    let Some(neighbor_pos) = table.position_of(neighbor_idx) else {
      continue;
    };
    let v2 = table.values[neighbor_pos];
    if v1 * v2 > 0.0 {
      continue;
    }

    let p1 = config.grid_to_world(idx);
    let p2 = config.grid_to_world(neighbor_idx);
    let crossing = locate_crossing(p1, v1, p2, v2, f, config);
    let gradient = gradient_fd(f, crossing, config.gradient_epsilon);
    let normal = gradient.normalize_or_zero();
    let quadric = Quadric::plane(crossing, normal, config.quadric_sigma_p, config.quadric_sigma_n);
    out[a] = (quadric, true);
  }

  out
}

/// Locate a zero crossing on the segment `(p1,v1) -> (p2,v2)` by iterative
/// linear bracketing: orient so the negative endpoint comes first, then
/// repeatedly linearly interpolate the root of the secant line and replace
/// whichever endpoint shares the new sample's sign. Returns the last
/// interpolated point even if it hasn't converged within
/// `config.crossing_max_iters` iterations.
fn locate_crossing(p1: DVec3, v1: f64, p2: DVec3, v2: f64, f: &CompiledFn, config: &MesherConfig) -> DVec3 {
  let (mut p_neg, mut v_neg, mut p_pos, mut v_pos) = if v1 <= v2 { (p1, v1, p2, v2) } else { (p2, v2, p1, v1) };

  // v1 == v2 == 0 is a reachable tie case (the sign-change guard admits
  // 0*0): the secant slope is zero, so fall back to the near (v1) endpoint
  // instead of dividing by zero.
  if v_neg == v_pos {
    return p_neg;
  }

  let mut p = p_neg;
  for _ in 0..config.crossing_max_iters {
    let t = v_neg / (v_neg - v_pos);
    p = p_neg + t * (p_pos - p_neg);
    let fp = f.call(p.x, p.y, p.z);
    if fp.abs() < config.crossing_epsilon {
      return p;
    }
    if fp.signum() == v_neg.signum() {
      p_neg = p;
      v_neg = fp;
    } else {
      p_pos = p;
      v_pos = fp;
    }
  }
  p
}

/// Centred finite-difference gradient estimate.
fn gradient_fd(f: &CompiledFn, p: DVec3, eps: f64) -> DVec3 {
  let dx = (f.call(p.x + eps, p.y, p.z) - f.call(p.x - eps, p.y, p.z)) / (2.0 * eps);
  let dy = (f.call(p.x, p.y + eps, p.z) - f.call(p.x, p.y - eps, p.z)) / (2.0 * eps);
  let dz = (f.call(p.x, p.y, p.z + eps) - f.call(p.x, p.y, p.z - eps)) / (2.0 * eps);
  DVec3::new(dx, dy, dz)
}

#[cfg(test)]
#[path = "edges_test.rs"]
mod edges_test;
