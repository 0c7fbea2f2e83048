//! Mesher configuration.
//!
//! Every magic number the adaptive subdivision and edge-crossing stages
//! would otherwise hard-code lives on a plain `Clone + Debug` struct with a
//! `Default` impl, so callers can override resolution or tune the pruning
//! constant without touching the mesher's internals.

use glam::DVec3;

/// The pruning constant is 1.5 in some dual-contouring write-ups, 2.0 in
/// the safer variant that tolerates parallel, unordered cell evaluation.
/// This crate defaults to 2.0 but leaves it configurable.
pub const DEFAULT_PRUNE_K: f64 = 2.0;

/// Leaf threshold on voxel count: a cell with this many grid points or
/// fewer is sampled directly rather than subdivided further.
pub const DEFAULT_LEAF_VOXEL_BUDGET: i64 = 16;

/// Epsilon for the iterative linear bracketing crossing search.
pub const DEFAULT_CROSSING_EPSILON: f64 = 1e-5;

/// Iteration cap for the crossing search.
pub const DEFAULT_CROSSING_MAX_ITERS: u32 = 5;

/// Step used for the centred finite-difference gradient.
pub const DEFAULT_GRADIENT_EPSILON: f64 = 1e-5;

/// Positional/normal variance for the probabilistic plane quadric.
pub const DEFAULT_QUADRIC_SIGMA: f64 = 0.05;

/// Configuration for one `mesh()` call: domain bounds, sampling resolution,
/// and the numerical constants the adaptive subdivision and edge-crossing
/// stages use.
#[derive(Clone, Debug, PartialEq)]
pub struct MesherConfig {
  /// Lower corner of the cubic sampling domain, `(-3,-3,-3)` by default.
  pub lower: DVec3,

  /// Upper corner of the cubic sampling domain, `(3,3,3)` by default.
  pub upper: DVec3,

  /// Nominal grid resolution `N`; index space ranges over `[0..N]^3`.
  pub resolution: i32,

  /// Pruning constant `k` in `|f(center)| > k * half_diagonal`.
  pub prune_k: f64,

  /// Leaf threshold on voxel count for the octree subdivision.
  pub leaf_voxel_budget: i64,

  /// Convergence epsilon for the crossing bisection search.
  pub crossing_epsilon: f64,

  /// Iteration cap for the crossing bisection search.
  pub crossing_max_iters: u32,

  /// Step size for the centred finite-difference gradient estimate.
  pub gradient_epsilon: f64,

  /// Positional variance `σp` for the probabilistic plane quadric.
  pub quadric_sigma_p: f64,

  /// Normal variance `σn` for the probabilistic plane quadric.
  pub quadric_sigma_n: f64,
}

impl MesherConfig {
  /// A config at the given resolution over the canonical `[-3,3]^3`
  /// domain, with every other constant at its documented default.
  pub fn new(resolution: i32) -> Self {
    Self {
      resolution,
      ..Self::default()
    }
  }

  /// World position of grid index `i`:
  /// `p(i) = lower + i/(N-1) * (upper - lower)`.
  #[inline]
  pub fn grid_to_world(&self, index: glam::IVec3) -> DVec3 {
    let n_minus_1 = (self.resolution - 1).max(1) as f64;
    let t = DVec3::new(index.x as f64, index.y as f64, index.z as f64) / n_minus_1;
    self.lower + t * (self.upper - self.lower)
  }
}

impl Default for MesherConfig {
  fn default() -> Self {
    Self {
      lower: DVec3::splat(-3.0),
      upper: DVec3::splat(3.0),
      resolution: 64,
      prune_k: DEFAULT_PRUNE_K,
      leaf_voxel_budget: DEFAULT_LEAF_VOXEL_BUDGET,
      crossing_epsilon: DEFAULT_CROSSING_EPSILON,
      crossing_max_iters: DEFAULT_CROSSING_MAX_ITERS,
      gradient_epsilon: DEFAULT_GRADIENT_EPSILON,
      quadric_sigma_p: DEFAULT_QUADRIC_SIGMA,
      quadric_sigma_n: DEFAULT_QUADRIC_SIGMA,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
