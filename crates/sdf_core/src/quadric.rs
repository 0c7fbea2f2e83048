//! Probabilistic plane quadrics (Gross & Pfister) for least-squares vertex
//! placement.
//!
//! No published crate implements this; it is a direct, self-contained
//! implementation of the closed-form quadric-error-function accumulation,
//! restated with `glam` linear algebra.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use glam::{DMat3, DVec3};

/// A quadratic error function `Q(x) = xᵀAx - 2bᵀx + c`, estimated from a
/// single oriented plane sample with Gaussian positional variance `σp²` and
/// normal variance `σn²`.
///
/// Summing quadrics from several edge crossings and minimising the sum
/// places a vertex at the point that best agrees with all of them in a
/// least-squares sense: the dual-contouring vertex placement step.
#[derive(Clone, Copy, Debug)]
pub struct Quadric {
  a: DMat3,
  b: DVec3,
  c: f64,
  /// Sum of contributing sample points and their count, carried alongside
  /// `a/b/c` so `minimizer` has a centroid to fall back to when `a` is
  /// singular.
  position_sum: DVec3,
  weight: f64,
}

impl Quadric {
  /// The zero quadric: contributes nothing when added, and has no fallback
  /// centroid.
  pub const ZERO: Quadric = Quadric {
    a: DMat3::ZERO,
    b: DVec3::ZERO,
    c: 0.0,
    position_sum: DVec3::ZERO,
    weight: 0.0,
  };

  /// Build the probabilistic plane quadric for a plane sampled at `point`
  /// with estimated unit `normal`, under Gaussian positional variance
  /// `sigma_p` and normal-direction variance `sigma_n`.
  pub fn plane(point: DVec3, normal: DVec3, sigma_p: f64, sigma_n: f64) -> Quadric {
    let n = normal.normalize_or_zero();
    let sigma_n2 = sigma_n * sigma_n;
    let sigma_p2 = sigma_p * sigma_p;

    // A = n nᵀ + σn² I, the deterministic plane quadric's nnᵀ term,
    // blurred isotropically by the normal's variance.
    let a = DMat3::from_cols(
      DVec3::new(n.x * n.x + sigma_n2, n.x * n.y, n.x * n.z),
      DVec3::new(n.x * n.y, n.y * n.y + sigma_n2, n.y * n.z),
      DVec3::new(n.x * n.z, n.y * n.z, n.z * n.z + sigma_n2),
    );
    let b = a * point;
    // c folds in the positional variance's contribution to the residual
    // and the trace term the normal blur adds at x = point.
    let c = b.dot(point) + sigma_p2 * n.length_squared() + 3.0 * sigma_n2;

    Quadric {
      a,
      b,
      c,
      position_sum: point,
      weight: 1.0,
    }
  }

  /// Evaluate the quadric's residual at `x`. Used only by tests; the
  /// mesher only ever calls `minimizer`.
  pub fn residual(&self, x: DVec3) -> f64 {
    x.dot(self.a * x) - 2.0 * self.b.dot(x) + self.c
  }

  /// The point minimising the accumulated quadric.
  ///
  /// Solves `A x = b` via `glam::DMat3`'s adjugate inverse. When `A` is
  /// numerically singular (a degenerate or unanimous set of edge normals)
  /// falls back to the centroid of the contributing sample points,
  /// "a reasonable fallback" for the ill-conditioned case.
  pub fn minimizer(&self) -> DVec3 {
    const SINGULAR_EPSILON: f64 = 1e-9;
    if self.weight <= 0.0 {
      return DVec3::ZERO;
    }
    let det = self.a.determinant();
    if det.abs() < SINGULAR_EPSILON {
      self.position_sum / self.weight
    } else {
      self.a.inverse() * self.b
    }
  }
}

impl Default for Quadric {
  fn default() -> Self {
    Quadric::ZERO
  }
}

impl Add for Quadric {
  type Output = Quadric;
  fn add(self, rhs: Quadric) -> Quadric {
    Quadric {
      a: self.a + rhs.a,
      b: self.b + rhs.b,
      c: self.c + rhs.c,
      position_sum: self.position_sum + rhs.position_sum,
      weight: self.weight + rhs.weight,
    }
  }
}

impl AddAssign for Quadric {
  fn add_assign(&mut self, rhs: Quadric) {
    *self = *self + rhs;
  }
}

impl Sum for Quadric {
  fn sum<I: Iterator<Item = Quadric>>(iter: I) -> Quadric {
    iter.fold(Quadric::ZERO, Add::add)
  }
}

#[cfg(test)]
#[path = "quadric_test.rs"]
mod quadric_test;
