//! Error types for the IR/JIT compiler and the mesher.
//!
//! Small `thiserror`-derived enums at the boundary of each fallible
//! subsystem, no panics on malformed input from the node graph or mesher
//! configuration.

use glam::IVec3;

/// Errors surfaced while JIT-compiling an instruction stream.
#[derive(Debug, thiserror::Error)]
pub enum JitError {
  /// The instruction list was empty; there is no register to return.
  #[error("instruction stream is empty")]
  EmptyProgram,

  /// An instruction read a register before any prior instruction, constant,
  /// or function parameter defined it.
  #[error("register {register} read before being written")]
  ReadBeforeWrite { register: i32 },

  /// Cranelift module/codegen backend failed to define or finalize the
  /// function.
  #[error("JIT backend failure: {0}")]
  Backend(String),
}

/// Errors surfaced by the mesher.
#[derive(Debug, thiserror::Error)]
pub enum MesherError {
  /// A grid cell was given a non-positive extent on some axis; this is a
  /// programming error, never a runtime data condition.
  #[error("invalid cell: min={min:?} max={max:?} (extent must be >= 1 on every axis)")]
  InvalidCell { min: IVec3, max: IVec3 },

  /// The caller's cancellation token was observed set at a task boundary.
  #[error("mesh build was cancelled")]
  Cancelled,

  /// Propagated failure from compiling the evaluation function.
  #[error(transparent)]
  Compile(#[from] JitError),
}
