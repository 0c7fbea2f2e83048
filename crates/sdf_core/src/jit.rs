//! Native compilation of an IR program via `cranelift-jit`.
//!
//! See the module-level rationale in `DESIGN.md` for why this core builds on
//! Cranelift rather than LLVM. The shape is the one used throughout the
//! Cranelift ecosystem: build an ISA for the host, open a `JITModule`,
//! define one exported function, finalize, and hand back the function
//! pointer wrapped in an owner that frees the executable memory on drop.

use std::collections::HashMap;
use std::mem::ManuallyDrop;

use cranelift_codegen::ir::condcodes::FloatCC;
use cranelift_codegen::ir::{types, AbiParam, InstBuilder, Value};
use cranelift_codegen::settings::{self, Configurable};
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext};
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{default_libcall_names, Linkage, Module};

use crate::error::JitError;
use crate::ir::{Constants, Instruction, Op, Reg, REG_X, REG_Y, REG_Z};

extern "C" fn sdf_core_sin(x: f64) -> f64 {
  x.sin()
}

extern "C" fn sdf_core_cos(x: f64) -> f64 {
  x.cos()
}

/// A JIT-compiled scalar field, callable as `(x, y, z) -> f64`.
///
/// Owns the `JITModule` that backs the emitted code; dropping releases the
/// executable memory. There is no way to extract the raw function pointer
/// without going through `call`, so it cannot outlive its module.
pub struct CompiledFn {
  module: ManuallyDrop<JITModule>,
  code: *const u8,
}

// SAFETY: the JIT-emitted code touches no shared mutable state; it reads
// only its three f64 arguments and constants baked into the instruction
// stream, so calling it from multiple threads concurrently is sound.
unsafe impl Send for CompiledFn {}
unsafe impl Sync for CompiledFn {}

impl CompiledFn {
  /// Evaluate the compiled function at `(x, y, z)`.
  #[inline]
  pub fn call(&self, x: f64, y: f64, z: f64) -> f64 {
    let f: extern "C" fn(f64, f64, f64) -> f64 = unsafe { std::mem::transmute(self.code) };
    f(x, y, z)
  }
}

impl Drop for CompiledFn {
  fn drop(&mut self) {
    // SAFETY: `call` can only be invoked through `&self` during this
    // struct's lifetime; once we're in `drop` no other reference exists.
    let module = unsafe { ManuallyDrop::take(&mut self.module) };
    unsafe { module.free_memory() };
  }
}

/// Compile an instruction stream to a native `(f64, f64, f64) -> f64`
/// function.
///
/// Fails if the stream is empty, if a register is read before any prior
/// instruction/constant/parameter wrote it, or if the Cranelift backend
/// itself fails to initialise, define, or finalize the function, all
/// folded into `JitError`, the backend failure carrying its message.
pub fn compile(instructions: &[Instruction], constants: &Constants) -> Result<CompiledFn, JitError> {
  if instructions.is_empty() {
    return Err(JitError::EmptyProgram);
  }

  let mut flag_builder = settings::builder();
  flag_builder
    .set("use_colocated_libcalls", "false")
    .map_err(|e| JitError::Backend(e.to_string()))?;
  flag_builder
    .set("is_pic", "false")
    .map_err(|e| JitError::Backend(e.to_string()))?;
  // Closest available approximation of the original MCJIT's fast-math
  // flags: Cranelift has no per-instruction fast-math bits, but disabling
  // IEEE-strict traps lets the backend fold and reorder the straight-line
  // arithmetic we emit below.
  flag_builder
    .set("enable_verifier", "false")
    .map_err(|e| JitError::Backend(e.to_string()))?;

  let isa_builder = cranelift_native::builder().map_err(|msg| JitError::Backend(msg.to_string()))?;
  let isa = isa_builder
    .finish(settings::Flags::new(flag_builder))
    .map_err(|e| JitError::Backend(e.to_string()))?;

  let mut jit_builder = JITBuilder::with_isa(isa, default_libcall_names());
  jit_builder.symbol("sdf_core_sin", sdf_core_sin as *const u8);
  jit_builder.symbol("sdf_core_cos", sdf_core_cos as *const u8);
  let mut module = JITModule::new(jit_builder);

  let mut sig = module.make_signature();
  sig.params.push(AbiParam::new(types::F64));
  sig.params.push(AbiParam::new(types::F64));
  sig.params.push(AbiParam::new(types::F64));
  sig.returns.push(AbiParam::new(types::F64));

  let mut math_sig = module.make_signature();
  math_sig.params.push(AbiParam::new(types::F64));
  math_sig.returns.push(AbiParam::new(types::F64));

  let sin_id = module
    .declare_function("sdf_core_sin", Linkage::Import, &math_sig)
    .map_err(|e| JitError::Backend(e.to_string()))?;
  let cos_id = module
    .declare_function("sdf_core_cos", Linkage::Import, &math_sig)
    .map_err(|e| JitError::Backend(e.to_string()))?;
  let func_id = module
    .declare_function("sdf_program", Linkage::Export, &sig)
    .map_err(|e| JitError::Backend(e.to_string()))?;

  let mut ctx = module.make_context();
  ctx.func.signature = sig;
  let mut builder_ctx = FunctionBuilderContext::new();

  {
    let mut builder = FunctionBuilder::new(&mut ctx.func, &mut builder_ctx);
    let entry = builder.create_block();
    builder.append_block_params_for_function_params(entry);
    builder.switch_to_block(entry);
    builder.seal_block(entry);

    let params = builder.block_params(entry).to_vec();
    let mut values: HashMap<Reg, Value> = HashMap::with_capacity(instructions.len() + constants.len() + 3);
    values.insert(REG_X, params[0]);
    values.insert(REG_Y, params[1]);
    values.insert(REG_Z, params[2]);
    for (&reg, &value) in constants {
      values.insert(reg, builder.ins().f64const(value));
    }

    let sin_ref = module.declare_func_in_func(sin_id, builder.func);
    let cos_ref = module.declare_func_in_func(cos_id, builder.func);

    fn read(values: &HashMap<Reg, Value>, reg: Reg) -> Result<Value, JitError> {
      values.get(&reg).copied().ok_or(JitError::ReadBeforeWrite { register: reg })
    }

    for instr in instructions {
      let a = read(&values, instr.in1)?;
      let out_value = match instr.op {
        Op::Add => builder.ins().fadd(a, read(&values, instr.in2)?),
        Op::Sub => builder.ins().fsub(a, read(&values, instr.in2)?),
        Op::Mul => builder.ins().fmul(a, read(&values, instr.in2)?),
        Op::Sqrt => builder.ins().sqrt(a),
        Op::Min => {
          let b = read(&values, instr.in2)?;
          let a_lt_b = builder.ins().fcmp(FloatCC::LessThan, a, b);
          builder.ins().select(a_lt_b, a, b)
        }
        Op::Max => {
          let b = read(&values, instr.in2)?;
          let a_gt_b = builder.ins().fcmp(FloatCC::GreaterThan, a, b);
          builder.ins().select(a_gt_b, a, b)
        }
        Op::Abs => {
          let zero = builder.ins().f64const(0.0);
          let negated = builder.ins().fneg(a);
          let is_negative = builder.ins().fcmp(FloatCC::LessThan, a, zero);
          builder.ins().select(is_negative, negated, a)
        }
        Op::Sin => {
          let call = builder.ins().call(sin_ref, &[a]);
          builder.inst_results(call)[0]
        }
        Op::Cos => {
          let call = builder.ins().call(cos_ref, &[a]);
          builder.inst_results(call)[0]
        }
      };
      values.insert(instr.out, out_value);
    }

    let return_reg = instructions.last().expect("checked non-empty above").out;
    let return_value = read(&values, return_reg)?;
    builder.ins().return_(&[return_value]);
    builder.finalize();
  }

  module
    .define_function(func_id, &mut ctx)
    .map_err(|e| JitError::Backend(e.to_string()))?;
  module.clear_context(&mut ctx);
  module
    .finalize_definitions()
    .map_err(|e| JitError::Backend(e.to_string()))?;

  let code = module.get_finalized_function(func_id);

  Ok(CompiledFn {
    module: ManuallyDrop::new(module),
    code,
  })
}

#[cfg(test)]
#[path = "jit_test.rs"]
mod jit_test;
