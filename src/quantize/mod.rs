//! Scale/shift quantize operation: parameters, validation and the kernel
//! selector facade that ties planning and jit constants together.

pub mod kernel;
pub mod params;
pub mod validate;

pub use kernel::{KernelInvocation, KernelPriority, QuantizeScaleShiftKernel};
pub use params::{QuantizeParams, DEFAULT_LEVELS};
pub use validate::{
    validate, ValidationError, QUANTIZE_INPUT_ARITY, SUPPORTED_INPUT_TYPES,
    SUPPORTED_OUTPUT_TYPES,
};
