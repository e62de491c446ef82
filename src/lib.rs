//! quantforge - dispatch planning for scale/shift quantize GPU kernels
//!
//! Given the output tensor of a quantize operation and the device's work-group
//! ceiling, quantforge picks a three-axis global/local work size and the set of
//! compile-time constants (`-DNAME=value`) the optimized scale/shift kernel is
//! built with. Nothing here touches a GPU; the results are plain data a
//! runtime hands to its OpenCL/HIP enqueue call.
//!
//! ```rust
//! use quantforge::prelude::*;
//!
//! let shape = TensorShape::planar(2, 40, 100, 100);
//! let params = QuantizeParams::new(
//!     TensorDesc::new(shape, DataLayout::BFsYxFsv16, Datatype::F16),
//!     TensorDesc::new(shape, DataLayout::BFsYxFsv16, Datatype::Int8),
//! )
//! .with_output_range(-128.0, 127.0);
//!
//! let kernel = QuantizeScaleShiftKernel::new(&PlannerConfig::default()).unwrap();
//! let invocation = kernel.prepare(&params).unwrap();
//! assert_eq!(invocation.plan.local, [1, 32, 1]);
//! assert_eq!(invocation.config.get_bool("CAN_USE_OUTPUT_RANGE"), Some(true));
//! ```

pub mod device;
pub mod dispatch;
pub mod error;
pub mod jit;
pub mod logging;
pub mod quantize;
pub mod tensor;

pub use device::{DeviceLimits, PlannerConfig};
pub use dispatch::{plan, DispatchError, DispatchPlan, DispatchRule, Planner};
pub use error::{ErrorCategory, ForgeError, ForgeResult};
pub use jit::{JitValue, KernelConfig, KernelConfigBuilder};
pub use logging::{init_logging_default, init_logging_from_env, init_with_config, LoggingConfig};
pub use quantize::{
    validate, KernelInvocation, KernelPriority, QuantizeParams, QuantizeScaleShiftKernel,
    ValidationError,
};
pub use tensor::{DataLayout, Datatype, TensorDesc, TensorShape};

/// Everything needed to plan and prepare a quantize launch.
pub mod prelude {
    pub use crate::device::{DeviceLimits, PlannerConfig};
    pub use crate::dispatch::{DispatchPlan, DispatchRule, Planner};
    pub use crate::error::{ForgeError, ForgeResult};
    pub use crate::jit::KernelConfig;
    pub use crate::quantize::{QuantizeParams, QuantizeScaleShiftKernel};
    pub use crate::tensor::{DataLayout, Datatype, TensorDesc, TensorShape};
}
