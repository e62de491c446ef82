//! Kernel selector entry for `quantize_gpu_scale_shift_opt`.

use serde::Serialize;

use crate::device::PlannerConfig;
use crate::dispatch::{DispatchPlan, Planner, TracingObserver};
use crate::error::{ForgeError, ForgeResult};
use crate::jit::{KernelConfig, KernelConfigBuilder};
use crate::quantize::{validate, QuantizeParams};

/// Selection priority reported to a kernel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KernelPriority {
    /// Explicit rank; lower wins.
    Force(u8),
    /// Only picked when nothing better supports the parameters.
    DontUseIfHaveSomethingElse,
}

/// Everything a runtime needs to compile and enqueue the kernel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KernelInvocation {
    pub kernel_name: &'static str,
    pub plan: DispatchPlan,
    pub config: KernelConfig,
}

impl KernelInvocation {
    pub fn to_json(&self) -> ForgeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> ForgeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone)]
pub struct QuantizeScaleShiftKernel {
    planner: Planner,
}

impl QuantizeScaleShiftKernel {
    pub const NAME: &'static str = "quantize_gpu_scale_shift_opt";

    pub fn new(config: &PlannerConfig) -> ForgeResult<Self> {
        config.validate().map_err(ForgeError::InvalidConfiguration)?;
        Ok(Self {
            planner: Planner::new(config),
        })
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn priority(&self) -> KernelPriority {
        KernelPriority::DontUseIfHaveSomethingElse
    }

    pub fn supports(&self, params: &QuantizeParams) -> bool {
        validate(params).is_ok()
    }

    /// Validate, plan over the output tensor and build the jit constants.
    pub fn prepare(&self, params: &QuantizeParams) -> ForgeResult<KernelInvocation> {
        let output = params.output;
        let span = tracing::debug_span!(
            "quantize_prepare",
            kernel = Self::NAME,
            layout = %output.layout,
            dtype = %output.dtype,
        );
        let _enter = span.enter();

        validate(params)?;

        let plan = self
            .planner
            .plan_observed(&output.shape, output.layout, &[], &TracingObserver)?;
        if plan.is_empty() {
            tracing::warn!("output tensor is empty, launch can be skipped");
        }

        let config = KernelConfigBuilder::build_for(params, &plan, output.layout);
        tracing::debug!(constants = config.len(), "kernel prepared");

        Ok(KernelInvocation {
            kernel_name: Self::NAME,
            plan,
            config,
        })
    }
}

impl Default for QuantizeScaleShiftKernel {
    fn default() -> Self {
        Self {
            planner: Planner::default(),
        }
    }
}
