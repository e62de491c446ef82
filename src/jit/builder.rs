//! Jit constants for the scale/shift quantize kernel.

use crate::dispatch::{DispatchPlan, DispatchRule, BLOCK_SIZE};
use crate::jit::KernelConfig;
use crate::quantize::QuantizeParams;
use crate::tensor::DataLayout;

/// Builds the [`KernelConfig`] for one planned quantize launch.
#[derive(Debug, Clone, Copy)]
pub struct KernelConfigBuilder<'a> {
    params: &'a QuantizeParams,
    plan: &'a DispatchPlan,
    layout: DataLayout,
}

impl<'a> KernelConfigBuilder<'a> {
    pub fn new(params: &'a QuantizeParams, plan: &'a DispatchPlan, layout: DataLayout) -> Self {
        Self {
            params,
            plan,
            layout,
        }
    }

    /// Shorthand for `new(..).build()`.
    pub fn build_for(
        params: &QuantizeParams,
        plan: &DispatchPlan,
        layout: DataLayout,
    ) -> KernelConfig {
        KernelConfigBuilder::new(params, plan, layout).build()
    }

    pub fn build(&self) -> KernelConfig {
        let mut config = KernelConfig::new();
        config.merge(self.stage_flags());
        config.merge(self.range_values());
        config.merge(self.dispatch_constants());
        config
    }

    fn stage_flags(&self) -> KernelConfig {
        let p = self.params;
        let mut config = KernelConfig::new();
        config.add_constant("HAS_POST_SCALE", p.has_post_scale);
        config.add_constant("HAS_POST_SHIFT", p.has_post_shift);
        config.add_constant("HAS_PRE_SHIFT", p.has_pre_shift);
        config.add_constant("HAS_CLAMP", p.has_clamp);
        config.add_constant("HAS_MIN_CLAMP", p.has_min_clamp);
        config.add_constant("HAS_MAX_CLAMP", p.has_max_clamp);
        config.add_constant("PER_TENSOR_INPUT_RANGE", p.per_tensor_input_range);
        config.add_constant("PER_TENSOR_OUTPUT_RANGE", p.per_tensor_output_range);
        config.add_constant("PER_TENSOR_INPUT_SCALE", p.per_tensor_input_scale);
        config.add_constant("PER_TENSOR_INPUT_SHIFT", p.per_tensor_input_shift);
        config.add_constant("PER_TENSOR_OUTPUT_SCALE", p.per_tensor_output_scale);
        config.add_constant("PER_TENSOR_OUTPUT_SHIFT", p.per_tensor_output_shift);
        config.add_constant("CAN_USE_OUTPUT_RANGE", p.can_use_output_range());
        config.add_constant("HAS_OUTPUT_RANGE_ROUND", p.has_output_range_round());
        config
    }

    fn range_values(&self) -> KernelConfig {
        let p = self.params;
        let mut config = KernelConfig::new();
        config.add_constant("IN_LO_VAL", p.in_lo);
        config.add_constant("IN_HI_VAL", p.in_hi);
        config.add_constant("OUT_LO_VAL", p.out_lo);
        config.add_constant("OUT_HI_VAL", p.out_hi);
        config.add_constant("IN_SCALE_VAL", p.in_scale);
        config.add_constant("IN_SHIFT_VAL", p.in_shift);
        config.add_constant("OUT_SCALE_VAL", p.out_scale);
        config.add_constant("OUT_SHIFT_VAL", p.out_shift);
        config.add_constant("LEVELS", p.levels);
        config
    }

    fn dispatch_constants(&self) -> KernelConfig {
        let axes = self.plan.axes;
        let blocked = DispatchRule::for_layout(self.layout).is_feature_blocked();

        let mut config = KernelConfig::new();
        config.add_constant("GWS_BATCH", axes.batch);
        config.add_constant("GWS_FEATURE", axes.feature);
        config.add_constant("GWS_YX", axes.spatial);
        config.add_constant("FEATURE_BLOCKED_FORMAT", blocked);
        if blocked {
            config.add_constant("SUB_GROUP_SIZE", BLOCK_SIZE);
        }
        config
    }
}
