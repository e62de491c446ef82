//! Quantize operation parameters.

use serde::{Deserialize, Serialize};

use crate::tensor::{Datatype, TensorDesc};

/// Default number of quantization levels (8-bit).
pub const DEFAULT_LEVELS: usize = 256;

/// Parameters of one scale/shift quantize operation.
///
/// `inputs` holds the primary tensor followed by the range and scale/shift
/// tensors. The scalar fields repeat the per-tensor values so they can be
/// baked into the kernel; they are only meaningful when the matching
/// `per_tensor_*` flag is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizeParams {
    pub inputs: Vec<TensorDesc>,
    pub output: TensorDesc,
    pub levels: usize,

    pub has_pre_shift: bool,
    pub has_post_scale: bool,
    pub has_post_shift: bool,
    pub has_clamp: bool,
    pub has_min_clamp: bool,
    pub has_max_clamp: bool,

    pub per_tensor_input_range: bool,
    pub per_tensor_input_scale: bool,
    pub per_tensor_input_shift: bool,
    pub per_tensor_output_range: bool,
    pub per_tensor_output_scale: bool,
    pub per_tensor_output_shift: bool,

    pub in_lo: f32,
    pub in_hi: f32,
    pub out_lo: f32,
    pub out_hi: f32,
    pub in_scale: f32,
    pub in_shift: f32,
    pub out_scale: f32,
    pub out_shift: f32,
}

impl QuantizeParams {
    /// Full nine-input operation: `input`, then input low/high, output
    /// low/high, input scale/shift and output scale/shift as scalars.
    pub fn new(input: TensorDesc, output: TensorDesc) -> Self {
        let mut inputs = Vec::with_capacity(9);
        inputs.push(input);
        inputs.extend(std::iter::repeat(TensorDesc::scalar(Datatype::F32)).take(8));
        Self::with_inputs(inputs, output)
    }

    /// Explicit input list; no arity check happens here.
    pub fn with_inputs(inputs: Vec<TensorDesc>, output: TensorDesc) -> Self {
        Self {
            inputs,
            output,
            levels: DEFAULT_LEVELS,
            has_pre_shift: false,
            has_post_scale: false,
            has_post_shift: false,
            has_clamp: false,
            has_min_clamp: false,
            has_max_clamp: false,
            per_tensor_input_range: false,
            per_tensor_input_scale: false,
            per_tensor_input_shift: false,
            per_tensor_output_range: false,
            per_tensor_output_scale: false,
            per_tensor_output_shift: false,
            in_lo: 0.0,
            in_hi: 0.0,
            out_lo: 0.0,
            out_hi: 0.0,
            in_scale: 1.0,
            in_shift: 0.0,
            out_scale: 1.0,
            out_shift: 0.0,
        }
    }

    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    /// Per-tensor input range.
    pub fn with_input_range(mut self, lo: f32, hi: f32) -> Self {
        self.per_tensor_input_range = true;
        self.in_lo = lo;
        self.in_hi = hi;
        self
    }

    /// Per-tensor output range.
    pub fn with_output_range(mut self, lo: f32, hi: f32) -> Self {
        self.per_tensor_output_range = true;
        self.out_lo = lo;
        self.out_hi = hi;
        self
    }

    /// Per-tensor input scale and shift; enables the pre-shift stage when the
    /// shift is non-zero.
    pub fn with_input_scale_shift(mut self, scale: f32, shift: f32) -> Self {
        self.per_tensor_input_scale = true;
        self.per_tensor_input_shift = true;
        self.in_scale = scale;
        self.in_shift = shift;
        self.has_pre_shift = shift != 0.0;
        self
    }

    /// Per-tensor output scale and shift; enables the post stages that are
    /// not identities.
    pub fn with_output_scale_shift(mut self, scale: f32, shift: f32) -> Self {
        self.per_tensor_output_scale = true;
        self.per_tensor_output_shift = true;
        self.out_scale = scale;
        self.out_shift = shift;
        self.has_post_scale = scale != 1.0;
        self.has_post_shift = shift != 0.0;
        self
    }

    pub fn with_clamp(mut self, min: bool, max: bool) -> Self {
        self.has_min_clamp = min;
        self.has_max_clamp = max;
        self.has_clamp = min || max;
        self
    }

    pub fn primary_input(&self) -> Option<&TensorDesc> {
        self.inputs.first()
    }

    /// The output range check can be folded into the kernel only for a
    /// per-tensor, non-degenerate range.
    pub fn can_use_output_range(&self) -> bool {
        self.per_tensor_output_range && self.out_lo < self.out_hi
    }

    /// Integral output types need no rounding step.
    pub fn has_output_range_round(&self) -> bool {
        !self.output.dtype.is_narrow_integer()
    }
}
