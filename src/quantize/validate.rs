//! Validation gate run before planning.

use thiserror::Error;

use crate::quantize::QuantizeParams;
use crate::tensor::Datatype;

/// Primary input + input low/high + output low/high + input scale/shift +
/// output scale/shift.
pub const QUANTIZE_INPUT_ARITY: usize = 9;

pub const SUPPORTED_INPUT_TYPES: [Datatype; 4] =
    [Datatype::Uint8, Datatype::Int8, Datatype::F16, Datatype::F32];

pub const SUPPORTED_OUTPUT_TYPES: [Datatype; 4] =
    [Datatype::F16, Datatype::F32, Datatype::Uint8, Datatype::Int8];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expected {expected} input tensors, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("unsupported input datatype: {0}")]
    UnsupportedInputType(Datatype),

    #[error("unsupported output datatype: {0}")]
    UnsupportedOutputType(Datatype),
}

pub fn validate(params: &QuantizeParams) -> Result<(), ValidationError> {
    let actual = params.inputs.len();
    if actual != QUANTIZE_INPUT_ARITY {
        return Err(ValidationError::ArityMismatch {
            expected: QUANTIZE_INPUT_ARITY,
            actual,
        });
    }

    // arity guarantees a primary input
    if let Some(input) = params.primary_input() {
        if !SUPPORTED_INPUT_TYPES.contains(&input.dtype) {
            return Err(ValidationError::UnsupportedInputType(input.dtype));
        }
    }

    if !SUPPORTED_OUTPUT_TYPES.contains(&params.output.dtype) {
        return Err(ValidationError::UnsupportedOutputType(params.output.dtype));
    }

    Ok(())
}
