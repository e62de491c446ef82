//! Tensor descriptors consumed by the planner.

use serde::{Deserialize, Serialize};

use crate::tensor::{DataLayout, Datatype, TensorShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorDesc {
    pub shape: TensorShape,
    pub layout: DataLayout,
    pub dtype: Datatype,
}

impl TensorDesc {
    pub fn new(shape: TensorShape, layout: DataLayout, dtype: Datatype) -> Self {
        Self {
            shape,
            layout,
            dtype,
        }
    }

    /// Per-tensor parameter, e.g. a scalar scale or range bound.
    pub fn scalar(dtype: Datatype) -> Self {
        Self::new(TensorShape::new(1, 1, 1, 1, 1), DataLayout::Bfyx, dtype)
    }

    pub fn with_layout(mut self, layout: DataLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_dtype(mut self, dtype: Datatype) -> Self {
        self.dtype = dtype;
        self
    }

    pub fn element_count(&self) -> usize {
        self.shape.element_count()
    }

    pub fn byte_size(&self) -> usize {
        self.element_count().saturating_mul(self.dtype.size_in_bytes())
    }
}
