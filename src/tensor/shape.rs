//! Logical tensor extents.

use serde::{Deserialize, Serialize};

/// Five logical extents of a tensor: batch, feature, depth, height, width.
///
/// 4D tensors carry a depth of 1. Extents may be zero; a zero extent makes the
/// whole tensor empty, and planners hand back a zero-volume dispatch for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorShape {
    batch: usize,
    feature: usize,
    depth: usize,
    height: usize,
    width: usize,
}

impl TensorShape {
    pub fn new(batch: usize, feature: usize, depth: usize, height: usize, width: usize) -> Self {
        Self {
            batch,
            feature,
            depth,
            height,
            width,
        }
    }

    /// 4D shape (`b, f, y, x`) with unit depth.
    pub fn planar(batch: usize, feature: usize, height: usize, width: usize) -> Self {
        Self::new(batch, feature, 1, height, width)
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn feature(&self) -> usize {
        self.feature
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `depth * height * width`
    pub fn spatial_volume(&self) -> usize {
        self.depth
            .saturating_mul(self.height)
            .saturating_mul(self.width)
    }

    pub fn element_count(&self) -> usize {
        self.batch
            .saturating_mul(self.feature)
            .saturating_mul(self.spatial_volume())
    }

    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }
}

/// Round `value` up to the next multiple of `multiple`.
#[inline]
pub fn align_up(value: usize, multiple: usize) -> usize {
    if multiple == 0 {
        return value;
    }
    match value % multiple {
        0 => value,
        rem => value.saturating_add(multiple - rem),
    }
}
