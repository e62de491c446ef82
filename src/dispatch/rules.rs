//! Layout to dispatch-rule table.

use serde::{Deserialize, Serialize};

use crate::tensor::DataLayout;

/// Feature (and batch) block size of the sub-group cooperative kernels.
pub const BLOCK_SIZE: usize = 32;

/// Axis priority for simple planar layouts.
pub const SIMPLE_PRIORITY: [usize; 3] = [0, 1, 2];
/// Axis priority for batch/feature strided layouts without a dedicated rule.
pub const BATCH_STRIDED_PRIORITY: [usize; 3] = [2, 1, 0];
/// Axis priority for every other layout.
pub const DEFAULT_PRIORITY: [usize; 3] = [1, 0, 2];

/// How the global and local sizes are derived for one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchRule {
    /// `(zyx, align(f, 32), b)` with a fixed `(1, 32, 1)` work-group.
    FeatureBlocked,
    /// `(zyx, align(f, 32), align(b, 32))` with `(1, 32, limit / 32)`.
    BatchFeatureBlocked,
    /// Tensor-friendly global sizes, greedy local sizes in `priority` order.
    Generic { priority: [usize; 3] },
}

impl DispatchRule {
    pub fn for_layout(layout: DataLayout) -> Self {
        match layout {
            DataLayout::BFsYxFsv16 | DataLayout::BFsZyxFsv32 => DispatchRule::FeatureBlocked,

            DataLayout::BsFsYxBsv32Fsv32
            | DataLayout::BsFsYxBsv16Fsv16
            | DataLayout::BsFsYxBsv32Fsv16
            | DataLayout::BsFsZyxBsv32Fsv32 => DispatchRule::BatchFeatureBlocked,

            DataLayout::Bfyx
            | DataLayout::Yxfb
            | DataLayout::Byxf
            | DataLayout::Fyxb
            | DataLayout::Bfzyx => DispatchRule::Generic {
                priority: SIMPLE_PRIORITY,
            },

            DataLayout::BsFsYxBsv16Fsv4
            | DataLayout::BsFsZyxBsv16Fsv16
            | DataLayout::BsFsZyxBsv16Fsv32
            | DataLayout::BsFsZyxBsv32Fsv16 => DispatchRule::Generic {
                priority: BATCH_STRIDED_PRIORITY,
            },

            DataLayout::BFsYxFsv4 | DataLayout::BFsYxFsv32 | DataLayout::BFsZyxFsv16 => {
                DispatchRule::Generic {
                    priority: DEFAULT_PRIORITY,
                }
            }
        }
    }

    /// Whether kernels for this rule run the sub-group cooperative path.
    pub fn is_feature_blocked(&self) -> bool {
        matches!(
            self,
            DispatchRule::FeatureBlocked | DispatchRule::BatchFeatureBlocked
        )
    }
}
