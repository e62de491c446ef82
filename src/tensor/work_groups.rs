//! Tensor-friendly global work distribution.
//!
//! Unblocked layouts spread the output over three global axes following the
//! tensor's own storage order, so neighbouring work-items touch neighbouring
//! memory. The planner only relies on the output contract: every logical
//! element is covered exactly once, one axis group per global axis.

use serde::{Deserialize, Serialize};

use crate::tensor::{AxisGroup, DataLayout, TensorShape};

/// Which global axis carries each logical axis group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisAssignment {
    pub batch: usize,
    pub feature: usize,
    pub spatial: usize,
}

impl AxisAssignment {
    /// `(spatial, feature, batch)`, the assignment every blocked layout uses.
    pub const BLOCKED: AxisAssignment = AxisAssignment {
        batch: 2,
        feature: 1,
        spatial: 0,
    };

    pub fn from_order(order: [AxisGroup; 3]) -> Self {
        let mut assignment = AxisAssignment {
            batch: 0,
            feature: 0,
            spatial: 0,
        };
        for (axis, group) in order.into_iter().enumerate() {
            match group {
                AxisGroup::Batch => assignment.batch = axis,
                AxisGroup::Feature => assignment.feature = axis,
                AxisGroup::Spatial => assignment.spatial = axis,
            }
        }
        assignment
    }
}

/// Global sizes plus the axis assignment that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkGroups {
    pub global: [usize; 3],
    pub axes: AxisAssignment,
}

/// Source of the global distribution for unblocked layouts.
pub trait WorkDistribution {
    fn global_work_groups(&self, shape: &TensorShape, layout: DataLayout) -> WorkGroups;
}

/// Default distribution: one axis group per global axis, in storage order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TensorFriendly;

impl WorkDistribution for TensorFriendly {
    fn global_work_groups(&self, shape: &TensorShape, layout: DataLayout) -> WorkGroups {
        let order = layout.natural_order();
        let global = order.map(|group| match group {
            AxisGroup::Spatial => shape.spatial_volume(),
            AxisGroup::Feature => shape.feature(),
            AxisGroup::Batch => shape.batch(),
        });
        WorkGroups {
            global,
            axes: AxisAssignment::from_order(order),
        }
    }
}
