//! Dispatch planning for the scale/shift quantize kernel.
//!
//! Given an output tensor and the device work-group ceiling, the planner
//! produces a three-axis global size covering every output element once and a
//! local size that evenly divides it. Blocked layouts use fixed sub-group
//! shaped work-groups; everything else goes through the greedy search in
//! [`local_size`].
//!
//! # Example
//!
//! ```rust
//! use quantforge::device::DeviceLimits;
//! use quantforge::dispatch::plan;
//! use quantforge::tensor::{DataLayout, TensorShape};
//!
//! let shape = TensorShape::planar(2, 40, 100, 100);
//! let dispatch = plan(&shape, DataLayout::BFsYxFsv16, DeviceLimits::new(256)).unwrap();
//! assert_eq!(dispatch.global, [10_000, 64, 2]);
//! assert_eq!(dispatch.local, [1, 32, 1]);
//! ```

pub mod local_size;
pub mod observer;
pub mod rules;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::device::{DeviceLimits, PlannerConfig};
use crate::tensor::{
    align_up, AxisAssignment, DataLayout, TensorDesc, TensorFriendly, TensorShape,
    WorkDistribution,
};

pub use local_size::{check_axis_order, LocalSizeTable, OPTIMAL_LOCAL_SIZES};
pub use observer::{NoopObserver, PlanObserver, TracingObserver};
pub use rules::{DispatchRule, BLOCK_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("axis order override has {actual} entries, expected {expected}")]
    LayoutOrderMismatch { expected: usize, actual: usize },

    #[error("axis order override {order:?} is not a permutation of the global axes")]
    InvalidAxisOrder { order: Vec<usize> },

    #[error("no local size candidate divides global size {global} on axis {axis} (budget {budget})")]
    NoDivisorFound {
        axis: usize,
        global: usize,
        budget: usize,
    },

    #[error("work-group limit {limit} is below the {required} items this layout needs")]
    WorkGroupLimitTooSmall { limit: usize, required: usize },

    #[error("invalid device limits: max work-group size must be at least 1")]
    InvalidDeviceLimits,
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Global and local sizes for one kernel launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchPlan {
    pub global: [usize; 3],
    pub local: [usize; 3],
    /// Global axis of each logical axis group
    pub axes: AxisAssignment,
    pub rule: DispatchRule,
}

impl DispatchPlan {
    /// Total work-items, `None` when the product overflows `usize`.
    pub fn global_volume(&self) -> Option<usize> {
        self.global.iter().try_fold(1usize, |acc, &g| acc.checked_mul(g))
    }

    pub fn local_volume(&self) -> usize {
        self.local.iter().product()
    }

    /// Work-groups per axis.
    pub fn group_counts(&self) -> [usize; 3] {
        std::array::from_fn(|axis| match self.local[axis] {
            0 => 0,
            local => self.global[axis] / local,
        })
    }

    /// Zero-volume plans come from empty tensors; callers skip the launch.
    pub fn is_empty(&self) -> bool {
        self.global.contains(&0)
    }

    /// Divisibility and work-group ceiling both hold.
    pub fn fits(&self, max_work_group_size: usize) -> bool {
        self.local_volume() <= max_work_group_size
            && self
                .global
                .iter()
                .zip(self.local.iter())
                .all(|(&global, &local)| local != 0 && global % local == 0)
    }
}

/// Dispatch planner bound to one device configuration.
#[derive(Debug, Clone)]
pub struct Planner<D = TensorFriendly> {
    limits: DeviceLimits,
    local_sizes: LocalSizeTable,
    distribution: D,
}

impl Planner<TensorFriendly> {
    pub fn new(config: &PlannerConfig) -> Self {
        Self::with_distribution(config, TensorFriendly)
    }
}

impl Default for Planner<TensorFriendly> {
    fn default() -> Self {
        Self::new(&PlannerConfig::default())
    }
}

impl<D: WorkDistribution> Planner<D> {
    pub fn with_distribution(config: &PlannerConfig, distribution: D) -> Self {
        Self {
            limits: config.limits,
            local_sizes: config.local_sizes.clone(),
            distribution,
        }
    }

    pub fn limits(&self) -> DeviceLimits {
        self.limits
    }

    pub fn plan(&self, shape: &TensorShape, layout: DataLayout) -> DispatchResult<DispatchPlan> {
        self.plan_observed(shape, layout, &[], &NoopObserver)
    }

    pub fn plan_desc(&self, desc: &TensorDesc) -> DispatchResult<DispatchPlan> {
        self.plan(&desc.shape, desc.layout)
    }

    /// Plan with an explicit axis priority for the greedy search.
    pub fn plan_with_order(
        &self,
        shape: &TensorShape,
        layout: DataLayout,
        order: &[usize],
    ) -> DispatchResult<DispatchPlan> {
        self.plan_observed(shape, layout, order, &NoopObserver)
    }

    /// Full entry point. A non-empty `order` replaces the layout's own
    /// priority; blocked layouts validate it but do not use it.
    pub fn plan_observed(
        &self,
        shape: &TensorShape,
        layout: DataLayout,
        order: &[usize],
        observer: &dyn PlanObserver,
    ) -> DispatchResult<DispatchPlan> {
        if !self.limits.is_valid() {
            return Err(DispatchError::InvalidDeviceLimits);
        }
        check_axis_order(order, 3)?;

        let rule = DispatchRule::for_layout(layout);
        observer.on_rule(layout, rule);

        let max = self.limits.max_work_group_size;
        let plan = match rule {
            DispatchRule::FeatureBlocked => {
                require_block(max)?;
                DispatchPlan {
                    global: [
                        shape.spatial_volume(),
                        align_up(shape.feature(), BLOCK_SIZE),
                        shape.batch(),
                    ],
                    local: [1, BLOCK_SIZE, 1],
                    axes: AxisAssignment::BLOCKED,
                    rule,
                }
            }
            DispatchRule::BatchFeatureBlocked => {
                require_block(max)?;
                let global = [
                    shape.spatial_volume(),
                    align_up(shape.feature(), BLOCK_SIZE),
                    align_up(shape.batch(), BLOCK_SIZE),
                ];
                let batch_local = max / BLOCK_SIZE;
                if global[2] % batch_local != 0 {
                    return Err(DispatchError::NoDivisorFound {
                        axis: 2,
                        global: global[2],
                        budget: batch_local,
                    });
                }
                DispatchPlan {
                    global,
                    local: [1, BLOCK_SIZE, batch_local],
                    axes: AxisAssignment::BLOCKED,
                    rule,
                }
            }
            DispatchRule::Generic { priority } => {
                let groups = self.distribution.global_work_groups(shape, layout);
                let order = if order.is_empty() { &priority[..] } else { order };
                let local = self.local_sizes.optimal_local_sizes_observed(
                    &groups.global,
                    max,
                    order,
                    observer,
                )?;
                DispatchPlan {
                    global: groups.global,
                    local: [local[0], local[1], local[2]],
                    axes: groups.axes,
                    rule,
                }
            }
        };

        observer.on_plan(layout, &plan);
        Ok(plan)
    }
}

fn require_block(max_work_group_size: usize) -> DispatchResult<()> {
    if max_work_group_size < BLOCK_SIZE {
        return Err(DispatchError::WorkGroupLimitTooSmall {
            limit: max_work_group_size,
            required: BLOCK_SIZE,
        });
    }
    Ok(())
}

/// Plan with the default candidate table and tensor-friendly distribution.
pub fn plan(
    shape: &TensorShape,
    layout: DataLayout,
    limits: DeviceLimits,
) -> DispatchResult<DispatchPlan> {
    let config = PlannerConfig::default().with_override(|c| c.limits = limits);
    Planner::new(&config).plan(shape, layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner(max: usize) -> Planner {
        Planner::new(&PlannerConfig::default().with_override(|c| c.limits = DeviceLimits::new(max)))
    }

    #[test]
    fn test_feature_blocked_scenario() {
        let shape = TensorShape::planar(2, 40, 100, 100);
        let plan = planner(256).plan(&shape, DataLayout::BFsYxFsv16).unwrap();
        assert_eq!(plan.global, [10_000, 64, 2]);
        assert_eq!(plan.local, [1, 32, 1]);
        assert_eq!(plan.axes, AxisAssignment::BLOCKED);
        assert!(plan.fits(256));
    }

    #[test]
    fn test_feature_blocked_zyx_uses_depth() {
        let shape = TensorShape::new(1, 33, 4, 8, 8);
        let plan = planner(256).plan(&shape, DataLayout::BFsZyxFsv32).unwrap();
        assert_eq!(plan.global, [256, 64, 1]);
    }

    #[test]
    fn test_batch_feature_blocked() {
        let shape = TensorShape::planar(3, 40, 7, 7);
        let plan = planner(256).plan(&shape, DataLayout::BsFsYxBsv32Fsv32).unwrap();
        assert_eq!(plan.global, [49, 64, 32]);
        assert_eq!(plan.local, [1, 32, 8]);
        assert_eq!(plan.group_counts(), [49, 2, 4]);
        assert!(plan.fits(256));
    }

    #[test]
    fn test_batch_feature_blocked_non_dividing_limit() {
        let shape = TensorShape::planar(1, 32, 2, 2);
        let err = planner(100).plan(&shape, DataLayout::BsFsYxBsv16Fsv16).unwrap_err();
        assert_eq!(
            err,
            DispatchError::NoDivisorFound {
                axis: 2,
                global: 32,
                budget: 3
            }
        );
    }

    #[test]
    fn test_blocked_needs_full_block() {
        let shape = TensorShape::planar(1, 16, 2, 2);
        let err = planner(16).plan(&shape, DataLayout::BFsYxFsv16).unwrap_err();
        assert_eq!(
            err,
            DispatchError::WorkGroupLimitTooSmall {
                limit: 16,
                required: 32
            }
        );
    }

    #[test]
    fn test_generic_bfyx() {
        let shape = TensorShape::planar(2, 40, 100, 100);
        let plan = planner(256).plan(&shape, DataLayout::Bfyx).unwrap();
        assert_eq!(plan.global, [10_000, 40, 2]);
        assert_eq!(plan.local, [16, 8, 2]);
        assert!(plan.fits(256));
    }

    #[test]
    fn test_generic_prime_axis_fails() {
        let shape = TensorShape::planar(1, 1, 1, 1031);
        let err = planner(256).plan(&shape, DataLayout::Bfyx).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::NoDivisorFound {
                axis: 0,
                global: 1031,
                ..
            }
        ));
    }

    #[test]
    fn test_order_override() {
        let shape = TensorShape::planar(64, 64, 8, 8);
        let plan = planner(256)
            .plan_with_order(&shape, DataLayout::Bfyx, &[2, 1, 0])
            .unwrap();
        assert_eq!(plan.local, [1, 4, 64]);

        let err = planner(256)
            .plan_with_order(&shape, DataLayout::Bfyx, &[0, 1])
            .unwrap_err();
        assert!(matches!(err, DispatchError::LayoutOrderMismatch { .. }));
    }

    #[test]
    fn test_order_override_checked_for_blocked_layouts() {
        let shape = TensorShape::planar(1, 32, 2, 2);
        let err = planner(256)
            .plan_with_order(&shape, DataLayout::BFsYxFsv16, &[0, 1, 2, 3])
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::LayoutOrderMismatch {
                expected: 3,
                actual: 4
            }
        );
    }

    #[test]
    fn test_zero_volume_plan() {
        let shape = TensorShape::planar(2, 0, 4, 4);
        let plan = planner(256).plan(&shape, DataLayout::BFsYxFsv16).unwrap();
        assert!(plan.is_empty());
        let plan = planner(256).plan(&shape, DataLayout::Bfyx).unwrap();
        assert!(plan.is_empty());
        assert!(plan.fits(256));
    }

    #[test]
    fn test_huge_extents_do_not_overflow() {
        let side = 1 << 20;
        let shape = TensorShape::new(side, side, 1, side, side);
        let plan = planner(256).plan(&shape, DataLayout::BFsYxFsv16).unwrap();
        assert_eq!(plan.global, [1 << 40, side, side]);
        assert!(!plan.is_empty());
        assert_eq!(plan.global_volume(), None);
        assert!(plan.fits(256));
    }

    #[test]
    fn test_invalid_limits() {
        let shape = TensorShape::planar(1, 1, 1, 1);
        assert_eq!(
            planner(0).plan(&shape, DataLayout::Bfyx).unwrap_err(),
            DispatchError::InvalidDeviceLimits
        );
    }

    #[test]
    fn test_free_function_matches_planner() {
        let shape = TensorShape::planar(4, 24, 13, 13);
        for layout in DataLayout::ALL {
            let a = plan(&shape, layout, DeviceLimits::new(512));
            let b = planner(512).plan(&shape, layout);
            assert_eq!(a, b, "{layout}");
        }
    }
}
