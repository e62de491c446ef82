//! Observability hooks for the planner.
//!
//! The planner never logs on its own. Callers that want diagnostics pass an
//! observer; [`TracingObserver`] forwards everything to `tracing`.

use crate::dispatch::{DispatchPlan, DispatchRule};
use crate::tensor::DataLayout;

pub trait PlanObserver {
    /// A layout was matched to a rule.
    fn on_rule(&self, _layout: DataLayout, _rule: DispatchRule) {}

    /// The greedy search settled one axis.
    fn on_local_size(&self, _axis: usize, _global: usize, _budget: usize, _local: usize) {}

    /// Planning finished.
    fn on_plan(&self, _layout: DataLayout, _plan: &DispatchPlan) {}
}

/// Observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PlanObserver for NoopObserver {}

/// Observer that emits `tracing` events at debug/trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PlanObserver for TracingObserver {
    fn on_rule(&self, layout: DataLayout, rule: DispatchRule) {
        tracing::debug!(%layout, ?rule, "dispatch rule selected");
    }

    fn on_local_size(&self, axis: usize, global: usize, budget: usize, local: usize) {
        tracing::trace!(axis, global, budget, local, "local size chosen");
    }

    fn on_plan(&self, layout: DataLayout, plan: &DispatchPlan) {
        tracing::debug!(
            %layout,
            gws = ?plan.global,
            lws = ?plan.local,
            "dispatch planned"
        );
    }
}
