//! Shared fixtures for the integration tests.
//!
//! Tests that touch process environment variables must be marked
//! `#[serial]` so they do not race each other.

#![allow(dead_code)]

use once_cell::sync::Lazy;
use quantforge::device::{DeviceLimits, PlannerConfig};
use quantforge::dispatch::Planner;
use quantforge::quantize::QuantizeParams;
use quantforge::tensor::{DataLayout, Datatype, TensorDesc, TensorShape};
pub use serial_test::serial;

/// Work-group ceilings seen on real devices.
pub const DEVICE_LIMITS: [usize; 6] = [32, 64, 128, 256, 512, 1024];

/// Planner for the common 256-wide device.
pub static DEFAULT_PLANNER: Lazy<Planner> = Lazy::new(Planner::default);

pub fn planner(max_work_group_size: usize) -> Planner {
    Planner::new(&PlannerConfig::new(DeviceLimits::new(max_work_group_size)))
}

/// The (2, 40, 100x100) activation used across the scenario tests.
pub fn activation_shape() -> TensorShape {
    TensorShape::planar(2, 40, 100, 100)
}

/// f32 in, `out` out, same shape and layout on both sides.
pub fn quantize_params(shape: TensorShape, layout: DataLayout, out: Datatype) -> QuantizeParams {
    QuantizeParams::new(
        TensorDesc::new(shape, layout, Datatype::F32),
        TensorDesc::new(shape, layout, out),
    )
}

/// Scope guard that restores an environment variable on drop.
pub struct EnvGuard {
    key: &'static str,
    previous: Option<String>,
}

impl EnvGuard {
    pub fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value);
        Self { key, previous }
    }

    pub fn unset(key: &'static str) -> Self {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        Self { key, previous }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(value) => std::env::set_var(self.key, value),
            None => std::env::remove_var(self.key),
        }
    }
}
