//! Device capabilities and planner tuning.

pub mod limits;
pub mod tuning;

pub use limits::{DeviceLimits, DEFAULT_MAX_WORK_GROUP_SIZE};
pub use tuning::PlannerConfig;
