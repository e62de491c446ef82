//! Device execution limits.

use serde::{Deserialize, Serialize};

/// Work-group size most discrete GPUs accept when the caller does not say.
pub const DEFAULT_MAX_WORK_GROUP_SIZE: usize = 256;

/// Execution limits of the target device.
///
/// Only the work-group ceiling matters to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceLimits {
    /// Maximum number of work-items in one work-group (>= 1)
    pub max_work_group_size: usize,
}

impl DeviceLimits {
    pub fn new(max_work_group_size: usize) -> Self {
        Self {
            max_work_group_size,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.max_work_group_size >= 1
    }
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORK_GROUP_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = DeviceLimits::default();
        assert_eq!(limits.max_work_group_size, 256);
        assert!(limits.is_valid());
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        assert!(!DeviceLimits::new(0).is_valid());
        assert!(DeviceLimits::new(1).is_valid());
    }
}
