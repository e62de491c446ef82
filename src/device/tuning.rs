//! Planner tuning configuration
//!
//! Bundles the device limits with the candidate local-size table. Values can
//! be supplied programmatically or picked up from the environment.
//!
//! # Environment Variables
//!
//! - `QUANTFORGE_MAX_WORK_GROUP_SIZE`: device work-group ceiling
//! - `QUANTFORGE_LOCAL_SIZES`: comma separated, strictly descending candidate
//!   local sizes (e.g. `"256,128,64,1"`)
//!
//! Unparsable values are ignored and the defaults stay in place.
//!
//! ```rust
//! use quantforge::device::PlannerConfig;
//!
//! let config = PlannerConfig::default().with_override(|c| c.limits.max_work_group_size = 1024);
//! assert!(config.validate().is_ok());
//! ```

use std::env;

use crate::device::DeviceLimits;
use crate::dispatch::LocalSizeTable;

const MAX_WORK_GROUP_SIZE_ENV: &str = "QUANTFORGE_MAX_WORK_GROUP_SIZE";
const LOCAL_SIZES_ENV: &str = "QUANTFORGE_LOCAL_SIZES";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannerConfig {
    pub limits: DeviceLimits,
    pub local_sizes: LocalSizeTable,
}

impl PlannerConfig {
    pub fn new(limits: DeviceLimits) -> Self {
        Self {
            limits,
            local_sizes: LocalSizeTable::default(),
        }
    }

    /// Create a configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = PlannerConfig::default();

        if let Ok(max) = env::var(MAX_WORK_GROUP_SIZE_ENV) {
            if let Ok(size) = max.trim().parse::<usize>() {
                config.limits.max_work_group_size = size;
            }
        }

        if let Ok(sizes) = env::var(LOCAL_SIZES_ENV) {
            match parse_local_sizes(&sizes) {
                Some(table) => config.local_sizes = table,
                None => tracing::warn!(value = %sizes, "ignoring invalid {}", LOCAL_SIZES_ENV),
            }
        }

        config
    }

    pub fn with_override(&self, f: impl FnOnce(&mut PlannerConfig)) -> Self {
        let mut config = self.clone();
        f(&mut config);
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.limits.is_valid() {
            return Err("max_work_group_size cannot be zero".to_string());
        }
        self.local_sizes.validate()
    }
}

fn parse_local_sizes(value: &str) -> Option<LocalSizeTable> {
    let sizes = value
        .split(',')
        .map(|item| item.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    LocalSizeTable::new(sizes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.limits.max_work_group_size, 256);
        assert_eq!(config.local_sizes, LocalSizeTable::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_override() {
        let config = PlannerConfig::default().with_override(|c| c.limits = DeviceLimits::new(0));
        assert!(config.validate().is_err());
        assert_eq!(config.local_sizes, LocalSizeTable::default());
    }

    #[test]
    fn test_parse_local_sizes() {
        let table = parse_local_sizes("64, 16,1").unwrap();
        assert_eq!(table.values(), &[64, 16, 1]);
        assert!(parse_local_sizes("16,64").is_none());
        assert!(parse_local_sizes("16,abc").is_none());
        assert!(parse_local_sizes("").is_none());
    }
}
