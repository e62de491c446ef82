//! Environment-driven configuration. Every test here mutates process
//! environment, so all of them run serially.

mod common;

use common::{serial, EnvGuard};
use quantforge::device::{PlannerConfig, DEFAULT_MAX_WORK_GROUP_SIZE};
use quantforge::dispatch::{LocalSizeTable, Planner};
use quantforge::logging::{LogFormat, LogLevel, LoggingConfig};
use quantforge::tensor::{DataLayout, TensorShape};

const MAX_ENV: &str = "QUANTFORGE_MAX_WORK_GROUP_SIZE";
const SIZES_ENV: &str = "QUANTFORGE_LOCAL_SIZES";

#[test]
#[serial]
fn test_planner_config_defaults_without_env() {
    let _max = EnvGuard::unset(MAX_ENV);
    let _sizes = EnvGuard::unset(SIZES_ENV);

    let config = PlannerConfig::from_env();
    assert_eq!(config, PlannerConfig::default());
    assert_eq!(config.limits.max_work_group_size, DEFAULT_MAX_WORK_GROUP_SIZE);
}

#[test]
#[serial]
fn test_planner_config_reads_env() {
    let _max = EnvGuard::set(MAX_ENV, " 1024 ");
    let _sizes = EnvGuard::set(SIZES_ENV, "64,16,4,1");

    let config = PlannerConfig::from_env();
    assert_eq!(config.limits.max_work_group_size, 1024);
    assert_eq!(config.local_sizes.values(), &[64, 16, 4, 1]);
    assert!(config.validate().is_ok());

    // The custom table caps every axis at 64.
    let plan = Planner::new(&config)
        .plan(&TensorShape::planar(4, 64, 32, 32), DataLayout::Bfyx)
        .unwrap();
    assert_eq!(plan.local, [64, 16, 1]);
}

#[test]
#[serial]
fn test_planner_config_ignores_garbage() {
    let _max = EnvGuard::set(MAX_ENV, "lots");
    let _sizes = EnvGuard::set(SIZES_ENV, "1,2,3");

    let config = PlannerConfig::from_env();
    assert_eq!(config.limits.max_work_group_size, DEFAULT_MAX_WORK_GROUP_SIZE);
    assert_eq!(config.local_sizes, LocalSizeTable::default());
}

#[test]
#[serial]
fn test_zero_limit_from_env_fails_validation() {
    let _max = EnvGuard::set(MAX_ENV, "0");
    let _sizes = EnvGuard::unset(SIZES_ENV);

    assert!(PlannerConfig::from_env().validate().is_err());
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("planner.log");

    let _level = EnvGuard::set("QUANTFORGE_LOG_LEVEL", "debug");
    let _format = EnvGuard::set("QUANTFORGE_LOG_FORMAT", "json");
    let _file = EnvGuard::set("QUANTFORGE_LOG_FILE", log_path.to_str().unwrap());

    let config = LoggingConfig::from_env();
    assert_eq!(config.level, LogLevel::Debug);
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.log_file.as_deref(), Some(log_path.as_path()));
}

#[test]
#[serial]
fn test_logging_config_env_fallbacks() {
    let _level = EnvGuard::set("QUANTFORGE_LOG_LEVEL", "chatty");
    let _format = EnvGuard::unset("QUANTFORGE_LOG_FORMAT");
    let _file = EnvGuard::set("QUANTFORGE_LOG_FILE", "");

    let config = LoggingConfig::from_env();
    assert_eq!(config, LoggingConfig::default());
}

#[test]
#[serial]
fn test_init_writes_json_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("logs/quantforge.log");
    let _rust_log = EnvGuard::set("RUST_LOG", "debug");

    let config = LoggingConfig::new()
        .with_format(LogFormat::Json)
        .with_log_file(&log_path);
    quantforge::init_with_config(&config).unwrap();
    assert!(quantforge::logging::is_initialized());

    tracing::info!(target: "quantforge", marker = "config_env_tests", "hello");
    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("config_env_tests"), "{contents}");
}
