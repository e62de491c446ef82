//! Jit constants
//!
//! A [`KernelConfig`] is the flat set of named compile-time values spliced into
//! a kernel template. Kernels test these with `#if` instead of branching at
//! run time, so every optional numeric stage costs nothing when disabled.
//!
//! Values render the way an OpenCL/HIP compiler expects them:
//! booleans as `1`/`0`, floats as `f`-suffixed literals, non-finite floats as
//! `INFINITY`/`-INFINITY`/`NAN`.
//!
//! JSON has no non-finite numbers, so those floats serialize as the same
//! `"NAN"`/`"INFINITY"`/`"-INFINITY"` strings and parse back from them.

pub mod builder;

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize};

pub use builder::KernelConfigBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "JitValueRepr", try_from = "JitValueRepr")]
pub enum JitValue {
    Bool(bool),
    Int(i64),
    Float(f32),
}

/// Wire form of [`JitValue`].
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum JitValueRepr {
    Bool(bool),
    Int(i64),
    Float(f32),
    NonFinite(String),
}

impl From<JitValue> for JitValueRepr {
    fn from(value: JitValue) -> Self {
        match value {
            JitValue::Bool(v) => JitValueRepr::Bool(v),
            JitValue::Int(v) => JitValueRepr::Int(v),
            JitValue::Float(v) if v.is_finite() => JitValueRepr::Float(v),
            JitValue::Float(_) => JitValueRepr::NonFinite(value.to_string()),
        }
    }
}

impl TryFrom<JitValueRepr> for JitValue {
    type Error = String;

    fn try_from(repr: JitValueRepr) -> Result<Self, Self::Error> {
        match repr {
            JitValueRepr::Bool(v) => Ok(JitValue::Bool(v)),
            JitValueRepr::Int(v) => Ok(JitValue::Int(v)),
            JitValueRepr::Float(v) => Ok(JitValue::Float(v)),
            JitValueRepr::NonFinite(s) => match s.as_str() {
                "NAN" => Ok(JitValue::Float(f32::NAN)),
                "INFINITY" => Ok(JitValue::Float(f32::INFINITY)),
                "-INFINITY" => Ok(JitValue::Float(f32::NEG_INFINITY)),
                _ => Err(format!("unknown jit constant value {s:?}")),
            },
        }
    }
}

impl From<bool> for JitValue {
    fn from(value: bool) -> Self {
        JitValue::Bool(value)
    }
}

impl From<i64> for JitValue {
    fn from(value: i64) -> Self {
        JitValue::Int(value)
    }
}

impl From<usize> for JitValue {
    fn from(value: usize) -> Self {
        JitValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f32> for JitValue {
    fn from(value: f32) -> Self {
        JitValue::Float(value)
    }
}

impl fmt::Display for JitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JitValue::Bool(value) => write!(f, "{}", u8::from(*value)),
            JitValue::Int(value) => write!(f, "{value}"),
            JitValue::Float(value) if value.is_nan() => f.write_str("NAN"),
            JitValue::Float(value) if value.is_infinite() => {
                f.write_str(if *value > 0.0 { "INFINITY" } else { "-INFINITY" })
            }
            JitValue::Float(value) => write!(f, "{value:?}f"),
        }
    }
}

/// Named compile-time constants for one kernel build. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KernelConfig {
    constants: BTreeMap<String, JitValue>,
}

impl KernelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a constant, returning the value it replaced.
    pub fn add_constant(
        &mut self,
        name: impl Into<String>,
        value: impl Into<JitValue>,
    ) -> Option<JitValue> {
        self.constants.insert(name.into(), value.into())
    }

    /// Fold `other` in; its values win on name clashes.
    pub fn merge(&mut self, other: KernelConfig) {
        self.constants.extend(other.constants);
    }

    pub fn get(&self, name: &str) -> Option<JitValue> {
        self.constants.get(name).copied()
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            JitValue::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            JitValue::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            JitValue::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constants.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, JitValue> {
        self.constants.iter()
    }

    /// Compiler flags, e.g. `-DHAS_CLAMP=1`.
    pub fn to_defines(&self) -> Vec<String> {
        self.iter()
            .map(|(name, value)| format!("-D{name}={value}"))
            .collect()
    }

    /// `#define` block to prepend to the kernel source.
    pub fn to_header(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("#define {name} {value}\n"))
            .collect()
    }
}

impl<'a> IntoIterator for &'a KernelConfig {
    type Item = (&'a String, &'a JitValue);
    type IntoIter = btree_map::Iter<'a, String, JitValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_rendering() {
        assert_eq!(JitValue::from(true).to_string(), "1");
        assert_eq!(JitValue::from(false).to_string(), "0");
        assert_eq!(JitValue::from(32usize).to_string(), "32");
        assert_eq!(JitValue::from(-3i64).to_string(), "-3");
        assert_eq!(JitValue::from(1.5f32).to_string(), "1.5f");
        assert_eq!(JitValue::from(255.0f32).to_string(), "255.0f");
        assert_eq!(JitValue::from(f32::INFINITY).to_string(), "INFINITY");
        assert_eq!(JitValue::from(f32::NEG_INFINITY).to_string(), "-INFINITY");
        assert_eq!(JitValue::from(f32::NAN).to_string(), "NAN");
    }

    #[test]
    fn test_add_constant_replaces() {
        let mut config = KernelConfig::new();
        assert_eq!(config.add_constant("A", 1usize), None);
        assert_eq!(config.add_constant("A", 2usize), Some(JitValue::Int(1)));
        assert_eq!(config.len(), 1);
        assert_eq!(config.get_int("A"), Some(2));
    }

    #[test]
    fn test_typed_getters() {
        let mut config = KernelConfig::new();
        config.add_constant("FLAG", true);
        config.add_constant("VAL", 0.25f32);
        assert_eq!(config.get_bool("FLAG"), Some(true));
        assert_eq!(config.get_int("FLAG"), None);
        assert_eq!(config.get_float("VAL"), Some(0.25));
        assert_eq!(config.get_bool("MISSING"), None);
    }

    #[test]
    fn test_merge_prefers_incoming() {
        let mut base = KernelConfig::new();
        base.add_constant("A", 1usize);
        base.add_constant("B", false);
        let mut other = KernelConfig::new();
        other.add_constant("B", true);
        other.add_constant("C", 3usize);
        base.merge(other);
        assert_eq!(base.len(), 3);
        assert_eq!(base.get_bool("B"), Some(true));
    }

    #[test]
    fn test_defines_and_header_are_sorted() {
        let mut config = KernelConfig::new();
        config.add_constant("ZETA", 2usize);
        config.add_constant("ALPHA", true);
        assert_eq!(config.to_defines(), vec!["-DALPHA=1", "-DZETA=2"]);
        assert_eq!(config.to_header(), "#define ALPHA 1\n#define ZETA 2\n");
    }

    #[test]
    fn test_json_shape() {
        let mut config = KernelConfig::new();
        config.add_constant("HAS_CLAMP", true);
        config.add_constant("GWS_BATCH", 2usize);
        config.add_constant("OUT_HI_VAL", 0.5f32);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"GWS_BATCH":2,"HAS_CLAMP":true,"OUT_HI_VAL":0.5}"#);
        let back: KernelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_json_non_finite_floats() {
        let mut config = KernelConfig::new();
        config.add_constant("IN_HI_VAL", f32::INFINITY);
        config.add_constant("IN_LO_VAL", f32::NEG_INFINITY);
        config.add_constant("OUT_LO_VAL", f32::NAN);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"IN_HI_VAL":"INFINITY","IN_LO_VAL":"-INFINITY","OUT_LO_VAL":"NAN"}"#
        );

        let back: KernelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get_float("IN_HI_VAL"), Some(f32::INFINITY));
        assert_eq!(back.get_float("IN_LO_VAL"), Some(f32::NEG_INFINITY));
        assert!(back.get_float("OUT_LO_VAL").is_some_and(f32::is_nan));

        assert!(serde_json::from_str::<KernelConfig>(r#"{"A":"HUGE"}"#).is_err());
    }
}
