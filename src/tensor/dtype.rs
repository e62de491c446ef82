//! Element datatypes understood by the quantize kernels.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Datatype {
    Uint8,
    Int8,
    F16,
    F32,
    Int32,
    Int64,
}

impl Datatype {
    /// 8-bit integer kinds. Results in these types are already integral, so
    /// the kernel skips the rounding step for them.
    pub fn is_narrow_integer(&self) -> bool {
        matches!(self, Datatype::Uint8 | Datatype::Int8)
    }

    pub fn size_in_bytes(&self) -> usize {
        match self {
            Datatype::Uint8 | Datatype::Int8 => 1,
            Datatype::F16 => 2,
            Datatype::F32 | Datatype::Int32 => 4,
            Datatype::Int64 => 8,
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Datatype::Uint8 => "u8",
            Datatype::Int8 => "i8",
            Datatype::F16 => "f16",
            Datatype::F32 => "f32",
            Datatype::Int32 => "i32",
            Datatype::Int64 => "i64",
        };
        f.write_str(name)
    }
}
