//! Memory layout tags.
//!
//! Names follow the usual `b`/`f`/`z`/`y`/`x` notation: `fsv16` packs features
//! into slices of 16, `bsv32` packs batches into slices of 32, and so on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical axis groups a work distribution is built from. Depth, height and
/// width are always contiguous in memory, so they travel together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisGroup {
    Spatial,
    Feature,
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataLayout {
    Bfyx,
    Yxfb,
    Byxf,
    Fyxb,
    Bfzyx,
    BFsYxFsv4,
    BFsYxFsv16,
    BFsYxFsv32,
    BFsZyxFsv16,
    BFsZyxFsv32,
    BsFsYxBsv16Fsv4,
    BsFsYxBsv16Fsv16,
    BsFsYxBsv32Fsv16,
    BsFsYxBsv32Fsv32,
    BsFsZyxBsv16Fsv16,
    BsFsZyxBsv16Fsv32,
    BsFsZyxBsv32Fsv16,
    BsFsZyxBsv32Fsv32,
}

impl DataLayout {
    pub const ALL: [DataLayout; 18] = [
        DataLayout::Bfyx,
        DataLayout::Yxfb,
        DataLayout::Byxf,
        DataLayout::Fyxb,
        DataLayout::Bfzyx,
        DataLayout::BFsYxFsv4,
        DataLayout::BFsYxFsv16,
        DataLayout::BFsYxFsv32,
        DataLayout::BFsZyxFsv16,
        DataLayout::BFsZyxFsv32,
        DataLayout::BsFsYxBsv16Fsv4,
        DataLayout::BsFsYxBsv16Fsv16,
        DataLayout::BsFsYxBsv32Fsv16,
        DataLayout::BsFsYxBsv32Fsv32,
        DataLayout::BsFsZyxBsv16Fsv16,
        DataLayout::BsFsZyxBsv16Fsv32,
        DataLayout::BsFsZyxBsv32Fsv16,
        DataLayout::BsFsZyxBsv32Fsv32,
    ];

    /// Planar layouts with no blocking on any axis.
    pub fn is_simple(&self) -> bool {
        matches!(
            self,
            DataLayout::Bfyx
                | DataLayout::Yxfb
                | DataLayout::Byxf
                | DataLayout::Fyxb
                | DataLayout::Bfzyx
        )
    }

    /// Layouts that block both the batch and the feature axis.
    pub fn is_batch_feature_blocked(&self) -> bool {
        matches!(
            self,
            DataLayout::BsFsYxBsv16Fsv4
                | DataLayout::BsFsYxBsv16Fsv16
                | DataLayout::BsFsYxBsv32Fsv16
                | DataLayout::BsFsYxBsv32Fsv32
                | DataLayout::BsFsZyxBsv16Fsv16
                | DataLayout::BsFsZyxBsv16Fsv32
                | DataLayout::BsFsZyxBsv32Fsv16
                | DataLayout::BsFsZyxBsv32Fsv32
        )
    }

    /// Storage order of the axis groups, innermost first.
    ///
    /// Every blocked layout keeps `b, f, spatial` as its outer order.
    pub fn natural_order(&self) -> [AxisGroup; 3] {
        use AxisGroup::*;
        match self {
            DataLayout::Yxfb => [Batch, Feature, Spatial],
            DataLayout::Byxf => [Feature, Spatial, Batch],
            DataLayout::Fyxb => [Batch, Spatial, Feature],
            _ => [Spatial, Feature, Batch],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataLayout::Bfyx => "bfyx",
            DataLayout::Yxfb => "yxfb",
            DataLayout::Byxf => "byxf",
            DataLayout::Fyxb => "fyxb",
            DataLayout::Bfzyx => "bfzyx",
            DataLayout::BFsYxFsv4 => "b_fs_yx_fsv4",
            DataLayout::BFsYxFsv16 => "b_fs_yx_fsv16",
            DataLayout::BFsYxFsv32 => "b_fs_yx_fsv32",
            DataLayout::BFsZyxFsv16 => "b_fs_zyx_fsv16",
            DataLayout::BFsZyxFsv32 => "b_fs_zyx_fsv32",
            DataLayout::BsFsYxBsv16Fsv4 => "bs_fs_yx_bsv16_fsv4",
            DataLayout::BsFsYxBsv16Fsv16 => "bs_fs_yx_bsv16_fsv16",
            DataLayout::BsFsYxBsv32Fsv16 => "bs_fs_yx_bsv32_fsv16",
            DataLayout::BsFsYxBsv32Fsv32 => "bs_fs_yx_bsv32_fsv32",
            DataLayout::BsFsZyxBsv16Fsv16 => "bs_fs_zyx_bsv16_fsv16",
            DataLayout::BsFsZyxBsv16Fsv32 => "bs_fs_zyx_bsv16_fsv32",
            DataLayout::BsFsZyxBsv32Fsv16 => "bs_fs_zyx_bsv32_fsv16",
            DataLayout::BsFsZyxBsv32Fsv32 => "bs_fs_zyx_bsv32_fsv32",
        }
    }
}

impl fmt::Display for DataLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
