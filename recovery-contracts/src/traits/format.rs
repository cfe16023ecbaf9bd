// SPDX-License-Identifier: GPL-3.0-only

use crate::error::BackendResult;
use crate::traits::flash::{FlashPartitions, RawEraser};

pub trait RfsFormatter {
    fn format_rfs(&self, device: &str, mount_point: &str) -> BackendResult<()>;
}

pub trait ExtFormatter {
    fn format_ext2(&self, device: &str) -> BackendResult<()>;

    fn format_ext3(&self, device: &str) -> BackendResult<()>;
}

pub trait Ext4Builder {
    /// Drop any build parameters left over from a previous image
    fn reset(&self);

    /// Build an ext4 filesystem; a `length` of 0 sizes it from the device
    fn build(&self, device: &str, length: i64) -> BackendResult<()>;
}

/// The set of erase/format backends the dispatcher can route to
#[derive(Clone, Copy)]
pub struct FormatBackends<'a> {
    pub flash: &'a dyn FlashPartitions,
    pub raw: &'a dyn RawEraser,
    pub rfs: &'a dyn RfsFormatter,
    pub ext: &'a dyn ExtFormatter,
    pub ext4: &'a dyn Ext4Builder,
}
