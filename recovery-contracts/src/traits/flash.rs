// SPDX-License-Identifier: GPL-3.0-only

use recovery_types::FlashType;

use crate::error::BackendResult;

/// A named raw flash partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashPartition {
    pub index: u32,
    pub name: String,
    pub size: u64,
    pub erase_size: u64,
}

impl FlashPartition {
    pub fn char_device(&self) -> String {
        format!("/dev/mtd/mtd{}", self.index)
    }

    pub fn block_device(&self) -> String {
        format!("/dev/block/mtdblock{}", self.index)
    }
}

pub trait FlashPartitions {
    fn scan(&self) -> BackendResult<Vec<FlashPartition>>;

    fn find_partition(&self, name: &str) -> BackendResult<Option<FlashPartition>> {
        Ok(self
            .scan()?
            .into_iter()
            .find(|partition| partition.name == name))
    }

    fn open_writer<'a>(
        &'a self,
        partition: &FlashPartition,
    ) -> BackendResult<Box<dyn FlashWriter + 'a>>;
}

/// Open write session on one flash partition
pub trait FlashWriter {
    fn erase_all(&mut self) -> BackendResult<()>;

    /// Commit and release the partition
    fn close(self: Box<Self>) -> BackendResult<()>;
}

/// Erases a whole partition addressed by flash technology
pub trait RawEraser {
    fn erase_raw_partition(&self, flash_type: FlashType, device: &str) -> BackendResult<()>;
}
