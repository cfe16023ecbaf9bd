// SPDX-License-Identifier: GPL-3.0-only

use std::cell::RefCell;
use std::collections::BTreeSet;

use recovery_contracts::{
    BackendError, BackendResult, Ext4Builder, ExtFormatter, FlashPartition, FlashPartitions,
    FlashWriter, FormatBackends, RawEraser, RfsFormatter,
};
use recovery_types::FlashType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Scan,
    OpenWriter(String),
    EraseAll(String),
    Close(String),
    RawErase(FlashType, String),
    Rfs { device: String, mount_point: String },
    Ext2(String),
    Ext3(String),
    Ext4Reset,
    Ext4Build { device: String, length: i64 },
}

/// Every format backend at once, logging each call in order
#[derive(Debug, Default)]
pub struct RecordingBackends {
    partitions: Vec<FlashPartition>,
    failing: BTreeSet<&'static str>,
    calls: RefCell<Vec<BackendCall>>,
}

impl RecordingBackends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_partition(mut self, name: &str) -> Self {
        let index = self.partitions.len() as u32;
        self.partitions.push(FlashPartition {
            index,
            name: name.to_string(),
            size: 0x0400_0000,
            erase_size: 0x0002_0000,
        });
        self
    }

    /// Make one operation fail: "scan", "open", "erase", "close", "raw",
    /// "rfs", "ext2", "ext3" or "ext4"
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn as_backends(&self) -> FormatBackends<'_> {
        FormatBackends {
            flash: self,
            raw: self,
            rfs: self,
            ext: self,
            ext4: self,
        }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: BackendCall, operation: &str) -> BackendResult<()> {
        self.calls.borrow_mut().push(call);
        if self.failing.contains(operation) {
            return Err(BackendError::new(format!("{operation} failed")));
        }
        Ok(())
    }
}

impl FlashPartitions for RecordingBackends {
    fn scan(&self) -> BackendResult<Vec<FlashPartition>> {
        self.record(BackendCall::Scan, "scan")?;
        Ok(self.partitions.clone())
    }

    fn open_writer<'a>(
        &'a self,
        partition: &FlashPartition,
    ) -> BackendResult<Box<dyn FlashWriter + 'a>> {
        self.record(BackendCall::OpenWriter(partition.name.clone()), "open")?;
        Ok(Box::new(RecordingWriter {
            backends: self,
            name: partition.name.clone(),
        }))
    }
}

struct RecordingWriter<'a> {
    backends: &'a RecordingBackends,
    name: String,
}

impl FlashWriter for RecordingWriter<'_> {
    fn erase_all(&mut self) -> BackendResult<()> {
        self.backends
            .record(BackendCall::EraseAll(self.name.clone()), "erase")
    }

    fn close(self: Box<Self>) -> BackendResult<()> {
        self.backends
            .record(BackendCall::Close(self.name.clone()), "close")
    }
}

impl RawEraser for RecordingBackends {
    fn erase_raw_partition(&self, flash_type: FlashType, device: &str) -> BackendResult<()> {
        self.record(BackendCall::RawErase(flash_type, device.to_string()), "raw")
    }
}

impl RfsFormatter for RecordingBackends {
    fn format_rfs(&self, device: &str, mount_point: &str) -> BackendResult<()> {
        self.record(
            BackendCall::Rfs {
                device: device.to_string(),
                mount_point: mount_point.to_string(),
            },
            "rfs",
        )
    }
}

impl ExtFormatter for RecordingBackends {
    fn format_ext2(&self, device: &str) -> BackendResult<()> {
        self.record(BackendCall::Ext2(device.to_string()), "ext2")
    }

    fn format_ext3(&self, device: &str) -> BackendResult<()> {
        self.record(BackendCall::Ext3(device.to_string()), "ext3")
    }
}

impl Ext4Builder for RecordingBackends {
    fn reset(&self) {
        self.calls.borrow_mut().push(BackendCall::Ext4Reset);
    }

    fn build(&self, device: &str, length: i64) -> BackendResult<()> {
        self.record(
            BackendCall::Ext4Build {
                device: device.to_string(),
                length,
            },
            "ext4",
        )
    }
}
