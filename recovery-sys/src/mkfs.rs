// SPDX-License-Identifier: GPL-3.0-only

//! Filesystem creation and raw erase backends

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};

use recovery_contracts::{
    BackendResult, Ext4Builder, ExtFormatter, FlashPartitions, RawEraser, RfsFormatter,
};
use recovery_types::FlashType;
use tracing::{info, warn};

use crate::cmd;
use crate::error::{Result, SysError};

/// Samsung RFS volumes are FAT underneath
pub struct RfsTool;

impl RfsFormatter for RfsTool {
    fn format_rfs(&self, device: &str, mount_point: &str) -> BackendResult<()> {
        info!("Formatting RFS volume {} on {}", mount_point, device);
        cmd::run("fat.format", &["-F", "32", "-S", "4096", "-s", "4", device])?;
        Ok(())
    }
}

/// ext2/ext3 through e2fsprogs
pub struct E2fsTools;

impl ExtFormatter for E2fsTools {
    fn format_ext2(&self, device: &str) -> BackendResult<()> {
        info!("Formatting ext2 on {}", device);
        cmd::run("mke2fs", &["-F", "-b", "4096", "-m", "0", device])?;
        Ok(())
    }

    fn format_ext3(&self, device: &str) -> BackendResult<()> {
        info!("Formatting ext3 on {}", device);
        cmd::run("mke2fs", &["-F", "-j", "-b", "4096", "-m", "0", device])?;
        cmd::run("tune2fs", &["-c", "0", "-i", "0", device])?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Ext4BuildState {
    device: Option<String>,
    length: i64,
}

/// ext4 image builder, preferring `make_ext4fs` over `mkfs.ext4`
#[derive(Debug, Default)]
pub struct MakeExt4fs {
    state: RefCell<Ext4BuildState>,
}

impl MakeExt4fs {
    fn run_builder(device: &str, length: i64) -> Result<()> {
        let length_arg = length.to_string();
        let mut args = Vec::new();
        if length != 0 {
            args.extend(["-l", length_arg.as_str()]);
        }
        args.push(device);

        match cmd::run("make_ext4fs", &args) {
            Err(SysError::ToolNotFound(_)) => {}
            other => return other.map(|_| ()),
        }

        let size_arg;
        let mut args = vec!["-F", "-q", device];
        if length > 0 {
            size_arg = format!("{}k", length / 1024);
            args.push(size_arg.as_str());
        } else if length < 0 {
            warn!("mkfs.ext4 can't reserve trailing space; using the whole device");
        }
        cmd::run("mkfs.ext4", &args)?;
        Ok(())
    }
}

impl Ext4Builder for MakeExt4fs {
    fn reset(&self) {
        *self.state.borrow_mut() = Ext4BuildState::default();
    }

    fn build(&self, device: &str, length: i64) -> BackendResult<()> {
        {
            let mut state = self.state.borrow_mut();
            if let Some(previous) = &state.device {
                warn!("ext4 build state from {} was not reset", previous);
            }
            state.device = Some(device.to_string());
            state.length = length;
        }

        info!("Building ext4 on {} (length {})", device, length);
        Self::run_builder(device, length)?;
        Ok(())
    }
}

/// Whole-partition erase keyed by flash technology
pub struct SysRawEraser<'a> {
    flash: &'a dyn FlashPartitions,
}

impl<'a> SysRawEraser<'a> {
    pub fn new(flash: &'a dyn FlashPartitions) -> Self {
        Self { flash }
    }

    fn zero_fill(device: &str) -> Result<u64> {
        let mut file = OpenOptions::new().write(true).open(device).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                SysError::PermissionDenied(format!("Cannot open {} for writing", device))
            } else if e.kind() == std::io::ErrorKind::NotFound {
                SysError::DeviceNotFound(device.to_string())
            } else {
                SysError::Io(e)
            }
        })?;

        let size = file.seek(SeekFrom::End(0))?;
        file.seek(SeekFrom::Start(0))?;

        let buffer = vec![0u8; 1024 * 1024];
        let mut remaining = size;
        while remaining > 0 {
            let chunk = remaining.min(buffer.len() as u64) as usize;
            file.write_all(&buffer[..chunk])?;
            remaining -= chunk as u64;
        }

        file.sync_all()?;
        Ok(size)
    }
}

impl RawEraser for SysRawEraser<'_> {
    fn erase_raw_partition(&self, flash_type: FlashType, device: &str) -> BackendResult<()> {
        match flash_type {
            FlashType::Mtd => {
                let partition = self
                    .flash
                    .find_partition(device)?
                    .ok_or_else(|| SysError::DeviceNotFound(device.to_string()))?;
                let mut writer = self.flash.open_writer(&partition)?;
                writer.erase_all()?;
                writer.close()
            }
            FlashType::Mmc => {
                let erased = Self::zero_fill(device)?;
                info!("Zeroed {} bytes on {}", erased, device);
                Ok(())
            }
            FlashType::Bml => Err(SysError::Unsupported(format!(
                "raw BML erase of {} is not available in this build",
                device
            ))
            .into()),
        }
    }
}
