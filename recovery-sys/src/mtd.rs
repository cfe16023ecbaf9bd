// SPDX-License-Identifier: GPL-3.0-only

//! Raw MTD flash partitions
//!
//! Partitions are discovered from `/proc/mtd` and erased with `flash_erase`
//! from mtd-utils.

use std::fs;
use std::path::PathBuf;

use recovery_contracts::{BackendResult, FlashPartition, FlashPartitions, FlashWriter};
use tracing::{debug, info};

use crate::cmd;
use crate::error::{Result, SysError};

const PROC_MTD: &str = "/proc/mtd";

pub struct MtdPartitions {
    proc_path: PathBuf,
}

impl Default for MtdPartitions {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from(PROC_MTD),
        }
    }
}

impl MtdPartitions {
    pub fn with_proc_path(path: impl Into<PathBuf>) -> Self {
        Self {
            proc_path: path.into(),
        }
    }

    fn read_partitions(&self) -> Result<Vec<FlashPartition>> {
        if !self.proc_path.exists() {
            debug!("{} not present; no MTD partitions", self.proc_path.display());
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.proc_path)?;
        Ok(parse_proc_mtd(&content))
    }
}

impl FlashPartitions for MtdPartitions {
    fn scan(&self) -> BackendResult<Vec<FlashPartition>> {
        Ok(self.read_partitions()?)
    }

    fn open_writer<'a>(
        &'a self,
        partition: &FlashPartition,
    ) -> BackendResult<Box<dyn FlashWriter + 'a>> {
        let device = partition.char_device();
        if !std::path::Path::new(&device).exists() {
            return Err(SysError::DeviceNotFound(device).into());
        }
        Ok(Box::new(MtdWriter {
            partition: partition.clone(),
        }))
    }
}

struct MtdWriter {
    partition: FlashPartition,
}

impl FlashWriter for MtdWriter {
    fn erase_all(&mut self) -> BackendResult<()> {
        let device = self.partition.char_device();
        info!("Erasing MTD partition {} ({})", self.partition.name, device);
        cmd::run("flash_erase", &[device.as_str(), "0", "0"])?;
        Ok(())
    }

    fn close(self: Box<Self>) -> BackendResult<()> {
        nix::unistd::sync();
        debug!("Closed MTD partition {}", self.partition.name);
        Ok(())
    }
}

/// Parse `/proc/mtd`: `mtdN: <size hex> <erasesize hex> "<name>"`
pub fn parse_proc_mtd(input: &str) -> Vec<FlashPartition> {
    input
        .lines()
        .filter_map(|line| {
            let (device, rest) = line.split_once(':')?;
            let index = device.trim().strip_prefix("mtd")?.parse().ok()?;

            let mut fields = rest.split_whitespace();
            let size = u64::from_str_radix(fields.next()?, 16).ok()?;
            let erase_size = u64::from_str_radix(fields.next()?, 16).ok()?;

            let name = rest.split_once('"')?.1.rsplit_once('"')?.0;

            Some(FlashPartition {
                index,
                name: name.to_string(),
                size,
                erase_size,
            })
        })
        .collect()
}
