// SPDX-License-Identifier: GPL-3.0-only

//! /etc/fstab generation from the volume table
//!
//! Lets busybox `mount /cache` and friends work inside recovery.

use std::fs::{self, OpenOptions};
use std::io;

use recovery_contracts::{FlashPartitions, VolumeCatalog};
use recovery_types::{FsType, Volume};

use crate::config::StorageLayout;

const FSTAB_ROOTS: [&str; 8] = [
    "/boot", "/cache", "/data", "/datadata", "/emmc", "/system", "/sdcard", "/sd-ext",
];

/// One fstab line for `volume`, or `None` when it has no usable block device
pub fn fstab_line(volume: &Volume, flash: &dyn FlashPartitions) -> Option<String> {
    let device = if volume.device.starts_with('/') {
        volume.device.clone()
    } else {
        match flash.find_partition(&volume.device) {
            Ok(Some(partition)) => partition.block_device(),
            Ok(None) => {
                tracing::warn!("No flash partition \"{}\" for {}", volume.device, volume.mount_point);
                return None;
            }
            Err(error) => {
                tracing::warn!("Flash scan failed for {}: {}", volume.mount_point, error);
                return None;
            }
        }
    };

    let fs_type = if volume.fs_type2.is_some() && volume.kind() != FsType::Rfs {
        "auto"
    } else {
        volume.fs_type.as_str()
    };

    Some(format!("{} {} {} rw\n", device, volume.mount_point, fs_type))
}

pub fn render_fstab(catalog: &dyn VolumeCatalog, flash: &dyn FlashPartitions) -> Vec<String> {
    let mut lines = Vec::new();
    for root in FSTAB_ROOTS {
        let Some(volume) = catalog.volume_at(root) else {
            tracing::debug!("No {} volume, skipping fstab entry", root);
            continue;
        };
        if root == "/boot" && matches!(volume.kind(), FsType::Mtd | FsType::Emmc | FsType::Bml) {
            continue;
        }
        if let Some(line) = fstab_line(volume, flash) {
            lines.push(line);
        }
    }
    lines
}

/// Write /etc/fstab and touch /etc/mtab; returns the number of entries
pub fn create_fstab(
    layout: &StorageLayout,
    catalog: &dyn VolumeCatalog,
    flash: &dyn FlashPartitions,
) -> io::Result<usize> {
    let etc = layout.host_path("/etc");
    fs::create_dir_all(&etc)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(etc.join("mtab"))?;

    let lines = render_fstab(catalog, flash);
    fs::write(etc.join("fstab"), lines.concat())?;
    tracing::info!("Wrote {} entries to /etc/fstab", lines.len());
    Ok(lines.len())
}
