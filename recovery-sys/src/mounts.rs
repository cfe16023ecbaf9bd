// SPDX-License-Identifier: GPL-3.0-only

use std::fs;
use std::path::PathBuf;

use nix::mount::{MsFlags, mount, umount};
use recovery_contracts::{BackendResult, FlashPartitions, MountControl, VolumeCatalog};
use recovery_types::{FsType, Volume};
use tracing::{debug, info, warn};

use crate::error::{Result, SysError};

const PROC_MOUNTS: &str = "/proc/self/mounts";
const DATA: &str = "/data";
const MEDIA_DIR: &str = "/data/media";

/// One line of the kernel mount table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
}

/// Parse `/proc/mounts` content, skipping malformed lines
pub fn parse_mount_table(input: &str) -> Vec<MountEntry> {
    input
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mount_point = fields.next()?;
            let fs_type = fields.next()?;
            Some(MountEntry {
                device: unescape_mount_field(device),
                mount_point: unescape_mount_field(mount_point),
                fs_type: fs_type.to_string(),
            })
        })
        .collect()
}

/// Decode the kernel's `\ooo` octal escapes; mount points are raw bytes
fn unescape_mount_field(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'\\'
            && let Some(digits) = bytes.get(index + 1..index + 4)
            && digits.iter().all(|digit| (b'0'..=b'7').contains(digit))
        {
            let code = digits
                .iter()
                .fold(0u32, |code, digit| code * 8 + u32::from(digit - b'0'));
            if let Ok(byte) = u8::try_from(code) {
                decoded.push(byte);
                index += 4;
                continue;
            }
        }

        decoded.push(bytes[index]);
        index += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

/// Mount control backed by the kernel mount table and mount(2)
pub struct SysMountControl<'a> {
    catalog: &'a dyn VolumeCatalog,
    flash: &'a dyn FlashPartitions,
    mounts_path: PathBuf,
    /// Primary storage path emulated under `/data/media`, if any
    media_storage: Option<String>,
}

impl<'a> SysMountControl<'a> {
    pub fn new(catalog: &'a dyn VolumeCatalog, flash: &'a dyn FlashPartitions) -> Self {
        Self {
            catalog,
            flash,
            mounts_path: PathBuf::from(PROC_MOUNTS),
            media_storage: None,
        }
    }

    /// Serve `primary_storage` from `/data/media` instead of its own volume
    pub fn with_data_media(mut self, primary_storage: impl Into<String>) -> Self {
        self.media_storage = Some(primary_storage.into());
        self
    }

    pub fn with_mounts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mounts_path = path.into();
        self
    }

    fn find_mounted(&self, mount_point: &str) -> Result<Option<MountEntry>> {
        let table = fs::read_to_string(&self.mounts_path)?;
        Ok(parse_mount_table(&table)
            .into_iter()
            .find(|entry| entry.mount_point == mount_point))
    }

    fn is_media_path(&self, path: &str) -> bool {
        self.media_storage.as_deref().is_some_and(|storage| {
            path.strip_prefix(storage)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    /// Volume backing `path`; emulated storage resolves to `/data`
    fn volume(&self, path: &str) -> Result<&'a Volume> {
        let lookup = if self.is_media_path(path) { DATA } else { path };
        self.catalog
            .volume_for_path(lookup)
            .ok_or_else(|| SysError::DeviceNotFound(format!("no volume for {}", path)))
    }

    /// Point the primary storage path at `/data/media` once `/data` is up
    fn link_media_storage(&self) -> Result<()> {
        let Some(storage) = self.media_storage.as_deref() else {
            return Ok(());
        };

        fs::create_dir_all(MEDIA_DIR)?;
        if fs::symlink_metadata(storage).is_err() {
            std::os::unix::fs::symlink(MEDIA_DIR, storage)?;
            info!("Linked {} to {}", storage, MEDIA_DIR);
        }
        Ok(())
    }

    /// Flash partitions are named in the table; mount their block device
    fn resolve_device(&self, device: &str) -> Result<String> {
        if device.starts_with('/') {
            return Ok(device.to_string());
        }

        self.flash
            .find_partition(device)
            .map_err(|error| SysError::OperationFailed(error.message))?
            .map(|partition| partition.block_device())
            .ok_or_else(|| SysError::DeviceNotFound(device.to_string()))
    }

    fn mount_volume(&self, volume: &Volume) -> Result<()> {
        if volume.kind() == FsType::Ramdisk {
            return Ok(());
        }
        if !volume.is_mountable() {
            return Err(SysError::Unsupported(format!(
                "{} volume {} can't be mounted",
                volume.fs_type, volume.mount_point
            )));
        }

        if self.find_mounted(&volume.mount_point)?.is_some() {
            debug!("{} already mounted", volume.mount_point);
            return Ok(());
        }

        fs::create_dir_all(&volume.mount_point)?;

        let devices = std::iter::once(volume.device.as_str()).chain(volume.device2.as_deref());
        let fs_types: Vec<&str> = std::iter::once(volume.fs_type.as_str())
            .chain(volume.fs_type2.as_deref())
            .collect();

        let flags = MsFlags::MS_NOATIME | MsFlags::MS_NODEV | MsFlags::MS_NODIRATIME;
        let mut last_error = None;

        for device in devices {
            let device = match self.resolve_device(device) {
                Ok(device) => device,
                Err(error) => {
                    last_error = Some(error);
                    continue;
                }
            };

            for fs_type in &fs_types {
                match mount(
                    Some(device.as_str()),
                    volume.mount_point.as_str(),
                    Some(*fs_type),
                    flags,
                    None::<&str>,
                ) {
                    Ok(()) => {
                        info!("Mounted {} at {} ({})", device, volume.mount_point, fs_type);
                        return Ok(());
                    }
                    Err(errno) => {
                        debug!(
                            "mount {} at {} as {} failed: {}",
                            device, volume.mount_point, fs_type, errno
                        );
                        last_error = Some(SysError::Errno(errno));
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SysError::OperationFailed(format!("no device to mount at {}", volume.mount_point))
        }))
    }

    fn unmount_volume(&self, volume: &Volume) -> Result<()> {
        if volume.kind() == FsType::Ramdisk {
            return Err(SysError::Unsupported(format!(
                "ramdisk {} can't be unmounted",
                volume.mount_point
            )));
        }

        if self.find_mounted(&volume.mount_point)?.is_none() {
            return Ok(());
        }

        umount(volume.mount_point.as_str())?;
        info!("Unmounted {}", volume.mount_point);
        Ok(())
    }
}

impl MountControl for SysMountControl<'_> {
    fn ensure_mounted(&self, path: &str) -> BackendResult<()> {
        let volume = self.volume(path)?;
        let mounted = self.mount_volume(volume).and_then(|()| {
            if self.is_media_path(path) {
                self.link_media_storage()
            } else {
                Ok(())
            }
        });
        mounted.map_err(|error| {
            warn!("Failed to mount {}: {}", volume.mount_point, error);
            error.into()
        })
    }

    fn ensure_unmounted(&self, path: &str) -> BackendResult<()> {
        if self.is_media_path(path) {
            debug!("{} lives on {}, leaving it mounted", path, DATA);
            return Ok(());
        }
        let volume = self.volume(path)?;
        self.unmount_volume(volume).map_err(|error| {
            warn!("Failed to unmount {}: {}", volume.mount_point, error);
            error.into()
        })
    }

    fn is_mounted(&self, path: &str) -> bool {
        let Ok(volume) = self.volume(path) else {
            return false;
        };
        if volume.kind() == FsType::Ramdisk {
            return true;
        }

        match self.find_mounted(&volume.mount_point) {
            Ok(entry) => entry.is_some(),
            Err(error) => {
                warn!("Failed to scan mounted volumes: {}", error);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use recovery_contracts::{BackendError, FlashPartition, FlashWriter};

    use super::*;
    use crate::fstab::FstabCatalog;

    #[test]
    fn parses_mount_table_and_unescapes_spaces() {
        let sample = "rootfs / rootfs rw 0 0\n/dev/block/mtdblock4 /cache yaffs2 rw,nodev 0 0\n/dev/block/mmcblk1p1 /mnt/my\\040card vfat rw 0 0\n\n";
        let entries = parse_mount_table(sample);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].mount_point, "/cache");
        assert_eq!(entries[1].fs_type, "yaffs2");
        assert_eq!(entries[2].mount_point, "/mnt/my card");
    }

    #[test]
    fn unescapes_trailing_and_non_ascii_fields() {
        let sample = "/dev/sdb1 /mnt/a\\040 vfat rw 0 0\n/dev/sdc1 /mnt/café\\011x ext4 rw 0 0\n";
        let entries = parse_mount_table(sample);
        assert_eq!(entries[0].mount_point, "/mnt/a ");
        assert_eq!(entries[1].mount_point, "/mnt/caf\u{e9}\tx");
    }

    #[test]
    fn skips_truncated_lines() {
        let entries = parse_mount_table("/dev/sda1 /boot\n");
        assert!(entries.is_empty());
    }

    struct NoFlash;

    impl FlashPartitions for NoFlash {
        fn scan(&self) -> BackendResult<Vec<FlashPartition>> {
            Ok(Vec::new())
        }

        fn open_writer<'a>(
            &'a self,
            partition: &FlashPartition,
        ) -> BackendResult<Box<dyn FlashWriter + 'a>> {
            Err(BackendError::new(format!("no partition {}", partition.name)))
        }
    }

    fn mount_point_of(mounts: &SysMountControl<'_>, path: &str) -> Option<String> {
        mounts.volume(path).ok().map(|volume| volume.mount_point.clone())
    }

    fn data_media_catalog() -> FstabCatalog {
        FstabCatalog::from_volumes(vec![
            Volume::new("/", "ramdisk", "ramdisk"),
            Volume::new("/data", "ext4", "/dev/block/mmcblk0p10"),
            Volume::new("/sdcard", "datamedia", "/dev/null"),
        ])
    }

    fn mounts_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "recovery-sys-{}-{}.mounts",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).expect("write mounts file");
        path
    }

    #[test]
    fn emulated_storage_follows_data_mount() {
        let catalog = data_media_catalog();
        let table = mounts_file("emulated", "/dev/block/mmcblk0p10 /data ext4 rw 0 0\n");
        let mounts = SysMountControl::new(&catalog, &NoFlash)
            .with_mounts_path(&table)
            .with_data_media("/sdcard");

        assert_eq!(
            mount_point_of(&mounts, "/sdcard/clockworkmod").as_deref(),
            Some("/data")
        );
        assert!(mounts.is_mounted("/sdcard"));
        assert!(mounts.is_mounted("/sdcard/clockworkmod/backup"));
        assert!(mounts.ensure_unmounted("/sdcard").is_ok());
        assert!(!mounts.is_mounted("/cache"));

        fs::remove_file(&table).expect("remove mounts file");
    }

    #[test]
    fn storage_uses_its_own_volume_without_data_media() {
        let catalog = data_media_catalog();
        let table = mounts_file("plain", "/dev/block/mmcblk0p10 /data ext4 rw 0 0\n");
        let mounts = SysMountControl::new(&catalog, &NoFlash).with_mounts_path(&table);

        assert_eq!(mount_point_of(&mounts, "/sdcard").as_deref(), Some("/sdcard"));
        assert!(!mounts.is_mounted("/sdcard"));
        assert!(mounts.volume("/usb").is_err());

        fs::remove_file(&table).expect("remove mounts file");
    }
}
